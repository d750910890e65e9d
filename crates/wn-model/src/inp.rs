//! Minimal INP reader/writer.
//!
//! Only the sections the analysis needs are interpreted: node and link
//! inventory, coordinates, and initial link statuses. Everything else
//! (patterns, curves, options, times, ...) passes through untouched in the
//! re-emitted document, which is what the external solver consumes.

use std::collections::HashSet;

use crate::error::{ModelError, ModelResult};
use crate::network::{Link, LinkKind, LinkStatus, NetworkModel, Node, NodeKind};

pub(crate) fn parse(text: &str) -> ModelResult<NetworkModel> {
    let mut nodes: Vec<Node> = Vec::new();
    let mut links: Vec<Link> = Vec::new();
    let mut node_ids: HashSet<String> = HashSet::new();
    let mut link_ids: HashSet<String> = HashSet::new();

    // [STATUS] and [COORDINATES] may appear before the entities they refer
    // to, so they are collected first and applied after the full scan.
    let mut status_overrides: Vec<(usize, String, LinkStatus)> = Vec::new();
    let mut coordinates: Vec<(usize, String, f64, f64)> = Vec::new();

    let mut section = String::new();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }
        if let Some(name) = section_name(line) {
            section = name;
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        match section.as_str() {
            "JUNCTIONS" => {
                push_node(&mut nodes, &mut node_ids, fields[0], NodeKind::Junction, line_no)?;
            }
            "RESERVOIRS" => {
                push_node(&mut nodes, &mut node_ids, fields[0], NodeKind::Reservoir, line_no)?;
            }
            "TANKS" => {
                push_node(&mut nodes, &mut node_ids, fields[0], NodeKind::Tank, line_no)?;
            }
            "PIPES" => {
                if fields.len() < 3 {
                    return Err(parse_err(line_no, "pipe needs an id and two end nodes"));
                }
                let status = match fields.get(7) {
                    Some(tok) => parse_status(tok, line_no)?,
                    None => LinkStatus::Open,
                };
                push_link(
                    &mut links,
                    &mut link_ids,
                    fields[0],
                    LinkKind::Pipe,
                    fields[1],
                    fields[2],
                    status,
                    line_no,
                )?;
            }
            "PUMPS" => {
                if fields.len() < 3 {
                    return Err(parse_err(line_no, "pump needs an id and two end nodes"));
                }
                push_link(
                    &mut links,
                    &mut link_ids,
                    fields[0],
                    LinkKind::Pump,
                    fields[1],
                    fields[2],
                    LinkStatus::Open,
                    line_no,
                )?;
            }
            "VALVES" => {
                if fields.len() < 3 {
                    return Err(parse_err(line_no, "valve needs an id and two end nodes"));
                }
                push_link(
                    &mut links,
                    &mut link_ids,
                    fields[0],
                    LinkKind::Valve,
                    fields[1],
                    fields[2],
                    LinkStatus::Open,
                    line_no,
                )?;
            }
            "STATUS" => {
                if fields.len() < 2 {
                    return Err(parse_err(line_no, "status entry needs a link id and a state"));
                }
                // A numeric entry is a pump speed / valve setting; the link
                // is active, which for our purposes means open.
                let status = if fields[1].parse::<f64>().is_ok() {
                    LinkStatus::Open
                } else {
                    parse_status(fields[1], line_no)?
                };
                status_overrides.push((line_no, fields[0].to_string(), status));
            }
            "COORDINATES" => {
                if fields.len() < 3 {
                    return Err(parse_err(line_no, "coordinate entry needs a node id, x and y"));
                }
                let x = parse_number(fields[1], line_no)?;
                let y = parse_number(fields[2], line_no)?;
                coordinates.push((line_no, fields[0].to_string(), x, y));
            }
            _ => {} // pass-through section
        }
    }

    for (line_no, id, status) in status_overrides {
        let link = links
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| parse_err(line_no, format!("status for unknown link '{id}'")))?;
        link.initial_status = status;
    }

    for (_, id, x, y) in coordinates {
        // Map data is display-only; entries for unknown nodes are ignored.
        if let Some(node) = nodes.iter_mut().find(|n| n.id == id) {
            node.coordinates = Some((x, y));
        }
    }

    Ok(NetworkModel {
        source: text.to_string(),
        nodes,
        links,
    })
}

/// Re-emit the source document, dropping any original `[STATUS]` section
/// and appending one that reflects the model's current link statuses.
pub(crate) fn render(model: &NetworkModel) -> String {
    let overrides = status_section(model);
    let mut out = String::with_capacity(model.source.len() + overrides.len() + 16);
    let mut in_status = false;
    let mut inserted = false;

    for raw in model.source.lines() {
        let line = raw.trim();
        if let Some(name) = section_name(line) {
            if name == "STATUS" {
                in_status = true;
                continue;
            }
            in_status = false;
            if name == "END" && !inserted {
                out.push_str(&overrides);
                inserted = true;
            }
        } else if in_status {
            continue;
        }
        out.push_str(raw);
        out.push('\n');
    }
    if !inserted {
        out.push_str(&overrides);
    }
    out
}

fn status_section(model: &NetworkModel) -> String {
    let mut lines = String::new();
    for link in &model.links {
        if link.initial_status != link.source_status {
            lines.push_str(&format!(" {:<16} {}\n", link.id, link.initial_status));
        }
    }
    if lines.is_empty() {
        return lines;
    }
    format!("[STATUS]\n{lines}\n")
}

fn section_name(line: &str) -> Option<String> {
    let rest = line.strip_prefix('[')?;
    let name = rest.split(']').next()?;
    Some(name.trim().to_ascii_uppercase())
}

fn strip_comment(line: &str) -> &str {
    match line.find(';') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn parse_status(token: &str, line_no: usize) -> ModelResult<LinkStatus> {
    match token.to_ascii_uppercase().as_str() {
        "OPEN" | "CV" => Ok(LinkStatus::Open),
        "CLOSED" => Ok(LinkStatus::Closed),
        other => Err(parse_err(line_no, format!("unknown link status '{other}'"))),
    }
}

fn parse_number(token: &str, line_no: usize) -> ModelResult<f64> {
    token
        .parse::<f64>()
        .map_err(|_| parse_err(line_no, format!("expected a number, got '{token}'")))
}

fn parse_err(line: usize, what: impl Into<String>) -> ModelError {
    ModelError::Parse {
        line,
        what: what.into(),
    }
}

fn push_node(
    nodes: &mut Vec<Node>,
    seen: &mut HashSet<String>,
    id: &str,
    kind: NodeKind,
    line_no: usize,
) -> ModelResult<()> {
    if !seen.insert(id.to_string()) {
        return Err(parse_err(line_no, format!("duplicate node id '{id}'")));
    }
    nodes.push(Node {
        id: id.to_string(),
        kind,
        coordinates: None,
    });
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn push_link(
    links: &mut Vec<Link>,
    seen: &mut HashSet<String>,
    id: &str,
    kind: LinkKind,
    from: &str,
    to: &str,
    status: LinkStatus,
    line_no: usize,
) -> ModelResult<()> {
    if !seen.insert(id.to_string()) {
        return Err(parse_err(line_no, format!("duplicate link id '{id}'")));
    }
    links.push(Link {
        id: id.to_string(),
        kind,
        from_node: from.to_string(),
        to_node: to.to_string(),
        initial_status: status,
        source_status: status,
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEMO: &str = "\
[TITLE]
Small demo net

[JUNCTIONS]
;ID    Elev   Demand
 J1    50     10
 J2    45     10

[RESERVOIRS]
 R1    100

[PIPES]
;ID   Node1  Node2  Length  Diam  Rough  Mloss  Status
 P1   R1     J1     100     300   130    0      Open
 P2   J1     J2     200     200   130    0      Open

[COORDINATES]
 J1   100    200
 J2   200    200

[END]
";

    #[test]
    fn parses_inventory_and_coordinates() {
        let model = parse(DEMO).unwrap();
        assert_eq!(model.nodes().len(), 3);
        assert_eq!(model.links().len(), 2);
        assert_eq!(model.node("J1").unwrap().kind, NodeKind::Junction);
        assert_eq!(model.node("R1").unwrap().kind, NodeKind::Reservoir);
        assert_eq!(model.coordinates("J2"), Some((200.0, 200.0)));
        assert_eq!(model.coordinates("R1"), None);
        assert_eq!(model.link("P1").unwrap().initial_status, LinkStatus::Open);
    }

    #[test]
    fn inline_pipe_status_is_read() {
        let text = DEMO.replace(
            " P2   J1     J2     200     200   130    0      Open",
            " P2   J1     J2     200     200   130    0      Closed",
        );
        let model = parse(&text).unwrap();
        assert_eq!(model.link("P2").unwrap().initial_status, LinkStatus::Closed);
    }

    #[test]
    fn status_section_overrides_inline_status() {
        let text = DEMO.replace("[END]", "[STATUS]\n P2  Closed\n\n[END]");
        let model = parse(&text).unwrap();
        assert_eq!(model.link("P2").unwrap().initial_status, LinkStatus::Closed);
        // The override survives a render/parse round trip.
        let again = parse(&model.to_inp()).unwrap();
        assert_eq!(again.link("P2").unwrap().initial_status, LinkStatus::Closed);
    }

    #[test]
    fn status_for_unknown_link_is_rejected() {
        let text = DEMO.replace("[END]", "[STATUS]\n NOPE  Closed\n\n[END]");
        let err = parse(&text).unwrap_err();
        assert!(matches!(err, ModelError::Parse { .. }));
        assert!(err.to_string().contains("NOPE"));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let text = DEMO.replace("[RESERVOIRS]\n R1    100", "[RESERVOIRS]\n J1    100");
        let err = parse(&text).unwrap_err();
        assert!(err.to_string().contains("duplicate node id 'J1'"));
    }

    #[test]
    fn render_injects_status_override_before_end() {
        let mut model = parse(DEMO).unwrap();
        model.set_initial_status("P2", LinkStatus::Closed).unwrap();
        let text = model.to_inp();
        assert!(text.contains("[STATUS]"));
        let status_pos = text.find("[STATUS]").unwrap();
        let end_pos = text.find("[END]").unwrap();
        assert!(status_pos < end_pos);
        assert!(text.contains("P2"));

        let reparsed = parse(&text).unwrap();
        assert_eq!(
            reparsed.link("P2").unwrap().initial_status,
            LinkStatus::Closed
        );
        assert_eq!(reparsed.link("P1").unwrap().initial_status, LinkStatus::Open);
    }

    #[test]
    fn render_without_overrides_leaves_document_alone() {
        let model = parse(DEMO).unwrap();
        let text = model.to_inp();
        assert!(!text.contains("[STATUS]"));
        assert!(text.contains("[PIPES]"));
    }

    #[test]
    fn malformed_coordinate_reports_line() {
        let text = DEMO.replace(" J1   100    200", " J1   abc    200");
        let err = parse(&text).unwrap_err();
        match err {
            ModelError::Parse { line, what } => {
                assert!(line > 0);
                assert!(what.contains("abc"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
