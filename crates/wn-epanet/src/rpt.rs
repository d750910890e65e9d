//! EPANET report-file parsing.
//!
//! Pulls the per-instant "Node Results" tables out of a text report.
//! Handles both the single-period header (`Node Results:`) and the
//! extended-period one (`Node Results at 1:00:00 hrs:`). Pressure is the
//! third value column; reservoir and tank rows carry a trailing marker
//! word that is ignored.

use wn_impact::{PressureSeries, SolveError};

/// Some solver front ends exit 0 even after input errors; the report is
/// the authoritative place to look.
pub fn check_for_errors(report: &str) -> Result<(), SolveError> {
    for line in report.lines() {
        let t = line.trim();
        if t.starts_with("Error") || t.starts_with("Input Error") {
            return Err(SolveError::Output {
                message: t.to_string(),
            });
        }
    }
    Ok(())
}

pub fn parse_report(report: &str) -> Result<PressureSeries, SolveError> {
    let mut series = PressureSeries::new();
    // Instant of the node table currently being read, if any.
    let mut current: Option<u32> = None;

    for line in report.lines() {
        let t = line.trim();
        if let Some(time_s) = node_results_header(t)? {
            current = Some(time_s);
            continue;
        }
        let Some(time_s) = current else {
            continue;
        };
        if t.is_empty() {
            // Tables end at the first blank line.
            current = None;
            continue;
        }
        if t.starts_with('-') {
            continue;
        }
        // A data row is `id demand head pressure [quality] [marker]`.
        // Anything that does not fit (column headers, unit rows, page
        // decorations) is skipped.
        let fields: Vec<&str> = t.split_whitespace().collect();
        if fields.len() < 4 {
            continue;
        }
        let values: Option<Vec<f64>> = fields[1..4].iter().map(|f| f.parse().ok()).collect();
        if let Some(values) = values {
            series.insert(time_s, fields[0], values[2]);
        }
    }

    if series.is_empty() {
        return Err(SolveError::Output {
            message: "no node results found in report".to_string(),
        });
    }
    Ok(series)
}

fn node_results_header(line: &str) -> Result<Option<u32>, SolveError> {
    if !line.starts_with("Node Results") {
        return Ok(None);
    }
    match line.strip_prefix("Node Results at ") {
        Some(rest) => {
            let clock = rest.split_whitespace().next().ok_or_else(|| {
                SolveError::Output {
                    message: format!("unparseable results header '{line}'"),
                }
            })?;
            Ok(Some(parse_clock(clock)?))
        }
        // Single-period reports carry a bare `Node Results:` header.
        None => Ok(Some(0)),
    }
}

/// `H:MM` or `H:MM:SS` clock time to seconds. Hours may exceed 24.
fn parse_clock(clock: &str) -> Result<u32, SolveError> {
    let bad = || SolveError::Output {
        message: format!("unparseable report time '{clock}'"),
    };
    let parts: Vec<&str> = clock.split(':').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return Err(bad());
    }
    let h: u32 = parts[0].parse().map_err(|_| bad())?;
    let m: u32 = parts[1].parse().map_err(|_| bad())?;
    let s: u32 = match parts.get(2) {
        Some(p) => p.parse().map_err(|_| bad())?,
        None => 0,
    };
    Ok(h * 3600 + m * 60 + s)
}
