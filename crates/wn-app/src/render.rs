//! Tabular renderings of an impact summary.

use std::fmt::Write as _;

use wn_core::units::fmt_m_bar;
use wn_impact::{ImpactSummary, Thresholds};

pub const CSV_HEADER: &str = "node_id,pressure_base_m,pressure_closed_m,drop_m,\
pressure_base_bar,pressure_closed_bar,drop_bar,status,x,y";

/// Delimited report over all nodes, ranking order preserved. Undefined
/// values serialize as empty cells.
pub fn to_csv(summary: &ImpactSummary) -> String {
    let mut out = String::new();
    out.push_str(CSV_HEADER);
    out.push('\n');
    for r in &summary.all_nodes {
        let _ = writeln!(
            out,
            "{},{},{},{},{},{},{},{},{},{}",
            csv_field(&r.node_id),
            cell(r.pressure_base_m),
            cell(r.pressure_closed_m),
            cell(r.drop_m),
            cell(r.pressure_base_bar),
            cell(r.pressure_closed_bar),
            cell(r.drop_bar),
            r.status,
            cell(r.x),
            cell(r.y),
        );
    }
    out
}

/// Console report in the shape operators are used to.
pub fn text_report(summary: &ImpactSummary, thresholds: &Thresholds) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== SERVICE IMPACT REPORT ===");
    if let Some(pipe) = &summary.pipe_closed {
        let _ = writeln!(out, "Pipe closed  : {pipe}");
    }
    let hours = summary.used_time_s as f64 / 3600.0;
    if summary.time_fallback {
        let _ = writeln!(
            out,
            "Time         : {}s ({:.2} h) (requested {}s was not sampled)",
            summary.used_time_s, hours, summary.requested_time_s
        );
    } else {
        let _ = writeln!(out, "Time         : {}s ({:.2} h)", summary.used_time_s, hours);
    }
    let _ = writeln!(
        out,
        "Rule         : OK at >= {} bar, very low below {} bar",
        thresholds.ok_min_bar, thresholds.very_low_max_bar
    );
    let _ = writeln!(
        out,
        "Note         : negative simulator pressures are treated as 0 for service analysis"
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "Mean P_base  : {}", mean_cell(summary.mean_base_m));
    let _ = writeln!(out, "Mean P_closed: {}", mean_cell(summary.mean_closed_m));
    let _ = writeln!(out, "Mean drop    : {}", mean_cell(summary.mean_drop_m));
    let _ = writeln!(out);

    let _ = writeln!(out, "Top {} nodes by pressure drop:", summary.top.len());
    let _ = writeln!(
        out,
        "{:<16} {:>20} {:>20}  {}",
        "node", "P_closed", "drop", "status"
    );
    for r in &summary.top {
        let closed = r
            .pressure_closed_m
            .map(fmt_m_bar)
            .unwrap_or_else(|| "n/a".to_string());
        let drop = r
            .drop_m
            .map(fmt_m_bar)
            .unwrap_or_else(|| "n/a".to_string());
        let _ = writeln!(out, "{:<16} {:>20} {:>20}  {}", r.node_id, closed, drop, r.status);
    }
    out
}

fn cell(v: Option<f64>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

fn mean_cell(v: Option<f64>) -> String {
    match v {
        Some(m) => format!("{:.3} m ≈ {:.3} bar", m, wn_core::units::m_to_bar(m)),
        None => "n/a".to_string(),
    }
}

fn csv_field(s: &str) -> String {
    if s.contains(',') || s.contains('"') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
