//! Local dashboard generator: one analysis, three files, a browser tab.
//!
//! Writes `service_report.csv`, `layers.json` and `dashboard.html` into an
//! output directory. Actual map rendering stays external; the HTML shell
//! shows the summary and the ranked table and links to the data files.

use std::path::{Path, PathBuf};

use clap::Parser;
use wn_app::{analyze, render, AnalysisRequest, AppResult};
use wn_epanet::EpanetSolver;
use wn_impact::{ImpactSummary, ScalarField, Thresholds};
use wn_model::NetworkModel;

#[derive(Parser)]
#[command(name = "wn-dashboard")]
#[command(about = "Waternet dashboard - write an impact report to disk", long_about = None)]
struct Cli {
    /// Path to the EPANET INP model file
    model_path: PathBuf,
    /// Link id of the pipe to close
    pipe_id: String,
    /// Evaluation instant in simulation seconds
    #[arg(long, default_value_t = wn_app::DEFAULT_EVAL_TIME_S)]
    time: u32,
    /// Rows in the ranked summary table
    #[arg(long, default_value_t = wn_app::DEFAULT_TOP_N)]
    top_n: usize,
    /// Full-service threshold in bar
    #[arg(long, default_value_t = 3.0)]
    ok_min: f64,
    /// Upper bound of the very-low band in bar
    #[arg(long, default_value_t = 1.0)]
    very_low_max: f64,
    /// Output directory for the report files
    #[arg(long, default_value = "outputs")]
    outdir: PathBuf,
    /// Open the generated dashboard in the default browser
    #[arg(long)]
    open: bool,
    /// EPANET command-line binary to invoke
    #[arg(long, default_value = wn_epanet::DEFAULT_BINARY)]
    epanet: PathBuf,
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let model = NetworkModel::from_file(&cli.model_path)?;
    let solver = EpanetSolver::with_binary(&cli.epanet);
    let request = AnalysisRequest {
        pipe_id: cli.pipe_id,
        eval_time_s: cli.time,
        top_n: cli.top_n,
        thresholds: Thresholds {
            ok_min_bar: cli.ok_min,
            very_low_max_bar: cli.very_low_max,
        },
        field: ScalarField::DropM,
    };

    let outcome = analyze(&solver, &model, &request)?;

    std::fs::create_dir_all(&cli.outdir)?;
    let csv_path = cli.outdir.join("service_report.csv");
    std::fs::write(&csv_path, render::to_csv(&outcome.summary))?;
    let layers_path = cli.outdir.join("layers.json");
    std::fs::write(&layers_path, serde_json::to_string_pretty(&outcome.layers)?)?;
    let html_path = cli.outdir.join("dashboard.html");
    std::fs::write(&html_path, dashboard_html(&outcome.summary))?;

    println!("✓ Dashboard written to {}", html_path.display());

    if cli.open {
        open_in_browser(&html_path)?;
    }
    Ok(())
}

fn dashboard_html(summary: &ImpactSummary) -> String {
    let pipe = summary.pipe_closed.as_deref().unwrap_or("-");
    let hours = summary.used_time_s as f64 / 3600.0;
    let time_note = if summary.time_fallback {
        format!(
            " (requested {} s was not sampled)",
            summary.requested_time_s
        )
    } else {
        String::new()
    };

    let mut rows = String::new();
    for r in &summary.top {
        let closed = r
            .pressure_closed_m
            .map(|v| format!("{v:.1}"))
            .unwrap_or_else(|| "n/a".to_string());
        let drop = r
            .drop_m
            .map(|v| format!("{v:.1}"))
            .unwrap_or_else(|| "n/a".to_string());
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td>\
             <td style=\"color:{}\">{}</td></tr>\n",
            html_escape(&r.node_id),
            closed,
            drop,
            r.status.legend_color(),
            r.status
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<title>Water Network Impact Dashboard</title>
<style>
body {{ font-family: Arial, sans-serif; background: #f4f6f8; margin: 20px; }}
.card {{ background: white; padding: 20px; border-radius: 8px; }}
table {{ border-collapse: collapse; margin-top: 12px; }}
td, th {{ border: 1px solid #ccc; padding: 4px 10px; text-align: right; }}
th:first-child, td:first-child {{ text-align: left; }}
</style>
</head>
<body>
<div class="card">
<h2>Service Impact Dashboard</h2>
<p><b>Pipe closed:</b> {pipe}<br>
<b>Time:</b> {used} s ({hours:.2} h){time_note}<br>
<b>Generated:</b> {generated}</p>
<p><a href="service_report.csv">Download report (CSV)</a> &middot;
<a href="layers.json">Spatial layers (JSON)</a></p>
<table>
<tr><th>node</th><th>P_closed (m)</th><th>drop (m)</th><th>status</th></tr>
{rows}</table>
</div>
</body>
</html>
"#,
        pipe = html_escape(pipe),
        used = summary.used_time_s,
        hours = hours,
        time_note = time_note,
        generated = chrono::Utc::now().to_rfc3339(),
        rows = rows,
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(target_os = "macos")]
const OPEN_CMD: &[&str] = &["open"];
#[cfg(target_os = "windows")]
const OPEN_CMD: &[&str] = &["cmd", "/C", "start", ""];
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const OPEN_CMD: &[&str] = &["xdg-open"];

fn open_in_browser(path: &Path) -> std::io::Result<()> {
    std::process::Command::new(OPEN_CMD[0])
        .args(&OPEN_CMD[1..])
        .arg(path)
        .spawn()?;
    Ok(())
}
