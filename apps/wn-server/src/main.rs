//! HTTP adapter: one analysis per request, nothing shared between
//! requests beyond the solver configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Parser;
use serde::{Deserialize, Serialize};
use wn_app::{analyze, render, AnalysisRequest, AppError};
use wn_epanet::EpanetSolver;
use wn_impact::{HydraulicSolver, NodeImpactRecord, SpatialLayers};
use wn_model::NetworkModel;

#[derive(Parser)]
#[command(name = "wn-server")]
#[command(about = "Waternet HTTP analysis service", long_about = None)]
struct Cli {
    /// Listen address
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: SocketAddr,
    /// EPANET command-line binary to invoke
    #[arg(long, default_value = wn_epanet::DEFAULT_BINARY)]
    epanet: PathBuf,
}

#[derive(Clone)]
struct ServerState {
    solver: Arc<EpanetSolver>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeBody {
    inp_content: String,
    pipe_to_close: String,
    #[serde(default)]
    time_sec: Option<u32>,
    #[serde(default)]
    top_n: Option<usize>,
    #[serde(default)]
    ok_bar_min: Option<f64>,
    #[serde(default)]
    very_low_max: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeReply {
    used_time: u32,
    time_fallback: bool,
    pipe_closed: String,
    mean_pressure_base: Option<f64>,
    mean_pressure_closed: Option<f64>,
    mean_drop: Option<f64>,
    top_impacted_nodes: Vec<NodeImpactRecord>,
    all_nodes: Vec<NodeImpactRecord>,
    layers: SpatialLayers,
    csv_data: String,
}

#[derive(Debug, Serialize)]
struct ErrorReply {
    error: String,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let state = ServerState {
        solver: Arc::new(EpanetSolver::with_binary(cli.epanet)),
    };
    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/analyze", post(analyze_handler))
        .with_state(state);

    tracing::info!(addr = %cli.addr, "listening");
    let listener = tokio::net::TcpListener::bind(cli.addr).await?;
    axum::serve(listener, app).await
}

async fn analyze_handler(
    State(state): State<ServerState>,
    Json(body): Json<AnalyzeBody>,
) -> Result<Json<AnalyzeReply>, (StatusCode, Json<ErrorReply>)> {
    let solver = state.solver.clone();
    // The solver blocks on an external process; keep it off the runtime.
    let result = tokio::task::spawn_blocking(move || run_analysis(solver.as_ref(), &body))
        .await
        .map_err(|e| {
            internal(format!("analysis task failed: {e}"))
        })?;
    match result {
        Ok(reply) => Ok(Json(reply)),
        Err(err) => Err(error_reply(err)),
    }
}

fn run_analysis<S: HydraulicSolver>(
    solver: &S,
    body: &AnalyzeBody,
) -> Result<AnalyzeReply, AppError> {
    let model = NetworkModel::parse(&body.inp_content)?;

    let mut request = AnalysisRequest::new(body.pipe_to_close.clone());
    if let Some(t) = body.time_sec {
        request.eval_time_s = t;
    }
    if let Some(n) = body.top_n {
        request.top_n = n;
    }
    if let Some(v) = body.ok_bar_min {
        request.thresholds.ok_min_bar = v;
    }
    if let Some(v) = body.very_low_max {
        request.thresholds.very_low_max_bar = v;
    }

    let outcome = analyze(solver, &model, &request)?;
    let csv_data = render::to_csv(&outcome.summary);
    let summary = outcome.summary;

    Ok(AnalyzeReply {
        used_time: summary.used_time_s,
        time_fallback: summary.time_fallback,
        pipe_closed: summary
            .pipe_closed
            .unwrap_or_else(|| body.pipe_to_close.clone()),
        mean_pressure_base: summary.mean_base_m,
        mean_pressure_closed: summary.mean_closed_m,
        mean_drop: summary.mean_drop_m,
        top_impacted_nodes: summary.top,
        all_nodes: summary.all_nodes,
        layers: outcome.layers,
        csv_data,
    })
}

fn error_reply(err: AppError) -> (StatusCode, Json<ErrorReply>) {
    let status = if err.is_invalid_request() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (
        status,
        Json(ErrorReply {
            error: err.to_string(),
        }),
    )
}

fn internal(message: String) -> (StatusCode, Json<ErrorReply>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorReply { error: message }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use wn_impact::{PressureSeries, ServiceTier, SolveError};

    const DEMO: &str = "\
[JUNCTIONS]
 J1  50  10
 J2  45  10

[RESERVOIRS]
 R1  100

[PIPES]
 P1  R1  J1  100  300  130
 P2  J1  J2  200  200  130

[COORDINATES]
 J1  100  200
 J2  200  200

[END]
";

    struct StubSolver;

    impl HydraulicSolver for StubSolver {
        fn simulate(&self, model: &NetworkModel) -> Result<PressureSeries, SolveError> {
            let closed = model
                .links()
                .iter()
                .any(|l| l.initial_status == wn_model::LinkStatus::Closed);
            let mut series = PressureSeries::new();
            series.insert(3600, "J1", 45.0);
            series.insert(3600, "J2", if closed { 5.0 } else { 35.0 });
            series.insert(3600, "R1", 0.0);
            Ok(series)
        }
    }

    fn body(json: serde_json::Value) -> AnalyzeBody {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn request_body_is_camel_case() {
        let b = body(serde_json::json!({
            "inpContent": "x",
            "pipeToClose": "P2",
            "timeSec": 1800,
            "topN": 5,
            "okBarMin": 2.5,
            "veryLowMax": 0.5
        }));
        assert_eq!(b.pipe_to_close, "P2");
        assert_eq!(b.time_sec, Some(1800));
        assert_eq!(b.top_n, Some(5));
    }

    #[test]
    fn omitted_knobs_fall_back_to_defaults() {
        let b = body(serde_json::json!({
            "inpContent": DEMO,
            "pipeToClose": "P2"
        }));
        let reply = run_analysis(&StubSolver, &b).unwrap();
        assert_eq!(reply.used_time, 3600);
        assert_eq!(reply.pipe_closed, "P2");
        assert_eq!(reply.all_nodes.len(), 3);
        let j2 = reply
            .all_nodes
            .iter()
            .find(|r| r.node_id == "J2")
            .unwrap();
        assert_eq!(j2.status, ServiceTier::VeryLow);
        assert!(reply.csv_data.starts_with("node_id,"));
    }

    #[test]
    fn unknown_pipe_maps_to_bad_request() {
        let b = body(serde_json::json!({
            "inpContent": DEMO,
            "pipeToClose": "P99"
        }));
        let err = run_analysis(&StubSolver, &b).unwrap_err();
        let (status, _) = error_reply(err);
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn reply_serializes_camel_case() {
        let b = body(serde_json::json!({
            "inpContent": DEMO,
            "pipeToClose": "P2"
        }));
        let reply = run_analysis(&StubSolver, &b).unwrap();
        let json = serde_json::to_value(&reply).unwrap();
        assert!(json.get("usedTime").is_some());
        assert!(json.get("topImpactedNodes").is_some());
        assert!(json.get("csvData").is_some());
        assert!(json["layers"]["categorical"]["groups"].is_array());
    }
}
