//! Two-scenario analysis orchestration.

use wn_impact::{
    build_layers, build_report, diff_snapshots, run_scenario, HydraulicSolver, ImpactError,
    ImpactSummary, ScalarField, Scenario, SpatialLayers, Thresholds,
};
use wn_model::{LinkStatus, ModelError, NetworkModel};

use crate::error::AppResult;

/// Default evaluation instant, one hour into the simulation.
pub const DEFAULT_EVAL_TIME_S: u32 = 3600;
/// Default size of the ranked summary table.
pub const DEFAULT_TOP_N: usize = 20;

/// One closure-impact analysis request.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Link to force closed in the intervention scenario.
    pub pipe_id: String,
    pub eval_time_s: u32,
    pub top_n: usize,
    pub thresholds: Thresholds,
    /// Scalar plotted by the continuous layer.
    pub field: ScalarField,
}

impl AnalysisRequest {
    pub fn new(pipe_id: impl Into<String>) -> Self {
        Self {
            pipe_id: pipe_id.into(),
            eval_time_s: DEFAULT_EVAL_TIME_S,
            top_n: DEFAULT_TOP_N,
            thresholds: Thresholds::default(),
            field: ScalarField::DropM,
        }
    }
}

/// Report plus renderable layers for one analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub summary: ImpactSummary,
    pub layers: SpatialLayers,
}

/// Run the full pipeline: validate, simulate baseline and closure at a
/// shared instant, difference, classify, rank, build layers.
///
/// Validation failures short-circuit before any solver work. Each scenario
/// simulates a private model copy; only the intervention copy has the
/// target link's initial status changed.
pub fn analyze<S: HydraulicSolver>(
    solver: &S,
    model: &NetworkModel,
    request: &AnalysisRequest,
) -> AppResult<AnalysisOutcome> {
    request.thresholds.validate()?;
    if request.top_n == 0 {
        return Err(ImpactError::InvalidTopN.into());
    }
    if !model.has_link(&request.pipe_id) {
        return Err(ModelError::LinkNotFound {
            id: request.pipe_id.clone(),
        }
        .into());
    }

    tracing::info!(
        pipe = %request.pipe_id,
        time_s = request.eval_time_s,
        "starting closure impact analysis"
    );

    let base = run_scenario(solver, model, Scenario::Baseline, request.eval_time_s)?;
    if base.time_fallback() {
        tracing::warn!(
            requested_s = request.eval_time_s,
            used_s = base.used_time_s,
            "evaluation instant substituted"
        );
    }

    // The intervention runs on its own copy, evaluated at the instant the
    // baseline actually resolved.
    let mut closed_model = model.clone();
    closed_model.set_initial_status(&request.pipe_id, LinkStatus::Closed)?;
    let closed = run_scenario(
        solver,
        &closed_model,
        Scenario::LinkClosed {
            link_id: request.pipe_id.clone(),
        },
        base.used_time_s,
    )?;
    if closed.used_time_s != base.used_time_s {
        return Err(ImpactError::TimeMismatch {
            base_s: base.used_time_s,
            closed_s: closed.used_time_s,
        }
        .into());
    }

    let diff = diff_snapshots(&base, &closed);
    let summary = build_report(
        &diff,
        &request.thresholds,
        request.top_n,
        &model.coordinate_map(),
    );
    let layers = build_layers(&summary.all_nodes, request.field);

    tracing::info!(
        nodes = summary.all_nodes.len(),
        used_time_s = summary.used_time_s,
        "analysis complete"
    );

    Ok(AnalysisOutcome { summary, layers })
}
