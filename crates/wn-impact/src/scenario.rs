//! One solver run bound to a scenario label.

use std::fmt;

use wn_model::NetworkModel;

use crate::error::ImpactResult;
use crate::series::HydraulicSolver;
use crate::snapshot::{snapshot_at, ScenarioSnapshot};

/// Which network variant a run simulated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scenario {
    Baseline,
    LinkClosed { link_id: String },
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scenario::Baseline => f.write_str("baseline"),
            Scenario::LinkClosed { link_id } => write!(f, "closure of '{link_id}'"),
        }
    }
}

/// Run the solver once and normalize the result at the requested instant.
///
/// The model is taken as prepared by the caller: for the intervention
/// scenario the target link must already be closed on a private copy. No
/// topology is touched here.
pub fn run_scenario<S: HydraulicSolver + ?Sized>(
    solver: &S,
    model: &NetworkModel,
    scenario: Scenario,
    time_s: u32,
) -> ImpactResult<ScenarioSnapshot> {
    tracing::debug!(%scenario, time_s, "running hydraulic scenario");
    let series = solver.simulate(model)?;
    snapshot_at(scenario, &series, time_s)
}
