//! Cross-scenario pressure differencing.

use std::collections::BTreeMap;

use crate::scenario::Scenario;
use crate::snapshot::ScenarioSnapshot;

/// Per-node clean pressures and drop, in meters. `None` marks a node that
/// one of the runs did not report; it is propagated, never defaulted to
/// zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NodeDelta {
    pub base_m: Option<f64>,
    pub closed_m: Option<f64>,
    /// `base_m - closed_m`. May be negative: pressure can rise downstream
    /// of a closed loop, and that is a valid result.
    pub drop_m: Option<f64>,
}

/// Result of differencing the two scenario snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioDiff {
    pub requested_time_s: u32,
    pub used_time_s: u32,
    pub time_fallback: bool,
    /// Link closed in the intervention run, when it was a closure scenario.
    pub pipe_closed: Option<String>,
    pub nodes: BTreeMap<String, NodeDelta>,
}

/// Difference clean pressures over the union of both node sets.
///
/// Both snapshots are expected at the same resolved instant; the
/// orchestrator enforces that before calling.
pub fn diff_snapshots(base: &ScenarioSnapshot, closed: &ScenarioSnapshot) -> ScenarioDiff {
    let mut nodes: BTreeMap<String, NodeDelta> = BTreeMap::new();

    for (id, &p) in &base.clean_m {
        nodes.entry(id.clone()).or_default().base_m = Some(p);
    }
    for (id, &p) in &closed.clean_m {
        nodes.entry(id.clone()).or_default().closed_m = Some(p);
    }
    for delta in nodes.values_mut() {
        if let (Some(b), Some(c)) = (delta.base_m, delta.closed_m) {
            delta.drop_m = Some(b - c);
        }
    }

    let pipe_closed = match &closed.scenario {
        Scenario::LinkClosed { link_id } => Some(link_id.clone()),
        Scenario::Baseline => None,
    };

    ScenarioDiff {
        requested_time_s: base.requested_time_s,
        used_time_s: base.used_time_s,
        time_fallback: base.time_fallback(),
        pipe_closed,
        nodes,
    }
}
