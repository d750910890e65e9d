//! Per-node impact records, aggregates and ranking.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use wn_core::units::m_to_bar;

use crate::classify::{classify, ServiceTier, Thresholds};
use crate::diff::ScenarioDiff;

/// One row of the tabular report. All pressures derive from the clean
/// snapshots; undefined values stay `None` end to end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeImpactRecord {
    pub node_id: String,
    pub pressure_base_m: Option<f64>,
    pub pressure_closed_m: Option<f64>,
    pub drop_m: Option<f64>,
    pub pressure_base_bar: Option<f64>,
    pub pressure_closed_bar: Option<f64>,
    pub drop_bar: Option<f64>,
    pub status: ServiceTier,
    pub x: Option<f64>,
    pub y: Option<f64>,
}

/// Aggregate view of one analysis. Derived per request, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactSummary {
    pub requested_time_s: u32,
    pub used_time_s: u32,
    /// True when the evaluation instant was substituted; `used_time_s`
    /// then differs from `requested_time_s`.
    pub time_fallback: bool,
    pub pipe_closed: Option<String>,
    /// Means over nodes with a defined value for the respective field.
    pub mean_base_m: Option<f64>,
    pub mean_closed_m: Option<f64>,
    pub mean_drop_m: Option<f64>,
    /// Hardest-hit nodes, largest drop first.
    pub top: Vec<NodeImpactRecord>,
    /// Every node, in the same ranking order.
    pub all_nodes: Vec<NodeImpactRecord>,
}

/// Assemble the per-node record set, aggregates and top-N ranking.
///
/// The tier is judged on the closed-scenario pressure: it reflects the
/// service a consumer gets after the closure, not how far pressure fell.
/// `top_n` larger than the node count simply returns every node.
pub fn build_report(
    diff: &ScenarioDiff,
    thresholds: &Thresholds,
    top_n: usize,
    coords: &BTreeMap<String, (f64, f64)>,
) -> ImpactSummary {
    let mut all_nodes: Vec<NodeImpactRecord> = diff
        .nodes
        .iter()
        .map(|(id, d)| {
            let closed_bar = d.closed_m.map(m_to_bar);
            let (x, y) = match coords.get(id) {
                Some(&(x, y)) => (Some(x), Some(y)),
                None => (None, None),
            };
            NodeImpactRecord {
                node_id: id.clone(),
                pressure_base_m: d.base_m,
                pressure_closed_m: d.closed_m,
                drop_m: d.drop_m,
                pressure_base_bar: d.base_m.map(m_to_bar),
                pressure_closed_bar: closed_bar,
                drop_bar: d.drop_m.map(m_to_bar),
                status: classify(closed_bar, thresholds),
                x,
                y,
            }
        })
        .collect();

    all_nodes.sort_by(rank_order);

    let top: Vec<NodeImpactRecord> = all_nodes.iter().take(top_n).cloned().collect();
    let mean_base_m = mean(all_nodes.iter().filter_map(|r| r.pressure_base_m));
    let mean_closed_m = mean(all_nodes.iter().filter_map(|r| r.pressure_closed_m));
    let mean_drop_m = mean(all_nodes.iter().filter_map(|r| r.drop_m));

    ImpactSummary {
        requested_time_s: diff.requested_time_s,
        used_time_s: diff.used_time_s,
        time_fallback: diff.time_fallback,
        pipe_closed: diff.pipe_closed.clone(),
        mean_base_m,
        mean_closed_m,
        mean_drop_m,
        top,
        all_nodes,
    }
}

/// Largest drop first; undefined drops rank last; ties break on node id so
/// the ordering is reproducible.
fn rank_order(a: &NodeImpactRecord, b: &NodeImpactRecord) -> Ordering {
    let da = a.drop_m.unwrap_or(f64::NEG_INFINITY);
    let db = b.drop_m.unwrap_or(f64::NEG_INFINITY);
    db.partial_cmp(&da)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.node_id.cmp(&b.node_id))
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut sum = 0.0;
    let mut n = 0usize;
    for v in values {
        sum += v;
        n += 1;
    }
    (n > 0).then(|| sum / n as f64)
}
