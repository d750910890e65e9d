//! Solver-facing types: the pressure time series and the solver trait.

use std::collections::BTreeMap;

use thiserror::Error;
use wn_model::NetworkModel;

/// Time-indexed nodal pressures in meters of head, as returned by a solver.
///
/// Instants are integer simulation seconds; iteration is in ascending time
/// order, so the earliest sample is well defined for the fallback rule.
/// Values may be negative: that is how solvers flag infeasible or
/// disconnected nodes, and sanitizing them is the normalizer's job, not
/// ours.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PressureSeries {
    samples: BTreeMap<u32, BTreeMap<String, f64>>,
}

impl PressureSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, time_s: u32, node_id: impl Into<String>, pressure_m: f64) {
        self.samples
            .entry(time_s)
            .or_default()
            .insert(node_id.into(), pressure_m);
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sampled instants in ascending order.
    pub fn times(&self) -> impl Iterator<Item = u32> + '_ {
        self.samples.keys().copied()
    }

    pub fn first_time(&self) -> Option<u32> {
        self.samples.keys().next().copied()
    }

    pub fn contains_time(&self, time_s: u32) -> bool {
        self.samples.contains_key(&time_s)
    }

    /// Per-node pressures at one instant, if sampled.
    pub fn at(&self, time_s: u32) -> Option<&BTreeMap<String, f64>> {
        self.samples.get(&time_s)
    }
}

/// External hydraulic solver: runs the network model once and yields the
/// full pressure series. Assumed deterministic for a fixed model.
pub trait HydraulicSolver {
    fn simulate(&self, model: &NetworkModel) -> Result<PressureSeries, SolveError>;
}

/// Fatal solver failure for the current analysis request. Never retried: a
/// non-convergent network will not converge on retry with the same inputs.
#[derive(Error, Debug)]
pub enum SolveError {
    #[error("solver invocation failed: {message}")]
    Invocation { message: String },

    #[error("solver produced unusable output: {message}")]
    Output { message: String },
}
