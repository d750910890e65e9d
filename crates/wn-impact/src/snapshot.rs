//! Pressure-series normalization.

use std::collections::BTreeMap;

use crate::error::{ImpactError, ImpactResult};
use crate::scenario::Scenario;
use crate::series::PressureSeries;

/// Clamp a simulator pressure for service reasoning. Negative values are
/// artifacts of an infeasible or disconnected state, not deliverable
/// pressure.
#[inline]
pub fn clamp_pressure(p_m: f64) -> f64 {
    if p_m < 0.0 {
        0.0
    } else {
        p_m
    }
}

/// One scenario's pressures aligned at a single instant.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioSnapshot {
    pub scenario: Scenario,
    pub requested_time_s: u32,
    pub used_time_s: u32,
    /// Pressures exactly as the simulator reported them. Diagnostics only;
    /// never feeds service-impact reasoning.
    pub raw_m: BTreeMap<String, f64>,
    /// Pressures with negatives clamped to zero. Everything downstream
    /// reads these.
    pub clean_m: BTreeMap<String, f64>,
}

impl ScenarioSnapshot {
    /// True when the requested instant was absent from the series and the
    /// earliest sample was used instead.
    pub fn time_fallback(&self) -> bool {
        self.used_time_s != self.requested_time_s
    }
}

/// Select the evaluation instant and split the sample into raw and clamped
/// views.
///
/// Falls back to the earliest sampled instant when the requested one is
/// absent; the substitution stays visible on the snapshot so callers can
/// report it.
pub fn snapshot_at(
    scenario: Scenario,
    series: &PressureSeries,
    time_s: u32,
) -> ImpactResult<ScenarioSnapshot> {
    let missing = || ImpactError::EmptyResults {
        scenario: scenario.to_string(),
    };

    let (used_time_s, raw) = match series.at(time_s) {
        Some(sample) => (time_s, sample),
        None => {
            let first = series.first_time().ok_or_else(missing)?;
            tracing::warn!(
                %scenario,
                requested_s = time_s,
                used_s = first,
                "requested instant not sampled, using earliest"
            );
            (first, series.at(first).ok_or_else(missing)?)
        }
    };

    let clean_m = raw
        .iter()
        .map(|(id, &p)| (id.clone(), clamp_pressure(p)))
        .collect();

    Ok(ScenarioSnapshot {
        scenario,
        requested_time_s: time_s,
        used_time_s,
        raw_m: raw.clone(),
        clean_m,
    })
}
