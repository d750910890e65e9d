//! wn-impact: scenario differencing and service-impact classification.
//!
//! The pipeline compares two hydraulic runs of the same network (baseline
//! vs. one link forced closed) at a shared evaluation instant:
//!
//! ```text
//! solver -> PressureSeries -> ScenarioSnapshot -> ScenarioDiff
//!        -> ImpactSummary -> SpatialLayers
//! ```
//!
//! Everything downstream of the snapshots works on anomaly-clamped
//! pressures; raw simulator values stay on the snapshot as a diagnostic
//! channel only.

pub mod classify;
pub mod diff;
pub mod error;
pub mod layers;
pub mod report;
pub mod scenario;
pub mod series;
pub mod snapshot;

pub use classify::{classify, ServiceTier, Thresholds};
pub use diff::{diff_snapshots, NodeDelta, ScenarioDiff};
pub use error::{ImpactError, ImpactResult};
pub use layers::{
    build_layers, legend, CategoricalLayer, CategoricalPoint, ContinuousLayer, ContinuousPoint,
    ScalarField, SpatialLayers, TierGroup,
};
pub use report::{build_report, ImpactSummary, NodeImpactRecord};
pub use scenario::{run_scenario, Scenario};
pub use series::{HydraulicSolver, PressureSeries, SolveError};
pub use snapshot::{clamp_pressure, snapshot_at, ScenarioSnapshot};
