//! Error types for the analysis pipeline.

use thiserror::Error;

use crate::series::SolveError;

pub type ImpactResult<T> = Result<T, ImpactError>;

#[derive(Error, Debug)]
pub enum ImpactError {
    #[error(transparent)]
    Solve(#[from] SolveError),

    #[error("simulation returned no sampled instants for {scenario}")]
    EmptyResults { scenario: String },

    #[error("scenario instants diverged: baseline at {base_s} s, intervention at {closed_s} s")]
    TimeMismatch { base_s: u32, closed_s: u32 },

    #[error("invalid thresholds: {what}")]
    InvalidThresholds { what: String },

    #[error("top_n must be a positive integer")]
    InvalidTopN,
}
