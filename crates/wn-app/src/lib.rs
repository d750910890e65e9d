//! Shared application service layer for waternet.
//!
//! One pipeline, three frontends: the CLI, the local dashboard writer and
//! the HTTP server all marshal inputs and outputs around [`analyze`] and
//! the renderers in [`render`]. Nothing here holds state between requests.

pub mod analysis;
pub mod error;
pub mod render;

pub use analysis::{
    analyze, AnalysisOutcome, AnalysisRequest, DEFAULT_EVAL_TIME_S, DEFAULT_TOP_N,
};
pub use error::{AppError, AppResult};
