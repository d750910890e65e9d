//! Unified error surface for frontends.

use thiserror::Error;
use wn_impact::ImpactError;
use wn_model::ModelError;

pub type AppResult<T> = Result<T, AppError>;

/// Wraps backend errors into one type the frontends can match on.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("analysis error: {0}")]
    Impact(#[from] ImpactError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// True for failures caused by the request itself (bad model text,
    /// unknown link, malformed configuration) as opposed to solver or
    /// environment trouble. The HTTP adapter maps this to 4xx vs 5xx.
    pub fn is_invalid_request(&self) -> bool {
        matches!(
            self,
            AppError::Model(ModelError::Parse { .. })
                | AppError::Model(ModelError::LinkNotFound { .. })
                | AppError::Impact(ImpactError::InvalidThresholds { .. })
                | AppError::Impact(ImpactError::InvalidTopN)
        )
    }
}
