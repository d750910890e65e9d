//! Error types for model loading and mutation.

use std::path::PathBuf;
use thiserror::Error;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("failed to read model file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed model input at line {line}: {what}")]
    Parse { line: usize, what: String },

    #[error("link '{id}' not found in model")]
    LinkNotFound { id: String },
}
