//! Application errors.

use folio_core::FolioError;
use folio_render::ExportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    State(#[from] FolioError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("Configuration error: {0}")]
    Config(String),
    /// The action cannot be carried out in the current session.
    #[error("Invalid action: {0}")]
    InvalidAction(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type AppResult<T> = Result<T, AppError>;
