use folio_layout::BreakError;
use folio_traits::SourceError;
use thiserror::Error;

/// Errors of a typesetting run, from reading a job to breaking its units.
#[derive(Error, Debug)]
pub enum FolioError {
    #[error("Breaking failed: {0}")]
    Break(#[from] BreakError),

    #[error("Source failed: {0}")]
    Source(#[from] SourceError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Job is invalid: {0}")]
    Job(String),
}
