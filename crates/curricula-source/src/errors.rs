use thiserror::Error;

/// Errors raised while fetching reference data.
///
/// Any of these aborts the whole catalog load; row-level problems are not
/// errors and surface as catalog warnings instead.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("range not found: {0}")]
    RangeNotFound(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("provider error: {0}")]
    Provider(String),
}

/// Result type for source operations.
pub type Result<T> = std::result::Result<T, SourceError>;
