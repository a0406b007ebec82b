use thiserror::Error;

/// Errors emitted by the validation engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The request body is not JSON at all. Unrecognized selection shapes
    /// inside valid JSON never reach this.
    #[error("invalid request: {0}")]
    Request(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
