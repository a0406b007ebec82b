use thiserror::Error;

/// Core error type shared across Curricula crates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A cell holds a value outside a closed vocabulary.
    #[error("unknown {kind} '{value}'")]
    UnknownValue { kind: &'static str, value: String },
}

/// Convenience alias for results returned by Curricula crates.
pub type Result<T> = std::result::Result<T, Error>;
