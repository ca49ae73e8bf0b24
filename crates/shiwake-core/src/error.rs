use thiserror::Error;

/// Errors that can occur while building or configuring the engine.
///
/// Extraction itself never fails: malformed filenames degrade to
/// `Unknown`/`None` attributes instead of producing an error.
#[derive(Debug, Error)]
pub enum ShiwakeError {
    /// A vocabulary pattern failed to compile (should not happen with the
    /// built-in vocabulary).
    #[error("regex compilation error: {0}")]
    Regex(#[from] regex::Error),

    /// The duplicate priority list is empty or repeats a criterion.
    #[error("invalid duplicate priority: {0}")]
    InvalidPriority(String),

    /// A configuration value was rejected before scanning started.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for shiwake operations.
pub type Result<T> = std::result::Result<T, ShiwakeError>;
