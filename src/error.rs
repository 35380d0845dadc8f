use thiserror::Error;

/// Errors raised while generating a single wheel structure. None of them are
/// retried; a failure aborts that structure only, so a caller iterating over
/// several structures can catch per structure and continue.
#[derive(Debug, Error)]
pub enum WheelError {
    /// Invalid or contradictory level configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The input tree violates a documented constraint.
    #[error("validation error: {0}")]
    Validation(String),

    /// The requested structure name is not present in the input document.
    #[error("lookup failure: {0}")]
    Lookup(String),

    /// Malformed input shape or a broken internal invariant.
    #[error("structure error: {0}")]
    Structure(String),
}
