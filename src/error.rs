//! Error types for hparam-schema
//!
//! The taxonomy mirrors the status codes a serving layer maps these to:
//! a caller can always tell "nothing there" apart from "bad request" apart
//! from "scan refused". Partial schemas are never returned.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// hparam-schema error types
#[derive(Error, Debug)]
pub enum Error {
    /// Requested experiment has no sessions and no declared schema
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed or untyped hyperparameter value, or disallowed experiment ID
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Session scan cap exceeded (fail fast rather than truncate the schema)
    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    /// Unexpected shape from the log provider (e.g. unparseable session record)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Provider-side storage failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
