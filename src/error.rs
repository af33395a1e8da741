//! Crate-level error types.
//!
//! [`WhalewatchError`] unifies every error source (configuration, HTTP,
//! JSON) behind a single enum so callers can match on the variant they
//! care about while still using the `?` operator for easy propagation.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, WhalewatchError>;

/// Top-level error type returned by all public APIs.
#[derive(Debug, thiserror::Error)]
pub enum WhalewatchError {
    /// Configuration could not be found, read, or validated.
    #[error("configuration error: {0}")]
    Config(String),

    /// An HTTP request failed, timed out, or returned a non-success status.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A local I/O operation (log file, pairs file) failed.
    #[error("io error: {0}")]
    Io(String),
}
