//! Error types for refparse.

use thiserror::Error;

/// Result type for refparse operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for refparse operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A fragment is missing an attribute or carries an invalid confidence.
    #[error("Malformed fragment: {0}")]
    MalformedFragment(String),

    /// The fragment classifier could not label a fragment.
    #[error("Classification failed: {0}")]
    Classification(String),

    /// Resolver or evaluator configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Evaluation error.
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a malformed fragment error.
    pub fn malformed_fragment(msg: impl Into<String>) -> Self {
        Error::MalformedFragment(msg.into())
    }

    /// Create a classification error.
    pub fn classification(msg: impl Into<String>) -> Self {
        Error::Classification(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create an evaluation error.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Error::Evaluation(msg.into())
    }
}
