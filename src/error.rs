//! Error types for lucene-query.

use thiserror::Error;

/// The main error type for lucene-query operations.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The node's attribute set matches no serialization rule.
    #[error("Unhandled node shape at {path}: {shape}")]
    UnhandledShape { path: String, shape: String },

    /// A rule matched but one of its attributes has the wrong form.
    #[error("Invalid attribute '{attribute}' at {path}: {message}")]
    InvalidAttribute {
        path: String,
        attribute: String,
        message: String,
    },

    /// Malformed JSON input.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl QueryError {
    /// Create an unhandled-shape error for the node at `path`.
    pub fn unhandled(path: impl Into<String>, shape: impl Into<String>) -> Self {
        Self::UnhandledShape {
            path: path.into(),
            shape: shape.into(),
        }
    }

    /// Create an invalid-attribute error.
    pub fn invalid(
        path: impl Into<String>,
        attribute: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidAttribute {
            path: path.into(),
            attribute: attribute.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for lucene-query operations.
pub type QueryResult<T> = Result<T, QueryError>;
