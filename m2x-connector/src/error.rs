//! Error types for the connector.

use thiserror::Error;

/// Errors from one connector invocation.
///
/// Read-path callers treat everything except [`ConnectorError::State`] as a
/// reason to yield and let the scheduler try again later; a failed cursor
/// write is the one failure that must surface, since losing track of
/// progress silently would re-deliver the whole backlog on every run.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// Response body did not match the expected window schema.
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    /// The remote API answered with a non-success status.
    #[error("remote API returned status {status}: {message}")]
    Remote { status: u16, message: String },

    /// The request never completed (connection or timeout failure).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The cursor state store could not be read or written.
    #[error(transparent)]
    State(#[from] StateError),
}

impl From<reqwest::Error> for ConnectorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ConnectorError::Transport("request timed out".to_string())
        } else {
            ConnectorError::Transport(err.to_string())
        }
    }
}

/// Failure of the persisted state collaborator.
#[derive(Debug, Error)]
pub enum StateError {
    /// Reading or writing the backing store failed.
    #[error("state I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The stored document could not be decoded or encoded.
    #[error("state format invalid: {0}")]
    Format(#[from] serde_json::Error),

    /// The store cannot be reached at all.
    #[error("state store unavailable: {0}")]
    Unavailable(String),
}
