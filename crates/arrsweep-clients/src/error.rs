//! Error types shared by every service client.

use reqwest::StatusCode;
use thiserror::Error;

/// Longest response-body excerpt kept on [`ClientError::Status`].
const BODY_EXCERPT_LIMIT: usize = 200;

/// Failure modes of a single API call.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (connection, TLS, timeout).
    #[error("{operation} failed to reach the server")]
    Transport {
        /// Method and path of the call, e.g. `GET /api/v3/movie`.
        operation: String,
        /// Source transport error.
        source: reqwest::Error,
    },
    /// The response body was not the expected JSON document.
    #[error("{operation} returned a body that could not be decoded")]
    Decode {
        /// Method and path of the call.
        operation: String,
        /// Source decoding error.
        source: serde_json::Error,
    },
    /// The server answered with a status the call does not accept.
    #[error("{operation} returned unexpected status {status}{}", body_suffix(.body))]
    Status {
        /// Method and path of the call.
        operation: String,
        /// Observed HTTP status.
        status: StatusCode,
        /// Trimmed excerpt of the response body.
        body: String,
    },
    /// The client could not be constructed or pointed at a usable URL.
    #[error("client setup failed: {reason}")]
    Setup {
        /// Human-readable reason.
        reason: String,
    },
}

/// Convenience alias for client results.
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    pub(crate) fn transport(operation: &str, source: reqwest::Error) -> Self {
        Self::Transport {
            operation: operation.to_string(),
            source,
        }
    }

    pub(crate) fn decode(operation: &str, source: serde_json::Error) -> Self {
        Self::Decode {
            operation: operation.to_string(),
            source,
        }
    }

    pub(crate) fn status(operation: &str, status: StatusCode, body: &str) -> Self {
        Self::Status {
            operation: operation.to_string(),
            status,
            body: excerpt(body),
        }
    }

    pub(crate) fn setup(reason: impl Into<String>) -> Self {
        Self::Setup {
            reason: reason.into(),
        }
    }
}

fn body_suffix(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(": {body}")
    }
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= BODY_EXCERPT_LIMIT {
        return trimmed.to_string();
    }
    let mut cut: String = trimmed.chars().take(BODY_EXCERPT_LIMIT).collect();
    cut.push('…');
    cut
}
