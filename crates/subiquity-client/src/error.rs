//! Client error type.

use subiquity_types::DecodeError;

use crate::endpoint::Endpoint;

/// Errors from talking to the backend.
///
/// `method` is the client operation name (e.g. `"storage_v2"`), not the
/// HTTP verb.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("transport is not open")]
    NotOpen,

    #[error("failed to connect to backend at {endpoint}: {source}")]
    Connect {
        endpoint: Endpoint,
        source: std::io::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] hyper::Error),

    #[error("failed to build request: {0}")]
    Request(#[from] hyper::http::Error),

    #[error("{method}: failed to encode request: {source}")]
    Encode {
        method: &'static str,
        source: serde_json::Error,
    },

    #[error("{method}: response body is not UTF-8: {source}")]
    Utf8 {
        method: &'static str,
        source: std::string::FromUtf8Error,
    },

    /// The backend answered with a status other than 200.
    #[error("{method} failed with status {status}: {body}")]
    Status {
        method: &'static str,
        status: u16,
        body: String,
    },

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl ClientError {
    /// HTTP status of a [`ClientError::Status`] failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
