//! Client-side failures.

use axum::http::StatusCode;
use thiserror::Error;

use crate::codec::CodecError;
use crate::config::ConfigError;
use crate::error::{ErrorKind, TwirpError};

/// Everything a call can fail with.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a Twirp error envelope.
    #[error(transparent)]
    Twirp(#[from] TwirpError),

    /// Connection refused, reset, timed out, or similar.
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// A 200 response whose body did not decode.
    #[error("failed to decode response: {0}")]
    Codec(#[from] CodecError),

    /// A non-200 response whose body is not a valid error envelope.
    #[error("invalid error body for status {status}: {source}")]
    ErrorBody {
        status: StatusCode,
        #[source]
        source: serde_json::Error,
    },

    /// The client configuration failed validation.
    #[error("invalid client configuration: {0}")]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// Error kind this failure surfaces as.
    pub fn code(&self) -> ErrorKind {
        match self {
            ClientError::Twirp(e) => e.kind(),
            ClientError::Http(_) => ErrorKind::Unavailable,
            ClientError::Codec(_) | ClientError::ErrorBody { .. } | ClientError::Config(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// The server-sent error, if that is what this is.
    pub fn as_twirp(&self) -> Option<&TwirpError> {
        match self {
            ClientError::Twirp(e) => Some(e),
            _ => None,
        }
    }
}
