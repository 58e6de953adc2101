//! Twirp error model.
//!
//! # Responsibilities
//! - Define the closed set of error kinds and their wire codes
//! - Map each kind to an HTTP status
//! - Convert between `TwirpError` and the `{code, msg}` JSON envelope
//!
//! # Design Decisions
//! - Error bodies are always JSON, whatever encoding the call used
//! - Unknown codes received over the wire collapse to `internal`
//! - Arbitrary failures become `internal` with their message preserved

use std::fmt;
use std::str::FromStr;

use axum::http::StatusCode;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error kinds understood by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No handler for the method, verb or content type.
    BadRoute,
    /// Request body could not be decoded in the negotiated format.
    Malformed,
    /// Unexpected failure inside the handler.
    Internal,
    NotFound,
    InvalidArgument,
    Unauthenticated,
    PermissionDenied,
    Unavailable,
    Unimplemented,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 9] = [
        ErrorKind::BadRoute,
        ErrorKind::Malformed,
        ErrorKind::Internal,
        ErrorKind::NotFound,
        ErrorKind::InvalidArgument,
        ErrorKind::Unauthenticated,
        ErrorKind::PermissionDenied,
        ErrorKind::Unavailable,
        ErrorKind::Unimplemented,
    ];

    /// Wire code for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::BadRoute => "bad_route",
            ErrorKind::Malformed => "malformed",
            ErrorKind::Internal => "internal",
            ErrorKind::NotFound => "not_found",
            ErrorKind::InvalidArgument => "invalid_argument",
            ErrorKind::Unauthenticated => "unauthenticated",
            ErrorKind::PermissionDenied => "permission_denied",
            ErrorKind::Unavailable => "unavailable",
            ErrorKind::Unimplemented => "unimplemented",
        }
    }

    /// HTTP status written for this kind.
    pub fn http_status(&self) -> StatusCode {
        match self {
            ErrorKind::BadRoute | ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Malformed | ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
            ErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Unimplemented => StatusCode::NOT_IMPLEMENTED,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the known wire codes.
#[derive(Debug, Error)]
#[error("unknown error code: {0}")]
pub struct UnknownCode(pub String);

impl FromStr for ErrorKind {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownCode(s.to_string()))
    }
}

impl Serialize for ErrorKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ErrorKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(code.parse().unwrap_or(ErrorKind::Internal))
    }
}

/// The JSON error envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireError {
    pub code: ErrorKind,
    #[serde(default)]
    pub msg: String,
}

/// A failure carrying a Twirp error kind and message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {msg}")]
pub struct TwirpError {
    kind: ErrorKind,
    msg: String,
}

impl TwirpError {
    pub fn new(kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            msg: msg.into(),
        }
    }

    pub fn bad_route(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRoute, msg)
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Malformed, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, msg)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, msg)
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, msg)
    }

    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthenticated, msg)
    }

    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::PermissionDenied, msg)
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unavailable, msg)
    }

    pub fn unimplemented(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unimplemented, msg)
    }

    /// Map an arbitrary failure to `internal`, keeping its message.
    pub fn from_failure(err: &(dyn std::error::Error + 'static)) -> Self {
        let msg = err.to_string();
        if msg.is_empty() {
            Self::internal("internal error")
        } else {
            Self::internal(msg)
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The wire code, e.g. `"bad_route"`.
    pub fn code(&self) -> &'static str {
        self.kind.as_str()
    }

    pub fn msg(&self) -> &str {
        &self.msg
    }

    pub fn status(&self) -> StatusCode {
        self.kind.http_status()
    }

    pub fn to_wire(&self) -> WireError {
        WireError {
            code: self.kind,
            msg: self.msg.clone(),
        }
    }

    pub fn from_wire(wire: WireError) -> Self {
        Self::new(wire.code, wire.msg)
    }

    /// Compact JSON encoding of the envelope.
    pub fn to_json(&self) -> Vec<u8> {
        serde_json::to_vec(&self.to_wire()).unwrap_or_else(|_| {
            br#"{"code":"internal","msg":"failed to encode error"}"#.to_vec()
        })
    }
}

impl From<WireError> for TwirpError {
    fn from(wire: WireError) -> Self {
        Self::from_wire(wire)
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for TwirpError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Self::from_failure(err.as_ref())
    }
}
