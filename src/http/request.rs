//! Request validation and identification.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4) when the caller sent none
//! - Enforce the POST-only rule
//! - Negotiate the wire format from `Content-Type`
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Both checks run before route resolution and never touch handler code

use axum::http::{header, HeaderMap, HeaderValue, Method, Request};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use uuid::Uuid;

use crate::codec::Format;
use crate::error::TwirpError;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Layer that stamps `x-request-id` on requests lacking one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(header::HeaderName::from_static(X_REQUEST_ID), MakeRequestUuid)
}

/// Layer that copies `x-request-id` onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(header::HeaderName::from_static(X_REQUEST_ID))
}

/// The request ID, or `"unknown"`.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Only POST is routed.
pub fn check_method(method: &Method) -> Result<(), TwirpError> {
    if method == Method::POST {
        Ok(())
    } else {
        Err(TwirpError::bad_route(format!(
            "unsupported method {} (only POST is allowed)",
            method
        )))
    }
}

/// Select the call format from the `Content-Type` header.
pub fn negotiate_format(headers: &HeaderMap) -> Result<Format, TwirpError> {
    let value = headers
        .get(header::CONTENT_TYPE)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .unwrap_or_default();

    Format::from_content_type(&value)
        .ok_or_else(|| TwirpError::bad_route(format!("unexpected Content-Type: {}", value)))
}
