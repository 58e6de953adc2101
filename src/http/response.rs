//! Response construction.
//!
//! # Responsibilities
//! - Write encoded success bodies with matching `Content-Type`
//! - Map `TwirpError` to status + JSON envelope
//! - Always set an exact `Content-Length`
//!
//! # Design Decisions
//! - Bodies are fully buffered before the response is returned
//! - Error bodies are JSON for every call format

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;

use crate::codec::{Format, CONTENT_TYPE_JSON};
use crate::error::TwirpError;

/// 200 response carrying an encoded message.
pub fn encoded(format: Format, body: Bytes) -> Response {
    buffered(StatusCode::OK, format.content_type(), body)
}

fn buffered(status: StatusCode, content_type: &'static str, body: Bytes) -> Response {
    let length = body.len();
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));
    response
}

impl IntoResponse for TwirpError {
    fn into_response(self) -> Response {
        buffered(self.status(), CONTENT_TYPE_JSON, Bytes::from(self.to_json()))
    }
}
