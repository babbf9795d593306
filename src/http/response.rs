//! Response construction.
//!
//! # Responsibilities
//! - Send pre-signed responses byte-for-byte with caching headers
//! - Map source errors to canned OCSP error responses
//!
//! # Design Decisions
//! - Not-found is `200 unauthorized`, as RFC 5019 clients expect
//! - Anything else that went wrong is `500 internalError`

use std::time::SystemTime;

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::ocsp::{OcspErrorResponse, OcspResponse};
use crate::responder::SourceError;

pub const OCSP_RESPONSE_CONTENT_TYPE: &str = "application/ocsp-response";

/// Metric label for each kind of outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Malformed,
    NotFound,
    Error,
}

impl Outcome {
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Malformed => "malformed",
            Self::NotFound => "not_found",
            Self::Error => "error",
        }
    }
}

/// Seconds until `next_update`, or zero if it is absent or already passed.
pub fn max_age(next_update: Option<SystemTime>, now: SystemTime) -> u64 {
    next_update
        .and_then(|t| t.duration_since(now).ok())
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// `200` with the stored encoding of `response`.
pub fn success(response: &OcspResponse, now: SystemTime) -> Response {
    let cache_control = format!(
        "max-age={}, public, no-transform, must-revalidate",
        max_age(response.next_update(), now)
    );

    let mut res = Response::new(Body::from(response.raw().clone()));
    let headers = res.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(OCSP_RESPONSE_CONTENT_TYPE),
    );
    if let Ok(value) = HeaderValue::from_str(&cache_control) {
        headers.insert(header::CACHE_CONTROL, value);
    }
    res
}

/// An unsigned error response with the given HTTP status.
pub fn canned(status: StatusCode, body: OcspErrorResponse) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, OCSP_RESPONSE_CONTENT_TYPE)],
        body.as_der(),
    )
        .into_response()
}

pub fn malformed() -> Response {
    canned(StatusCode::OK, OcspErrorResponse::MalformedRequest)
}

/// Response and metric label for a failed source lookup.
pub fn from_source_error(err: &SourceError) -> (Outcome, Response) {
    if err.is_not_found() {
        (
            Outcome::NotFound,
            canned(StatusCode::OK, OcspErrorResponse::Unauthorized),
        )
    } else {
        (
            Outcome::Error,
            canned(
                StatusCode::INTERNAL_SERVER_ERROR,
                OcspErrorResponse::InternalError,
            ),
        )
    }
}
