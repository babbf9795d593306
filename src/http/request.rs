//! Request decoding.
//!
//! # Responsibilities
//! - Turn a POST body or GET path into an `OcspRequest`
//! - Pull the request ID out of the headers for logging
//!
//! # Design Decisions
//! - GET paths are standard base64; a `+` that arrived as a space is restored
//! - Anything that does not decode is reported as malformed, never as an error

use axum::http::HeaderMap;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

use crate::ocsp::{OcspError, OcspRequest};

pub const X_REQUEST_ID: &str = "x-request-id";

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("request path could not be extracted: {0}")]
    Path(String),

    #[error("request path is not base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("request is not a valid OCSP request: {0}")]
    Ocsp(#[from] OcspError),
}

/// Decode the DER body of a POST request.
pub fn decode_post(body: &[u8]) -> Result<OcspRequest, RequestError> {
    Ok(OcspRequest::from_der(body)?)
}

/// Decode the percent-decoded path of a GET request, without its leading `/`.
pub fn decode_get(encoded: &str) -> Result<OcspRequest, RequestError> {
    let encoded = encoded.replace(' ', "+");
    let der = STANDARD.decode(encoded.trim_start_matches('/'))?;
    Ok(OcspRequest::from_der(&der)?)
}

pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}
