//! OCSP wire types.
//!
//! # Data Flow
//! ```text
//! DER bytes (HTTP body / bulk file)
//!     → request.rs (OCSPRequest → OcspRequest, first CertID only)
//!     → response.rs (OCSPResponse → OcspResponse, raw bytes kept verbatim)
//!     → serial.rs (INTEGER contents → Serial, decimal and canonical hex forms)
//! ```
//!
//! # Design Decisions
//! - Decoding is delegated to `x509-ocsp`; only the fields the responder
//!   inspects are copied out into owned types
//! - The encoded response is the authoritative wire form; decoded fields are
//!   for validation only and are never re-encoded
//! - Signatures are not verified here; responses come pre-signed from the CA

pub mod request;
pub mod response;
pub mod serial;

#[cfg(test)]
#[path = "../../tests/common/builders.rs"]
pub(crate) mod fixtures;

use der::oid::ObjectIdentifier;
use thiserror::Error;
use x509_ocsp::OcspResponseStatus;

pub use request::{HashAlgorithm, OcspRequest};
pub use response::{CertStatus, OcspErrorResponse, OcspResponse, ResponderIdentity};
pub use serial::Serial;

/// `id-pkix-ocsp-basic` (RFC 6960 Section 4.2.1).
pub const ID_PKIX_OCSP_BASIC: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.48.1.1");

/// Errors produced while decoding OCSP structures.
#[derive(Debug, Error)]
pub enum OcspError {
    /// The bytes are not valid DER for the expected structure.
    #[error("DER decoding failed: {0}")]
    Der(#[from] der::Error),

    /// An OCSP request without any `Request` entries.
    #[error("OCSP request contains no certificate requests")]
    EmptyRequestList,

    /// The response carries an error status instead of response bytes.
    #[error("OCSP response status is {0:?}")]
    UnsuccessfulStatus(OcspResponseStatus),

    /// A successful response without `responseBytes`.
    #[error("OCSP response carries no response bytes")]
    MissingResponseBytes,

    /// Only `id-pkix-ocsp-basic` responses are understood.
    #[error("unsupported OCSP response type {0}")]
    UnsupportedResponseType(ObjectIdentifier),

    /// Responses must cover exactly one certificate.
    #[error("OCSP response contains {0} single responses, expected exactly one")]
    SingleResponseCount(usize),
}
