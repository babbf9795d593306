//! Errors returned by response sources.

use std::fmt;

use thiserror::Error;

use crate::ocsp::HashAlgorithm;

/// Why a source had nothing to return.
///
/// Callers treat every cause the same way; the cause exists for logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFoundCause {
    UnsupportedHashAlgorithm(HashAlgorithm),
    UnrecognizedSerialPrefix { serial: String },
    UnrecognizedIssuer { key_hash: String },
    NoResponse,
}

impl fmt::Display for NotFoundCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedHashAlgorithm(alg) => {
                write!(f, "unsupported issuer key/name hash algorithm {}", alg)
            }
            Self::UnrecognizedSerialPrefix { serial } => {
                write!(f, "unrecognized serial prefix for {}", serial)
            }
            Self::UnrecognizedIssuer { key_hash } => {
                write!(f, "unrecognized issuer key hash {}", key_hash)
            }
            Self::NoResponse => f.write_str("no response for this serial"),
        }
    }
}

/// Errors a [`Source`](crate::responder::Source) can return per request.
#[derive(Debug, Error)]
pub enum SourceError {
    /// No applicable response. Relying parties get `unauthorized`.
    #[error("no OCSP response available: {0}")]
    NotFound(NotFoundCause),

    /// The backing store returned a response from a different issuer than
    /// the one the request named.
    #[error("responder does not match requested issuer (issuer key hash {issuer_key_hash}, serial {serial})")]
    ResponseMismatch {
        issuer_key_hash: String,
        serial: String,
    },

    /// Broken internal invariant.
    #[error("internal consistency error: {0}")]
    Internal(String),

    /// Opaque failure of a backing store.
    #[error("response source failed: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl SourceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn backend(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Backend(err.into())
    }
}

/// Errors building a [`FilterSource`](crate::responder::FilterSource).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterBuildError {
    #[error("filter must include at least 1 issuer cert")]
    NoIssuers,
}
