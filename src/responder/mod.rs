//! Response sources.
//!
//! # Data Flow
//! ```text
//! OcspRequest (decoded by http layer)
//!     → filter.rs (check hash algorithm, serial prefix, issuer key hash)
//!     → wrapped Source (e.g. memory.rs: serial → pre-signed response)
//!     → filter.rs (check responder key hash against the requested issuer)
//!     → Arc<OcspResponse> released to the caller
//! ```
//!
//! # Design Decisions
//! - Every backend and decorator implements the same `Source` trait
//! - Decorators own their inner source as `Arc<dyn Source>`
//! - Sources are immutable after construction; no locking on the hot path
//! - Cancellation is future drop: a decorator awaiting its inner source
//!   cancels it by being dropped

pub mod error;
pub mod filter;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::ocsp::{OcspRequest, OcspResponse};

pub use error::{FilterBuildError, NotFoundCause, SourceError};
pub use filter::{FilterSource, ResponderId};
pub use memory::{InMemorySource, LoadedResponses};

/// The logical source of OCSP responses: the logic that chooses a response
/// for a request.
///
/// Implementations signal "nothing to say about this certificate" with
/// [`SourceError::NotFound`]; storage failures use any other variant.
#[async_trait]
pub trait Source: Send + Sync {
    async fn response(&self, request: &OcspRequest) -> Result<Arc<OcspResponse>, SourceError>;
}

