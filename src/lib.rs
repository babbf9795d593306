//! OCSP responder serving pre-signed responses.
//!
//! Pre-signed responses are loaded into memory and served only through a
//! filter that checks every request against the configured issuers, and
//! every response against the issuer the request named.

pub mod config;
pub mod http;
pub mod issuance;
pub mod lifecycle;
pub mod observability;
pub mod ocsp;
pub mod responder;

pub use config::ResponderConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use responder::{FilterSource, InMemorySource, Source, SourceError};
