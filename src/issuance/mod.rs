//! Issuer certificates the responder answers for.
//!
//! # Data Flow
//! ```text
//! PEM files (config: filter.issuer_certs)
//!     → certificate.rs (PEM → DER → x509 Certificate)
//!     → IssuerCertificate (name id, SHA-1 name hash, SHA-1 key hash)
//!     → responder::filter (issuer table, built once)
//! ```
//!
//! # Design Decisions
//! - Hashes are computed once at load time and never recomputed per request
//! - One certificate per PEM file; anything else is a startup error

pub mod certificate;

pub use certificate::{load_issuers, IssuanceError, IssuerCertificate, IssuerNameId};
