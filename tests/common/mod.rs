//! Shared fixtures for integration tests.
//!
//! DER construction lives in `builders.rs`, which the crate's unit tests
//! compile too. This module adds helpers over the crate's own types and
//! test doubles for the filter's collaborators.

#![allow(dead_code)]

pub mod builders;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

pub use builders::{ResponseFixture, NEXT_UPDATE_SECS, PRODUCED_AT_SECS};

use ocsp_responder::issuance::IssuerCertificate;
use ocsp_responder::observability::metrics::{FilterMetrics, FilterResult};
use ocsp_responder::ocsp::{HashAlgorithm, OcspRequest, OcspResponse, Serial};
use ocsp_responder::responder::{Source, SourceError};

/// An issuer whose public key bits are `key` repeated.
pub fn issuer(common_name: &str, key: u8) -> IssuerCertificate {
    IssuerCertificate::new(builders::issuer_certificate(common_name, &[key; 64])).unwrap()
}

/// DER `OCSPRequest` naming `issuer` and `serial`.
pub fn request_der(alg: HashAlgorithm, issuer: &IssuerCertificate, serial: u64) -> Vec<u8> {
    builders::encode_request(alg.oid(), issuer.name_hash(), issuer.key_hash(), serial)
}

/// Parsed request naming `issuer` and `serial`.
pub fn request(alg: HashAlgorithm, issuer: &IssuerCertificate, serial: u64) -> OcspRequest {
    OcspRequest::new(
        alg,
        issuer.name_hash().to_vec(),
        issuer.key_hash().to_vec(),
        Serial::from(serial),
    )
}

/// Decoded response for `serial` whose responder is identified by key hash.
pub fn response(serial: u64, responder_key_hash: &[u8]) -> OcspResponse {
    OcspResponse::from_der(ResponseFixture::new(serial, responder_key_hash).encode()).unwrap()
}

/// Wraps a source and counts how often it is consulted.
pub struct CountingSource<S> {
    inner: S,
    calls: AtomicUsize,
}

impl<S> CountingSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<S: Source> Source for CountingSource<S> {
    async fn response(&self, request: &OcspRequest) -> Result<Arc<OcspResponse>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.response(request).await
    }
}

/// A source that always fails with a backend error.
pub struct FailingSource;

#[async_trait]
impl Source for FailingSource {
    async fn response(&self, _request: &OcspRequest) -> Result<Arc<OcspResponse>, SourceError> {
        Err(SourceError::backend("storage unavailable"))
    }
}

/// Records every outcome in order.
#[derive(Default)]
pub struct RecordingMetrics {
    results: Mutex<Vec<FilterResult>>,
}

impl RecordingMetrics {
    pub fn results(&self) -> Vec<FilterResult> {
        self.results.lock().unwrap().clone()
    }
}

impl FilterMetrics for RecordingMetrics {
    fn record(&self, result: FilterResult) {
        self.results.lock().unwrap().push(result);
    }
}
