//! Issuer-aware filtering decorator.
//!
//! # Responsibilities
//! - Refuse requests this responder is not authorized to answer
//! - Verify that whatever the wrapped source returns belongs to the issuer
//!   the request named before releasing it
//! - Record exactly one outcome per request
//!
//! # Design Decisions
//! - One table entry per configured certificate; a re-keyed issuer shares
//!   its subject (and name id) with its predecessor, so neither is a key
//! - The issuer matched at admission is carried into the response check,
//!   never re-derived from the response
//! - A responder key-hash mismatch is `ResponseMismatch`, not `NotFound`;
//!   the http layer answers it with `internalError`

use std::sync::Arc;

use async_trait::async_trait;

use crate::issuance::{IssuerCertificate, IssuerNameId};
use crate::observability::metrics::{FilterMetrics, FilterResult};
use crate::ocsp::{HashAlgorithm, OcspRequest, OcspResponse};
use crate::responder::{FilterBuildError, NotFoundCause, Source, SourceError};

/// The name and key hashes identifying one configured issuer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponderId {
    pub name_hash: Vec<u8>,
    pub key_hash: Vec<u8>,
}

impl From<&IssuerCertificate> for ResponderId {
    fn from(issuer: &IssuerCertificate) -> Self {
        Self {
            name_hash: issuer.name_hash().to_vec(),
            key_hash: issuer.key_hash().to_vec(),
        }
    }
}

#[derive(Debug, Clone)]
struct ConfiguredIssuer {
    name_id: IssuerNameId,
    responder_id: ResponderId,
}

/// Position of a matched issuer in the issuer table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct IssuerSlot(usize);

/// A [`Source`] that only answers for configured issuers and serial prefixes.
pub struct FilterSource {
    wrapped: Arc<dyn Source>,
    hash_algorithm: HashAlgorithm,
    issuers: Vec<ConfiguredIssuer>,
    serial_prefixes: Vec<String>,
    metrics: Arc<dyn FilterMetrics>,
}

impl FilterSource {
    /// Build the issuer table. Fails if `issuers` is empty.
    ///
    /// An empty `serial_prefixes` list disables prefix filtering.
    pub fn new(
        issuers: &[IssuerCertificate],
        serial_prefixes: Vec<String>,
        wrapped: Arc<dyn Source>,
        metrics: Arc<dyn FilterMetrics>,
    ) -> Result<Self, FilterBuildError> {
        if issuers.is_empty() {
            return Err(FilterBuildError::NoIssuers);
        }

        let table = issuers
            .iter()
            .map(|issuer| ConfiguredIssuer {
                name_id: issuer.name_id(),
                responder_id: ResponderId::from(issuer),
            })
            .collect();

        Ok(Self {
            wrapped,
            hash_algorithm: HashAlgorithm::Sha1,
            issuers: table,
            serial_prefixes,
            metrics,
        })
    }

    pub fn issuer_count(&self) -> usize {
        self.issuers.len()
    }

    /// Admission checks. Returns the issuer the request names.
    fn check_request(&self, request: &OcspRequest) -> Result<IssuerSlot, NotFoundCause> {
        if request.hash_algorithm() != self.hash_algorithm {
            return Err(NotFoundCause::UnsupportedHashAlgorithm(
                request.hash_algorithm(),
            ));
        }

        if !self.serial_prefixes.is_empty() {
            let serial = request.serial().to_canonical_string();
            if !self.serial_prefixes.iter().any(|p| serial.starts_with(p.as_str())) {
                return Err(NotFoundCause::UnrecognizedSerialPrefix { serial });
            }
        }

        self.issuers
            .iter()
            .position(|issuer| issuer.responder_id.key_hash.as_slice() == request.issuer_key_hash())
            .map(IssuerSlot)
            .ok_or_else(|| NotFoundCause::UnrecognizedIssuer {
                key_hash: hex::encode(request.issuer_key_hash()),
            })
    }

    /// Checks that `response` was produced for the issuer `request` named.
    fn check_response(
        &self,
        request: &OcspRequest,
        slot: IssuerSlot,
        response: &OcspResponse,
    ) -> Result<(), SourceError> {
        let issuer = self.issuers.get(slot.0).ok_or_else(|| {
            SourceError::Internal(format!("issuer slot {} missing from issuer table", slot.0))
        })?;

        if response.responder_key_hash() != issuer.responder_id.key_hash.as_slice() {
            tracing::warn!(
                issuer_key_hash = %hex::encode(request.issuer_key_hash()),
                issuer_name_hash = %hex::encode(&issuer.responder_id.name_hash),
                issuer_name_id = %issuer.name_id,
                responder_key_hash = %hex::encode(response.responder_key_hash()),
                serial = %request.serial().to_canonical_string(),
                "OCSP response filtered: responder does not match requested issuer"
            );
            return Err(SourceError::ResponseMismatch {
                issuer_key_hash: hex::encode(request.issuer_key_hash()),
                serial: request.serial().to_canonical_string(),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl Source for FilterSource {
    async fn response(&self, request: &OcspRequest) -> Result<Arc<OcspResponse>, SourceError> {
        let slot = match self.check_request(request) {
            Ok(slot) => slot,
            Err(cause) => {
                tracing::debug!(reason = %cause, "Not responding to filtered OCSP request");
                self.metrics.record(FilterResult::RequestFiltered);
                return Err(SourceError::NotFound(cause));
            }
        };

        let response = match self.wrapped.response(request).await {
            Ok(response) => response,
            Err(e) => {
                self.metrics.record(FilterResult::WrappedError);
                return Err(e);
            }
        };

        if let Err(e) = self.check_response(request, slot, &response) {
            if let SourceError::Internal(_) = e {
                tracing::error!(error = %e, "OCSP response filtered");
            }
            self.metrics.record(FilterResult::ResponseFiltered);
            return Err(e);
        }

        self.metrics.record(FilterResult::Success);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::ocsp::fixtures::{self, ResponseFixture};
    use crate::ocsp::Serial;
    use crate::responder::InMemorySource;

    #[derive(Default)]
    struct RecordingMetrics(Mutex<Vec<FilterResult>>);

    impl RecordingMetrics {
        fn results(&self) -> Vec<FilterResult> {
            self.0.lock().unwrap().clone()
        }
    }

    impl FilterMetrics for RecordingMetrics {
        fn record(&self, result: FilterResult) {
            self.0.lock().unwrap().push(result);
        }
    }

    fn issuer(common_name: &str, key: u8) -> IssuerCertificate {
        IssuerCertificate::new(fixtures::issuer_certificate(common_name, &[key; 64])).unwrap()
    }

    fn response(serial: u64, responder_key_hash: &[u8]) -> OcspResponse {
        OcspResponse::from_der(ResponseFixture::new(serial, responder_key_hash).encode()).unwrap()
    }

    fn request(alg: HashAlgorithm, issuer: &IssuerCertificate, serial: u64) -> OcspRequest {
        OcspRequest::new(
            alg,
            issuer.name_hash().to_vec(),
            issuer.key_hash().to_vec(),
            Serial::from(serial),
        )
    }

    fn filter(
        issuers: &[IssuerCertificate],
        prefixes: &[&str],
        responses: Vec<OcspResponse>,
    ) -> (FilterSource, Arc<RecordingMetrics>) {
        let metrics = Arc::new(RecordingMetrics::default());
        let source = FilterSource::new(
            issuers,
            prefixes.iter().map(|p| p.to_string()).collect(),
            Arc::new(InMemorySource::from_responses(responses)),
            metrics.clone(),
        )
        .unwrap();
        (source, metrics)
    }

    #[test]
    fn test_new_requires_issuers() {
        let result = FilterSource::new(
            &[],
            vec![],
            Arc::new(InMemorySource::default()),
            Arc::new(RecordingMetrics::default()),
        );
        assert!(matches!(result, Err(FilterBuildError::NoIssuers)));
    }

    #[test]
    fn test_new_populates_every_issuer() {
        let a = issuer("Issuer A", 0x01);
        let b = issuer("Issuer B", 0x02);
        let (source, _) = filter(&[a.clone(), b.clone()], &[], vec![]);

        assert_eq!(source.issuer_count(), 2);
        assert_eq!(source.check_request(&request(HashAlgorithm::Sha1, &a, 1)), Ok(IssuerSlot(0)));
        assert_eq!(source.check_request(&request(HashAlgorithm::Sha1, &b, 1)), Ok(IssuerSlot(1)));
    }

    #[test]
    fn test_rekeyed_issuer_keeps_both_entries() {
        let old = issuer("Intermediate R3", 0x01);
        let new = issuer("Intermediate R3", 0x02);
        assert_eq!(old.name_id(), new.name_id());

        let (source, _) = filter(&[old.clone(), new.clone()], &[], vec![]);
        assert_eq!(source.issuer_count(), 2);
        assert_eq!(source.check_request(&request(HashAlgorithm::Sha1, &old, 1)), Ok(IssuerSlot(0)));
        assert_eq!(source.check_request(&request(HashAlgorithm::Sha1, &new, 1)), Ok(IssuerSlot(1)));
    }

    #[test]
    fn test_check_request_hash_algorithm() {
        let a = issuer("Issuer A", 0x01);
        let (source, _) = filter(&[a.clone()], &[], vec![]);

        assert_eq!(
            source.check_request(&request(HashAlgorithm::Sha256, &a, 1)),
            Err(NotFoundCause::UnsupportedHashAlgorithm(HashAlgorithm::Sha256))
        );
    }

    #[test]
    fn test_check_request_serial_prefix() {
        let a = issuer("Issuer A", 0x01);
        // Canonical form of 0x2a is 34 zeros then "2a".
        let (source, _) = filter(&[a.clone()], &["00", "ff"], vec![]);
        assert!(source.check_request(&request(HashAlgorithm::Sha1, &a, 0x2a)).is_ok());

        let (source, _) = filter(&[a.clone()], &["ff"], vec![]);
        assert!(matches!(
            source.check_request(&request(HashAlgorithm::Sha1, &a, 0x2a)),
            Err(NotFoundCause::UnrecognizedSerialPrefix { .. })
        ));
    }

    #[test]
    fn test_check_request_unknown_issuer() {
        let a = issuer("Issuer A", 0x01);
        let b = issuer("Issuer B", 0x02);
        let (source, _) = filter(&[a], &[], vec![]);

        assert_eq!(
            source.check_request(&request(HashAlgorithm::Sha1, &b, 1)),
            Err(NotFoundCause::UnrecognizedIssuer {
                key_hash: hex::encode(b.key_hash()),
            })
        );
    }

    #[tokio::test]
    async fn test_matching_response_is_released_unchanged() {
        let a = issuer("Issuer A", 0x01);
        let stored = response(1, a.key_hash());
        let (source, metrics) = filter(&[a.clone()], &[], vec![stored.clone()]);

        let found = source.response(&request(HashAlgorithm::Sha1, &a, 1)).await.unwrap();
        assert_eq!(found.raw(), stored.raw());
        assert_eq!(metrics.results(), vec![FilterResult::Success]);
    }

    #[tokio::test]
    async fn test_response_from_other_issuer_is_rejected() {
        let a = issuer("Issuer A", 0x01);
        let b = issuer("Issuer B", 0x02);
        let (source, metrics) = filter(&[a.clone(), b.clone()], &[], vec![response(1, b.key_hash())]);

        let err = source
            .response(&request(HashAlgorithm::Sha1, &a, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::ResponseMismatch { .. }));
        assert!(!err.is_not_found());
        assert_eq!(metrics.results(), vec![FilterResult::ResponseFiltered]);
    }

    #[tokio::test]
    async fn test_wrapped_not_found_is_counted_and_passed_through() {
        let a = issuer("Issuer A", 0x01);
        let (source, metrics) = filter(&[a.clone()], &[], vec![]);

        let err = source
            .response(&request(HashAlgorithm::Sha1, &a, 99))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::NotFound(NotFoundCause::NoResponse)));
        assert_eq!(metrics.results(), vec![FilterResult::WrappedError]);
    }

    #[test]
    fn test_check_response_with_missing_issuer_is_internal() {
        let a = issuer("Issuer A", 0x01);
        let (source, _) = filter(&[a.clone()], &[], vec![]);

        let err = source
            .check_response(
                &request(HashAlgorithm::Sha1, &a, 1),
                IssuerSlot(7),
                &response(1, a.key_hash()),
            )
            .unwrap_err();
        assert!(matches!(err, SourceError::Internal(_)));
    }
}
