//! In-memory response source.
//!
//! Maps serial numbers to pre-signed responses with no issuer awareness at
//! all. Safe to expose only behind a [`FilterSource`](super::FilterSource).

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::ocsp::{OcspRequest, OcspResponse};
use crate::responder::{NotFoundCause, Source, SourceError};

/// Result of parsing a bulk response file.
#[derive(Debug, Default)]
pub struct LoadedResponses {
    /// Responses keyed by decimal serial number.
    pub responses: HashMap<String, Arc<OcspResponse>>,
    /// Tokens that failed base64 or OCSP decoding.
    pub rejected: usize,
}

impl LoadedResponses {
    /// Parse whitespace-separated base64 DER responses.
    ///
    /// Bad tokens are logged and skipped; they never abort the load. That
    /// includes tokens that are not valid UTF-8. A later response for the
    /// same serial replaces an earlier one.
    pub fn parse(contents: impl AsRef<[u8]>) -> Self {
        let mut loaded = Self::default();

        let tokens = contents
            .as_ref()
            .split(|b| b.is_ascii_whitespace())
            .filter(|token| !token.is_empty());

        for token in tokens {
            let der = match STANDARD.decode(token) {
                Ok(der) => der,
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        token = %String::from_utf8_lossy(token),
                        "Base64 decode error"
                    );
                    loaded.rejected += 1;
                    continue;
                }
            };

            match OcspResponse::from_der(der) {
                Ok(response) => {
                    loaded
                        .responses
                        .insert(response.serial().to_string(), Arc::new(response));
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        token = %String::from_utf8_lossy(token),
                        "OCSP decode error"
                    );
                    loaded.rejected += 1;
                }
            }
        }

        loaded
    }
}

/// A map from serial number to response, with no safety checks.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    responses: HashMap<String, Arc<OcspResponse>>,
}

impl InMemorySource {
    /// Wrap a map keyed by decimal serial number.
    pub fn new(responses: HashMap<String, Arc<OcspResponse>>) -> Self {
        Self { responses }
    }

    /// Key each response by its own serial number.
    pub fn from_responses(responses: impl IntoIterator<Item = OcspResponse>) -> Self {
        let responses = responses
            .into_iter()
            .map(|r| (r.serial().to_string(), Arc::new(r)))
            .collect();
        Self { responses }
    }

    /// Read a bulk response file into memory.
    ///
    /// The file holds whitespace-separated, base64-encoded DER OCSP
    /// responses (PEM bodies without headers). Invalid entries are skipped.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let contents = std::fs::read(path)?;
        let loaded = LoadedResponses::parse(contents);

        tracing::info!(
            path = %path.display(),
            rejected = loaded.rejected,
            "Read {} OCSP responses",
            loaded.responses.len()
        );
        Ok(Self::new(loaded.responses))
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

#[async_trait]
impl Source for InMemorySource {
    /// Looks up purely by serial number, whatever issuer the request names.
    async fn response(&self, request: &OcspRequest) -> Result<Arc<OcspResponse>, SourceError> {
        self.responses
            .get(&request.serial().to_string())
            .cloned()
            .ok_or(SourceError::NotFound(NotFoundCause::NoResponse))
    }
}
