//! OCSP response decoding and canned error responses.

use std::time::SystemTime;

use bytes::Bytes;
use der::{Decode, Encode};
use x509_cert::ext::pkix::CrlReason;
use x509_ocsp::{BasicOcspResponse, OcspResponseStatus};

use crate::ocsp::{HashAlgorithm, OcspError, Serial, ID_PKIX_OCSP_BASIC};

/// How the responder identified itself in `tbsResponseData`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponderIdentity {
    /// `byKey`: SHA-1 of the responder's public key.
    ByKey(Vec<u8>),
    /// `byName`: DER encoding of the responder's subject name.
    ByName(Vec<u8>),
}

/// Certificate status carried by the single response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertStatus {
    Good,
    Revoked {
        revoked_at: SystemTime,
        reason: Option<CrlReason>,
    },
    Unknown,
}

/// A pre-signed OCSP response together with its exact encoding.
///
/// `raw` is what gets sent to relying parties. The decoded fields exist so
/// that the responder can check the response before releasing it; they are
/// never re-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcspResponse {
    raw: Bytes,
    responder: ResponderIdentity,
    hash_algorithm: HashAlgorithm,
    issuer_name_hash: Vec<u8>,
    issuer_key_hash: Vec<u8>,
    serial: Serial,
    status: CertStatus,
    produced_at: SystemTime,
    this_update: SystemTime,
    next_update: Option<SystemTime>,
}

impl OcspResponse {
    /// Decode a DER `OCSPResponse`.
    ///
    /// Only successful basic responses covering exactly one certificate are
    /// accepted. The signature is not checked.
    pub fn from_der(raw: impl Into<Bytes>) -> Result<Self, OcspError> {
        let raw = raw.into();
        // Decoded structures borrow from `encoded`; `raw` moves into the result.
        let encoded = raw.clone();
        let outer = x509_ocsp::OcspResponse::from_der(&encoded)?;
        if outer.response_status != OcspResponseStatus::Successful {
            return Err(OcspError::UnsuccessfulStatus(outer.response_status));
        }

        let response_bytes = outer
            .response_bytes
            .ok_or(OcspError::MissingResponseBytes)?;
        if response_bytes.response_type != ID_PKIX_OCSP_BASIC {
            return Err(OcspError::UnsupportedResponseType(
                response_bytes.response_type,
            ));
        }

        let basic = BasicOcspResponse::from_der(response_bytes.response.as_bytes())?;
        let data = basic.tbs_response_data;

        let responder = match &data.responder_id {
            x509_ocsp::ResponderId::ByKey(hash) => {
                ResponderIdentity::ByKey(hash.as_bytes().to_vec())
            }
            x509_ocsp::ResponderId::ByName(name) => ResponderIdentity::ByName(name.to_der()?),
        };

        let single = match data.responses.as_slice() {
            [single] => single,
            others => return Err(OcspError::SingleResponseCount(others.len())),
        };

        let status = match &single.cert_status {
            x509_ocsp::CertStatus::Good(_) => CertStatus::Good,
            x509_ocsp::CertStatus::Revoked(info) => CertStatus::Revoked {
                revoked_at: info.revocation_time.0.to_system_time(),
                reason: info.revocation_reason,
            },
            x509_ocsp::CertStatus::Unknown(_) => CertStatus::Unknown,
        };

        let cert_id = &single.cert_id;
        let hash_algorithm = HashAlgorithm::from_oid(cert_id.hash_algorithm.oid);
        let issuer_name_hash = cert_id.issuer_name_hash.as_bytes().to_vec();
        let issuer_key_hash = cert_id.issuer_key_hash.as_bytes().to_vec();
        let serial = Serial::from_serial_number(&cert_id.serial_number)?;
        let produced_at = data.produced_at.0.to_system_time();
        let this_update = single.this_update.0.to_system_time();
        let next_update = single.next_update.map(|t| t.0.to_system_time());

        Ok(Self {
            raw,
            responder,
            hash_algorithm,
            issuer_name_hash,
            issuer_key_hash,
            serial,
            status,
            produced_at,
            this_update,
            next_update,
        })
    }

    /// The encoded response, exactly as it was loaded.
    pub fn raw(&self) -> &Bytes {
        &self.raw
    }

    pub fn responder(&self) -> &ResponderIdentity {
        &self.responder
    }

    /// The responder key hash, or an empty slice when the responder is
    /// identified by name.
    pub fn responder_key_hash(&self) -> &[u8] {
        match &self.responder {
            ResponderIdentity::ByKey(hash) => hash,
            ResponderIdentity::ByName(_) => &[],
        }
    }

    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash_algorithm
    }

    pub fn issuer_name_hash(&self) -> &[u8] {
        &self.issuer_name_hash
    }

    pub fn issuer_key_hash(&self) -> &[u8] {
        &self.issuer_key_hash
    }

    pub fn serial(&self) -> &Serial {
        &self.serial
    }

    pub fn status(&self) -> CertStatus {
        self.status
    }

    pub fn produced_at(&self) -> SystemTime {
        self.produced_at
    }

    pub fn this_update(&self) -> SystemTime {
        self.this_update
    }

    pub fn next_update(&self) -> Option<SystemTime> {
        self.next_update
    }
}

/// Unsigned error responses (RFC 6960 Section 2.3).
///
/// These carry only a `responseStatus` and are sent instead of a signed
/// response when the responder cannot or will not answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcspErrorResponse {
    MalformedRequest,
    InternalError,
    TryLater,
    SigRequired,
    Unauthorized,
}

impl OcspErrorResponse {
    /// DER encoding: `SEQUENCE { ENUMERATED status }`.
    pub const fn as_der(self) -> &'static [u8] {
        match self {
            Self::MalformedRequest => &[0x30, 0x03, 0x0a, 0x01, 0x01],
            Self::InternalError => &[0x30, 0x03, 0x0a, 0x01, 0x02],
            Self::TryLater => &[0x30, 0x03, 0x0a, 0x01, 0x03],
            Self::SigRequired => &[0x30, 0x03, 0x0a, 0x01, 0x05],
            Self::Unauthorized => &[0x30, 0x03, 0x0a, 0x01, 0x06],
        }
    }

    pub fn status(self) -> OcspResponseStatus {
        match self {
            Self::MalformedRequest => OcspResponseStatus::MalformedRequest,
            Self::InternalError => OcspResponseStatus::InternalError,
            Self::TryLater => OcspResponseStatus::TryLater,
            Self::SigRequired => OcspResponseStatus::SigRequired,
            Self::Unauthorized => OcspResponseStatus::Unauthorized,
        }
    }
}
