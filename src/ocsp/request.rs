//! OCSP request decoding.

use std::fmt;

use der::oid::ObjectIdentifier;
use der::Decode;

use crate::ocsp::{OcspError, Serial};

const ID_SHA1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.14.3.2.26");
const ID_SHA256: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.1");
const ID_SHA384: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.2");
const ID_SHA512: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.3");

/// Hash algorithm a `CertID` uses for its issuer name and key hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Sha1,
    Sha256,
    Sha384,
    Sha512,
    /// Any algorithm the responder has no name for.
    Other(ObjectIdentifier),
}

impl HashAlgorithm {
    pub fn from_oid(oid: ObjectIdentifier) -> Self {
        [
            (ID_SHA1, Self::Sha1),
            (ID_SHA256, Self::Sha256),
            (ID_SHA384, Self::Sha384),
            (ID_SHA512, Self::Sha512),
        ]
        .into_iter()
        .find_map(|(known, alg)| (known == oid).then_some(alg))
        .unwrap_or(Self::Other(oid))
    }

    pub fn oid(&self) -> ObjectIdentifier {
        match self {
            Self::Sha1 => ID_SHA1,
            Self::Sha256 => ID_SHA256,
            Self::Sha384 => ID_SHA384,
            Self::Sha512 => ID_SHA512,
            Self::Other(oid) => *oid,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha1 => f.write_str("SHA-1"),
            Self::Sha256 => f.write_str("SHA-256"),
            Self::Sha384 => f.write_str("SHA-384"),
            Self::Sha512 => f.write_str("SHA-512"),
            Self::Other(oid) => write!(f, "{}", oid),
        }
    }
}

/// A parsed OCSP request for a single certificate.
///
/// Only the first `Request` of an `OCSPRequest` is considered; requests for
/// several certificates at once are answered for the first one only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcspRequest {
    hash_algorithm: HashAlgorithm,
    issuer_name_hash: Vec<u8>,
    issuer_key_hash: Vec<u8>,
    serial: Serial,
}

impl OcspRequest {
    pub fn new(
        hash_algorithm: HashAlgorithm,
        issuer_name_hash: impl Into<Vec<u8>>,
        issuer_key_hash: impl Into<Vec<u8>>,
        serial: Serial,
    ) -> Self {
        Self {
            hash_algorithm,
            issuer_name_hash: issuer_name_hash.into(),
            issuer_key_hash: issuer_key_hash.into(),
            serial,
        }
    }

    /// Decode a DER `OCSPRequest`.
    pub fn from_der(bytes: &[u8]) -> Result<Self, OcspError> {
        let request = x509_ocsp::OcspRequest::from_der(bytes)?;
        let first = request
            .tbs_request
            .request_list
            .first()
            .ok_or(OcspError::EmptyRequestList)?;
        let cert_id = &first.req_cert;

        Ok(Self {
            hash_algorithm: HashAlgorithm::from_oid(cert_id.hash_algorithm.oid),
            issuer_name_hash: cert_id.issuer_name_hash.as_bytes().to_vec(),
            issuer_key_hash: cert_id.issuer_key_hash.as_bytes().to_vec(),
            serial: Serial::from_serial_number(&cert_id.serial_number)?,
        })
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
}
