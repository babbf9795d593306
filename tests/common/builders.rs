//! DER builders for OCSP requests, responses and issuer certificates.
//!
//! Compiled into the crate's unit tests and into the integration tests, so
//! it depends only on the encoding crates, never on `ocsp_responder` types.

#![allow(dead_code)]

use std::str::FromStr;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use der::asn1::{BitString, GeneralizedTime, Null, OctetString, UtcTime};
use der::oid::ObjectIdentifier;
use der::Encode;
use spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};
use x509_cert::certificate::Version as CertificateVersion;
use x509_cert::ext::pkix::CrlReason;
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;
use x509_cert::time::{Time, Validity};
use x509_cert::{Certificate, TbsCertificate};
use x509_ocsp::{
    BasicOcspResponse, CertId, CertStatus, OcspGeneralizedTime, OcspResponseStatus, Request, ResponderId,
    ResponseBytes, ResponseData, RevokedInfo, SingleResponse, TbsRequest, Version,
};

pub const PRODUCED_AT_SECS: u64 = 1_700_000_000;
pub const NEXT_UPDATE_SECS: u64 = PRODUCED_AT_SECS + 7 * 24 * 3600;

const ID_SHA1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.14.3.2.26");
const ID_PKIX_OCSP_BASIC: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.48.1.1");
const SHA256_WITH_RSA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.11");
const RSA_ENCRYPTION: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");

fn generalized(secs: u64) -> OcspGeneralizedTime {
    OcspGeneralizedTime(GeneralizedTime::from_unix_duration(Duration::from_secs(secs)).unwrap())
}

fn utc(secs: u64) -> Time {
    Time::UtcTime(UtcTime::from_unix_duration(Duration::from_secs(secs)).unwrap())
}

fn cert_id(
    hash_algorithm: ObjectIdentifier,
    name_hash: &[u8],
    key_hash: &[u8],
    serial: u64,
) -> CertId {
    CertId {
        hash_algorithm: AlgorithmIdentifierOwned {
            oid: hash_algorithm,
            parameters: None,
        },
        issuer_name_hash: OctetString::new(name_hash).unwrap(),
        issuer_key_hash: OctetString::new(key_hash).unwrap(),
        serial_number: SerialNumber::from(serial),
    }
}

/// DER `OCSPRequest` for one certificate.
pub fn encode_request(
    hash_algorithm: ObjectIdentifier,
    name_hash: &[u8],
    key_hash: &[u8],
    serial: u64,
) -> Vec<u8> {
    x509_ocsp::OcspRequest {
        tbs_request: TbsRequest {
            version: Version::V1,
            requestor_name: None,
            request_list: vec![Request {
                req_cert: cert_id(hash_algorithm, name_hash, key_hash, serial),
                single_request_extensions: None,
            }],
            request_extensions: None,
        },
        optional_signature: None,
    }
    .to_der()
    .unwrap()
}

/// Builder for unsigned-but-well-formed basic OCSP responses.
pub struct ResponseFixture {
    serial: u64,
    responder_key_hash: Vec<u8>,
    responder_name: Option<String>,
    revocation: Option<CrlReason>,
    next_update_secs: u64,
}

impl ResponseFixture {
    pub fn new(serial: u64, responder_key_hash: &[u8]) -> Self {
        Self {
            serial,
            responder_key_hash: responder_key_hash.to_vec(),
            responder_name: None,
            revocation: None,
            next_update_secs: NEXT_UPDATE_SECS,
        }
    }

    pub fn revoked(mut self, reason: CrlReason) -> Self {
        self.revocation = Some(reason);
        self
    }

    /// Identify the responder by subject name instead of key hash.
    pub fn by_name(mut self, name: &str) -> Self {
        self.responder_name = Some(name.to_string());
        self
    }

    /// `nextUpdate` in seconds since the epoch.
    pub fn next_update(mut self, secs: u64) -> Self {
        self.next_update_secs = secs;
        self
    }

    pub fn encode(&self) -> Vec<u8> {
        let name_hash = [0u8; 20];
        let responder_id = match &self.responder_name {
            Some(name) => ResponderId::ByName(Name::from_str(name).unwrap()),
            None => ResponderId::ByKey(OctetString::new(self.responder_key_hash.clone()).unwrap()),
        };
        let cert_status = match self.revocation {
            Some(reason) => CertStatus::Revoked(RevokedInfo {
                revocation_time: generalized(PRODUCED_AT_SECS - 3600),
                revocation_reason: Some(reason),
            }),
            None => CertStatus::Good(Null),
        };

        let basic = BasicOcspResponse {
            tbs_response_data: ResponseData {
                version: Version::V1,
                responder_id,
                produced_at: generalized(PRODUCED_AT_SECS),
                responses: vec![SingleResponse {
                    cert_id: cert_id(
                        ID_SHA1,
                        &name_hash,
                        &self.responder_key_hash,
                        self.serial,
                    ),
                    cert_status,
                    this_update: generalized(PRODUCED_AT_SECS),
                    next_update: Some(generalized(self.next_update_secs)),
                    single_extensions: None,
                }],
                response_extensions: None,
            },
            signature_algorithm: AlgorithmIdentifierOwned {
                oid: SHA256_WITH_RSA,
                parameters: None,
            },
            signature: BitString::from_bytes(&[0x5A; 64]).unwrap(),
            certs: None,
        };
        let basic_der = basic.to_der().unwrap();

        x509_ocsp::OcspResponse {
            response_status: OcspResponseStatus::Successful,
            response_bytes: Some(ResponseBytes {
                response_type: ID_PKIX_OCSP_BASIC,
                response: OctetString::new(basic_der).unwrap(),
            }),
        }
        .to_der()
        .unwrap()
    }

    pub fn encode_base64(&self) -> String {
        STANDARD.encode(self.encode())
    }
}

/// Self-issued certificate with the given common name and raw public key bits.
pub fn issuer_certificate(common_name: &str, public_key: &[u8]) -> Certificate {
    let name = Name::from_str(&format!("CN={}", common_name)).unwrap();
    let algorithm = AlgorithmIdentifierOwned {
        oid: SHA256_WITH_RSA,
        parameters: None,
    };

    Certificate {
        tbs_certificate: TbsCertificate {
            version: CertificateVersion::V3,
            serial_number: SerialNumber::from(1u64),
            signature: algorithm.clone(),
            issuer: name.clone(),
            validity: Validity {
                not_before: utc(1_600_000_000),
                not_after: utc(2_000_000_000),
            },
            subject: name,
            subject_public_key_info: SubjectPublicKeyInfoOwned {
                algorithm: AlgorithmIdentifierOwned {
                    oid: RSA_ENCRYPTION,
                    parameters: None,
                },
                subject_public_key: BitString::from_bytes(public_key).unwrap(),
            },
            issuer_unique_id: None,
            subject_unique_id: None,
            extensions: None,
        },
        signature_algorithm: algorithm,
        signature: BitString::from_bytes(&[0x5A; 64]).unwrap(),
    }
}

/// PEM armour around a DER certificate.
pub fn to_pem(certificate: &Certificate) -> String {
    let encoded = STANDARD.encode(certificate.to_der().unwrap());
    let mut pem = String::from("-----BEGIN CERTIFICATE-----\n");
    for line in encoded.as_bytes().chunks(64) {
        pem.push_str(std::str::from_utf8(line).unwrap());
        pem.push('\n');
    }
    pem.push_str("-----END CERTIFICATE-----\n");
    pem
}
