//! Issuer certificate loading and identity hashes.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use der::{Decode, Encode};
use sha1::{Digest, Sha1};
use thiserror::Error;
use x509_cert::Certificate;

/// Errors raised while loading issuer certificates.
#[derive(Debug, Error)]
pub enum IssuanceError {
    #[error("failed to read issuer certificate {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} contains no PEM certificate", path.display())]
    NoCertificate { path: PathBuf },

    #[error("{} contains {count} PEM certificates, expected exactly one", path.display())]
    MultipleCertificates { path: PathBuf, count: usize },

    #[error("invalid issuer certificate: {0}")]
    Der(#[from] der::Error),
}

/// Short, stable identifier for an issuer.
///
/// The first seven bytes of the SHA-1 hash of the issuer's DER subject,
/// read as a big-endian integer. Fits in a signed 64-bit column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IssuerNameId(pub i64);

impl IssuerNameId {
    fn from_name_hash(name_hash: &[u8; 20]) -> Self {
        let mut buf = [0u8; 8];
        buf[1..].copy_from_slice(&name_hash[..7]);
        Self(i64::from_be_bytes(buf))
    }
}

impl fmt::Display for IssuerNameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An issuing CA certificate and the hashes OCSP uses to refer to it.
#[derive(Debug, Clone)]
pub struct IssuerCertificate {
    certificate: Certificate,
    name_id: IssuerNameId,
    name_hash: [u8; 20],
    key_hash: [u8; 20],
}

impl IssuerCertificate {
    /// Compute the OCSP identity hashes for `certificate`.
    ///
    /// `key_hash` covers the subjectPublicKey BIT STRING contents, excluding
    /// tag, length and unused-bits octet. `name_hash` covers the DER subject.
    pub fn new(certificate: Certificate) -> Result<Self, IssuanceError> {
        let tbs = &certificate.tbs_certificate;
        let subject = tbs.subject.to_der()?;
        let name_hash: [u8; 20] = Sha1::digest(&subject).into();
        let key_hash: [u8; 20] =
            Sha1::digest(tbs.subject_public_key_info.subject_public_key.raw_bytes()).into();

        Ok(Self {
            name_id: IssuerNameId::from_name_hash(&name_hash),
            certificate,
            name_hash,
            key_hash,
        })
    }

    pub fn from_der(der: &[u8]) -> Result<Self, IssuanceError> {
        Self::new(Certificate::from_der(der)?)
    }

    /// Load a PEM file holding exactly one certificate.
    pub fn load_pem_file(path: &Path) -> Result<Self, IssuanceError> {
        let io_error = |source| IssuanceError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(io_error)?;
        let mut reader = BufReader::new(file);
        let certs = rustls_pemfile::certs(&mut reader)
            .collect::<Result<Vec<_>, _>>()
            .map_err(io_error)?;

        match certs.as_slice() {
            [cert] => Self::from_der(cert.as_ref()),
            [] => Err(IssuanceError::NoCertificate {
                path: path.to_path_buf(),
            }),
            many => Err(IssuanceError::MultipleCertificates {
                path: path.to_path_buf(),
                count: many.len(),
            }),
        }
    }

    pub fn certificate(&self) -> &Certificate {
        &self.certificate
    }

    pub fn name_id(&self) -> IssuerNameId {
        self.name_id
    }

    pub fn name_hash(&self) -> &[u8; 20] {
        &self.name_hash
    }

    pub fn key_hash(&self) -> &[u8; 20] {
        &self.key_hash
    }
}

/// Load every configured issuer, failing on the first bad file.
pub fn load_issuers(paths: &[PathBuf]) -> Result<Vec<IssuerCertificate>, IssuanceError> {
    paths
        .iter()
        .map(|path| {
            let issuer = IssuerCertificate::load_pem_file(path)?;
            tracing::info!(
                path = %path.display(),
                name_id = %issuer.name_id(),
                key_hash = %hex::encode(issuer.key_hash()),
                "Loaded issuer certificate"
            );
            Ok(issuer)
        })
        .collect()
}
