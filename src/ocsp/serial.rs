//! Certificate serial numbers.

use std::fmt;

use der::asn1::AnyRef;
use der::{Decode, Encode};
use num_bigint::BigInt;
use x509_cert::serial_number::SerialNumber;

/// Width of the canonical hex form, enough for a 144-bit serial.
const CANONICAL_HEX_WIDTH: usize = 36;

/// A certificate serial number as an arbitrary-precision integer.
///
/// Two string forms are used across the responder:
/// - `Display` is decimal; in-memory sources key their maps on it.
/// - [`Serial::to_canonical_string`] is zero-padded lowercase hex; serial
///   prefix filters and log lines use it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Serial(BigInt);

impl Serial {
    /// Build a serial from big-endian two's complement bytes, i.e. the
    /// contents octets of a DER INTEGER.
    pub fn from_signed_bytes(bytes: &[u8]) -> Self {
        Self(BigInt::from_signed_bytes_be(bytes))
    }

    /// Convert a decoded `CertificateSerialNumber`.
    ///
    /// The value is re-read from its DER encoding so that the sign and any
    /// leading zero octet are interpreted exactly as they appear on the wire.
    pub fn from_serial_number(serial: &SerialNumber) -> der::Result<Self> {
        let encoded = serial.to_der()?;
        let integer = AnyRef::from_der(&encoded)?;
        Ok(Self::from_signed_bytes(integer.value()))
    }

    /// Lowercase hex, left-padded with zeros to 36 characters.
    pub fn to_canonical_string(&self) -> String {
        format!("{:0width$x}", self.0, width = CANONICAL_HEX_WIDTH)
    }
}

impl From<u64> for Serial {
    fn from(value: u64) -> Self {
        Self(BigInt::from(value))
    }
}

impl fmt::Display for Serial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
