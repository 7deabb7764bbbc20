//! Common identifier and digest types.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};
use std::fmt;

/// Correlation id tying together a registration attempt, its payment
/// authorization, and every log entry about it.
///
/// Generated before any persistence or processor I/O so a value exists to
/// log against even when every subsequent step fails.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorrelationId(pub String);

impl CorrelationId {
    /// Generate a fresh correlation id: `reg_<micros-hex>_<entropy-hex>`.
    pub fn generate() -> Self {
        let timestamp = Utc::now().timestamp_micros();
        let entropy: u32 = rand::random();
        Self(format!("reg_{:016x}_{:08x}", timestamp, entropy))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// External payment reference issued by the processor, or a synthetic
/// reference for free registrations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaymentRef(pub String);

impl PaymentRef {
    /// Synthetic reference for a zero-price registration. Clearly tagged so
    /// it can never be confused with a processor-issued reference.
    pub fn synthetic(correlation_id: &CorrelationId) -> Self {
        Self(format!("free_{}", correlation_id.0))
    }

    pub fn is_synthetic(&self) -> bool {
        self.0.starts_with("free_")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaymentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Submission provenance captured from the inbound request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientContext {
    pub source_ip: Option<String>,
    pub user_agent: Option<String>,
}

/// 32-byte SHA-256 digest used for integrity checksums and client-secret
/// hashes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checksum(pub [u8; 32]);

impl Checksum {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Compute the SHA-256 digest of `data`.
    pub fn sha256(data: &[u8]) -> Self {
        let digest = Sha256::digest(data);
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Zero digest (null marker, e.g. the secret hash of a free
    /// registration that never had a client secret).
    pub fn zero() -> Self {
        Self([0u8; 32])
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }
}

impl fmt::Debug for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Checksum({}...)", &self.to_hex()[..16])
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Default for Checksum {
    fn default() -> Self {
        Self::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correlation_ids_are_unique() {
        let a = CorrelationId::generate();
        let b = CorrelationId::generate();
        assert_ne!(a, b);
        assert!(a.0.starts_with("reg_"));
    }

    #[test]
    fn test_synthetic_payment_ref() {
        let correlation = CorrelationId::generate();
        let payment_ref = PaymentRef::synthetic(&correlation);
        assert!(payment_ref.is_synthetic());
        assert!(!PaymentRef("pi_123".to_string()).is_synthetic());
    }

    #[test]
    fn test_checksum_hex_roundtrip() {
        let original = Checksum::sha256(b"hello world");
        let parsed = Checksum::from_hex(&original.to_hex()).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_checksum_zero() {
        assert!(Checksum::zero().is_zero());
        assert!(!Checksum::sha256(b"x").is_zero());
    }
}
