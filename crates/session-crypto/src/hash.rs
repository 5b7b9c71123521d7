//! Salted SHA-256 digests.
//!
//! The salt is absorbed into the hash state before the message. This is
//! not the same as hashing `salt || message` through a different API on
//! every peer, so the ordering must stay exactly as implemented here for
//! stored hashes to keep verifying.

use std::fmt;
use std::str::FromStr;

use sha2::{Digest as _, Sha256};
use subtle::ConstantTimeEq;

use crate::error::{CryptoError, Result};

/// Length of a digest in bytes.
pub const DIGEST_LEN: usize = 32;

/// Digest algorithms understood by the hasher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DigestAlgorithm {
    #[default]
    Sha256,
}

impl DigestAlgorithm {
    /// Canonical algorithm name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sha256 => "SHA-256",
        }
    }
}

impl FromStr for DigestAlgorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sha-256" | "sha256" | "sha_256" => Ok(Self::Sha256),
            _ => Err(CryptoError::UnsupportedDigest(s.to_string())),
        }
    }
}

/// A 256-bit salted digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Lowercase hex, two digits per byte, no separators.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl From<Digest> for [u8; DIGEST_LEN] {
    fn from(d: Digest) -> Self {
        d.0
    }
}

/// Hash `message` under `salt`: salt is absorbed first, then the message.
pub fn digest(message: &[u8], salt: &[u8]) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(message);
    Digest(hasher.finalize().into())
}

/// Salted digest rendered as lowercase hex.
pub fn digest_hex(message: &[u8], salt: &[u8]) -> String {
    digest(message, salt).to_hex()
}

/// Salted digest as raw bytes.
pub fn digest_bytes(message: &[u8], salt: &[u8]) -> [u8; DIGEST_LEN] {
    digest(message, salt).into()
}

/// Check `message` and `salt` against a stored hex digest.
///
/// The comparison runs in constant time. Malformed hex never matches.
pub fn verify_hex(message: &[u8], salt: &[u8], expected_hex: &str) -> bool {
    let Ok(expected) = hex::decode(expected_hex) else {
        return false;
    };
    let actual = digest(message, salt);
    actual.as_bytes().as_slice().ct_eq(expected.as_slice()).into()
}
