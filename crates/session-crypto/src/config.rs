//! Runtime choices for the primitives that have more than one mode.
//!
//! The crate reads no files or environment variables. Callers build a
//! [`CryptoConfig`] in code or parse one from JSON they loaded themselves.

use serde::{Deserialize, Serialize};

use crate::asymmetric::RsaPadding;
use crate::error::{CryptoError, Result};
use crate::exchange::params::validate_modulus_bits;
use crate::exchange::{SessionKeyDerivation, LEGACY_MODULUS_BITS};
use crate::hash::DigestAlgorithm;

/// Modulus size for freshly generated DH groups.
pub const DEFAULT_DH_MODULUS_BITS: usize = 2048;

/// Algorithm selection shared by both sides of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptoConfig {
    /// RSA encryption padding.
    pub rsa_padding: RsaPadding,
    /// Modulus size used when this side initiates a key exchange.
    pub dh_modulus_bits: usize,
    /// How the DH shared secret becomes the session key.
    pub session_key_derivation: SessionKeyDerivation,
    /// Digest name, e.g. `"SHA-256"`.
    pub digest: String,
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            rsa_padding: RsaPadding::default(),
            dh_modulus_bits: DEFAULT_DH_MODULUS_BITS,
            session_key_derivation: SessionKeyDerivation::default(),
            digest: DigestAlgorithm::Sha256.name().to_string(),
        }
    }
}

impl CryptoConfig {
    /// Settings that interoperate with peers still on PKCS#1 v1.5 and
    /// 512-bit groups.
    pub fn legacy() -> Self {
        Self {
            rsa_padding: RsaPadding::Pkcs1v15,
            dh_modulus_bits: LEGACY_MODULUS_BITS,
            session_key_derivation: SessionKeyDerivation::Truncate,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| CryptoError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| CryptoError::InvalidConfig(e.to_string()))
    }

    /// Check every field. An unknown digest name is reported as
    /// [`CryptoError::UnsupportedDigest`].
    pub fn validate(&self) -> Result<()> {
        validate_modulus_bits(self.dh_modulus_bits)
            .map_err(|e| CryptoError::InvalidConfig(e.to_string()))?;
        self.digest_algorithm()?;

        if self.rsa_padding == RsaPadding::Pkcs1v15 {
            log::warn!("RSA PKCS#1 v1.5 padding selected; use OAEP unless a peer requires it");
        }
        if self.dh_modulus_bits < DEFAULT_DH_MODULUS_BITS {
            log::warn!(
                "DH modulus of {} bits is below the {DEFAULT_DH_MODULUS_BITS}-bit default",
                self.dh_modulus_bits
            );
        }
        Ok(())
    }

    /// The configured digest.
    pub fn digest_algorithm(&self) -> Result<DigestAlgorithm> {
        self.digest.parse()
    }
}
