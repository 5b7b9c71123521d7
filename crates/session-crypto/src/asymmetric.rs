//! RSA encryption with PKCS#8 / SubjectPublicKeyInfo key loading.
//!
//! Padding is a caller choice. [`RsaPadding::OaepSha256`] is the default;
//! [`RsaPadding::Pkcs1v15`] exists for peers that still speak the legacy
//! handshake and should not be selected otherwise.

use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::{CryptoError, Result};
use crate::keys::{KeyMaterial, KeyPair};
use crate::random::secure_rng;

/// Smallest modulus accepted for key generation.
pub const MIN_MODULUS_BITS: usize = 512;

/// Padding scheme applied to RSA plaintexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsaPadding {
    /// PKCS#1 v1.5 encryption padding (legacy peers).
    Pkcs1v15,
    /// OAEP with SHA-256 and MGF1-SHA-256.
    #[default]
    OaepSha256,
}

impl RsaPadding {
    /// Bytes of the modulus consumed by padding.
    pub fn overhead(&self) -> usize {
        match self {
            Self::Pkcs1v15 => 11,
            // 2 * hLen + 2 with hLen = 32
            Self::OaepSha256 => 66,
        }
    }
}

/// A parsed RSA public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey(RsaPublicKey);

impl PublicKey {
    /// Modulus length in bits.
    pub fn modulus_bits(&self) -> usize {
        self.0.n().bits()
    }

    /// Modulus length in bytes.
    pub fn modulus_len(&self) -> usize {
        self.0.size()
    }

    /// Re-encode as SubjectPublicKeyInfo DER.
    pub fn to_der(&self) -> Result<KeyMaterial> {
        let doc = self
            .0
            .to_public_key_der()
            .map_err(|e| CryptoError::InvalidKeyEncoding(format!("SPKI encode: {e}")))?;
        Ok(KeyMaterial::from_slice(doc.as_bytes()))
    }
}

/// A parsed RSA private key. The underlying key zeroizes itself on drop.
#[derive(Clone)]
pub struct PrivateKey(RsaPrivateKey);

impl PrivateKey {
    /// The matching public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey(RsaPublicKey::from(&self.0))
    }

    /// Modulus length in bits.
    pub fn modulus_bits(&self) -> usize {
        self.0.n().bits()
    }

    /// Re-encode as PKCS#8 DER.
    pub fn to_der(&self) -> Result<KeyMaterial> {
        let doc = self
            .0
            .to_pkcs8_der()
            .map_err(|e| CryptoError::InvalidKeyEncoding(format!("PKCS#8 encode: {e}")))?;
        Ok(KeyMaterial::from_slice(doc.as_bytes()))
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PrivateKey({} bits)", self.modulus_bits())
    }
}

/// Parse a PKCS#8 DER encoded RSA private key.
pub fn load_private_key(encoded: &[u8]) -> Result<PrivateKey> {
    let key = RsaPrivateKey::from_pkcs8_der(encoded)
        .map_err(|e| CryptoError::InvalidKeyEncoding(format!("PKCS#8 RSA private key: {e}")))?;
    log::debug!("loaded RSA private key ({} bits)", key.n().bits());
    Ok(PrivateKey(key))
}

/// Parse a SubjectPublicKeyInfo DER encoded RSA public key.
pub fn load_public_key(encoded: &[u8]) -> Result<PublicKey> {
    let key = RsaPublicKey::from_public_key_der(encoded)
        .map_err(|e| CryptoError::InvalidKeyEncoding(format!("SPKI RSA public key: {e}")))?;
    log::debug!("loaded RSA public key ({} bits)", key.n().bits());
    Ok(PublicKey(key))
}

/// Generate an RSA key pair, encoded as PKCS#8 (private) and SPKI (public).
pub fn generate_key_pair(modulus_bits: usize) -> Result<KeyPair> {
    if modulus_bits < MIN_MODULUS_BITS {
        return Err(CryptoError::InvalidKeyLength(format!(
            "RSA modulus must be at least {MIN_MODULUS_BITS} bits, got {modulus_bits}"
        )));
    }
    let mut rng = secure_rng()?;
    let key = RsaPrivateKey::new(&mut rng, modulus_bits)
        .map_err(|e| CryptoError::InvalidKeyLength(format!("RSA key generation: {e}")))?;
    let private = PrivateKey(key);
    log::debug!("generated RSA key pair ({modulus_bits} bits)");
    Ok(KeyPair::new(private.public_key().to_der()?, private.to_der()?))
}

/// Largest plaintext `encrypt` accepts for this key and padding.
pub fn max_plaintext_len(key: &PublicKey, padding: RsaPadding) -> usize {
    key.modulus_len().saturating_sub(padding.overhead())
}

/// Encrypt a short plaintext to `key`.
pub fn encrypt(plaintext: &[u8], key: &PublicKey, padding: RsaPadding) -> Result<Vec<u8>> {
    let max = max_plaintext_len(key, padding);
    if plaintext.len() > max {
        return Err(CryptoError::PlaintextTooLarge {
            len: plaintext.len(),
            max,
        });
    }

    let mut rng = secure_rng()?;
    let result = match padding {
        RsaPadding::Pkcs1v15 => key.0.encrypt(&mut rng, Pkcs1v15Encrypt, plaintext),
        RsaPadding::OaepSha256 => key.0.encrypt(&mut rng, Oaep::new::<Sha256>(), plaintext),
    };
    result.map_err(|e| match e {
        rsa::Error::MessageTooLong => CryptoError::PlaintextTooLarge {
            len: plaintext.len(),
            max,
        },
        other => CryptoError::EncryptionFailed(other.to_string()),
    })
}

/// Decrypt a ciphertext produced by [`encrypt`] with the same padding.
///
/// Every failure is reported as [`CryptoError::DecryptionFailed`].
pub fn decrypt(ciphertext: &[u8], key: &PrivateKey, padding: RsaPadding) -> Result<Vec<u8>> {
    let result = match padding {
        RsaPadding::Pkcs1v15 => key.0.decrypt(Pkcs1v15Encrypt, ciphertext),
        RsaPadding::OaepSha256 => key.0.decrypt(Oaep::new::<Sha256>(), ciphertext),
    };
    result.map_err(|_| CryptoError::DecryptionFailed)
}
