//! Session key derivation from a DH shared secret.
//!
//! The default, [`SessionKeyDerivation::Truncate`], takes the leading
//! bytes of the big-endian shared secret (padded to the modulus length) as
//! the AES key. That is what existing peers compute, and it applies no
//! key-derivation function at all. [`SessionKeyDerivation::HkdfSha256`]
//! runs the same bytes through HKDF-SHA256 instead; both sides must agree
//! on it out of band.

use hkdf::Hkdf;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::{CryptoError, Result};
use crate::symmetric::KeySize;

/// HKDF info string for session keys. Must remain stable across versions.
pub const SESSION_KEY_CONTEXT: &str = "session-crypto/dh-session-key";

/// How the padded shared secret becomes key bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKeyDerivation {
    /// Leading bytes of the shared secret, used directly.
    #[default]
    Truncate,
    /// HKDF-SHA256 over the shared secret with [`SESSION_KEY_CONTEXT`].
    HkdfSha256,
}

/// Derive `len` bytes from input key material with HKDF-SHA256.
pub fn hkdf_expand(ikm: &[u8], context: &str, len: usize) -> Result<Vec<u8>> {
    let hk = Hkdf::<Sha256>::new(None, ikm);
    let mut output = vec![0u8; len];
    hk.expand(context.as_bytes(), &mut output)
        .map_err(|e| CryptoError::InvalidKeyLength(format!("HKDF expand failed: {e}")))?;
    Ok(output)
}

/// Turn a modulus-length shared secret into AES key bytes.
///
/// The key size is the largest AES size that fits in the secret, which is
/// 32 bytes for every supported modulus.
pub fn session_key_bytes(shared_secret: &[u8], method: SessionKeyDerivation) -> Result<Vec<u8>> {
    let size = KeySize::largest_fitting(shared_secret.len()).ok_or_else(|| {
        CryptoError::IncompatibleParameters(format!(
            "shared secret of {} bytes is too short for an AES key",
            shared_secret.len()
        ))
    })?;
    match method {
        SessionKeyDerivation::Truncate => Ok(shared_secret[..size.len()].to_vec()),
        SessionKeyDerivation::HkdfSha256 => {
            hkdf_expand(shared_secret, SESSION_KEY_CONTEXT, size.len())
        }
    }
}
