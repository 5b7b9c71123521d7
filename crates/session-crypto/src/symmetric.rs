//! AES encryption for session payloads.
//!
//! # Legacy mode
//!
//! Payloads are encrypted with AES in ECB mode with PKCS#7 padding and no
//! IV, which is the format existing peers expect. Identical plaintexts
//! under the same key produce identical ciphertexts, and nothing
//! authenticates the ciphertext. Callers that need semantic security or
//! integrity must layer their own IV and MAC over this module; changing
//! the mode here would change the wire format.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyInit};
use aes::{Aes128, Aes192, Aes256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CryptoError, Result};
use crate::random::fill_random;

/// AES block length in bytes.
pub const BLOCK_LEN: usize = 16;

/// Supported AES key sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySize {
    Aes128,
    Aes192,
    Aes256,
}

impl KeySize {
    /// Key length in bytes.
    pub fn len(&self) -> usize {
        match self {
            Self::Aes128 => 16,
            Self::Aes192 => 24,
            Self::Aes256 => 32,
        }
    }

    /// Map a key length in bytes to a key size.
    pub fn from_len(len: usize) -> Option<Self> {
        match len {
            16 => Some(Self::Aes128),
            24 => Some(Self::Aes192),
            32 => Some(Self::Aes256),
            _ => None,
        }
    }

    /// Largest key size that fits in `available` bytes.
    pub fn largest_fitting(available: usize) -> Option<Self> {
        [Self::Aes256, Self::Aes192, Self::Aes128]
            .into_iter()
            .find(|size| size.len() <= available)
    }
}

/// An AES key whose length has been validated. Zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey {
    #[zeroize(skip)]
    size: KeySize,
    bytes: Vec<u8>,
}

impl SymmetricKey {
    /// Generate a random key of the given size.
    pub fn generate(size: KeySize) -> Result<Self> {
        let mut bytes = vec![0u8; size.len()];
        fill_random(&mut bytes)?;
        Ok(Self { size, bytes })
    }

    pub fn size(&self) -> KeySize {
        self.size
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SymmetricKey({:?})", self.size())
    }
}

/// Wrap raw bytes as an AES key. Accepts 16, 24 or 32 bytes.
pub fn derive_key(raw: &[u8]) -> Result<SymmetricKey> {
    let size = KeySize::from_len(raw.len()).ok_or_else(|| {
        CryptoError::InvalidKeyLength(format!(
            "AES key must be 16, 24 or 32 bytes, got {}",
            raw.len()
        ))
    })?;
    Ok(SymmetricKey {
        size,
        bytes: raw.to_vec(),
    })
}

/// Encrypt with AES-ECB and PKCS#7 padding.
///
/// Output length is the plaintext length rounded up to the next full block
/// (a full padding block is added when already aligned).
pub fn encrypt(plaintext: &[u8], key: &SymmetricKey) -> Vec<u8> {
    let k = key.as_bytes();
    match key.size() {
        KeySize::Aes128 => {
            ecb::Encryptor::<Aes128>::new(k.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext)
        }
        KeySize::Aes192 => {
            ecb::Encryptor::<Aes192>::new(k.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext)
        }
        KeySize::Aes256 => {
            ecb::Encryptor::<Aes256>::new(k.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext)
        }
    }
}

/// Decrypt AES-ECB ciphertext and strip PKCS#7 padding.
///
/// Every failure is reported as [`CryptoError::DecryptionFailed`].
pub fn decrypt(ciphertext: &[u8], key: &SymmetricKey) -> Result<Vec<u8>> {
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
        return Err(CryptoError::DecryptionFailed);
    }
    let k = key.as_bytes();
    let result = match key.size() {
        KeySize::Aes128 => {
            ecb::Decryptor::<Aes128>::new(k.into()).decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        }
        KeySize::Aes192 => {
            ecb::Decryptor::<Aes192>::new(k.into()).decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        }
        KeySize::Aes256 => {
            ecb::Decryptor::<Aes256>::new(k.into()).decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        }
    };
    result.map_err(|_| CryptoError::DecryptionFailed)
}
