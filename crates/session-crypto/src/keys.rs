//! Key material containers.
//!
//! [`KeyMaterial`] is an owned, encoded key (PKCS#8, SubjectPublicKeyInfo
//! or raw symmetric bytes). It is zeroized on drop and never printed.
//! [`KeyPair`] groups the two halves produced by key generation.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::bundle::KeyBundle;
use crate::error::{CryptoError, Result};

/// Bundle name of the public half of a key pair.
pub const PUBLIC_KEY_NAME: &str = "public_key";

/// Bundle name of the private half of a key pair.
pub const PRIVATE_KEY_NAME: &str = "private_key";

/// Encoded key bytes.
///
/// The bytes are wiped when the value is dropped.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial(Vec<u8>);

impl KeyMaterial {
    /// Wrap encoded key bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Copy encoded key bytes out of a slice.
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }

    /// Borrow the encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Standard base64 rendering, for callers that carry keys as text.
    pub fn to_base64(&self) -> String {
        base64::Engine::encode(&base64::engine::general_purpose::STANDARD, &self.0)
    }

    /// Parse a standard base64 rendering.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        base64::Engine::decode(&base64::engine::general_purpose::STANDARD, encoded)
            .map(Self)
            .map_err(|e| CryptoError::InvalidKeyEncoding(format!("invalid base64 key: {e}")))
    }
}

impl AsRef<[u8]> for KeyMaterial {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for KeyMaterial {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for KeyMaterial {
    fn from(bytes: &[u8]) -> Self {
        Self::from_slice(bytes)
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyMaterial({} bytes)", self.0.len())
    }
}

/// A public/private key pair, both halves encoded.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct KeyPair {
    pub public: KeyMaterial,
    pub private: KeyMaterial,
}

impl KeyPair {
    pub fn new(public: KeyMaterial, private: KeyMaterial) -> Self {
        Self { public, private }
    }

    /// Bundle under the canonical `public_key` / `private_key` names.
    pub fn to_bundle(&self) -> KeyBundle {
        let mut bundle = KeyBundle::new();
        bundle.insert(PUBLIC_KEY_NAME, self.public.clone());
        bundle.insert(PRIVATE_KEY_NAME, self.private.clone());
        bundle
    }

    /// Bundle holding only the public half, for sending to a peer.
    pub fn public_bundle(&self) -> KeyBundle {
        let mut bundle = KeyBundle::new();
        bundle.insert(PUBLIC_KEY_NAME, self.public.clone());
        bundle
    }

    /// Recover a pair from a bundle holding both canonical names.
    pub fn from_bundle(bundle: &KeyBundle) -> Result<Self> {
        let public = bundle.get(PUBLIC_KEY_NAME).ok_or_else(|| {
            CryptoError::MalformedBundle(format!("missing entry '{PUBLIC_KEY_NAME}'"))
        })?;
        let private = bundle.get(PRIVATE_KEY_NAME).ok_or_else(|| {
            CryptoError::MalformedBundle(format!("missing entry '{PRIVATE_KEY_NAME}'"))
        })?;
        Ok(Self::new(public.clone(), private.clone()))
    }
}
