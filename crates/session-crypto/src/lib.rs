//! session-crypto — cryptographic primitives for a client/server session
//! handshake.
//!
//! Provides secure nonces, salted SHA-256 digests, a length-prefixed key
//! bundle format, AES with PKCS#7 padding, RSA encryption with selectable
//! padding, and finite-field Diffie-Hellman key agreement.
//!
//! Every operation is a synchronous free function with no shared state, so
//! everything here is safe to call from any thread.

pub mod asymmetric;
pub mod bundle;
pub mod config;
pub mod error;
pub mod exchange;
pub mod hash;
pub mod keys;
pub mod random;
pub mod symmetric;

// Re-export primary types
pub use bundle::KeyBundle;
pub use config::CryptoConfig;
pub use error::{CryptoError, Result};
pub use keys::{KeyMaterial, KeyPair};

// Re-export per-primitive types
pub use asymmetric::{PrivateKey, PublicKey, RsaPadding};
pub use exchange::{KeyExchange, SessionKeyDerivation};
pub use hash::{Digest, DigestAlgorithm};
pub use symmetric::{KeySize, SymmetricKey};
