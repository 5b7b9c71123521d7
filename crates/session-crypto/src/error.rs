//! Error types for session-crypto.
//!
//! All errors are strongly typed and propagated without panicking.
//! Key material and plaintext never appear in error messages.

/// Error kinds covering every primitive in the crate.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("Secure random source unavailable: {0}")]
    EntropyUnavailable(String),

    #[error("Invalid key length: {0}")]
    InvalidKeyLength(String),

    #[error("Invalid key encoding: {0}")]
    InvalidKeyEncoding(String),

    #[error("Incompatible key parameters: {0}")]
    IncompatibleParameters(String),

    #[error("Plaintext too large: {len} bytes exceeds the {max} byte limit")]
    PlaintextTooLarge { len: usize, max: usize },

    /// Deliberately carries no detail: wrong key, bad padding and
    /// truncated input must be indistinguishable to the caller.
    #[error("Decryption failed")]
    DecryptionFailed,

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Malformed key bundle: {0}")]
    MalformedBundle(String),

    #[error("Unsupported digest: {0}")]
    UnsupportedDigest(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, CryptoError>;
