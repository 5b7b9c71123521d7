//! Secure random number generation.
//!
//! Every byte comes from the operating system's cryptographic random
//! source (`OsRng`). Failures of that source are surfaced as
//! [`CryptoError::EntropyUnavailable`] instead of panicking.

use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng};

use crate::error::{CryptoError, Result};

/// Nonce size exchanged by legacy peers during the handshake.
pub const DEFAULT_NONCE_BITS: usize = 128;

/// Fill a buffer with cryptographically secure random bytes.
pub fn fill_random(buf: &mut [u8]) -> Result<()> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|e| CryptoError::EntropyUnavailable(e.to_string()))
}

/// Generate a fixed-size array of cryptographically secure random bytes.
pub fn random_bytes<const N: usize>() -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    fill_random(&mut buf)?;
    Ok(buf)
}

/// Generate a nonce of `length_bits / 8` random bytes.
///
/// `length_bits` must be a whole number of bytes.
pub fn nonce(length_bits: usize) -> Result<Vec<u8>> {
    if length_bits % 8 != 0 {
        return Err(CryptoError::InvalidKeyLength(format!(
            "nonce length must be a multiple of 8 bits, got {length_bits}"
        )));
    }
    let mut buf = vec![0u8; length_bits / 8];
    fill_random(&mut buf)?;
    Ok(buf)
}

/// A CSPRNG seeded from the operating system, for bulk generation
/// (prime search, private exponents, RSA padding).
pub fn secure_rng() -> Result<StdRng> {
    StdRng::from_rng(OsRng).map_err(|e| CryptoError::EntropyUnavailable(e.to_string()))
}

/// Generate a 128-bit nonce.
pub fn default_nonce() -> Result<[u8; 16]> {
    random_bytes()
}
