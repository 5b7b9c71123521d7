//! Finite-field Diffie-Hellman key agreement.
//!
//! The initiator calls [`generate_fresh_pair`], which creates new domain
//! parameters. The responder must not do the same: it calls
//! [`generate_pair_for_peer`] with the initiator's public key so both pairs
//! live in the same group. Agreement between keys from different groups
//! fails with [`CryptoError::IncompatibleParameters`].
//!
//! [`KeyExchange`] wraps the same calls as a one-shot handshake object:
//! constructing it generates the local pair, and [`KeyExchange::finish`]
//! consumes it to produce the session key, so a pair cannot be reused for
//! a second secret.
//!
//! # Modules
//!
//! - [`params`]: domain parameter generation and validation.
//! - [`encoding`]: SubjectPublicKeyInfo / PKCS#8 encodings.
//! - [`derivation`]: shared secret to session key.

pub mod derivation;
pub mod encoding;
pub mod params;

use num_bigint_dig::BigUint;
use num_traits::One;
use zeroize::Zeroizing;

pub use derivation::SessionKeyDerivation;
pub use params::DomainParameters;

use crate::bundle::KeyBundle;
use crate::config::CryptoConfig;
use crate::error::{CryptoError, Result};
use crate::keys::{KeyMaterial, KeyPair};
use crate::random::secure_rng;
use crate::symmetric::{self, SymmetricKey};

/// Modulus size the legacy handshake generates.
pub const LEGACY_MODULUS_BITS: usize = 512;

/// Generate new domain parameters and a key pair under them.
pub fn generate_fresh_pair(modulus_bits: usize) -> Result<KeyPair> {
    let params = DomainParameters::generate(modulus_bits)?;
    generate_pair(&params)
}

/// Generate a key pair in the group described by a peer's public key.
pub fn generate_pair_for_peer(peer_public: &KeyMaterial) -> Result<KeyPair> {
    let (peer_params, y) = encoding::decode_public_key(peer_public.as_bytes())
        .map_err(|e| CryptoError::IncompatibleParameters(e.to_string()))?;
    let params = DomainParameters::from_peer(
        peer_params.prime().clone(),
        peer_params.generator().clone(),
        peer_params.private_value_bits(),
    )?;
    params.check_public_value(&y)?;
    generate_pair(&params)
}

/// Generate a key pair under known parameters.
pub fn generate_pair(params: &DomainParameters) -> Result<KeyPair> {
    let mut rng = secure_rng()?;
    let x = params.random_private_value(&mut rng);
    let y = params.public_value(&x);
    let pair = KeyPair::new(
        encoding::encode_public_key(params, &y)?,
        encoding::encode_private_key(params, &x)?,
    );
    log::debug!("generated {}-bit DH key pair", params.modulus_bits());
    Ok(pair)
}

/// Compute the raw shared secret `y_peer ^ x mod p`, big-endian and
/// left-padded with zeros to the modulus length.
pub fn agree(
    local_private: &KeyMaterial,
    peer_public: &KeyMaterial,
) -> Result<Zeroizing<Vec<u8>>> {
    let (local_params, x) = encoding::decode_private_key(local_private.as_bytes())?;
    let (peer_params, y) = encoding::decode_public_key(peer_public.as_bytes())?;

    if !local_params.same_group(&peer_params) {
        return Err(CryptoError::IncompatibleParameters(
            "local and peer keys use different DH domain parameters".into(),
        ));
    }
    local_params.check_public_value(&y)?;

    let z = Zeroizing::new(y.modpow(&x, local_params.prime()));
    if *z == BigUint::one() {
        return Err(CryptoError::IncompatibleParameters(
            "peer public value lies in a trivial subgroup".into(),
        ));
    }

    let len = local_params.modulus_len();
    let raw = Zeroizing::new(z.to_bytes_be());
    let mut padded = Zeroizing::new(vec![0u8; len]);
    padded[len - raw.len()..].copy_from_slice(&raw);
    Ok(padded)
}

/// Derive AES key bytes from the local private key and the peer's public
/// key, using the legacy truncation.
pub fn derive_shared_secret(
    local_private: &KeyMaterial,
    peer_public: &KeyMaterial,
) -> Result<KeyMaterial> {
    derive_shared_secret_with(local_private, peer_public, SessionKeyDerivation::Truncate)
}

/// Derive AES key bytes with an explicit derivation method.
pub fn derive_shared_secret_with(
    local_private: &KeyMaterial,
    peer_public: &KeyMaterial,
    method: SessionKeyDerivation,
) -> Result<KeyMaterial> {
    let shared = agree(local_private, peer_public)?;
    derivation::session_key_bytes(&shared, method).map(KeyMaterial::new)
}

/// Derive the session key and wrap it for the symmetric cipher.
pub fn derive_session_key(
    local_private: &KeyMaterial,
    peer_public: &KeyMaterial,
    method: SessionKeyDerivation,
) -> Result<SymmetricKey> {
    let bytes = derive_shared_secret_with(local_private, peer_public, method)?;
    symmetric::derive_key(bytes.as_bytes())
}

/// One side of a handshake, holding its freshly generated pair.
///
/// There is no way to get the pair back out: the private half is only
/// used once, by [`finish`](Self::finish).
#[derive(Debug)]
pub struct KeyExchange {
    pair: KeyPair,
    derivation: SessionKeyDerivation,
}

impl KeyExchange {
    /// Start a handshake as the initiator, with new domain parameters.
    pub fn initiate(modulus_bits: usize) -> Result<Self> {
        let pair = generate_fresh_pair(modulus_bits)?;
        log::debug!("key exchange initiated ({modulus_bits}-bit group)");
        Ok(Self {
            pair,
            derivation: SessionKeyDerivation::default(),
        })
    }

    /// Start a handshake as the responder, in the initiator's group.
    pub fn respond(peer_public: &KeyMaterial) -> Result<Self> {
        let pair = generate_pair_for_peer(peer_public)?;
        log::debug!("key exchange joined peer group");
        Ok(Self {
            pair,
            derivation: SessionKeyDerivation::default(),
        })
    }

    /// Initiate using the modulus size and derivation from `config`.
    pub fn initiate_with_config(config: &CryptoConfig) -> Result<Self> {
        Ok(Self::initiate(config.dh_modulus_bits)?.with_derivation(config.session_key_derivation))
    }

    /// Respond using the derivation from `config`.
    pub fn respond_with_config(config: &CryptoConfig, peer_public: &KeyMaterial) -> Result<Self> {
        Ok(Self::respond(peer_public)?.with_derivation(config.session_key_derivation))
    }

    /// Select how the shared secret becomes the session key.
    pub fn with_derivation(mut self, derivation: SessionKeyDerivation) -> Self {
        self.derivation = derivation;
        self
    }

    /// Our public key, to send to the peer.
    pub fn public_key(&self) -> &KeyMaterial {
        &self.pair.public
    }

    /// Our public key as a bundle under the canonical name.
    pub fn public_bundle(&self) -> KeyBundle {
        self.pair.public_bundle()
    }

    /// Complete the handshake with the peer's public key.
    pub fn finish(self, peer_public: &KeyMaterial) -> Result<SymmetricKey> {
        let key = derive_session_key(&self.pair.private, peer_public, self.derivation)?;
        log::debug!("key exchange complete ({:?} session key)", key.size());
        Ok(key)
    }
}
