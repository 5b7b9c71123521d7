//! Finite-field Diffie-Hellman domain parameters.
//!
//! Fresh parameters are generated in the DSA style: a prime `q`, a prime
//! modulus `p = k*q + 1` with an even cofactor `k`, and a generator `g` of
//! the order-`q` subgroup. Only `(p, g)` and the private value length
//! travel on the wire.

use num_bigint_dig::prime::probably_prime;
use num_bigint_dig::{BigUint, RandBigInt, RandPrime};
use num_traits::One;
use rand::Rng;
use zeroize::Zeroizing;

use crate::error::{CryptoError, Result};
use crate::random::secure_rng;

/// Smallest accepted modulus size in bits.
pub const MIN_MODULUS_BITS: usize = 512;

/// Largest accepted modulus size in bits.
pub const MAX_MODULUS_BITS: usize = 8192;

/// Miller-Rabin rounds used when generating a modulus.
const GENERATION_ROUNDS: usize = 20;

/// Miller-Rabin rounds used when checking a peer's modulus.
const PEER_CHECK_ROUNDS: usize = 4;

/// Check a requested modulus size: a multiple of 64 within bounds.
pub fn validate_modulus_bits(bits: usize) -> Result<()> {
    if !(MIN_MODULUS_BITS..=MAX_MODULUS_BITS).contains(&bits) || bits % 64 != 0 {
        return Err(CryptoError::InvalidKeyLength(format!(
            "DH modulus must be a multiple of 64 between {MIN_MODULUS_BITS} and \
             {MAX_MODULUS_BITS} bits, got {bits}"
        )));
    }
    Ok(())
}

/// Subgroup order size for a modulus size.
fn subgroup_bits(modulus_bits: usize) -> usize {
    match modulus_bits {
        0..=1024 => 160,
        1025..=2048 => 224,
        _ => 256,
    }
}

/// Private exponent length used when the parameters do not carry one.
fn default_private_value_bits(modulus_bits: usize) -> u32 {
    (subgroup_bits(modulus_bits) + 64) as u32
}

/// The `(p, g)` pair shared by both sides of an exchange, plus the
/// private value length `l` from PKCS#3.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomainParameters {
    prime: BigUint,
    generator: BigUint,
    private_value_bits: Option<u32>,
}

impl DomainParameters {
    /// Generate new parameters with a `modulus_bits` prime.
    pub fn generate(modulus_bits: usize) -> Result<Self> {
        validate_modulus_bits(modulus_bits)?;
        let mut rng = secure_rng()?;
        let one = BigUint::one();

        let q_bits = subgroup_bits(modulus_bits);
        let q = rng.gen_prime(q_bits);

        // Even cofactor with its top bit set, so p = k*q + 1 is odd and
        // lands on the requested size often enough.
        let k_bits = modulus_bits - q_bits;
        let prime = loop {
            let k = (rng.gen_biguint(k_bits - 2) + (BigUint::one() << (k_bits - 2))) << 1;
            let p = &k * &q + &one;
            if p.bits() == modulus_bits && probably_prime(&p, GENERATION_ROUNDS) {
                break p;
            }
        };

        let cofactor = (&prime - &one) / &q;
        let mut h = BigUint::from(2u32);
        let generator = loop {
            let g = h.modpow(&cofactor, &prime);
            if g != one {
                break g;
            }
            h += &one;
        };

        log::debug!("generated {modulus_bits}-bit DH domain parameters");
        Ok(Self {
            prime,
            generator,
            private_value_bits: Some(default_private_value_bits(modulus_bits)),
        })
    }

    /// Build parameters received from a peer, rejecting values no honest
    /// peer would send.
    pub fn from_parts(
        prime: BigUint,
        generator: BigUint,
        private_value_bits: Option<u32>,
    ) -> Result<Self> {
        let one = BigUint::one();
        let bits = prime.bits();
        if !(MIN_MODULUS_BITS..=MAX_MODULUS_BITS).contains(&bits) {
            return Err(CryptoError::IncompatibleParameters(format!(
                "DH modulus of {bits} bits is outside the supported range"
            )));
        }
        if generator <= one || generator >= &prime - &one {
            return Err(CryptoError::IncompatibleParameters(
                "DH generator out of range".into(),
            ));
        }
        if let Some(l) = private_value_bits {
            if l < 2 || l as usize >= bits {
                return Err(CryptoError::IncompatibleParameters(format!(
                    "DH private value length {l} invalid for a {bits}-bit modulus"
                )));
            }
        }
        Ok(Self {
            prime,
            generator,
            private_value_bits,
        })
    }

    /// Like [`from_parts`](Self::from_parts), additionally testing the
    /// modulus for primality.
    pub fn from_peer(
        prime: BigUint,
        generator: BigUint,
        private_value_bits: Option<u32>,
    ) -> Result<Self> {
        let params = Self::from_parts(prime, generator, private_value_bits)?;
        if !probably_prime(&params.prime, PEER_CHECK_ROUNDS) {
            return Err(CryptoError::IncompatibleParameters(
                "DH modulus is not prime".into(),
            ));
        }
        Ok(params)
    }

    pub fn prime(&self) -> &BigUint {
        &self.prime
    }

    pub fn generator(&self) -> &BigUint {
        &self.generator
    }

    /// The PKCS#3 `privateValueLength`, if present.
    pub fn private_value_bits(&self) -> Option<u32> {
        self.private_value_bits
    }

    /// Modulus length in bits.
    pub fn modulus_bits(&self) -> usize {
        self.prime.bits()
    }

    /// Modulus length in bytes; shared secrets are padded to this length.
    pub fn modulus_len(&self) -> usize {
        self.prime.bits().div_ceil(8)
    }

    /// Whether two parameter sets describe the same group. The private
    /// value length is a local choice and does not take part.
    pub fn same_group(&self, other: &Self) -> bool {
        self.prime == other.prime && self.generator == other.generator
    }

    /// Draw a private exponent in `[2, 2^l)`, with `l` capped below the
    /// modulus size.
    pub fn random_private_value<R: Rng + ?Sized>(&self, rng: &mut R) -> Zeroizing<BigUint> {
        let max_bits = self.modulus_bits() - 1;
        let bits = self
            .private_value_bits
            .map(|l| l as usize)
            .unwrap_or_else(|| default_private_value_bits(self.modulus_bits()) as usize)
            .min(max_bits);
        let lower = BigUint::from(2u32);
        let upper = BigUint::one() << bits;
        Zeroizing::new(rng.gen_biguint_range(&lower, &upper))
    }

    /// `g^x mod p`.
    pub fn public_value(&self, private_value: &BigUint) -> BigUint {
        self.generator.modpow(private_value, &self.prime)
    }

    /// Reject public values outside `(1, p - 1)`.
    pub fn check_public_value(&self, y: &BigUint) -> Result<()> {
        let one = BigUint::one();
        if *y <= one || *y >= &self.prime - &one {
            return Err(CryptoError::IncompatibleParameters(
                "DH public value out of range".into(),
            ));
        }
        Ok(())
    }

    /// Reject private values outside `[2, p - 1)`.
    pub fn check_private_value(&self, x: &BigUint) -> Result<()> {
        let one = BigUint::one();
        if *x <= one || *x >= &self.prime - &one {
            return Err(CryptoError::InvalidKeyEncoding(
                "DH private value out of range".into(),
            ));
        }
        Ok(())
    }
}
