//! DER encodings of Diffie-Hellman keys.
//!
//! Keys use the PKCS#3 `dhKeyAgreement` algorithm identifier with
//! parameters
//!
//! ```text
//! DHParameter ::= SEQUENCE {
//!     prime              INTEGER,  -- p
//!     base               INTEGER,  -- g
//!     privateValueLength INTEGER OPTIONAL }
//! ```
//!
//! Public keys are SubjectPublicKeyInfo with the public value `y` as a DER
//! INTEGER inside the bit string. Private keys are PKCS#8 with the private
//! value `x` as a DER INTEGER inside the octet string.

use der::asn1::{AnyRef, BitStringRef, UintRef};
use der::{Decode, Encode, Sequence};
use num_bigint_dig::BigUint;
use pkcs8::PrivateKeyInfo;
use spki::{AlgorithmIdentifierRef, ObjectIdentifier, SubjectPublicKeyInfoRef};
use zeroize::Zeroizing;

use super::params::DomainParameters;
use crate::error::{CryptoError, Result};
use crate::keys::KeyMaterial;

/// PKCS#3 `dhKeyAgreement`.
pub const DH_KEY_AGREEMENT_OID: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.3.1");

#[derive(Sequence)]
struct DhParameter<'a> {
    prime: UintRef<'a>,
    base: UintRef<'a>,
    #[asn1(optional = "true")]
    private_value_length: Option<u32>,
}

fn malformed(context: &'static str) -> impl Fn(der::Error) -> CryptoError {
    move |e| CryptoError::InvalidKeyEncoding(format!("{context}: {e}"))
}

fn encode_parameters(params: &DomainParameters) -> Result<Vec<u8>> {
    let prime = params.prime().to_bytes_be();
    let base = params.generator().to_bytes_be();
    DhParameter {
        prime: UintRef::new(&prime).map_err(malformed("DH prime"))?,
        base: UintRef::new(&base).map_err(malformed("DH base"))?,
        private_value_length: params.private_value_bits(),
    }
    .to_der()
    .map_err(malformed("DH parameters"))
}

/// Check the algorithm identifier and pull out the domain parameters.
fn decode_algorithm(algorithm: &AlgorithmIdentifierRef<'_>) -> Result<DomainParameters> {
    if algorithm.oid != DH_KEY_AGREEMENT_OID {
        return Err(CryptoError::InvalidKeyEncoding(format!(
            "expected dhKeyAgreement key, found algorithm {}",
            algorithm.oid
        )));
    }
    let any = algorithm
        .parameters
        .ok_or_else(|| CryptoError::InvalidKeyEncoding("DH key without parameters".into()))?;
    let seq: DhParameter<'_> = any.decode_as().map_err(malformed("DH parameters"))?;
    DomainParameters::from_parts(
        BigUint::from_bytes_be(seq.prime.as_bytes()),
        BigUint::from_bytes_be(seq.base.as_bytes()),
        seq.private_value_length,
    )
}

/// Encode `y` under `params` as SubjectPublicKeyInfo DER.
pub fn encode_public_key(params: &DomainParameters, y: &BigUint) -> Result<KeyMaterial> {
    let params_der = encode_parameters(params)?;
    let y_bytes = y.to_bytes_be();
    let y_der = UintRef::new(&y_bytes)
        .and_then(|uint| uint.to_der())
        .map_err(malformed("DH public value"))?;

    let spki = SubjectPublicKeyInfoRef {
        algorithm: AlgorithmIdentifierRef {
            oid: DH_KEY_AGREEMENT_OID,
            parameters: Some(AnyRef::from_der(&params_der).map_err(malformed("DH parameters"))?),
        },
        subject_public_key: BitStringRef::from_bytes(&y_der)
            .map_err(malformed("DH public value"))?,
    };
    spki.to_der()
        .map(KeyMaterial::new)
        .map_err(malformed("SubjectPublicKeyInfo"))
}

/// Encode `x` under `params` as PKCS#8 DER.
pub fn encode_private_key(params: &DomainParameters, x: &BigUint) -> Result<KeyMaterial> {
    let params_der = encode_parameters(params)?;
    let x_bytes = Zeroizing::new(x.to_bytes_be());
    let x_der = Zeroizing::new(
        UintRef::new(&x_bytes)
            .and_then(|uint| uint.to_der())
            .map_err(malformed("DH private value"))?,
    );

    let algorithm = AlgorithmIdentifierRef {
        oid: DH_KEY_AGREEMENT_OID,
        parameters: Some(AnyRef::from_der(&params_der).map_err(malformed("DH parameters"))?),
    };
    PrivateKeyInfo::new(algorithm, &x_der)
        .to_der()
        .map(KeyMaterial::new)
        .map_err(malformed("PKCS#8"))
}

/// Decode a SubjectPublicKeyInfo DH public key.
pub fn decode_public_key(encoded: &[u8]) -> Result<(DomainParameters, BigUint)> {
    let spki = SubjectPublicKeyInfoRef::try_from(encoded)
        .map_err(|e| CryptoError::InvalidKeyEncoding(format!("SubjectPublicKeyInfo: {e}")))?;
    let params = decode_algorithm(&spki.algorithm)?;

    let y_der = spki.subject_public_key.as_bytes().ok_or_else(|| {
        CryptoError::InvalidKeyEncoding("DH public key bit string is not octet aligned".into())
    })?;
    let y = UintRef::from_der(y_der).map_err(malformed("DH public value"))?;
    Ok((params, BigUint::from_bytes_be(y.as_bytes())))
}

/// Decode a PKCS#8 DH private key. The returned exponent is wiped on drop.
pub fn decode_private_key(encoded: &[u8]) -> Result<(DomainParameters, Zeroizing<BigUint>)> {
    let info = PrivateKeyInfo::try_from(encoded)
        .map_err(|e| CryptoError::InvalidKeyEncoding(format!("PKCS#8: {e}")))?;
    let params = decode_algorithm(&info.algorithm)?;

    let x = UintRef::from_der(info.private_key).map_err(malformed("DH private value"))?;
    let x = Zeroizing::new(BigUint::from_bytes_be(x.as_bytes()));
    params.check_private_value(&x)?;
    Ok((params, x))
}
