//! Edge case tests: boundaries, empty inputs, and size limits.

use session_crypto::asymmetric::{self, RsaPadding};
use session_crypto::bundle::{self, KeyBundle};
use session_crypto::hash;
use session_crypto::keys::KeyMaterial;
use session_crypto::random;
use session_crypto::symmetric::{self, KeySize, SymmetricKey, BLOCK_LEN};
use session_crypto::CryptoError;

// ── Symmetric ───────────────────────────────────────────────────────────────

#[test]
fn edge_symmetric_block_boundaries() {
    let key = SymmetricKey::generate(KeySize::Aes192).unwrap();
    for len in [0, 1, 15, 16, 17, 31, 32, 33, 1024] {
        let pt = vec![0x5A; len];
        let ct = symmetric::encrypt(&pt, &key);
        // PKCS#7 always adds at least one byte of padding
        assert_eq!(ct.len(), (len / BLOCK_LEN + 1) * BLOCK_LEN, "len {len}");
        assert_eq!(symmetric::decrypt(&ct, &key).unwrap(), pt);
    }
}

#[test]
fn edge_symmetric_all_key_sizes() {
    for size in [KeySize::Aes128, KeySize::Aes192, KeySize::Aes256] {
        let key = SymmetricKey::generate(size).unwrap();
        assert_eq!(key.as_bytes().len(), size.len());
        let ct = symmetric::encrypt(b"sized", &key);
        assert_eq!(symmetric::decrypt(&ct, &key).unwrap(), b"sized");
    }
}

#[test]
fn edge_symmetric_identical_blocks_leak() {
    // No IV: equal plaintext blocks give equal ciphertext blocks.
    let key = SymmetricKey::generate(KeySize::Aes128).unwrap();
    let ct = symmetric::encrypt(&[0x11; 32], &key);
    assert_eq!(ct[..16], ct[16..32]);
}

#[test]
fn edge_symmetric_bad_ciphertext_lengths() {
    let key = SymmetricKey::generate(KeySize::Aes128).unwrap();
    for len in [0, 1, 15, 17] {
        assert!(matches!(
            symmetric::decrypt(&vec![0u8; len], &key),
            Err(CryptoError::DecryptionFailed)
        ));
    }
}

#[test]
fn edge_symmetric_key_length_rejected() {
    for len in [0, 8, 15, 17, 31, 33, 64] {
        assert!(matches!(
            symmetric::derive_key(&vec![0u8; len]),
            Err(CryptoError::InvalidKeyLength(_))
        ));
    }
}

// ── Asymmetric ──────────────────────────────────────────────────────────────

#[test]
fn edge_rsa_plaintext_boundaries() {
    let pair = asymmetric::generate_key_pair(1024).unwrap();
    let public = asymmetric::load_public_key(pair.public.as_bytes()).unwrap();
    let private = asymmetric::load_private_key(pair.private.as_bytes()).unwrap();

    for (padding, max) in [(RsaPadding::Pkcs1v15, 117), (RsaPadding::OaepSha256, 62)] {
        assert_eq!(asymmetric::max_plaintext_len(&public, padding), max);

        let at_limit = vec![0x42; max];
        let ct = asymmetric::encrypt(&at_limit, &public, padding).unwrap();
        assert_eq!(ct.len(), 128);
        assert_eq!(asymmetric::decrypt(&ct, &private, padding).unwrap(), at_limit);

        let over = vec![0x42; max + 1];
        assert!(matches!(
            asymmetric::encrypt(&over, &public, padding),
            Err(CryptoError::PlaintextTooLarge { len, max: m }) if len == max + 1 && m == max
        ));

        let empty = asymmetric::encrypt(&[], &public, padding).unwrap();
        assert!(asymmetric::decrypt(&empty, &private, padding).unwrap().is_empty());
    }
}

#[test]
fn edge_rsa_load_random_bytes() {
    let junk = random::nonce(64).unwrap();
    assert!(matches!(
        asymmetric::load_public_key(&junk),
        Err(CryptoError::InvalidKeyEncoding(_))
    ));
    assert!(matches!(
        asymmetric::load_private_key(&junk),
        Err(CryptoError::InvalidKeyEncoding(_))
    ));
}

#[test]
fn edge_rsa_load_empty() {
    assert!(matches!(
        asymmetric::load_public_key(&[]),
        Err(CryptoError::InvalidKeyEncoding(_))
    ));
}

#[test]
fn edge_rsa_too_small_modulus() {
    assert!(matches!(
        asymmetric::generate_key_pair(256),
        Err(CryptoError::InvalidKeyLength(_))
    ));
}

// ── Hash ────────────────────────────────────────────────────────────────────

#[test]
fn edge_hash_empty_inputs() {
    // SHA-256 of the empty string
    assert_eq!(
        hash::digest_hex(b"", b""),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
}

#[test]
fn edge_hash_single_bit_sensitivity() {
    let base = hash::digest(b"message", b"salt");
    let mut msg = b"message".to_vec();
    msg[0] ^= 1;
    assert_ne!(hash::digest(&msg, b"salt"), base);
    let mut salt = b"salt".to_vec();
    salt[3] ^= 0x80;
    assert_ne!(hash::digest(b"message", &salt), base);
}

#[test]
fn edge_hash_hex_format() {
    let hex = hash::digest_hex(b"x", b"y");
    assert_eq!(hex.len(), 64);
    assert!(hex.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    assert!(hash::verify_hex(b"x", b"y", &hex));
    assert!(!hash::verify_hex(b"x", b"y", "zz"));
    assert!(!hash::verify_hex(b"x", b"y", &hex[..62]));
}

#[test]
fn edge_hash_unknown_digest() {
    assert!(matches!(
        "SHA-1".parse::<hash::DigestAlgorithm>(),
        Err(CryptoError::UnsupportedDigest(_))
    ));
}

// ── Random ──────────────────────────────────────────────────────────────────

#[test]
fn edge_nonce_sizes() {
    for bits in [8, 64, 128, 256, 4096] {
        assert_eq!(random::nonce(bits).unwrap().len(), bits / 8);
    }
}

// ── Bundle ──────────────────────────────────────────────────────────────────

#[test]
fn edge_bundle_empty() {
    let wire = bundle::encode(&KeyBundle::new());
    assert_eq!(wire, [0, 0, 0, 0]);
    assert!(bundle::decode(&wire).unwrap().is_empty());
}

#[test]
fn edge_bundle_empty_name_and_value() {
    let mut b = KeyBundle::new();
    b.insert("", KeyMaterial::new(Vec::new()));
    let decoded = bundle::decode(&bundle::encode(&b)).unwrap();
    assert_eq!(decoded.get("").map(|m| m.len()), Some(0));
}

#[test]
fn edge_bundle_large_value() {
    let mut b = KeyBundle::new();
    b.insert("blob", KeyMaterial::new(vec![7u8; 1 << 20]));
    let decoded = bundle::decode(&bundle::encode(&b)).unwrap();
    assert_eq!(decoded.get("blob").unwrap().len(), 1 << 20);
}

#[test]
fn edge_bundle_unicode_names() {
    let mut b = KeyBundle::new();
    b.insert("clé", KeyMaterial::from_slice(&[1]));
    b.insert("键", KeyMaterial::from_slice(&[2]));
    let decoded = bundle::decode(&bundle::encode(&b)).unwrap();
    assert_eq!(decoded, b);
}

#[test]
fn edge_bundle_huge_count_rejected_cheaply() {
    assert!(matches!(
        bundle::decode(&[0xFF, 0xFF, 0xFF, 0xFF]),
        Err(CryptoError::MalformedBundle(_))
    ));
}
