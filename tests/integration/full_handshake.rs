//! Integration test: full client/server handshake.
//!
//! Walks through the sequence a session layer performs:
//! 1. Server provisions an RSA pair and publishes its public key
//! 2. Client sends an RSA-encrypted nonce and its DH public key in a bundle
//! 3. Server joins the client's DH group and replies with its own bundle
//! 4. Both sides derive the same AES session key
//! 5. Payloads and salted hashes travel under that key

use session_crypto::asymmetric::{self, RsaPadding};
use session_crypto::bundle::{self, KeyBundle};
use session_crypto::exchange::{self, KeyExchange, SessionKeyDerivation};
use session_crypto::hash;
use session_crypto::keys::{KeyMaterial, KeyPair, PUBLIC_KEY_NAME};
use session_crypto::random;
use session_crypto::symmetric;
use session_crypto::{CryptoConfig, CryptoError};

const NONCE_NAME: &str = "nonce";

#[test]
fn full_handshake_client_to_server() {
    // ── Step 1: Server provisioning ─────────────────────────────────────
    let server_rsa = asymmetric::generate_key_pair(1024).unwrap();
    let server_private = asymmetric::load_private_key(server_rsa.private.as_bytes()).unwrap();
    let server_public = asymmetric::load_public_key(server_rsa.public.as_bytes()).unwrap();
    assert_eq!(server_public, server_private.public_key());

    // ── Step 2: Client hello ────────────────────────────────────────────
    let nonce = random::nonce(random::DEFAULT_NONCE_BITS).unwrap();
    let sealed_nonce = asymmetric::encrypt(&nonce, &server_public, RsaPadding::OaepSha256).unwrap();

    let client = KeyExchange::initiate(512).unwrap();
    let mut hello = client.public_bundle();
    hello.insert(NONCE_NAME, KeyMaterial::new(sealed_nonce));
    let hello_wire = bundle::encode(&hello);

    // ── Step 3: Server reply ────────────────────────────────────────────
    let received = bundle::decode(&hello_wire).unwrap();
    assert_eq!(received, hello);
    let opened_nonce = asymmetric::decrypt(
        received.get(NONCE_NAME).unwrap().as_bytes(),
        &server_private,
        RsaPadding::OaepSha256,
    )
    .unwrap();
    assert_eq!(opened_nonce, nonce);

    let client_public = received.get(PUBLIC_KEY_NAME).unwrap().clone();
    let server = KeyExchange::respond(&client_public).unwrap();
    let reply_wire = bundle::encode(&server.public_bundle());

    // ── Step 4: Session keys ────────────────────────────────────────────
    let server_key = server.finish(&client_public).unwrap();
    let reply = bundle::decode(&reply_wire).unwrap();
    let client_key = client
        .finish(reply.get(PUBLIC_KEY_NAME).unwrap())
        .unwrap();
    assert_eq!(client_key.as_bytes(), server_key.as_bytes());
    assert_eq!(client_key.as_bytes().len(), 32);

    // ── Step 5: Traffic ─────────────────────────────────────────────────
    let payload = b"GET /inventory HTTP/1.1";
    let ct = symmetric::encrypt(payload, &client_key);
    assert_eq!(ct.len() % symmetric::BLOCK_LEN, 0);
    assert_eq!(symmetric::decrypt(&ct, &server_key).unwrap(), payload);

    let tag = hash::digest_hex(payload, &nonce);
    assert!(hash::verify_hex(payload, &nonce, &tag));
}

#[test]
fn full_handshake_free_functions_match_state_machine() {
    let alice = exchange::generate_fresh_pair(512).unwrap();
    let bob = exchange::generate_pair_for_peer(&alice.public).unwrap();

    let a = exchange::derive_shared_secret(&alice.private, &bob.public).unwrap();
    let b = exchange::derive_shared_secret(&bob.private, &alice.public).unwrap();
    assert_eq!(a, b);

    let key_a = symmetric::derive_key(a.as_bytes()).unwrap();
    let key_b =
        exchange::derive_session_key(&bob.private, &alice.public, SessionKeyDerivation::Truncate)
            .unwrap();
    assert_eq!(key_a.as_bytes(), key_b.as_bytes());
}

#[test]
fn full_handshake_key_pairs_survive_bundling() {
    let pair = exchange::generate_fresh_pair(512).unwrap();
    let wire = bundle::encode(&pair.to_bundle());
    let restored = KeyPair::from_bundle(&bundle::decode(&wire).unwrap()).unwrap();
    assert_eq!(restored, pair);

    let peer = exchange::generate_pair_for_peer(&restored.public).unwrap();
    assert_eq!(
        exchange::derive_shared_secret(&restored.private, &peer.public).unwrap(),
        exchange::derive_shared_secret(&peer.private, &pair.public).unwrap()
    );
}

#[test]
fn full_handshake_with_legacy_config() {
    let config = CryptoConfig::legacy();
    config.validate().unwrap();

    let server_rsa = asymmetric::generate_key_pair(1024).unwrap();
    let server_public = asymmetric::load_public_key(server_rsa.public.as_bytes()).unwrap();
    let server_private = asymmetric::load_private_key(server_rsa.private.as_bytes()).unwrap();
    let secret = b"legacy peer secret";
    let ct = asymmetric::encrypt(secret, &server_public, config.rsa_padding).unwrap();
    assert_eq!(
        asymmetric::decrypt(&ct, &server_private, config.rsa_padding).unwrap(),
        secret
    );

    let client = KeyExchange::initiate_with_config(&config).unwrap();
    let server = KeyExchange::respond_with_config(&config, client.public_key()).unwrap();
    let server_public_dh = server.public_key().clone();
    let server_key = server.finish(client.public_key()).unwrap();
    let client_key = client.finish(&server_public_dh).unwrap();
    assert_eq!(client_key.as_bytes(), server_key.as_bytes());
}

#[test]
fn full_handshake_hkdf_config_from_json() {
    let config = CryptoConfig::from_json(
        r#"{"dh_modulus_bits": 512, "session_key_derivation": "hkdf_sha256"}"#,
    )
    .unwrap();

    let client = KeyExchange::initiate_with_config(&config).unwrap();
    let server = KeyExchange::respond_with_config(&config, client.public_key()).unwrap();
    let server_public_dh = server.public_key().clone();
    let server_key = server.finish(client.public_key()).unwrap();
    let client_key = client.finish(&server_public_dh).unwrap();
    assert_eq!(client_key.as_bytes(), server_key.as_bytes());
}

#[test]
fn full_handshake_rejects_unrelated_server() {
    let client = KeyExchange::initiate(512).unwrap();
    // A misbehaving server generates its own group instead of joining ours.
    let rogue = exchange::generate_fresh_pair(512).unwrap();
    assert!(matches!(
        client.finish(&rogue.public),
        Err(CryptoError::IncompatibleParameters(_))
    ));
}

#[test]
fn full_handshake_bundle_is_sorted_on_the_wire() {
    let mut b = KeyBundle::new();
    b.insert("zeta", KeyMaterial::from_slice(&[1]));
    b.insert("alpha", KeyMaterial::from_slice(&[2]));
    let wire = bundle::encode(&b);
    // count, then the first name length and name
    assert_eq!(&wire[..4], &[0, 0, 0, 2]);
    assert_eq!(&wire[4..8], &[0, 0, 0, 5]);
    assert_eq!(&wire[8..13], b"alpha");
}
