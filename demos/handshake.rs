//! Walks through a client/server handshake in one process.
//!
//! Run with `RUST_LOG=debug cargo run --example handshake` to see the
//! library's key generation and exchange events.

use session_crypto::asymmetric;
use session_crypto::bundle;
use session_crypto::exchange::KeyExchange;
use session_crypto::hash;
use session_crypto::keys::PUBLIC_KEY_NAME;
use session_crypto::random;
use session_crypto::symmetric;
use session_crypto::{CryptoConfig, CryptoError, KeyMaterial, Result};

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("handshake failed: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = CryptoConfig::from_json(r#"{"dh_modulus_bits": 1024}"#)?;
    println!("config: {}", config.to_json()?);

    // Server identity
    let server_rsa = asymmetric::generate_key_pair(2048)?;
    let server_public = asymmetric::load_public_key(server_rsa.public.as_bytes())?;
    let server_private = asymmetric::load_private_key(server_rsa.private.as_bytes())?;
    println!("server RSA key: {} bits", server_public.modulus_bits());

    // Client hello: sealed nonce plus DH public key
    let nonce = random::nonce(random::DEFAULT_NONCE_BITS)?;
    let sealed = asymmetric::encrypt(&nonce, &server_public, config.rsa_padding)?;
    let client = KeyExchange::initiate_with_config(&config)?;
    let mut hello = client.public_bundle();
    hello.insert("nonce", KeyMaterial::new(sealed));
    let hello_wire = bundle::encode(&hello);
    println!("client hello: {} bytes", hello_wire.len());

    // Server reply
    let hello = bundle::decode(&hello_wire)?;
    let missing = |name: &str| CryptoError::MalformedBundle(format!("hello lacks '{name}'"));
    let sealed = hello.get("nonce").ok_or_else(|| missing("nonce"))?;
    let opened = asymmetric::decrypt(sealed.as_bytes(), &server_private, config.rsa_padding)?;
    let client_public = hello
        .get(PUBLIC_KEY_NAME)
        .ok_or_else(|| missing(PUBLIC_KEY_NAME))?
        .clone();
    let server = KeyExchange::respond_with_config(&config, &client_public)?;
    let reply_wire = bundle::encode(&server.public_bundle());
    let server_key = server.finish(&client_public)?;

    // Client completes
    let reply = bundle::decode(&reply_wire)?;
    let server_dh = reply
        .get(PUBLIC_KEY_NAME)
        .ok_or_else(|| missing(PUBLIC_KEY_NAME))?;
    let client_key = client.finish(server_dh)?;

    let payload = b"hello from the client";
    let ct = symmetric::encrypt(payload, &client_key);
    let pt = symmetric::decrypt(&ct, &server_key)?;
    println!("session key: {:?}", client_key.size());
    println!("payload: {}", String::from_utf8_lossy(&pt));
    println!("nonce digest: {}", hash::digest_hex(&opened, b"session"));
    Ok(())
}
