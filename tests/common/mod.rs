//! Shared fixtures for integration tests
//!
//! Keys under `tests/fixtures/` were generated with openssl:
//! - key A: PKCS#1 and PKCS#8 private key, SPKI public key
//! - key B: PKCS#1 private key, PKCS#1 public key body under a `PUBLIC KEY` label

#![allow(dead_code)]

use uaa_token::SigningKey;

pub const PRIVATE_A: &str = include_str!("../fixtures/rsa_a_private.pem");
pub const PRIVATE_A_PKCS8: &str = include_str!("../fixtures/rsa_a_private_pkcs8.pem");
pub const PUBLIC_A: &str = include_str!("../fixtures/rsa_a_public.pem");
pub const MODULUS_A: &str = include_str!("../fixtures/rsa_a_modulus.b64");
pub const PRIVATE_B: &str = include_str!("../fixtures/rsa_b_private.pem");
pub const PUBLIC_B_PKCS1: &str = include_str!("../fixtures/rsa_b_public_pkcs1.pem");

pub const SHARED_SECRET: &str = "tokensecret";

/// Install a test subscriber; `RUST_LOG=uaa_token=debug` shows library logs
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn rsa_signing_key(kid: &str) -> SigningKey {
    SigningKey::new(kid, "SHA256withRSA", PRIVATE_A)
}

pub fn rsa_verification_key(kid: &str) -> SigningKey {
    SigningKey::new(kid, "SHA256withRSA", PUBLIC_A)
}

pub fn hmac_key(kid: &str) -> SigningKey {
    SigningKey::new(kid, "HMACSHA256", SHARED_SECRET)
}

/// Replace the signature segment of a compact token
pub fn with_signature(token: &str, signature: &str) -> String {
    let mut parts: Vec<&str> = token.split('.').collect();
    parts[2] = signature;
    parts.join(".")
}

/// Re-wrap a PEM body at `width` columns; 0 puts the body on one line
pub fn rewrap_pem(pem: &str, width: usize) -> String {
    let lines: Vec<&str> = pem.trim().lines().collect();
    let body: String = lines[1..lines.len() - 1].concat();
    let wrapped = if width == 0 {
        body
    } else {
        body.as_bytes()
            .chunks(width)
            .map(|chunk| std::str::from_utf8(chunk).unwrap())
            .collect::<Vec<_>>()
            .join("\n")
    };
    format!("{}\n{}\n{}\n", lines[0], wrapped, lines[lines.len() - 1])
}
