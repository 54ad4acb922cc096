use crate::algorithm::{Algorithm, AlgorithmFamily};
use crate::error::{Error, Result};
use crate::keys::Key;

use ring::rand::SystemRandom;
use ring::signature::{self, RsaEncoding, UnparsedPublicKey, VerificationAlgorithm};

/// RS256 algorithm (RSA with SHA-256)
pub struct RS256;

/// RS384 algorithm (RSA with SHA-384)
pub struct RS384;

/// RS512 algorithm (RSA with SHA-512)
pub struct RS512;

macro_rules! rsa_algorithm {
    ($name:ident, $padding:path, $verification:path) => {
        impl Algorithm for $name {
            fn sign(&self, signing_input: &str, key: &Key) -> Result<Vec<u8>> {
                sign_rsa(signing_input, key, &$padding)
            }

            fn verify(&self, signing_input: &str, signature: &[u8], key: &Key) -> Result<()> {
                verify_rsa(signing_input, signature, key, &$verification)
            }
        }
    };
}

rsa_algorithm!(
    RS256,
    signature::RSA_PKCS1_SHA256,
    signature::RSA_PKCS1_2048_8192_SHA256
);
rsa_algorithm!(
    RS384,
    signature::RSA_PKCS1_SHA384,
    signature::RSA_PKCS1_2048_8192_SHA384
);
rsa_algorithm!(
    RS512,
    signature::RSA_PKCS1_SHA512,
    signature::RSA_PKCS1_2048_8192_SHA512
);

/// RSASSA-PKCS1-v1_5 signature with a private key
fn sign_rsa(
    signing_input: &str,
    key: &Key,
    padding: &'static dyn RsaEncoding,
) -> Result<Vec<u8>> {
    let key_pair = key.as_rsa_private()?.key_pair()?;
    let rng = SystemRandom::new();

    let mut signature = vec![0u8; key_pair.public().modulus_len()];
    key_pair
        .sign(padding, &rng, signing_input.as_bytes(), &mut signature)
        .map_err(|_| Error::Signing("rsa signing failed".into()))?;
    Ok(signature)
}

/// Generic RSA signature verification
fn verify_rsa(
    signing_input: &str,
    signature: &[u8],
    key: &Key,
    algorithm: &'static dyn VerificationAlgorithm,
) -> Result<()> {
    let rsa_key = key.as_rsa_public()?;

    UnparsedPublicKey::new(algorithm, rsa_key.as_der())
        .verify(signing_input.as_bytes(), signature)
        .map_err(|_| Error::SignatureInvalid(AlgorithmFamily::Rsa))
}
