use crate::algorithm::{Algorithm, AlgorithmFamily};
use crate::error::{Error, Result};
use crate::keys::Key;

use constant_time_eq::constant_time_eq;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};

/// HS256 algorithm (HMAC with SHA-256)
pub struct HS256;

/// HS384 algorithm (HMAC with SHA-384)
pub struct HS384;

/// HS512 algorithm (HMAC with SHA-512)
pub struct HS512;

macro_rules! hmac_algorithm {
    ($name:ident, $digest:ty) => {
        impl Algorithm for $name {
            fn sign(&self, signing_input: &str, key: &Key) -> Result<Vec<u8>> {
                let secret = key.as_symmetric()?;
                let mut mac = Hmac::<$digest>::new_from_slice(secret.as_bytes())
                    .map_err(|_| Error::Signing("hmac key rejected".into()))?;
                mac.update(signing_input.as_bytes());
                Ok(mac.finalize().into_bytes().to_vec())
            }

            fn verify(&self, signing_input: &str, signature: &[u8], key: &Key) -> Result<()> {
                let expected = self.sign(signing_input, key)?;
                compare(&expected, signature)
            }
        }
    };
}

hmac_algorithm!(HS256, Sha256);
hmac_algorithm!(HS384, Sha384);
hmac_algorithm!(HS512, Sha512);

/// Constant-time comparison; a length mismatch fails the same way
fn compare(expected: &[u8], provided: &[u8]) -> Result<()> {
    if expected.len() == provided.len() && constant_time_eq(expected, provided) {
        Ok(())
    } else {
        Err(Error::SignatureInvalid(AlgorithmFamily::Hmac))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGNING_INPUT: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.eyJ1c2VyX2lkIjoidXNlci1pZCJ9";

    #[test]
    fn test_hs256_known_signature() {
        let key = Key::symmetric(b"secret".to_vec());
        let signature = HS256.sign(SIGNING_INPUT, &key).unwrap();
        assert_eq!(
            crate::utils::encode_bytes(&signature),
            "saQbbGSbCsRKT_RJ06OQx5pSVB2W7Or0OmFzgN4eDqM"
        );
        assert!(HS256.verify(SIGNING_INPUT, &signature, &key).is_ok());
    }

    #[test]
    fn test_signature_lengths() {
        let key = Key::symmetric(b"some-secret".to_vec());
        assert_eq!(HS256.sign(SIGNING_INPUT, &key).unwrap().len(), 32);
        assert_eq!(HS384.sign(SIGNING_INPUT, &key).unwrap().len(), 48);
        assert_eq!(HS512.sign(SIGNING_INPUT, &key).unwrap().len(), 64);
    }

    #[test]
    fn test_wrong_secret() {
        let signature = HS512
            .sign(SIGNING_INPUT, &Key::symmetric(b"right".to_vec()))
            .unwrap();
        let result = HS512.verify(SIGNING_INPUT, &signature, &Key::symmetric(b"wrong".to_vec()));
        assert_eq!(
            result.unwrap_err().to_string(),
            "hmac: verification error"
        );
    }

    #[test]
    fn test_truncated_signature() {
        let key = Key::symmetric(b"some-secret".to_vec());
        let signature = HS384.sign(SIGNING_INPUT, &key).unwrap();
        assert!(matches!(
            HS384.verify(SIGNING_INPUT, &signature[..signature.len() - 1], &key),
            Err(Error::SignatureInvalid(AlgorithmFamily::Hmac))
        ));
    }

    #[test]
    fn test_cross_algorithm_signature_rejected() {
        let key = Key::symmetric(b"some-secret".to_vec());
        let signature = HS256.sign(SIGNING_INPUT, &key).unwrap();
        assert!(HS512.verify(SIGNING_INPUT, &signature, &key).is_err());
    }

    #[test]
    fn test_rsa_key_rejected() {
        let pem = include_str!("../../tests/fixtures/rsa_a_public.pem");
        let key = Key::rsa_public_from_pem(pem).unwrap();
        assert!(matches!(
            HS256.sign(SIGNING_INPUT, &key),
            Err(Error::KeyTypeMismatch { .. })
        ));
    }
}
