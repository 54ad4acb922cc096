use crate::algorithm::{get_algorithm, AlgorithmId};
use crate::error::{Error, Result};
use crate::keys::SigningKey;
use crate::limits::MAX_DECODED_SIGNATURE_SIZE;
use crate::token::Token;
use crate::utils::base64url;
use tracing::{debug, warn};

impl Token {
    /// Verify the signature against a set of candidate keys
    ///
    /// The first key whose id equals the token's `kid` is used. How its value
    /// is interpreted follows the token's header algorithm: `RS*` reads a PEM
    /// public key, `HS*` uses the raw bytes as the shared secret. The declared
    /// algorithm of the key is not consulted.
    ///
    /// The signature is checked over the original header and claims
    /// segments, never over re-serialized claims.
    pub fn verify(&self, candidate_keys: &[SigningKey]) -> Result<()> {
        let key = match candidate_keys
            .iter()
            .find(|k| Some(k.key_id.as_str()) == self.key_id.as_deref())
        {
            Some(key) => key,
            None => {
                warn!(kid = ?self.key_id, "no signing key matches token");
                return Err(Error::UnknownSigningKey);
            }
        };

        let algorithm_id = AlgorithmId::from_str(self.algorithm.as_deref().unwrap_or_default())?;
        let material = key.verification_material(algorithm_id.family())?;

        let signature = base64url::decode_bytes(&self.segments.signature, MAX_DECODED_SIGNATURE_SIZE)
            .map_err(|_| Error::SignatureInvalid(algorithm_id.family()))?;

        let result = get_algorithm(algorithm_id).verify(
            &self.segments.signing_input(),
            &signature,
            &material,
        );

        match &result {
            Ok(()) => debug!(kid = %key.key_id, alg = %algorithm_id, "token signature verified"),
            Err(e) => warn!(kid = %key.key_id, alg = %algorithm_id, error = %e, "token signature rejected"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::AlgorithmFamily;
    use crate::token::{decode, encode};

    fn hmac_token(kid: &str) -> Token {
        let key = SigningKey::hmac(kid, "tokensecret");
        decode(&encode(&Token::new().user_id("user-1"), &key).unwrap()).unwrap()
    }

    #[test]
    fn test_first_matching_kid() {
        let token = hmac_token("key-1");
        let keys = vec![
            SigningKey::hmac("other", "nope"),
            SigningKey::hmac("key-1", "tokensecret"),
        ];
        assert!(token.verify(&keys).is_ok());
    }

    #[test]
    fn test_no_matching_kid() {
        let token = hmac_token("key-1");
        let err = token.verify(&[SigningKey::hmac("key-2", "tokensecret")]).unwrap_err();
        assert_eq!(err, Error::UnknownSigningKey);
        assert_eq!(err.to_string(), "token was not signed by a known key");

        assert_eq!(token.verify(&[]), Err(Error::UnknownSigningKey));
    }

    #[test]
    fn test_missing_kid_matches_nothing() {
        let mut token = hmac_token("key-1");
        token.key_id = None;
        assert_eq!(
            token.verify(&[SigningKey::hmac("", "tokensecret")]),
            Err(Error::UnknownSigningKey)
        );
    }

    #[test]
    fn test_header_algorithm_selects_family() {
        // An HS256 token verifies even when the key declares RSA
        let token = hmac_token("key-1");
        let key = SigningKey::new("key-1", "SHA256withRSA", "tokensecret");
        assert!(token.verify(&[key]).is_ok());
    }

    #[test]
    fn test_unsupported_header_algorithm() {
        let mut token = hmac_token("key-1");
        token.algorithm = Some("none".into());
        let err = token.verify(&[SigningKey::hmac("key-1", "tokensecret")]).unwrap_err();
        assert_eq!(err.to_string(), "unsupported token signing method: none");
    }

    #[test]
    fn test_unparseable_signature_segment() {
        let mut token = hmac_token("key-1");
        token.segments.signature = "***".into();
        assert_eq!(
            token.verify(&[SigningKey::hmac("key-1", "tokensecret")]),
            Err(Error::SignatureInvalid(AlgorithmFamily::Hmac))
        );
    }

    #[test]
    fn test_garbage_public_key() {
        let mut token = hmac_token("key-1");
        token.algorithm = Some("RS256".into());
        let err = token
            .verify(&[SigningKey::rsa("key-1", "garbage public key")])
            .unwrap_err();
        assert_eq!(err.to_string(), "public key is not valid PEM encoding");
    }
}
