//! Signature verification: key selection, tampering and key formats

mod common;

use common::*;
use uaa_token::*;

fn rsa_token(kid: &str) -> String {
    let token = Token::new().client_id("app").scopes(["openid"]);
    encode(&token, &rsa_signing_key(kid)).unwrap()
}

// ============================================================================
// Key selection
// ============================================================================

#[test]
fn test_verifies_with_matching_kid() {
    init_tracing();
    let token = decode(&rsa_token("key-1")).unwrap();
    let keys = [hmac_key("legacy-token-key"), rsa_verification_key("key-1")];
    assert!(token.verify(&keys).is_ok());
}

#[test]
fn test_unknown_kid() {
    let token = decode(&rsa_token("key-1")).unwrap();
    let err = token
        .verify(&[rsa_verification_key("key-2")])
        .unwrap_err();
    assert_eq!(err.to_string(), "token was not signed by a known key");
}

#[test]
fn test_first_match_wins() {
    // A later key with the right material is never consulted
    let token = decode(&rsa_token("key-1")).unwrap();
    let keys = [
        SigningKey::rsa("key-1", PUBLIC_B_PKCS1),
        rsa_verification_key("key-1"),
    ];
    assert_eq!(
        token.verify(&keys),
        Err(Error::SignatureInvalid(AlgorithmFamily::Rsa))
    );
}

#[test]
fn test_wrong_public_key() {
    let token = decode(&rsa_token("key-1")).unwrap();
    let err = token
        .verify(&[SigningKey::rsa("key-1", PUBLIC_B_PKCS1)])
        .unwrap_err();
    assert_eq!(err.to_string(), "rsa: verification error");
}

#[test]
fn test_garbage_public_key() {
    let token = decode(&rsa_token("key-1")).unwrap();
    let err = token
        .verify(&[SigningKey::rsa("key-1", "garbage public key")])
        .unwrap_err();
    assert_eq!(err, Error::KeyParse("public key is not valid PEM encoding".into()));
}

// ============================================================================
// Tampering
// ============================================================================

#[test]
fn test_truncated_signature() {
    let compact = rsa_token("key-1");
    let truncated = &compact[..compact.len() - 2];
    let token = decode(truncated).unwrap();
    assert!(matches!(
        token.verify(&[rsa_verification_key("key-1")]),
        Err(Error::SignatureInvalid(AlgorithmFamily::Rsa))
    ));
}

#[test]
fn test_flipped_signature() {
    let compact = rsa_token("key-1");
    let signature = compact.rsplit('.').next().unwrap();
    let mut bytes = utils::decode_bytes(signature, 1024).unwrap();
    bytes[10] ^= 0x01;
    let tampered = with_signature(&compact, &utils::encode_bytes(&bytes));

    let token = decode(&tampered).unwrap();
    assert!(token.verify(&[rsa_verification_key("key-1")]).is_err());
}

#[test]
fn test_modified_claims() {
    let compact = rsa_token("key-1");
    let parts: Vec<&str> = compact.split('.').collect();
    let forged_claims = utils::encode(r#"{"client_id":"app","scope":["openid","scim.write"]}"#);
    let forged = format!("{}.{}.{}", parts[0], forged_claims, parts[2]);

    let token = decode(&forged).unwrap();
    assert!(token.has_scope("scim.write"));
    assert!(token.verify(&[rsa_verification_key("key-1")]).is_err());
}

#[test]
fn test_hmac_tampering() {
    let compact = encode(&Token::new().user_id("u"), &hmac_key("legacy-token-key")).unwrap();
    let token = decode(&compact[..compact.len() - 2]).unwrap();
    assert_eq!(
        token.verify(&[hmac_key("legacy-token-key")]).unwrap_err().to_string(),
        "hmac: verification error"
    );
}

// ============================================================================
// Header algorithm
// ============================================================================

#[test]
fn test_none_algorithm_rejected() {
    let header = utils::encode(r#"{"alg":"none","kid":"key-1","typ":"JWT"}"#);
    let claims = utils::encode(r#"{"scope":["scim.write"]}"#);
    let token = decode(&format!("{header}.{claims}.")).unwrap();

    let err = token.verify(&[rsa_verification_key("key-1")]).unwrap_err();
    assert_eq!(err.to_string(), "unsupported token signing method: none");
}

#[test]
fn test_algorithm_confusion_needs_policy() {
    use uaa_token::algorithm::Algorithm;

    // A token that claims HS256 and is keyed with the RSA public PEM text
    // verifies when the header decides the family
    let header = utils::encode(r#"{"alg":"HS256","kid":"key-1","typ":"JWT"}"#);
    let claims = utils::encode(r#"{"scope":["scim.write"]}"#);
    let signing_input = format!("{header}.{claims}");
    let signature = algorithm::get_algorithm(AlgorithmId::HS256)
        .sign(&signing_input, &Key::symmetric(PUBLIC_A.as_bytes()))
        .unwrap();
    let forged = format!("{signing_input}.{}", utils::encode_bytes(&signature));

    let keys = vec![rsa_verification_key("key-1")];
    assert!(decode(&forged).unwrap().verify(&keys).is_ok());

    let result = TokenValidator::from_compact(&forged)
        .unwrap()
        .verify_signature(
            SignatureVerification::with_keys(keys).allow_algorithms(AlgorithmPolicy::rsa_any()),
        )
        .run();
    assert!(matches!(result, Err(Error::AlgorithmNotAllowed { .. })));
}

// ============================================================================
// Cross-validation with the rsa crate
// ============================================================================

mod rsa_crate {
    use super::*;
    use rsa::pkcs1::DecodeRsaPrivateKey;
    use rsa::pkcs8::DecodePublicKey;
    use rsa::signature::{SignatureEncoding, Signer, Verifier};
    use sha2::Sha256;

    #[test]
    fn test_rsa_crate_verifies_our_signature() {
        let compact = rsa_token("key-1");
        let token = decode(&compact).unwrap();
        let signature = utils::decode_bytes(&token.segments.signature, 1024).unwrap();

        let public = rsa::RsaPublicKey::from_public_key_pem(PUBLIC_A).unwrap();
        let verifier = rsa::pkcs1v15::VerifyingKey::<Sha256>::new(public);
        let signature = rsa::pkcs1v15::Signature::try_from(signature.as_slice()).unwrap();
        assert!(verifier
            .verify(token.segments.signing_input().as_bytes(), &signature)
            .is_ok());
    }

    #[test]
    fn test_we_verify_rsa_crate_signature() {
        let header = utils::encode(r#"{"alg":"RS256","kid":"key-1","typ":"JWT"}"#);
        let claims = utils::encode(r#"{"client_id":"app","scope":["openid"]}"#);
        let signing_input = format!("{header}.{claims}");

        let private = rsa::RsaPrivateKey::from_pkcs1_pem(PRIVATE_A).unwrap();
        let signer = rsa::pkcs1v15::SigningKey::<Sha256>::new(private);
        let signature = signer.sign(signing_input.as_bytes()).to_bytes();
        let compact = format!("{signing_input}.{}", utils::encode_bytes(&signature));

        // PKCS#1 v1.5 is deterministic, so both implementations agree bit for bit
        let ours = encode(
            &Token::new().client_id("app").scopes(["openid"]),
            &SigningKey::rsa("key-1", PRIVATE_A),
        )
        .unwrap();
        assert_eq!(compact, ours);

        let token = decode(&compact).unwrap();
        assert!(token.verify(&[rsa_verification_key("key-1")]).is_ok());
    }
}
