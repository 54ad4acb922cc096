//! # uaa-token - Access tokens for a UAA-style identity service
//!
//! **uaa-token** issues, signs and verifies the OAuth2 access tokens of a
//! UAA-compatible authorization server, and enforces the scope and audience
//! checks that gate every protected operation.
//!
//! ## Overview
//!
//! Tokens are compact JWTs carrying UAA claims (`client_id`, `user_id`,
//! `scope`, `authorities`, `aud`, `iss`). A [`KeyRegistry`] holds the
//! configured signing keys, each an RSA key pair or an HMAC shared secret
//! under a key id. New tokens are signed with the registry's active key and
//! name it in the `kid` header, so older keys keep verifying the tokens they
//! signed.
//!
//! ```text
//! grant request ── TokenIssuer ── derive_audiences ── encode ──▶ "eyJ..."
//!
//! "eyJ..." ── decode ── Token::verify ── AccessPolicy::permits ──▶ proceed
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use uaa_token::*;
//!
//! let config = IssuerConfig::new("https://uaa.example.com")
//!     .signing_key(SigningKey::rsa("token-key", private_pem));
//! let issuer = TokenIssuer::from_config(&config)?;
//!
//! let issued = issuer.client_credentials(&client)?;
//!
//! let token = TokenValidator::from_compact(&issued.access_token)?
//!     .verify_signature(SignatureVerification::with_registry(issuer.registry()))
//!     .require(AccessPolicy::new().require_scope("scim.read"))
//!     .run()?;
//! ```
//!
//! ## Algorithm Support
//!
//! All algorithms implement a common `Algorithm` trait:
//!
//! - **HMAC**: HS256, HS384, HS512
//! - **RSA** (PKCS#1 v1.5): RS256, RS384, RS512
//!
//! Keys may declare their algorithm in JOSE form (`RS256`) or the Java form
//! UAA publishes (`SHA256withRSA`, `HMACSHA256`). On verification the family
//! is taken from the token header; use an [`AlgorithmPolicy`] to refuse
//! unexpected header algorithms.
//!
//! ## Decoding Is Not Verification
//!
//! [`token::decode`] returns claims without checking the signature. Call
//! [`Token::verify`] (or run a [`TokenValidator`]) before trusting anything
//! in them.

// Core modules
pub mod error;
pub mod limits;
pub mod utils;

// Algorithm system
pub mod algorithm;
pub mod keys;

// Claims and authorization
pub mod claims;

// Token model and codec
pub mod token;

// Issuance
pub mod config;
pub mod grant;

// Validator
pub mod validator;

// ============================================================================
// PUBLIC API
// ============================================================================

pub use token::{decode, encode, Token, TokenHeader, TokenSegments};
pub use validator::{SignatureVerification, TokenValidator};

pub use claims::{derive_audiences, validate, AccessPolicy};
pub use config::IssuerConfig;
pub use grant::{AuthorizeRequest, Client, GrantOutcome, IssuedToken, TokenIssuer, User};

pub use algorithm::{AlgorithmFamily, AlgorithmId, AlgorithmPolicy};
pub use error::{Error, Result};
pub use keys::{Key, KeyRegistry, SigningKey, TokenKey, TokenKeys};

#[cfg(test)]
mod integration_tests {
    use super::*;

    const PRIVATE_A: &str = include_str!("../tests/fixtures/rsa_a_private.pem");
    const PUBLIC_A: &str = include_str!("../tests/fixtures/rsa_a_public.pem");

    #[test]
    fn test_issue_then_validate() {
        let config = IssuerConfig::new("https://uaa.example.com")
            .signing_key(SigningKey::hmac("legacy-token-key", "tokensecret"))
            .signing_key(SigningKey::new("token-key", "SHA256withRSA", PRIVATE_A));
        let issuer = TokenIssuer::from_config(&config).unwrap();

        let client = Client {
            id: "notifications".into(),
            authorities: vec!["scim.read".into(), "notification_preferences.write".into()],
            ..Client::default()
        };
        let issued = issuer.client_credentials(&client).unwrap();

        let token = TokenValidator::from_compact(&issued.access_token)
            .unwrap()
            .verify_signature(
                SignatureVerification::with_registry(issuer.registry())
                    .allow_algorithms(AlgorithmPolicy::rs256_only()),
            )
            .require(
                AccessPolicy::new()
                    .require_scope("scim.read")
                    .require_audience("notification_preferences"),
            )
            .run()
            .unwrap();

        assert_eq!(token.key_id.as_deref(), Some("token-key"));
        assert_eq!(token.algorithm.as_deref(), Some("RS256"));
        assert_eq!(
            token.audiences,
            ["notifications", "scim", "notification_preferences"]
        );
    }

    #[test]
    fn test_resource_server_verifies_with_published_key() {
        let registry = KeyRegistry::new(
            vec![SigningKey::rsa("token-key", PRIVATE_A)],
            "token-key",
        )
        .unwrap();
        let signed = encode(&Token::new().user_id("user-1"), registry.active()).unwrap();

        // The resource server only knows the discovery document
        let published = registry.token_key().unwrap().unwrap();
        assert_eq!(published.value.trim(), PUBLIC_A.trim());
        let known = SigningKey::new(published.kid, published.alg, published.value);

        let token = decode(&signed).unwrap();
        assert!(token.verify(&[known]).is_ok());
    }
}
