//! Token validator with builder pattern
//!
//! Every gate a protected operation needs is configured upfront, then
//! `run()` applies them in order: algorithm policy, signature, access
//! policy. Signature verification cannot be left out by accident; a
//! validator without it fails.

use crate::algorithm::AlgorithmPolicy;
use crate::claims::AccessPolicy;
use crate::error::{Error, Result};
use crate::keys::{KeyRegistry, SigningKey};
use crate::token::Token;
use tracing::warn;

/// Options for signature verification
///
/// Holds the candidate keys a token's `kid` is matched against and an
/// optional restriction on header algorithms.
#[derive(Debug, Clone, Default)]
pub struct SignatureVerification {
    keys: Vec<SigningKey>,
    algorithm_policy: Option<AlgorithmPolicy>,
}

impl SignatureVerification {
    /// Verify against every key of a registry
    pub fn with_registry(registry: &KeyRegistry) -> Self {
        Self::with_keys(registry.keys().to_vec())
    }

    /// Verify against an explicit key list
    pub fn with_keys(keys: Vec<SigningKey>) -> Self {
        Self {
            keys,
            algorithm_policy: None,
        }
    }

    /// Restrict which header algorithms are accepted
    ///
    /// Without a policy the key value is read according to whatever the
    /// header says, so an RSA public key could be offered as an HMAC secret.
    ///
    /// ```ignore
    /// SignatureVerification::with_registry(&registry)
    ///     .allow_algorithms(AlgorithmPolicy::rsa_any())
    /// ```
    pub fn allow_algorithms(mut self, policy: AlgorithmPolicy) -> Self {
        self.algorithm_policy = Some(policy);
        self
    }

    fn policy(&self) -> Option<&AlgorithmPolicy> {
        self.algorithm_policy.as_ref()
    }
}

/// Validator for a decoded token
///
/// ```ignore
/// let token = TokenValidator::new(decode(bearer)?)
///     .verify_signature(
///         SignatureVerification::with_registry(&registry)
///             .allow_algorithms(AlgorithmPolicy::rs256_only()),
///     )
///     .require(AccessPolicy::new().require_scope("scim.read"))
///     .run()?;
/// ```
pub struct TokenValidator {
    token: Token,
    signature_verification: Option<SignatureVerification>,
    access_policy: Option<AccessPolicy>,
}

impl TokenValidator {
    pub fn new(token: Token) -> Self {
        Self {
            token,
            signature_verification: None,
            access_policy: None,
        }
    }

    /// Decode a compact token and start validating it
    pub fn from_compact(token: &str) -> Result<Self> {
        crate::token::decode(token).map(Self::new)
    }

    /// Configure signature verification (required)
    pub fn verify_signature(mut self, verification: SignatureVerification) -> Self {
        self.signature_verification = Some(verification);
        self
    }

    /// Require scopes and audiences after the signature checks out
    pub fn require(mut self, policy: AccessPolicy) -> Self {
        self.access_policy = Some(policy);
        self
    }

    /// Run the validation pipeline
    ///
    /// # Errors
    ///
    /// - `Error::Configuration` - no signature verification configured
    /// - `Error::UnsupportedAlgorithm`, `Error::AlgorithmNotAllowed` - header
    ///   algorithm refused by the policy
    /// - `Error::UnknownSigningKey`, `Error::KeyParse`, `Error::SignatureInvalid` -
    ///   signature verification failed
    /// - `Error::AccessDenied` - required scopes or audiences missing
    pub fn run(self) -> Result<Token> {
        let verification = self.signature_verification.ok_or_else(|| {
            Error::Configuration("signature verification (use verify_signature())".to_string())
        })?;

        if let Some(policy) = verification.policy() {
            policy.validate(self.token.algorithm.as_deref().unwrap_or_default())?;
        }

        self.token.verify(&verification.keys)?;

        if let Some(policy) = &self.access_policy {
            if !policy.permits(&self.token) {
                warn!(
                    client_id = ?self.token.client_id,
                    user_id = ?self.token.user_id,
                    "token lacks required scopes or audiences"
                );
                return Err(Error::AccessDenied);
            }
        }

        Ok(self.token)
    }
}
