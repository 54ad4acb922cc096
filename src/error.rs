//! Errors for uaa-token

use crate::algorithm::AlgorithmFamily;
use thiserror::Error;

/// Token subsystem errors
///
/// Every variant is returned as a value. Malformed or tampered tokens never
/// panic, so a caller can always turn the error into a rejected request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ============================================================================
    // Format Errors
    // ============================================================================
    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token too large: {size} bytes (maximum: {max} bytes)")]
    TokenTooLarge { size: usize, max: usize },

    // ============================================================================
    // Algorithm Errors
    // ============================================================================
    /// The token header names an algorithm the verifier does not support
    #[error("unsupported token signing method: {0}")]
    UnsupportedAlgorithm(String),

    /// A signing key declares an algorithm outside the RSA and HMAC families
    #[error("unsupported signing key algorithm: {0}")]
    UnsupportedKeyAlgorithm(String),

    #[error("algorithm '{found}' not allowed. Allowed: {allowed:?}")]
    AlgorithmNotAllowed { found: String, allowed: Vec<String> },

    // ============================================================================
    // Key and Signature Errors
    // ============================================================================
    #[error("token was not signed by a known key")]
    UnknownSigningKey,

    #[error("{0}")]
    KeyParse(String),

    #[error("key type mismatch: expected {expected} key, got {actual} key")]
    KeyTypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("{0}: verification error")]
    SignatureInvalid(AlgorithmFamily),

    #[error("signing failed: {0}")]
    Signing(String),

    // ============================================================================
    // Registry and Configuration Errors
    // ============================================================================
    #[error("duplicate signing key id '{0}'")]
    DuplicateKeyId(String),

    #[error("active signing key '{0}' is not in the registry")]
    ActiveKeyNotFound(String),

    #[error("invalid configuration: {0}")]
    Configuration(String),

    // ============================================================================
    // Grant and Authorization Errors
    // ============================================================================
    #[error("client '{client_id}' is not allowed to use the {grant_type} grant")]
    GrantNotAllowed {
        client_id: String,
        grant_type: &'static str,
    },

    /// Username or password of a password grant did not match the user
    #[error("Bad credentials")]
    BadCredentials,

    #[error("token does not satisfy the required scopes or audiences")]
    AccessDenied,
}

/// Result type alias for uaa-token operations
pub type Result<T> = std::result::Result<T, Error>;
