use crate::algorithm::AlgorithmId;
use miniserde::{Deserialize, Serialize};

/// JWT header structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHeader {
    /// Algorithm used for signing
    #[serde(rename = "alg")]
    pub algorithm: String,

    /// Key ID (selects the signing key on verification)
    #[serde(rename = "kid")]
    pub key_id: Option<String>,

    /// Token type (always "JWT" when encoded here)
    #[serde(rename = "typ")]
    pub token_type: Option<String>,
}

impl TokenHeader {
    /// Header for a token signed with `algorithm` under `key_id`
    pub fn new(algorithm: AlgorithmId, key_id: impl Into<String>) -> Self {
        Self {
            algorithm: algorithm.as_str().to_string(),
            key_id: Some(key_id.into()),
            token_type: Some("JWT".to_string()),
        }
    }
}
