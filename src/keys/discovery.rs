//! Signing-key discovery documents
//!
//! Resource servers fetch these to verify tokens offline. Only RSA keys are
//! published; a shared secret never leaves the issuer.

use crate::algorithm::AlgorithmFamily;
use crate::error::Result;
use crate::keys::SigningKey;
use crate::utils::base64url;
use miniserde::{Deserialize, Serialize};

/// Public description of one RSA signing key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenKey {
    pub kid: String,
    /// Java-style algorithm name (`SHA256withRSA`)
    pub alg: String,
    /// PEM `PUBLIC KEY`
    pub value: String,
    pub kty: String,
    #[serde(rename = "use")]
    pub key_use: String,
    /// RSA modulus (Base64URL-encoded)
    pub n: String,
    /// RSA exponent (Base64URL-encoded)
    pub e: String,
}

impl TokenKey {
    /// Describe a signing key, or `None` for an HMAC key
    ///
    /// The value may hold a public or a private PEM key; only the public
    /// half is published.
    pub fn from_signing_key(key: &SigningKey) -> Result<Option<Self>> {
        let algorithm = key.declared_algorithm()?;
        if algorithm.family() != AlgorithmFamily::Rsa {
            return Ok(None);
        }

        let material = key.verification_material(AlgorithmFamily::Rsa)?;
        let public = material.as_rsa_public()?;
        let (n, e) = public.components()?;

        Ok(Some(Self {
            kid: key.key_id.clone(),
            alg: algorithm.declared_name().to_string(),
            value: public.to_pem()?,
            kty: "RSA".to_string(),
            key_use: "sig".to_string(),
            n: base64url::encode_bytes(&n),
            e: base64url::encode_bytes(&e),
        }))
    }

    pub fn to_json(&self) -> String {
        miniserde::json::to_string(self)
    }
}

/// The `{"keys": [...]}` list document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenKeys {
    pub keys: Vec<TokenKey>,
}

impl TokenKeys {
    pub fn to_json(&self) -> String {
        miniserde::json::to_string(self)
    }
}
