//! Signing keys and key material
//!
//! A [`SigningKey`] is the configured record (key id, declared algorithm,
//! value string). A [`Key`] is the parsed material an [`Algorithm`] signs or
//! verifies with:
//! - Symmetric keys (shared secrets for HMAC algorithms)
//! - RSA public keys (PKCS#1 DER, for verification)
//! - RSA private keys (PKCS#1 or PKCS#8 DER, for signing)
//!
//! [`Algorithm`]: crate::algorithm::Algorithm

mod discovery;
mod registry;

pub use discovery::{TokenKey, TokenKeys};
pub use registry::KeyRegistry;

use crate::algorithm::{AlgorithmFamily, AlgorithmId};
use crate::error::{Error, Result};
use crate::utils::der;
use ring::signature::RsaKeyPair;

/// Key id UAA uses for its default active key
pub const DEFAULT_TOKEN_KEY_ID: &str = "token-key";

/// A configured signing key
///
/// `value` holds a PEM public key (RSA verification), a PEM private key (RSA
/// signing, verification derives the public half) or a raw shared secret
/// (HMAC). The value is never logged or included in error messages.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey {
    pub key_id: String,
    pub algorithm: String,
    pub value: String,
}

impl SigningKey {
    pub fn new(
        key_id: impl Into<String>,
        algorithm: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            key_id: key_id.into(),
            algorithm: algorithm.into(),
            value: value.into(),
        }
    }

    /// RS256 key from a PEM value
    pub fn rsa(key_id: impl Into<String>, pem: impl Into<String>) -> Self {
        Self::new(key_id, AlgorithmId::RS256.as_str(), pem)
    }

    /// HS256 key from a shared secret
    pub fn hmac(key_id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self::new(key_id, AlgorithmId::HS256.as_str(), secret)
    }

    /// The algorithm this key declares, as a header algorithm
    pub fn declared_algorithm(&self) -> Result<AlgorithmId> {
        AlgorithmId::from_declared(&self.algorithm)
    }

    /// Parse the material used to sign under the declared algorithm
    pub fn signing_material(&self) -> Result<Key> {
        match self.declared_algorithm()?.family() {
            AlgorithmFamily::Rsa => Key::rsa_private_from_pem(&self.value),
            AlgorithmFamily::Hmac => Ok(Key::symmetric(self.value.as_bytes())),
        }
    }

    /// Parse the material used to verify a token of the given family
    ///
    /// The family comes from the token header, not from the declared
    /// algorithm.
    pub fn verification_material(&self, family: AlgorithmFamily) -> Result<Key> {
        match family {
            AlgorithmFamily::Rsa => Key::rsa_public_from_pem(&self.value),
            AlgorithmFamily::Hmac => Ok(Key::symmetric(self.value.as_bytes())),
        }
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("key_id", &self.key_id)
            .field("algorithm", &self.algorithm)
            .field("value", &"<redacted>")
            .finish()
    }
}

/// Parsed key material
#[derive(Clone)]
pub enum Key {
    /// Symmetric key for HMAC algorithms
    Symmetric(SymmetricKey),

    /// RSA public key for verification
    RsaPublic(RsaPublicKey),

    /// RSA private key for signing
    RsaPrivate(RsaPrivateKey),
}

impl Key {
    /// Create a symmetric key from bytes
    pub fn symmetric(secret: impl Into<Vec<u8>>) -> Self {
        Key::Symmetric(SymmetricKey::new(secret.into()))
    }

    /// Parse a PEM RSA public key
    ///
    /// The PEM body may be SubjectPublicKeyInfo or bare PKCS#1 regardless of
    /// its label. A PEM private key is accepted too and yields its public half.
    pub fn rsa_public_from_pem(pem: &str) -> Result<Self> {
        let block = der::decode_pem(pem)
            .ok_or_else(|| Error::KeyParse("public key is not valid PEM encoding".into()))?;

        if block.is_private_key() {
            let private = RsaPrivateKey::from_der(block.der, &block.label)?;
            return Ok(Key::RsaPublic(private.public_key()?));
        }

        let pkcs1 = der::rsa_public_pkcs1(&block.der)?;
        Ok(Key::RsaPublic(RsaPublicKey::new(pkcs1)))
    }

    /// Parse a PEM RSA private key (`RSA PRIVATE KEY` or `PRIVATE KEY`)
    pub fn rsa_private_from_pem(pem: &str) -> Result<Self> {
        let block = der::decode_pem(pem)
            .ok_or_else(|| Error::KeyParse("private key is not valid PEM encoding".into()))?;
        if !block.is_private_key() {
            return Err(Error::KeyParse(format!(
                "expected a PEM private key, found '{}'",
                block.label
            )));
        }

        Ok(Key::RsaPrivate(RsaPrivateKey::from_der(
            block.der,
            &block.label,
        )?))
    }

    /// Get key type name for error messages
    pub fn key_type(&self) -> &'static str {
        match self {
            Key::Symmetric(_) => "symmetric",
            Key::RsaPublic(_) => "RSA public",
            Key::RsaPrivate(_) => "RSA private",
        }
    }

    /// Get as symmetric key or return error
    pub fn as_symmetric(&self) -> Result<&SymmetricKey> {
        match self {
            Key::Symmetric(key) => Ok(key),
            _ => Err(self.mismatch("symmetric")),
        }
    }

    /// Get as RSA public key or return error
    pub fn as_rsa_public(&self) -> Result<&RsaPublicKey> {
        match self {
            Key::RsaPublic(key) => Ok(key),
            _ => Err(self.mismatch("RSA public")),
        }
    }

    /// Get as RSA private key or return error
    pub fn as_rsa_private(&self) -> Result<&RsaPrivateKey> {
        match self {
            Key::RsaPrivate(key) => Ok(key),
            _ => Err(self.mismatch("RSA private")),
        }
    }

    fn mismatch(&self, expected: &'static str) -> Error {
        Error::KeyTypeMismatch {
            expected,
            actual: self.key_type(),
        }
    }
}

impl std::fmt::Debug for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Key({})", self.key_type())
    }
}

/// Symmetric key for HMAC algorithms
#[derive(Clone)]
pub struct SymmetricKey {
    secret: Vec<u8>,
}

impl SymmetricKey {
    /// Create a new symmetric key
    pub fn new(secret: Vec<u8>) -> Self {
        Self { secret }
    }

    /// Get the secret bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.secret
    }
}

impl From<&str> for SymmetricKey {
    fn from(secret: &str) -> Self {
        Self::new(secret.as_bytes().to_vec())
    }
}

/// RSA public key (DER-encoded PKCS#1 RSAPublicKey)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    der: Vec<u8>,
}

impl RsaPublicKey {
    pub fn new(der: Vec<u8>) -> Self {
        Self { der }
    }

    /// Get the DER-encoded key bytes
    pub fn as_der(&self) -> &[u8] {
        &self.der
    }

    /// Big-endian modulus and exponent bytes
    pub fn components(&self) -> Result<(Vec<u8>, Vec<u8>)> {
        der::rsa_components(&self.der)
    }

    /// PEM `PUBLIC KEY` (SubjectPublicKeyInfo) encoding
    pub fn to_pem(&self) -> Result<String> {
        der::rsa_public_pem(&self.der)
    }
}

/// Encoding of a DER RSA private key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivateKeyFormat {
    /// `RSA PRIVATE KEY`
    Pkcs1,

    /// `PRIVATE KEY`
    Pkcs8,
}

/// RSA private key (DER), checked to be loadable by ring at construction
#[derive(Clone)]
pub struct RsaPrivateKey {
    der: Vec<u8>,
    format: PrivateKeyFormat,
}

impl RsaPrivateKey {
    fn from_der(der: Vec<u8>, label: &str) -> Result<Self> {
        let format = if label == "PRIVATE KEY" {
            PrivateKeyFormat::Pkcs8
        } else {
            PrivateKeyFormat::Pkcs1
        };
        let key = Self { der, format };
        key.key_pair()?;
        Ok(key)
    }

    pub fn format(&self) -> PrivateKeyFormat {
        self.format
    }

    /// Load the ring key pair for signing
    pub(crate) fn key_pair(&self) -> Result<RsaKeyPair> {
        match self.format {
            PrivateKeyFormat::Pkcs1 => RsaKeyPair::from_der(&self.der),
            PrivateKeyFormat::Pkcs8 => RsaKeyPair::from_pkcs8(&self.der),
        }
        .map_err(|e| Error::KeyParse(format!("private key is not a valid RSA key: {e}")))
    }

    /// The public half of this key
    pub fn public_key(&self) -> Result<RsaPublicKey> {
        let key_pair = self.key_pair()?;
        Ok(RsaPublicKey::new(key_pair.public().as_ref().to_vec()))
    }
}
