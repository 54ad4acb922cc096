use crate::algorithm::AlgorithmId;
use crate::error::Result;
use crate::keys::Key;

/// Core algorithm trait that both signing families implement
///
/// HMAC and RSA variants know how to produce a signature over a signing
/// input and how to check one. [`get_algorithm`] selects the implementation
/// for an [`AlgorithmId`].
pub trait Algorithm {
    /// Sign `signing_input` (header.claims) and return the raw signature
    fn sign(&self, signing_input: &str, key: &Key) -> Result<Vec<u8>>;

    /// Verify raw `signature` bytes over `signing_input`
    fn verify(&self, signing_input: &str, signature: &[u8], key: &Key) -> Result<()>;
}

/// Type alias for boxed algorithm trait objects
pub type SignatureAlgorithm = Box<dyn Algorithm + Send + Sync>;

/// Get the signature algorithm for the given algorithm ID
pub fn get_algorithm(algorithm: AlgorithmId) -> SignatureAlgorithm {
    match algorithm {
        AlgorithmId::HS256 => Box::new(super::hmac::HS256),
        AlgorithmId::HS384 => Box::new(super::hmac::HS384),
        AlgorithmId::HS512 => Box::new(super::hmac::HS512),
        AlgorithmId::RS256 => Box::new(super::rsa::RS256),
        AlgorithmId::RS384 => Box::new(super::rsa::RS384),
        AlgorithmId::RS512 => Box::new(super::rsa::RS512),
    }
}
