mod traits;

pub mod hmac;
pub mod rsa;

pub use traits::{get_algorithm, Algorithm, SignatureAlgorithm};

use crate::error::{Error, Result};

/// Algorithm identifier carried in the `alg` token header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmId {
    /// HMAC with SHA-256
    HS256,

    /// HMAC with SHA-384
    HS384,

    /// HMAC with SHA-512
    HS512,

    /// RSA PKCS#1 v1.5 with SHA-256
    RS256,

    /// RSA PKCS#1 v1.5 with SHA-384
    RS384,

    /// RSA PKCS#1 v1.5 with SHA-512
    RS512,
}

/// The two signing families a token can be verified with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmFamily {
    /// RSA keypair; PEM private key signs, PEM public key verifies
    Rsa,

    /// Shared secret used as raw HMAC key bytes
    Hmac,
}

impl AlgorithmFamily {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AlgorithmFamily::Rsa => "rsa",
            AlgorithmFamily::Hmac => "hmac",
        }
    }
}

impl std::fmt::Display for AlgorithmFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AlgorithmId {
    /// Parse the `alg` value of a token header
    ///
    /// Only the JOSE names are accepted here. `none` and everything else
    /// fails with [`Error::UnsupportedAlgorithm`] naming the value.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "HS256" => Ok(AlgorithmId::HS256),
            "HS384" => Ok(AlgorithmId::HS384),
            "HS512" => Ok(AlgorithmId::HS512),
            "RS256" => Ok(AlgorithmId::RS256),
            "RS384" => Ok(AlgorithmId::RS384),
            "RS512" => Ok(AlgorithmId::RS512),
            _ => Err(Error::UnsupportedAlgorithm(s.to_string())),
        }
    }

    /// Parse the algorithm a signing key declares
    ///
    /// Keys published by a UAA name their algorithm in Java style
    /// (`SHA256withRSA`, `HMACSHA256`), configured keys usually use the JOSE
    /// name. Both are accepted.
    pub fn from_declared(s: &str) -> Result<Self> {
        match s {
            "SHA256withRSA" => Ok(AlgorithmId::RS256),
            "SHA384withRSA" => Ok(AlgorithmId::RS384),
            "SHA512withRSA" => Ok(AlgorithmId::RS512),
            "HMACSHA256" => Ok(AlgorithmId::HS256),
            "HMACSHA384" => Ok(AlgorithmId::HS384),
            "HMACSHA512" => Ok(AlgorithmId::HS512),
            _ => Self::from_str(s).map_err(|_| Error::UnsupportedKeyAlgorithm(s.to_string())),
        }
    }

    /// Convert to the JOSE header name
    pub const fn as_str(&self) -> &'static str {
        match self {
            AlgorithmId::HS256 => "HS256",
            AlgorithmId::HS384 => "HS384",
            AlgorithmId::HS512 => "HS512",
            AlgorithmId::RS256 => "RS256",
            AlgorithmId::RS384 => "RS384",
            AlgorithmId::RS512 => "RS512",
        }
    }

    /// Java-style name used in key discovery documents
    pub const fn declared_name(&self) -> &'static str {
        match self {
            AlgorithmId::HS256 => "HMACSHA256",
            AlgorithmId::HS384 => "HMACSHA384",
            AlgorithmId::HS512 => "HMACSHA512",
            AlgorithmId::RS256 => "SHA256withRSA",
            AlgorithmId::RS384 => "SHA384withRSA",
            AlgorithmId::RS512 => "SHA512withRSA",
        }
    }

    pub const fn family(&self) -> AlgorithmFamily {
        match self {
            AlgorithmId::HS256 | AlgorithmId::HS384 | AlgorithmId::HS512 => AlgorithmFamily::Hmac,
            AlgorithmId::RS256 | AlgorithmId::RS384 | AlgorithmId::RS512 => AlgorithmFamily::Rsa,
        }
    }
}

impl std::fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Policy for allowed header algorithms
#[derive(Debug, Clone)]
pub struct AlgorithmPolicy {
    allowed: Vec<AlgorithmId>,
}

impl AlgorithmPolicy {
    /// Create a policy that allows only specific algorithms
    pub fn allow_only(algorithms: Vec<AlgorithmId>) -> Self {
        Self {
            allowed: algorithms,
        }
    }

    /// Create a policy that allows all six supported algorithms
    pub fn allow_all() -> Self {
        Self::allow_only(vec![
            AlgorithmId::HS256,
            AlgorithmId::HS384,
            AlgorithmId::HS512,
            AlgorithmId::RS256,
            AlgorithmId::RS384,
            AlgorithmId::RS512,
        ])
    }

    /// Policy that allows only RS256
    pub fn rs256_only() -> Self {
        Self::allow_only(vec![AlgorithmId::RS256])
    }

    /// Policy that allows any RSA algorithm (RS256, RS384, RS512)
    pub fn rsa_any() -> Self {
        Self::allow_only(vec![
            AlgorithmId::RS256,
            AlgorithmId::RS384,
            AlgorithmId::RS512,
        ])
    }

    /// Policy that allows any HMAC algorithm (HS256, HS384, HS512)
    pub fn hmac_any() -> Self {
        Self::allow_only(vec![
            AlgorithmId::HS256,
            AlgorithmId::HS384,
            AlgorithmId::HS512,
        ])
    }

    /// Check if an algorithm is allowed
    pub fn is_allowed(&self, algorithm: &AlgorithmId) -> bool {
        self.allowed.contains(algorithm)
    }

    /// Validate a raw header `alg` value against the policy
    pub fn validate(&self, algorithm: &str) -> Result<()> {
        let id = AlgorithmId::from_str(algorithm)?;
        if self.is_allowed(&id) {
            Ok(())
        } else {
            Err(Error::AlgorithmNotAllowed {
                found: id.to_string(),
                allowed: self.allowed.iter().map(ToString::to_string).collect(),
            })
        }
    }

    /// Get list of allowed algorithms
    pub fn allowed_algorithms(&self) -> &[AlgorithmId] {
        &self.allowed
    }
}

impl Default for AlgorithmPolicy {
    fn default() -> Self {
        Self::allow_all()
    }
}
