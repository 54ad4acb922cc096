use crate::error::{Error, Result};
use crate::keys::{SigningKey, TokenKey, TokenKeys};
use crate::token::Token;

/// Ordered set of signing keys with one active key
///
/// The registry is immutable once built and can be shared across threads.
/// Tokens are signed with the active key and verified against any key whose
/// id matches the token's `kid`.
///
/// ```ignore
/// let registry = KeyRegistry::new(
///     vec![
///         SigningKey::hmac("legacy-token-key", "tokensecret"),
///         SigningKey::rsa("token-key", private_pem),
///     ],
///     "token-key",
/// )?;
/// registry.verify(&token)?;
/// ```
#[derive(Debug, Clone)]
pub struct KeyRegistry {
    keys: Vec<SigningKey>,
    active: usize,
}

impl KeyRegistry {
    /// Build a registry, rejecting duplicate ids and a missing active key
    pub fn new(keys: Vec<SigningKey>, active_key_id: &str) -> Result<Self> {
        for (index, key) in keys.iter().enumerate() {
            if keys[..index].iter().any(|k| k.key_id == key.key_id) {
                return Err(Error::DuplicateKeyId(key.key_id.clone()));
            }
        }

        let active = keys
            .iter()
            .position(|k| k.key_id == active_key_id)
            .ok_or_else(|| Error::ActiveKeyNotFound(active_key_id.to_string()))?;

        Ok(Self { keys, active })
    }

    /// Look up a key by id
    pub fn get(&self, key_id: &str) -> Option<&SigningKey> {
        self.keys.iter().find(|k| k.key_id == key_id)
    }

    /// The key new tokens are signed with
    pub fn active(&self) -> &SigningKey {
        &self.keys[self.active]
    }

    pub fn keys(&self) -> &[SigningKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Verify a decoded token against the registry's keys
    pub fn verify(&self, token: &Token) -> Result<()> {
        token.verify(&self.keys)
    }

    /// Discovery document for the active key
    ///
    /// `None` when the active key is an HMAC secret.
    pub fn token_key(&self) -> Result<Option<TokenKey>> {
        TokenKey::from_signing_key(self.active())
    }

    /// Discovery documents for every RSA key, in registry order
    pub fn token_keys(&self) -> Result<TokenKeys> {
        let mut keys = Vec::new();
        for key in &self.keys {
            if let Some(token_key) = TokenKey::from_signing_key(key)? {
                keys.push(token_key);
            }
        }
        Ok(TokenKeys { keys })
    }
}
