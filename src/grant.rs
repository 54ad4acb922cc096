//! Token issuance for OAuth2 grants
//!
//! [`TokenIssuer`] turns client and user records into signed access tokens.
//! It decides which scopes and audiences a token gets; HTTP handling and
//! record storage belong to the caller.

use crate::claims::derive_audiences;
use crate::config::IssuerConfig;
use crate::error::{Error, Result};
use crate::keys::{KeyRegistry, TokenKey, TokenKeys};
use crate::token::{encode, Token};
use miniserde::Serialize;
use ring::rand::{SecureRandom, SystemRandom};
use tracing::{debug, warn};

const CLIENT_CREDENTIALS: &str = "client_credentials";
const PASSWORD: &str = "password";
const IMPLICIT: &str = "implicit";

/// Client record fields that affect token issuance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Client {
    pub id: String,
    /// Scopes a user token may get through this client
    pub scope: Vec<String>,
    /// Scopes a client-credentials token for this client gets
    pub authorities: Vec<String>,
    /// Kept for compatibility; not used for audiences
    pub resource_ids: Vec<String>,
    /// Empty means unrestricted
    pub authorized_grant_types: Vec<String>,
    /// Scopes that need no user consent
    pub autoapprove: Vec<String>,
}

impl Client {
    fn allows_grant(&self, grant_type: &str) -> bool {
        self.authorized_grant_types.is_empty()
            || self.authorized_grant_types.iter().any(|g| g == grant_type)
    }
}

/// User record fields that affect token issuance
#[derive(Clone, Default, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub user_name: String,
    pub password: String,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("user_name", &self.user_name)
            .finish_non_exhaustive()
    }
}

/// Form values of an authorize request
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AuthorizeRequest {
    pub username: String,
    pub password: String,
    /// Must be `credentials`
    pub source: String,
    /// Space-separated requested scopes
    pub scope: String,
}

impl AuthorizeRequest {
    /// A credentials request for the given scopes
    pub fn credentials(
        username: impl Into<String>,
        password: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            source: "credentials".to_string(),
            scope: scope.into(),
        }
    }
}

impl std::fmt::Debug for AuthorizeRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizeRequest")
            .field("username", &self.username)
            .field("source", &self.source)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

/// Token response document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedToken {
    pub access_token: String,
    /// Always `bearer`
    pub token_type: String,
    pub expires_in: u64,
    /// Space-joined granted scopes
    pub scope: String,
    /// Random UUID identifying this issuance
    pub jti: String,
}

impl IssuedToken {
    pub fn to_json(&self) -> String {
        miniserde::json::to_string(self)
    }
}

/// Result of an authorize request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrantOutcome {
    /// Token minted for the approved scopes
    Issued(IssuedToken),

    /// Some approved scopes are not auto-approved by the client
    ///
    /// No consent flow exists yet; the caller decides how to respond. No
    /// token is minted.
    ConsentRequired { scopes: Vec<String> },

    /// Credentials were missing or wrong; send the user to the login page
    LoginRequired,
}

/// Mints signed tokens with the active key of a registry
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    registry: KeyRegistry,
    issuer: String,
    default_scopes: Vec<String>,
    access_token_validity: u64,
}

impl TokenIssuer {
    /// Issuer with the given key registry and config values
    ///
    /// Keys in `config` are ignored; use [`from_config`](Self::from_config)
    /// to build the registry from the config.
    pub fn new(registry: KeyRegistry, config: &IssuerConfig) -> Self {
        Self {
            registry,
            issuer: config.token_issuer(),
            default_scopes: config.default_scopes.clone(),
            access_token_validity: config.access_token_validity,
        }
    }

    /// Build the registry from `config` and check the active key can sign
    pub fn from_config(config: &IssuerConfig) -> Result<Self> {
        if config.issuer_url.is_empty() {
            return Err(Error::Configuration("issuer_url must not be empty".into()));
        }

        let registry = KeyRegistry::new(config.signing_keys.clone(), &config.active_key_id)?;
        registry.active().signing_material()?;

        debug!(
            issuer = %config.token_issuer(),
            active_kid = %config.active_key_id,
            keys = registry.len(),
            "token issuer configured"
        );
        Ok(Self::new(registry, config))
    }

    pub fn registry(&self) -> &KeyRegistry {
        &self.registry
    }

    /// The `iss` claim of issued tokens
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn default_scopes(&self) -> &[String] {
        &self.default_scopes
    }

    /// Discovery document for the active key
    pub fn token_key(&self) -> Result<Option<TokenKey>> {
        self.registry.token_key()
    }

    /// Discovery documents for all RSA keys
    pub fn token_keys(&self) -> Result<TokenKeys> {
        self.registry.token_keys()
    }

    /// Mint a client-credentials token
    ///
    /// The client's authorities become both the `authorities` and `scope`
    /// claims. Audiences come from the authorities plus the client id.
    pub fn client_credentials(&self, client: &Client) -> Result<IssuedToken> {
        check_grant(client, CLIENT_CREDENTIALS)?;

        let audiences =
            derive_audiences(Some(client.id.as_str()), &[], client.authorities.as_slice());
        let token = Token::new()
            .client_id(client.id.as_str())
            .scopes(client.authorities.iter().cloned())
            .authorities(client.authorities.iter().cloned())
            .audiences(audiences);

        self.issue(token)
    }

    /// Mint a password-grant token for `user`
    ///
    /// The client's `scope` list, filtered by the default-scope allow-list,
    /// becomes the `scope` claim. Audiences come from those scopes plus the
    /// client id. A username or password that does not match `user` is
    /// [`Error::BadCredentials`].
    pub fn password(
        &self,
        client: &Client,
        user: &User,
        username: &str,
        password: &str,
    ) -> Result<IssuedToken> {
        check_grant(client, PASSWORD)?;

        if username != user.user_name || password != user.password {
            warn!(client_id = %client.id, "password grant with bad credentials");
            return Err(Error::BadCredentials);
        }

        let scopes = self.allowed_scopes(client.scope.iter().map(String::as_str));
        let audiences = derive_audiences(Some(client.id.as_str()), scopes.as_slice(), &[]);
        let token = Token::new()
            .client_id(client.id.as_str())
            .user_id(user.id.as_str())
            .scopes(scopes)
            .audiences(audiences);

        self.issue(token)
    }

    /// Handle an implicit-grant authorize request with posted credentials
    ///
    /// Requested scopes outside the default-scope allow-list are dropped,
    /// keeping request order. If the client does not auto-approve all of
    /// the remaining scopes, no token is minted. A client restricted to
    /// other grant types is refused before credentials are looked at.
    pub fn authorize(
        &self,
        client: &Client,
        user: &User,
        request: &AuthorizeRequest,
    ) -> Result<GrantOutcome> {
        check_grant(client, IMPLICIT)?;

        if request.source != "credentials"
            || request.username != user.user_name
            || request.password != user.password
        {
            debug!(client_id = %client.id, "authorize request needs login");
            return Ok(GrantOutcome::LoginRequired);
        }

        let scopes = self.allowed_scopes(request.scope.split_whitespace());

        if scopes
            .iter()
            .any(|scope| !client.autoapprove.contains(scope))
        {
            debug!(client_id = %client.id, "authorize request needs consent");
            return Ok(GrantOutcome::ConsentRequired { scopes });
        }

        let audiences = derive_audiences(Some(client.id.as_str()), scopes.as_slice(), &[]);
        let token = Token::new()
            .client_id(client.id.as_str())
            .user_id(user.id.as_str())
            .scopes(scopes)
            .audiences(audiences);

        self.issue(token).map(GrantOutcome::Issued)
    }

    /// Scopes in the default-scope allow-list, first occurrence kept
    fn allowed_scopes<'a>(&self, requested: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        let mut scopes: Vec<String> = Vec::new();
        for scope in requested {
            if self.default_scopes.iter().any(|s| s == scope) && !scopes.iter().any(|s| s == scope)
            {
                scopes.push(scope.to_string());
            }
        }
        scopes
    }

    /// Sign a token with the active key
    ///
    /// Sets `iss` and wraps the result in a token response.
    pub fn issue(&self, token: Token) -> Result<IssuedToken> {
        let token = token.issuer(self.issuer.as_str());
        let key = self.registry.active();
        let access_token = encode(&token, key)?;

        debug!(
            kid = %key.key_id,
            client_id = ?token.client_id,
            user_id = ?token.user_id,
            scopes = token.scopes.len(),
            "access token issued"
        );

        Ok(IssuedToken {
            access_token,
            token_type: "bearer".to_string(),
            expires_in: self.access_token_validity,
            scope: token.scopes.join(" "),
            jti: generate_jti()?,
        })
    }
}

fn check_grant(client: &Client, grant_type: &'static str) -> Result<()> {
    if client.allows_grant(grant_type) {
        return Ok(());
    }
    warn!(client_id = %client.id, grant_type, "grant refused");
    Err(Error::GrantNotAllowed {
        client_id: client.id.clone(),
        grant_type,
    })
}

/// Random version 4 UUID
fn generate_jti() -> Result<String> {
    let mut bytes = [0u8; 16];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| Error::Signing("random number generator failed".into()))?;
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    Ok(format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    ))
}
