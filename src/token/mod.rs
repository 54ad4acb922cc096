//! The claims model and its compact serialization
//!
//! A [`Token`] is both what the issuer fills in before [`encode`] and what
//! [`decode`] produces from a bearer string. Decoding keeps the three
//! segment substrings so verification checks the exact bytes that were
//! signed.

mod decode;
mod encode;
mod header;
mod verify;

pub use decode::decode;
pub use encode::encode;
pub use header::TokenHeader;

/// The three base64url segments of a compact token, as received
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSegments {
    pub header: String,
    pub claims: String,
    pub signature: String,
}

impl TokenSegments {
    /// `header.claims`, the bytes the signature covers
    pub fn signing_input(&self) -> String {
        format!("{}.{}", self.header, self.claims)
    }

    /// Reassemble the compact token string
    pub fn compact(&self) -> String {
        format!("{}.{}.{}", self.header, self.claims, self.signature)
    }
}

/// An access token
///
/// Empty identity fields are `None` and are omitted when encoding. `audiences`
/// keeps insertion order and never holds duplicates when built through
/// [`Token::add_audience`] or [`derive_audiences`](crate::claims::derive_audiences).
///
/// `key_id`, `algorithm` and `segments` are filled in by [`decode`]; a token
/// built for encoding leaves them empty, the signing key supplies them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Token {
    pub client_id: Option<String>,
    pub user_id: Option<String>,
    pub scopes: Vec<String>,
    pub authorities: Vec<String>,
    pub audiences: Vec<String>,
    pub issuer: Option<String>,
    pub key_id: Option<String>,
    pub algorithm: Option<String>,
    pub segments: TokenSegments,
}

impl Token {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = non_empty(client_id.into());
        self
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = non_empty(user_id.into());
        self
    }

    pub fn scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    pub fn authorities<I, S>(mut self, authorities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authorities = authorities.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the audiences, dropping duplicates
    pub fn audiences<I, S>(mut self, audiences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.audiences.clear();
        for audience in audiences {
            self.add_audience(audience);
        }
        self
    }

    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = non_empty(issuer.into());
        self
    }

    /// Append an audience unless it is already present
    pub fn add_audience(&mut self, audience: impl Into<String>) {
        let audience = audience.into();
        if !self.audiences.contains(&audience) {
            self.audiences.push(audience);
        }
    }

    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }

    pub fn has_audience(&self, audience: &str) -> bool {
        self.audiences.iter().any(|a| a == audience)
    }

    /// The compact string this token was decoded from
    ///
    /// Empty for a token that was never decoded.
    pub fn as_compact(&self) -> String {
        if self.segments == TokenSegments::default() {
            String::new()
        } else {
            self.segments.compact()
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
