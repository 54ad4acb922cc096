use crate::token::Token;

/// Check that a token carries every required scope and audience
///
/// Membership is exact and case-sensitive. Empty requirements always pass.
/// This says nothing about the signature; verify the token first.
pub fn validate<S: AsRef<str>>(
    token: &Token,
    required_scopes: &[S],
    required_audiences: &[S],
) -> bool {
    required_scopes
        .iter()
        .all(|scope| token.has_scope(scope.as_ref()))
        && required_audiences
            .iter()
            .all(|audience| token.has_audience(audience.as_ref()))
}

/// Required scopes and audiences for an operation
///
/// ```ignore
/// let policy = AccessPolicy::new()
///     .require_scope("scim.read")
///     .require_audience("scim");
///
/// if !policy.permits(&token) {
///     return Err(Error::AccessDenied);
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessPolicy {
    pub scopes: Vec<String>,
    pub audiences: Vec<String>,
}

impl AccessPolicy {
    /// A policy with no requirements
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require_scope(mut self, scope: impl Into<String>) -> Self {
        self.scopes.push(scope.into());
        self
    }

    pub fn require_audience(mut self, audience: impl Into<String>) -> Self {
        self.audiences.push(audience.into());
        self
    }

    pub fn permits(&self, token: &Token) -> bool {
        validate(token, &self.scopes, &self.audiences)
    }
}
