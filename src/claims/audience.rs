/// Derive the `aud` values for a token
///
/// Each scope and authority contributes its resource prefix, the part before
/// the first `.` (`scim.read` becomes `scim`, `openid` stays `openid`). The
/// client id comes first when present, then prefixes in first-seen order with
/// scopes ahead of authorities. Duplicates are dropped.
///
/// A value with an empty prefix, such as `.hidden`, contributes nothing,
/// and neither does an empty client id. The `aud` claim is space-joined, so
/// an empty audience could not survive an encode/decode round trip.
pub fn derive_audiences<S: AsRef<str>>(
    client_id: Option<&str>,
    scopes: &[S],
    authorities: &[S],
) -> Vec<String> {
    let mut audiences: Vec<String> = Vec::new();
    let mut push = |candidate: &str| {
        if !candidate.is_empty() && !audiences.iter().any(|a| a == candidate) {
            audiences.push(candidate.to_string());
        }
    };

    if let Some(client_id) = client_id {
        push(client_id);
    }
    for value in scopes.iter().chain(authorities) {
        push(resource_prefix(value.as_ref()));
    }

    audiences
}

fn resource_prefix(value: &str) -> &str {
    value.split('.').next().unwrap_or(value)
}
