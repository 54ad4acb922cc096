//! Access-token claims: JSON mapping, audience derivation and authorization
//!
//! Claim names follow UAA:
//! - `client_id`, `user_id`, `iss`: strings, omitted when empty
//! - `scope`: array of strings, always present
//! - `aud`: space-joined string, present when there are audiences
//! - `authorities`: array of strings, present when not empty

mod audience;
mod validator;

pub use audience::derive_audiences;
pub use validator::{validate, AccessPolicy};

use crate::error::{Error, Result};
use crate::token::Token;
use miniserde::json::{self, Array, Object, Value};

/// Serialize the claims of `token` to JSON
pub(crate) fn to_json(token: &Token) -> String {
    let mut claims = Object::new();

    if let Some(client_id) = &token.client_id {
        claims.insert("client_id".to_string(), Value::String(client_id.clone()));
    }
    if let Some(user_id) = &token.user_id {
        claims.insert("user_id".to_string(), Value::String(user_id.clone()));
    }
    claims.insert("scope".to_string(), string_array(&token.scopes));
    if !token.authorities.is_empty() {
        claims.insert("authorities".to_string(), string_array(&token.authorities));
    }
    if !token.audiences.is_empty() {
        claims.insert("aud".to_string(), Value::String(token.audiences.join(" ")));
    }
    if let Some(issuer) = &token.issuer {
        claims.insert("iss".to_string(), Value::String(issuer.clone()));
    }

    json::to_string(&claims)
}

/// Populate the claim fields of `token` from a claims JSON document
///
/// Unknown claims are ignored. A known claim with the wrong JSON type is an
/// error, `null` counts as absent.
pub(crate) fn apply_json(token: &mut Token, claims_json: &str) -> Result<()> {
    let claims: Object = json::from_str(claims_json)
        .map_err(|e| Error::InvalidToken(format!("claims cannot be parsed: {e}")))?;

    token.client_id = optional_string(&claims, "client_id")?;
    token.user_id = optional_string(&claims, "user_id")?;
    token.issuer = optional_string(&claims, "iss")?;
    token.scopes = string_list(&claims, "scope")?;
    token.authorities = string_list(&claims, "authorities")?;

    token.audiences.clear();
    match claims.get("aud") {
        None | Some(Value::Null) => {}
        Some(Value::String(aud)) => {
            for audience in aud.split_whitespace() {
                token.add_audience(audience);
            }
        }
        Some(Value::Array(values)) => {
            for value in values.iter() {
                token.add_audience(expect_string("aud", value)?);
            }
        }
        Some(_) => return Err(wrong_type("aud")),
    }

    Ok(())
}

fn string_array(values: &[String]) -> Value {
    let mut array = Array::new();
    for value in values {
        array.push(Value::String(value.clone()));
    }
    Value::Array(array)
}

fn optional_string(claims: &Object, name: &str) -> Result<Option<String>> {
    match claims.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(wrong_type(name)),
    }
}

fn string_list(claims: &Object, name: &str) -> Result<Vec<String>> {
    match claims.get(name) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(values)) => values
            .iter()
            .map(|v| expect_string(name, v).map(str::to_string))
            .collect(),
        Some(_) => Err(wrong_type(name)),
    }
}

fn expect_string<'a>(name: &str, value: &'a Value) -> Result<&'a str> {
    match value {
        Value::String(s) => Ok(s.as_str()),
        _ => Err(wrong_type(name)),
    }
}

fn wrong_type(name: &str) -> Error {
    Error::InvalidToken(format!("claim '{name}' has an unexpected type"))
}
