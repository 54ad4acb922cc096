use crate::claims;
use crate::error::{Error, Result};
use crate::limits::{
    MAX_DECODED_CLAIMS_SIZE, MAX_DECODED_HEADER_SIZE, MAX_TOKEN_LENGTH,
};
use crate::token::{Token, TokenHeader, TokenSegments};
use crate::utils::base64url;

/// Decode a compact token without checking its signature
///
/// The result is suitable for inspection and for [`Token::verify`]. Nothing
/// in it is trustworthy until verification succeeds.
///
/// ```ignore
/// let token = decode(bearer)?;
/// token.verify(registry.keys())?;
/// ```
pub fn decode(token: &str) -> Result<Token> {
    if token.len() > MAX_TOKEN_LENGTH {
        return Err(Error::TokenTooLarge {
            size: token.len(),
            max: MAX_TOKEN_LENGTH,
        });
    }

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(Error::InvalidToken(format!(
            "invalid number of segments in token ({}/3)",
            parts.len()
        )));
    }

    let header_json = base64url::decode_string(parts[0], MAX_DECODED_HEADER_SIZE)
        .map_err(|e| segment_error("header", e))?;
    let header: TokenHeader = miniserde::json::from_str(&header_json)
        .map_err(|e| Error::InvalidToken(format!("header cannot be parsed: {e}")))?;

    let claims_json = base64url::decode_string(parts[1], MAX_DECODED_CLAIMS_SIZE)
        .map_err(|e| segment_error("claims", e))?;

    let mut decoded = Token::new();
    claims::apply_json(&mut decoded, &claims_json)?;

    decoded.key_id = header.key_id;
    decoded.algorithm = Some(header.algorithm);
    decoded.segments = TokenSegments {
        header: parts[0].to_string(),
        claims: parts[1].to_string(),
        signature: parts[2].to_string(),
    };

    Ok(decoded)
}

fn segment_error(segment: &str, error: Error) -> Error {
    let detail = match error {
        Error::InvalidToken(message) => message,
        other => other.to_string(),
    };
    Error::InvalidToken(format!("{segment} cannot be decoded: {detail}"))
}
