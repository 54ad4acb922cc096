use crate::algorithm::get_algorithm;
use crate::claims;
use crate::error::Result;
use crate::keys::SigningKey;
use crate::token::{Token, TokenHeader};
use crate::utils::base64url;
use tracing::debug;

/// Sign `token` with `key` and return the compact string
///
/// The header algorithm is the key's declared algorithm in JOSE form
/// (`SHA256withRSA` becomes `RS256`) and `kid` is the key id. Any `key_id`,
/// `algorithm` or `segments` already on the token are ignored.
pub fn encode(token: &Token, key: &SigningKey) -> Result<String> {
    let algorithm_id = key.declared_algorithm()?;
    let material = key.signing_material()?;

    let header = TokenHeader::new(algorithm_id, key.key_id.as_str());
    let header_segment = base64url::encode(&miniserde::json::to_string(&header));
    let claims_segment = base64url::encode(&claims::to_json(token));
    let signing_input = format!("{header_segment}.{claims_segment}");

    let signature = get_algorithm(algorithm_id).sign(&signing_input, &material)?;

    debug!(
        kid = %key.key_id,
        alg = %algorithm_id,
        "signed access token"
    );

    Ok(format!(
        "{signing_input}.{}",
        base64url::encode_bytes(&signature)
    ))
}
