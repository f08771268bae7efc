use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use josekit::jws::JwsHeader;
use serde_json::{Map, Value};

use crate::types::OAuthError;

/// Gets a Unix Timestamp in seconds. Uses [`SystemTime::now`]
pub fn now() -> i64 {
    let start = SystemTime::now();
    start
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_secs() as i64
}

/// A JWT decoded without signature verification. The claims stay a plain
/// JSON map so that numeric dates survive in whatever encoding the sender
/// used; nothing read from here is trusted until the signature has been
/// verified.
#[derive(Debug)]
pub(crate) struct DecodedJwt {
    pub header: JwsHeader,
    pub claims: Map<String, Value>,
}

/// Decodes a JWT without verification
pub(crate) fn decode_jwt(token: &str) -> Result<DecodedJwt, OAuthError> {
    let split_token: Vec<&str> = token.split('.').collect();

    if split_token.len() == 5 {
        return Err(OAuthError::invalid_client(
            "The 'client_assertion' value is an encrypted JSON Web Token, which is not supported.",
        ));
    }

    if split_token.len() != 3 {
        return Err(OAuthError::invalid_client(
            "Unable to verify the integrity of the 'client_assertion' value.",
        )
        .with_debug("JWTs must have three components"));
    }

    let malformed = |debug: &str| {
        OAuthError::invalid_client(
            "Unable to verify the integrity of the 'client_assertion' value.",
        )
        .with_debug(debug)
    };

    let header_bytes = URL_SAFE_NO_PAD
        .decode(split_token[0])
        .map_err(|_| malformed("JWT header is not valid base64url"))?;
    let claims_bytes = URL_SAFE_NO_PAD
        .decode(split_token[1])
        .map_err(|_| malformed("JWT payload is not valid base64url"))?;

    let header = serde_json::from_slice::<Map<String, Value>>(&header_bytes)
        .map_err(|_| malformed("JWT header is not a JSON object"))
        .map(JwsHeader::from_map)?
        .map_err(|_| malformed("JWT header is not a valid JWS header"))?;

    let claims = serde_json::from_slice::<Map<String, Value>>(&claims_bytes)
        .map_err(|_| malformed("JWT payload is not a JSON object"))?;

    Ok(DecodedJwt { header, claims })
}

/// The claim value for `name` when it is a string
pub(crate) fn claim_str<'a>(claims: &'a Map<String, Value>, name: &str) -> Option<&'a str> {
    match claims.get(name) {
        Some(Value::String(value)) => Some(value),
        _ => None,
    }
}

/// The claim value for `name` when it is a JSON number, truncated to whole
/// seconds. Accepts both integer and IEEE-754 encodings of numeric dates.
pub(crate) fn claim_timestamp(claims: &Map<String, Value>, name: &str) -> Option<i64> {
    match claims.get(name) {
        Some(Value::Number(value)) => match value.as_i64() {
            Some(seconds) => Some(seconds),
            None => value.as_f64().map(|seconds| seconds as i64),
        },
        _ => None,
    }
}
