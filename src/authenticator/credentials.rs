use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::types::{OAuthError, TokenRequest};

#[derive(Debug)]
pub(crate) struct ClientCredentials {
    pub id: String,
    pub secret: String,
}

/// The userid and password from an HTTP Basic `Authorization` header,
/// still percent-encoded. `None` when the header is absent or not a
/// well-formed Basic challenge response.
fn basic_auth(request: &TokenRequest) -> Option<(String, String)> {
    let header = request.authorization.as_deref()?;
    let (scheme, encoded) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("Basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (id, secret) = decoded.split_once(':')?;
    Some((id.to_string(), secret.to_string()))
}

/// Whether the request carries a well-formed HTTP Basic header
pub(crate) fn has_basic_auth(request: &TokenRequest) -> bool {
    basic_auth(request).is_some()
}

/// Extracts client credentials, preferring the HTTP Basic header over the
/// form body. Userid and password in the header are percent-encoded per
/// RFC 6749 section 2.3.1 and are decoded here.
pub(crate) fn credentials_from_request(
    request: &TokenRequest,
) -> Result<ClientCredentials, OAuthError> {
    let (id, secret) = match basic_auth(request) {
        Some(credentials) => credentials,
        None => return credentials_from_body(request, true),
    };

    let id = urlencoding::decode(&id).map_err(|e| {
        OAuthError::invalid_request(
            "The client id in the HTTP authorization header could not be decoded from 'application/x-www-form-urlencoded'.",
        )
        .with_debug(e.to_string())
    })?;
    let secret = urlencoding::decode(&secret).map_err(|e| {
        OAuthError::invalid_request(
            "The client secret in the HTTP authorization header could not be decoded from 'application/x-www-form-urlencoded'.",
        )
        .with_debug(e.to_string())
    })?;

    Ok(ClientCredentials {
        id: id.into_owned(),
        secret: secret.into_owned(),
    })
}

/// Extracts client credentials from the form body. With `require_id` a
/// missing `client_id` is an error.
pub(crate) fn credentials_from_body(
    request: &TokenRequest,
    require_id: bool,
) -> Result<ClientCredentials, OAuthError> {
    let id = request.form_value("client_id");
    let secret = request.form_value("client_secret");

    if id.is_empty() && require_id {
        return Err(OAuthError::invalid_request(
            "Client credentials missing or malformed in both HTTP Authorization header and HTTP POST body.",
        ));
    }

    Ok(ClientCredentials {
        id: id.to_string(),
        secret: secret.to_string(),
    })
}
