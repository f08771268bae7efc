use josekit::jwk::Jwk;
use josekit::jws;
use serde_json::{Map, Value};
use tracing::debug;

use super::authenticator::Authenticator;
use super::credentials::credentials_from_body;
use crate::helpers::{claim_str, claim_timestamp, decode_jwt, now};
use crate::jwks::jwks::CustomJwk;
use crate::jwks::{JwksFetcher, SigningKeyFamily};
use crate::store::{AssertionReplayStore, ClientStore, Hasher};
use crate::types::{OAuthError, OidcAuthConfig, RegisteredClient, TokenRequest};

impl<S, F, R, H> Authenticator<S, F, R, H>
where
    S: ClientStore,
    F: JwksFetcher,
    R: AssertionReplayStore,
    H: Hasher,
{
    /// Authenticates a client presenting an RFC 7523 signed JWT assertion.
    /// The verification key is a function of the client the claims
    /// identify, so the assertion is decoded unverified first, the client
    /// resolved from it, and only then is the signature checked against
    /// the client's registered key material.
    pub(super) async fn authenticate_with_assertion(
        &self,
        request: &TokenRequest,
        assertion: &str,
    ) -> Result<RegisteredClient, OAuthError> {
        let decoded = decode_jwt(assertion)?;

        // Credentials in the form body are authoritative for the client id;
        // the assertion's `sub` claim is only the fallback.
        let credentials = credentials_from_body(request, false)?;
        let client_id = if !credentials.id.is_empty() {
            credentials.id
        } else {
            match claim_str(&decoded.claims, "sub") {
                Some(sub) => sub.to_string(),
                None => {
                    return Err(OAuthError::invalid_client(
                        "The claim 'sub' from the client_assertion JSON Web Token is undefined.",
                    ))
                }
            }
        };

        let client = self.store.get_client(&client_id).await.map_err(|e| {
            OAuthError::invalid_client(
                "The requested OAuth 2.0 Client does not exist or could not be loaded.",
            )
            .with_debug(e.to_string())
        })?;

        let oidc = client.oidc.as_ref().ok_or_else(|| {
            OAuthError::invalid_request(
                "The server configuration does not support OpenID Connect specific authentication methods.",
            )
        })?;

        match oidc.token_endpoint_auth_method.as_str() {
            "private_key_jwt" => {}
            "none" => {
                return Err(OAuthError::invalid_client(
                    "This requested OAuth 2.0 client does not support client authentication, however 'client_assertion' was provided in the request.",
                ))
            }
            method @ ("client_secret_post" | "client_secret_basic") => {
                return Err(OAuthError::invalid_client(&format!(
                    "This requested OAuth 2.0 client only supports client authentication method '{}', however 'client_assertion' was provided in the request.",
                    method
                )))
            }
            method => {
                return Err(OAuthError::invalid_client(&format!(
                    "This requested OAuth 2.0 client only supports client authentication method '{}', however that method is not supported by this server.",
                    method
                )))
            }
        }

        let header_alg = decoded.header.algorithm().unwrap_or("");
        if oidc.token_endpoint_auth_signing_alg != header_alg {
            return Err(OAuthError::invalid_client(&format!(
                "The 'client_assertion' uses signing algorithm '{}' but the requested OAuth 2.0 Client enforces signing algorithm '{}'.",
                header_alg, oidc.token_endpoint_auth_signing_alg
            )));
        }

        let family = match SigningKeyFamily::for_algorithm(header_alg) {
            Some(family) => family,
            None if header_alg.starts_with("HS") => {
                return Err(OAuthError::invalid_client(
                    "This authorization server does not support client authentication method 'client_secret_jwt'.",
                ))
            }
            None => {
                return Err(OAuthError::invalid_client(&format!(
                    "The 'client_assertion' request parameter uses unsupported signing algorithm '{}'.",
                    header_alg
                )))
            }
        };

        let key = self
            .find_client_public_jwk(oidc, decoded.header.key_id(), family)
            .await?;

        let verifier = key.to_verifier(header_alg)?;
        let (claims_bytes, _header) =
            jws::deserialize_compact(assertion, &*verifier).map_err(|e| {
                OAuthError::invalid_client(
                    "Unable to verify the integrity of the 'client_assertion' value.",
                )
                .with_debug(e.to_string())
            })?;

        // From here on only the signature-verified claim set is consulted.
        let claims =
            serde_json::from_slice::<Map<String, Value>>(&claims_bytes).map_err(|e| {
                OAuthError::invalid_client(
                    "Unable to verify the integrity of the 'client_assertion' value.",
                )
                .with_debug(e.to_string())
            })?;

        self.validate_time_claims(&claims)?;

        if claim_str(&claims, "iss") != Some(client_id.as_str()) {
            return Err(OAuthError::invalid_client(
                "Claim 'iss' from 'client_assertion' must match the 'client_id' of the OAuth 2.0 Client.",
            ));
        }

        if self.token_endpoint.is_empty() {
            return Err(OAuthError::misconfiguration(
                "The authorization server's token endpoint URL has not been set.",
            ));
        }

        if claim_str(&claims, "sub") != Some(client_id.as_str()) {
            return Err(OAuthError::invalid_client(
                "Claim 'sub' from 'client_assertion' must match the 'client_id' of the OAuth 2.0 Client.",
            ));
        }

        let jti = match claim_str(&claims, "jti") {
            Some(jti) if !jti.is_empty() => jti.to_string(),
            _ => {
                return Err(OAuthError::invalid_client(
                    "Claim 'jti' from 'client_assertion' must be set but is not.",
                ))
            }
        };

        let audience_matches = match claims.get("aud") {
            Some(Value::String(aud)) => aud == &self.token_endpoint,
            Some(Value::Array(auds)) => auds
                .iter()
                .any(|aud| aud.as_str() == Some(self.token_endpoint.as_str())),
            _ => false,
        };
        if !audience_matches {
            return Err(OAuthError::invalid_client(&format!(
                "Claim 'aud' from 'client_assertion' must match the authorization server's token endpoint '{}'.",
                self.token_endpoint
            )));
        }

        if self
            .replay_store
            .client_assertion_jwt_valid(&jti)
            .await
            .is_err()
        {
            return Err(OAuthError::jti_known(
                "Claim 'jti' from 'client_assertion' MUST only be used once.",
            ));
        }

        // The expiry was already validated above, so a non-numeric value
        // here should not happen.
        let expires_at = claim_timestamp(&claims, "exp").ok_or_else(|| {
            OAuthError::invalid_client(
                "Unable to type assert the expiry time from the 'client_assertion' claims.",
            )
        })?;

        // The replay record is written only after every other check has
        // passed; a rejected assertion must not leave a jti mark.
        self.replay_store
            .set_client_assertion_jwt(&jti, expires_at)
            .await?;

        debug!(client_id = %client.client_id, jti = %jti, "client assertion verified");
        Ok(client)
    }

    /// Default time claim validation: `exp` must be set and in the future,
    /// `nbf` and `iat` must not be in the future. All comparisons apply the
    /// configured clock tolerance.
    fn validate_time_claims(&self, claims: &Map<String, Value>) -> Result<(), OAuthError> {
        let timestamp = now();
        let tolerance = self.clock_tolerance.as_secs() as i64;
        let invalid = |debug: &str| {
            OAuthError::invalid_client(
                "Unable to verify the request object because its claims could not be validated, check if the expiry time is set correctly.",
            )
            .with_debug(debug)
        };

        match claim_timestamp(claims, "exp") {
            Some(expires_at) if expires_at > timestamp - tolerance => {}
            Some(_) => return Err(invalid("the client_assertion has expired")),
            None => return Err(invalid("the client_assertion has no numeric 'exp' claim")),
        }

        if let Some(not_before) = claim_timestamp(claims, "nbf") {
            if not_before > timestamp + tolerance {
                return Err(invalid("the client_assertion is not valid yet"));
            }
        }

        if let Some(issued_at) = claim_timestamp(claims, "iat") {
            if issued_at > timestamp + tolerance {
                return Err(invalid("the client_assertion was issued in the future"));
            }
        }

        Ok(())
    }

    /// Resolves the public key verifying a client assertion. An inline
    /// key set short-circuits the JWKS URI entirely; the URI is consulted
    /// from cache first and force-refreshed once when the key is not in
    /// the cached set, which absorbs stale caches after a key rotation.
    async fn find_client_public_jwk(
        &self,
        oidc: &OidcAuthConfig,
        kid: Option<&str>,
        family: SigningKeyFamily,
    ) -> Result<Jwk, OAuthError> {
        if let Some(set) = &oidc.jwks {
            return set.find_verification_key(kid, family).cloned();
        }

        if let Some(location) = oidc.jwks_uri.as_deref().filter(|uri| !uri.is_empty()) {
            let keys = self.jwks_fetcher.resolve(location, false).await?;
            if let Ok(key) = keys.find_verification_key(kid, family) {
                return Ok(key.clone());
            }

            debug!(location, "key not in cached JWKS, forcing refresh");
            let keys = self.jwks_fetcher.resolve(location, true).await?;
            return keys.find_verification_key(kid, family).cloned();
        }

        Err(OAuthError::invalid_client(
            "The OAuth 2.0 Client has no JSON Web Keys set registered, but they are needed to complete the request.",
        ))
    }
}
