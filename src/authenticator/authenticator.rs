use std::time::Duration;

use tracing::{debug, instrument};

use super::credentials::{credentials_from_request, has_basic_auth};
use crate::jwks::JwksFetcher;
use crate::store::{AssertionReplayStore, ClientStore, Hasher};
use crate::types::{OAuthError, RegisteredClient, TokenRequest};

/// The `client_assertion_type` value selecting RFC 7523 JWT bearer
/// authentication
pub const CLIENT_ASSERTION_JWT_BEARER_TYPE: &str =
    "urn:ietf:params:oauth:client-assertion-type:jwt-bearer";

/// # Authenticator
/// Decides, for an incoming token endpoint request, which client is making
/// it and whether the client has proven its identity under the
/// authentication method it registered. Holds no mutable state of its own;
/// everything that persists lives behind the collaborator traits.
pub struct Authenticator<S, F, R, H> {
    pub(crate) store: S,
    pub(crate) jwks_fetcher: F,
    pub(crate) replay_store: R,
    pub(crate) hasher: H,
    pub(crate) token_endpoint: String,
    pub(crate) clock_tolerance: Duration,
}

impl<S, F, R, H> Authenticator<S, F, R, H>
where
    S: ClientStore,
    F: JwksFetcher,
    R: AssertionReplayStore,
    H: Hasher,
{
    /// Creates an authenticator. `token_endpoint` is the absolute URL of
    /// the server's token endpoint and the required audience of client
    /// assertions.
    pub fn new(
        store: S,
        jwks_fetcher: F,
        replay_store: R,
        hasher: H,
        token_endpoint: impl Into<String>,
    ) -> Self {
        Self {
            store,
            jwks_fetcher,
            replay_store,
            hasher,
            token_endpoint: token_endpoint.into(),
            clock_tolerance: Duration::ZERO,
        }
    }

    /// Sets the leeway applied to time claims when validating assertions
    pub fn clock_tolerance(mut self, tolerance: Duration) -> Self {
        self.clock_tolerance = tolerance;
        self
    }

    /// Authenticates the client making `request`. The attempted method is
    /// negotiated from the request shape: a `client_assertion_type`
    /// parameter selects the signed assertion path, a TLS peer certificate
    /// selects mutual TLS, anything else is treated as shared secret (or
    /// public client) authentication. The selected method must then match
    /// the method the client registered.
    #[instrument(skip(self, request), level = "debug")]
    pub async fn authenticate_client(
        &self,
        request: &TokenRequest,
    ) -> Result<RegisteredClient, OAuthError> {
        let assertion_type = request.form_value("client_assertion_type");
        if assertion_type == CLIENT_ASSERTION_JWT_BEARER_TYPE {
            let assertion = request.form_value("client_assertion");
            if assertion.is_empty() {
                return Err(OAuthError::invalid_request(&format!(
                    "The client_assertion request parameter must be set when using client_assertion_type of '{}'.",
                    CLIENT_ASSERTION_JWT_BEARER_TYPE
                )));
            }

            return self.authenticate_with_assertion(request, assertion).await;
        } else if !assertion_type.is_empty() {
            return Err(OAuthError::invalid_request(&format!(
                "Unknown client_assertion_type '{}'.",
                assertion_type
            )));
        }

        if request.has_peer_certificate() {
            return self.authenticate_with_tls(request).await;
        }

        let credentials = credentials_from_request(request)?;

        let client = self.store.get_client(&credentials.id).await.map_err(|e| {
            OAuthError::invalid_client(
                "The requested OAuth 2.0 Client does not exist or could not be loaded.",
            )
            .with_debug(e.to_string())
        })?;

        if let Some(oidc) = &client.oidc {
            let method = oidc.token_endpoint_auth_method.as_str();
            let body_credentials = !request.form_value("client_id").is_empty()
                && !request.form_value("client_secret").is_empty();

            if body_credentials && method != "client_secret_post" {
                return Err(OAuthError::invalid_client(&format!(
                    "The OAuth 2.0 Client supports client authentication method '{}', but method 'client_secret_post' was requested. You must configure the OAuth 2.0 client's 'token_endpoint_auth_method' value to accept 'client_secret_post'.",
                    method
                )));
            } else if has_basic_auth(request) && method != "client_secret_basic" {
                return Err(OAuthError::invalid_client(&format!(
                    "The OAuth 2.0 Client supports client authentication method '{}', but method 'client_secret_basic' was requested. You must configure the OAuth 2.0 client's 'token_endpoint_auth_method' value to accept 'client_secret_basic'.",
                    method
                )));
            } else if client.is_public() && method != "none" {
                return Err(OAuthError::invalid_client(&format!(
                    "The OAuth 2.0 Client supports client authentication method '{}', but method 'none' was requested. You must configure the OAuth 2.0 client's 'token_endpoint_auth_method' value to accept 'none'.",
                    method
                )));
            }
        }

        if client.is_public() {
            debug!(client_id = %client.client_id, "public client, no credentials enforced");
            return Ok(client);
        }

        self.hasher
            .compare(&client.hashed_secret, credentials.secret.as_bytes())
            .await
            .map_err(|e| {
                OAuthError::invalid_client("The provided client secret is not valid.")
                    .with_debug(e.to_string())
            })?;

        debug!(client_id = %client.client_id, "client authenticated with shared secret");
        Ok(client)
    }
}
