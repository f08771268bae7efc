use tracing::debug;
use x509_parser::prelude::*;

use super::authenticator::Authenticator;
use crate::jwks::JwksFetcher;
use crate::store::{AssertionReplayStore, ClientStore, Hasher};
use crate::types::{OAuthError, RegisteredClient, TokenRequest};

/// The only certificate subject field clients can register for matching:
/// the entire Distinguished Name.
pub(crate) const DN_FIELD: &str = "DN";

impl<S, F, R, H> Authenticator<S, F, R, H>
where
    S: ClientStore,
    F: JwksFetcher,
    R: AssertionReplayStore,
    H: Hasher,
{
    /// Authenticates a client by its TLS peer certificate. The registered
    /// subject value must be a substring of the RFC 4514 rendering of the
    /// first peer certificate's subject. Substring matching is order
    /// dependent and can misbehave on multi-valued RDNs; a set-wise RDN
    /// sequence comparison would be stronger.
    pub(super) async fn authenticate_with_tls(
        &self,
        request: &TokenRequest,
    ) -> Result<RegisteredClient, OAuthError> {
        let client_id = request.form_value("client_id");
        if client_id.is_empty() {
            return Err(OAuthError::invalid_request("The client_id was not given."));
        }

        let client = self.store.get_client(client_id).await?;

        if let Some(oidc) = &client.oidc {
            if oidc.token_endpoint_auth_method != "tls_client_auth" {
                return Err(OAuthError::invalid_request(&format!(
                    "This requested OAuth 2.0 client only supports client authentication method '{}', but TLS authentication was requested.",
                    oidc.token_endpoint_auth_method
                )));
            }
        }

        let field = client.certificate_subject_field.as_deref().unwrap_or("");
        if field != DN_FIELD {
            return Err(OAuthError::invalid_client(&format!(
                "Client certificate field not supported: {}",
                field
            )));
        }

        // The dispatcher only routes here when a certificate is present.
        let der = match request.peer_certificates.first() {
            Some(der) => der.as_slice(),
            None => {
                return Err(OAuthError::invalid_request(
                    "No TLS client certificate was provided with the request.",
                ))
            }
        };

        let (_, certificate) = X509Certificate::from_der(der).map_err(|e| {
            OAuthError::invalid_request("The TLS client certificate could not be parsed.")
                .with_debug(e.to_string())
        })?;

        let subject = certificate.subject().to_string();
        let expected = client.certificate_subject_value.as_deref().unwrap_or("");

        if expected.is_empty() || !subject.contains(expected) {
            return Err(OAuthError::invalid_request(
                "The TLS client certificate subject does not match the registered subject value.",
            )
            .with_debug(format!(
                "Certificate does not contain expected subject. Given({}), Expected({})",
                subject, expected
            )));
        }

        debug!(client_id = %client.client_id, "client authenticated with TLS client certificate");
        Ok(client)
    }
}
