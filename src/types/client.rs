use serde::{Deserialize, Serialize};

use crate::jwks::Jwks;

/// # OidcAuthConfig
/// The OpenID Connect part of a client registration. A client that carries
/// this configuration has opted into the OIDC token endpoint authentication
/// methods; a plain OAuth 2.0 client leaves it unset and is exempt from
/// method enforcement.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Clone)]
pub struct OidcAuthConfig {
    /// [Authentication method](https://openid.net/specs/openid-connect-registration-1_0.html#ClientMetadata)
    /// the client registered for the token endpoint. One of
    /// `client_secret_basic`, `client_secret_post`, `client_secret_jwt`,
    /// `private_key_jwt`, `tls_client_auth` or `none`.
    #[serde(default)]
    pub token_endpoint_auth_method: String,
    /// [Algorithm](https://openid.net/specs/openid-connect-registration-1_0.html#ClientMetadata)
    /// the client registered for signing the JWT used to authenticate at
    /// the token endpoint
    #[serde(default)]
    pub token_endpoint_auth_signing_alg: String,
    /// [JWKS](https://openid.net/specs/openid-connect-registration-1_0.html#ClientMetadata)
    /// registered inline. Takes precedence over `jwks_uri`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jwks: Option<Jwks>,
    /// [Jwks Uri](https://openid.net/specs/openid-connect-registration-1_0.html#ClientMetadata)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jwks_uri: Option<String>,
}

/// # RegisteredClient
/// A client registration as the authorization server stores it. The secret
/// is kept only in hashed form; comparison goes through the
/// [Hasher](crate::Hasher) collaborator.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Clone)]
pub struct RegisteredClient {
    /// Client Id
    pub client_id: String,
    /// Hashed client secret. Opaque bytes, only ever compared by the hasher.
    #[serde(default)]
    pub hashed_secret: Vec<u8>,
    /// Whether the client is a public client (no credentials)
    #[serde(default)]
    pub public: bool,
    /// Which certificate subject field identifies the client when
    /// authenticating via mutual TLS. Only `"DN"` is supported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_subject_field: Option<String>,
    /// The value the certificate subject must contain when authenticating
    /// via mutual TLS
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_subject_value: Option<String>,
    /// OpenID Connect token endpoint authentication configuration. `None`
    /// for plain OAuth 2.0 clients.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oidc: Option<OidcAuthConfig>,
}

impl RegisteredClient {
    /// Whether the client is a public client
    pub fn is_public(&self) -> bool {
        self.public
    }
}
