use std::sync::Arc;
use std::time::Duration;

use josekit::jwk::Jwk;
use josekit::jws::alg::ecdsa::EcdsaJwsAlgorithm;
use josekit::jws::alg::hmac::HmacJwsAlgorithm;
use josekit::jws::alg::rsassa::RsassaJwsAlgorithm;
use josekit::jws::{self, JwsHeader, JwsSigner};
use serde_json::{json, Value};

use crate::jwks::Jwks;
use crate::store::{InMemoryClientStore, InMemoryReplayStore, Sha256Hasher};
use crate::types::{OidcAuthConfig, RegisteredClient, TokenRequest};
use crate::{Authenticator, CachingJwksFetcher};

pub const TOKEN_ENDPOINT: &str = "https://as.example/token";

pub type TestAuthenticator = Authenticator<
    Arc<InMemoryClientStore>,
    Arc<CachingJwksFetcher>,
    Arc<InMemoryReplayStore>,
    Arc<Sha256Hasher>,
>;

pub struct TestSetup {
    pub authenticator: TestAuthenticator,
    pub replay: Arc<InMemoryReplayStore>,
}

pub fn setup(initial_clients: Vec<RegisteredClient>) -> TestSetup {
    let replay = Arc::new(InMemoryReplayStore::new());
    let authenticator = Authenticator::new(
        Arc::new(InMemoryClientStore::new(initial_clients)),
        Arc::new(CachingJwksFetcher::new(Duration::from_secs(300))),
        replay.clone(),
        Arc::new(Sha256Hasher),
        TOKEN_ENDPOINT,
    );

    TestSetup {
        authenticator,
        replay,
    }
}

pub fn rsa_key(kid: &str) -> Jwk {
    let mut jwk = Jwk::generate_rsa_key(2048).unwrap();
    jwk.set_key_id(kid);
    jwk
}

pub fn oct_key() -> Jwk {
    let mut jwk = Jwk::new("oct");
    jwk.set_key_value(b"a-very-secret-shared-value-that-is-long-enough");
    jwk
}

/// The public half of `key`, marked as a signature key
pub fn public_signing_jwk(key: &Jwk) -> Jwk {
    let mut public = key.to_public_key().unwrap();
    if let Some(kid) = key.key_id() {
        public.set_key_id(kid);
    }
    public.set_key_use("sig");
    public
}

pub fn private_key_jwt_client(client_id: &str, alg: &str, jwks: Option<Jwks>) -> RegisteredClient {
    RegisteredClient {
        client_id: client_id.to_string(),
        oidc: Some(OidcAuthConfig {
            token_endpoint_auth_method: "private_key_jwt".to_string(),
            token_endpoint_auth_signing_alg: alg.to_string(),
            jwks,
            jwks_uri: None,
        }),
        ..Default::default()
    }
}

pub fn shared_secret_client(client_id: &str, secret: &str, method: &str) -> RegisteredClient {
    RegisteredClient {
        client_id: client_id.to_string(),
        hashed_secret: Sha256Hasher::hash(secret.as_bytes()),
        oidc: Some(OidcAuthConfig {
            token_endpoint_auth_method: method.to_string(),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn assertion_claims(client_id: &str, jti: &str, expires_at: i64) -> Value {
    json!({
        "iss": client_id,
        "sub": client_id,
        "aud": [TOKEN_ENDPOINT],
        "jti": jti,
        "exp": expires_at,
    })
}

/// Signs `claims` into a compact JWS the way a client library would,
/// carrying the signing key's kid in the protected header
pub fn sign_assertion(key: &Jwk, alg: &str, claims: &Value) -> String {
    let mut header = JwsHeader::new();
    header.set_token_type("JWT");
    if let Some(kid) = key.key_id() {
        header.set_key_id(kid);
    }

    let signer: Box<dyn JwsSigner> = match alg {
        "RS256" => Box::new(RsassaJwsAlgorithm::Rs256.signer_from_jwk(key).unwrap()),
        "ES256" => Box::new(EcdsaJwsAlgorithm::Es256.signer_from_jwk(key).unwrap()),
        "HS256" => Box::new(HmacJwsAlgorithm::Hs256.signer_from_jwk(key).unwrap()),
        _ => panic!("no test signer for alg {}", alg),
    };

    jws::serialize_compact(claims.to_string().as_bytes(), &header, &*signer).unwrap()
}

pub fn assertion_request(assertion: &str) -> TokenRequest {
    TokenRequest::new()
        .form_param(
            "client_assertion_type",
            crate::CLIENT_ASSERTION_JWT_BEARER_TYPE,
        )
        .form_param("client_assertion", assertion)
}

pub fn basic_header(client_id: &str, client_secret: &str) -> String {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;

    let credentials = format!(
        "{}:{}",
        urlencoding::encode(client_id),
        urlencoding::encode(client_secret)
    );
    format!("Basic {}", STANDARD.encode(credentials.as_bytes()))
}
