//! Token endpoint client authentication for OAuth 2.0 / OpenID Connect
//! authorization servers: method negotiation, RFC 7523 client assertion
//! verification and ID Token claim shaping.

mod authenticator;
mod claims;
mod helpers;
mod jwks;
mod store;
#[cfg(test)]
mod tests;
mod types;

pub use authenticator::{Authenticator, CLIENT_ASSERTION_JWT_BEARER_TYPE};
pub use claims::IdTokenClaims;
pub use helpers::now;
pub use jwks::{CachingJwksFetcher, Jwks, JwksFetcher, SigningKeyFamily};
pub use store::{
    AssertionReplayStore, ClientStore, Hasher, InMemoryClientStore, InMemoryReplayStore,
    Sha256Hasher,
};
pub use types::{ErrorKind, OAuthError, OidcAuthConfig, RegisteredClient, TokenRequest};
