//! Contracts for the storage collaborators of the authentication core, and
//! in-memory defaults for tests and small deployments

mod memory;

use std::future::Future;
use std::sync::Arc;

use crate::types::{OAuthError, RegisteredClient};

pub use memory::{InMemoryClientStore, InMemoryReplayStore, Sha256Hasher};

/// Storage backend resolving client registrations
pub trait ClientStore: Send + Sync {
    /// Retrieves the registration for `client_id`
    fn get_client(
        &self,
        client_id: &str,
    ) -> impl Future<Output = Result<RegisteredClient, OAuthError>> + Send;
}

/// Tracks which client assertion `jti` values have been accepted, so that
/// each assertion is used at most once
pub trait AssertionReplayStore: Send + Sync {
    /// Ok iff `jti` is unknown, or known but past its recorded expiry
    fn client_assertion_jwt_valid(
        &self,
        jti: &str,
    ) -> impl Future<Output = Result<(), OAuthError>> + Send;

    /// Records `jti` as used until `expires_at` (Unix seconds). The entry
    /// may be evicted any time after that instant.
    fn set_client_assertion_jwt(
        &self,
        jti: &str,
        expires_at: i64,
    ) -> impl Future<Output = Result<(), OAuthError>> + Send;
}

/// Compares a stored secret hash against a presented plaintext secret
pub trait Hasher: Send + Sync {
    /// Ok iff `presented` hashes to `hashed`
    fn compare(
        &self,
        hashed: &[u8],
        presented: &[u8],
    ) -> impl Future<Output = Result<(), OAuthError>> + Send;
}

impl<T: ClientStore> ClientStore for Arc<T> {
    fn get_client(
        &self,
        client_id: &str,
    ) -> impl Future<Output = Result<RegisteredClient, OAuthError>> + Send {
        self.as_ref().get_client(client_id)
    }
}

impl<T: AssertionReplayStore> AssertionReplayStore for Arc<T> {
    fn client_assertion_jwt_valid(
        &self,
        jti: &str,
    ) -> impl Future<Output = Result<(), OAuthError>> + Send {
        self.as_ref().client_assertion_jwt_valid(jti)
    }

    fn set_client_assertion_jwt(
        &self,
        jti: &str,
        expires_at: i64,
    ) -> impl Future<Output = Result<(), OAuthError>> + Send {
        self.as_ref().set_client_assertion_jwt(jti, expires_at)
    }
}

impl<T: Hasher> Hasher for Arc<T> {
    fn compare(
        &self,
        hashed: &[u8],
        presented: &[u8],
    ) -> impl Future<Output = Result<(), OAuthError>> + Send {
        self.as_ref().compare(hashed, presented)
    }
}
