use std::collections::HashMap;
use std::sync::Mutex;

use sha2::{Digest, Sha256};

use super::{AssertionReplayStore, ClientStore, Hasher};
use crate::helpers::now;
use crate::types::{OAuthError, RegisteredClient};

/// A [ClientStore] backed by a map of client registrations
pub struct InMemoryClientStore {
    clients: Mutex<HashMap<String, RegisteredClient>>,
}

impl InMemoryClientStore {
    /// Creates a store seeded with `initial_clients`
    pub fn new(initial_clients: Vec<RegisteredClient>) -> Self {
        let clients = initial_clients
            .into_iter()
            .map(|client| (client.client_id.clone(), client))
            .collect();
        Self {
            clients: Mutex::new(clients),
        }
    }

    /// Adds or replaces a registration
    pub fn insert(&self, client: RegisteredClient) {
        self.clients
            .lock()
            .unwrap()
            .insert(client.client_id.clone(), client);
    }
}

impl ClientStore for InMemoryClientStore {
    async fn get_client(&self, client_id: &str) -> Result<RegisteredClient, OAuthError> {
        self.clients
            .lock()
            .unwrap()
            .get(client_id)
            .cloned()
            .ok_or_else(|| OAuthError::store_error("The client does not exist."))
    }
}

/// An [AssertionReplayStore] backed by a `jti` to expiry map. The insert is
/// conditional (insert-if-absent), so concurrent submissions of the same
/// assertion resolve at the store layer rather than in the caller's
/// probe-then-insert sequence.
#[derive(Default)]
pub struct InMemoryReplayStore {
    seen: Mutex<HashMap<String, i64>>,
}

impl InMemoryReplayStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded expiry for `jti`, if it is still marked as used
    pub fn expiry(&self, jti: &str) -> Option<i64> {
        self.seen.lock().unwrap().get(jti).copied()
    }
}

impl AssertionReplayStore for InMemoryReplayStore {
    async fn client_assertion_jwt_valid(&self, jti: &str) -> Result<(), OAuthError> {
        let mut seen = self.seen.lock().unwrap();
        match seen.get(jti) {
            Some(&expires_at) if expires_at > now() => Err(OAuthError::jti_known(
                "Claim 'jti' from 'client_assertion' MUST only be used once.",
            )),
            Some(_) => {
                seen.remove(jti);
                Ok(())
            }
            None => Ok(()),
        }
    }

    async fn set_client_assertion_jwt(&self, jti: &str, expires_at: i64) -> Result<(), OAuthError> {
        let mut seen = self.seen.lock().unwrap();
        match seen.get(jti) {
            Some(&existing) if existing > now() => Err(OAuthError::jti_known(
                "Claim 'jti' from 'client_assertion' MUST only be used once.",
            )),
            _ => {
                seen.insert(jti.to_string(), expires_at);
                Ok(())
            }
        }
    }
}

/// A [Hasher] comparing SHA-256 digests. Deployments guarding long-lived
/// secrets should supply a hasher backed by a password KDF such as bcrypt
/// or argon2 instead.
#[derive(Default)]
pub struct Sha256Hasher;

impl Sha256Hasher {
    /// Digests a plaintext secret into the form [RegisteredClient]
    /// stores
    pub fn hash(secret: &[u8]) -> Vec<u8> {
        Sha256::digest(secret).to_vec()
    }
}

impl Hasher for Sha256Hasher {
    async fn compare(&self, hashed: &[u8], presented: &[u8]) -> Result<(), OAuthError> {
        if Sha256::digest(presented).as_slice() == hashed {
            Ok(())
        } else {
            Err(OAuthError::store_error("The secret digests do not match."))
        }
    }
}
