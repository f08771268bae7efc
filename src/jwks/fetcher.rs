use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use lru_time_cache::LruCache;
use tracing::{debug, instrument};

use super::Jwks;
use crate::types::OAuthError;

/// Strategy for resolving a JSON Web Key Set from a `jwks_uri`. Expected to
/// be shared process-wide so that key sets are cached across requests; the
/// core calls `resolve` with `force_refresh = false` first and retries with
/// `force_refresh = true` when a rotated key is not found in the cached set.
pub trait JwksFetcher: Send + Sync {
    fn resolve(
        &self,
        url: &str,
        force_refresh: bool,
    ) -> impl Future<Output = Result<Jwks, OAuthError>> + Send;
}

impl<T: JwksFetcher> JwksFetcher for std::sync::Arc<T> {
    fn resolve(
        &self,
        url: &str,
        force_refresh: bool,
    ) -> impl Future<Output = Result<Jwks, OAuthError>> + Send {
        self.as_ref().resolve(url, force_refresh)
    }
}

/// A [JwksFetcher] that fetches key sets over HTTP and caches them per URL
/// with a time-to-live
pub struct CachingJwksFetcher {
    client: reqwest::Client,
    cache: Mutex<LruCache<String, Jwks>>,
}

impl CachingJwksFetcher {
    /// Creates a fetcher whose cached key sets expire after `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            cache: Mutex::new(LruCache::with_expiry_duration_and_capacity(ttl, 64)),
        }
    }

    async fn fetch(&self, url: &str) -> Result<Jwks, OAuthError> {
        let response = self
            .client
            .get(url)
            .header(
                "accept",
                "application/json, application/jwk-set+json",
            )
            .send()
            .await
            .map_err(|e| {
                OAuthError::store_error("Unable to fetch the JSON Web Key Set.")
                    .with_debug(e.to_string())
            })?;

        if !response.status().is_success() {
            return Err(OAuthError::store_error(&format!(
                "The JWKS endpoint responded with status code {}.",
                response.status().as_u16()
            )));
        }

        let body = response.text().await.map_err(|e| {
            OAuthError::store_error("Unable to read the JSON Web Key Set response.")
                .with_debug(e.to_string())
        })?;

        serde_json::from_str::<Jwks>(&body).map_err(|e| {
            OAuthError::store_error("The JWKS endpoint did not respond with a valid key set.")
                .with_debug(e.to_string())
        })
    }
}

impl JwksFetcher for CachingJwksFetcher {
    #[instrument(skip(self), level = "debug")]
    async fn resolve(&self, url: &str, force_refresh: bool) -> Result<Jwks, OAuthError> {
        if !force_refresh {
            if let Some(jwks) = self.cache.lock().unwrap().get(url) {
                debug!(url, "serving JWKS from cache");
                return Ok(jwks.clone());
            }
        }

        let jwks = self.fetch(url).await?;
        self.cache
            .lock()
            .unwrap()
            .insert(url.to_string(), jwks.clone());
        Ok(jwks)
    }
}
