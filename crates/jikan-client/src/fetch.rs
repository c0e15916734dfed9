//! Cache-aware fetching.
//!
//! Order is cache check, then network, then cache write. The cache is a
//! best-effort accelerator: storage failures are logged and the request
//! proceeds as if uncached. Concurrent callers with the same key may each hit
//! the network.

use crate::api::{decode, Endpoint, JikanClient};
use crate::cache::TtlCache;
use crate::error::FetchError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

/// Client paired with a response cache
#[derive(Clone)]
pub struct CachedFetcher {
    client: JikanClient,
    cache: TtlCache,
}

impl CachedFetcher {
    pub fn new(client: JikanClient, cache: TtlCache) -> Self {
        Self { client, cache }
    }

    pub fn client(&self) -> &JikanClient {
        &self.client
    }

    pub fn cache(&self) -> &TtlCache {
        &self.cache
    }

    /// Return the cached payload for `cache_key`, or fetch `url` once and cache it
    pub async fn fetch_with_cache(&self, url: &Url, cache_key: &str) -> Result<Value, FetchError> {
        match self.cache.get_value(cache_key) {
            Ok(Some(cached)) => {
                debug!(key = cache_key, "Using cached response");
                return Ok(cached);
            }
            Ok(None) => {}
            Err(e) => warn!(key = cache_key, error = %e, "Cache read failed"),
        }

        let value = self.client.get_value(url).await?;

        if let Err(e) = self.cache.set(cache_key, &value) {
            warn!(key = cache_key, error = %e, "Cache write failed");
        }

        Ok(value)
    }

    /// Typed cache-aware request for an endpoint
    pub async fn fetch<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<T, FetchError> {
        let url = self.client.url_for(endpoint);
        let value = self.fetch_with_cache(&url, &endpoint.cache_key()).await?;
        decode(&url, value)
    }
}
