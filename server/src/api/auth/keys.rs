//! Provider signing key cache
//!
//! Fetches the JWKS document from the identity provider and caches it
//! for an hour. A token with an unknown key id forces one refresh, so
//! key rollover is picked up without waiting for expiry.

use std::time::{Duration, Instant};

use jsonwebtoken::DecodingKey;
use jsonwebtoken::jwk::JwkSet;
use parking_lot::RwLock;

use super::jwt::JwtError;

const KEY_CACHE_TTL: Duration = Duration::from_secs(3600);

struct CachedJwks {
    keys: JwkSet,
    fetched_at: Instant,
}

pub struct KeyStore {
    jwks_url: String,
    http: reqwest::Client,
    cache: RwLock<Option<CachedJwks>>,
}

impl KeyStore {
    pub fn new(jwks_url: String) -> Self {
        Self {
            jwks_url,
            http: reqwest::Client::new(),
            cache: RwLock::new(None),
        }
    }

    /// Resolve the decoding key for a token's `kid`
    pub async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, JwtError> {
        if let Some(key) = self.cached_key(kid, false) {
            return Ok(key);
        }

        // Cache miss or stale: refetch once, then the kid either exists
        // or the token is signed by a key the provider never published.
        self.refresh().await?;
        self.cached_key(kid, true)
            .ok_or_else(|| JwtError::UnknownKey(kid.to_string()))
    }

    fn cached_key(&self, kid: &str, allow_stale: bool) -> Option<DecodingKey> {
        let cache = self.cache.read();
        let cached = cache.as_ref()?;
        if !allow_stale && cached.fetched_at.elapsed() >= KEY_CACHE_TTL {
            return None;
        }
        let jwk = cached
            .keys
            .keys
            .iter()
            .find(|k| k.common.key_id.as_deref() == Some(kid))?;
        DecodingKey::from_jwk(jwk).ok()
    }

    async fn refresh(&self) -> Result<(), JwtError> {
        let response = self
            .http
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| JwtError::KeyFetch(e.to_string()))?
            .error_for_status()
            .map_err(|e| JwtError::KeyFetch(e.to_string()))?;
        let keys: JwkSet = response
            .json()
            .await
            .map_err(|e| JwtError::KeyFetch(e.to_string()))?;

        tracing::debug!(url = %self.jwks_url, count = keys.keys.len(), "Signing keys refreshed");
        *self.cache.write() = Some(CachedJwks {
            keys,
            fetched_at: Instant::now(),
        });
        Ok(())
    }
}
