//! Signing-key resolution: `kid` → public `DecodingKey`.
//!
//! - `StaticKeyResolver` holds a fixed JWKS (tests, pinned keys).
//! - `JwksKeyResolver` fetches the provider's published JWKS over HTTPS and
//!   keeps it in a read-through cache with a TTL.
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::jwk::JwkSet;
use tokio::sync::{Mutex, RwLock};
use url::Url;

use crate::services::auth::error::{AuthError, AuthErrorKind};

#[async_trait]
pub trait KeyResolver: Send + Sync {
    /// Returns the verification key for `kid`.
    ///
    /// Errors:
    /// - `KeyNotFound` when the current key set has no such key
    /// - `KeyResolutionFailed` when the key set could not be obtained
    async fn resolve(&self, kid: &str) -> Result<DecodingKey, AuthError>;
}

fn decoding_key(jwks: &JwkSet, kid: &str) -> Result<Option<DecodingKey>, AuthError> {
    let Some(jwk) = jwks.find(kid) else {
        return Ok(None);
    };

    DecodingKey::from_jwk(jwk).map(Some).map_err(|err| {
        tracing::warn!(kid, error = %err, "jwk cannot be used as a verification key");
        AuthError::new(
            AuthErrorKind::KeyResolutionFailed,
            "Signing key has unsupported parameters.",
        )
    })
}

/// A fixed, in-memory key set.
#[derive(Debug, Clone)]
pub struct StaticKeyResolver {
    jwks: JwkSet,
}

impl StaticKeyResolver {
    pub fn new(jwks: JwkSet) -> Self {
        Self { jwks }
    }
}

#[async_trait]
impl KeyResolver for StaticKeyResolver {
    async fn resolve(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        decoding_key(&self.jwks, kid)?.ok_or_else(|| AuthErrorKind::KeyNotFound.into())
    }
}

#[derive(Debug)]
struct CachedJwks {
    jwks: JwkSet,
    fetched_at: Instant,
}

/// Upper bound on how often an unknown `kid` may trigger a refetch.
pub const MISS_REFETCH_INTERVAL: Duration = Duration::from_secs(30);

/// Remote JWKS with a TTL cache.
///
/// - TTL zero disables caching: every resolution fetches.
/// - A kid missing from the cached set triggers a refetch (the provider may
///   have rotated keys), at most once per `min(ttl, MISS_REFETCH_INTERVAL)`.
///   Other misses inside that window are answered from the cache.
/// - Concurrent refreshes may race; each stores an equivalent set, last writer wins.
#[derive(Debug)]
pub struct JwksKeyResolver {
    url: Url,
    http: reqwest::Client,
    ttl: Duration,
    cache: RwLock<Option<CachedJwks>>,
    miss_refetch_interval: Duration,
    // held across a miss-driven refetch so concurrent misses share one fetch
    last_miss_refetch: Mutex<Option<Instant>>,
}

impl JwksKeyResolver {
    pub fn new(url: Url, fetch_timeout: Duration, ttl: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(fetch_timeout).build()?;

        Ok(Self {
            url,
            http,
            ttl,
            cache: RwLock::new(None),
            miss_refetch_interval: ttl.min(MISS_REFETCH_INTERVAL),
            last_miss_refetch: Mutex::new(None),
        })
    }

    async fn fetch(&self) -> Result<JwkSet, AuthError> {
        let failed = |err: reqwest::Error| {
            tracing::warn!(url = %self.url, error = %err, "jwks fetch failed");
            AuthError::from(AuthErrorKind::KeyResolutionFailed)
        };

        let jwks = self
            .http
            .get(self.url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(failed)?
            .json::<JwkSet>()
            .await
            .map_err(failed)?;

        tracing::info!(url = %self.url, keys = jwks.keys.len(), "jwks refreshed");
        Ok(jwks)
    }

    async fn refresh(&self) -> Result<JwkSet, AuthError> {
        let jwks = self.fetch().await?;

        if !self.ttl.is_zero() {
            *self.cache.write().await = Some(CachedJwks {
                jwks: jwks.clone(),
                fetched_at: Instant::now(),
            });
        }

        Ok(jwks)
    }

    async fn cached(&self) -> Option<JwkSet> {
        let guard = self.cache.read().await;
        guard
            .as_ref()
            .filter(|c| c.fetched_at.elapsed() < self.ttl)
            .map(|c| c.jwks.clone())
    }

    async fn refetch_on_miss(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        let mut last = self.last_miss_refetch.lock().await;

        if let Some(at) = *last
            && at.elapsed() < self.miss_refetch_interval
        {
            tracing::debug!(kid, "unknown kid inside refetch window, answering from cache");
            let key = match self.cached().await {
                Some(jwks) => decoding_key(&jwks, kid)?,
                None => None,
            };
            return key.ok_or_else(|| AuthErrorKind::KeyNotFound.into());
        }

        *last = Some(Instant::now());
        let jwks = self.refresh().await?;
        decoding_key(&jwks, kid)?.ok_or_else(|| AuthErrorKind::KeyNotFound.into())
    }
}

#[async_trait]
impl KeyResolver for JwksKeyResolver {
    async fn resolve(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        let Some(jwks) = self.cached().await else {
            let jwks = self.refresh().await?;
            return decoding_key(&jwks, kid)?.ok_or_else(|| AuthErrorKind::KeyNotFound.into());
        };

        if let Some(key) = decoding_key(&jwks, kid)? {
            return Ok(key);
        }

        self.refetch_on_miss(kid).await
    }
}
