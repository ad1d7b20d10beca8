//! Signing-key set used to check ID token signatures.
//!
//! Remote key sets are fetched over HTTPS and cached for the `max-age` the
//! provider advertises. A stale cache, or a `kid` the cache does not know,
//! triggers a refetch. Concurrent misses share a single fetch. Fetch failures
//! are returned to the caller (fail closed).

use std::time::{Duration, Instant};

use jsonwebtoken::jwk::{Jwk, JwkSet};
use reqwest::header::CACHE_CONTROL;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use url::Url;

/// Used when the provider sends no usable `Cache-Control`.
pub const DEFAULT_KEYS_TTL: Duration = Duration::from_secs(60 * 60);

/// An unknown `kid` never causes more than one refetch within this window.
pub const MIN_REFETCH_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum KeyFetchError {
    #[error("key endpoint request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("key endpoint answered {0}")]
    Status(reqwest::StatusCode),
}

enum Source {
    Remote { http: reqwest::Client, url: Url },
    Fixed,
}

struct CachedKeys {
    set: JwkSet,
    fetched_at: Instant,
    // None: never expires (fixed key sets)
    expires_at: Option<Instant>,
}

impl CachedKeys {
    fn is_fresh(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| now < at)
    }
}

pub struct SigningKeys {
    source: Source,
    cached: RwLock<Option<CachedKeys>>,
    // held while a fetch is in flight
    refresh: Mutex<()>,
}

impl std::fmt::Debug for SigningKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let source = match &self.source {
            Source::Remote { url, .. } => url.as_str(),
            Source::Fixed => "fixed",
        };
        f.debug_struct("SigningKeys").field("source", &source).finish()
    }
}

impl SigningKeys {
    pub fn remote(http: reqwest::Client, url: Url) -> Self {
        Self {
            source: Source::Remote { http, url },
            cached: RwLock::new(None),
            refresh: Mutex::new(()),
        }
    }

    /// A key set that is never refreshed.
    pub fn fixed(set: JwkSet) -> Self {
        let now = Instant::now();
        Self {
            source: Source::Fixed,
            cached: RwLock::new(Some(CachedKeys {
                set,
                fetched_at: now,
                expires_at: None,
            })),
            refresh: Mutex::new(()),
        }
    }

    /// Find the key for `kid`, refetching the set at most once.
    pub async fn find(&self, kid: &str) -> Result<Option<Jwk>, KeyFetchError> {
        if let Some(hit) = self.lookup_cached(kid).await {
            return Ok(hit);
        }

        let Source::Remote { http, url } = &self.source else {
            return Ok(None);
        };

        let _refresh = self.refresh.lock().await;
        // another caller may have refreshed while we waited
        if let Some(hit) = self.lookup_cached(kid).await {
            return Ok(hit);
        }

        let fetched = fetch(http, url).await?;
        let found = fetched.set.find(kid).cloned();
        tracing::debug!(keys = fetched.set.keys.len(), "refreshed signing keys");
        *self.cached.write().await = Some(fetched);

        Ok(found)
    }

    // Some(Some(key)): cache hit
    // Some(None): the cache is authoritative and has no such key
    // None: the cache must be refreshed first
    async fn lookup_cached(&self, kid: &str) -> Option<Option<Jwk>> {
        let guard = self.cached.read().await;
        let cached = guard.as_ref()?;
        let now = Instant::now();

        if !cached.is_fresh(now) {
            return None;
        }

        match cached.set.find(kid) {
            Some(key) => Some(Some(key.clone())),
            None if matches!(self.source, Source::Fixed) => Some(None),
            None if now.duration_since(cached.fetched_at) < MIN_REFETCH_INTERVAL => Some(None),
            None => None,
        }
    }
}

async fn fetch(http: &reqwest::Client, url: &Url) -> Result<CachedKeys, KeyFetchError> {
    let res = http.get(url.clone()).send().await?;

    let status = res.status();
    if !status.is_success() {
        return Err(KeyFetchError::Status(status));
    }

    let ttl = res
        .headers()
        .get(CACHE_CONTROL)
        .and_then(|v| v.to_str().ok())
        .and_then(max_age)
        .unwrap_or(DEFAULT_KEYS_TTL);

    let set: JwkSet = res.json().await?;
    let now = Instant::now();

    Ok(CachedKeys {
        set,
        fetched_at: now,
        expires_at: Some(now + ttl),
    })
}

/// `max-age` directive of a `Cache-Control` value.
pub fn max_age(cache_control: &str) -> Option<Duration> {
    cache_control
        .split(',')
        .filter_map(|directive| {
            let (name, value) = directive.trim().split_once('=')?;
            name.trim()
                .eq_ignore_ascii_case("max-age")
                .then(|| value.trim().trim_matches('"').parse::<u64>().ok())
                .flatten()
        })
        .next()
        .map(Duration::from_secs)
}
