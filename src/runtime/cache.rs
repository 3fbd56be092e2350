//! Short-lived suppression flags.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::debug;

/// Cache key of the process-wide circuit breaker.
pub const SERVER_ERROR_KEY: &str = "gst_server_error";

/// How long all GSTIN lookups pause after an upstream server error.
pub const SERVER_ERROR_TTL: Duration = Duration::from_secs(60);

/// How long a GSTIN is not looked up again after a lookup attempt.
pub const RECENTLY_CHECKED_TTL: Duration = Duration::from_secs(180);

/// Key-value cache of boolean flags with an expiry.
pub trait FlagCache: Send + Sync {
    /// Whether the flag is set and not yet expired.
    fn is_set(&self, key: &str) -> bool;

    /// Set the flag for `ttl`.
    fn set(&self, key: &str, ttl: Duration);

    fn clear(&self, key: &str);
}

/// Entry count above which [`MemoryCache::set`] drops expired flags first.
const PURGE_THRESHOLD: usize = 1024;

/// In-process [`FlagCache`] storing expiry instants.
#[derive(Debug, Default)]
pub struct MemoryCache {
    expires_at: DashMap<String, Instant>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop expired flags.
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.expires_at.retain(|_, expiry| *expiry > now);
    }
}

impl FlagCache for MemoryCache {
    fn is_set(&self, key: &str) -> bool {
        let expired = match self.expires_at.get(key) {
            Some(expiry) if Instant::now() < *expiry => return true,
            Some(_) => true,
            None => false,
        };
        if expired {
            self.expires_at.remove(key);
        }
        false
    }

    fn set(&self, key: &str, ttl: Duration) {
        if self.expires_at.len() >= PURGE_THRESHOLD {
            self.purge_expired();
        }
        self.expires_at.insert(key.to_string(), Instant::now() + ttl);
    }

    fn clear(&self, key: &str) {
        self.expires_at.remove(key);
    }
}

/// Lookup suppression built on a [`FlagCache`]: a per-GSTIN
/// "recently checked" flag and a global circuit breaker.
#[derive(Clone)]
pub struct Suppressions {
    cache: Arc<dyn FlagCache>,
}

impl fmt::Debug for Suppressions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Suppressions").finish_non_exhaustive()
    }
}

impl Suppressions {
    pub fn new(cache: Arc<dyn FlagCache>) -> Self {
        Self { cache }
    }

    pub fn is_recently_checked(&self, gstin: &str) -> bool {
        self.cache.is_set(gstin)
    }

    pub fn mark_checked(&self, gstin: &str) {
        self.cache.set(gstin, RECENTLY_CHECKED_TTL);
    }

    /// Whether the circuit breaker is open.
    pub fn is_server_down(&self) -> bool {
        self.cache.is_set(SERVER_ERROR_KEY)
    }

    /// Open the circuit breaker after an upstream server error.
    pub fn trip_breaker(&self) {
        debug!(ttl_secs = SERVER_ERROR_TTL.as_secs(), "pausing GST lookups after server error");
        self.cache.set(SERVER_ERROR_KEY, SERVER_ERROR_TTL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_expires() {
        let cache = MemoryCache::new();
        cache.set("a", Duration::from_secs(600));
        cache.set("b", Duration::ZERO);
        assert!(cache.is_set("a"));
        assert!(!cache.is_set("b"));
        assert!(!cache.is_set("missing"));
    }

    #[test]
    fn purge_drops_expired_only() {
        let cache = MemoryCache::new();
        cache.set("a", Duration::from_secs(600));
        cache.set("b", Duration::ZERO);
        cache.purge_expired();
        assert_eq!(cache.expires_at.len(), 1);
    }

    #[test]
    fn set_purges_once_full() {
        let cache = MemoryCache::new();
        for i in 0..PURGE_THRESHOLD {
            cache.set(&format!("stale-{i}"), Duration::ZERO);
        }
        cache.set("fresh", Duration::from_secs(600));
        assert_eq!(cache.expires_at.len(), 1);
        assert!(cache.is_set("fresh"));
    }

    #[test]
    fn breaker_is_separate_from_gstin_flags() {
        let suppressions = Suppressions::new(Arc::new(MemoryCache::new()));
        suppressions.mark_checked("27AAPFU0939F1ZV");
        assert!(suppressions.is_recently_checked("27AAPFU0939F1ZV"));
        assert!(!suppressions.is_server_down());

        suppressions.trip_breaker();
        assert!(suppressions.is_server_down());
        assert!(!suppressions.is_recently_checked("24AAACC1206D1ZM"));
    }
}
