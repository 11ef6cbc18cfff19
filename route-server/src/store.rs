//! Cache store for resolved routes.
//!
//! Entries are keyed by the exact `QueryKey` (both endpoints, date,
//! and time) so a 14:00 query never reuses a 14:01 result. Expiry is
//! logical: entries past `valid_until` are skipped by the primary
//! lookup but stay queryable by the fallback path, which is why this
//! store keeps everything instead of evicting.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use crate::domain::{QueryKey, RouteRecord};

/// Error from a cache store operation.
///
/// The resolver swallows and logs insert failures; a failed cache
/// write never fails the route search.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// Backing storage could not be reached
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// One cached answer for one query key.
///
/// Never mutated after creation; superseded entries are shadowed by
/// newer `created_at` values rather than overwritten.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The exact key this entry answers
    pub key: QueryKey,
    /// The routes returned by the upstream at insert time
    pub routes: Vec<RouteRecord>,
    /// When the entry was inserted
    pub created_at: DateTime<Utc>,
    /// created_at plus the freshness window
    pub valid_until: DateTime<Utc>,
}

impl CacheEntry {
    /// Whether the entry is still within its freshness window.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now < self.valid_until
    }
}

/// Configuration for the cache store.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Freshness window applied at insert time.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::hours(1),
        }
    }
}

impl CacheConfig {
    /// Set a custom freshness window.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Exact-match storage of route results with TTL semantics.
#[async_trait]
pub trait RouteStore: Send + Sync {
    /// Return the newest entry matching `key` exactly that is still
    /// fresh at `now`, if any.
    async fn lookup_fresh(&self, key: &QueryKey, now: DateTime<Utc>) -> Option<CacheEntry>;

    /// Return the newest entry matching `key` exactly, ignoring
    /// expiry. Used only by the stale-fallback path.
    async fn lookup_any(&self, key: &QueryKey) -> Option<CacheEntry>;

    /// Persist `routes` under `key` with `valid_until = now + ttl`.
    async fn insert(
        &self,
        key: &QueryKey,
        routes: Vec<RouteRecord>,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError>;
}

/// In-memory route store.
///
/// Concurrent inserts for the same key append rather than error;
/// lookups pick the newest `created_at`, so last-write-wins. There is
/// no eviction beyond natural staleness.
#[derive(Clone)]
pub struct MemoryRouteStore {
    entries: Arc<RwLock<HashMap<QueryKey, Vec<CacheEntry>>>>,
    ttl: Duration,
}

impl MemoryRouteStore {
    /// Create a new store with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl: config.ttl,
        }
    }

    /// Number of stored entries, expired ones included (for monitoring).
    pub async fn entry_count(&self) -> usize {
        let guard = self.entries.read().await;
        guard.values().map(Vec::len).sum()
    }
}

#[async_trait]
impl RouteStore for MemoryRouteStore {
    async fn lookup_fresh(&self, key: &QueryKey, now: DateTime<Utc>) -> Option<CacheEntry> {
        let guard = self.entries.read().await;
        guard
            .get(key)?
            .iter()
            .filter(|e| e.is_fresh(now))
            .max_by_key(|e| e.created_at)
            .cloned()
    }

    async fn lookup_any(&self, key: &QueryKey) -> Option<CacheEntry> {
        let guard = self.entries.read().await;
        guard.get(key)?.iter().max_by_key(|e| e.created_at).cloned()
    }

    async fn insert(
        &self,
        key: &QueryKey,
        routes: Vec<RouteRecord>,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let entry = CacheEntry {
            key: key.clone(),
            routes,
            created_at: now,
            valid_until: now + self.ttl,
        };

        let mut guard = self.entries.write().await;
        guard.entry(key.clone()).or_default().push(entry);
        Ok(())
    }
}
