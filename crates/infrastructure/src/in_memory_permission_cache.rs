use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use ecoplaza_application::{PermissionCache, PermissionCacheStats};
use ecoplaza_domain::{UserId, UserPermissions};
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug, Clone)]
struct PermissionCacheEntry {
    permissions: UserPermissions,
    cached_at: Instant,
}

impl PermissionCacheEntry {
    fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.cached_at) < ttl
    }
}

/// Process-local permission cache with a fixed ttl and optional capacity.
///
/// Expired entries are dropped lazily on read; when the capacity is reached
/// the oldest entry makes room for a new key.
pub struct InMemoryPermissionCache {
    entries: RwLock<HashMap<UserId, PermissionCacheEntry>>,
    ttl: Duration,
    max_entries: Option<NonZeroUsize>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl InMemoryPermissionCache {
    /// Creates an empty cache. A zero ttl disables caching.
    #[must_use]
    pub fn new(ttl: Duration, max_entries: Option<NonZeroUsize>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            max_entries,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    fn insert_entry(
        &self,
        entries: &mut HashMap<UserId, PermissionCacheEntry>,
        user_id: UserId,
        permissions: UserPermissions,
        now: Instant,
    ) {
        if let Some(max_entries) = self.max_entries
            && !entries.contains_key(&user_id)
            && entries.len() >= max_entries.get()
        {
            entries.retain(|_, entry| entry.is_fresh(now, self.ttl));

            if entries.len() >= max_entries.get()
                && let Some(oldest) = entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.cached_at)
                    .map(|(user_id, _)| *user_id)
            {
                entries.remove(&oldest);
                debug!(user_id = %oldest, "evicted oldest cached permissions");
            }
        }

        entries.insert(
            user_id,
            PermissionCacheEntry {
                permissions,
                cached_at: now,
            },
        );
    }
}

#[async_trait]
impl PermissionCache for InMemoryPermissionCache {
    async fn get(&self, user_id: UserId) -> Option<UserPermissions> {
        {
            let entries = self.entries.read().await;
            match entries.get(&user_id) {
                Some(entry) if entry.is_fresh(Instant::now(), self.ttl) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return Some(entry.permissions.clone());
                }
                Some(_) => {}
                None => {
                    self.misses.fetch_add(1, Ordering::Relaxed);
                    return None;
                }
            }
        }

        let mut entries = self.entries.write().await;
        if entries
            .get(&user_id)
            .is_some_and(|entry| !entry.is_fresh(Instant::now(), self.ttl))
        {
            entries.remove(&user_id);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    async fn put(&self, user_id: UserId, permissions: UserPermissions) {
        if self.ttl.is_zero() {
            return;
        }

        let mut entries = self.entries.write().await;
        self.insert_entry(&mut entries, user_id, permissions, Instant::now());
    }

    async fn invalidate(&self, user_id: UserId) -> bool {
        self.entries.write().await.remove(&user_id).is_some()
    }

    async fn invalidate_all(&self) -> usize {
        let mut entries = self.entries.write().await;
        let removed = entries.len();
        entries.clear();
        removed
    }

    async fn warm(&self, snapshots: Vec<UserPermissions>) -> usize {
        if self.ttl.is_zero() {
            return 0;
        }

        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let mut warmed = 0;
        for permissions in snapshots {
            self.insert_entry(&mut entries, permissions.user_id(), permissions, now);
            warmed += 1;
        }

        warmed
    }

    async fn stats(&self) -> PermissionCacheStats {
        let now = Instant::now();
        let entries = self.entries.read().await;
        let valid_entries = entries
            .values()
            .filter(|entry| entry.is_fresh(now, self.ttl))
            .count();

        PermissionCacheStats {
            total_entries: entries.len(),
            valid_entries,
            expired_entries: entries.len() - valid_entries,
            ttl_seconds: self.ttl.as_secs(),
            max_entries: self.max_entries.map(NonZeroUsize::get),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
