//! In-process cache backed by DashMap for lock-free concurrent access.
//! Serves as L1 cache in front of Redis to reduce network round trips.

use dashmap::DashMap;
use fantasy_core::types::PlayerProfile;
use std::sync::Arc;
use std::time::{Duration, Instant};

struct CacheEntry {
    profile: PlayerProfile,
    inserted_at: Instant,
}

/// Lock-free local cache for frequently accessed player profiles.
pub struct LocalCache {
    store: Arc<DashMap<u32, CacheEntry>>,
    ttl: Duration,
    max_entries: usize,
}

impl LocalCache {
    pub fn new(ttl_secs: u64, max_entries: usize) -> Self {
        Self {
            store: Arc::new(DashMap::with_capacity(max_entries)),
            ttl: Duration::from_secs(ttl_secs),
            max_entries,
        }
    }

    /// Get a profile from the local cache, returns None if expired or missing.
    pub fn get(&self, player_id: u32) -> Option<PlayerProfile> {
        let entry = self.store.get(&player_id)?;
        if entry.inserted_at.elapsed() > self.ttl {
            drop(entry);
            self.store.remove(&player_id);
            return None;
        }
        Some(entry.profile.clone())
    }

    /// Insert or update a profile in the local cache.
    pub fn put(&self, profile: PlayerProfile) {
        // Simple eviction: if over capacity, skip insert (background cleanup handles this)
        if self.store.len() >= self.max_entries && !self.store.contains_key(&profile.player_id) {
            return;
        }
        self.store.insert(
            profile.player_id,
            CacheEntry {
                profile,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Remove expired entries. Call this periodically from a background task.
    pub fn evict_expired(&self) -> usize {
        let before = self.store.len();
        self.store
            .retain(|_, entry| entry.inserted_at.elapsed() <= self.ttl);
        before - self.store.len()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use fantasy_core::types::{PlayerStatus, Position};

    fn profile(id: u32) -> PlayerProfile {
        PlayerProfile {
            player_id: id,
            name: format!("Player {id}"),
            club: "RICH".to_string(),
            position: Position::Forward,
            secondary_position: None,
            status: PlayerStatus::Fit,
            price: 400_000,
            breakeven: 50,
            ownership_pct: 5.0,
            scores: Vec::new(),
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn test_put_get() {
        let cache = LocalCache::new(60, 100);
        cache.put(profile(1));
        assert!(cache.get(1).is_some());
        assert!(cache.get(2).is_none());
    }

    #[test]
    fn test_expiry() {
        let cache = LocalCache::new(0, 100);
        cache.put(profile(1));
        std::thread::sleep(Duration::from_millis(10));
        assert!(cache.get(1).is_none());
    }

    #[test]
    fn test_capacity_skips_insert() {
        let cache = LocalCache::new(60, 1);
        cache.put(profile(1));
        cache.put(profile(2));
        assert_eq!(cache.len(), 1);
        assert!(cache.get(2).is_none());
        // Existing keys still update
        cache.put(profile(1));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_evict_expired() {
        let cache = LocalCache::new(0, 100);
        cache.put(profile(1));
        cache.put(profile(2));
        std::thread::sleep(Duration::from_millis(10));
        assert_eq!(cache.evict_expired(), 2);
        assert!(cache.is_empty());
    }
}
