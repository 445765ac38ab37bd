//! Redis cache client for player profiles.
//! Two-tier caching: LocalCache (L1) -> Redis (L2).

use crate::local::LocalCache;
use fantasy_core::config::RedisConfig;
use fantasy_core::types::PlayerProfile;
use redis::AsyncCommands;
use std::sync::Arc;
use tracing::{debug, info};

/// Redis-backed distributed cache with local L1 layer.
pub struct RedisCache {
    client: redis::Client,
    local: Arc<LocalCache>,
    ttl_secs: u64,
}

impl RedisCache {
    /// Connect to Redis (single node or cluster).
    pub async fn new(config: &RedisConfig) -> anyhow::Result<Self> {
        let url = config
            .urls
            .first()
            .cloned()
            .unwrap_or_else(|| "redis://localhost:6379".to_string());

        info!(url = %url, "Connecting to Redis");

        let client = redis::Client::open(url.as_str())?;

        // Verify connectivity
        let mut conn = client.get_multiplexed_async_connection().await?;
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        info!(response = %pong, "Redis connection established");

        let local = Arc::new(LocalCache::new(
            config.ttl_secs / 2, // L1 TTL is half of L2
            2_000,               // comfortably above a full league list
        ));

        Ok(Self {
            client,
            local,
            ttl_secs: config.ttl_secs,
        })
    }

    /// Get a player profile. Checks L1 local cache first, then Redis.
    pub async fn get_player(&self, player_id: u32) -> anyhow::Result<Option<PlayerProfile>> {
        // L1 check
        if let Some(profile) = self.local.get(player_id) {
            metrics::counter!("cache.l1.hit").increment(1);
            return Ok(Some(profile));
        }
        metrics::counter!("cache.l1.miss").increment(1);

        // L2 Redis check
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = format!("player:{player_id}");
        let data: Option<String> = conn.get(&key).await?;

        match data {
            Some(json) => {
                let profile: PlayerProfile = serde_json::from_str(&json)?;
                // Populate L1
                self.local.put(profile.clone());
                metrics::counter!("cache.l2.hit").increment(1);
                Ok(Some(profile))
            }
            None => {
                metrics::counter!("cache.l2.miss").increment(1);
                debug!(player_id = player_id, "Cache miss for player profile");
                Ok(None)
            }
        }
    }

    /// Store a player profile in both L1 and L2 caches.
    pub async fn put_player(&self, profile: &PlayerProfile) -> anyhow::Result<()> {
        let json = serde_json::to_string(profile)?;
        let key = format!("player:{}", profile.player_id);

        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set_ex::<_, _, ()>(&key, &json, self.ttl_secs).await?;

        // Update L1
        self.local.put(profile.clone());

        Ok(())
    }

    /// Run periodic maintenance (L1 eviction).
    pub async fn maintenance(&self) {
        let evicted = self.local.evict_expired();
        if evicted > 0 {
            debug!(evicted = evicted, "Local cache eviction complete");
        }
    }

    pub fn local_cache_size(&self) -> usize {
        self.local.len()
    }
}
