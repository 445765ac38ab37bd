//! Projection pipeline: resolves players through the two-tier cache, runs
//! the projection engine, and records analytics and latency metrics.

use crate::engine::ProjectionEngine;
use fantasy_analytics::logger::EventFields;
use fantasy_analytics::AnalyticsLogger;
use fantasy_cache::RedisCache;
use fantasy_core::error::{FantasyError, FantasyResult};
use fantasy_core::types::{EventType, Projection, RoundContext};
use std::sync::Arc;
use tracing::debug;

/// Processes projection requests through the full pipeline.
pub struct ProjectionService {
    engine: Arc<ProjectionEngine>,
    cache: Arc<RedisCache>,
    analytics: Arc<AnalyticsLogger>,
}

impl ProjectionService {
    pub fn new(
        engine: Arc<ProjectionEngine>,
        cache: Arc<RedisCache>,
        analytics: Arc<AnalyticsLogger>,
    ) -> Self {
        Self {
            engine,
            cache,
            analytics,
        }
    }

    /// Project a single player for the given round context.
    pub async fn project_player(
        &self,
        player_id: u32,
        ctx: &RoundContext,
    ) -> FantasyResult<Projection> {
        let start = std::time::Instant::now();

        metrics::counter!("projections.requests").increment(1);

        let profile = self
            .cache
            .get_player(player_id)
            .await
            .map_err(|e| FantasyError::Cache(e.to_string()))?
            .ok_or(FantasyError::UnknownPlayer(player_id))?;

        let projection = self.engine.project(&profile, ctx);
        let latency_us = start.elapsed().as_micros() as u64;

        metrics::histogram!("projections.latency_us").record(latency_us as f64);

        self.analytics.log_event(
            EventType::ProjectionServed,
            ctx.round,
            EventFields {
                player_id: Some(player_id),
                points: Some(projection.projected_points.round() as i32),
                latency_us: Some(latency_us),
                ..Default::default()
            },
        );

        Ok(projection)
    }

    /// Project a batch of players. Unknown ids are skipped rather than
    /// failing the whole batch; callers cap the batch size at the boundary.
    pub async fn project_batch(
        &self,
        player_ids: &[u32],
        ctx: &RoundContext,
    ) -> FantasyResult<Vec<Projection>> {
        let mut projections = Vec::with_capacity(player_ids.len());
        for &player_id in player_ids {
            match self.project_player(player_id, ctx).await {
                Ok(p) => projections.push(p),
                Err(FantasyError::UnknownPlayer(id)) => {
                    debug!(player_id = id, "Skipping unknown player in batch");
                    metrics::counter!("projections.unknown_player").increment(1);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(projections)
    }

    pub fn model_version(&self) -> String {
        self.engine.model_version()
    }
}
