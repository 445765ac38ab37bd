//! Captain suggestions: ranks a squad's players by projected score.
//! Captain scores count double, so ordering is by raw projection with
//! volatility breaking ties.

use fantasy_analytics::logger::EventFields;
use fantasy_analytics::AnalyticsLogger;
use fantasy_cache::RedisCache;
use fantasy_core::error::{FantasyError, FantasyResult};
use fantasy_core::types::{
    CaptainRequest, CaptainSuggestion, EventType, PlayerProfile, RoundContext,
};
use fantasy_projection::ProjectionService;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::debug;

pub struct CaptainAdvisor {
    service: Arc<ProjectionService>,
    cache: Arc<RedisCache>,
    analytics: Arc<AnalyticsLogger>,
    /// Suggestions returned per request.
    suggestions: usize,
}

impl CaptainAdvisor {
    pub fn new(
        service: Arc<ProjectionService>,
        cache: Arc<RedisCache>,
        analytics: Arc<AnalyticsLogger>,
        suggestions: usize,
    ) -> Self {
        Self {
            service,
            cache,
            analytics,
            suggestions,
        }
    }

    /// Rank the given players for the captaincy. Unknown ids are skipped,
    /// mirroring the projection batch path.
    pub async fn suggest(
        &self,
        request: &CaptainRequest,
    ) -> FantasyResult<Vec<CaptainSuggestion>> {
        let ctx = RoundContext::neutral(request.round);
        let mut ranked = Vec::with_capacity(request.player_ids.len());

        for &player_id in &request.player_ids {
            let profile = match self
                .cache
                .get_player(player_id)
                .await
                .map_err(|e| FantasyError::Cache(e.to_string()))?
            {
                Some(p) => p,
                None => {
                    debug!(player_id = player_id, "Skipping unknown player");
                    continue;
                }
            };

            let projection = self.service.project_player(player_id, &ctx).await?;
            ranked.push(CaptainSuggestion {
                player_id,
                name: profile.name.clone(),
                projected_points: projection.projected_points,
                confidence_band: projection.confidence_band,
                form_note: form_note(&profile),
            });
        }

        rank_suggestions(&mut ranked);
        ranked.truncate(self.suggestions);

        metrics::counter!("captain.suggestions").increment(1);
        self.analytics.log_event(
            EventType::CaptainSuggested,
            request.round,
            EventFields {
                owner_id: Some(request.owner_id.clone()),
                player_id: ranked.first().map(|s| s.player_id),
                ..Default::default()
            },
        );

        Ok(ranked)
    }
}

/// Highest projection first; between equals, the steadier scorer wins.
fn rank_suggestions(suggestions: &mut [CaptainSuggestion]) {
    suggestions.sort_by(|a, b| {
        b.projected_points
            .partial_cmp(&a.projected_points)
            .unwrap_or(Ordering::Equal)
            .then(
                a.confidence_band
                    .partial_cmp(&b.confidence_band)
                    .unwrap_or(Ordering::Equal),
            )
    });
}

fn form_note(profile: &PlayerProfile) -> String {
    if profile.scores.is_empty() {
        return "no scoring history yet".to_string();
    }
    let last3 = profile.last_n_average(3);
    let season = profile.season_average();
    let trend = if last3 >= season { "up on" } else { "down on" };
    format!("averaging {last3:.1} over the last 3, {trend} a {season:.1} season")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestion(id: u32, points: f32, band: f32) -> CaptainSuggestion {
        CaptainSuggestion {
            player_id: id,
            name: format!("Player {id}"),
            projected_points: points,
            confidence_band: band,
            form_note: String::new(),
        }
    }

    #[test]
    fn test_rank_by_projection() {
        let mut s = vec![
            suggestion(1, 95.0, 10.0),
            suggestion(2, 110.0, 15.0),
            suggestion(3, 102.0, 8.0),
        ];
        rank_suggestions(&mut s);
        let order: Vec<u32> = s.iter().map(|x| x.player_id).collect();
        assert_eq!(order, vec![2, 3, 1]);
    }

    #[test]
    fn test_ties_break_on_volatility() {
        let mut s = vec![suggestion(1, 100.0, 20.0), suggestion(2, 100.0, 5.0)];
        rank_suggestions(&mut s);
        assert_eq!(s[0].player_id, 2);
    }
}
