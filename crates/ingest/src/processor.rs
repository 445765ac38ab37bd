//! Round stats ingestion: validates a feed batch, scores each stat line,
//! rolls prices forward, and writes players through the cache.

use chrono::Utc;
use fantasy_analytics::logger::EventFields;
use fantasy_analytics::AnalyticsLogger;
use fantasy_cache::{RedisCache, RosterDirectory};
use fantasy_core::config::{IngestConfig, PricingConfig};
use fantasy_core::error::{FantasyError, FantasyResult};
use fantasy_core::pricing;
use fantasy_core::scoring;
use fantasy_core::types::{
    EventType, IngestSummary, PlayerProfile, PlayerRoundLine, RoundIngestBatch, RoundScore,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Final home-and-away round.
const LAST_ROUND: u8 = 24;

/// Maximum player/club name length accepted from the feed.
const MAX_FIELD_LEN: usize = 256;

/// Processes round stat batches pushed by the data feed.
pub struct IngestProcessor {
    cache: Arc<RedisCache>,
    roster: Arc<RosterDirectory>,
    analytics: Arc<AnalyticsLogger>,
    pricing: PricingConfig,
    config: IngestConfig,
}

impl IngestProcessor {
    pub fn new(
        cache: Arc<RedisCache>,
        roster: Arc<RosterDirectory>,
        analytics: Arc<AnalyticsLogger>,
        pricing: PricingConfig,
        config: IngestConfig,
    ) -> Self {
        Self {
            cache,
            roster,
            analytics,
            pricing,
            config,
        }
    }

    /// Validate a feed batch at the ingest boundary.
    fn validate_batch(&self, batch: &RoundIngestBatch) -> FantasyResult<()> {
        if batch.round == 0 || batch.round > LAST_ROUND {
            return Err(FantasyError::IngestValidation(format!(
                "round must be 1..={LAST_ROUND}, got {}",
                batch.round
            )));
        }
        if batch.players.is_empty() {
            return Err(FantasyError::IngestValidation(
                "batch must contain at least one player".to_string(),
            ));
        }
        if batch.players.len() > self.config.max_batch_players {
            return Err(FantasyError::IngestValidation(format!(
                "batch exceeds maximum of {} players",
                self.config.max_batch_players
            )));
        }

        let mut seen = HashSet::with_capacity(batch.players.len());
        for line in &batch.players {
            if line.name.is_empty() || line.name.len() > MAX_FIELD_LEN {
                return Err(FantasyError::IngestValidation(format!(
                    "invalid name for player {}",
                    line.player_id
                )));
            }
            if line.club.is_empty() || line.club.len() > MAX_FIELD_LEN {
                return Err(FantasyError::IngestValidation(format!(
                    "invalid club for player {}",
                    line.player_id
                )));
            }
            if line.stats.tog_pct > 100 {
                return Err(FantasyError::IngestValidation(format!(
                    "time on ground over 100% for player {}",
                    line.player_id
                )));
            }
            if !seen.insert(line.player_id) {
                return Err(FantasyError::IngestValidation(format!(
                    "duplicate player {} in batch",
                    line.player_id
                )));
            }
        }
        Ok(())
    }

    /// Ingest one round batch. Validation failures reject the whole batch
    /// before anything is applied.
    pub async fn ingest_round(&self, batch: RoundIngestBatch) -> FantasyResult<IngestSummary> {
        self.validate_batch(&batch)?;

        metrics::counter!("ingest.batches").increment(1);

        let mut summary = IngestSummary {
            round: batch.round,
            players_updated: 0,
            players_created: 0,
            total_points: 0,
            top_score: i32::MIN,
            top_scorer: None,
        };

        for line in &batch.players {
            let existing = self
                .cache
                .get_player(line.player_id)
                .await
                .map_err(|e| FantasyError::Cache(e.to_string()))?;

            let created = existing.is_none();
            let mut profile = match existing {
                Some(p) => p,
                None => new_profile(line, &self.pricing),
            };

            let points = apply_round_line(&mut profile, line, batch.round, &self.pricing);

            self.cache
                .put_player(&profile)
                .await
                .map_err(|e| FantasyError::Cache(e.to_string()))?;
            self.roster.upsert(&profile);

            if created {
                summary.players_created += 1;
                self.analytics.log_event(
                    EventType::PlayerCreated,
                    batch.round,
                    EventFields {
                        player_id: Some(profile.player_id),
                        price: Some(profile.price),
                        ..Default::default()
                    },
                );
            } else {
                summary.players_updated += 1;
            }

            self.analytics.log_event(
                EventType::StatsIngested,
                batch.round,
                EventFields {
                    player_id: Some(profile.player_id),
                    points: Some(points),
                    price: Some(profile.price),
                    ..Default::default()
                },
            );

            summary.total_points += points as i64;
            if points > summary.top_score {
                summary.top_score = points;
                summary.top_scorer = Some(profile.player_id);
            }
        }

        metrics::counter!("ingest.players").increment(batch.players.len() as u64);
        info!(
            round = batch.round,
            updated = summary.players_updated,
            created = summary.players_created,
            top_score = summary.top_score,
            "Round batch ingested"
        );

        Ok(summary)
    }
}

fn new_profile(line: &PlayerRoundLine, pricing: &PricingConfig) -> PlayerProfile {
    PlayerProfile {
        player_id: line.player_id,
        name: line.name.clone(),
        club: line.club.clone(),
        position: line.position,
        secondary_position: line.secondary_position,
        status: line.status,
        price: pricing.rookie_price,
        breakeven: 0,
        ownership_pct: 0.0,
        scores: Vec::new(),
        last_updated: Utc::now(),
    }
}

/// Apply one stat line to a profile: score it, update the history entry for
/// the round (replacing on re-ingest), and roll prices forward from the
/// corrected point. Returns the fantasy points scored.
pub fn apply_round_line(
    profile: &mut PlayerProfile,
    line: &PlayerRoundLine,
    round: u8,
    pricing: &PricingConfig,
) -> i32 {
    let points = scoring::score(&line.stats);

    let entry = RoundScore {
        round,
        points,
        stats: line.stats,
        price_after: 0, // filled by the replay below
    };

    let replay_from = match profile.scores.iter().position(|s| s.round == round) {
        Some(idx) => {
            // Feed correction: replace in place, reprice from here
            warn!(
                player_id = profile.player_id,
                round = round,
                "Replacing existing round entry (feed correction)"
            );
            metrics::counter!("ingest.corrections").increment(1);
            profile.scores[idx] = entry;
            idx
        }
        None => {
            profile.scores.push(entry);
            profile.scores.sort_by_key(|s| s.round);
            profile
                .scores
                .iter()
                .position(|s| s.round == round)
                .unwrap_or(profile.scores.len() - 1)
        }
    };

    replay_prices(profile, replay_from, pricing);

    profile.status = line.status;
    profile.price = profile
        .scores
        .last()
        .map(|s| s.price_after)
        .unwrap_or(pricing.rookie_price);
    profile.breakeven = pricing::breakeven(profile, pricing);
    profile.last_updated = Utc::now();

    points
}

/// Re-run the price recurrence for every entry from `from` onward, using
/// the entry before it (or the rookie price) as the basis.
fn replay_prices(profile: &mut PlayerProfile, from: usize, pricing: &PricingConfig) {
    let mut basis = if from == 0 {
        pricing.rookie_price
    } else {
        profile.scores[from - 1].price_after
    };

    for i in from..profile.scores.len() {
        let window: Vec<i32> = profile.scores[..=i]
            .iter()
            .rev()
            .take(3)
            .map(|s| s.points)
            .collect();
        let last3 = window.iter().sum::<i32>() as f32 / window.len() as f32;
        let price = pricing::price_after_round(basis, last3, pricing);
        profile.scores[i].price_after = price;
        basis = price;
    }
}
