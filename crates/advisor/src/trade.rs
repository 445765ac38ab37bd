//! Trade evaluation: projected points delta, price value, and a composite
//! verdict for a proposed out/in pair.

use fantasy_analytics::logger::EventFields;
use fantasy_analytics::AnalyticsLogger;
use fantasy_cache::RedisCache;
use fantasy_core::error::{FantasyError, FantasyResult};
use fantasy_core::types::{
    EventType, PlayerProfile, PlayerStatus, RoundContext, TradeRating, TradeRequest, TradeVerdict,
};
use fantasy_projection::ProjectionService;
use std::sync::Arc;
use tracing::debug;

/// Projected-points swing that separates an upgrade from a sideways move.
const UPGRADE_THRESHOLD: f32 = 10.0;

/// Trade evaluation engine.
pub struct TradeAdvisor {
    service: Arc<ProjectionService>,
    cache: Arc<RedisCache>,
    analytics: Arc<AnalyticsLogger>,
}

impl TradeAdvisor {
    pub fn new(
        service: Arc<ProjectionService>,
        cache: Arc<RedisCache>,
        analytics: Arc<AnalyticsLogger>,
    ) -> Self {
        Self {
            service,
            cache,
            analytics,
        }
    }

    /// Evaluate a proposed trade. Affordability and trade-count checks are
    /// hard failures; everything else shapes the verdict.
    pub async fn evaluate(&self, request: &TradeRequest) -> FantasyResult<TradeVerdict> {
        if request.trades_remaining == 0 {
            return Err(FantasyError::TradeValidation(
                "no season trades remaining".to_string(),
            ));
        }
        if request.player_out == request.player_in {
            return Err(FantasyError::TradeValidation(
                "trade out and trade in are the same player".to_string(),
            ));
        }

        let out = self.fetch(request.player_out).await?;
        let inc = self.fetch(request.player_in).await?;

        let salary_after = match check_affordability(out.price, inc.price, request.remaining_salary)
        {
            Ok(salary) => salary,
            Err(msg) => {
                metrics::counter!("trades.rejected_salary").increment(1);
                return Err(FantasyError::TradeValidation(msg));
            }
        };

        let ctx = RoundContext::neutral(request.round);
        let proj_out = self.service.project_player(out.player_id, &ctx).await?;
        let proj_in = self.service.project_player(inc.player_id, &ctx).await?;

        let points_delta = proj_in.projected_points - proj_out.projected_points;
        let price_delta = out.price as i64 - inc.price as i64;
        let breakeven_gap = out.breakeven - inc.breakeven;

        let rating = rate(points_delta);
        let score = composite_score(points_delta, breakeven_gap);
        let notes = build_notes(&out, &inc, price_delta);

        debug!(
            player_out = request.player_out,
            player_in = request.player_in,
            points_delta = points_delta,
            score = score,
            "Trade evaluated"
        );
        metrics::counter!("trades.evaluated").increment(1);

        self.analytics.log_event(
            EventType::TradeEvaluated,
            request.round,
            EventFields {
                player_id: Some(request.player_in),
                owner_id: Some(request.owner_id.clone()),
                points: Some(points_delta.round() as i32),
                ..Default::default()
            },
        );

        Ok(TradeVerdict {
            owner_id: request.owner_id.clone(),
            round: request.round,
            player_out: request.player_out,
            player_in: request.player_in,
            rating,
            score,
            projected_points_delta: points_delta,
            price_delta,
            breakeven_gap,
            salary_after,
            notes,
        })
    }

    async fn fetch(&self, player_id: u32) -> FantasyResult<PlayerProfile> {
        self.cache
            .get_player(player_id)
            .await
            .map_err(|e| FantasyError::Cache(e.to_string()))?
            .ok_or(FantasyError::UnknownPlayer(player_id))
    }
}

/// Salary left after selling `out_price` and buying `in_price`, or an
/// error when the trade-in is unaffordable.
fn check_affordability(out_price: u32, in_price: u32, remaining_salary: u64) -> Result<u64, String> {
    let budget = remaining_salary + out_price as u64;
    if in_price as u64 > budget {
        return Err(format!(
            "trade-in price ${in_price} exceeds available salary ${budget}"
        ));
    }
    Ok(budget - in_price as u64)
}

fn rate(points_delta: f32) -> TradeRating {
    if points_delta >= UPGRADE_THRESHOLD {
        TradeRating::Upgrade
    } else if points_delta <= -UPGRADE_THRESHOLD {
        TradeRating::Downgrade
    } else {
        TradeRating::Sideways
    }
}

/// 0-100 composite: the projected swing dominates, breakeven value nudges.
fn composite_score(points_delta: f32, breakeven_gap: i32) -> u8 {
    let base = 50.0 + points_delta.clamp(-40.0, 40.0) + (breakeven_gap as f32 * 0.2).clamp(-10.0, 10.0);
    base.clamp(0.0, 100.0).round() as u8
}

fn build_notes(out: &PlayerProfile, inc: &PlayerProfile, price_delta: i64) -> Vec<String> {
    let mut notes = Vec::new();
    if matches!(out.status, PlayerStatus::Injured | PlayerStatus::Suspended) {
        notes.push(format!("{} is unavailable, trading out frees the spot", out.name));
    }
    if inc.status == PlayerStatus::Test {
        notes.push(format!("{} is named to test, monitor team news", inc.name));
    }
    if matches!(inc.status, PlayerStatus::Injured | PlayerStatus::Suspended) {
        notes.push(format!("{} is currently unavailable", inc.name));
    }
    if price_delta > 0 {
        notes.push(format!("banks ${price_delta} in salary"));
    }
    if inc.breakeven < 0 {
        notes.push(format!("{} is priced to rise (negative breakeven)", inc.name));
    }
    notes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_thresholds() {
        assert_eq!(rate(15.0), TradeRating::Upgrade);
        assert_eq!(rate(10.0), TradeRating::Upgrade);
        assert_eq!(rate(9.9), TradeRating::Sideways);
        assert_eq!(rate(-9.9), TradeRating::Sideways);
        assert_eq!(rate(-10.0), TradeRating::Downgrade);
    }

    #[test]
    fn test_affordability() {
        // $650k in, $500k out, $100k banked: short by $50k
        assert!(check_affordability(500_000, 650_000, 100_000).is_err());
        // Exactly affordable
        assert_eq!(
            check_affordability(500_000, 650_000, 150_000),
            Ok(0)
        );
        // Downgrade banks the difference
        assert_eq!(
            check_affordability(650_000, 400_000, 50_000),
            Ok(300_000)
        );
    }

    #[test]
    fn test_composite_score_bounds() {
        assert_eq!(composite_score(0.0, 0), 50);
        assert!(composite_score(100.0, 200) <= 100);
        assert_eq!(composite_score(-100.0, -200), 0);
        // Breakeven value nudges but never dominates
        assert_eq!(composite_score(0.0, 100), 60);
        assert_eq!(composite_score(20.0, 0), 70);
    }
}
