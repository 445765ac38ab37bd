//! Projection engine — manages model lifecycle and provides the
//! high-level projection API used by the REST layer and advisors.

use crate::model::{ProjectionModel, FEATURE_DIM};
use fantasy_core::config::ProjectionConfig;
use fantasy_core::error::FantasyResult;
use fantasy_core::types::{PlayerProfile, PlayerStatus, Projection, RoundContext};
use ndarray::Array1;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info};

/// Scores are clamped to this range; nobody has ever gone past 200.
const MAX_PROJECTION: f32 = 200.0;

/// Band width used for players with under two rounds of history.
const ROOKIE_BAND: f32 = 20.0;

/// Thread-safe projection engine wrapping the linear model.
pub struct ProjectionEngine {
    model: Arc<RwLock<ProjectionModel>>,
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Initialize the engine: load weights and prepare for inference.
    pub fn new(config: &ProjectionConfig) -> FantasyResult<Self> {
        let model = ProjectionModel::load(&config.weights_path)?;

        info!(version = model.version(), "Projection engine initialized");

        Ok(Self {
            model: Arc::new(RwLock::new(model)),
            config: config.clone(),
        })
    }

    /// Project one player's score for a round.
    ///
    /// Unavailable players (injured or suspended) project to zero with an
    /// empty confidence band.
    pub fn project(&self, profile: &PlayerProfile, ctx: &RoundContext) -> Projection {
        let model = self.model.read();

        if matches!(
            profile.status,
            PlayerStatus::Injured | PlayerStatus::Suspended
        ) {
            return Projection {
                player_id: profile.player_id,
                round: ctx.round,
                projected_points: 0.0,
                confidence_band: 0.0,
                floor: 0.0,
                ceiling: 0.0,
                model_version: model.version().to_string(),
            };
        }

        let features = Self::build_features(profile, ctx);
        let raw = model.infer(&features);
        let projected = raw.clamp(0.0, MAX_PROJECTION);

        debug!(
            player_id = profile.player_id,
            round = ctx.round,
            projected = projected,
            "Projection computed"
        );

        let band = Self::confidence_band(profile);

        Projection {
            player_id: profile.player_id,
            round: ctx.round,
            projected_points: projected,
            confidence_band: band,
            floor: (projected - band).max(0.0),
            ceiling: (projected + band).min(MAX_PROJECTION),
            model_version: model.version().to_string(),
        }
    }

    /// Build the model's feature vector for one player.
    ///
    /// Layout (16 dims):
    ///   [0..4)   — form block: last-3 avg, last-5 avg, season avg, last score
    ///   [4..6)   — trend block: form delta, last-5 stddev
    ///   [6..9)   — availability one-hot: fit, test, omitted
    ///   [9..12)  — context: opponent difficulty, venue factor, break/7 days
    ///   [12..16) — reserved / zero-padded for future features
    fn build_features(profile: &PlayerProfile, ctx: &RoundContext) -> Array1<f32> {
        let mut features = Array1::zeros(FEATURE_DIM);

        let last3 = profile.last_n_average(3);
        let last5 = profile.last_n_average(5);
        let season = profile.season_average();

        features[0] = last3;
        features[1] = last5;
        features[2] = season;
        features[3] = profile.last_score().unwrap_or(0) as f32;
        features[4] = last3 - season;
        features[5] = profile.score_stddev(5);

        match profile.status {
            PlayerStatus::Fit => features[6] = 1.0,
            PlayerStatus::Test => features[7] = 1.0,
            PlayerStatus::Omitted => features[8] = 1.0,
            // Injured/Suspended short-circuit before feature building
            _ => {}
        }

        features[9] = ctx.opponent_difficulty.clamp(0.0, 1.0);
        features[10] = ctx.venue_factor;
        features[11] = ctx.days_break as f32 / 7.0;

        features
    }

    /// One deviation of the last five scores, widened for players under an
    /// availability cloud.
    fn confidence_band(profile: &PlayerProfile) -> f32 {
        let base = if profile.scores.len() < 2 {
            ROOKIE_BAND
        } else {
            profile.score_stddev(5)
        };
        match profile.status {
            PlayerStatus::Test => base * 1.5,
            _ => base,
        }
    }

    /// Hot-reload new weights without downtime.
    pub fn reload_weights(&self, weights_path: &str) -> FantasyResult<()> {
        info!(path = weights_path, "Hot-reloading projection weights");
        let new_model = ProjectionModel::load(weights_path)?;
        let mut model = self.model.write();
        *model = new_model;
        info!("Weights hot-reload complete");
        Ok(())
    }

    pub fn model_version(&self) -> String {
        self.model.read().version().to_string()
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use fantasy_core::types::{Position, RoundScore, RoundStats};

    fn engine() -> ProjectionEngine {
        let config = ProjectionConfig {
            weights_path: "/nonexistent/weights.json".to_string(),
            ..Default::default()
        };
        ProjectionEngine::new(&config).expect("engine builds from builtin weights")
    }

    fn profile(points: &[i32], status: PlayerStatus) -> PlayerProfile {
        PlayerProfile {
            player_id: 42,
            name: "Mid Gun".to_string(),
            club: "CARL".to_string(),
            position: Position::Midfielder,
            secondary_position: None,
            status,
            price: 900_000,
            breakeven: 110,
            ownership_pct: 40.0,
            scores: points
                .iter()
                .enumerate()
                .map(|(i, &p)| RoundScore {
                    round: (i + 1) as u8,
                    points: p,
                    stats: RoundStats::default(),
                    price_after: 900_000,
                })
                .collect(),
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn test_flat_form_projects_near_average() {
        let engine = engine();
        let p = profile(&[100, 100, 100, 100, 100], PlayerStatus::Fit);
        let proj = engine.project(&p, &RoundContext::neutral(14));
        assert!(
            (proj.projected_points - 100.0).abs() < 1.0,
            "got {}",
            proj.projected_points
        );
        assert_eq!(proj.round, 14);
        assert_eq!(proj.model_version, "3.4.4");
    }

    #[test]
    fn test_injured_projects_zero() {
        let engine = engine();
        let p = profile(&[120, 115, 130], PlayerStatus::Injured);
        let proj = engine.project(&p, &RoundContext::neutral(14));
        assert_eq!(proj.projected_points, 0.0);
        assert_eq!(proj.ceiling, 0.0);
        assert_eq!(proj.confidence_band, 0.0);
    }

    #[test]
    fn test_projection_bounds() {
        let engine = engine();
        let rookie = profile(&[], PlayerStatus::Fit);
        let proj = engine.project(&rookie, &RoundContext::neutral(1));
        assert!(proj.projected_points >= 0.0);
        assert!(proj.ceiling <= MAX_PROJECTION);
        assert!(proj.floor >= 0.0);
        // No history: the rookie band applies
        assert_eq!(proj.confidence_band, ROOKIE_BAND);
    }

    #[test]
    fn test_test_status_widens_band() {
        let engine = engine();
        let fit = profile(&[80, 95, 70, 105, 90], PlayerStatus::Fit);
        let test = profile(&[80, 95, 70, 105, 90], PlayerStatus::Test);
        let fit_proj = engine.project(&fit, &RoundContext::neutral(10));
        let test_proj = engine.project(&test, &RoundContext::neutral(10));
        assert!(test_proj.confidence_band > fit_proj.confidence_band);
        assert!(test_proj.projected_points < fit_proj.projected_points);
    }

    #[test]
    fn test_hot_reload_missing_file_keeps_serving() {
        let engine = engine();
        // Reload from a missing path falls back to builtin weights
        engine
            .reload_weights("/still/nonexistent.json")
            .expect("fallback reload");
        assert_eq!(engine.model_version(), "3.4.4");
    }
}
