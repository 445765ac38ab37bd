use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Field position of an AFL player.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Defender,
    Midfielder,
    Ruck,
    Forward,
}

/// Selection availability as published by clubs each week.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStatus {
    Fit,
    Test,
    Injured,
    Suspended,
    Omitted,
}

/// Raw stat line for one player in one round.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ToSchema)]
pub struct RoundStats {
    pub kicks: u16,
    pub handballs: u16,
    pub marks: u16,
    pub tackles: u16,
    pub hitouts: u16,
    pub frees_for: u16,
    pub frees_against: u16,
    pub goals: u16,
    pub behinds: u16,
    /// Time on ground, percent (0..=100).
    pub tog_pct: u8,
}

impl RoundStats {
    pub fn disposals(&self) -> u16 {
        self.kicks + self.handballs
    }
}

/// A completed round in a player's season history.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoundScore {
    pub round: u8,
    pub points: i32,
    pub stats: RoundStats,
    /// Price after the post-round recalculation.
    pub price_after: u32,
}

/// Full player profile, stored in Redis and mirrored in the L1 cache.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlayerProfile {
    pub player_id: u32,
    pub name: String,
    /// AFL club abbreviation ("COLL", "GEEL", ...).
    pub club: String,
    pub position: Position,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_position: Option<Position>,
    pub status: PlayerStatus,
    pub price: u32,
    pub breakeven: i32,
    /// Share of squads holding this player, percent.
    pub ownership_pct: f32,
    pub scores: Vec<RoundScore>,
    pub last_updated: DateTime<Utc>,
}

impl PlayerProfile {
    pub fn total_points(&self) -> i32 {
        self.scores.iter().map(|s| s.points).sum()
    }

    pub fn season_average(&self) -> f32 {
        if self.scores.is_empty() {
            return 0.0;
        }
        self.total_points() as f32 / self.scores.len() as f32
    }

    /// Average of the last `n` rounds played, or the season average when
    /// fewer rounds exist.
    pub fn last_n_average(&self, n: usize) -> f32 {
        if self.scores.is_empty() {
            return 0.0;
        }
        let window: Vec<i32> = self
            .scores
            .iter()
            .rev()
            .take(n)
            .map(|s| s.points)
            .collect();
        window.iter().sum::<i32>() as f32 / window.len() as f32
    }

    pub fn last_score(&self) -> Option<i32> {
        self.scores.last().map(|s| s.points)
    }

    /// Standard deviation of the last `n` scores. Zero with fewer than
    /// two rounds of history.
    pub fn score_stddev(&self, n: usize) -> f32 {
        let window: Vec<f32> = self
            .scores
            .iter()
            .rev()
            .take(n)
            .map(|s| s.points as f32)
            .collect();
        if window.len() < 2 {
            return 0.0;
        }
        let mean = window.iter().sum::<f32>() / window.len() as f32;
        let var =
            window.iter().map(|x| (x - mean) * (x - mean)).sum::<f32>() / window.len() as f32;
        var.sqrt()
    }

    pub fn plays_position(&self, position: Position) -> bool {
        self.position == position || self.secondary_position == Some(position)
    }
}

/// Compact roster row for listing endpoints and squad pickers.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlayerSummary {
    pub player_id: u32,
    pub name: String,
    pub club: String,
    pub position: Position,
    pub status: PlayerStatus,
    pub price: u32,
    pub average: f32,
}

impl From<&PlayerProfile> for PlayerSummary {
    fn from(p: &PlayerProfile) -> Self {
        Self {
            player_id: p.player_id,
            name: p.name.clone(),
            club: p.club.clone(),
            position: p.position,
            status: p.status,
            price: p.price,
            average: p.season_average(),
        }
    }
}

/// A manager's squad for one round: 6-8-2-6 on field plus interchange.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Squad {
    pub owner_id: String,
    pub round: u8,
    pub defenders: Vec<u32>,
    pub midfielders: Vec<u32>,
    pub rucks: Vec<u32>,
    pub forwards: Vec<u32>,
    pub interchange: Vec<u32>,
    pub remaining_salary: u64,
    pub trades_remaining: u8,
}

impl Squad {
    /// On-field player ids in position order.
    pub fn on_field(&self) -> impl Iterator<Item = u32> + '_ {
        self.defenders
            .iter()
            .chain(self.midfielders.iter())
            .chain(self.rucks.iter())
            .chain(self.forwards.iter())
            .copied()
    }

    pub fn contains(&self, player_id: u32) -> bool {
        self.on_field().any(|id| id == player_id)
            || self.interchange.contains(&player_id)
    }

    /// Check the squad against the configured structure: every line at its
    /// required size and no player listed twice.
    pub fn validate(&self, config: &crate::config::SquadConfig) -> Result<(), String> {
        let lines = [
            ("defenders", self.defenders.len(), config.defenders),
            ("midfielders", self.midfielders.len(), config.midfielders),
            ("rucks", self.rucks.len(), config.rucks),
            ("forwards", self.forwards.len(), config.forwards),
            ("interchange", self.interchange.len(), config.interchange),
        ];
        for (line, got, want) in lines {
            if got != want {
                return Err(format!("{line} must have {want} players, got {got}"));
            }
        }

        let mut seen = std::collections::HashSet::new();
        for id in self.on_field().chain(self.interchange.iter().copied()) {
            if !seen.insert(id) {
                return Err(format!("player {id} listed more than once"));
            }
        }
        Ok(())
    }
}

// ─── Projection Types ───────────────────────────────────────────────────

/// Per-round context the projection model scores against.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct RoundContext {
    pub round: u8,
    /// Opponent defensive difficulty, 0 (easiest) to 1 (hardest).
    #[serde(default = "default_difficulty")]
    pub opponent_difficulty: f32,
    /// Venue scoring factor, 1.0 = neutral.
    #[serde(default = "default_venue_factor")]
    pub venue_factor: f32,
    /// Days since the player's last match.
    #[serde(default = "default_days_break")]
    pub days_break: u8,
}

fn default_difficulty() -> f32 {
    0.5
}
fn default_venue_factor() -> f32 {
    1.0
}
fn default_days_break() -> u8 {
    7
}

impl RoundContext {
    pub fn neutral(round: u8) -> Self {
        Self {
            round,
            opponent_difficulty: default_difficulty(),
            venue_factor: default_venue_factor(),
            days_break: default_days_break(),
        }
    }
}

/// Projected fantasy score for one player in one round.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Projection {
    pub player_id: u32,
    pub round: u8,
    pub projected_points: f32,
    /// Width of one confidence deviation, points.
    pub confidence_band: f32,
    pub floor: f32,
    pub ceiling: f32,
    pub model_version: String,
}

// ─── Analytics Events ───────────────────────────────────────────────────

/// Platform event logged to ClickHouse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FantasyEvent {
    pub event_id: Uuid,
    pub event_type: EventType,
    pub round: u8,
    pub player_id: Option<u32>,
    pub owner_id: Option<String>,
    pub points: Option<i32>,
    pub price: Option<u32>,
    pub detail: Option<String>,
    pub latency_us: Option<u64>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    StatsIngested,
    PlayerCreated,
    PriceRecalculated,
    ProjectionServed,
    TradeEvaluated,
    CaptainSuggested,
    ApiError,
}

// ─── Trade & Captain DTOs ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TradeRequest {
    pub owner_id: String,
    pub round: u8,
    pub player_out: u32,
    pub player_in: u32,
    pub remaining_salary: u64,
    pub trades_remaining: u8,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TradeRating {
    Upgrade,
    Sideways,
    Downgrade,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TradeVerdict {
    pub owner_id: String,
    pub round: u8,
    pub player_out: u32,
    pub player_in: u32,
    pub rating: TradeRating,
    /// 0-100 composite of projected gain and price value.
    pub score: u8,
    pub projected_points_delta: f32,
    /// Positive when the trade banks salary.
    pub price_delta: i64,
    pub breakeven_gap: i32,
    pub salary_after: u64,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CaptainRequest {
    pub owner_id: String,
    pub round: u8,
    /// On-field player ids to rank.
    pub player_ids: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CaptainSuggestion {
    pub player_id: u32,
    pub name: String,
    pub projected_points: f32,
    pub confidence_band: f32,
    pub form_note: String,
}

// ─── Ingest DTOs ────────────────────────────────────────────────────────

/// One player's line in a round ingest batch. Identity fields are only
/// consulted when the player is first seen.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlayerRoundLine {
    pub player_id: u32,
    pub name: String,
    pub club: String,
    pub position: Position,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_position: Option<Position>,
    #[serde(default = "default_status")]
    pub status: PlayerStatus,
    pub stats: RoundStats,
}

fn default_status() -> PlayerStatus {
    PlayerStatus::Fit
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoundIngestBatch {
    pub round: u8,
    pub players: Vec<PlayerRoundLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IngestSummary {
    pub round: u8,
    pub players_updated: usize,
    pub players_created: usize,
    pub total_points: i64,
    pub top_score: i32,
    pub top_scorer: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_with_scores(points: &[i32]) -> PlayerProfile {
        PlayerProfile {
            player_id: 1,
            name: "Test Player".to_string(),
            club: "GEEL".to_string(),
            position: Position::Midfielder,
            secondary_position: None,
            status: PlayerStatus::Fit,
            price: 500_000,
            breakeven: 80,
            ownership_pct: 10.0,
            scores: points
                .iter()
                .enumerate()
                .map(|(i, &p)| RoundScore {
                    round: (i + 1) as u8,
                    points: p,
                    stats: RoundStats::default(),
                    price_after: 500_000,
                })
                .collect(),
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn test_averages() {
        let p = profile_with_scores(&[100, 80, 120, 60, 90]);
        assert_eq!(p.total_points(), 450);
        assert!((p.season_average() - 90.0).abs() < f32::EPSILON);
        // Last 3 = 120, 60, 90
        assert!((p.last_n_average(3) - 90.0).abs() < f32::EPSILON);
        assert_eq!(p.last_score(), Some(90));
    }

    #[test]
    fn test_empty_history() {
        let p = profile_with_scores(&[]);
        assert_eq!(p.season_average(), 0.0);
        assert_eq!(p.last_n_average(3), 0.0);
        assert_eq!(p.score_stddev(5), 0.0);
        assert_eq!(p.last_score(), None);
    }

    #[test]
    fn test_squad_validation() {
        let config = crate::config::SquadConfig::default();
        let mut next_id = 0u32;
        let mut take = |n: usize| -> Vec<u32> {
            (0..n)
                .map(|_| {
                    next_id += 1;
                    next_id
                })
                .collect()
        };
        let mut squad = Squad {
            owner_id: "owner-1".to_string(),
            round: 13,
            defenders: take(6),
            midfielders: take(8),
            rucks: take(2),
            forwards: take(6),
            interchange: take(8),
            remaining_salary: 150_000,
            trades_remaining: 12,
        };
        assert!(squad.validate(&config).is_ok());
        assert_eq!(squad.on_field().count(), config.field_size());
        assert!(squad.contains(1));
        assert!(!squad.contains(999));

        // A duplicated player fails validation
        squad.interchange[0] = squad.defenders[0];
        assert!(squad.validate(&config).is_err());

        // A short line fails validation
        squad.interchange.remove(0);
        assert!(squad.validate(&config).is_err());
    }

    #[test]
    fn test_dual_position() {
        let mut p = profile_with_scores(&[50]);
        p.secondary_position = Some(Position::Forward);
        assert!(p.plays_position(Position::Midfielder));
        assert!(p.plays_position(Position::Forward));
        assert!(!p.plays_position(Position::Ruck));
    }
}
