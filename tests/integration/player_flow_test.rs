//! Integration test for the ingest → pricing → projection flow and the
//! public DTO shapes, run entirely on in-memory components.

use fantasy_core::config::{PricingConfig, ProjectionConfig};
use fantasy_core::types::*;
use fantasy_ingest::processor::apply_round_line;
use fantasy_projection::ProjectionEngine;

/// Construct a sample feed line for testing.
fn sample_line(player_id: u32, kicks: u16, handballs: u16, tackles: u16) -> PlayerRoundLine {
    PlayerRoundLine {
        player_id,
        name: "Marcus Bontempelli".to_string(),
        club: "WB".to_string(),
        position: Position::Midfielder,
        secondary_position: None,
        status: PlayerStatus::Fit,
        stats: RoundStats {
            kicks,
            handballs,
            marks: 5,
            tackles,
            hitouts: 0,
            frees_for: 1,
            frees_against: 1,
            goals: 1,
            behinds: 0,
            tog_pct: 82,
        },
    }
}

fn seeded_profile(rounds: u8) -> PlayerProfile {
    let pricing = PricingConfig::default();
    let first = sample_line(11, 22, 12, 5);
    let mut profile = PlayerProfile {
        player_id: first.player_id,
        name: first.name.clone(),
        club: first.club.clone(),
        position: first.position,
        secondary_position: None,
        status: first.status,
        price: pricing.rookie_price,
        breakeven: 0,
        ownership_pct: 0.0,
        scores: Vec::new(),
        last_updated: chrono::Utc::now(),
    };
    for round in 1..=rounds {
        apply_round_line(
            &mut profile,
            &sample_line(11, 20 + round as u16, 12, 5),
            round,
            &pricing,
        );
    }
    profile
}

#[test]
fn test_ingest_batch_serialization() {
    let batch = RoundIngestBatch {
        round: 13,
        players: vec![sample_line(11, 22, 12, 5)],
    };
    let json = serde_json::to_string(&batch).unwrap();
    let deserialized: RoundIngestBatch = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized.round, 13);
    assert_eq!(deserialized.players.len(), 1);
    assert_eq!(deserialized.players[0].stats.kicks, 22);
    assert_eq!(deserialized.players[0].status, PlayerStatus::Fit);
}

#[test]
fn test_status_defaults_to_fit() {
    // Feed lines without a status field parse as fit
    let json = r#"{
        "player_id": 5,
        "name": "Nick Daicos",
        "club": "COLL",
        "position": "midfielder",
        "stats": {
            "kicks": 30, "handballs": 10, "marks": 6, "tackles": 4,
            "hitouts": 0, "frees_for": 2, "frees_against": 0,
            "goals": 1, "behinds": 1, "tog_pct": 88
        }
    }"#;
    let line: PlayerRoundLine = serde_json::from_str(json).unwrap();
    assert_eq!(line.status, PlayerStatus::Fit);
    assert_eq!(line.position, Position::Midfielder);
}

#[test]
fn test_score_price_projection_flow() {
    let profile = seeded_profile(5);

    // Five rising scores: price moved off the rookie floor
    assert_eq!(profile.scores.len(), 5);
    assert!(profile.price > PricingConfig::default().rookie_price);
    assert!(profile.breakeven > 0);

    // Projection lands inside its own band and carries the model version
    let engine = ProjectionEngine::new(&ProjectionConfig {
        weights_path: "/nonexistent/weights.json".to_string(),
        ..Default::default()
    })
    .expect("builtin weights");

    let projection = engine.project(&profile, &RoundContext::neutral(6));
    assert_eq!(projection.model_version, "3.4.4");
    assert!(projection.projected_points > 0.0);
    assert!(projection.floor <= projection.projected_points);
    assert!(projection.projected_points <= projection.ceiling);

    let json = serde_json::to_string(&projection).unwrap();
    let roundtripped: Projection = serde_json::from_str(&json).unwrap();
    assert_eq!(roundtripped.player_id, profile.player_id);
    assert_eq!(roundtripped.round, 6);
}

#[test]
fn test_health_response_shape() {
    let health = fantasy_api::rest::HealthResponse {
        status: "healthy".to_string(),
        version: "3.4.4".to_string(),
        model_version: "3.4.4".to_string(),
        uptime_secs: 12,
        current_round: 13,
    };
    let json: serde_json::Value =
        serde_json::from_str(&serde_json::to_string(&health).unwrap()).unwrap();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["current_round"], 13);
}

#[test]
fn test_trade_verdict_serialization() {
    let verdict = TradeVerdict {
        owner_id: "owner-42".to_string(),
        round: 13,
        player_out: 11,
        player_in: 5,
        rating: TradeRating::Upgrade,
        score: 78,
        projected_points_delta: 14.5,
        price_delta: -120_000,
        breakeven_gap: 22,
        salary_after: 310_000,
        notes: vec!["banks no salary".to_string()],
    };
    let json = serde_json::to_string(&verdict).unwrap();
    assert!(json.contains("\"rating\":\"upgrade\""));
    let roundtripped: TradeVerdict = serde_json::from_str(&json).unwrap();
    assert_eq!(roundtripped.rating, TradeRating::Upgrade);
    assert_eq!(roundtripped.price_delta, -120_000);
}

#[test]
fn test_projection_zero_for_unavailable() {
    let mut profile = seeded_profile(5);
    profile.status = PlayerStatus::Suspended;

    let engine = ProjectionEngine::new(&ProjectionConfig {
        weights_path: "/nonexistent/weights.json".to_string(),
        ..Default::default()
    })
    .expect("builtin weights");

    let projection = engine.project(&profile, &RoundContext::neutral(6));
    assert_eq!(projection.projected_points, 0.0);
    assert_eq!(projection.floor, 0.0);
    assert_eq!(projection.ceiling, 0.0);
}
