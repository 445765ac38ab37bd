//! Benchmarks for the projection engine.
//! Run with: cargo bench

#![allow(unused)]

use fantasy_core::config::ProjectionConfig;
use fantasy_core::types::{PlayerProfile, PlayerStatus, Position, RoundContext, RoundScore, RoundStats};
use fantasy_projection::ProjectionEngine;
use rand::Rng;

fn create_test_profile(player_id: u32) -> PlayerProfile {
    let mut rng = rand::thread_rng();
    PlayerProfile {
        player_id,
        name: format!("Bench Player {player_id}"),
        club: "GEEL".to_string(),
        position: Position::Midfielder,
        secondary_position: None,
        status: PlayerStatus::Fit,
        price: 650_000,
        breakeven: 85,
        ownership_pct: 12.0,
        scores: (1..=12)
            .map(|round| RoundScore {
                round,
                points: rng.gen_range(40..140),
                stats: RoundStats::default(),
                price_after: 650_000,
            })
            .collect(),
        last_updated: chrono::Utc::now(),
    }
}

fn main() {
    let config = ProjectionConfig {
        weights_path: "/nonexistent/weights.json".to_string(),
        ..Default::default()
    };

    let engine = ProjectionEngine::new(&config).expect("Failed to create engine");
    let profiles: Vec<PlayerProfile> = (0..630).map(create_test_profile).collect();
    let ctx = RoundContext::neutral(13);

    // Warmup
    for profile in profiles.iter().take(50) {
        let _ = engine.project(profile, &ctx);
    }

    // Benchmark: a full league pass per iteration
    let iterations = 1_000;
    let start = std::time::Instant::now();

    for _ in 0..iterations {
        for profile in &profiles {
            let _ = engine.project(profile, &ctx);
        }
    }

    let elapsed = start.elapsed();
    let total = iterations * profiles.len();
    let per_call = elapsed / total as u32;

    println!("=== Projection Benchmark ===");
    println!("Players:     {}", profiles.len());
    println!("Iterations:  {}", iterations);
    println!("Total time:  {:?}", elapsed);
    println!("Per call:    {:?}", per_call);
    println!(
        "Throughput:  {:.0} projections/sec",
        total as f64 / elapsed.as_secs_f64()
    );
}
