//! Player price recurrence and breakeven calculation.
//!
//! Prices move on a 75/25 blend of the old price and the last-3-round
//! average converted to dollars through the magic number. Breakeven is the
//! score that holds the price flat next round.

use crate::config::PricingConfig;
use crate::types::PlayerProfile;

/// Price after a completed round, rounded to the nearest $1k and floored
/// at the configured minimum.
pub fn price_after_round(old_price: u32, last3_avg: f32, config: &PricingConfig) -> u32 {
    let blended = 0.75 * old_price as f64 + 0.25 * last3_avg as f64 * config.magic_number as f64;
    let rounded = ((blended / 1000.0).round() * 1000.0) as u32;
    rounded.max(config.price_floor)
}

/// Score needed next round to hold price. The recurrence holds flat when
/// the next last-3 average equals price / magic_number, so the breakeven
/// is that target times three minus the two most recent scores. Missing
/// rounds are filled with the season average.
pub fn breakeven(profile: &PlayerProfile, config: &PricingConfig) -> i32 {
    let fill = profile.season_average();
    let mut recent = profile.scores.iter().rev().map(|s| s.points as f32);
    let s1 = recent.next().unwrap_or(fill);
    let s2 = recent.next().unwrap_or(fill);

    let target = 3.0 * profile.price as f32 / config.magic_number as f32;
    (target - s1 - s2).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PlayerStatus, Position, RoundScore, RoundStats};
    use chrono::Utc;

    fn profile(price: u32, points: &[i32]) -> PlayerProfile {
        PlayerProfile {
            player_id: 7,
            name: "Rookie".to_string(),
            club: "ESS".to_string(),
            position: Position::Defender,
            secondary_position: None,
            status: PlayerStatus::Fit,
            price,
            breakeven: 0,
            ownership_pct: 0.0,
            scores: points
                .iter()
                .enumerate()
                .map(|(i, &p)| RoundScore {
                    round: (i + 1) as u8,
                    points: p,
                    stats: RoundStats::default(),
                    price_after: price,
                })
                .collect(),
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn test_price_rises_on_form() {
        let config = PricingConfig::default();
        // Averaging 100 on a $500k price: 0.75*500k + 0.25*100*9750 = 618,750
        let new = price_after_round(500_000, 100.0, &config);
        assert_eq!(new, 619_000);
        assert!(new > 500_000);
    }

    #[test]
    fn test_price_floor_holds() {
        let config = PricingConfig::default();
        let new = price_after_round(config.price_floor, 0.0, &config);
        assert_eq!(new, config.price_floor);
    }

    #[test]
    fn test_rookie_breakeven_no_history() {
        let config = PricingConfig::default();
        let p = profile(123_000, &[]);
        // 3 * 123000 / 9750 with no scores to subtract
        assert_eq!(breakeven(&p, &config), 38);
    }

    #[test]
    fn test_breakeven_drops_with_big_scores() {
        let config = PricingConfig::default();
        let low = breakeven(&profile(500_000, &[120, 130]), &config);
        let high = breakeven(&profile(500_000, &[60, 55]), &config);
        assert!(low < high);
    }
}
