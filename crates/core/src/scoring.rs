//! AFL Fantasy scoring over a raw stat line.

use crate::types::RoundStats;

const KICK: i32 = 3;
const HANDBALL: i32 = 2;
const MARK: i32 = 3;
const TACKLE: i32 = 4;
const HITOUT: i32 = 1;
const FREE_FOR: i32 = 1;
const FREE_AGAINST: i32 = -3;
const GOAL: i32 = 6;
const BEHIND: i32 = 1;

/// Fantasy points for one stat line. Free kicks against make a negative
/// total possible; the score is deliberately not clamped.
pub fn score(stats: &RoundStats) -> i32 {
    stats.kicks as i32 * KICK
        + stats.handballs as i32 * HANDBALL
        + stats.marks as i32 * MARK
        + stats.tackles as i32 * TACKLE
        + stats.hitouts as i32 * HITOUT
        + stats.frees_for as i32 * FREE_FOR
        + stats.frees_against as i32 * FREE_AGAINST
        + stats.goals as i32 * GOAL
        + stats.behinds as i32 * BEHIND
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_line() {
        let stats = RoundStats {
            kicks: 20,
            handballs: 10,
            marks: 5,
            tackles: 6,
            hitouts: 0,
            frees_for: 2,
            frees_against: 1,
            goals: 2,
            behinds: 1,
            tog_pct: 85,
        };
        // 60 + 20 + 15 + 24 + 0 + 2 - 3 + 12 + 1
        assert_eq!(score(&stats), 131);
        assert_eq!(stats.disposals(), 30);
    }

    #[test]
    fn test_ruck_line() {
        let stats = RoundStats {
            kicks: 8,
            handballs: 12,
            marks: 4,
            tackles: 3,
            hitouts: 40,
            ..Default::default()
        };
        assert_eq!(score(&stats), 24 + 24 + 12 + 12 + 40);
    }

    #[test]
    fn test_negative_score_possible() {
        let stats = RoundStats {
            frees_against: 4,
            handballs: 2,
            ..Default::default()
        };
        assert_eq!(score(&stats), -8);
    }

    #[test]
    fn test_empty_line_scores_zero() {
        assert_eq!(score(&RoundStats::default()), 0);
    }
}
