//! In-process roster directory for listing endpoints.
//!
//! Redis holds full profiles keyed by id; listings by position or club need
//! an index, so ingest maintains this DashMap of summary rows alongside the
//! write-through path.

use dashmap::DashMap;
use fantasy_core::types::{PlayerProfile, PlayerSummary, Position};

pub struct RosterDirectory {
    players: DashMap<u32, PlayerSummary>,
}

impl RosterDirectory {
    pub fn new() -> Self {
        Self {
            players: DashMap::new(),
        }
    }

    /// Insert or refresh a player's summary row.
    pub fn upsert(&self, profile: &PlayerProfile) {
        self.players.insert(profile.player_id, profile.into());
    }

    pub fn get(&self, player_id: u32) -> Option<PlayerSummary> {
        self.players.get(&player_id).map(|r| r.value().clone())
    }

    /// List players, optionally filtered by position and club.
    /// Sorted by price descending, the order squad pickers expect.
    pub fn list(&self, position: Option<Position>, club: Option<&str>) -> Vec<PlayerSummary> {
        let mut rows: Vec<PlayerSummary> = self
            .players
            .iter()
            .filter(|r| position.map(|p| r.value().position == p).unwrap_or(true))
            .filter(|r| {
                club.map(|c| r.value().club.eq_ignore_ascii_case(c))
                    .unwrap_or(true)
            })
            .map(|r| r.value().clone())
            .collect();
        rows.sort_by(|a, b| b.price.cmp(&a.price).then(a.player_id.cmp(&b.player_id)));
        rows
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

impl Default for RosterDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use fantasy_core::types::PlayerStatus;

    fn profile(id: u32, club: &str, position: Position, price: u32) -> PlayerProfile {
        PlayerProfile {
            player_id: id,
            name: format!("Player {id}"),
            club: club.to_string(),
            position,
            secondary_position: None,
            status: PlayerStatus::Fit,
            price,
            breakeven: 0,
            ownership_pct: 0.0,
            scores: Vec::new(),
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn test_list_filters_and_order() {
        let roster = RosterDirectory::new();
        roster.upsert(&profile(1, "GEEL", Position::Midfielder, 800_000));
        roster.upsert(&profile(2, "GEEL", Position::Defender, 400_000));
        roster.upsert(&profile(3, "COLL", Position::Midfielder, 900_000));

        let mids = roster.list(Some(Position::Midfielder), None);
        assert_eq!(mids.len(), 2);
        // Price descending
        assert_eq!(mids[0].player_id, 3);

        let cats = roster.list(None, Some("geel"));
        assert_eq!(cats.len(), 2);

        let all = roster.list(None, None);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_upsert_replaces() {
        let roster = RosterDirectory::new();
        roster.upsert(&profile(1, "GEEL", Position::Midfielder, 800_000));
        let mut updated = profile(1, "GEEL", Position::Midfielder, 850_000);
        updated.status = PlayerStatus::Injured;
        roster.upsert(&updated);

        assert_eq!(roster.len(), 1);
        let row = roster.get(1).expect("row present");
        assert_eq!(row.price, 850_000);
        assert_eq!(row.status, PlayerStatus::Injured);
    }
}
