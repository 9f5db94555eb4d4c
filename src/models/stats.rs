//! Derived statistics models. Never persisted; recomputed from a snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{PlayerId, TeamId};

/// Running totals for one team after one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CumulativePoint {
    pub game_number: u32,
    pub total_points: u64,
    pub total_kills: u64,
    pub total_damage: u64,

    /// Placement in this game, not accumulated
    pub placement: u32,
}

/// Per-team ordered running totals, keyed by team id.
///
/// Teams that never appear in the filtered games have no entry.
pub type CumulativeSeries = BTreeMap<TeamId, Vec<CumulativePoint>>;

/// Final standing of a team over the filtered games.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStanding {
    /// 1-based position after sorting
    pub rank: u32,
    pub team_id: TeamId,

    /// Team name, or the raw id for teams missing from the roster
    pub name: String,
    pub color: Option<String>,
    pub games_played: u32,
    pub total_points: u64,
    pub total_kills: u64,
    pub total_damage: u64,
    pub average_placement: f64,
    pub best_placement: u32,
}

/// Summed per-player numbers over the filtered games.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub player_id: PlayerId,
    pub team_id: TeamId,
    pub games_played: u32,
    pub kills: u64,
    pub damage: u64,
    pub damage_taken: u64,
}

impl PlayerSummary {
    pub fn new(player_id: PlayerId, team_id: TeamId) -> Self {
        Self {
            player_id,
            team_id,
            games_played: 0,
            kills: 0,
            damage: 0,
            damage_taken: 0,
        }
    }
}
