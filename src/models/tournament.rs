//! Tournament snapshot model.
//!
//! Field names serialize in camelCase so the Tournament-shaped JSON returned
//! by the data source deserializes without a translation layer.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{PlayerId, TeamId, TournamentId};

/// Structural problems that make a snapshot unusable by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("Duplicate team id: {0}")]
    DuplicateTeam(TeamId),

    #[error("Game numbers not strictly increasing: {previous} followed by {next}")]
    GameOrder { previous: u32, next: u32 },

    #[error("Team {team} has more than one result in game {game}")]
    DuplicateResult { game: u32, team: TeamId },

    #[error("Team {team} has placement 0 in game {game}")]
    InvalidPlacement { game: u32, team: TeamId },
}

/// A team taking part in the tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    pub name: String,

    /// Roster, fixed size per team
    pub players: Vec<PlayerId>,

    /// Display token, opaque to the engine
    pub color: String,
}

/// Per-player line of a team's game result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerGameStat {
    pub player_id: PlayerId,
    pub kills: u32,
    pub damage: u32,
    pub damage_taken: u32,
}

/// One team's result in one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamGameResult {
    pub team_id: TeamId,

    /// Finishing position, 1 is best
    pub placement: u32,
    pub points: u32,
    pub kills: u32,
    pub damage: u32,

    #[serde(default)]
    pub player_stats: Vec<PlayerGameStat>,
}

impl TeamGameResult {
    pub fn new(
        team_id: impl Into<TeamId>,
        placement: u32,
        points: u32,
        kills: u32,
        damage: u32,
    ) -> Self {
        Self {
            team_id: team_id.into(),
            placement,
            points,
            kills,
            damage,
            player_stats: Vec::new(),
        }
    }

    pub fn with_player_stats(mut self, stats: Vec<PlayerGameStat>) -> Self {
        self.player_stats = stats;
        self
    }
}

/// A single game of the tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub game_number: u32,

    /// Results keyed by team. A team absent from this list did not play.
    #[serde(rename = "teams", alias = "teamResults")]
    pub team_results: Vec<TeamGameResult>,
}

impl Game {
    pub fn new(game_number: u32) -> Self {
        Self {
            game_number,
            team_results: Vec::new(),
        }
    }

    pub fn with_result(mut self, result: TeamGameResult) -> Self {
        self.team_results.push(result);
        self
    }

    /// Look up a team's result in this game.
    pub fn result_for(&self, team_id: &TeamId) -> Option<&TeamGameResult> {
        self.team_results.iter().find(|r| &r.team_id == team_id)
    }
}

/// An immutable bundle of teams and ordered games for one load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub total_games: u32,
    pub teams: Vec<Team>,

    /// Sorted ascending by game number
    pub games: Vec<Game>,
}

impl Tournament {
    pub fn new(id: impl Into<TournamentId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            total_games: 0,
            teams: Vec::new(),
            games: Vec::new(),
        }
    }

    pub fn with_team(mut self, team: Team) -> Self {
        self.teams.push(team);
        self
    }

    /// Append a game. Keeps `total_games` in step with the game list.
    pub fn with_game(mut self, game: Game) -> Self {
        self.games.push(game);
        self.total_games = self.games.len() as u32;
        self
    }

    pub fn team(&self, team_id: &TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| &t.id == team_id)
    }

    /// Game numbers in stored order.
    pub fn game_numbers(&self) -> Vec<u32> {
        self.games.iter().map(|g| g.game_number).collect()
    }

    /// Sort games ascending by game number. Stable, so equal numbers keep
    /// their relative order and are then caught by `validate`.
    pub fn sort_games(&mut self) {
        self.games.sort_by_key(|g| g.game_number);
    }

    /// Check the invariants the filter and aggregation stages rely on.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let mut seen_teams = HashSet::new();
        for team in &self.teams {
            if !seen_teams.insert(&team.id) {
                return Err(SnapshotError::DuplicateTeam(team.id.clone()));
            }
        }

        for pair in self.games.windows(2) {
            if pair[1].game_number <= pair[0].game_number {
                return Err(SnapshotError::GameOrder {
                    previous: pair[0].game_number,
                    next: pair[1].game_number,
                });
            }
        }

        for game in &self.games {
            let mut seen_results = HashSet::new();
            for result in &game.team_results {
                if !seen_results.insert(&result.team_id) {
                    return Err(SnapshotError::DuplicateResult {
                        game: game.game_number,
                        team: result.team_id.clone(),
                    });
                }
                if result.placement == 0 {
                    return Err(SnapshotError::InvalidPlacement {
                        game: game.game_number,
                        team: result.team_id.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}
