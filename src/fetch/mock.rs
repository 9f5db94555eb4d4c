//! Deterministic synthetic tournament data.
//!
//! Used when the remote source is unavailable, and as a test fixture. Same
//! (tournament id, seed) always yields the same snapshot.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::models::{
    Game, PlayerGameStat, PlayerId, Team, TeamGameResult, TeamId, Tournament, TournamentId,
};

/// Shape of the generated tournament.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockGenerator {
    pub name: String,
    pub team_count: u32,
    pub game_count: u32,
    pub players_per_team: u32,
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self {
            name: "EWC 2025".to_string(),
            team_count: 20,
            game_count: 10,
            players_per_team: 3,
        }
    }
}

impl MockGenerator {
    fn team_id(index: u32) -> TeamId {
        TeamId::new(format!("team-{}", index + 1))
    }

    fn player_id(&self, team_index: u32, player_index: u32) -> PlayerId {
        PlayerId::new(format!(
            "player-{}",
            team_index * self.players_per_team + player_index + 1
        ))
    }

    fn teams(&self) -> Vec<Team> {
        (0..self.team_count)
            .map(|i| Team {
                id: Self::team_id(i),
                name: format!("Team {}", i + 1),
                players: (0..self.players_per_team)
                    .map(|p| self.player_id(i, p))
                    .collect(),
                color: format!("hsl({}, 70%, 60%)", (i * 18) % 360),
            })
            .collect()
    }

    fn game(&self, game_number: u32, rng: &mut ChaCha20Rng) -> Game {
        let mut placements: Vec<u32> = (1..=self.team_count).collect();
        placements.shuffle(rng);

        let team_results = placements
            .into_iter()
            .enumerate()
            .map(|(team_index, placement)| {
                let team_index = team_index as u32;
                let player_stats = (0..self.players_per_team)
                    .map(|p| PlayerGameStat {
                        player_id: self.player_id(team_index, p),
                        kills: rng.gen_range(0..=2),
                        damage: rng.gen_range(200..=1399),
                        damage_taken: rng.gen_range(100..=899),
                    })
                    .collect();

                TeamGameResult {
                    team_id: Self::team_id(team_index),
                    placement,
                    points: rng.gen_range(1..=15),
                    kills: rng.gen_range(0..=7),
                    damage: rng.gen_range(500..=3499),
                    player_stats,
                }
            })
            .collect();

        Game {
            game_number,
            team_results,
        }
    }

    /// Build a structurally valid tournament from `seed`.
    pub fn generate(&self, tournament_id: &TournamentId, seed: u64) -> Tournament {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let games: Vec<Game> = (1..=self.game_count)
            .map(|n| self.game(n, &mut rng))
            .collect();

        Tournament {
            id: tournament_id.clone(),
            name: self.name.clone(),
            total_games: self.game_count,
            teams: self.teams(),
            games,
        }
    }
}
