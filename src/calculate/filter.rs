//! Game filtering.

use crate::models::{Game, Tournament};
use crate::selection::Selection;

/// Games visible under `selection`, in the tournament's ascending order.
///
/// An empty selection returns every game. The result is a fresh vector on
/// each call.
pub fn filtered_games(tournament: &Tournament, selection: &Selection) -> Vec<Game> {
    tournament
        .games
        .iter()
        .filter(|game| selection.includes(game.game_number))
        .cloned()
        .collect()
}
