//! Which games are included in analysis.
//!
//! An empty selection is the "all games" sentinel, not "no games".

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    selected_game_numbers: BTreeSet<u32>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove the game if selected, add it otherwise.
    ///
    /// Unknown game numbers are accepted; they simply match nothing.
    pub fn toggle(&mut self, game_number: u32) {
        if !self.selected_game_numbers.remove(&game_number) {
            self.selected_game_numbers.insert(game_number);
        }
    }

    /// Replace the selection wholesale. Duplicates collapse.
    pub fn set_all<I>(&mut self, game_numbers: I)
    where
        I: IntoIterator<Item = u32>,
    {
        self.selected_game_numbers = game_numbers.into_iter().collect();
    }

    /// Reset to the "show all" sentinel.
    pub fn clear(&mut self) {
        self.selected_game_numbers.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.selected_game_numbers.is_empty()
    }

    pub fn contains(&self, game_number: u32) -> bool {
        self.selected_game_numbers.contains(&game_number)
    }

    /// Whether a game passes this selection, honoring the empty sentinel.
    pub fn includes(&self, game_number: u32) -> bool {
        self.is_empty() || self.contains(game_number)
    }

    pub fn game_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.selected_game_numbers.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.selected_game_numbers.len()
    }
}

impl FromIterator<u32> for Selection {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self {
            selected_game_numbers: iter.into_iter().collect(),
        }
    }
}
