//! Standings and player summaries derived from filtered games.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::models::{CumulativeSeries, Game, PlayerId, PlayerSummary, TeamStanding, Tournament};

/// Calculate the mean of a list of placements.
pub fn average_placement(placements: &[u32]) -> f64 {
    if placements.is_empty() {
        0.0
    } else {
        placements.iter().map(|&p| f64::from(p)).sum::<f64>() / placements.len() as f64
    }
}

/// Final standings, one row per team present in `series`.
///
/// Ordered by total points, then total kills (both descending), then team id.
pub fn standings(series: &CumulativeSeries, tournament: &Tournament) -> Vec<TeamStanding> {
    let mut rows: Vec<TeamStanding> = series
        .iter()
        .filter_map(|(team_id, points)| {
            let last = points.last()?;
            let placements: Vec<u32> = points.iter().map(|p| p.placement).collect();
            let team = tournament.team(team_id);

            Some(TeamStanding {
                rank: 0,
                team_id: team_id.clone(),
                name: team
                    .map(|t| t.name.clone())
                    .unwrap_or_else(|| team_id.to_string()),
                color: team.map(|t| t.color.clone()),
                games_played: points.len() as u32,
                total_points: last.total_points,
                total_kills: last.total_kills,
                total_damage: last.total_damage,
                average_placement: average_placement(&placements),
                best_placement: placements.iter().copied().min().unwrap_or(0),
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then_with(|| b.total_kills.cmp(&a.total_kills))
            .then_with(|| a.team_id.cmp(&b.team_id))
    });

    for (i, row) in rows.iter_mut().enumerate() {
        row.rank = i as u32 + 1;
    }

    rows
}

/// Sum each player's stats over `games`.
///
/// Ordered by damage descending, then player id.
pub fn player_summaries(games: &[Game]) -> Vec<PlayerSummary> {
    let mut by_player: BTreeMap<PlayerId, PlayerSummary> = BTreeMap::new();

    for game in games {
        for result in &game.team_results {
            for stat in &result.player_stats {
                let summary = by_player
                    .entry(stat.player_id.clone())
                    .or_insert_with(|| {
                        PlayerSummary::new(stat.player_id.clone(), result.team_id.clone())
                    });
                summary.games_played += 1;
                summary.kills += u64::from(stat.kills);
                summary.damage += u64::from(stat.damage);
                summary.damage_taken += u64::from(stat.damage_taken);
            }
        }
    }

    let mut rows: Vec<PlayerSummary> = by_player.into_values().collect();
    rows.sort_by(|a, b| match b.damage.cmp(&a.damage) {
        Ordering::Equal => a.player_id.cmp(&b.player_id),
        other => other,
    });
    rows
}
