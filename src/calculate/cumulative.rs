//! Cumulative per-team series.

use std::collections::BTreeSet;

use tracing::warn;

use crate::models::{CumulativePoint, CumulativeSeries, Game, TeamId, Tournament};

/// Cumulative series together with diagnostics about the input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    pub series: CumulativeSeries,

    /// Team ids seen in results but missing from the roster
    pub orphan_teams: Vec<TeamId>,
}

/// Walk `games` once, in order, and emit one running-total point per team
/// result.
///
/// Accumulators start lazily at a team's first appearance, so a team that
/// never plays in `games` has no entry. `placement` is the per-game value.
pub fn cumulative_series(games: &[Game]) -> CumulativeSeries {
    let mut series = CumulativeSeries::new();

    for game in games {
        for result in &game.team_results {
            let points = series.entry(result.team_id.clone()).or_default();
            let (points_so_far, kills_so_far, damage_so_far) = points
                .last()
                .map(|p| (p.total_points, p.total_kills, p.total_damage))
                .unwrap_or_default();

            points.push(CumulativePoint {
                game_number: game.game_number,
                total_points: points_so_far + u64::from(result.points),
                total_kills: kills_so_far + u64::from(result.kills),
                total_damage: damage_so_far + u64::from(result.damage),
                placement: result.placement,
            });
        }
    }

    series
}

/// Team ids referenced by results in `games` that the tournament roster
/// does not know about. Sorted, no duplicates.
pub fn orphan_team_ids(tournament: &Tournament, games: &[Game]) -> Vec<TeamId> {
    let orphans: BTreeSet<&TeamId> = games
        .iter()
        .flat_map(|g| g.team_results.iter())
        .map(|r| &r.team_id)
        .filter(|id| tournament.team(id).is_none())
        .collect();

    orphans.into_iter().cloned().collect()
}

/// Aggregate filtered games, flagging orphan team references.
///
/// Orphans are still aggregated under their raw id.
pub fn aggregate(tournament: &Tournament, games: &[Game]) -> Aggregation {
    let orphan_teams = orphan_team_ids(tournament, games);
    for team_id in &orphan_teams {
        warn!(
            "Tournament {} has results for unknown team {}",
            tournament.id, team_id
        );
    }

    Aggregation {
        series: cumulative_series(games),
        orphan_teams,
    }
}
