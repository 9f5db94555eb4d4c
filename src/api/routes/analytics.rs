use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::{ApiError, PageParams, Pagination, PaginationMeta};
use crate::models::{CumulativePoint, CumulativeSeries, Game, PlayerSummary, TeamId, TeamStanding};

// ── Games ───────────────────────────────────────────────────────

/// Games passing the current filter, ascending.
pub async fn games(State(state): State<AppState>) -> Json<Vec<Game>> {
    Json(state.store.filtered_games().as_ref().clone())
}

/// Every game number of the current tournament, for the filter controls.
pub async fn available_games(State(state): State<AppState>) -> Json<Vec<u32>> {
    Json(state.store.available_games())
}

// ── Race chart ──────────────────────────────────────────────────

pub async fn cumulative(State(state): State<AppState>) -> Json<CumulativeSeries> {
    Json(state.store.cumulative_data().as_ref().clone())
}

pub async fn team_series(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> Result<Json<Vec<CumulativePoint>>, ApiError> {
    state
        .store
        .cumulative_data()
        .get(&TeamId::from(team_id.as_str()))
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No series for team {}", team_id)))
}

// ── Standings / damage analysis ─────────────────────────────────

pub async fn standings(State(state): State<AppState>) -> Json<Vec<TeamStanding>> {
    Json(state.store.standings())
}

#[derive(Debug, Serialize)]
pub struct PlayersResponse {
    pub players: Vec<PlayerSummary>,
    pub pagination: PaginationMeta,
}

pub async fn players(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Json<PlayersResponse> {
    let pagination = Pagination::from(params);
    let all = state.store.player_summaries();

    Json(PlayersResponse {
        players: pagination.apply(&all),
        pagination: PaginationMeta::new(&pagination, all.len() as u32),
    })
}
