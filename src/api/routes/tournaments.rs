use axum::extract::{Path, State};
use axum::Json;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{Team, TournamentId};
use crate::store::{LoadReport, StoreStatus};

/// Load a tournament and make it current. Waits for the load to settle.
pub async fn load(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LoadReport>, ApiError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ApiError::BadRequest("Tournament id is empty".to_string()));
    }
    let report = state.store.load_tournament(&TournamentId::from(id)).await;
    Ok(Json(report))
}

pub async fn status(State(state): State<AppState>) -> Json<StoreStatus> {
    Json(state.store.status())
}

pub async fn teams(State(state): State<AppState>) -> Json<Vec<Team>> {
    Json(state.store.available_teams())
}
