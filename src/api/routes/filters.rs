use axum::extract::{Path, State};
use axum::Json;

use crate::api::state::AppState;
use crate::store::StoreStatus;

pub async fn current(State(state): State<AppState>) -> Json<StoreStatus> {
    Json(state.store.status())
}

pub async fn toggle(State(state): State<AppState>, Path(game): Path<u32>) -> Json<StoreStatus> {
    state.store.toggle_game_filter(game);
    Json(state.store.status())
}

/// Replace the selection. An empty list selects all games.
pub async fn set(
    State(state): State<AppState>,
    Json(games): Json<Vec<u32>>,
) -> Json<StoreStatus> {
    state.store.set_game_filters(games);
    Json(state.store.status())
}

pub async fn clear(State(state): State<AppState>) -> Json<StoreStatus> {
    state.store.clear_filters();
    Json(state.store.status())
}
