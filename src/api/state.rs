use std::sync::Arc;

use crate::store::TournamentStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<TournamentStore>,
}

impl AppState {
    pub fn new(store: TournamentStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}
