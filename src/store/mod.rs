//! Dashboard store.
//!
//! Owns the current tournament snapshot and game selection, recomputes the
//! derived views whenever either changes, and republishes them to
//! subscribers through a watch channel.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::calculate::{aggregate, filtered_games, player_summaries, standings};
use crate::fetch::{Provenance, TournamentLoader};
use crate::models::{
    CumulativeSeries, Game, PlayerSummary, Team, TeamId, TeamStanding, Tournament, TournamentId,
};
use crate::selection::Selection;

/// Everything presentation collaborators read, as of one change.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub tournament: Option<Arc<Tournament>>,
    pub provenance: Option<Provenance>,
    pub loaded_at: Option<DateTime<Utc>>,
    pub selection: Selection,
    pub filtered_games: Arc<Vec<Game>>,
    pub cumulative: Arc<CumulativeSeries>,
    pub orphan_teams: Vec<TeamId>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl DashboardState {
    fn recompute(&mut self) {
        match &self.tournament {
            Some(tournament) => {
                let games = filtered_games(tournament, &self.selection);
                let aggregation = aggregate(tournament, &games);
                debug!(
                    "Recomputed {} filtered games, {} team series",
                    games.len(),
                    aggregation.series.len()
                );
                self.filtered_games = Arc::new(games);
                self.cumulative = Arc::new(aggregation.series);
                self.orphan_teams = aggregation.orphan_teams;
            }
            None => {
                self.filtered_games = Arc::default();
                self.cumulative = Arc::default();
                self.orphan_teams.clear();
            }
        }
    }
}

/// Result of a `load_tournament` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum LoadReport {
    /// This call was the latest and its snapshot is now current
    Committed { provenance: Provenance },

    /// A newer load was issued before this one finished; result dropped
    Superseded,
}

/// Read-only status flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStatus {
    pub is_loading: bool,
    pub error: Option<String>,
    pub tournament_id: Option<TournamentId>,
    pub selected_games: Vec<u32>,
}

pub struct TournamentStore {
    loader: TournamentLoader,
    generation: AtomicU64,
    state: watch::Sender<DashboardState>,
}

impl TournamentStore {
    pub fn new(loader: TournamentLoader) -> Self {
        let (state, _) = watch::channel(DashboardState::default());
        Self {
            loader,
            generation: AtomicU64::new(0),
            state,
        }
    }

    /// Receive a fresh `DashboardState` after every change.
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state.subscribe()
    }

    /// Load `id` and make it the current snapshot, unless a newer load was
    /// issued in the meantime.
    ///
    /// The selection is reset to "all games" on commit. A fallback load
    /// commits the synthetic snapshot and sets `error`.
    pub async fn load_tournament(&self, id: &TournamentId) -> LoadReport {
        let mut token = 0;
        self.state.send_modify(|state| {
            token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            state.is_loading = true;
        });

        let outcome = self.loader.load(id).await;

        let mut committed = false;
        self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != token {
                return false;
            }
            state.error = outcome.provenance.error().map(str::to_string);
            state.tournament = Some(Arc::new(outcome.tournament.clone()));
            state.provenance = Some(outcome.provenance.clone());
            state.loaded_at = Some(Utc::now());
            state.selection.clear();
            state.is_loading = false;
            state.recompute();
            committed = true;
            true
        });

        if committed {
            info!("Committed tournament {} (request {})", id, token);
            LoadReport::Committed {
                provenance: outcome.provenance,
            }
        } else {
            debug!("Discarded stale load of {} (request {})", id, token);
            LoadReport::Superseded
        }
    }

    fn update_selection(&self, f: impl FnOnce(&mut Selection)) {
        self.state.send_modify(|state| {
            f(&mut state.selection);
            state.recompute();
        });
    }

    pub fn toggle_game_filter(&self, game_number: u32) {
        self.update_selection(|s| s.toggle(game_number));
    }

    pub fn set_game_filters(&self, game_numbers: impl IntoIterator<Item = u32>) {
        self.update_selection(|s| s.set_all(game_numbers));
    }

    pub fn clear_filters(&self) {
        self.update_selection(Selection::clear);
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> DashboardState {
        self.state.borrow().clone()
    }

    pub fn current_tournament(&self) -> Option<Arc<Tournament>> {
        self.state.borrow().tournament.clone()
    }

    /// Teams of the current tournament, empty when nothing is loaded.
    pub fn available_teams(&self) -> Vec<Team> {
        self.state
            .borrow()
            .tournament
            .as_ref()
            .map(|t| t.teams.clone())
            .unwrap_or_default()
    }

    /// All game numbers of the current tournament, for the filter controls.
    pub fn available_games(&self) -> Vec<u32> {
        self.state
            .borrow()
            .tournament
            .as_ref()
            .map(|t| t.game_numbers())
            .unwrap_or_default()
    }

    pub fn selection(&self) -> Selection {
        self.state.borrow().selection.clone()
    }

    pub fn filtered_games(&self) -> Arc<Vec<Game>> {
        self.state.borrow().filtered_games.clone()
    }

    pub fn cumulative_data(&self) -> Arc<CumulativeSeries> {
        self.state.borrow().cumulative.clone()
    }

    pub fn orphan_teams(&self) -> Vec<TeamId> {
        self.state.borrow().orphan_teams.clone()
    }

    pub fn standings(&self) -> Vec<TeamStanding> {
        let state = self.state.borrow();
        match &state.tournament {
            Some(tournament) => standings(&state.cumulative, tournament),
            None => Vec::new(),
        }
    }

    pub fn player_summaries(&self) -> Vec<PlayerSummary> {
        player_summaries(&self.state.borrow().filtered_games)
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub fn status(&self) -> StoreStatus {
        let state = self.state.borrow();
        StoreStatus {
            is_loading: state.is_loading,
            error: state.error.clone(),
            tournament_id: state.tournament.as_ref().map(|t| t.id.clone()),
            selected_games: state.selection.game_numbers().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::test_support::StaticSource;
    use crate::fetch::{FetchError, MockGenerator, TournamentSource};
    use crate::models::{Game, TeamGameResult};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tokio::sync::{mpsc, oneshot};

    type Reply = Result<Tournament, String>;

    /// Source whose responses are released by the test, one per id.
    struct GatedSource {
        started: mpsc::UnboundedSender<String>,
        replies: Mutex<HashMap<String, oneshot::Receiver<Reply>>>,
    }

    #[async_trait]
    impl TournamentSource for GatedSource {
        fn name(&self) -> &'static str {
            "gated"
        }

        async fn fetch_tournament(&self, id: &TournamentId) -> Result<Tournament, FetchError> {
            let reply = self
                .replies
                .lock()
                .unwrap()
                .remove(id.as_str())
                .expect("no reply registered");
            self.started.send(id.to_string()).unwrap();
            reply
                .await
                .unwrap()
                .map_err(|message| FetchError::HttpStatus {
                    status: 500,
                    message,
                })
        }
    }

    struct Harness {
        store: Arc<TournamentStore>,
        started: mpsc::UnboundedReceiver<String>,
        senders: HashMap<String, oneshot::Sender<Reply>>,
    }

    fn gated(ids: &[&str]) -> Harness {
        let (started_tx, started) = mpsc::unbounded_channel();
        let mut replies = HashMap::new();
        let mut senders = HashMap::new();
        for id in ids {
            let (tx, rx) = oneshot::channel();
            replies.insert(id.to_string(), rx);
            senders.insert(id.to_string(), tx);
        }
        let source = GatedSource {
            started: started_tx,
            replies: Mutex::new(replies),
        };
        Harness {
            store: Arc::new(TournamentStore::new(TournamentLoader::new(Arc::new(source)))),
            started,
            senders,
        }
    }

    fn named(id: &str) -> Tournament {
        Tournament::new(id, id.to_uppercase())
            .with_game(Game::new(1).with_result(TeamGameResult::new("team-1", 1, 5, 2, 900)))
            .with_game(Game::new(2).with_result(TeamGameResult::new("team-1", 4, 0, 0, 300)))
            .with_game(Game::new(3).with_result(TeamGameResult::new("team-1", 2, 3, 1, 600)))
    }

    fn remote_store(tournament: Tournament) -> TournamentStore {
        TournamentStore::new(TournamentLoader::new(Arc::new(StaticSource {
            result: Ok(tournament),
        })))
    }

    fn totals(store: &TournamentStore, team: &str) -> Vec<(u32, u64)> {
        store.cumulative_data()[&TeamId::from(team)]
            .iter()
            .map(|p| (p.game_number, p.total_points))
            .collect()
    }

    #[test]
    fn test_unloaded_store_is_empty() {
        let store = TournamentStore::new(TournamentLoader::offline());
        assert!(store.current_tournament().is_none());
        assert!(store.available_teams().is_empty());
        assert!(store.filtered_games().is_empty());
        assert!(store.cumulative_data().is_empty());
        assert!(store.standings().is_empty());
        assert!(!store.is_loading());
        assert!(store.error().is_none());
    }

    #[test]
    fn test_selection_without_tournament_is_inert() {
        let store = TournamentStore::new(TournamentLoader::offline());
        store.toggle_game_filter(3);
        assert_eq!(store.selection().game_numbers().collect::<Vec<_>>(), vec![3]);
        assert!(store.filtered_games().is_empty());
    }

    #[tokio::test]
    async fn test_load_and_filter_flow() {
        let store = remote_store(named("cup"));
        let report = store.load_tournament(&"cup".into()).await;

        assert_eq!(
            report,
            LoadReport::Committed {
                provenance: Provenance::Remote
            }
        );
        assert!(store.error().is_none());
        assert!(!store.is_loading());
        assert_eq!(totals(&store, "team-1"), vec![(1, 5), (2, 5), (3, 8)]);

        store.toggle_game_filter(2);
        assert_eq!(store.filtered_games().len(), 1);
        assert_eq!(totals(&store, "team-1"), vec![(2, 0)]);

        store.set_game_filters(vec![3, 1]);
        assert_eq!(totals(&store, "team-1"), vec![(1, 5), (3, 8)]);

        store.clear_filters();
        assert_eq!(store.filtered_games().len(), 3);
    }

    #[tokio::test]
    async fn test_fallback_sets_error_but_commits_snapshot() {
        let store = TournamentStore::new(TournamentLoader::new(Arc::new(StaticSource {
            result: Err("connection refused".to_string()),
        })));
        let id = TournamentId::from("ewc-2025");

        let report = store.load_tournament(&id).await;
        assert!(matches!(
            report,
            LoadReport::Committed { ref provenance } if provenance.is_fallback()
        ));

        let error = store.error().unwrap();
        assert!(error.contains("connection refused"));
        assert_eq!(store.available_teams().len(), 20);
        assert_eq!(store.filtered_games().len(), 10);
        assert_eq!(store.cumulative_data().len(), 20);
        assert_eq!(
            store.current_tournament().unwrap().as_ref(),
            &MockGenerator::default().generate(&id, id.seed())
        );
    }

    #[tokio::test]
    async fn test_load_resets_selection() {
        let store = remote_store(named("cup"));
        store.load_tournament(&"cup".into()).await;
        store.toggle_game_filter(1);

        store.load_tournament(&"cup".into()).await;
        assert!(store.selection().is_empty());
        assert_eq!(store.filtered_games().len(), 3);
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let store = remote_store(named("cup"));
        let mut rx = store.subscribe();

        store.load_tournament(&"cup".into()).await;
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().filtered_games.len(), 3);

        store.toggle_game_filter(1);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().filtered_games.len(), 1);
    }

    #[tokio::test]
    async fn test_newer_request_wins_when_it_completes_first() {
        let mut h = gated(&["r1", "r2"]);

        let s1 = h.store.clone();
        let first = tokio::spawn(async move { s1.load_tournament(&"r1".into()).await });
        assert_eq!(h.started.recv().await.unwrap(), "r1");

        let s2 = h.store.clone();
        let second = tokio::spawn(async move { s2.load_tournament(&"r2".into()).await });
        assert_eq!(h.started.recv().await.unwrap(), "r2");
        assert!(h.store.is_loading());

        h.senders.remove("r2").unwrap().send(Ok(named("r2"))).unwrap();
        assert!(matches!(
            second.await.unwrap(),
            LoadReport::Committed { .. }
        ));
        assert_eq!(h.store.current_tournament().unwrap().id.as_str(), "r2");
        assert!(!h.store.is_loading());

        let rx = h.store.subscribe();
        h.senders.remove("r1").unwrap().send(Ok(named("r1"))).unwrap();
        assert_eq!(first.await.unwrap(), LoadReport::Superseded);

        assert_eq!(h.store.current_tournament().unwrap().id.as_str(), "r2");
        assert!(h.store.error().is_none());
        assert!(!h.store.is_loading());
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_stale_failure_leaves_no_error() {
        let mut h = gated(&["r1", "r2"]);

        let s1 = h.store.clone();
        let first = tokio::spawn(async move { s1.load_tournament(&"r1".into()).await });
        h.started.recv().await.unwrap();

        let s2 = h.store.clone();
        let second = tokio::spawn(async move { s2.load_tournament(&"r2".into()).await });
        h.started.recv().await.unwrap();

        h.senders.remove("r2").unwrap().send(Ok(named("r2"))).unwrap();
        second.await.unwrap();

        h.senders.remove("r1").unwrap().send(Err("timeout".to_string())).unwrap();
        assert_eq!(first.await.unwrap(), LoadReport::Superseded);

        assert!(h.store.error().is_none());
        assert_eq!(h.store.current_tournament().unwrap().id.as_str(), "r2");
    }

    #[tokio::test]
    async fn test_stale_completion_first_keeps_loading() {
        let mut h = gated(&["r1", "r2"]);

        let s1 = h.store.clone();
        let first = tokio::spawn(async move { s1.load_tournament(&"r1".into()).await });
        h.started.recv().await.unwrap();

        let s2 = h.store.clone();
        let second = tokio::spawn(async move { s2.load_tournament(&"r2".into()).await });
        h.started.recv().await.unwrap();

        h.senders.remove("r1").unwrap().send(Ok(named("r1"))).unwrap();
        assert_eq!(first.await.unwrap(), LoadReport::Superseded);
        assert!(h.store.current_tournament().is_none());
        assert!(h.store.is_loading());

        h.senders.remove("r2").unwrap().send(Ok(named("r2"))).unwrap();
        second.await.unwrap();
        assert_eq!(h.store.current_tournament().unwrap().id.as_str(), "r2");
        assert!(!h.store.is_loading());
    }

    #[tokio::test]
    async fn test_status_and_standings() {
        let store = remote_store(named("cup"));
        store.load_tournament(&"cup".into()).await;
        store.set_game_filters([1, 3]);

        let status = store.status();
        assert_eq!(status.tournament_id, Some(TournamentId::from("cup")));
        assert_eq!(status.selected_games, vec![1, 3]);
        assert_eq!(store.available_games(), vec![1, 2, 3]);

        let rows = store.standings();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total_points, 8);
        assert_eq!(rows[0].name, "team-1");
        assert_eq!(store.orphan_teams(), vec![TeamId::from("team-1")]);
    }
}
