//! Tournament data source adapter.
//!
//! Fetches a tournament snapshot from the remote source. Any transport or
//! schema failure degrades to the seeded synthetic generator, so callers
//! always receive a well-formed `Tournament` plus its provenance.

mod mock;
mod remote;

pub use mock::MockGenerator;
pub use remote::{parse_tool_response, HttpTournamentSource, RemoteSourceConfig};

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{SnapshotError, Tournament, TournamentId};

/// Errors that can occur while fetching from the remote source.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Tool response had no content")]
    EmptyResponse,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid tournament payload: {0}")]
    Schema(#[from] SnapshotError),

    #[error("No remote source configured")]
    Unconfigured,
}

/// A remote source of tournament snapshots.
#[async_trait]
pub trait TournamentSource: Send + Sync {
    /// Source identifier for logging.
    fn name(&self) -> &'static str;

    async fn fetch_tournament(&self, id: &TournamentId) -> Result<Tournament, FetchError>;
}

/// Where a loaded snapshot came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Provenance {
    /// Parsed from the remote source
    Remote,

    /// Remote failed; synthetic data was generated instead
    Fallback { reason: String },
}

impl Provenance {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Provenance::Fallback { .. })
    }

    /// Failure message to surface to the UI, if any.
    pub fn error(&self) -> Option<&str> {
        match self {
            Provenance::Remote => None,
            Provenance::Fallback { reason } => Some(reason),
        }
    }
}

/// A snapshot together with its provenance.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub tournament: Tournament,
    pub provenance: Provenance,
}

/// Loads tournaments from an optional remote source, falling back to
/// synthetic data.
pub struct TournamentLoader {
    source: Option<Arc<dyn TournamentSource>>,
    generator: MockGenerator,
    fixed_seed: Option<u64>,
}

impl TournamentLoader {
    pub fn new(source: Arc<dyn TournamentSource>) -> Self {
        Self {
            source: Some(source),
            generator: MockGenerator::default(),
            fixed_seed: None,
        }
    }

    /// A loader with no remote source. Every load uses the generator.
    pub fn offline() -> Self {
        Self {
            source: None,
            generator: MockGenerator::default(),
            fixed_seed: None,
        }
    }

    pub fn with_generator(mut self, generator: MockGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Use the same seed for every tournament id.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.fixed_seed = Some(seed);
        self
    }

    /// Seed used for fallback data of `id`.
    pub fn seed_for(&self, id: &TournamentId) -> u64 {
        self.fixed_seed.unwrap_or_else(|| id.seed())
    }

    /// Generate the fallback snapshot for `id` without touching the source.
    pub fn synthetic(&self, id: &TournamentId) -> Tournament {
        self.generator.generate(id, self.seed_for(id))
    }

    async fn fetch_remote(&self, id: &TournamentId) -> Result<Tournament, FetchError> {
        let source = self.source.as_ref().ok_or(FetchError::Unconfigured)?;
        let mut tournament = source.fetch_tournament(id).await?;
        tournament.sort_games();
        tournament.validate()?;
        Ok(tournament)
    }

    /// Load `id`. Never fails: remote errors produce a fallback outcome.
    pub async fn load(&self, id: &TournamentId) -> LoadOutcome {
        match self.fetch_remote(id).await {
            Ok(tournament) => {
                info!(
                    "Loaded tournament {} ({} games, {} teams)",
                    id,
                    tournament.games.len(),
                    tournament.teams.len()
                );
                LoadOutcome {
                    tournament,
                    provenance: Provenance::Remote,
                }
            }
            Err(e) => {
                let reason = format!("Failed to load tournament {}: {}", id, e);
                match e {
                    FetchError::Unconfigured => info!("Using synthetic data for {}", id),
                    _ => warn!("{}; using synthetic data", reason),
                }
                LoadOutcome {
                    tournament: self.synthetic(id),
                    provenance: Provenance::Fallback { reason },
                }
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::StaticSource;
    use super::*;
    use crate::models::{Game, TeamGameResult};
    use pretty_assertions::assert_eq;

    fn remote_tournament() -> Tournament {
        Tournament::new("remote", "Remote Cup")
            .with_game(Game::new(2).with_result(TeamGameResult::new("a", 1, 3, 0, 10)))
            .with_game(Game::new(1).with_result(TeamGameResult::new("a", 2, 1, 0, 5)))
    }

    #[tokio::test]
    async fn test_remote_success_is_sorted() {
        let loader = TournamentLoader::new(Arc::new(StaticSource {
            result: Ok(remote_tournament()),
        }));

        let outcome = loader.load(&"remote".into()).await;
        assert_eq!(outcome.provenance, Provenance::Remote);
        assert_eq!(outcome.tournament.game_numbers(), vec![1, 2]);
        assert_eq!(outcome.tournament.name, "Remote Cup");
    }

    #[tokio::test]
    async fn test_remote_failure_falls_back() {
        let loader = TournamentLoader::new(Arc::new(StaticSource {
            result: Err("down".to_string()),
        }));

        let id = TournamentId::from("ewc-2025");
        let outcome = loader.load(&id).await;

        assert!(outcome.provenance.is_fallback());
        assert!(outcome.provenance.error().unwrap().contains("down"));
        assert_eq!(outcome.tournament, loader.synthetic(&id));
        assert!(outcome.tournament.validate().is_ok());
    }

    #[tokio::test]
    async fn test_invalid_payload_falls_back() {
        let duplicate = Tournament::new("bad", "Bad")
            .with_game(Game::new(1))
            .with_game(Game::new(1));
        let loader = TournamentLoader::new(Arc::new(StaticSource {
            result: Ok(duplicate),
        }));

        let outcome = loader.load(&"bad".into()).await;
        assert!(outcome.provenance.is_fallback());
        assert!(outcome
            .provenance
            .error()
            .unwrap()
            .contains("Invalid tournament payload"));
    }

    #[tokio::test]
    async fn test_offline_loader_uses_generator() {
        let loader = TournamentLoader::offline().with_seed(5);
        let outcome = loader.load(&"ewc-2025".into()).await;

        assert!(outcome.provenance.is_fallback());
        assert_eq!(
            outcome.tournament,
            MockGenerator::default().generate(&"ewc-2025".into(), 5)
        );
    }

    #[test]
    fn test_seed_defaults_to_id_hash() {
        let loader = TournamentLoader::offline();
        let id = TournamentId::from("ewc-2025");
        assert_eq!(loader.seed_for(&id), id.seed());
        assert_eq!(loader.with_seed(11).seed_for(&id), 11);
    }

    #[test]
    fn test_provenance_serialization() {
        let json = serde_json::to_value(Provenance::Fallback {
            reason: "x".to_string(),
        })
        .unwrap();
        assert_eq!(json["kind"], "fallback");
        assert_eq!(json["reason"], "x");
        assert_eq!(
            serde_json::to_value(Provenance::Remote).unwrap()["kind"],
            "remote"
        );
    }
}
