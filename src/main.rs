use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use apex_dashboard::api::build_router_with_origin;
use apex_dashboard::api::state::AppState;
use apex_dashboard::config::AppConfig;
use apex_dashboard::fetch::{HttpTournamentSource, TournamentLoader};
use apex_dashboard::models::TournamentId;
use apex_dashboard::parse_duration;
use apex_dashboard::store::{LoadReport, TournamentStore};

#[derive(Parser)]
#[command(name = "apex-dashboard")]
#[command(about = "Esports tournament analytics for the dashboard")]
#[command(version)]
struct Cli {
    /// Path to configuration file (defaults apply if missing)
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Remote source timeout (e.g., "30s", "2m")
    #[arg(long)]
    timeout: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,

        /// Tournament to load before accepting requests
        #[arg(long)]
        preload: Option<String>,
    },

    /// Load a tournament once and print its standings
    Summary {
        /// Tournament id
        #[arg(long)]
        tournament: String,

        /// Only include these game numbers (comma-separated)
        #[arg(long, value_delimiter = ',')]
        games: Vec<u32>,
    },

    /// Print the synthetic tournament as JSON
    Generate {
        /// Tournament id
        #[arg(long, default_value = "ewc-2025")]
        tournament: String,

        /// Seed override
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn build_loader(config: &AppConfig, timeout: Option<Duration>) -> Result<TournamentLoader> {
    let loader = match config.source.remote()? {
        Some(mut remote) => {
            if let Some(timeout) = timeout {
                remote.timeout = timeout;
            }
            tracing::info!("Remote source: {}", remote.endpoint);
            TournamentLoader::new(Arc::new(HttpTournamentSource::new(remote)?))
        }
        None => {
            tracing::info!("No remote source configured, serving synthetic data");
            TournamentLoader::offline()
        }
    };

    let loader = loader.with_generator(config.fallback.generator());
    Ok(match config.fallback.seed {
        Some(seed) => loader.with_seed(seed),
        None => loader,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load_or_default(&cli.config)?;

    // Initialize tracing
    let level = cli
        .log_level
        .clone()
        .or_else(|| config.log_level.clone())
        .unwrap_or_else(|| "info".to_string());
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level));
    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting apex-dashboard v{}", env!("CARGO_PKG_VERSION"));

    let timeout = cli
        .timeout
        .as_deref()
        .map(|raw| parse_duration(raw).ok_or_else(|| anyhow!("Invalid --timeout: {}", raw)))
        .transpose()?;

    match cli.command {
        Commands::Serve {
            host,
            port,
            preload,
        } => {
            let store = TournamentStore::new(build_loader(&config, timeout)?);
            let state = AppState::new(store);

            if let Some(id) = preload {
                state.store.load_tournament(&TournamentId::from(id)).await;
            }

            let app = build_router_with_origin(state, &config.server.cors_origin);
            let addr = format!(
                "{}:{}",
                host.unwrap_or(config.server.host),
                port.unwrap_or(config.server.port)
            );
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Dashboard API: http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Summary { tournament, games } => {
            let store = TournamentStore::new(build_loader(&config, timeout)?);
            let report = store.load_tournament(&TournamentId::from(tournament)).await;
            if let LoadReport::Committed { provenance } = &report {
                if let Some(error) = provenance.error() {
                    eprintln!("warning: {} (showing synthetic data)", error);
                }
            }
            store.set_game_filters(games);

            let Some(current) = store.current_tournament() else {
                return Err(anyhow!("No tournament loaded"));
            };
            println!(
                "{} ({} of {} games)",
                current.name,
                store.filtered_games().len(),
                current.games.len()
            );
            println!(
                "{:>4}  {:<20} {:>5} {:>7} {:>6} {:>9} {:>8}",
                "#", "Team", "Games", "Points", "Kills", "Damage", "AvgPlc"
            );
            for row in store.standings() {
                println!(
                    "{:>4}  {:<20} {:>5} {:>7} {:>6} {:>9} {:>8.2}",
                    row.rank,
                    row.name,
                    row.games_played,
                    row.total_points,
                    row.total_kills,
                    row.total_damage,
                    row.average_placement
                );
            }
        }
        Commands::Generate { tournament, seed } => {
            let loader = build_loader(&config, timeout)?;
            let loader = match seed {
                Some(seed) => loader.with_seed(seed),
                None => loader,
            };
            let snapshot = loader.synthetic(&TournamentId::from(tournament));
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
    }

    Ok(())
}
