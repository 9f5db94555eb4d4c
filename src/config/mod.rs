//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::fetch::{MockGenerator, RemoteSourceConfig};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Remote data source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Tool endpoint URL. Empty disables the remote source.
    #[serde(default)]
    pub base_url: String,

    /// Tool to call for tournament details
    #[serde(default = "default_tool_name")]
    pub tool_name: String,

    /// Timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_tool_name() -> String {
    "get_tournament_details".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            tool_name: default_tool_name(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl SourceConfig {
    /// Parsed endpoint, or `None` when the remote source is disabled.
    pub fn endpoint(&self) -> Result<Option<Url>, ConfigError> {
        if self.base_url.trim().is_empty() {
            return Ok(None);
        }
        Url::parse(self.base_url.trim())
            .map(Some)
            .map_err(|e| ConfigError::ValidationError(format!("Invalid source base_url: {}", e)))
    }

    /// HTTP source settings, or `None` when the remote source is disabled.
    pub fn remote(&self) -> Result<Option<RemoteSourceConfig>, ConfigError> {
        Ok(self.endpoint()?.map(|endpoint| RemoteSourceConfig {
            tool_name: self.tool_name.clone(),
            timeout: Duration::from_secs(self.timeout_seconds),
            ..RemoteSourceConfig::new(endpoint)
        }))
    }
}

/// Synthetic fallback data configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackConfig {
    /// Fixed seed. When absent the seed is derived from the tournament id.
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default = "default_team_count")]
    pub team_count: u32,

    #[serde(default = "default_game_count")]
    pub game_count: u32,

    #[serde(default = "default_players_per_team")]
    pub players_per_team: u32,
}

fn default_team_count() -> u32 {
    20
}

fn default_game_count() -> u32 {
    10
}

fn default_players_per_team() -> u32 {
    3
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            seed: None,
            team_count: default_team_count(),
            game_count: default_game_count(),
            players_per_team: default_players_per_team(),
        }
    }
}

impl FallbackConfig {
    pub fn generator(&self) -> MockGenerator {
        MockGenerator {
            team_count: self.team_count,
            game_count: self.game_count,
            players_per_team: self.players_per_team,
            ..MockGenerator::default()
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub log_level: Option<String>,

    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub fallback: FallbackConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Source timeout must be greater than 0".to_string(),
            ));
        }

        self.source.endpoint()?;

        if self.fallback.team_count == 0
            || self.fallback.game_count == 0
            || self.fallback.players_per_team == 0
        {
            return Err(ConfigError::ValidationError(
                "Fallback team, game and player counts must be greater than 0".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
