//! HTTP tournament source.
//!
//! Calls a tool endpoint with `{ tournamentId }` and expects a tool response
//! whose first content item carries Tournament-shaped JSON as text.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use super::{FetchError, TournamentSource};
use crate::models::{Tournament, TournamentId};

/// Configuration for the HTTP source.
#[derive(Debug, Clone)]
pub struct RemoteSourceConfig {
    /// Tool endpoint
    pub endpoint: Url,

    /// Name of the tool to call
    pub tool_name: String,

    /// Request timeout
    pub timeout: Duration,

    /// User agent string
    pub user_agent: String,
}

impl RemoteSourceConfig {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            tool_name: "get_tournament_details".to_string(),
            timeout: Duration::from_secs(30),
            user_agent: concat!("apex-dashboard/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolArguments<'a> {
    tournament_id: &'a str,
}

#[derive(Debug, Serialize)]
struct ToolParams<'a> {
    name: &'a str,
    arguments: ToolArguments<'a>,
}

#[derive(Debug, Serialize)]
struct ToolRequest<'a> {
    method: &'static str,
    params: ToolParams<'a>,
}

#[derive(Debug, Deserialize)]
struct ToolContent {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ToolResponse {
    #[serde(default)]
    content: Vec<ToolContent>,
}

/// Build the JSON request body for a tournament lookup.
fn request_body<'a>(tool_name: &'a str, tournament_id: &'a TournamentId) -> ToolRequest<'a> {
    ToolRequest {
        method: "tools/call",
        params: ToolParams {
            name: tool_name,
            arguments: ToolArguments {
                tournament_id: tournament_id.as_str(),
            },
        },
    }
}

/// Decode a tool response body into a tournament.
pub fn parse_tool_response(body: &[u8]) -> Result<Tournament, FetchError> {
    let response: ToolResponse = serde_json::from_slice(body)?;
    let content = response
        .content
        .into_iter()
        .next()
        .ok_or(FetchError::EmptyResponse)?;
    Ok(serde_json::from_str(&content.text)?)
}

/// Tournament source backed by an HTTP tool endpoint.
pub struct HttpTournamentSource {
    client: Client,
    config: RemoteSourceConfig,
}

impl HttpTournamentSource {
    pub fn new(config: RemoteSourceConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("apex-dashboard")),
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl TournamentSource for HttpTournamentSource {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch_tournament(&self, id: &TournamentId) -> Result<Tournament, FetchError> {
        info!("Requesting tournament {} from {}", id, self.config.endpoint);

        let response = self
            .client
            .post(self.config.endpoint.as_str())
            .json(&request_body(&self.config.tool_name, id))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.bytes().await?;
        debug!("Received {} bytes for tournament {}", body.len(), id);
        parse_tool_response(&body)
    }
}
