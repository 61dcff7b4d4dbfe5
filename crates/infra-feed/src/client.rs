// HTTP FootballFeed Implementation

use std::time::Duration;

use async_trait::async_trait;
use matchday_core::port::{
    FeedError, FootballFeed, MatchesPayload, ScorersPayload, StandingsPayload, TeamPayload,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.football-data.org/v4";
pub const DEFAULT_COMPETITION: &str = "PL";
pub const API_KEY_HEADER: &str = "X-Auth-Token";

/// Connection settings for the upstream service
#[derive(Debug, Clone)]
pub struct FeedSettings {
    pub base_url: String,
    /// Sent as `X-Auth-Token`; requests go out unauthenticated without it
    pub api_key: Option<String>,
    pub competition: String,
    pub timeout: Duration,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            competition: DEFAULT_COMPETITION.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// football-data.org client
///
/// Every request carries the bounded timeout; a timeout, transport failure,
/// non-2xx status or undecodable body is returned as a `FeedError` and never
/// retried here.
pub struct HttpFootballFeed {
    client: Client,
    settings: FeedSettings,
}

impl HttpFootballFeed {
    pub fn new(settings: FeedSettings) -> Result<Self, FeedError> {
        if settings.api_key.as_deref().map_or(true, str::is_empty) {
            warn!("No feed API key configured, requests will be unauthenticated");
        }

        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| FeedError::Transport(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self { client, settings })
    }

    fn competition_url(&self, resource: &str) -> String {
        format!(
            "{}/competitions/{}/{}",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.competition,
            resource
        )
    }

    fn team_url(&self, external_id: i64) -> String {
        format!(
            "{}/teams/{}",
            self.settings.base_url.trim_end_matches('/'),
            external_id
        )
    }

    async fn get<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T, FeedError> {
        debug!(url, "Fetching feed document");

        let mut request = self.client.get(url).query(query);
        if let Some(key) = self.settings.api_key.as_deref().filter(|k| !k.is_empty()) {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await.map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                code: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await.map_err(|e| self.transport_error(e))?;
        decode(&body)
    }

    fn transport_error(&self, err: reqwest::Error) -> FeedError {
        if err.is_timeout() {
            FeedError::Timeout(self.settings.timeout.as_secs())
        } else {
            FeedError::Transport(err.to_string())
        }
    }
}

/// Decode a whole document; individual records that don't fit become
/// `FeedRecord::Malformed` rather than failing the document
pub(crate) fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, FeedError> {
    serde_json::from_slice(body).map_err(|e| FeedError::Decode(e.to_string()))
}

#[async_trait]
impl FootballFeed for HttpFootballFeed {
    async fn standings(&self) -> Result<StandingsPayload, FeedError> {
        self.get(&self.competition_url("standings"), &[]).await
    }

    async fn matches(&self, season: i32) -> Result<MatchesPayload, FeedError> {
        self.get(
            &self.competition_url("matches"),
            &[("season", season.to_string())],
        )
        .await
    }

    async fn scorers(&self) -> Result<ScorersPayload, FeedError> {
        self.get(&self.competition_url("scorers"), &[]).await
    }

    async fn team(&self, external_id: i64) -> Result<TeamPayload, FeedError> {
        self.get(&self.team_url(external_id), &[]).await
    }
}
