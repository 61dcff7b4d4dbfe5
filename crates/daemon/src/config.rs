//! Daemon configuration
//!
//! Layered: built-in defaults, then an optional TOML file (`matchday.toml`,
//! or the path in `MATCHDAY_CONFIG`), then `MATCHDAY_*` environment variables
//! using `__` between sections (`MATCHDAY_FEED__API_KEY`).

use std::path::Path;
use std::time::Duration;

use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

use matchday_api_rpc::RpcServerConfig;
use matchday_core::application::{ScheduleSettings, SyncSettings};
use matchday_infra_feed::{FeedSettings, DEFAULT_BASE_URL, DEFAULT_COMPETITION};

pub const CONFIG_PATH_ENV: &str = "MATCHDAY_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "matchday.toml";
const ENV_PREFIX: &str = "MATCHDAY";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub feed: FeedConfig,
    pub schedule: ScheduleConfig,
    pub rpc: RpcConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file; `~` is expanded, `:memory:` keeps everything in process
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    pub competition: String,
    pub timeout_secs: u64,
    pub squad_delay_ms: u64,
    /// Fixtures season start year; derived from today when unset
    #[serde(default)]
    pub season: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    pub sync_interval_secs: u64,
    pub prediction_offset_secs: u64,
    pub sync_on_start: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `pretty` or `json`
    pub format: String,
    /// Daily-rolling log files are written here when set
    #[serde(default)]
    pub directory: Option<String>,
}

impl AppConfig {
    /// Load from the default file location and the environment
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(Path::new(&expand(&path)))
    }

    /// Load from a specific (optional) file and the environment
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        defaults()?
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Database file path with `~` expanded
    pub fn database_path(&self) -> String {
        expand(&self.database.path)
    }

    /// Log directory with `~` expanded
    pub fn log_directory(&self) -> Option<String> {
        self.logging.directory.as_deref().map(expand)
    }

    pub fn feed_settings(&self) -> FeedSettings {
        FeedSettings {
            base_url: self.feed.base_url.trim_end_matches('/').to_string(),
            api_key: self.feed.api_key.clone().filter(|key| !key.is_empty()),
            competition: self.feed.competition.clone(),
            timeout: Duration::from_secs(self.feed.timeout_secs),
        }
    }

    pub fn sync_settings(&self) -> SyncSettings {
        SyncSettings {
            squad_delay: Duration::from_millis(self.feed.squad_delay_ms),
            season_override: self.feed.season,
        }
    }

    pub fn schedule_settings(&self) -> ScheduleSettings {
        ScheduleSettings {
            sync_interval: Duration::from_secs(self.schedule.sync_interval_secs),
            prediction_offset: Duration::from_secs(self.schedule.prediction_offset_secs),
            sync_on_start: self.schedule.sync_on_start,
        }
    }

    pub fn rpc_config(&self) -> RpcServerConfig {
        RpcServerConfig {
            host: self.rpc.host.clone(),
            port: self.rpc.port,
        }
    }

    /// Checks the loaded values beyond what deserialization catches
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.schedule.sync_interval_secs == 0 {
            return Err(ConfigError::Message(
                "schedule.sync_interval_secs must be positive".to_string(),
            ));
        }
        if self.schedule.prediction_offset_secs >= self.schedule.sync_interval_secs {
            return Err(ConfigError::Message(
                "schedule.prediction_offset_secs must be shorter than the sync interval".to_string(),
            ));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::Message(format!(
                "logging.format must be 'pretty' or 'json', got '{}'",
                self.logging.format
            )));
        }
        Ok(())
    }
}

fn defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError> {
    let schedule = ScheduleSettings::default();
    let rpc = RpcServerConfig::default();

    Config::builder()
        .set_default("database.path", "~/.matchday/matchday.db")?
        .set_default("feed.base_url", DEFAULT_BASE_URL)?
        .set_default("feed.competition", DEFAULT_COMPETITION)?
        .set_default("feed.timeout_secs", 10)?
        .set_default("feed.squad_delay_ms", 200)?
        .set_default("schedule.sync_interval_secs", schedule.sync_interval.as_secs())?
        .set_default("schedule.prediction_offset_secs", schedule.prediction_offset.as_secs())?
        .set_default("schedule.sync_on_start", schedule.sync_on_start)?
        .set_default("rpc.host", rpc.host)?
        .set_default("rpc.port", rpc.port)?
        .set_default("logging.format", "pretty")
}

fn expand(path: &str) -> String {
    shellexpand::tilde(path).into_owned()
}
