//! Centralized server configuration.
//!
//! Loaded via the `config` crate from environment variables. Nested keys
//! use a double underscore, e.g. `RATE_LIMIT__MAX_REQUESTS` or
//! `LLM__API_KEY`.

use medtrain_ai::YandexGptConfig;
use medtrain_training::TrainingConfig;
use serde::Deserialize;
use std::path::PathBuf;

/// Server configuration composed from library configs.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// PostgreSQL connection URL. Without one, dialogs live in memory.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Schema holding the training tables.
    #[serde(default = "default_database_schema")]
    pub database_schema: String,

    /// JSON file with scenario definitions to load at startup.
    #[serde(default)]
    pub scenarios_file: Option<PathBuf>,

    #[serde(default)]
    pub rate_limit: RateLimitSettings,

    #[serde(default)]
    pub llm: YandexGptConfig,

    #[serde(default)]
    pub training: TrainingConfig,
}

/// Request admission settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitSettings {
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    #[serde(default = "default_window_seconds")]
    pub window_seconds: u32,

    /// Interval between sweeps of idle clients, in seconds.
    #[serde(default = "default_purge_interval_seconds")]
    pub purge_interval_seconds: u64,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_database_schema() -> String {
    "public".to_string()
}

fn default_max_requests() -> u32 {
    20
}

fn default_window_seconds() -> u32 {
    60
}

fn default_purge_interval_seconds() -> u64 {
    300
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_seconds: default_window_seconds(),
            purge_interval_seconds: default_purge_interval_seconds(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration values cannot be parsed or are out
    /// of range.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_source(
            config::Environment::default()
                .separator("__")
                .try_parsing(true),
        )
    }

    fn from_source(
        source: impl config::Source + Send + Sync + 'static,
    ) -> Result<Self, config::ConfigError> {
        let config: Self = config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()?;
        config.rate_limit.validate()?;
        Ok(config)
    }
}

impl RateLimitSettings {
    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.purge_interval_seconds == 0 {
            return Err(config::ConfigError::Message(
                "rate_limit.purge_interval_seconds must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
