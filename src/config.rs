use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

// Default configuration constants
pub const DEFAULT_API_BASE_URL: &str = "https://slack.com/api";
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_MAX_IDLE_PER_HOST: i32 = 10;
const DEFAULT_POOL_IDLE_TIMEOUT_SECONDS: u64 = 90;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub slack: SlackConfig,
    pub connection: ConnectionConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SlackConfig {
    pub bot_token: String,
    pub api_base_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConnectionConfig {
    pub timeout_seconds: u64,
    pub max_idle_per_host: i32,
    pub pool_idle_timeout_seconds: u64,
}

impl Config {
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut settings = config::Config::builder();

        // Default values
        settings = settings
            .set_default("slack.api_base_url", DEFAULT_API_BASE_URL)?
            .set_default("connection.timeout_seconds", DEFAULT_TIMEOUT_SECONDS)?
            .set_default("connection.max_idle_per_host", DEFAULT_MAX_IDLE_PER_HOST)?
            .set_default(
                "connection.pool_idle_timeout_seconds",
                DEFAULT_POOL_IDLE_TIMEOUT_SECONDS,
            )?;

        // Load from config file if provided
        if let Some(path) = config_path
            && Path::new(path).exists()
        {
            settings = settings.add_source(config::File::with_name(path));
        }

        // Override with environment variables
        settings = settings.add_source(
            config::Environment::with_prefix("SLACK")
                .prefix_separator("_")
                .separator("__"),
        );

        if let Ok(token) = std::env::var("SLACK_BOT_TOKEN") {
            settings = settings.set_override("slack.bot_token", token)?;
        }

        let settings = settings.build()?;
        if settings.get_string("slack.bot_token").is_err() {
            return Err(anyhow::anyhow!(
                "SLACK_BOT_TOKEN is required (environment or [slack] bot_token in the config file)"
            ));
        }

        let config = settings.try_deserialize()?;
        Ok(config)
    }

    /// Configuration pointing at an arbitrary API root, used by tests against a mock server
    pub fn with_token(bot_token: impl Into<String>, api_base_url: impl Into<String>) -> Self {
        Self {
            slack: SlackConfig {
                bot_token: bot_token.into(),
                api_base_url: api_base_url.into(),
            },
            connection: ConnectionConfig {
                timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
                max_idle_per_host: DEFAULT_MAX_IDLE_PER_HOST,
                pool_idle_timeout_seconds: DEFAULT_POOL_IDLE_TIMEOUT_SECONDS,
            },
        }
    }
}
