//! Configuration management for the bot.
//!
//! This module handles loading and validating configuration from environment variables.
//! A `.env` file in the working directory is loaded first when present.

use crate::error::{ConfigError, ConfigResult};
use std::env;

/// Default Bale bot API endpoint.
pub const DEFAULT_API_URL: &str = "https://tapi.bale.ai";

/// Configuration for the bot, built once at startup and passed down explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bot API base URL (without the `/bot<token>` suffix)
    pub api_url: String,

    /// Bot token issued by the platform
    pub bot_token: String,

    /// Chat that receives startup and failure alerts
    pub admin_chat_id: Option<i64>,

    /// HTTP request timeout in seconds (default: 30)
    pub request_timeout: u64,

    /// Long-poll timeout for getUpdates in seconds (default: 25)
    pub poll_timeout: u64,

    /// Largest accepted upload in bytes (default: 10 MiB)
    pub max_upload_bytes: u64,

    /// Log level (default: "info")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `BOT_TOKEN`: token used to authenticate against the bot API
    ///
    /// Optional environment variables:
    /// - `BOT_API_URL`: API base URL (default: https://tapi.bale.ai)
    /// - `ADMIN_CHAT_ID`: chat ID for operator alerts (ignored if not an integer)
    /// - `REQUEST_TIMEOUT`: HTTP timeout in seconds (default: 30)
    /// - `POLL_TIMEOUT`: long-poll timeout in seconds (default: 25)
    /// - `MAX_UPLOAD_BYTES`: upload size limit (default: 10485760)
    /// - `LOG_LEVEL`: Logging level (default: "info")
    pub fn from_env() -> ConfigResult<Self> {
        // Try to load .env file if it exists (but don't fail if it doesn't)
        let _ = dotenvy::dotenv();

        let bot_token =
            env::var("BOT_TOKEN").map_err(|_| ConfigError::MissingVar("BOT_TOKEN".to_string()))?;

        if bot_token.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                var: "BOT_TOKEN".to_string(),
                reason: "Cannot be empty".to_string(),
            });
        }

        let api_url = env::var("BOT_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                var: "BOT_API_URL".to_string(),
                reason: "Must start with http:// or https://".to_string(),
            });
        }

        let admin_chat_id = Self::parse_admin_chat_id();
        let request_timeout = Self::parse_env_u64("REQUEST_TIMEOUT", 30)?;
        let poll_timeout = Self::parse_env_u64("POLL_TIMEOUT", 25)?;
        let max_upload_bytes = Self::parse_env_u64("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?;

        if max_upload_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                var: "MAX_UPLOAD_BYTES".to_string(),
                reason: "Must be greater than zero".to_string(),
            });
        }

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Config {
            api_url,
            bot_token: bot_token.trim().to_string(),
            admin_chat_id,
            request_timeout,
            poll_timeout,
            max_upload_bytes,
            log_level,
        })
    }

    /// An unparsable admin ID disables alerts rather than failing startup.
    fn parse_admin_chat_id() -> Option<i64> {
        let raw = env::var("ADMIN_CHAT_ID").ok()?;
        match raw.trim().parse::<i64>() {
            Ok(id) => Some(id),
            Err(_) => {
                tracing::warn!("ADMIN_CHAT_ID is not an integer, admin alerts disabled");
                None
            }
        }
    }

    /// Parse an environment variable as u64 with a default value.
    fn parse_env_u64(var_name: &str, default: u64) -> ConfigResult<u64> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: DEFAULT_API_URL.to_string(),
            bot_token: String::new(),
            admin_chat_id: None,
            request_timeout: 30,
            poll_timeout: 25,
            max_upload_bytes: 10 * 1024 * 1024,
            log_level: "info".to_string(),
        }
    }
}
