use serde::Deserialize;
use std::env;
use std::sync::OnceLock;
use thiserror::Error;

/// Default bind port when `SERVER_PORT` is not set.
pub const DEFAULT_SERVER_PORT: u16 = 7860;
/// Default per-chunk token budget (1 token ≈ 4 characters).
pub const DEFAULT_CHUNK_MAX_TOKENS: usize = 1500;
/// Default number of requests allowed per client within the window.
pub const DEFAULT_RATE_LIMIT_MAX_REQUESTS: usize = 5;
/// Default rate-limit window in seconds.
pub const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 60;
/// Default timeout applied to each outbound completion call, in seconds.
pub const DEFAULT_COMPLETION_TIMEOUT_SECS: u64 = 120;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_SUMMARIZATION_MODEL: &str = "gpt-5-nano";

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the lexsum gateway.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// API key for the completion provider.
    pub openai_api_key: String,
    /// Base URL of the completion provider's API.
    pub openai_base_url: String,
    /// Model identifier used for summarization.
    pub summarization_model: String,
    /// Token budget per chunk fed to the summarizer.
    pub chunk_max_tokens: usize,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
    /// Requests allowed per client within the rate-limit window.
    pub rate_limit_max_requests: usize,
    /// Length of the rate-limit window in seconds.
    pub rate_limit_window_secs: u64,
    /// Timeout for each outbound completion call in seconds.
    pub completion_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            openai_api_key: load_env("OPENAI_API_KEY")?,
            openai_base_url: load_env_optional("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            summarization_model: load_env_optional("SUMMARIZATION_MODEL")
                .unwrap_or_else(|| DEFAULT_SUMMARIZATION_MODEL.to_string()),
            chunk_max_tokens: parse_optional("CHUNK_MAX_TOKENS")?
                .unwrap_or(DEFAULT_CHUNK_MAX_TOKENS),
            server_port: parse_optional("SERVER_PORT")?,
            rate_limit_max_requests: parse_optional("RATE_LIMIT_MAX_REQUESTS")?
                .unwrap_or(DEFAULT_RATE_LIMIT_MAX_REQUESTS),
            rate_limit_window_secs: parse_optional("RATE_LIMIT_WINDOW_SECS")?
                .unwrap_or(DEFAULT_RATE_LIMIT_WINDOW_SECS),
            completion_timeout_secs: parse_optional("COMPLETION_TIMEOUT_SECS")?
                .unwrap_or(DEFAULT_COMPLETION_TIMEOUT_SECS),
        })
    }
}

fn load_env(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingVariable(key.to_string()))
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_optional<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    load_env_optional(key)
        .map(|value| {
            value
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load config from environment");
    tracing::debug!(
        base_url = %config.openai_base_url,
        model = %config.summarization_model,
        chunk_max_tokens = config.chunk_max_tokens,
        server_port = ?config.server_port,
        "Loaded configuration"
    );
    CONFIG.set(config).expect("Failed to set config");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_env(key: &str, value: &str) {
        // SAFETY: the test below is the only one in this binary touching the
        // process environment.
        unsafe { std::env::set_var(key, value) }
    }

    #[test]
    fn from_env_applies_defaults() {
        set_env("OPENAI_API_KEY", "sk-test");
        let config = Config::from_env().expect("config");
        assert_eq!(config.openai_base_url, DEFAULT_OPENAI_BASE_URL);
        assert_eq!(config.summarization_model, "gpt-5-nano");
        assert_eq!(config.chunk_max_tokens, DEFAULT_CHUNK_MAX_TOKENS);
        assert_eq!(config.rate_limit_max_requests, 5);
        assert_eq!(config.rate_limit_window_secs, 60);
        assert!(config.server_port.is_none());
    }
}
