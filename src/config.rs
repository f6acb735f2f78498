//! Configuration management for Sold Fetcher
//!
//! This module provides file-based configuration with zero-config defaults.
//! Every field of the TOML file is optional; anything left out falls back to
//! the built-in default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::app::{ClientConfig, CoordinatorConfig, PacingConfig, QueryDefaults, RetryConfig};
use crate::constants::{api, http, logging, pacing, query, retry, workers};
use crate::errors::{ConfigError, ConfigResult, FetchError};

/// Name of the project-local configuration file
pub const LOCAL_CONFIG_FILE: &str = "sold-fetcher.toml";

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP client settings
    pub client: ClientConfigToml,
    /// Delay before each page request
    pub pacing: PacingConfigToml,
    /// Per-page retry settings
    pub retry: RetryConfigToml,
    /// Multi-location coordination settings
    pub coordinator: CoordinatorConfigToml,
    /// Default search window
    pub query: QueryDefaults,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// TOML-friendly client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfigToml {
    /// Sold-properties endpoint
    pub endpoint: String,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// User agent sent with every request
    pub user_agent: String,
    /// Global rate limit in requests per second (0 = disabled)
    pub rate_limit_rps: u32,
}

impl Default for ClientConfigToml {
    fn default() -> Self {
        Self {
            endpoint: api::SOLD_PROPERTIES_URL.to_string(),
            request_timeout_secs: http::DEFAULT_TIMEOUT.as_secs(),
            connect_timeout_secs: http::CONNECT_TIMEOUT.as_secs(),
            user_agent: http::USER_AGENT.to_string(),
            rate_limit_rps: http::DEFAULT_RATE_LIMIT_RPS,
        }
    }
}

/// TOML-friendly pacing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfigToml {
    /// Base delay before each page request in seconds
    pub base_delay_secs: f64,
    /// Maximum deviation from the base delay in seconds
    pub jitter_secs: f64,
}

impl Default for PacingConfigToml {
    fn default() -> Self {
        Self {
            base_delay_secs: pacing::DEFAULT_BASE_DELAY.as_secs_f64(),
            jitter_secs: pacing::DEFAULT_JITTER.as_secs_f64(),
        }
    }
}

/// TOML-friendly retry configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfigToml {
    /// Attempts per page before giving up
    pub max_attempts: u32,
    /// Backoff after the first failure in milliseconds
    pub initial_backoff_ms: u64,
    /// Growth factor between consecutive backoffs
    pub backoff_multiplier: f64,
    /// Upper bound on a single backoff in seconds
    pub max_backoff_secs: u64,
}

impl Default for RetryConfigToml {
    fn default() -> Self {
        let defaults = RetryConfig::default();
        Self {
            max_attempts: retry::MAX_ATTEMPTS,
            initial_backoff_ms: retry::INITIAL_BACKOFF.as_millis() as u64,
            backoff_multiplier: retry::BACKOFF_MULTIPLIER,
            max_backoff_secs: defaults.max_backoff.as_secs(),
        }
    }
}

/// TOML-friendly coordinator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfigToml {
    /// Maximum number of locations fetched at the same time
    pub concurrency_limit: usize,
    /// Progress channel capacity
    pub progress_buffer_size: usize,
}

impl Default for CoordinatorConfigToml {
    fn default() -> Self {
        Self {
            concurrency_limit: workers::DEFAULT_CONCURRENCY,
            progress_buffer_size: workers::PROGRESS_CHANNEL_SIZE,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level used when no verbosity flag is given
    pub level: String,
    /// Enable colored output
    pub colored_output: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: logging::DEFAULT_LOG_LEVEL.to_string(),
            colored_output: true,
        }
    }
}

/// Validated runtime configuration derived from an [`AppConfig`]
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub client: ClientConfig,
    pub pacing: PacingConfig,
    pub retry: RetryConfig,
    pub coordinator: CoordinatorConfig,
    pub query: QueryDefaults,
}

impl AppConfig {
    /// Convert TOML-friendly configuration to validated runtime configuration
    pub fn to_runtime_config(&self) -> ConfigResult<RuntimeConfig> {
        let runtime = RuntimeConfig {
            client: self.client.to_runtime_config(),
            pacing: self.pacing.to_runtime_config()?,
            retry: self.retry.to_runtime_config(),
            coordinator: self.coordinator.to_runtime_config(),
            query: self.query,
        };

        runtime.client.validate().map_err(|e| fetch_config_error("client", e))?;
        runtime.retry.validate().map_err(|e| fetch_config_error("retry", e))?;
        runtime.coordinator.validate().map_err(|reason| {
            ConfigError::invalid(
                "coordinator.concurrency_limit",
                runtime.coordinator.concurrency_limit,
                reason,
            )
        })?;
        runtime.query.validate()?;

        Ok(runtime)
    }

    /// Load configuration with precedence:
    /// 1. Explicit config file (must exist)
    /// 2. `./sold-fetcher.toml`
    /// 3. User config directory
    /// 4. Default values
    pub async fn load(config_file_override: Option<PathBuf>) -> ConfigResult<Self> {
        let config_path = match config_file_override {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound { path });
                }
                Some(path)
            }
            None => Self::find_config_file(),
        };

        match config_path {
            Some(path) => Self::load_from_file(&path).await,
            None => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(".").join(LOCAL_CONFIG_FILE)];
        if let Some(path) = Self::default_config_path() {
            search_paths.push(path);
        }

        for path in search_paths {
            if path.exists() {
                debug!("Found config file: {}", path.display());
                return Some(path);
            }
        }

        None
    }

    /// Default config file path for the current user
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sold-fetcher").join("config.toml"))
    }

    /// Load configuration from a TOML file
    pub async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: AppConfig = toml::from_str(&content)?;

        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Write the commented default configuration to `path`
    ///
    /// Refuses to overwrite an existing file unless `force` is set.
    pub async fn write_default(path: &Path, force: bool) -> ConfigResult<()> {
        if path.exists() && !force {
            return Err(ConfigError::invalid(
                "path",
                path.display(),
                "File already exists; use --force to overwrite",
            ));
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        tokio::fs::write(path, Self::generate_default_config_content()).await?;
        info!("Wrote default configuration to: {}", path.display());
        Ok(())
    }

    /// Serialize the effective configuration
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Generate default configuration content with helpful comments
    pub fn generate_default_config_content() -> String {
        format!(
            r#"# Sold Fetcher Configuration
# Every setting is optional; remove a line to fall back to its default.

[client]
# Sold-properties endpoint
endpoint = "{endpoint}"
request_timeout_secs = {request_timeout}
connect_timeout_secs = {connect_timeout}
user_agent = "{user_agent}"
# Global cap on requests per second across all locations (0 = disabled)
rate_limit_rps = {rate_limit}

[pacing]
# Each page request waits base +/- jitter seconds first
base_delay_secs = {base_delay:.1}
jitter_secs = {jitter:.1}

[retry]
# A page is attempted up to max_attempts times with exponential backoff
max_attempts = {max_attempts}
initial_backoff_ms = {initial_backoff}
backoff_multiplier = {multiplier:.1}
max_backoff_secs = {max_backoff}

[coordinator]
# Locations fetched at the same time
concurrency_limit = {concurrency}
progress_buffer_size = {progress_buffer}

[query]
# Months of sale history and search radius (radius only applies to multi-location fetches)
sold_in = {sold_in}
radius = {radius:.1}

[logging]
level = "{level}"  # error, warn, info, debug, trace
colored_output = true
"#,
            endpoint = api::SOLD_PROPERTIES_URL,
            request_timeout = http::DEFAULT_TIMEOUT.as_secs(),
            connect_timeout = http::CONNECT_TIMEOUT.as_secs(),
            user_agent = http::USER_AGENT,
            rate_limit = http::DEFAULT_RATE_LIMIT_RPS,
            base_delay = pacing::DEFAULT_BASE_DELAY.as_secs_f64(),
            jitter = pacing::DEFAULT_JITTER.as_secs_f64(),
            max_attempts = retry::MAX_ATTEMPTS,
            initial_backoff = retry::INITIAL_BACKOFF.as_millis(),
            multiplier = retry::BACKOFF_MULTIPLIER,
            max_backoff = RetryConfig::default().max_backoff.as_secs(),
            concurrency = workers::DEFAULT_CONCURRENCY,
            progress_buffer = workers::PROGRESS_CHANNEL_SIZE,
            sold_in = query::DEFAULT_SOLD_IN,
            radius = query::DEFAULT_RADIUS,
            level = logging::DEFAULT_LOG_LEVEL,
        )
    }
}

fn fetch_config_error(section: &str, error: FetchError) -> ConfigError {
    ConfigError::invalid(section, "", error.to_string())
}

impl ClientConfigToml {
    /// Convert to runtime ClientConfig
    pub fn to_runtime_config(&self) -> ClientConfig {
        ClientConfig {
            endpoint: self.endpoint.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            user_agent: self.user_agent.clone(),
            rate_limit_rps: (self.rate_limit_rps > 0).then_some(self.rate_limit_rps),
        }
    }
}

impl PacingConfigToml {
    /// Convert to runtime PacingConfig
    pub fn to_runtime_config(&self) -> ConfigResult<PacingConfig> {
        PacingConfig::from_secs_f64(self.base_delay_secs, self.jitter_secs)
    }
}

impl RetryConfigToml {
    /// Convert to runtime RetryConfig
    pub fn to_runtime_config(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.max_attempts,
            initial_backoff: Duration::from_millis(self.initial_backoff_ms),
            backoff_multiplier: self.backoff_multiplier,
            max_backoff: Duration::from_secs(self.max_backoff_secs),
        }
    }
}

impl CoordinatorConfigToml {
    /// Convert to runtime CoordinatorConfig
    pub fn to_runtime_config(&self) -> CoordinatorConfig {
        CoordinatorConfig {
            concurrency_limit: self.concurrency_limit,
            progress_buffer_size: self.progress_buffer_size,
        }
    }
}
