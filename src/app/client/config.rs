//! HTTP client configuration and building logic
//!
//! This module handles the configuration and construction of the reqwest
//! client used for sold-properties requests.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::constants::{api, http};
use crate::errors::{FetchError, FetchResult};

/// Configuration for the HTTP transport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Sold-properties endpoint URL
    pub endpoint: String,
    /// Request timeout
    pub request_timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// User agent sent with every request
    pub user_agent: String,
    /// Global request cap shared by all locations (requests per second)
    pub rate_limit_rps: Option<u32>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: api::SOLD_PROPERTIES_URL.to_string(),
            request_timeout: http::DEFAULT_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            user_agent: http::USER_AGENT.to_string(),
            rate_limit_rps: Some(http::DEFAULT_RATE_LIMIT_RPS),
        }
    }
}

impl ClientConfig {
    /// Builds the HTTP client with the specified configuration
    ///
    /// Idle connections are never kept, so every attempt opens a fresh
    /// connection and a faulty session cannot leak into the next retry.
    pub fn build_http_client(&self) -> FetchResult<Client> {
        Client::builder()
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(self.user_agent.as_str())
            .pool_max_idle_per_host(0)
            .build()
            .map_err(FetchError::Http)
    }

    /// Validate the configuration
    pub fn validate(&self) -> FetchResult<()> {
        if self.request_timeout.is_zero() {
            return Err(FetchError::Configuration(
                "Request timeout cannot be zero".to_string(),
            ));
        }

        if self.connect_timeout.is_zero() {
            return Err(FetchError::Configuration(
                "Connect timeout cannot be zero".to_string(),
            ));
        }

        if self.rate_limit_rps == Some(0) {
            return Err(FetchError::Configuration(
                "Rate limit must be non-zero; omit it to disable the cap".to_string(),
            ));
        }

        Ok(())
    }
}
