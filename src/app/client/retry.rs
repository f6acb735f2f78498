//! Bounded retry with exponential backoff for single page requests
//!
//! A page request is attempted up to `max_attempts` times. Every failed
//! attempt (non-200 status or transport failure) is followed by a backoff
//! sleep of `initial_backoff * multiplier^(n-1)` for the n-th failure, giving
//! 1, 2, 4, 8 and 16 seconds with the defaults. Once the ceiling is reached the
//! last status and body are returned in `FetchError::RetryExhausted`.
//!
//! The attempt counter lives inside a single call, so every page starts with a
//! fresh budget.

use std::sync::Arc;
use std::time::Duration;

use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::app::client::http::PageTransport;
use crate::app::client::pacing::Sleeper;
use crate::app::query::SearchQuery;
use crate::constants::retry;
use crate::errors::{FetchError, FetchResult};

/// Configuration for per-page retries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Attempts per page before giving up (including the first)
    pub max_attempts: u32,
    /// Backoff after the first failure
    pub initial_backoff: Duration,
    /// Growth factor between consecutive backoffs
    pub backoff_multiplier: f64,
    /// Upper bound on any single backoff
    pub max_backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: retry::MAX_ATTEMPTS,
            initial_backoff: retry::INITIAL_BACKOFF,
            backoff_multiplier: retry::BACKOFF_MULTIPLIER,
            max_backoff: Duration::from_secs(300),
        }
    }
}

impl RetryConfig {
    /// Validate configuration values
    pub fn validate(&self) -> FetchResult<()> {
        if self.max_attempts == 0 {
            return Err(FetchError::Configuration(
                "Retry max_attempts must be at least 1".to_string(),
            ));
        }

        if !self.backoff_multiplier.is_finite() || self.backoff_multiplier < 1.0 {
            return Err(FetchError::Configuration(format!(
                "Backoff multiplier ({}) must be a finite number >= 1.0",
                self.backoff_multiplier
            )));
        }

        if self.initial_backoff > self.max_backoff {
            return Err(FetchError::Configuration(
                "Initial backoff must not exceed max backoff".to_string(),
            ));
        }

        Ok(())
    }

    /// Sum of all backoff sleeps a page can incur before giving up
    pub fn worst_case_backoff(&self) -> Duration {
        let mut schedule = self.schedule();
        (0..self.max_attempts)
            .map(|_| schedule.next_backoff().unwrap_or(self.max_backoff))
            .sum()
    }

    /// Deterministic exponential schedule; no randomization, no elapsed-time cutoff
    fn schedule(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            current_interval: self.initial_backoff,
            initial_interval: self.initial_backoff,
            randomization_factor: 0.0,
            multiplier: self.backoff_multiplier,
            max_interval: self.max_backoff,
            max_elapsed_time: None,
            ..ExponentialBackoff::default()
        }
    }
}

/// Wraps a single page request with bounded retry and backoff
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
    sleeper: Arc<dyn Sleeper>,
}

impl RetryPolicy {
    /// Create a retry policy sleeping through `sleeper`
    pub fn new(config: RetryConfig, sleeper: Arc<dyn Sleeper>) -> Self {
        Self { config, sleeper }
    }

    /// Request one page, retrying failures, and return the body of the 200 response
    ///
    /// # Errors
    ///
    /// Returns `FetchError::RetryExhausted` after `max_attempts` failed
    /// attempts. Transport errors other than `FetchError::Http` are returned
    /// immediately.
    pub async fn attempt(
        &self,
        transport: &dyn PageTransport,
        query: &SearchQuery,
        page: u32,
    ) -> FetchResult<String> {
        let mut schedule = self.config.schedule();
        let mut attempts = 0;

        loop {
            let outcome = transport.get_page(query, page).await;
            attempts += 1;

            let (status, body) = match outcome {
                Ok(raw) if raw.is_success() => return Ok(raw.body),
                Ok(raw) => {
                    warn!(
                        "Failed to fetch page {} for '{}' (attempt {}/{}): HTTP {}",
                        page, query.location, attempts, self.config.max_attempts, raw.status
                    );
                    (Some(raw.status), raw.body)
                }
                Err(FetchError::Http(e)) => {
                    warn!(
                        "Request for page {} of '{}' failed (attempt {}/{}): {}",
                        page, query.location, attempts, self.config.max_attempts, e
                    );
                    (None, e.to_string())
                }
                Err(other) => return Err(other),
            };

            let delay = schedule.next_backoff().unwrap_or(self.config.max_backoff);
            warn!("Backing off for {}ms", delay.as_millis());
            self.sleeper.sleep(delay).await;

            if attempts >= self.config.max_attempts {
                error!(
                    "Giving up on page {} for '{}' after {} attempts",
                    page, query.location, attempts
                );
                return Err(FetchError::RetryExhausted {
                    location: query.location.clone(),
                    page,
                    attempts,
                    status,
                    body,
                });
            }
        }
    }

    /// Retry configuration in use
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }
}
