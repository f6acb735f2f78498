//! Sold-properties API client
//!
//! This module wires the request pipeline together: a [`PageTransport`] issues
//! single requests, the [`RateLimiter`] paces them, the [`RetryPolicy`] retries
//! failures, and the paginated fetcher and coordinator walk pages and
//! locations.
//!
//! The module is organized into specialized components:
//! - `config`: HTTP client configuration and building
//! - `http`: Single page requests over reqwest
//! - `pacing`: Jittered pre-request delays
//! - `retry`: Bounded retry with exponential backoff

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::info;

use crate::app::coordinator::{Coordinator, CoordinatorConfig, FetchProgress};
use crate::app::fetcher::PaginatedFetcher;
use crate::app::models::Property;
use crate::app::query::SearchQuery;
use crate::errors::{FetchError, FetchResult};

pub mod config;
pub mod http;
pub mod pacing;
pub mod retry;

pub use config::ClientConfig;
pub use http::{HttpTransport, PageTransport, RawPage};
pub use pacing::{PacingConfig, RateLimiter, Sleeper, TokioSleeper};
pub use retry::{RetryConfig, RetryPolicy};

/// Client for fetching sold-property records for one or many locations
#[derive(Debug, Clone)]
pub struct SoldPropertiesClient {
    fetcher: PaginatedFetcher,
    coordinator: Coordinator,
}

impl SoldPropertiesClient {
    /// Creates a client talking to the configured HTTP endpoint
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if any configuration is invalid or the HTTP
    /// client cannot be built
    pub fn new(
        client_config: ClientConfig,
        pacing: PacingConfig,
        retry: RetryConfig,
        coordinator: CoordinatorConfig,
    ) -> FetchResult<Self> {
        client_config.validate()?;
        let transport = Arc::new(HttpTransport::new(&client_config)?);

        info!(
            "Created sold-properties client for {} ({} locations at a time)",
            transport.endpoint(),
            coordinator.concurrency_limit
        );

        Self::with_transport(transport, Arc::new(TokioSleeper), pacing, retry, coordinator)
    }

    /// Creates a client over an arbitrary transport and sleeper
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Configuration` if the retry or coordinator
    /// configuration is invalid
    pub fn with_transport(
        transport: Arc<dyn PageTransport>,
        sleeper: Arc<dyn Sleeper>,
        pacing: PacingConfig,
        retry: RetryConfig,
        coordinator: CoordinatorConfig,
    ) -> FetchResult<Self> {
        retry.validate()?;
        coordinator.validate().map_err(FetchError::Configuration)?;

        let fetcher = PaginatedFetcher::new(
            transport,
            RateLimiter::new(pacing),
            RetryPolicy::new(retry, sleeper.clone()),
            sleeper,
        );
        let coordinator = Coordinator::new(coordinator, fetcher.clone());

        Ok(Self {
            fetcher,
            coordinator,
        })
    }

    /// Report progress for every fetch made through this client
    pub fn with_progress(self, progress_tx: mpsc::Sender<FetchProgress>) -> Self {
        Self {
            fetcher: self.fetcher.with_progress(progress_tx.clone()),
            coordinator: self.coordinator.with_progress(progress_tx),
        }
    }

    /// Fetch all pages for a single location, without a search radius
    ///
    /// # Errors
    ///
    /// Returns the fetch error unchanged: `FetchError::RetryExhausted` or
    /// `FetchError::Validation`
    pub async fn fetch_location(
        &self,
        location: &str,
        sold_in: u32,
    ) -> FetchResult<Vec<Property>> {
        self.fetch_query(&SearchQuery::single(location, sold_in))
            .await
    }

    /// Fetch all pages of an arbitrary query
    pub async fn fetch_query(&self, query: &SearchQuery) -> FetchResult<Vec<Property>> {
        self.fetcher.fetch_all(query).await
    }

    /// Fetch many locations concurrently and concatenate them in input order
    ///
    /// # Errors
    ///
    /// Returns the first location failure wrapped in `FetchError::Location`
    pub async fn fetch_for_identifiers(
        &self,
        identifiers: &[String],
        sold_in: u32,
        radius: f64,
    ) -> FetchResult<Vec<Property>> {
        self.coordinator
            .fetch_for_identifiers(identifiers, sold_in, radius)
            .await
    }

    /// Coordinator configuration in use
    pub fn coordinator_config(&self) -> &CoordinatorConfig {
        self.coordinator.config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::{RecordingSleeper, ScriptedTransport};

    fn client(transport: &Arc<ScriptedTransport>) -> SoldPropertiesClient {
        SoldPropertiesClient::with_transport(
            transport.clone(),
            Arc::new(RecordingSleeper::default()),
            PacingConfig::default(),
            RetryConfig::default(),
            CoordinatorConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_client_creation() {
        let result = SoldPropertiesClient::new(
            ClientConfig::default(),
            PacingConfig::default(),
            RetryConfig::default(),
            CoordinatorConfig::default(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_invalid_concurrency_rejected() {
        let transport = Arc::new(ScriptedTransport::new());
        let result = SoldPropertiesClient::with_transport(
            transport,
            Arc::new(RecordingSleeper::default()),
            PacingConfig::default(),
            RetryConfig::default(),
            CoordinatorConfig::default().with_concurrency_limit(0),
        );
        assert!(matches!(result, Err(FetchError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_fetch_location_sends_no_radius() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_page("AB1 2CD", 1, 1, &["1 High Street"]);

        let properties = client(&transport)
            .fetch_location("AB1 2CD", 20)
            .await
            .unwrap();

        assert_eq!(properties.len(), 1);
        let records = transport.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].query.radius, None);
        assert_eq!(records[0].query.sold_in, 20);
    }

    #[tokio::test]
    async fn test_single_location_error_is_unwrapped() {
        let transport = Arc::new(ScriptedTransport::new());
        for _ in 0..5 {
            transport.push("X", 1, RawPage::new(429, "rate limited"));
        }

        let error = client(&transport).fetch_location("X", 20).await.unwrap_err();
        assert!(matches!(
            error,
            FetchError::RetryExhausted {
                status: Some(429),
                ..
            }
        ));
    }
}
