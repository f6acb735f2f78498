//! Paginated fetching of every page of one query
//!
//! Pages are requested in order starting at 1. Each request is preceded by the
//! jittered pacing delay and wrapped in the retry policy; each 200 body is
//! validated in full before its properties are kept. The loop stops once the
//! page's `pagination.current` reaches `pagination.last`.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::app::client::http::PageTransport;
use crate::app::client::pacing::{RateLimiter, Sleeper};
use crate::app::client::retry::RetryPolicy;
use crate::app::coordinator::progress::FetchProgress;
use crate::app::models::{Property, SoldPropertiesResponse};
use crate::app::query::SearchQuery;
use crate::constants::api;
use crate::errors::{FetchError, FetchResult};

/// Upper bound on pages per query, in case the API's cursor never reaches `last`
const MAX_PAGES: u32 = 10_000;

/// Drives the retry policy across all pages of a query
#[derive(Debug, Clone)]
pub struct PaginatedFetcher {
    transport: Arc<dyn PageTransport>,
    rate_limiter: RateLimiter,
    retry: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
    progress_tx: Option<mpsc::Sender<FetchProgress>>,
}

impl PaginatedFetcher {
    /// Create a fetcher over `transport`
    pub fn new(
        transport: Arc<dyn PageTransport>,
        rate_limiter: RateLimiter,
        retry: RetryPolicy,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            transport,
            rate_limiter,
            retry,
            sleeper,
            progress_tx: None,
        }
    }

    /// Report each fetched page on `progress_tx`
    pub fn with_progress(mut self, progress_tx: mpsc::Sender<FetchProgress>) -> Self {
        self.progress_tx = Some(progress_tx);
        self
    }

    /// Fetch every page of `query` and return the properties in page order
    ///
    /// # Errors
    ///
    /// Returns the first fatal error unchanged: `FetchError::RetryExhausted`
    /// when a page cannot be fetched, `FetchError::Validation` when a page body
    /// is malformed. Properties from earlier pages are discarded.
    pub async fn fetch_all(&self, query: &SearchQuery) -> FetchResult<Vec<Property>> {
        let mut properties = Vec::new();
        let mut page = api::FIRST_PAGE;

        loop {
            self.rate_limiter.pause(self.sleeper.as_ref()).await;

            debug!("Requesting page {} for '{}'", page, query.location);
            let body = self
                .retry
                .attempt(self.transport.as_ref(), query, page)
                .await?;

            let response =
                SoldPropertiesResponse::parse(&body).map_err(|source| FetchError::Validation {
                    location: query.location.clone(),
                    page,
                    source,
                })?;

            let pagination = response.pagination;
            let fetched = response.properties.len();
            info!(
                "Fetched page {} out of {} for '{}' ({} properties)",
                page, pagination.last, query.location, fetched
            );
            properties.extend(response.properties);

            if let Some(tx) = &self.progress_tx {
                let _ = tx
                    .send(FetchProgress::PageFetched {
                        location: query.location.clone(),
                        page,
                        last: pagination.last,
                        properties: fetched,
                    })
                    .await;
            }

            if !pagination.has_next_page() {
                break;
            }

            if page >= MAX_PAGES {
                return Err(FetchError::PaginationOverrun {
                    location: query.location.clone(),
                    pages: MAX_PAGES,
                });
            }
            page += 1;
        }

        debug!(
            "Finished '{}' after {} pages with {} properties",
            query.location,
            page,
            properties.len()
        );
        Ok(properties)
    }
}
