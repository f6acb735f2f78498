//! Concurrent multi-location fetch orchestration
//!
//! The coordinator runs one paginated fetch per location identifier, with at
//! most `concurrency_limit` locations in flight. Results are collected by
//! input position, so the combined list lists every property of the first
//! identifier before any of the second, regardless of which finished first.
//!
//! The first failing location aborts the whole run: sibling tasks are
//! cancelled and no partial results are returned.
//!
//! - [`config`] - Concurrency settings and validation
//! - [`progress`] - Progress events and running totals

pub mod config;
pub mod progress;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::app::fetcher::PaginatedFetcher;
use crate::app::models::Property;
use crate::app::query::SearchQuery;
use crate::errors::{FetchError, FetchResult};

pub use config::CoordinatorConfig;
pub use progress::{FetchProgress, FetchStats};

/// Fans a query out over many locations and joins the results in input order
#[derive(Debug, Clone)]
pub struct Coordinator {
    config: CoordinatorConfig,
    fetcher: PaginatedFetcher,
    progress_tx: Option<mpsc::Sender<FetchProgress>>,
}

impl Coordinator {
    /// Create a coordinator running `fetcher` once per location
    pub fn new(config: CoordinatorConfig, fetcher: PaginatedFetcher) -> Self {
        Self {
            config,
            fetcher,
            progress_tx: None,
        }
    }

    /// Report page and location progress on `progress_tx`
    pub fn with_progress(mut self, progress_tx: mpsc::Sender<FetchProgress>) -> Self {
        self.fetcher = self.fetcher.with_progress(progress_tx.clone());
        self.progress_tx = Some(progress_tx);
        self
    }

    /// Coordinator configuration in use
    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Fetch every location with the same `sold_in` and `radius`
    ///
    /// Returns the concatenation of each location's properties, ordered by
    /// the position of the location in `identifiers`. An empty input returns
    /// an empty list without any request.
    ///
    /// # Errors
    ///
    /// Returns the first location failure wrapped in `FetchError::Location`.
    /// Remaining tasks are aborted and their results discarded.
    pub async fn fetch_for_identifiers(
        &self,
        identifiers: &[String],
        sold_in: u32,
        radius: f64,
    ) -> FetchResult<Vec<Property>> {
        if identifiers.is_empty() {
            return Ok(Vec::new());
        }

        let limit = self.config.concurrency_limit.max(1);
        info!(
            "Fetching {} locations with up to {} in flight",
            identifiers.len(),
            limit
        );

        let permits = Arc::new(Semaphore::new(limit));
        let mut tasks = JoinSet::new();

        for (index, location) in identifiers.iter().enumerate() {
            let fetcher = self.fetcher.clone();
            let permits = permits.clone();
            let query = SearchQuery::with_radius(location.clone(), sold_in, radius);

            tasks.spawn(async move {
                // The semaphore is never closed, so acquiring only waits
                let result = match permits.acquire_owned().await {
                    Ok(_permit) => fetcher.fetch_all(&query).await,
                    Err(closed) => Err(FetchError::TaskPanic {
                        reason: closed.to_string(),
                    }),
                };
                (index, result)
            });
        }

        let mut slots: Vec<Option<Vec<Property>>> = vec![None; identifiers.len()];

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Ok(properties))) => {
                    let location = &identifiers[index];
                    debug!(
                        "Location '{}' finished with {} properties",
                        location,
                        properties.len()
                    );
                    self.report(FetchProgress::LocationCompleted {
                        location: location.clone(),
                        properties: properties.len(),
                    })
                    .await;
                    slots[index] = Some(properties);
                }
                Ok((index, Err(e))) => {
                    tasks.abort_all();
                    let location = &identifiers[index];
                    error!("Location '{}' failed, aborting run: {}", location, e);
                    self.report(FetchProgress::LocationFailed {
                        location: location.clone(),
                        error: e.to_string(),
                    })
                    .await;
                    return Err(e.for_location(location.clone()));
                }
                Err(join_error) => {
                    tasks.abort_all();
                    error!("Fetch task did not complete: {}", join_error);
                    return Err(FetchError::TaskPanic {
                        reason: join_error.to_string(),
                    });
                }
            }
        }

        let properties: Vec<Property> = slots.into_iter().flatten().flatten().collect();
        info!(
            "Fetched {} properties across {} locations",
            properties.len(),
            identifiers.len()
        );
        Ok(properties)
    }

    async fn report(&self, event: FetchProgress) {
        if let Some(tx) = &self.progress_tx {
            let _ = tx.send(event).await;
        }
    }
}
