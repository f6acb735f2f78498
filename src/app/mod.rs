//! Core application logic for Sold Fetcher
//!
//! This module contains the request pipeline (transport, pacing, retry), the
//! paginated fetcher, multi-location orchestration and the response models.
//!
//! # Examples
//!
//! ```rust,no_run
//! use sold_fetcher::app::{
//!     ClientConfig, CoordinatorConfig, PacingConfig, RetryConfig, SoldPropertiesClient,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SoldPropertiesClient::new(
//!     ClientConfig::default(),
//!     PacingConfig::default(),
//!     RetryConfig::default(),
//!     CoordinatorConfig::default(),
//! )?;
//!
//! let locations = vec!["AB1 2CD".to_string(), "EH1 1AA".to_string()];
//! let properties = client.fetch_for_identifiers(&locations, 20, 0.5).await?;
//! println!("Fetched {} properties", properties.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod coordinator;
pub mod dates;
pub mod fetcher;
pub mod models;
pub mod query;

#[cfg(test)]
mod test_support;

// Re-export main public API
pub use client::{
    ClientConfig, HttpTransport, PacingConfig, PageTransport, RateLimiter, RawPage, RetryConfig,
    RetryPolicy, Sleeper, SoldPropertiesClient, TokioSleeper,
};
pub use coordinator::{Coordinator, CoordinatorConfig, FetchProgress, FetchStats};
pub use dates::parse_date;
pub use fetcher::PaginatedFetcher;
pub use models::{
    Location, Pagination, Property, SearchLocation, SoldPropertiesResponse, Transaction,
};
pub use query::{QueryDefaults, SearchQuery};
