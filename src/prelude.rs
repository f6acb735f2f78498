//! Prelude module for Sold Fetcher Library
//!
//! Re-exports the items needed for typical usage with a single
//! `use sold_fetcher::prelude::*;` statement.
//!
//! # Usage
//!
//! ```rust,no_run
//! use sold_fetcher::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let runtime = AppConfig::load(None).await?.to_runtime_config()?;
//!     let client = SoldPropertiesClient::new(
//!         runtime.client,
//!         runtime.pacing,
//!         runtime.retry,
//!         runtime.coordinator,
//!     )?;
//!
//!     let properties = client.fetch_location("AB1 2CD", runtime.query.sold_in).await?;
//!     println!("{} properties", properties.len());
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, FetchError, FetchResult, Result};

// Essential app components
pub use crate::app::{
    ClientConfig, Coordinator, CoordinatorConfig, FetchProgress, PacingConfig, Property,
    QueryDefaults, RetryConfig, SearchQuery, SoldPropertiesClient, Transaction,
};

// Configuration
pub use crate::config::{AppConfig, RuntimeConfig};

// Commonly used constants
pub use crate::constants::{DEFAULT_CONCURRENCY, DEFAULT_RADIUS, DEFAULT_SOLD_IN, USER_AGENT};

pub use std::sync::Arc;

pub use tokio;
