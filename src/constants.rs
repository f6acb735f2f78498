//! Application constants for Sold Fetcher
//!
//! This module centralizes the constants used throughout the crate,
//! organized by functional domain.

use std::time::Duration;

/// Sold-properties API endpoint and query parameter names
pub mod api {
    /// Default sold-properties endpoint
    pub const SOLD_PROPERTIES_URL: &str = "https://www.rightmove.co.uk/house-prices/api/sold-properties";

    /// Query parameter carrying the location identifier
    pub const PARAM_LOCATION: &str = "location";

    /// Query parameter carrying the sold-in window in months
    pub const PARAM_SOLD_IN: &str = "soldIn";

    /// Query parameter carrying the search radius
    pub const PARAM_RADIUS: &str = "radius";

    /// Query parameter carrying the 1-based page number
    pub const PARAM_PAGE_NUMBER: &str = "pageNumber";

    /// Number of the first page of every query
    pub const FIRST_PAGE: u32 = 1;
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = concat!("Sold-Fetcher/", env!("CARGO_PKG_VERSION"));

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Default global request rate cap (requests per second)
    pub const DEFAULT_RATE_LIMIT_RPS: u32 = 15;

    /// HTTP status treated as success
    pub const STATUS_OK: u16 = 200;
}

/// Jittered pacing between page requests
pub mod pacing {
    use super::Duration;

    /// Base delay before each page request
    pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

    /// Maximum deviation from the base delay in either direction
    pub const DEFAULT_JITTER: Duration = Duration::from_millis(500);
}

/// Retry and backoff configuration
pub mod retry {
    use super::Duration;

    /// Attempts per page before giving up
    pub const MAX_ATTEMPTS: u32 = 5;

    /// Backoff after the first failed attempt
    pub const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

    /// Backoff growth factor between consecutive failures
    pub const BACKOFF_MULTIPLIER: f64 = 2.0;
}

/// Concurrent per-location fetch tasks
pub mod workers {
    /// Default number of locations fetched concurrently
    pub const DEFAULT_CONCURRENCY: usize = 8;

    /// Maximum recommended concurrent locations
    pub const MAX_CONCURRENCY: usize = 64;

    /// Channel buffer size for progress reporting
    pub const PROGRESS_CHANNEL_SIZE: usize = 100;
}

/// Default search window
pub mod query {
    /// Months of sale history requested
    pub const DEFAULT_SOLD_IN: u32 = 20;

    /// Search radius used in multi-location mode
    pub const DEFAULT_RADIUS: f64 = 0.5;
}

/// Logging constants
pub mod logging {
    /// Default log level
    pub const DEFAULT_LOG_LEVEL: &str = "info";
}

// Re-export commonly used constants for convenience
pub use api::SOLD_PROPERTIES_URL;
pub use http::{DEFAULT_RATE_LIMIT_RPS, USER_AGENT};
pub use query::{DEFAULT_RADIUS, DEFAULT_SOLD_IN};
pub use retry::MAX_ATTEMPTS;
pub use workers::DEFAULT_CONCURRENCY;
