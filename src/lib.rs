//! Sold Fetcher Library
//!
//! A Rust library for fetching sold-property records from a paginated
//! real-estate API. Provides paced, retried page requests and concurrent
//! multi-location fetching with results returned in input order.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};

#[cfg(test)]
mod tests {
    use super::*;
    use constants::*;

    #[test]
    fn test_constants_accessible() {
        assert_eq!(DEFAULT_CONCURRENCY, 8);
        assert_eq!(MAX_ATTEMPTS, 5);
        assert_eq!(DEFAULT_SOLD_IN, 20);
        assert!(USER_AGENT.contains("Sold-Fetcher"));
    }

    #[test]
    fn test_error_types() {
        let config_error = errors::ConfigError::invalid("query.radius", -1.0, "negative");
        let app_error = AppError::Config(config_error);

        assert_eq!(app_error.category(), "config");
        assert!(!app_error.is_recoverable());
    }
}
