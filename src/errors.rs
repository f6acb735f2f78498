//! Error types for Sold Fetcher
//!
//! This module defines the error types for every component of the crate.
//! Errors carry the location identifier and page number they relate to so a
//! failed multi-location run can be diagnosed from the message alone.

use std::path::PathBuf;

use thiserror::Error;

/// Response body decoding and validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Body is not valid JSON or does not match the expected shape
    #[error("response body does not match the expected shape: {0}")]
    Json(#[from] serde_json::Error),

    /// Date string matches neither accepted format
    #[error("time data '{value}' does not match any of the formats '%d %B %Y' or '%d %b %Y'")]
    Date { value: String },
}

/// Page fetching, retry and orchestration errors
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error
    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    /// Invalid endpoint URL
    #[error("Invalid URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },

    /// Every attempt for a page failed
    #[error(
        "Giving up on page {page} for location '{location}' after {attempts} attempts (last status: {}): {body}",
        .status.map(|s| s.to_string()).unwrap_or_else(|| "none".to_string())
    )]
    RetryExhausted {
        location: String,
        page: u32,
        attempts: u32,
        status: Option<u16>,
        body: String,
    },

    /// A page was fetched but its body failed validation
    #[error("Invalid response for page {page} of location '{location}'")]
    Validation {
        location: String,
        page: u32,
        #[source]
        source: ValidationError,
    },

    /// One location of a multi-location fetch failed, aborting the whole run
    #[error("Fetch failed for location '{location}'")]
    Location {
        location: String,
        #[source]
        source: Box<FetchError>,
    },

    /// The API's page cursor never reached its last page
    #[error("Pagination for location '{location}' did not finish within {pages} pages")]
    PaginationOverrun { location: String, pages: u32 },

    /// A per-location task panicked
    #[error("Fetch task panicked: {reason}")]
    TaskPanic { reason: String },

    /// Invalid runtime configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl FetchError {
    /// Wrap this error with the location whose fetch it aborted
    pub fn for_location(self, location: impl Into<String>) -> Self {
        match self {
            already @ FetchError::Location { .. } => already,
            other => FetchError::Location {
                location: location.into(),
                source: Box::new(other),
            },
        }
    }

    /// Innermost error, looking through location wrappers
    pub fn root(&self) -> &FetchError {
        match self {
            FetchError::Location { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Invalid configuration format
    #[error("Invalid configuration format")]
    InvalidFormat(#[from] toml::de::Error),

    /// Configuration could not be serialized
    #[error("Failed to serialize configuration")]
    Serialize(#[from] toml::ser::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// I/O error reading or writing a configuration file
    #[error("Configuration file I/O error")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub(crate) fn invalid(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Fetch error
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Output serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Check if re-running the same operation could plausibly succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Fetch(fetch) => matches!(
                fetch.root(),
                FetchError::Http(_) | FetchError::RetryExhausted { .. }
            ),
            _ => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Fetch(fetch) => match fetch.root() {
                FetchError::Validation { .. } => "validation",
                FetchError::Configuration(_) => "config",
                _ => "fetch",
            },
            AppError::Config(_) => "config",
            AppError::Json(_) => "output",
            AppError::Io(_) => "io",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Fetch result type alias
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Validation result type alias
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
