//! Configuration for the multi-location coordinator

use serde::{Deserialize, Serialize};

use crate::constants::workers;

/// Configuration for concurrent multi-location fetches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Maximum number of locations fetched at the same time
    pub concurrency_limit: usize,
    /// Capacity of the progress channel handed out to callers
    pub progress_buffer_size: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: workers::DEFAULT_CONCURRENCY,
            progress_buffer_size: workers::PROGRESS_CHANNEL_SIZE,
        }
    }
}

impl CoordinatorConfig {
    /// Set the number of locations fetched at the same time
    pub fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.concurrency_limit = limit;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.concurrency_limit == 0 {
            return Err("Concurrency limit must be at least 1".to_string());
        }

        if self.concurrency_limit > workers::MAX_CONCURRENCY {
            return Err(format!(
                "Concurrency limit ({}) exceeds maximum ({})",
                self.concurrency_limit,
                workers::MAX_CONCURRENCY
            ));
        }

        if self.progress_buffer_size == 0 {
            return Err("Progress buffer size cannot be zero".to_string());
        }

        Ok(())
    }
}
