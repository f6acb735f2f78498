//! Progress display for fetch operations
//!
//! Consumes [`FetchProgress`] events from the client and renders a bar of
//! completed locations with indicatif. In quiet mode the events are only
//! folded into [`FetchStats`].

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::app::{FetchProgress, FetchStats};
use crate::errors::{AppError, Result};

/// Configuration for progress display
#[derive(Debug, Clone)]
pub struct ProgressConfig {
    /// Enable the visual progress bar
    pub enable_progress_bar: bool,
    /// Spinner tick interval
    pub tick_interval: Duration,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            enable_progress_bar: true,
            tick_interval: Duration::from_millis(120),
        }
    }
}

/// Renders progress of a multi-location fetch
pub struct ProgressDisplay {
    config: ProgressConfig,
    bar: Option<ProgressBar>,
}

impl ProgressDisplay {
    /// Create a display for `total_locations` locations
    pub fn new(config: ProgressConfig, total_locations: usize) -> Result<Self> {
        let bar = if config.enable_progress_bar {
            let bar = ProgressBar::new(total_locations as u64);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template(
                        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} locations {msg}",
                    )
                    .map_err(|e| AppError::generic(format!("Progress bar template error: {}", e)))?
                    .progress_chars("##-"),
            );
            bar.enable_steady_tick(config.tick_interval);
            Some(bar)
        } else {
            None
        };

        Ok(Self { config, bar })
    }

    /// Consume events until the sender side is dropped
    ///
    /// The returned handle resolves to the accumulated statistics.
    pub fn spawn(self, mut progress_rx: mpsc::Receiver<FetchProgress>) -> JoinHandle<FetchStats> {
        tokio::spawn(async move {
            let mut stats = FetchStats::default();

            while let Some(event) = progress_rx.recv().await {
                stats.record(&event);
                self.render(&event, &stats);
            }

            debug!("Progress channel closed");
            self.finish(&stats);
            stats
        })
    }

    fn render(&self, event: &FetchProgress, stats: &FetchStats) {
        let Some(bar) = &self.bar else {
            return;
        };

        match event {
            FetchProgress::PageFetched {
                location, page, last, ..
            } => {
                bar.set_message(format!(
                    "{} page {}/{} | {} properties",
                    location, page, last, stats.properties_fetched
                ));
            }
            FetchProgress::LocationCompleted { .. } => bar.inc(1),
            FetchProgress::LocationFailed { location, error } => {
                bar.println(format!("Location '{}' failed: {}", location, error));
            }
        }
    }

    fn finish(&self, stats: &FetchStats) {
        if let Some(bar) = &self.bar {
            if stats.locations_failed > 0 {
                bar.abandon_with_message("aborted");
            } else {
                bar.finish_with_message(format!(
                    "{} pages, {} properties",
                    stats.pages_fetched, stats.properties_fetched
                ));
            }
        }
        debug!(
            "Progress display finished (bar enabled: {})",
            self.config.enable_progress_bar
        );
    }
}
