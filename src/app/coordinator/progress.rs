//! Progress events emitted while fetching
//!
//! Fetchers and the coordinator report what they have done on an optional
//! bounded channel. Nothing in the fetch path waits on a consumer beyond the
//! channel's capacity, and a closed channel is ignored.

use std::collections::HashMap;

/// One step of progress for a location
#[derive(Debug, Clone, PartialEq)]
pub enum FetchProgress {
    /// A page was fetched and validated
    PageFetched {
        location: String,
        page: u32,
        last: u32,
        properties: usize,
    },
    /// Every page of a location was fetched
    LocationCompleted { location: String, properties: usize },
    /// A location's fetch failed and the run is being aborted
    LocationFailed { location: String, error: String },
}

impl FetchProgress {
    /// Location the event refers to
    pub fn location(&self) -> &str {
        match self {
            FetchProgress::PageFetched { location, .. }
            | FetchProgress::LocationCompleted { location, .. }
            | FetchProgress::LocationFailed { location, .. } => location,
        }
    }
}

/// Running totals built from progress events
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchStats {
    pub pages_fetched: u64,
    pub properties_fetched: u64,
    pub locations_completed: usize,
    pub locations_failed: usize,
    /// Last page number reported per location
    pub pages_total: HashMap<String, u32>,
}

impl FetchStats {
    /// Fold one event into the totals
    pub fn record(&mut self, event: &FetchProgress) {
        match event {
            FetchProgress::PageFetched {
                location,
                last,
                properties,
                ..
            } => {
                self.pages_fetched += 1;
                self.properties_fetched += *properties as u64;
                self.pages_total.insert(location.clone(), *last);
            }
            FetchProgress::LocationCompleted { .. } => self.locations_completed += 1,
            FetchProgress::LocationFailed { .. } => self.locations_failed += 1,
        }
    }

    /// Pages known so far across all locations
    ///
    /// A location's total is only known after its first page arrives.
    pub fn known_pages(&self) -> u64 {
        self.pages_total.values().map(|last| u64::from(*last)).sum()
    }
}
