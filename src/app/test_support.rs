//! In-memory transport and sleeper doubles shared by unit tests

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::app::client::http::{PageTransport, RawPage};
use crate::app::client::pacing::Sleeper;
use crate::app::query::SearchQuery;
use crate::errors::FetchResult;

/// Sleeper that records requested durations and returns immediately
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn recorded(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

/// Transport replaying queued responses per (location, page)
///
/// Unscripted requests get a 404 so a runaway loop fails instead of hanging.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: Mutex<HashMap<(String, u32), VecDeque<RawPage>>>,
    latency: Mutex<HashMap<String, Duration>>,
    requests: Mutex<Vec<SearchQueryRecord>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

/// A request seen by the scripted transport
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQueryRecord {
    pub query: SearchQuery,
    pub page: u32,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for one page of a location
    pub fn push(&self, location: &str, page: u32, response: RawPage) {
        self.responses
            .lock()
            .unwrap()
            .entry((location.to_string(), page))
            .or_default()
            .push_back(response);
    }

    /// Queue a valid 200 page listing `addresses`
    pub fn push_page(&self, location: &str, current: u32, last: u32, addresses: &[&str]) {
        self.push(
            location,
            current,
            RawPage::new(200, page_body(location, current, last, addresses)),
        );
    }

    /// Delay every response for `location` by real wall-clock time
    pub fn set_latency(&self, location: &str, latency: Duration) {
        self.latency
            .lock()
            .unwrap()
            .insert(location.to_string(), latency);
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// (location, page) of every request in arrival order
    pub fn requests(&self) -> Vec<(String, u32)> {
        self.records()
            .into_iter()
            .map(|r| (r.query.location, r.page))
            .collect()
    }

    pub fn records(&self) -> Vec<SearchQueryRecord> {
        self.requests.lock().unwrap().clone()
    }

    /// Highest number of requests that were in progress at the same time
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageTransport for ScriptedTransport {
    async fn get_page(&self, query: &SearchQuery, page: u32) -> FetchResult<RawPage> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);

        let latency = self.latency.lock().unwrap().get(&query.location).copied();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.requests.lock().unwrap().push(SearchQueryRecord {
            query: query.clone(),
            page,
        });

        let next = self
            .responses
            .lock()
            .unwrap()
            .get_mut(&(query.location.clone(), page))
            .and_then(|queue| queue.pop_front());

        Ok(next.unwrap_or_else(|| RawPage::new(404, "unscripted request")))
    }
}

/// Body of a valid page whose properties are named by `addresses`
pub fn page_body(location: &str, current: u32, last: u32, addresses: &[&str]) -> String {
    let properties: Vec<_> = addresses
        .iter()
        .map(|address| {
            json!({
                "address": address,
                "propertyType": "Flat",
                "bedrooms": 2,
                "hasFloorPlan": false,
                "transactions": [
                    {
                        "displayPrice": "£180,000",
                        "dateSold": "3 March 2020",
                        "tenure": "Freehold",
                        "newBuild": false
                    }
                ],
                "location": { "lat": 57.14, "lng": -2.09 },
                "detailUrl": format!("https://example.com/details/{}", address.replace(' ', "-"))
            })
        })
        .collect();
    let count = properties.len();

    json!({
        "count": count,
        "metaTagDescription": format!("Sold house prices in {}", location),
        "properties": properties,
        "searchLocation": {
            "displayName": location,
            "searchName": location,
            "locationType": "POSTCODE",
            "locationId": 1
        },
        "disclaimerDates": { "disclaimerDatesMap": {} },
        "pagination": { "current": current, "first": 1, "last": last, "total": last * 25 }
    })
    .to_string()
}
