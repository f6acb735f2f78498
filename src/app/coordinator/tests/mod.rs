//! Unit tests for the coordinator
//!
//! Transports here are scripted and pacing sleeps are recorded rather than
//! slept, so only the latencies set explicitly on a location take real time.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::app::client::http::RawPage;
use crate::app::client::pacing::{PacingConfig, RateLimiter};
use crate::app::client::retry::{RetryConfig, RetryPolicy};
use crate::app::fetcher::PaginatedFetcher;
use crate::app::models::Property;
use crate::app::test_support::{RecordingSleeper, ScriptedTransport};
use crate::errors::FetchError;

use super::*;

fn create_test_coordinator(transport: &Arc<ScriptedTransport>, limit: usize) -> Coordinator {
    let sleeper = Arc::new(RecordingSleeper::default());
    let fetcher = PaginatedFetcher::new(
        transport.clone(),
        RateLimiter::new(PacingConfig::none()),
        RetryPolicy::new(RetryConfig::default(), sleeper.clone()),
        sleeper,
    );
    Coordinator::new(
        CoordinatorConfig::default().with_concurrency_limit(limit),
        fetcher,
    )
}

fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn addresses(properties: &[Property]) -> Vec<&str> {
    properties.iter().map(|p| p.address.as_str()).collect()
}

#[tokio::test]
async fn test_empty_input_makes_no_requests() {
    let transport = Arc::new(ScriptedTransport::new());
    let coordinator = create_test_coordinator(&transport, 8);

    let properties = coordinator
        .fetch_for_identifiers(&[], 20, 0.5)
        .await
        .unwrap();

    assert!(properties.is_empty());
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_results_follow_input_order() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_page("A", 1, 1, &["a1", "a2"]);
    transport.push_page("B", 1, 1, &["b1"]);
    // A finishes well after B
    transport.set_latency("A", Duration::from_millis(100));

    let properties = create_test_coordinator(&transport, 8)
        .fetch_for_identifiers(&ids(&["A", "B"]), 20, 0.5)
        .await
        .unwrap();

    assert_eq!(addresses(&properties), vec!["a1", "a2", "b1"]);
}

#[tokio::test]
async fn test_multi_page_locations_are_concatenated() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_page("A", 1, 2, &["a1"]);
    transport.push_page("A", 2, 2, &["a2"]);
    transport.push_page("B", 1, 2, &["b1"]);
    transport.push_page("B", 2, 2, &["b2"]);
    transport.push_page("C", 1, 1, &["c1"]);

    let properties = create_test_coordinator(&transport, 2)
        .fetch_for_identifiers(&ids(&["C", "A", "B"]), 20, 0.5)
        .await
        .unwrap();

    assert_eq!(addresses(&properties), vec!["c1", "a1", "a2", "b1", "b2"]);
    assert_eq!(transport.request_count(), 5);
}

#[tokio::test]
async fn test_radius_and_sold_in_sent_for_every_location() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_page("A", 1, 1, &["a1"]);
    transport.push_page("B", 1, 1, &["b1"]);

    create_test_coordinator(&transport, 8)
        .fetch_for_identifiers(&ids(&["A", "B"]), 10, 0.25)
        .await
        .unwrap();

    let records = transport.records();
    assert_eq!(records.len(), 2);
    assert!(records
        .iter()
        .all(|r| r.query.radius == Some(0.25) && r.query.sold_in == 10));
}

#[tokio::test]
async fn test_one_failure_fails_the_run() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_page("A", 1, 1, &["a1"]);
    transport.set_latency("A", Duration::from_millis(200));
    for _ in 0..5 {
        transport.push("B", 1, RawPage::new(500, "down"));
    }

    let error = create_test_coordinator(&transport, 8)
        .fetch_for_identifiers(&ids(&["A", "B"]), 20, 0.5)
        .await
        .unwrap_err();

    match &error {
        FetchError::Location { location, .. } => assert_eq!(location, "B"),
        other => panic!("Expected FetchError::Location, got {:?}", other),
    }
    assert!(matches!(
        error.root(),
        FetchError::RetryExhausted {
            page: 1,
            attempts: 5,
            status: Some(500),
            ..
        }
    ));
}

#[tokio::test]
async fn test_concurrency_limit_is_respected() {
    let transport = Arc::new(ScriptedTransport::new());
    let locations = ids(&["L1", "L2", "L3", "L4", "L5", "L6"]);
    for location in &locations {
        transport.push_page(location, 1, 1, &["x"]);
        transport.set_latency(location, Duration::from_millis(20));
    }

    let properties = create_test_coordinator(&transport, 2)
        .fetch_for_identifiers(&locations, 20, 0.5)
        .await
        .unwrap();

    assert_eq!(properties.len(), 6);
    assert!(transport.peak_in_flight() <= 2);
    assert!(transport.peak_in_flight() >= 1);
}

#[tokio::test]
async fn test_duplicate_identifiers_are_fetched_twice() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_page("A", 1, 1, &["first"]);
    transport.push_page("A", 1, 1, &["second"]);

    let properties = create_test_coordinator(&transport, 1)
        .fetch_for_identifiers(&ids(&["A", "A"]), 20, 0.5)
        .await
        .unwrap();

    assert_eq!(properties.len(), 2);
    assert_eq!(transport.request_count(), 2);
}

#[tokio::test]
async fn test_progress_reports_locations() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_page("A", 1, 1, &["a1"]);
    for _ in 0..5 {
        transport.push("B", 1, RawPage::new(503, "busy"));
    }
    transport.set_latency("A", Duration::from_millis(100));

    let (tx, mut rx) = mpsc::channel(64);
    let result = create_test_coordinator(&transport, 8)
        .with_progress(tx)
        .fetch_for_identifiers(&ids(&["A", "B"]), 20, 0.5)
        .await;
    assert!(result.is_err());

    let mut stats = FetchStats::default();
    while let Ok(event) = rx.try_recv() {
        stats.record(&event);
    }
    assert_eq!(stats.locations_failed, 1);
    assert_eq!(stats.locations_completed, 0);
}
