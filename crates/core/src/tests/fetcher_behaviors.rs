//! Behavioral tests for the resource fetcher
//!
//! Loading, empty, failure, stale responses and teardown.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use serde_json::json;

use super::{FakeTransport, shared};
use crate::descriptor::ResourceDescriptor;
use crate::error::Error;
use crate::fetcher::ResourceFetcher;
use crate::models::{ExecutionLog, Server};
use crate::resource::{Applied, Resource};

const SERVERS: &str = "/servers/getServers";

fn server_json(id: i64, name: &str) -> serde_json::Value {
    json!({"id": id, "name": name, "ip_address": "10.0.0.1", "environment": "production", "status": true})
}

// ============================================================================
// ONE-SHOT FETCH BEHAVIORS
// ============================================================================

#[tokio::test]
async fn given_new_fetcher_when_not_yet_refreshed_then_state_is_loading() {
    // Given
    let transport = shared(FakeTransport::new());

    // When
    let fetcher = ResourceFetcher::<Server>::new(transport, ResourceDescriptor::SERVERS);

    // Then
    assert!(fetcher.state().is_loading());
}

#[tokio::test]
async fn given_backend_returns_empty_list_when_refreshed_then_state_is_loaded_and_empty() {
    // Given
    let transport = shared(FakeTransport::new().with(SERVERS, Ok(json!([]))));
    let fetcher = ResourceFetcher::<Server>::new(transport, ResourceDescriptor::SERVERS);

    // When
    let applied = fetcher.refresh().await;

    // Then
    assert_eq!(applied, Applied::Current);
    assert_eq!(fetcher.state(), Resource::Loaded(Vec::new()));
    assert!(!fetcher.state().is_loading(), "Loading must be false");
    assert!(fetcher.state().error().is_none(), "Empty is not an error");
}

#[tokio::test]
async fn given_backend_rejects_when_refreshed_then_state_is_failed_without_retry() {
    // Given
    let transport = shared(
        FakeTransport::new().with(SERVERS, Err(Error::network_failure("connection refused"))),
    );
    let fetcher = ResourceFetcher::<Server>::new(transport.clone(), ResourceDescriptor::SERVERS);

    // When
    fetcher.refresh().await;

    // Then
    let state = fetcher.state();
    assert!(!state.is_loading());
    assert!(state.error().is_some_and(Error::is_network_failure));
    assert_eq!(transport.calls_to(SERVERS), 1, "No automatic retry");
}

#[tokio::test]
async fn given_enveloped_logs_when_refreshed_then_items_are_unwrapped() {
    // Given
    let transport = shared(FakeTransport::new().with(
        "/logs/getLogs",
        Ok(json!({"logs": [{"id": 1, "template_id": 4, "status": "success"}]})),
    ));
    let fetcher = ResourceFetcher::<ExecutionLog>::new(transport, ResourceDescriptor::LOGS);

    // When
    fetcher.refresh().await;

    // Then
    assert_eq!(fetcher.with_state(|s| s.items().len()), 1);
}

#[tokio::test]
async fn given_observer_when_refreshed_then_it_sees_loading_then_loaded() {
    // Given
    let transport = shared(FakeTransport::new().with(SERVERS, Ok(json!([server_json(1, "web-01")]))));
    let fetcher = ResourceFetcher::<Server>::new(transport, ResourceDescriptor::SERVERS);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    fetcher.observe(move |state| sink.borrow_mut().push(state.is_loading()));

    // When
    fetcher.refresh().await;

    // Then
    assert_eq!(*seen.borrow(), vec![true, false]);
}

// ============================================================================
// ORDERING AND TEARDOWN BEHAVIORS
// ============================================================================

#[tokio::test]
async fn given_two_requests_in_flight_when_older_answers_last_then_it_is_discarded() {
    // Given
    let transport = shared(FakeTransport::new());
    let old_reply = transport.defer(SERVERS);
    let new_reply = transport.defer(SERVERS);
    let fetcher = ResourceFetcher::<Server>::new(transport, ResourceDescriptor::SERVERS);

    // When
    let (first, second, ()) = futures::join!(fetcher.refresh(), fetcher.refresh(), async {
        new_reply.send(Ok(json!([server_json(2, "new")]))).ok();
        old_reply.send(Ok(json!([server_json(1, "old")]))).ok();
    });

    // Then
    assert_eq!(first, Applied::Stale);
    assert_eq!(second, Applied::Current);
    let names: Vec<String> = fetcher.with_state(|s| s.items().iter().map(|s| s.name.clone()).collect());
    assert_eq!(names, vec!["new".to_string()]);
}

#[tokio::test]
async fn given_request_in_flight_when_torn_down_then_response_is_never_applied() {
    // Given
    let transport = shared(FakeTransport::new());
    let _reply = transport.defer(SERVERS);
    let fetcher = ResourceFetcher::<Server>::new(transport, ResourceDescriptor::SERVERS);

    // When
    let (applied, ()) = futures::join!(fetcher.refresh(), async { fetcher.teardown() });

    // Then
    assert_eq!(applied, Applied::Stale);
    assert!(fetcher.state().is_loading());
    assert!(fetcher.is_torn_down());
}

#[tokio::test]
async fn given_torn_down_fetcher_when_refreshed_then_nothing_is_requested() {
    // Given
    let transport = shared(FakeTransport::new().with(SERVERS, Ok(json!([]))));
    let fetcher = ResourceFetcher::<Server>::new(transport.clone(), ResourceDescriptor::SERVERS);
    fetcher.teardown();

    // When
    let applied = fetcher.refresh().await;

    // Then
    assert_eq!(applied, Applied::Stale);
    assert_eq!(transport.total_calls(), 0);
}

#[tokio::test]
async fn given_polling_fetcher_when_torn_down_after_third_tick_then_polling_stops() {
    // Given
    let transport = shared(FakeTransport::new().with(SERVERS, Ok(json!([]))));
    let fetcher = ResourceFetcher::<Server>::new(transport.clone(), ResourceDescriptor::SERVERS);
    let ticks = RefCell::new(0_u32);

    // When
    fetcher
        .poll(Duration::from_secs(30), |_| {
            *ticks.borrow_mut() += 1;
            if *ticks.borrow() == 3 {
                fetcher.teardown();
            }
            futures::future::ready(())
        })
        .await;

    // Then
    assert_eq!(transport.calls_to(SERVERS), 3);
    assert_eq!(*ticks.borrow(), 3);
}
