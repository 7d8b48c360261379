//! Submission and confirmation against a mock ledger.

mod common;

use common::{link_response, start_delayed_mock_ledger, start_mock_ledger, status_response};
use prost::Message;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hylesaga_client::config::LedgerConfig;
use hylesaga_client::ledger::protocol::{Batch, BatchList};
use hylesaga_client::ledger::{
    Action, BatchBuilder, BatchStatus, LedgerClient, LedgerError, Signer, TransactionBuilder,
};
use hylesaga_client::resilience::{submit_and_wait, wait_for_commit, ConfirmationPolicy};

fn client_for(url: &str) -> LedgerClient {
    LedgerClient::new(LedgerConfig {
        url: url.to_string(),
        wait_secs: 5,
        request_timeout_secs: 10,
    })
    .unwrap()
}

fn sample_batch() -> Batch {
    let signer = Signer::random();
    let transaction = TransactionBuilder::new(signer.clone())
        .build("Alpha", Action::Create, None)
        .unwrap();
    BatchBuilder::new(signer).build(vec![transaction]).unwrap()
}

fn fast_policy(max_attempts: u32) -> ConfirmationPolicy {
    ConfirmationPolicy {
        max_attempts,
        base_delay_ms: 1,
        max_delay_ms: 5,
        wait_secs: 0,
    }
}

#[tokio::test]
async fn test_submit_extracts_tracking_id() {
    let ledger = start_mock_ledger(|_| (202, link_response("abc123"))).await;
    let client = client_for(&ledger.url());

    let id = client.submit(&sample_batch()).await.unwrap();
    assert_eq!(id, "abc123");
}

#[tokio::test]
async fn test_submit_sends_octet_stream_batch_list() {
    let ledger = start_mock_ledger(|_| (202, link_response("abc123"))).await;
    let client = client_for(&ledger.url());
    let batch = sample_batch();

    client.submit(&batch).await.unwrap();

    let requests = ledger.requests_to("/batches");
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, "POST");
    assert_eq!(
        request.content_type.as_deref(),
        Some("application/octet-stream")
    );

    let list = BatchList::decode(request.body.as_slice()).unwrap();
    assert_eq!(list.batches.len(), 1);
    assert_eq!(list.batches[0].header_signature, batch.header_signature);
}

#[tokio::test]
async fn test_link_without_id_never_polls() {
    let ledger = start_mock_ledger(|request| match request.path() {
        "/batches" => (
            202,
            r#"{"link": "http://ledger.local:8008/batch_statuses"}"#.to_string(),
        ),
        _ => (200, status_response("abc123", "COMMITTED")),
    })
    .await;
    let client = client_for(&ledger.url());

    let result = client.submit_and_confirm(&sample_batch(), 5).await;
    assert!(matches!(result, Err(LedgerError::Protocol(_))));
    assert!(ledger.requests_to("/batch_statuses").is_empty());
}

#[tokio::test]
async fn test_submit_http_error_never_polls() {
    let ledger = start_mock_ledger(|request| match request.path() {
        "/batches" => (500, r#"{"error": "boom"}"#.to_string()),
        _ => (200, status_response("abc123", "COMMITTED")),
    })
    .await;
    let client = client_for(&ledger.url());

    let result = client.submit_and_confirm(&sample_batch(), 5).await;
    assert!(matches!(result, Err(LedgerError::Http { status: 500, .. })));
    assert!(ledger.requests_to("/batch_statuses").is_empty());
}

#[tokio::test]
async fn test_committed_outcome() {
    let ledger = start_mock_ledger(|request| match request.path() {
        "/batches" => (202, link_response("abc123")),
        _ => (200, status_response("abc123", "COMMITTED")),
    })
    .await;
    let client = client_for(&ledger.url());

    let outcome = client.submit_and_confirm(&sample_batch(), 5).await.unwrap();
    assert_eq!(outcome.batch_id, "abc123");
    assert!(outcome.is_success());
    assert_eq!(outcome.message(), "Batch Successfully Committed");
}

#[tokio::test]
async fn test_poll_carries_id_and_wait() {
    let ledger = start_mock_ledger(|_| (200, status_response("abc123", "PENDING"))).await;
    let client = client_for(&ledger.url());

    let status = client.poll_status("abc123", 7).await.unwrap();
    assert_eq!(status, BatchStatus::Pending);

    let polls = ledger.requests_to("/batch_statuses");
    assert_eq!(polls.len(), 1);
    assert_eq!(polls[0].method, "GET");
    assert!(polls[0].target.contains("id=abc123"));
    assert!(polls[0].target.contains("wait=7"));
}

#[tokio::test]
async fn test_long_poll_outlasts_request_timeout() {
    let ledger = start_delayed_mock_ledger(Duration::from_secs(2), |_| {
        (200, status_response("abc123", "COMMITTED"))
    })
    .await;
    let client = LedgerClient::new(LedgerConfig {
        url: ledger.url(),
        wait_secs: 0,
        request_timeout_secs: 1,
    })
    .unwrap();

    let status = client.poll_status("abc123", 5).await.unwrap();
    assert_eq!(status, BatchStatus::Committed);
}

#[tokio::test]
async fn test_poll_http_failure_after_submit() {
    let ledger = start_mock_ledger(|request| match request.path() {
        "/batches" => (202, link_response("abc123")),
        _ => (503, r#"{"error": "validator unavailable"}"#.to_string()),
    })
    .await;
    let client = client_for(&ledger.url());

    let result = client.submit_and_confirm(&sample_batch(), 5).await;
    assert!(matches!(result, Err(LedgerError::Http { status: 503, .. })));
    assert_eq!(ledger.requests_to("/batches").len(), 1);
    assert_eq!(ledger.requests_to("/batch_statuses").len(), 1);
}

#[tokio::test]
async fn test_poll_connection_drop_after_submit() {
    let ledger = start_mock_ledger(|request| match request.path() {
        "/batches" => (202, link_response("abc123")),
        _ => (0, String::new()),
    })
    .await;
    let client = client_for(&ledger.url());

    let result = client.submit_and_confirm(&sample_batch(), 5).await;
    assert!(matches!(result, Err(LedgerError::Network(_))));
    assert_eq!(ledger.requests_to("/batches").len(), 1);
}

#[tokio::test]
async fn test_invalid_outcome_carries_diagnostic() {
    let ledger = start_mock_ledger(|request| match request.path() {
        "/batches" => (202, link_response("abc123")),
        _ => (
            200,
            r#"{"data": [{"id": "abc123", "status": "INVALID",
                "invalid_transactions": [{"id": "t1", "message": "insufficient space"}]}]}"#
                .to_string(),
        ),
    })
    .await;
    let client = client_for(&ledger.url());

    let outcome = client.submit_and_confirm(&sample_batch(), 5).await.unwrap();
    assert!(!outcome.is_success());
    assert_eq!(outcome.message(), "insufficient space");
}

#[tokio::test]
async fn test_pending_and_unknown_outcomes() {
    let ledger = start_mock_ledger(|request| {
        if request.target.contains("id=later") {
            (200, status_response("later", "PENDING"))
        } else {
            (200, status_response("lost", "UNKNOWN"))
        }
    })
    .await;
    let client = client_for(&ledger.url());

    assert_eq!(
        client.poll_status("later", 0).await.unwrap(),
        BatchStatus::Pending
    );
    assert_eq!(
        client.poll_status("lost", 0).await.unwrap(),
        BatchStatus::Unknown
    );
}

#[tokio::test]
async fn test_unhandled_status_is_protocol_error() {
    let ledger = start_mock_ledger(|_| (200, status_response("abc123", "EXPLODED"))).await;
    let client = client_for(&ledger.url());

    let result = client.poll_status("abc123", 0).await;
    assert!(matches!(result, Err(LedgerError::Protocol(_))));
}

#[tokio::test]
async fn test_malformed_status_body_is_protocol_error() {
    let ledger = start_mock_ledger(|_| (200, "not json".to_string())).await;
    let client = client_for(&ledger.url());

    let result = client.poll_status("abc123", 0).await;
    assert!(matches!(result, Err(LedgerError::Protocol(_))));
}

#[tokio::test]
async fn test_wait_for_commit_polls_until_committed() {
    let polls = Arc::new(AtomicU32::new(0));
    let counter = polls.clone();
    let ledger = start_mock_ledger(move |_| {
        if counter.fetch_add(1, Ordering::SeqCst) < 2 {
            (200, status_response("abc123", "PENDING"))
        } else {
            (200, status_response("abc123", "COMMITTED"))
        }
    })
    .await;
    let client = client_for(&ledger.url());

    wait_for_commit(&client, "abc123", &fast_policy(5))
        .await
        .unwrap();
    assert_eq!(polls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_wait_for_commit_stops_on_rejection() {
    let ledger = start_mock_ledger(|_| {
        (
            200,
            r#"{"data": [{"id": "abc123", "status": "INVALID",
                "invalid_transactions": [{"id": "t1", "message": "entity exists"}]}]}"#
                .to_string(),
        )
    })
    .await;
    let client = client_for(&ledger.url());

    let result = wait_for_commit(&client, "abc123", &fast_policy(5)).await;
    match result {
        Err(LedgerError::Rejected(message)) => assert_eq!(message, "entity exists"),
        other => panic!("expected rejection, got {:?}", other),
    }
    assert_eq!(ledger.requests_to("/batch_statuses").len(), 1);
}

#[tokio::test]
async fn test_wait_for_commit_gives_up_after_budget() {
    let ledger = start_mock_ledger(|_| (200, status_response("abc123", "PENDING"))).await;
    let client = client_for(&ledger.url());

    let result = wait_for_commit(&client, "abc123", &fast_policy(3)).await;
    assert!(matches!(
        result,
        Err(LedgerError::ConfirmationTimeout { attempts: 3, .. })
    ));
    assert_eq!(ledger.requests_to("/batch_statuses").len(), 3);
}

#[tokio::test]
async fn test_wait_for_commit_surfaces_poll_failure() {
    let ledger = start_mock_ledger(|_| (503, r#"{"error": "busy"}"#.to_string())).await;
    let client = client_for(&ledger.url());

    let result = wait_for_commit(&client, "abc123", &fast_policy(5)).await;
    assert!(matches!(result, Err(LedgerError::Http { status: 503, .. })));
    assert_eq!(ledger.requests_to("/batch_statuses").len(), 1);
}

#[tokio::test]
async fn test_submit_and_wait_submits_once() {
    let ledger = start_mock_ledger(|request| match request.path() {
        "/batches" => (202, link_response("abc123")),
        _ => (200, status_response("abc123", "COMMITTED")),
    })
    .await;
    let client = client_for(&ledger.url());

    let outcome = submit_and_wait(&client, &sample_batch(), &fast_policy(3))
        .await
        .unwrap();
    assert!(outcome.is_success());
    assert_eq!(ledger.requests_to("/batches").len(), 1);
}
