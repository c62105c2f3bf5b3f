//! HTTP transport integration tests.
//!
//! Starts an axum server and exercises it with reqwest.

use std::sync::Arc;

use serde_json::{json, Value};
use txn_store::BatchWriteResponse;

use crate::support::Harness;

/// Bind to port 0 and return the actual address.
async fn start_server(h: &Harness) -> String {
    let app = txn_store::router(Arc::new(h.service()));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn batch_url(base: &str) -> String {
    format!("{base}/historicalload/transactions/batch-write")
}

#[tokio::test]
async fn health_check() {
    let h = Harness::new();
    let base = start_server(&h).await;

    let resp = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "Up");
    for field in ["appVersion", "region", "clusterId", "containerId"] {
        assert!(body[field].is_string(), "{field} missing");
    }
}

#[tokio::test]
async fn successful_batch_is_200() {
    let h = Harness::new();
    let base = start_server(&h).await;

    let resp = reqwest::Client::new()
        .post(batch_url(&base))
        .json(&json!({ "transactions": [h.item(1), h.item(2)] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["totalSent"], 2);
    assert_eq!(body["totalWritten"], 2);
    assert_eq!(body["failedCount"], 0);
    assert_eq!(body["responseType"], "ALL_ITEMS_PROCESSED_SUCCESSFULLY");
    assert!(body.get("failedItems").is_none());
}

#[tokio::test]
async fn partial_batch_is_207() {
    let h = Harness::new();
    let base = start_server(&h).await;

    let mut invalid = serde_json::to_value(h.item(2)).unwrap();
    invalid["transactionCategory"] = Value::Null;

    let resp = reqwest::Client::new()
        .post(batch_url(&base))
        .json(&json!({ "transactions": [h.item(1), invalid] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 207);

    let body: BatchWriteResponse = resp.json().await.unwrap();
    assert_eq!(body.total_written, 1);
    let failed = body.failed_items.unwrap();
    assert_eq!(failed[0].error_code, "failed_validation");
    assert_eq!(
        failed[0].reason.as_deref(),
        Some("transactionCategory field is required")
    );
}

#[tokio::test]
async fn validation_failures_are_400() {
    let h = Harness::new();
    let base = start_server(&h).await;

    let resp = reqwest::Client::new()
        .post(batch_url(&base))
        .json(&json!({ "transactions": [{ "accountReferenceId": "x" }] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["responseType"], "ALL_ITEMS_FAILED_VALIDATION");
}

#[tokio::test]
async fn resubmitted_batch_is_409_with_existing_item() {
    let h = Harness::new();
    let base = start_server(&h).await;
    let client = reqwest::Client::new();
    let item = h.item(7);

    let first = client
        .post(batch_url(&base))
        .json(&json!({ "transactions": [item.clone()] }))
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), 200);

    let second = client
        .post(batch_url(&base))
        .json(&json!({ "transactions": [item] }))
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), 409);

    let body: Value = second.json().await.unwrap();
    let existing = &body["failedItems"][0]["existingItem"];
    assert_eq!(existing["orderKey"], "2024-03-01~P0000000007_");
    assert_eq!(existing["financialCoreCommandId"], "cmd-7");
}

#[tokio::test]
async fn empty_or_missing_list_is_bare_400() {
    let h = Harness::new();
    let base = start_server(&h).await;
    let client = reqwest::Client::new();

    for body in [json!({ "transactions": [] }), json!({})] {
        let resp = client.post(batch_url(&base)).json(&body).send().await.unwrap();
        assert_eq!(resp.status(), 400);
        assert!(resp.text().await.unwrap().is_empty());
    }
}
