//! HTTP transport for batch ingest.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `POST /historicalload/transactions/batch-write`: body
//!   `{ "transactions": [...] }`, answered with a [`BatchWriteResponse`] and
//!   the status of its category. A missing or empty list is a bare 400.
//! - `GET /health`: liveness plus deployment identifiers.
//!
//! ## Example
//!
//! ```ignore
//! let service = Arc::new(BatchWriteService::new(decryptor, transactions));
//!
//! // Compose with other axum routes
//! let app = txn_store::http::router(service.clone());
//!
//! // Or serve directly
//! txn_store::http::serve(service, "0.0.0.0:8080").await?;
//! ```
//!
//! [`BatchWriteResponse`]: crate::model::BatchWriteResponse

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::model::BatchWriteRequest;
use crate::pipeline::BatchWriteService;

pub const BATCH_WRITE_PATH: &str = "/historicalload/transactions/batch-write";
pub const HEALTH_PATH: &str = "/health";

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckResponse {
    pub status: String,
    pub app_version: String,
    pub region: String,
    pub cluster_id: String,
    pub container_id: String,
}

impl HealthCheckResponse {
    /// Read deployment identifiers from the environment, with placeholders for unset ones.
    pub fn from_env() -> Self {
        let var = |name: &str, fallback: &str| {
            std::env::var(name)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| fallback.to_string())
        };
        Self {
            status: "Up".to_string(),
            app_version: var("APP_VERSION", "NOT_SET"),
            region: var("AWS_REGION", "Region-NA"),
            cluster_id: var("CLUSTER_ID", "Cluster-Id-NA"),
            container_id: var("CONTAINER_ID", "Container-Id-NA"),
        }
    }
}

/// Build an axum `Router` backed by the given service.
pub fn router(service: Arc<BatchWriteService>) -> Router {
    Router::new()
        .route(HEALTH_PATH, get(health_handler))
        .route(BATCH_WRITE_PATH, post(batch_write_handler))
        .with_state(service)
}

/// Serve the service over HTTP at the given address (e.g. `"0.0.0.0:8080"`).
pub async fn serve(service: Arc<BatchWriteService>, addr: &str) -> Result<()> {
    let app = router(service);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    // An error here means no handler could be installed; run until killed.
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    } else {
        std::future::pending::<()>().await;
    }
}

async fn health_handler() -> impl IntoResponse {
    Json(HealthCheckResponse::from_env())
}

async fn batch_write_handler(
    State(service): State<Arc<BatchWriteService>>,
    Json(request): Json<BatchWriteRequest>,
) -> Response {
    let transactions = match request.transactions {
        Some(transactions) if !transactions.is_empty() => transactions,
        _ => {
            info!("rejecting batch with no transactions");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    info!(batch_size = transactions.len(), "batch write received");
    let response = service.put_transactions(transactions).await;
    let status =
        StatusCode::from_u16(response.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    info!(
        response_type = ?response.response_type,
        status = status.as_u16(),
        "batch write answered"
    );
    (status, Json(response)).into_response()
}
