//! HTTP status API
//!
//! Endpoints:
//! - GET /health - Health check
//! - GET /status - Current scheduler snapshot
//!
//! Read-only: handlers only ever take the read side of the lock.

use axum::{
    extract::State,
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;

use crate::core::StatusHandle;
use crate::types::StatusSnapshot;

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub state: String,
}

/// Create the API router
pub fn create_router(status: StatusHandle) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/status", get(get_status))
        .with_state(status)
}

/// Health check endpoint
async fn health(State(status): State<StatusHandle>) -> Json<HealthResponse> {
    let snapshot = status.read().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        state: snapshot.state.to_string(),
    })
}

/// Current snapshot
async fn get_status(State(status): State<StatusHandle>) -> Json<StatusSnapshot> {
    Json(status.read().await.clone())
}

/// Run the API server
pub async fn run_server(addr: &str, status: StatusHandle) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let router = create_router(status);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "status API listening");
    axum::serve(listener, router).await?;
    Ok(())
}
