//! Service banner and health check

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub storage: String,
    pub version: String,
}

pub async fn root() -> &'static str {
    "Loan Ledger API Server"
}

/// GET /health - 503 when the loan store cannot be reached
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status, code, storage) = match state.lifecycle_service.ping().await {
        Ok(()) => ("healthy", StatusCode::OK, state.storage_backend.to_string()),
        Err(e) => (
            "unhealthy",
            StatusCode::SERVICE_UNAVAILABLE,
            format!("{}: {}", state.storage_backend, e),
        ),
    };

    (
        code,
        Json(HealthResponse {
            status: status.to_string(),
            storage,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}
