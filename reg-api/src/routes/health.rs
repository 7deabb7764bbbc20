//! Health check endpoints.

use axum::{extract::State, Json};

use crate::dto::HealthResponse;
use crate::error::ApiResult;
use crate::state::AppState;

/// Health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let registration_count = state.registrations.count().await.unwrap_or(0);

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        registration_count,
    }))
}

/// Ready check endpoint (verifies store connectivity).
pub async fn ready_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let (status, registration_count) = match state.registrations.count().await {
        Ok(count) => ("ready", count),
        Err(_) => ("degraded", 0),
    };

    Ok(Json(HealthResponse {
        status: status.to_string(),
        version: state.version.clone(),
        registration_count,
    }))
}
