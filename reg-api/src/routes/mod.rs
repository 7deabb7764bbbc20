//! API route handlers.

pub mod audit;
pub mod errors;
pub mod health;
pub mod registration;

use axum::{routing::get, routing::post, Router};

use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        // Registration endpoints
        .route("/api/v1/registrations", post(registration::create_registration))
        .route(
            "/api/v1/registrations/verify",
            post(registration::verify_payment),
        )
        .route(
            "/api/v1/registrations/:correlation_id",
            get(registration::get_registration),
        )
        // Operator endpoints
        .route("/api/v1/audit", get(audit::run_audit))
        .route("/api/v1/errors/unresolved", get(errors::list_unresolved))
        .route("/api/v1/errors/:entry_id/resolve", post(errors::resolve_entry))
        // State
        .with_state(state)
}
