//! Integration tests for the registration API endpoints.
//!
//! These drive the full stack end-to-end: axum router, orchestrator,
//! SQLite store, and the mock payment processor.

use std::sync::Arc;

use axum_test::TestServer;
use serde_json::{json, Value};

use reg_api::{create_router, AppState};
use reg_core::notify::NoopNotifier;
use reg_core::payment::AuthorizationStatus;
use reg_core::types::PaymentRef;
use reg_db::SqliteStore;
use reg_payments::mock::MockProcessor;

/// Create test app state with an in-memory database and mock processor.
fn create_test_state() -> (AppState, Arc<MockProcessor>) {
    let store = SqliteStore::open_in_memory().unwrap();
    let processor = Arc::new(MockProcessor::new());
    let state = AppState::new(store, processor.clone(), Arc::new(NoopNotifier));
    (state, processor)
}

fn create_test_server() -> (TestServer, Arc<MockProcessor>) {
    let (state, processor) = create_test_state();
    let server = TestServer::new(create_router(state)).unwrap();
    (server, processor)
}

fn registration_request(email: &str, event: &str) -> Value {
    json!({
        "first_name": "Jordan",
        "last_name": "Hale",
        "email": email,
        "phone": "(205) 555-0142",
        "age": 14,
        "grade": "8",
        "gender": "male",
        "shirt_size": "am",
        "experience": "intermediate",
        "guardian_name": "Casey Hale",
        "guardian_phone": "205-555-0143",
        "event": event,
        "amount": "249.00"
    })
}

// ============ Health Endpoint Tests ============

#[tokio::test]
async fn test_health_check() {
    let (server, _) = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["registration_count"], 0);
}

#[tokio::test]
async fn test_ready_check() {
    let (server, _) = create_test_server();

    let response = server.get("/ready").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ready");
}

// ============ Creation Tests ============

#[tokio::test]
async fn test_create_registration() {
    let (server, _) = create_test_server();

    let response = server
        .post("/api/v1/registrations")
        .json(&registration_request("jordan.hale@example.com", "birmingham-slam-camp"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["correlation_id"].as_str().unwrap().starts_with("reg_"));
    assert!(body["client_secret"].as_str().is_some());
    assert_eq!(body["amount_cents"], 24_900);
    assert_eq!(body["currency"], "usd");
    assert_eq!(body["payment_status"], "created");
}

#[tokio::test]
async fn test_validation_failure_lists_every_violation() {
    let (server, _) = create_test_server();

    let response = server
        .post("/api/v1/registrations")
        .json(&json!({
            "first_name": "",
            "last_name": "Hale",
            "email": "not-an-email",
            "phone": "123",
            "age": 42,
            "grade": "14",
            "gender": "male",
            "shirt_size": "am",
            "experience": "intermediate",
            "guardian_name": "Casey Hale",
            "guardian_phone": "205-555-0143",
            "event": "birmingham-slam-camp"
        }))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["code"], "VALIDATION_FAILED");
    let violations = body["violations"].as_array().unwrap();
    assert!(violations.len() >= 5);
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let (server, _) = create_test_server();
    let request = registration_request("dup@example.com", "birmingham-slam-camp");

    server.post("/api/v1/registrations").json(&request).await.assert_status_ok();

    let response = server.post("/api/v1/registrations").json(&request).await;
    response.assert_status(axum::http::StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["code"], "ALREADY_REGISTERED");
}

#[tokio::test]
async fn test_unknown_event_is_rejected() {
    let (server, processor) = create_test_server();

    let response = server
        .post("/api/v1/registrations")
        .json(&registration_request("who@example.com", "midnight-madness"))
        .await;

    response.assert_status_bad_request();
    // Rejected before any authorization was requested.
    assert_eq!(processor.created_count(), 0);
}

#[tokio::test]
async fn test_free_registration_completes_immediately() {
    let (server, processor) = create_test_server();

    let response = server
        .post("/api/v1/registrations")
        .json(&registration_request("free@example.com", "open-mat-night"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["payment_status"], "succeeded");
    assert_eq!(body["amount_cents"], 0);
    assert!(body["client_secret"].is_null());
    assert!(body["payment_ref"].as_str().unwrap().starts_with("free_"));
    assert_eq!(processor.created_count(), 0);
}

// ============ Verification Tests ============

#[tokio::test]
async fn test_verify_payment_end_to_end() {
    let (server, processor) = create_test_server();

    let created: Value = server
        .post("/api/v1/registrations")
        .json(&registration_request("e2e@example.com", "birmingham-slam-camp"))
        .await
        .json();
    let payment_ref = created["payment_ref"].as_str().unwrap().to_string();

    // Before checkout completes: expected 402, stable code.
    let response = server
        .post("/api/v1/registrations/verify")
        .json(&json!({ "payment_ref": payment_ref }))
        .await;
    response.assert_status(axum::http::StatusCode::PAYMENT_REQUIRED);
    let body: Value = response.json();
    assert_eq!(body["code"], "PAYMENT_NOT_COMPLETED");

    // Complete checkout on the processor side.
    processor.complete(&PaymentRef(payment_ref.clone()));

    let response = server
        .post("/api/v1/registrations/verify")
        .json(&json!({ "payment_ref": payment_ref }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["payment_status"], "succeeded");
    assert!(body["completed_at"].as_str().is_some());

    // Webhook redelivery: same outcome.
    let response = server
        .post("/api/v1/registrations/verify")
        .json(&json!({ "payment_ref": payment_ref }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["payment_status"], "succeeded");
}

#[tokio::test]
async fn test_unbound_succeeded_charge_is_generic_500() {
    let (server, processor) = create_test_server();

    let rogue = PaymentRef("pi_rogue_integration".to_string());
    processor.seed_external(&rogue, AuthorizationStatus::Succeeded);

    let response = server
        .post("/api/v1/registrations/verify")
        .json(&json!({ "payment_ref": rogue.0 }))
        .await;

    response.assert_status(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    // Generic contact-support surface; detail stays in the ledger.
    assert_eq!(body["code"], "INTERNAL");
    assert!(!body["error"].as_str().unwrap().contains("pi_rogue"));

    // The anomaly is preserved for operators.
    let entries: Value = server.get("/api/v1/errors/unresolved").await.json();
    let codes: Vec<&str> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["code"].as_str().unwrap())
        .collect();
    assert!(codes.contains(&"PAYMENT_INTENT_NOT_LOCKED"));
}

// ============ Read-back Tests ============

#[tokio::test]
async fn test_get_registration_with_integrity_flag() {
    let (server, _) = create_test_server();

    let created: Value = server
        .post("/api/v1/registrations")
        .json(&registration_request("read@example.com", "texas-recruiting-clinic"))
        .await
        .json();
    let correlation_id = created["correlation_id"].as_str().unwrap();

    let response = server
        .get(&format!("/api/v1/registrations/{}", correlation_id))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["correlation_id"], *correlation_id);
    assert_eq!(body["event"], "texas-recruiting-clinic");
    assert_eq!(body["integrity_valid"], true);
}

#[tokio::test]
async fn test_get_registration_not_found() {
    let (server, _) = create_test_server();

    let response = server.get("/api/v1/registrations/reg_does_not_exist").await;

    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["code"], "NOT_FOUND");
}

// ============ Operator Endpoint Tests ============

#[tokio::test]
async fn test_audit_endpoint_reports_clean_store() {
    let (server, _) = create_test_server();

    server
        .post("/api/v1/registrations")
        .json(&registration_request("audited@example.com", "birmingham-slam-camp"))
        .await
        .assert_status_ok();

    let response = server.get("/api/v1/audit").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["valid_count"], 1);
    assert_eq!(body["corrupted"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_resolve_error_entry() {
    let (server, processor) = create_test_server();

    // Produce an anomaly.
    let rogue = PaymentRef("pi_for_resolution".to_string());
    processor.seed_external(&rogue, AuthorizationStatus::Succeeded);
    server
        .post("/api/v1/registrations/verify")
        .json(&json!({ "payment_ref": rogue.0 }))
        .await;

    let entries: Value = server.get("/api/v1/errors/unresolved").await.json();
    let entry_id = entries[0]["entry_id"].as_str().unwrap().to_string();

    let response = server
        .post(&format!("/api/v1/errors/{}/resolve", entry_id))
        .json(&json!({
            "resolved_by": "ops@example.com",
            "action": "refunded orphaned charge at the processor"
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["resolved"], true);
    assert_eq!(body["resolved_by"], "ops@example.com");

    // No longer listed as unresolved.
    let entries: Value = server.get("/api/v1/errors/unresolved").await.json();
    assert!(entries.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_resolve_unknown_entry_is_404() {
    let (server, _) = create_test_server();

    let response = server
        .post("/api/v1/errors/cel_missing/resolve")
        .json(&json!({ "resolved_by": "ops", "action": "n/a" }))
        .await;

    response.assert_status_not_found();
}
