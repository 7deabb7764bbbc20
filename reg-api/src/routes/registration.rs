//! Registration endpoints.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};

use reg_core::types::{ClientContext, CorrelationId, PaymentRef};

use crate::dto::{
    CreateRegistrationRequest, CreateRegistrationResponse, RegistrationSummaryResponse,
    VerifyPaymentRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

/// Create a registration and its payment intent.
pub async fn create_registration(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateRegistrationRequest>,
) -> ApiResult<Json<CreateRegistrationResponse>> {
    let origin = client_context(&headers);

    let created = state
        .service
        .create_registration(request.into_payload(), origin)
        .await?;

    Ok(Json(CreateRegistrationResponse {
        correlation_id: created.correlation_id.0,
        payment_ref: created.payment_ref.0,
        client_secret: created.client_secret,
        amount_cents: created.amount_cents,
        currency: created.currency,
        payment_status: created.payment_status.as_str().to_string(),
    }))
}

/// Verify a payment reference against the processor and advance the
/// bound registration. Idempotent under repeated delivery.
pub async fn verify_payment(
    State(state): State<AppState>,
    Json(request): Json<VerifyPaymentRequest>,
) -> ApiResult<Json<RegistrationSummaryResponse>> {
    let verified = state
        .service
        .verify_payment(&PaymentRef(request.payment_ref))
        .await?;

    Ok(Json(RegistrationSummaryResponse::from_registration(
        &verified.registration,
        None,
    )))
}

/// Read a registration back out, with the opportunistic integrity check.
pub async fn get_registration(
    State(state): State<AppState>,
    Path(correlation_id): Path<String>,
) -> ApiResult<Json<RegistrationSummaryResponse>> {
    let registration = state
        .service
        .get_registration(&CorrelationId(correlation_id))
        .await?;

    let finding = state.auditor.check(&registration).await?;

    Ok(Json(RegistrationSummaryResponse::from_registration(
        &registration,
        Some(finding.is_none()),
    )))
}

fn client_context(headers: &HeaderMap) -> ClientContext {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    ClientContext {
        source_ip: header("x-forwarded-for"),
        user_agent: header("user-agent"),
    }
}
