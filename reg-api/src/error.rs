//! API error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use reg_core::validate::FieldViolation;
use reg_core::RegistrationError;

/// API error types.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Registration(#[from] RegistrationError),
}

/// Error response body. Always carries a stable machine-readable code;
/// validation failures also carry the complete list of violations.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations: Option<Vec<FieldViolation>>,
}

/// Message shown for critical classes. Internal detail is never leaked
/// to end users; it is preserved in the critical error ledger.
const SUPPORT_MESSAGE: &str =
    "Something went wrong processing this registration. Please contact support.";

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, violations) = match self {
            ApiError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", msg, None)
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg, None),
            ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL",
                SUPPORT_MESSAGE.to_string(),
                None,
            ),
            ApiError::Registration(err) => {
                let code = err.code();
                match err {
                    RegistrationError::ValidationFailed(violations) => (
                        StatusCode::BAD_REQUEST,
                        code,
                        "validation failed".to_string(),
                        Some(violations),
                    ),
                    RegistrationError::UnknownEvent(_) => {
                        (StatusCode::BAD_REQUEST, code, err.to_string(), None)
                    }
                    RegistrationError::AlreadyRegistered { .. } => {
                        (StatusCode::CONFLICT, code, err.to_string(), None)
                    }
                    RegistrationError::PaymentNotCompleted { .. } => {
                        (StatusCode::PAYMENT_REQUIRED, code, err.to_string(), None)
                    }
                    RegistrationError::NotFound(_) => {
                        (StatusCode::NOT_FOUND, code, err.to_string(), None)
                    }
                    // Critical classes: already written to the ledger by
                    // the service; surface only the generic message.
                    _ => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL",
                        SUPPORT_MESSAGE.to_string(),
                        None,
                    ),
                }
            }
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            violations,
        };

        (status, Json(body)).into_response()
    }
}

/// API result type.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use reg_core::types::PaymentRef;

    #[test]
    fn test_critical_errors_do_not_leak_detail() {
        let err = ApiError::Registration(RegistrationError::PaymentIntentNotLocked(PaymentRef(
            "pi_secret_internal".to_string(),
        )));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_expected_states_map_to_client_statuses() {
        let err = ApiError::Registration(RegistrationError::PaymentNotCompleted {
            payment_ref: PaymentRef("pi_1".to_string()),
            status: reg_core::payment::AuthorizationStatus::Processing,
        });
        assert_eq!(err.into_response().status(), StatusCode::PAYMENT_REQUIRED);
    }
}
