//! Error types for the correlation core.

use thiserror::Error;

use crate::events::EventId;
use crate::payment::PaymentError;
use crate::types::{CorrelationId, PaymentRef};
use crate::validate::FieldViolation;

/// Storage-layer errors surfaced by the store traits.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("row not found: {0}")]
    NotFound(String),

    /// A uniqueness constraint rejected a write. `constraint` names the
    /// violated constraint so callers can translate races precisely.
    #[error("conflict on constraint: {constraint}")]
    Conflict { constraint: String },

    #[error("stored row is not decodable: {0}")]
    Corrupt(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub fn conflict(constraint: impl Into<String>) -> Self {
        Self::Conflict {
            constraint: constraint.into(),
        }
    }
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// The registration error taxonomy.
///
/// Expected states (`PaymentNotCompleted`) and user-correctable failures
/// (`ValidationFailed`, `AlreadyRegistered`) are ordinary variants the
/// caller acts on. Critical variants indicate a consistency or security
/// breach; they are written to the critical error ledger before being
/// surfaced, and the API layer shows them only as a generic message.
#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("validation failed with {} violation(s)", .0.len())]
    ValidationFailed(Vec<FieldViolation>),

    #[error("{email} is already registered for {event}")]
    AlreadyRegistered { email: String, event: EventId },

    #[error("unknown event: {0}")]
    UnknownEvent(String),

    /// Expected transient outcome while the registrant completes payment.
    /// Not an anomaly; nothing is logged as critical.
    #[error("payment {payment_ref} is not completed (status: {status})")]
    PaymentNotCompleted {
        payment_ref: PaymentRef,
        status: crate::payment::AuthorizationStatus,
    },

    #[error("no lockdown is bound to payment reference {0}")]
    PaymentIntentNotLocked(PaymentRef),

    #[error("correlation mismatch for payment reference {payment_ref}: {detail}")]
    CorrelationMismatch {
        payment_ref: PaymentRef,
        detail: String,
    },

    #[error("data corruption detected for {0}")]
    DataCorruptionDetected(CorrelationId),

    #[error("registration creation failed: {0}")]
    RegistrationCreationFailed(String),

    #[error("registration not found: {0}")]
    NotFound(String),

    #[error("payment processor error: {0}")]
    Payment(#[from] PaymentError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl RegistrationError {
    /// Stable machine-readable code carried on every API error response.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ValidationFailed(_) => "VALIDATION_FAILED",
            Self::AlreadyRegistered { .. } => "ALREADY_REGISTERED",
            Self::UnknownEvent(_) => "UNKNOWN_EVENT",
            Self::PaymentNotCompleted { .. } => "PAYMENT_NOT_COMPLETED",
            Self::PaymentIntentNotLocked(_) => "PAYMENT_INTENT_NOT_LOCKED",
            Self::CorrelationMismatch { .. } => "CORRELATION_MISMATCH",
            Self::DataCorruptionDetected(_) => "DATA_CORRUPTION_DETECTED",
            Self::RegistrationCreationFailed(_) => "REGISTRATION_CREATION_FAILED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Payment(_) => "PAYMENT_ERROR",
            Self::Store(_) => "STORE_ERROR",
        }
    }

    /// Critical classes always reach the critical error ledger and are
    /// never shown to end users in detail.
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            Self::PaymentIntentNotLocked(_)
                | Self::CorrelationMismatch { .. }
                | Self::DataCorruptionDetected(_)
                | Self::RegistrationCreationFailed(_)
                | Self::Payment(_)
                | Self::Store(_)
        )
    }
}

/// Result type alias for orchestration operations.
pub type RegResult<T> = Result<T, RegistrationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        let err = RegistrationError::AlreadyRegistered {
            email: "a@example.com".to_string(),
            event: EventId::OpenMatNight,
        };
        assert_eq!(err.code(), "ALREADY_REGISTERED");
        assert!(!err.is_critical());

        let err = RegistrationError::PaymentIntentNotLocked(PaymentRef("pi_1".to_string()));
        assert_eq!(err.code(), "PAYMENT_INTENT_NOT_LOCKED");
        assert!(err.is_critical());
    }

    #[test]
    fn test_payment_not_completed_is_not_critical() {
        let err = RegistrationError::PaymentNotCompleted {
            payment_ref: PaymentRef("pi_1".to_string()),
            status: crate::payment::AuthorizationStatus::Processing,
        };
        assert!(!err.is_critical());
    }
}
