//! Payment-processor interface.
//!
//! The processor is a collaborator, never reimplemented: this module
//! defines the two operations the core consumes (create an authorization,
//! retrieve its status) behind a trait so the orchestrator can be wired
//! to the HTTP gateway in production and a mock in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::events::EventId;
use crate::types::{CorrelationId, PaymentRef};

/// Errors from the external payment processor.
#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("payment processor unavailable: {0}")]
    Unavailable(String),

    #[error("authorization declined: {0}")]
    Declined(String),

    #[error("unknown payment reference: {0}")]
    UnknownReference(String),

    #[error("unexpected processor response: {0}")]
    InvalidResponse(String),
}

pub type PaymentResult<T> = Result<T, PaymentError>;

/// Lifecycle states reported by the processor. The processor's ledger is
/// the source of truth; local state only mirrors it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationStatus {
    RequiresPayment,
    RequiresAction,
    Processing,
    Succeeded,
    Canceled,
}

impl AuthorizationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RequiresPayment => "requires_payment",
            Self::RequiresAction => "requires_action",
            Self::Processing => "processing",
            Self::Succeeded => "succeeded",
            Self::Canceled => "canceled",
        }
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    /// The charge can no longer complete.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Canceled)
    }
}

impl fmt::Display for AuthorizationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Metadata attached to every authorization so the registration
/// relationship is recoverable from the processor's side even if local
/// state is lost. A closed struct: nothing outside these fields is ever
/// attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationMetadata {
    pub correlation_id: CorrelationId,
    pub event: EventId,
    pub email: String,
    pub participant: String,
}

/// Request to create an external payment authorization.
#[derive(Debug, Clone)]
pub struct CreateAuthorization {
    pub amount_cents: i64,
    pub currency: String,
    pub metadata: AuthorizationMetadata,
}

/// A created authorization: the reference the lockdown binds, the
/// client-facing secret (stored only as a hash), and the initial status.
#[derive(Debug, Clone)]
pub struct PaymentAuthorization {
    pub payment_ref: PaymentRef,
    pub client_secret: String,
    pub status: AuthorizationStatus,
}

/// The processor operations the orchestrator consumes.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Create a new authorization for the locked amount.
    async fn create_authorization(
        &self,
        request: &CreateAuthorization,
    ) -> PaymentResult<PaymentAuthorization>;

    /// Fetch the authoritative status for a reference.
    async fn retrieve_status(&self, payment_ref: &PaymentRef)
        -> PaymentResult<AuthorizationStatus>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_predicates() {
        assert!(AuthorizationStatus::Succeeded.is_succeeded());
        assert!(!AuthorizationStatus::Processing.is_succeeded());
        assert!(AuthorizationStatus::Canceled.is_failed());
        assert!(!AuthorizationStatus::RequiresPayment.is_failed());
    }
}
