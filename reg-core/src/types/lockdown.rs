//! Payment-intent lockdown: the binding ledger entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::events::EventId;
use crate::types::{Checksum, ClientContext, CorrelationId, PaymentRef, PaymentStatus};

/// Binds one external payment reference to exactly one correlation id.
///
/// The binding is immutable once written: a payment reference is never
/// reassigned to a different correlation id. An attempt to do so is
/// evidence of a hijack and is rejected and logged, never repaired in
/// place. A reference must be bound here before any verification is
/// allowed to mark it succeeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentIntentLockdown {
    pub payment_ref: PaymentRef,
    pub correlation_id: CorrelationId,
    /// Amount the reference was authorized for, in minor units.
    pub amount_cents: i64,
    pub currency: String,
    pub event: EventId,
    /// Mirror of the external payment lifecycle, updated only by the
    /// verification path.
    pub status: PaymentStatus,
    /// SHA-256 of the client-facing secret. The secret itself is never
    /// stored; the hash suffices for tamper detection.
    pub client_secret_hash: Checksum,
    pub origin: ClientContext,
    pub created_at: DateTime<Utc>,
    pub status_updated_at: DateTime<Utc>,
}

impl PaymentIntentLockdown {
    /// Build the lockdown row created atomically with a registration.
    pub fn bind(
        payment_ref: PaymentRef,
        correlation_id: CorrelationId,
        amount_cents: i64,
        currency: impl Into<String>,
        event: EventId,
        status: PaymentStatus,
        client_secret: Option<&str>,
        origin: ClientContext,
        now: DateTime<Utc>,
    ) -> Self {
        let client_secret_hash = match client_secret {
            Some(secret) => Checksum::sha256(secret.as_bytes()),
            None => Checksum::zero(),
        };
        Self {
            payment_ref,
            correlation_id,
            amount_cents,
            currency: currency.into(),
            event,
            status,
            client_secret_hash,
            origin,
            created_at: now,
            status_updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_hashes_secret_but_never_stores_it() {
        let correlation = CorrelationId::generate();
        let lockdown = PaymentIntentLockdown::bind(
            PaymentRef("pi_abc".to_string()),
            correlation.clone(),
            24_900,
            "usd",
            EventId::BirminghamSlamCamp,
            PaymentStatus::Created,
            Some("pi_abc_secret_xyz"),
            ClientContext::default(),
            Utc::now(),
        );

        assert_eq!(
            lockdown.client_secret_hash,
            Checksum::sha256(b"pi_abc_secret_xyz")
        );
        let serialized = serde_json::to_string(&lockdown).unwrap();
        assert!(!serialized.contains("pi_abc_secret_xyz"));
    }

    #[test]
    fn test_bind_without_secret_uses_zero_hash() {
        let correlation = CorrelationId::generate();
        let lockdown = PaymentIntentLockdown::bind(
            PaymentRef::synthetic(&correlation),
            correlation,
            0,
            "usd",
            EventId::OpenMatNight,
            PaymentStatus::Succeeded,
            None,
            ClientContext::default(),
            Utc::now(),
        );
        assert!(lockdown.client_secret_hash.is_zero());
    }
}
