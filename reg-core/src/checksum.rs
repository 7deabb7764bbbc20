//! Integrity checksum over the canonical registration field set.
//!
//! The canonical set is the immutable identity + payment binding: first
//! name, last name, email, payment reference, event, locked price.
//! Volatile fields (timestamps, payment status) are deliberately
//! excluded, so legitimate status advances never change the checksum.

use crate::constants::CHECKSUM_VERSION;
use crate::events::EventId;
use crate::types::{Checksum, PaymentRef, Registration};

/// Borrowed view of the canonical fields, usable before a full
/// [`Registration`] row exists.
#[derive(Debug, Clone, Copy)]
pub struct ChecksumInput<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub payment_ref: &'a PaymentRef,
    pub event: EventId,
    pub locked_price_cents: i64,
}

/// Compute the checksum over the canonical field set.
pub fn compute(input: &ChecksumInput<'_>) -> Checksum {
    let canonical = format!(
        "{}|{}|{}|{}|{}|{}|{}",
        CHECKSUM_VERSION,
        input.first_name,
        input.last_name,
        input.email,
        input.payment_ref,
        input.event,
        input.locked_price_cents,
    );
    Checksum::sha256(canonical.as_bytes())
}

/// Recompute the checksum from a stored registration.
pub fn for_registration(reg: &Registration) -> Checksum {
    compute(&ChecksumInput {
        first_name: &reg.first_name,
        last_name: &reg.last_name,
        email: &reg.email,
        payment_ref: &reg.payment_ref,
        event: reg.event,
        locked_price_cents: reg.locked_price_cents,
    })
}

/// Whether the stored checksum still matches a fresh recomputation.
pub fn verify(reg: &Registration) -> bool {
    for_registration(reg) == reg.checksum
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClientContext, CorrelationId, Gender, Grade};
    use crate::types::{Experience, PaymentStatus, ShirtSize};
    use chrono::Utc;

    fn sample_registration() -> Registration {
        let correlation_id = CorrelationId::generate();
        let payment_ref = PaymentRef("pi_test_123".to_string());
        let checksum = compute(&ChecksumInput {
            first_name: "Jordan",
            last_name: "Hale",
            email: "jordan.hale@example.com",
            payment_ref: &payment_ref,
            event: EventId::BirminghamSlamCamp,
            locked_price_cents: 24_900,
        });
        Registration {
            correlation_id,
            payment_ref,
            event: EventId::BirminghamSlamCamp,
            locked_price_cents: 24_900,
            first_name: "Jordan".to_string(),
            last_name: "Hale".to_string(),
            email: "jordan.hale@example.com".to_string(),
            phone: "205-555-0142".to_string(),
            age: 14,
            grade: Grade::G8,
            gender: Gender::Male,
            shirt_size: ShirtSize::AdultSmall,
            experience: Experience::Intermediate,
            guardian_name: "Casey Hale".to_string(),
            guardian_phone: "205-555-0143".to_string(),
            payment_status: PaymentStatus::Created,
            checksum,
            created_at: Utc::now(),
            completed_at: None,
            origin: ClientContext::default(),
        }
    }

    #[test]
    fn test_checksum_is_stable() {
        let reg = sample_registration();
        assert!(verify(&reg));
        assert_eq!(for_registration(&reg), for_registration(&reg));
    }

    #[test]
    fn test_status_change_does_not_affect_checksum() {
        let mut reg = sample_registration();
        reg.payment_status = PaymentStatus::Succeeded;
        reg.completed_at = Some(Utc::now());
        assert!(verify(&reg));
    }

    #[test]
    fn test_identity_drift_is_detected() {
        let mut reg = sample_registration();
        reg.email = "someone.else@example.com".to_string();
        assert!(!verify(&reg));

        let mut reg = sample_registration();
        reg.locked_price_cents = 100;
        assert!(!verify(&reg));

        let mut reg = sample_registration();
        reg.payment_ref = PaymentRef("pi_other".to_string());
        assert!(!verify(&reg));
    }
}
