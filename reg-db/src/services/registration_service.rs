//! Registration orchestrator.
//!
//! Creation path: validate, de-duplicate, authorize externally, then
//! commit the registration and its lockdown binding in one transaction.
//! Verification path: read the processor's authoritative status, advance
//! the bound registration, idempotent under repeated delivery.
//!
//! The orchestrator holds no state of its own; every collaborator comes
//! in through a trait so tests substitute fakes.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use reg_core::checksum::{self, ChecksumInput};
use reg_core::constants::CURRENCY;
use reg_core::ledger::{LockdownLedger, RegistrationStore};
use reg_core::logging::operations;
use reg_core::notify::CompletionNotifier;
use reg_core::payment::{
    AuthorizationMetadata, AuthorizationStatus, CreateAuthorization, PaymentProcessor,
};
use reg_core::types::{
    ClientContext, CorrelationId, CriticalErrorCode, CriticalErrorEntry, PaymentIntentLockdown,
    PaymentRef, PaymentStatus, Registration, RegistrationPayload,
};
use reg_core::validate;
use reg_core::{RegResult, RegistrationError, StoreError};

use crate::services::CriticalErrorRecorder;

/// Outcome of the creation path: the correlation id plus whatever the
/// client needs to complete payment externally.
#[derive(Debug, Clone)]
pub struct CreatedRegistration {
    pub correlation_id: CorrelationId,
    pub payment_ref: PaymentRef,
    /// Client-facing payment handle. Absent for free registrations,
    /// which have nothing left to pay.
    pub client_secret: Option<String>,
    pub amount_cents: i64,
    pub currency: String,
    pub payment_status: PaymentStatus,
}

/// Outcome of the verification path.
#[derive(Debug, Clone)]
pub struct VerifiedRegistration {
    pub registration: Registration,
    /// Whether this call performed the transition. Completion side
    /// effects are gated on this, not on "verification was called".
    pub newly_succeeded: bool,
}

pub struct RegistrationService {
    store: Arc<dyn RegistrationStore>,
    lockdowns: Arc<dyn LockdownLedger>,
    processor: Arc<dyn PaymentProcessor>,
    notifier: Arc<dyn CompletionNotifier>,
    errors: CriticalErrorRecorder,
}

impl RegistrationService {
    pub fn new(
        store: Arc<dyn RegistrationStore>,
        lockdowns: Arc<dyn LockdownLedger>,
        processor: Arc<dyn PaymentProcessor>,
        notifier: Arc<dyn CompletionNotifier>,
        errors: CriticalErrorRecorder,
    ) -> Self {
        Self {
            store,
            lockdowns,
            processor,
            notifier,
            errors,
        }
    }

    /// Create a registration: validate, de-duplicate, authorize, commit.
    pub async fn create_registration(
        &self,
        payload: RegistrationPayload,
        origin: ClientContext,
    ) -> RegResult<CreatedRegistration> {
        // The correlation id exists before any I/O so every failure below
        // has something to log against.
        let correlation_id = CorrelationId::generate();

        let valid = match validate::validate(&payload) {
            Ok(valid) => valid,
            Err(violations) => {
                debug!(
                    correlation_id = %correlation_id,
                    operation = operations::REGISTER,
                    count = violations.len(),
                    "payload rejected by validation gate"
                );
                return Err(RegistrationError::ValidationFailed(violations));
            }
        };

        // Duplicate check before any external call, so a rejected attempt
        // never leaves an orphaned authorization behind.
        if let Some(existing) = self
            .store
            .find_by_email_event(&valid.email, valid.event)
            .await?
        {
            self.errors
                .record(
                    CriticalErrorEntry::new(
                        CriticalErrorCode::DuplicateRegistrationAttempt,
                        format!(
                            "second registration attempt for {} at {}",
                            valid.email, valid.event
                        ),
                    )
                    .with_correlation_id(correlation_id.clone())
                    .with_email(valid.email.clone())
                    .with_event(valid.event)
                    .with_system_note(format!(
                        "existing registration {}",
                        existing.correlation_id
                    )),
                )
                .await;
            warn!(
                correlation_id = %correlation_id,
                operation = operations::REGISTER,
                event = %valid.event,
                "duplicate registration attempt"
            );
            return Err(RegistrationError::AlreadyRegistered {
                email: valid.email,
                event: valid.event,
            });
        }

        // The locked price comes from the catalog, never from the client.
        let locked_price_cents = valid.event.price_cents();
        let now = Utc::now();

        let (payment_ref, client_secret, payment_status, completed_at) = if locked_price_cents == 0
        {
            // Free-registration exception: no external authorization, a
            // clearly-tagged synthetic reference, immediately succeeded.
            (
                PaymentRef::synthetic(&correlation_id),
                None,
                PaymentStatus::Succeeded,
                Some(now),
            )
        } else {
            let request = CreateAuthorization {
                amount_cents: locked_price_cents,
                currency: CURRENCY.to_string(),
                metadata: AuthorizationMetadata {
                    correlation_id: correlation_id.clone(),
                    event: valid.event,
                    email: valid.email.clone(),
                    participant: format!("{} {}", valid.first_name, valid.last_name),
                },
            };
            match self.processor.create_authorization(&request).await {
                Ok(authorization) => (
                    authorization.payment_ref,
                    Some(authorization.client_secret),
                    PaymentStatus::Created,
                    None,
                ),
                Err(e) => {
                    self.errors
                        .record(
                            CriticalErrorEntry::new(
                                CriticalErrorCode::RegistrationCreationFailed,
                                format!("payment authorization failed: {}", e),
                            )
                            .with_correlation_id(correlation_id.clone())
                            .with_email(valid.email.clone())
                            .with_event(valid.event)
                            .with_request_payload(payload),
                        )
                        .await;
                    error!(
                        correlation_id = %correlation_id,
                        operation = operations::REGISTER,
                        error = %e,
                        "payment authorization failed"
                    );
                    return Err(RegistrationError::RegistrationCreationFailed(
                        "payment authorization could not be created".to_string(),
                    ));
                }
            }
        };

        let checksum = checksum::compute(&ChecksumInput {
            first_name: &valid.first_name,
            last_name: &valid.last_name,
            email: &valid.email,
            payment_ref: &payment_ref,
            event: valid.event,
            locked_price_cents,
        });

        let registration = Registration {
            correlation_id: correlation_id.clone(),
            payment_ref: payment_ref.clone(),
            event: valid.event,
            locked_price_cents,
            first_name: valid.first_name,
            last_name: valid.last_name,
            email: valid.email,
            phone: valid.phone,
            age: valid.age,
            grade: valid.grade,
            gender: valid.gender,
            shirt_size: valid.shirt_size,
            experience: valid.experience,
            guardian_name: valid.guardian_name,
            guardian_phone: valid.guardian_phone,
            payment_status,
            checksum,
            created_at: now,
            completed_at,
            origin: origin.clone(),
        };
        let lockdown = PaymentIntentLockdown::bind(
            payment_ref.clone(),
            correlation_id.clone(),
            locked_price_cents,
            CURRENCY,
            valid.event,
            payment_status,
            client_secret.as_deref(),
            origin,
            now,
        );

        if let Err(e) = self.store.insert_with_lockdown(&registration, &lockdown).await {
            return Err(self.creation_failed(e, &registration, payload).await);
        }

        info!(
            correlation_id = %correlation_id,
            operation = operations::REGISTER,
            event = %registration.event,
            status = %registration.payment_status,
            "registration created"
        );

        if registration.payment_status == PaymentStatus::Succeeded {
            self.notify_succeeded(&registration).await;
        }

        Ok(CreatedRegistration {
            correlation_id,
            payment_ref,
            client_secret,
            amount_cents: locked_price_cents,
            currency: CURRENCY.to_string(),
            payment_status,
        })
    }

    /// Translate a failed creation transaction, recording the anomaly.
    async fn creation_failed(
        &self,
        e: StoreError,
        registration: &Registration,
        payload: RegistrationPayload,
    ) -> RegistrationError {
        match e {
            // Lost the (email, event) race: a concurrent attempt
            // committed first. Same outcome as the pre-check.
            StoreError::Conflict { ref constraint } if constraint.contains("email") => {
                self.errors
                    .record(
                        CriticalErrorEntry::new(
                            CriticalErrorCode::DuplicateRegistrationAttempt,
                            format!(
                                "lost creation race for {} at {}",
                                registration.email, registration.event
                            ),
                        )
                        .with_correlation_id(registration.correlation_id.clone())
                        .with_email(registration.email.clone())
                        .with_event(registration.event)
                        .with_system_note(format!("constraint: {}", constraint)),
                    )
                    .await;
                RegistrationError::AlreadyRegistered {
                    email: registration.email.clone(),
                    event: registration.event,
                }
            }
            other => {
                self.errors
                    .record(
                        CriticalErrorEntry::new(
                            CriticalErrorCode::RegistrationCreationFailed,
                            format!("creation transaction failed: {}", other),
                        )
                        .with_correlation_id(registration.correlation_id.clone())
                        .with_payment_ref(registration.payment_ref.clone())
                        .with_event(registration.event)
                        .with_request_payload(payload),
                    )
                    .await;
                error!(
                    correlation_id = %registration.correlation_id,
                    operation = operations::REGISTER,
                    error = %other,
                    "creation transaction failed"
                );
                RegistrationError::RegistrationCreationFailed(
                    "registration could not be committed".to_string(),
                )
            }
        }
    }

    /// Verify a payment and advance the bound registration.
    ///
    /// Safe to call any number of times: repeated verification of an
    /// already-succeeded registration is a no-op.
    pub async fn verify_payment(&self, payment_ref: &PaymentRef) -> RegResult<VerifiedRegistration> {
        // The processor is the source of truth. Free registrations have
        // no processor object; their synthetic reference is succeeded by
        // construction.
        let status = if payment_ref.is_synthetic() {
            AuthorizationStatus::Succeeded
        } else {
            match self.processor.retrieve_status(payment_ref).await {
                Ok(status) => status,
                Err(e) => {
                    self.errors
                        .record(
                            CriticalErrorEntry::new(
                                CriticalErrorCode::VerificationFailure,
                                format!("processor status lookup failed: {}", e),
                            )
                            .with_payment_ref(payment_ref.clone()),
                        )
                        .await;
                    return Err(RegistrationError::Payment(e));
                }
            }
        };

        if status.is_failed() {
            // Terminal on the processor side; record the failure locally
            // when a binding exists, then report the expected state.
            if let Some(lockdown) = self.lockdowns.find(payment_ref).await? {
                let failed = self.store.mark_failed(&lockdown.correlation_id).await?;
                info!(
                    correlation_id = %failed.correlation_id,
                    operation = operations::VERIFY,
                    payment_ref = %payment_ref,
                    "registration marked failed"
                );
            }
            return Err(RegistrationError::PaymentNotCompleted {
                payment_ref: payment_ref.clone(),
                status,
            });
        }

        if !status.is_succeeded() {
            // Expected while the registrant completes checkout; not an
            // anomaly and nothing is logged as critical.
            return Err(RegistrationError::PaymentNotCompleted {
                payment_ref: payment_ref.clone(),
                status,
            });
        }

        // A succeeded charge is only accepted through its binding. With
        // no lockdown row there is no way to know which registration the
        // money belongs to - fail closed.
        let lockdown = match self.lockdowns.find(payment_ref).await? {
            Some(lockdown) => lockdown,
            None => {
                self.errors
                    .record(
                        CriticalErrorEntry::new(
                            CriticalErrorCode::PaymentIntentNotLocked,
                            format!("succeeded charge {} has no lockdown binding", payment_ref),
                        )
                        .with_payment_ref(payment_ref.clone()),
                    )
                    .await;
                error!(
                    operation = operations::VERIFY,
                    payment_ref = %payment_ref,
                    "succeeded charge has no lockdown binding"
                );
                return Err(RegistrationError::PaymentIntentNotLocked(payment_ref.clone()));
            }
        };

        let registration = match self
            .store
            .find_by_correlation_id(&lockdown.correlation_id)
            .await?
        {
            Some(registration) => registration,
            None => {
                self.errors
                    .record(
                        CriticalErrorEntry::new(
                            CriticalErrorCode::CorrelationMismatch,
                            format!(
                                "lockdown for {} is bound to missing registration {}",
                                payment_ref, lockdown.correlation_id
                            ),
                        )
                        .with_correlation_id(lockdown.correlation_id.clone())
                        .with_payment_ref(payment_ref.clone()),
                    )
                    .await;
                return Err(RegistrationError::CorrelationMismatch {
                    payment_ref: payment_ref.clone(),
                    detail: "lockdown is bound to a registration that does not exist".to_string(),
                });
            }
        };

        // Never mutate data belonging to a different binding than the one
        // made at creation time.
        if registration.payment_ref != *payment_ref {
            self.errors
                .record(
                    CriticalErrorEntry::new(
                        CriticalErrorCode::CorrelationMismatch,
                        format!(
                            "registration {} is bound to {} but was verified with {}",
                            registration.correlation_id, registration.payment_ref, payment_ref
                        ),
                    )
                    .with_correlation_id(registration.correlation_id.clone())
                    .with_payment_ref(payment_ref.clone()),
                )
                .await;
            error!(
                correlation_id = %registration.correlation_id,
                operation = operations::VERIFY,
                payment_ref = %payment_ref,
                "payment reference does not match the creation-time binding"
            );
            return Err(RegistrationError::CorrelationMismatch {
                payment_ref: payment_ref.clone(),
                detail: "registration is bound to a different payment reference".to_string(),
            });
        }

        if registration.payment_status == PaymentStatus::Succeeded {
            debug!(
                correlation_id = %registration.correlation_id,
                operation = operations::VERIFY,
                "already succeeded; verification is a no-op"
            );
            return Ok(VerifiedRegistration {
                registration,
                newly_succeeded: false,
            });
        }

        if registration.payment_status == PaymentStatus::Failed {
            self.errors
                .record(
                    CriticalErrorEntry::new(
                        CriticalErrorCode::VerificationFailure,
                        format!(
                            "succeeded charge {} reported for failed registration {}",
                            payment_ref, registration.correlation_id
                        ),
                    )
                    .with_correlation_id(registration.correlation_id.clone())
                    .with_payment_ref(payment_ref.clone()),
                )
                .await;
            return Err(RegistrationError::Store(StoreError::conflict(
                "registrations.payment_status",
            )));
        }

        let updated = self
            .store
            .mark_succeeded(&registration.correlation_id, Utc::now())
            .await?;
        info!(
            correlation_id = %updated.correlation_id,
            operation = operations::VERIFY,
            event = %updated.event,
            "payment verified; registration succeeded"
        );

        self.notify_succeeded(&updated).await;

        Ok(VerifiedRegistration {
            registration: updated,
            newly_succeeded: true,
        })
    }

    /// Read a registration back out.
    pub async fn get_registration(&self, correlation_id: &CorrelationId) -> RegResult<Registration> {
        self.store
            .find_by_correlation_id(correlation_id)
            .await?
            .ok_or_else(|| RegistrationError::NotFound(correlation_id.to_string()))
    }

    /// Fire completion collaborators. Their failure is logged and never
    /// rolls back the registration.
    async fn notify_succeeded(&self, registration: &Registration) {
        if let Err(e) = self.notifier.registration_succeeded(registration).await {
            self.errors
                .record(
                    CriticalErrorEntry::new(
                        CriticalErrorCode::NotificationFailure,
                        format!("completion notifier failed: {}", e),
                    )
                    .with_correlation_id(registration.correlation_id.clone())
                    .with_event(registration.event),
                )
                .await;
            warn!(
                correlation_id = %registration.correlation_id,
                operation = operations::NOTIFY,
                error = %e,
                "completion notifier failed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use reg_core::ledger::{CriticalErrorLedger, LockdownLedger, QueryOptions, RegistrationStore};
    use reg_core::payment::AuthorizationStatus;
    use reg_core::types::{ClientContext, CriticalErrorCode, PaymentRef, PaymentStatus};
    use reg_core::RegistrationError;
    use rusqlite::params;

    use crate::services::testutil::{harness, payload};

    #[tokio::test]
    async fn test_create_and_verify_flow() {
        let h = harness();

        let created = h
            .service
            .create_registration(
                payload("jordan.hale@example.com", "birmingham-slam-camp"),
                ClientContext {
                    source_ip: Some("203.0.113.9".to_string()),
                    user_agent: Some("integration-test".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(created.amount_cents, 24_900);
        assert_eq!(created.payment_status, PaymentStatus::Created);
        assert!(created.client_secret.is_some());
        assert_eq!(h.registrations.count().await.unwrap(), 1);

        // The lockdown binds the reference to this correlation id.
        let lockdown = h.lockdowns.find(&created.payment_ref).await.unwrap().unwrap();
        assert_eq!(lockdown.correlation_id, created.correlation_id);
        assert_eq!(lockdown.amount_cents, 24_900);

        // Not completed yet: expected non-critical outcome.
        let err = h.service.verify_payment(&created.payment_ref).await.unwrap_err();
        assert!(matches!(err, RegistrationError::PaymentNotCompleted { .. }));

        // Registrant completes checkout; verification advances the row.
        h.processor.complete(&created.payment_ref);
        let verified = h.service.verify_payment(&created.payment_ref).await.unwrap();
        assert!(verified.newly_succeeded);
        assert_eq!(
            verified.registration.payment_status,
            PaymentStatus::Succeeded
        );
        assert!(verified.registration.completed_at.is_some());
        assert_eq!(h.notifier.calls.load(Ordering::SeqCst), 1);

        // Idempotent re-delivery: same state, no duplicated side effects.
        let again = h.service.verify_payment(&created.payment_ref).await.unwrap();
        assert!(!again.newly_succeeded);
        assert_eq!(again.registration.payment_status, PaymentStatus::Succeeded);
        assert_eq!(h.notifier.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_duplicate_returns_already_registered() {
        let h = harness();
        let p = payload("dup@example.com", "birmingham-slam-camp");

        h.service
            .create_registration(p.clone(), ClientContext::default())
            .await
            .unwrap();
        let err = h
            .service
            .create_registration(p, ClientContext::default())
            .await
            .unwrap_err();

        assert!(matches!(err, RegistrationError::AlreadyRegistered { .. }));
        assert_eq!(h.registrations.count().await.unwrap(), 1);

        let entries = h.errors.list_unresolved(QueryOptions::default()).await.unwrap();
        assert!(entries
            .iter()
            .any(|e| e.code == CriticalErrorCode::DuplicateRegistrationAttempt));
    }

    #[tokio::test]
    async fn test_near_simultaneous_duplicates_have_one_winner() {
        let h = harness();
        let p = payload("race@example.com", "national-champ-camp");

        let (a, b) = tokio::join!(
            h.service
                .create_registration(p.clone(), ClientContext::default()),
            h.service
                .create_registration(p.clone(), ClientContext::default()),
        );

        let ok_count = [&a, &b].iter().filter(|r| r.is_ok()).count();
        assert_eq!(ok_count, 1, "exactly one attempt must win");
        for result in [a, b] {
            if let Err(err) = result {
                assert!(matches!(err, RegistrationError::AlreadyRegistered { .. }));
            }
        }
        assert_eq!(h.registrations.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_free_registration_skips_processor() {
        let h = harness();

        let created = h
            .service
            .create_registration(
                payload("free@example.com", "open-mat-night"),
                ClientContext::default(),
            )
            .await
            .unwrap();

        assert_eq!(created.amount_cents, 0);
        assert_eq!(created.payment_status, PaymentStatus::Succeeded);
        assert!(created.client_secret.is_none());
        assert!(created.payment_ref.is_synthetic());
        // No external authorization was ever requested.
        assert_eq!(h.processor.created_count(), 0);
        assert_eq!(h.notifier.calls.load(Ordering::SeqCst), 1);

        let stored = h
            .service
            .get_registration(&created.correlation_id)
            .await
            .unwrap();
        assert!(stored.completed_at.is_some());

        // Verification of the synthetic reference is an idempotent no-op.
        let verified = h.service.verify_payment(&created.payment_ref).await.unwrap();
        assert!(!verified.newly_succeeded);
        assert_eq!(h.notifier.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unlocked_succeeded_charge_fails_closed() {
        let h = harness();

        // A succeeded charge the local system never created.
        let rogue = PaymentRef("pi_rogue_401".to_string());
        h.processor
            .seed_external(&rogue, AuthorizationStatus::Succeeded);

        let err = h.service.verify_payment(&rogue).await.unwrap_err();
        assert!(matches!(err, RegistrationError::PaymentIntentNotLocked(_)));

        let entries = h.errors.list_unresolved(QueryOptions::default()).await.unwrap();
        assert!(entries
            .iter()
            .any(|e| e.code == CriticalErrorCode::PaymentIntentNotLocked));
    }

    #[tokio::test]
    async fn test_processor_failure_is_logged_with_payload() {
        let h = harness();
        h.processor.fail_next_create();

        let err = h
            .service
            .create_registration(
                payload("unlucky@example.com", "texas-recruiting-clinic"),
                ClientContext::default(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RegistrationError::RegistrationCreationFailed(_)));
        assert_eq!(h.registrations.count().await.unwrap(), 0);

        let entries = h.errors.list_unresolved(QueryOptions::default()).await.unwrap();
        let entry = entries
            .iter()
            .find(|e| e.code == CriticalErrorCode::RegistrationCreationFailed)
            .expect("creation failure entry");
        // Full payload preserved for forensic replay.
        let snapshot = entry.context.request_payload.as_ref().unwrap();
        assert_eq!(snapshot.email, "unlucky@example.com");
    }

    #[tokio::test]
    async fn test_hijacked_reference_is_rejected() {
        let h = harness();

        let created = h
            .service
            .create_registration(
                payload("victim@example.com", "birmingham-slam-camp"),
                ClientContext::default(),
            )
            .await
            .unwrap();

        // An attacker-controlled succeeded charge, rebound by force to
        // the victim's correlation id underneath the service.
        let foreign = PaymentRef("pi_attacker_999".to_string());
        h.processor
            .seed_external(&foreign, AuthorizationStatus::Succeeded);
        {
            let conn = h.store.connection();
            let conn = conn.lock().unwrap();
            conn.execute(
                "UPDATE payment_intent_lockdowns SET payment_ref = ?1 WHERE correlation_id = ?2",
                params![foreign.0, created.correlation_id.0],
            )
            .unwrap();
        }

        let err = h.service.verify_payment(&foreign).await.unwrap_err();
        assert!(matches!(err, RegistrationError::CorrelationMismatch { .. }));

        // The registration was not advanced.
        let stored = h
            .service
            .get_registration(&created.correlation_id)
            .await
            .unwrap();
        assert_eq!(stored.payment_status, PaymentStatus::Created);

        let entries = h.errors.list_unresolved(QueryOptions::default()).await.unwrap();
        assert!(entries
            .iter()
            .any(|e| e.code == CriticalErrorCode::CorrelationMismatch));
    }

    #[tokio::test]
    async fn test_canceled_charge_marks_registration_failed() {
        let h = harness();

        let created = h
            .service
            .create_registration(
                payload("cancel@example.com", "birmingham-slam-camp"),
                ClientContext::default(),
            )
            .await
            .unwrap();
        h.processor.cancel(&created.payment_ref);

        let err = h.service.verify_payment(&created.payment_ref).await.unwrap_err();
        assert!(matches!(err, RegistrationError::PaymentNotCompleted { .. }));

        let stored = h
            .service
            .get_registration(&created.correlation_id)
            .await
            .unwrap();
        assert_eq!(stored.payment_status, PaymentStatus::Failed);
        assert_eq!(h.notifier.calls.load(Ordering::SeqCst), 0);

        // The lockdown mirror followed.
        let lockdown = h.lockdowns.find(&created.payment_ref).await.unwrap().unwrap();
        assert_eq!(lockdown.status, PaymentStatus::Failed);
    }

    #[tokio::test]
    async fn test_notifier_failure_never_rolls_back() {
        let h = harness();
        h.notifier.fail.store(true, Ordering::SeqCst);

        let created = h
            .service
            .create_registration(
                payload("hooks@example.com", "birmingham-slam-camp"),
                ClientContext::default(),
            )
            .await
            .unwrap();
        h.processor.complete(&created.payment_ref);

        let verified = h.service.verify_payment(&created.payment_ref).await.unwrap();
        assert!(verified.newly_succeeded);
        assert_eq!(
            verified.registration.payment_status,
            PaymentStatus::Succeeded
        );

        let entries = h.errors.list_unresolved(QueryOptions::default()).await.unwrap();
        assert!(entries
            .iter()
            .any(|e| e.code == CriticalErrorCode::NotificationFailure));
    }

    #[tokio::test]
    async fn test_checksum_matches_after_creation_and_update() {
        let h = harness();

        let created = h
            .service
            .create_registration(
                payload("sum@example.com", "birmingham-slam-camp"),
                ClientContext::default(),
            )
            .await
            .unwrap();

        let stored = h
            .service
            .get_registration(&created.correlation_id)
            .await
            .unwrap();
        assert!(reg_core::checksum::verify(&stored));

        h.processor.complete(&created.payment_ref);
        h.service.verify_payment(&created.payment_ref).await.unwrap();

        let stored = h
            .service
            .get_registration(&created.correlation_id)
            .await
            .unwrap();
        assert!(reg_core::checksum::verify(&stored));
    }
}
