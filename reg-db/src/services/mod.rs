//! Service layer: the registration orchestrator, the correlation
//! auditor, and the critical error recorder.

mod audit_service;
mod error_log_service;
mod registration_service;

pub use audit_service::{AuditReport, CorrelationAuditor, CorruptionFinding, CorruptionKind};
pub use error_log_service::CriticalErrorRecorder;
pub use registration_service::{CreatedRegistration, RegistrationService, VerifiedRegistration};

#[cfg(test)]
pub(crate) mod testutil {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use reg_core::notify::{CompletionNotifier, NotifyError};
    use reg_core::types::{Registration, RegistrationPayload};
    use reg_payments::mock::MockProcessor;

    use crate::repos::{ErrorLogRepo, LockdownRepo, RegistrationRepo};
    use crate::services::{CorrelationAuditor, CriticalErrorRecorder, RegistrationService};
    use crate::store::SqliteStore;

    /// Completion notifier that counts invocations and can be told to
    /// fail, for exercising the log-but-never-roll-back contract.
    #[derive(Default)]
    pub(crate) struct RecordingNotifier {
        pub calls: AtomicUsize,
        pub fail: AtomicBool,
    }

    #[async_trait]
    impl CompletionNotifier for RecordingNotifier {
        async fn registration_succeeded(
            &self,
            _registration: &Registration,
        ) -> Result<(), NotifyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(NotifyError::Failed("recording notifier told to fail".into()));
            }
            Ok(())
        }
    }

    pub(crate) struct TestHarness {
        pub service: RegistrationService,
        pub auditor: CorrelationAuditor,
        pub store: SqliteStore,
        pub registrations: Arc<RegistrationRepo>,
        pub lockdowns: Arc<LockdownRepo>,
        pub errors: Arc<ErrorLogRepo>,
        pub processor: Arc<MockProcessor>,
        pub notifier: Arc<RecordingNotifier>,
    }

    pub(crate) fn harness() -> TestHarness {
        let store = SqliteStore::open_in_memory().expect("in-memory store");
        let registrations = Arc::new(RegistrationRepo::new(store.clone()));
        let lockdowns = Arc::new(LockdownRepo::new(store.clone()));
        let errors = Arc::new(ErrorLogRepo::new(store.clone()));
        let processor = Arc::new(MockProcessor::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let recorder = CriticalErrorRecorder::new(errors.clone());

        let service = RegistrationService::new(
            registrations.clone(),
            lockdowns.clone(),
            processor.clone(),
            notifier.clone(),
            recorder.clone(),
        );
        let auditor =
            CorrelationAuditor::new(registrations.clone(), lockdowns.clone(), recorder);

        TestHarness {
            service,
            auditor,
            store,
            registrations,
            lockdowns,
            errors,
            processor,
            notifier,
        }
    }

    pub(crate) fn payload(email: &str, event: &str) -> RegistrationPayload {
        RegistrationPayload {
            first_name: "Jordan".to_string(),
            last_name: "Hale".to_string(),
            email: email.to_string(),
            phone: "(205) 555-0142".to_string(),
            age: Some(14),
            grade: "8".to_string(),
            gender: "male".to_string(),
            shirt_size: "am".to_string(),
            experience: "intermediate".to_string(),
            guardian_name: "Casey Hale".to_string(),
            guardian_phone: "205-555-0143".to_string(),
            event: event.to_string(),
            amount: None,
        }
    }
}
