//! In-memory processor used by service and API tests.
//!
//! Authorizations are held in a map keyed by reference; the test drives
//! their lifecycle (`complete`, `cancel`) the way a registrant completing
//! checkout would. `seed_external` plants a reference the local system
//! never created, for exercising the unbound-charge anomaly path.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use reg_core::payment::{
    AuthorizationStatus, CreateAuthorization, PaymentAuthorization, PaymentError, PaymentProcessor,
    PaymentResult,
};
use reg_core::types::PaymentRef;

#[derive(Default)]
pub struct MockProcessor {
    intents: Mutex<HashMap<String, AuthorizationStatus>>,
    sequence: AtomicU64,
    fail_next_create: AtomicBool,
}

impl MockProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `create_authorization` call fail as unavailable.
    pub fn fail_next_create(&self) {
        self.fail_next_create.store(true, Ordering::SeqCst);
    }

    /// Simulate the registrant completing checkout.
    pub fn complete(&self, payment_ref: &PaymentRef) {
        self.set_status(payment_ref, AuthorizationStatus::Succeeded);
    }

    pub fn cancel(&self, payment_ref: &PaymentRef) {
        self.set_status(payment_ref, AuthorizationStatus::Canceled);
    }

    /// Plant an authorization the local system never created.
    pub fn seed_external(&self, payment_ref: &PaymentRef, status: AuthorizationStatus) {
        self.intents
            .lock()
            .expect("mock intents lock")
            .insert(payment_ref.0.clone(), status);
    }

    /// Number of authorizations created through the trait.
    pub fn created_count(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    fn set_status(&self, payment_ref: &PaymentRef, status: AuthorizationStatus) {
        let mut intents = self.intents.lock().expect("mock intents lock");
        intents.insert(payment_ref.0.clone(), status);
    }
}

#[async_trait]
impl PaymentProcessor for MockProcessor {
    async fn create_authorization(
        &self,
        _request: &CreateAuthorization,
    ) -> PaymentResult<PaymentAuthorization> {
        if self.fail_next_create.swap(false, Ordering::SeqCst) {
            return Err(PaymentError::Unavailable(
                "mock processor configured to fail".to_string(),
            ));
        }

        let n = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let entropy: u32 = rand::random();
        let id = format!("pi_mock_{:04}_{:08x}", n, entropy);
        let client_secret = format!("{}_secret_{:08x}", id, rand::random::<u32>());

        self.intents
            .lock()
            .expect("mock intents lock")
            .insert(id.clone(), AuthorizationStatus::RequiresPayment);

        Ok(PaymentAuthorization {
            payment_ref: PaymentRef(id),
            client_secret,
            status: AuthorizationStatus::RequiresPayment,
        })
    }

    async fn retrieve_status(
        &self,
        payment_ref: &PaymentRef,
    ) -> PaymentResult<AuthorizationStatus> {
        self.intents
            .lock()
            .expect("mock intents lock")
            .get(&payment_ref.0)
            .copied()
            .ok_or_else(|| PaymentError::UnknownReference(payment_ref.0.clone()))
    }
}
