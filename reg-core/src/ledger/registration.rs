//! Registration store interface.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreResult;
use crate::events::EventId;
use crate::ledger::QueryOptions;
use crate::types::{CorrelationId, PaymentIntentLockdown, PaymentRef, Registration};

/// The atomic registration store.
#[async_trait]
pub trait RegistrationStore: Send + Sync {
    /// Insert a registration and its lockdown binding in one transaction.
    /// Either both rows commit or neither does. Uniqueness violations
    /// surface as [`StoreError::Conflict`](crate::StoreError::Conflict)
    /// carrying the constraint name.
    async fn insert_with_lockdown(
        &self,
        registration: &Registration,
        lockdown: &PaymentIntentLockdown,
    ) -> StoreResult<()>;

    async fn find_by_correlation_id(
        &self,
        correlation_id: &CorrelationId,
    ) -> StoreResult<Option<Registration>>;

    async fn find_by_payment_ref(
        &self,
        payment_ref: &PaymentRef,
    ) -> StoreResult<Option<Registration>>;

    /// Lookup by the (email, event) uniqueness key. `email` must already
    /// be normalized (lower-cased) by the validation gate.
    async fn find_by_email_event(
        &self,
        email: &str,
        event: EventId,
    ) -> StoreResult<Option<Registration>>;

    /// Advance the registration to `succeeded`, stamp the completion
    /// time, and mirror the status onto the lockdown row - one
    /// transaction. A no-op returning the stored row when it is already
    /// succeeded; refuses to resurrect a `failed` row.
    async fn mark_succeeded(
        &self,
        correlation_id: &CorrelationId,
        completed_at: DateTime<Utc>,
    ) -> StoreResult<Registration>;

    /// Advance the registration to `failed` and mirror the lockdown
    /// status. No-op when already failed; refuses to regress `succeeded`.
    async fn mark_failed(&self, correlation_id: &CorrelationId) -> StoreResult<Registration>;

    async fn list(&self, options: QueryOptions) -> StoreResult<Vec<Registration>>;

    async fn count(&self) -> StoreResult<u64>;
}
