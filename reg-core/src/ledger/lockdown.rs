//! Lockdown ledger interface.
//!
//! Lockdown rows are only ever created through
//! [`RegistrationStore::insert_with_lockdown`](super::RegistrationStore::insert_with_lockdown)
//! and only ever advanced through the paired status updates, so this
//! interface is read-only: the binding itself is immutable.

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::ledger::QueryOptions;
use crate::types::{PaymentIntentLockdown, PaymentRef};

#[async_trait]
pub trait LockdownLedger: Send + Sync {
    async fn find(&self, payment_ref: &PaymentRef) -> StoreResult<Option<PaymentIntentLockdown>>;

    async fn list(&self, options: QueryOptions) -> StoreResult<Vec<PaymentIntentLockdown>>;

    async fn count(&self) -> StoreResult<u64>;
}
