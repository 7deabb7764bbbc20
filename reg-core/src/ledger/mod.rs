//! Store and ledger interfaces.
//!
//! Three stores back the correlation system:
//! - Registration store: the registration rows themselves, uniquely keyed
//!   by (email, event) and by payment reference
//! - Lockdown ledger: the payment-reference-to-correlation-id bindings
//! - Critical error ledger: the append-only anomaly record
//!
//! All correctness guarantees come from the storage layer, not from
//! in-process locking: implementations must enforce the uniqueness
//! constraints and provide insert-or-fail-on-conflict semantics, and the
//! paired writes (`insert_with_lockdown`, `mark_succeeded`) must commit
//! or roll back as a unit.

mod error_log;
mod lockdown;
mod registration;

pub use error_log::*;
pub use lockdown::*;
pub use registration::*;

/// Query options for list operations.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}
