//! Persistence and services for the registration-to-payment correlation
//! system.
//!
//! Storage is SQLite. Every correctness guarantee lives in the schema:
//! uniqueness of (email, event), of the payment reference, and of the
//! lockdown binding are `UNIQUE` constraints, and the paired writes run
//! as single transactions, so concurrent attempts race safely - exactly
//! one wins, the loser observes a constraint violation.

pub mod repos;
pub mod schema;
pub mod services;
pub mod store;

pub use repos::{ErrorLogRepo, LockdownRepo, RegistrationRepo};
pub use services::{
    AuditReport, CorrelationAuditor, CorruptionFinding, CorruptionKind, CreatedRegistration,
    CriticalErrorRecorder, RegistrationService, VerifiedRegistration,
};
pub use store::SqliteStore;
