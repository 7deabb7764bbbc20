//! Logging conventions.
//!
//! All crates log through `tracing` with structured fields. Key
//! information always goes into fields, not the message text:
//!
//! ```ignore
//! tracing::info!(
//!     correlation_id = %reg.correlation_id,
//!     operation = operations::REGISTER,
//!     event = %reg.event,
//!     "registration created"
//! );
//! ```
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Consistency breaches, ledger-write fallbacks |
//! | WARN  | Rejected attempts worth operator attention |
//! | INFO  | Registrations created/verified, audits completed |
//! | DEBUG | Operation parameters and intermediate decisions |

/// Standard field names.
pub mod fields {
    pub const CORRELATION_ID: &str = "correlation_id";
    pub const PAYMENT_REF: &str = "payment_ref";
    pub const EVENT: &str = "event";
    pub const OPERATION: &str = "operation";
    pub const ERROR: &str = "error";
    pub const CODE: &str = "code";
    pub const STATUS: &str = "status";
    pub const COUNT: &str = "count";
}

/// Operation names used in the `operation` field.
pub mod operations {
    pub const REGISTER: &str = "register";
    pub const VERIFY: &str = "verify";
    pub const AUDIT_SWEEP: &str = "audit_sweep";
    pub const AUDIT_RECORD: &str = "audit_record";
    pub const ERROR_APPEND: &str = "error_append";
    pub const ERROR_RESOLVE: &str = "error_resolve";
    pub const NOTIFY: &str = "notify";
}
