//! Core contracts for the registration-to-payment correlation system.
//!
//! This crate defines the domain model and the interfaces the rest of the
//! workspace is built against:
//! - Typed entities: registrations, payment-intent lockdowns, critical
//!   error entries
//! - The error taxonomy and stable machine codes
//! - The integrity checksum over the canonical identity + payment fields
//! - The validation gate for raw registration payloads
//! - The closed event catalog with its locked price table
//! - Store/ledger traits implemented by the persistence crate
//! - The payment-processor and completion-notifier seams

pub mod checksum;
pub mod constants;
pub mod error;
pub mod events;
pub mod ledger;
pub mod logging;
pub mod notify;
pub mod payment;
pub mod types;
pub mod validate;

pub use error::{RegResult, RegistrationError, StoreError, StoreResult};
pub use events::EventId;
pub use types::*;
