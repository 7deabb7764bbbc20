//! Domain types for registrations, lockdowns, and the critical error log.

mod common;
mod error_log;
mod lockdown;
mod registration;

pub use common::*;
pub use error_log::*;
pub use lockdown::*;
pub use registration::*;
