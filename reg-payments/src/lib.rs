//! Payment processor clients.
//!
//! Implements the `reg_core::payment::PaymentProcessor` seam twice:
//! - [`HttpPaymentGateway`]: the production HTTP client (bounded timeout,
//!   at most one retry)
//! - [`mock::MockProcessor`]: the in-memory substitute used by service
//!   and API tests

pub mod gateway;
pub mod mock;

pub use gateway::{GatewayConfig, HttpPaymentGateway};
