//! JSON-over-HTTP surface for the registration-to-payment correlation
//! system.
//!
//! ## Endpoints
//!
//! ### Registration
//! - POST /api/v1/registrations - Create registration + payment intent
//! - POST /api/v1/registrations/verify - Verify a payment reference
//! - GET  /api/v1/registrations/:correlation_id - Read back + integrity flag
//!
//! ### Operations
//! - GET  /api/v1/audit - Full correlation audit sweep
//! - GET  /api/v1/errors/unresolved - Unresolved critical error entries
//! - POST /api/v1/errors/:entry_id/resolve - Mark an entry resolved
//!
//! ### Health
//! - GET /health, GET /ready
//!
//! Every error response carries a stable machine-readable `code` beside
//! the human message. Critical failures surface as a generic message;
//! their detail lives in the critical error ledger only.

pub mod dto;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use server::{create_server, run_server, start_background_server};
pub use state::{ApiConfig, AppState};
