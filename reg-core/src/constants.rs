//! Protocol constants shared across the workspace.

/// Currency every event is priced and charged in.
pub const CURRENCY: &str = "usd";

/// Version tag mixed into the checksum canonical string. Bump when the
/// canonical field set changes so old rows are flagged instead of
/// silently re-interpreted.
pub const CHECKSUM_VERSION: &str = "v1";

/// Request timeout for calls to the external payment processor.
pub const GATEWAY_TIMEOUT_SECS: u64 = 30;

/// Upper bound on processor-call retries. A single retry at most:
/// repeated blind retries of an authorization risk double-charging.
pub const GATEWAY_MAX_RETRIES: u32 = 1;

/// Participant age bounds accepted by the validation gate.
pub const MIN_AGE: u8 = 5;
pub const MAX_AGE: u8 = 18;

/// Minimum number of digits a phone number must carry.
pub const MIN_PHONE_DIGITS: usize = 10;
