//! Stable exit codes for feedback CLI commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Command failed due to invalid config, an unavailable store, or other errors.
pub const INVALID: i32 = 1;
/// `feedback submit` input failed field validation; nothing was stored.
pub const REJECTED: i32 = 2;
/// `feedback submit` passed validation but the store refused the create.
pub const STORE_FAILED: i32 = 3;
