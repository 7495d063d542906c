//! Fallback values applied when neither a flag nor an environment variable is set.
//!
//! # Design
//! - Keep every default in one place so the CLI help text and the config model agree.

/// Address used when none is supplied.
pub const DEFAULT_ADDRESS: &str = "127.0.0.1:9000";
/// Host substituted for port-only addresses such as `:9000`.
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Connection establishment deadline in seconds.
pub const DEFAULT_DIAL_TIMEOUT_SECS: u64 = 5;
/// Per-request deadline in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
