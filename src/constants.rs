//! Shared crate-wide constants for idshift.
//!
//! Centralizes magic values used across modules. Adjusting these here will
//! propagate through the crate.

/// UUIDv5 namespace tag for deterministic pass IDs.
/// Two passes over the same root with the same mapping share an ID, so fact
/// streams from a rerun can be correlated.
pub const NS_TAG: &str = "https://idshift/pass";

/// Descriptors assumed busy when sizing the walk's directory-handle budget:
/// stdin, stdout, and stderr.
pub const RESERVED_STDIO_FDS: u64 = 3;

/// Directory-handle budget used when RLIMIT_NOFILE cannot be determined.
pub const FALLBACK_FD_BUDGET: usize = 1;
