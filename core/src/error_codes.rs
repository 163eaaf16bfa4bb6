//! Stable error codes surfaced alongside human-readable messages.
//!
//! Codes are part of the public contract: front ends key retry/remediation
//! hints off them, so existing codes must never be renumbered.

pub const KEY_MALFORMED: &str = "RTDIFF_KEY_001";

pub const BUILD_KEY_ORDER: &str = "RTDIFF_BUILD_001";

pub const COMPARE_EMPTY_ROUTE: &str = "RTDIFF_CMP_001";
pub const COMPARE_UNDERFLOW: &str = "RTDIFF_CMP_002";
pub const COMPARE_LIMITS: &str = "RTDIFF_CMP_003";
pub const COMPARE_SINK: &str = "RTDIFF_CMP_004";
pub const COMPARE_INTERNAL: &str = "RTDIFF_CMP_005";
