//! Diff entries, reports, and errors for route comparison.
//!
//! This module defines the types the engine emits:
//! - [`DiffEntry`]: classification of a single reconciled key
//! - [`CompareReport`]: a versioned collection of entries plus summary tallies
//! - [`CompareError`]: errors that abort a comparison run

use crate::equality::DiffMask;
use crate::error_codes;
use crate::opkey::OpKey;
use crate::route::{Operation, OperationSignature};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which input route an error or entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteSide {
    Rte,
    Sm,
}

impl std::fmt::Display for RouteSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteSide::Rte => f.write_str("RTE"),
            RouteSide::Sm => f.write_str("SM"),
        }
    }
}

/// Errors produced by the comparison APIs.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompareError {
    #[error(
        "[RTDIFF_CMP_001] {side} route '{route_id}' has no operations. Suggestion: the loader should have rejected an unreadable report."
    )]
    EmptyRoute { side: RouteSide, route_id: String },

    #[error(
        "[RTDIFF_CMP_002] realignment scan ran off the end of the {side} route while seeking key {target}: ascending-key invariant violated upstream"
    )]
    AlignmentUnderflow { side: RouteSide, target: OpKey },

    #[error(
        "[RTDIFF_CMP_003] {side} route has {operations} operations (limit: {max_operations}). Suggestion: raise `max_route_operations`."
    )]
    LimitsExceeded {
        side: RouteSide,
        operations: usize,
        max_operations: u32,
    },

    #[error("[RTDIFF_CMP_004] sink error: {message}. Suggestion: check the output destination and retry.")]
    SinkError { message: String },

    #[error("[RTDIFF_CMP_005] internal error: {message}. Suggestion: report a bug with the input routes if possible.")]
    InternalError { message: String },
}

impl CompareError {
    pub fn code(&self) -> &'static str {
        match self {
            CompareError::EmptyRoute { .. } => error_codes::COMPARE_EMPTY_ROUTE,
            CompareError::AlignmentUnderflow { .. } => error_codes::COMPARE_UNDERFLOW,
            CompareError::LimitsExceeded { .. } => error_codes::COMPARE_LIMITS,
            CompareError::SinkError { .. } => error_codes::COMPARE_SINK,
            CompareError::InternalError { .. } => error_codes::COMPARE_INTERNAL,
        }
    }
}

/// Classification of one reconciled key.
///
/// Exactly one entry is emitted for every key present in either input route;
/// entries appear in ascending key order as driven by the cursor walk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
#[non_exhaustive]
pub enum DiffEntry {
    /// Key present on both sides, operations equal.
    Equal { key: OpKey },
    /// Key present on both sides, operations differ.
    ///
    /// `mask` is present when both operations have the same row count;
    /// a row-count mismatch carries no per-cell detail.
    Different {
        key: OpKey,
        left: Operation,
        right: Operation,
        #[serde(skip_serializing_if = "Option::is_none")]
        mask: Option<DiffMask>,
    },
    /// Key present only in the RTE route.
    ExtraLeft {
        key: OpKey,
        operation: Operation,
        #[serde(skip_serializing_if = "Option::is_none")]
        signature: Option<OperationSignature>,
    },
    /// Key present only in the SM route.
    ExtraRight {
        key: OpKey,
        operation: Operation,
        #[serde(skip_serializing_if = "Option::is_none")]
        signature: Option<OperationSignature>,
    },
    /// Difference detected but suppressed by baseline agreement.
    Neutralized {
        key: OpKey,
        left: Operation,
        right: Operation,
    },
}

impl DiffEntry {
    pub fn key(&self) -> &OpKey {
        match self {
            DiffEntry::Equal { key }
            | DiffEntry::Different { key, .. }
            | DiffEntry::ExtraLeft { key, .. }
            | DiffEntry::ExtraRight { key, .. }
            | DiffEntry::Neutralized { key, .. } => key,
        }
    }

    pub fn is_extra(&self) -> bool {
        matches!(
            self,
            DiffEntry::ExtraLeft { .. } | DiffEntry::ExtraRight { .. }
        )
    }
}

/// Per-class entry tallies for a comparison run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompareSummary {
    pub equal: usize,
    pub different: usize,
    pub neutralized: usize,
    pub extra_left: usize,
    pub extra_right: usize,
}

impl CompareSummary {
    pub(crate) fn record(&mut self, entry: &DiffEntry) {
        match entry {
            DiffEntry::Equal { .. } => self.equal += 1,
            DiffEntry::Different { .. } => self.different += 1,
            DiffEntry::Neutralized { .. } => self.neutralized += 1,
            DiffEntry::ExtraLeft { .. } => self.extra_left += 1,
            DiffEntry::ExtraRight { .. } => self.extra_right += 1,
        }
    }

    /// Total number of entries counted.
    pub fn total(&self) -> usize {
        self.equal + self.different + self.neutralized + self.extra_left + self.extra_right
    }

    /// True when nothing actionable was found (equal and neutralized only).
    pub fn is_clean(&self) -> bool {
        self.different == 0 && self.extra_left == 0 && self.extra_right == 0
    }
}

/// A versioned collection of diff entries between two routes.
///
/// The `version` field indicates the schema version for forwards
/// compatibility. Metadata carries the submitted (RTE) route's identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareReport {
    /// Schema version (currently "1").
    pub version: String,
    pub route_id: String,
    pub product_id: String,
    pub entries: Vec<DiffEntry>,
    pub summary: CompareSummary,
}

impl CompareReport {
    pub const SCHEMA_VERSION: &'static str = "1";

    pub fn new(
        route_id: impl Into<String>,
        product_id: impl Into<String>,
        entries: Vec<DiffEntry>,
    ) -> CompareReport {
        let mut summary = CompareSummary::default();
        for entry in &entries {
            summary.record(entry);
        }
        CompareReport {
            version: Self::SCHEMA_VERSION.to_string(),
            route_id: route_id.into(),
            product_id: product_id.into(),
            entries,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(raw: &str) -> OpKey {
        OpKey::parse(raw).unwrap()
    }

    #[test]
    fn summary_tallies_every_class() {
        let op = Operation {
            rows: vec![vec![None]],
            excluded: false,
            part_of_change: false,
        };
        let entries = vec![
            DiffEntry::Equal { key: key("1") },
            DiffEntry::Different {
                key: key("2"),
                left: op.clone(),
                right: op.clone(),
                mask: None,
            },
            DiffEntry::ExtraLeft {
                key: key("3"),
                operation: op.clone(),
                signature: None,
            },
            DiffEntry::ExtraRight {
                key: key("4"),
                operation: op.clone(),
                signature: None,
            },
            DiffEntry::Neutralized {
                key: key("5"),
                left: op.clone(),
                right: op,
            },
        ];
        let report = CompareReport::new("R1", "P1", entries);
        assert_eq!(report.summary.equal, 1);
        assert_eq!(report.summary.different, 1);
        assert_eq!(report.summary.extra_left, 1);
        assert_eq!(report.summary.extra_right, 1);
        assert_eq!(report.summary.neutralized, 1);
        assert_eq!(report.summary.total(), 5);
        assert!(!report.summary.is_clean());
    }

    #[test]
    fn clean_summary_allows_neutralized_entries() {
        let summary = CompareSummary {
            equal: 3,
            neutralized: 1,
            ..CompareSummary::default()
        };
        assert!(summary.is_clean());
    }

    #[test]
    fn error_codes_are_stable() {
        let err = CompareError::EmptyRoute {
            side: RouteSide::Rte,
            route_id: "R1".to_string(),
        };
        assert_eq!(err.code(), "RTDIFF_CMP_001");
        assert!(err.to_string().starts_with("[RTDIFF_CMP_001]"));

        let err = CompareError::AlignmentUnderflow {
            side: RouteSide::Sm,
            target: key("7"),
        };
        assert_eq!(err.code(), "RTDIFF_CMP_002");
        assert!(err.to_string().contains("7.0000"));
    }
}
