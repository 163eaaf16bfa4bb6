//! JSON rendering of compare reports.
//!
//! Two shapes are offered: the full [`CompareReport`] serialization with
//! every operation's cells inline, and a flattened per-key view
//! ([`KeyDiff`]) for renderers that only need the classification table.

use crate::diff::{CompareReport, DiffEntry};
use crate::route::OperationSignature;
use serde::{Deserialize, Serialize};

/// Serialize a full report as pretty-printed JSON.
pub fn serialize_compare_report(report: &CompareReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Flattened classification of one key, without row payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyDiff {
    pub key: String,
    pub status: DiffStatus,
    /// Number of differing cells, when a cell mask is available.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cells_changed: Option<usize>,
    /// Content signature for one-sided operations.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub signature: Option<OperationSignature>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffStatus {
    Equal,
    Different,
    ExtraLeft,
    ExtraRight,
    Neutralized,
}

/// Flatten a report's entries into one [`KeyDiff`] per key, in entry order.
pub fn report_to_key_diffs(report: &CompareReport) -> Vec<KeyDiff> {
    report
        .entries
        .iter()
        .map(|entry| match entry {
            DiffEntry::Equal { key } => KeyDiff {
                key: key.to_string(),
                status: DiffStatus::Equal,
                cells_changed: None,
                signature: None,
            },
            DiffEntry::Different { key, mask, .. } => KeyDiff {
                key: key.to_string(),
                status: DiffStatus::Different,
                cells_changed: mask.as_ref().map(|m| m.count()),
                signature: None,
            },
            DiffEntry::ExtraLeft { key, signature, .. } => KeyDiff {
                key: key.to_string(),
                status: DiffStatus::ExtraLeft,
                cells_changed: None,
                signature: *signature,
            },
            DiffEntry::ExtraRight { key, signature, .. } => KeyDiff {
                key: key.to_string(),
                status: DiffStatus::ExtraRight,
                cells_changed: None,
                signature: *signature,
            },
            DiffEntry::Neutralized { key, .. } => KeyDiff {
                key: key.to_string(),
                status: DiffStatus::Neutralized,
                cells_changed: None,
                signature: None,
            },
        })
        .collect()
}
