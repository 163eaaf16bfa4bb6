//! Building a [`Route`] from raw source rows.
//!
//! Upstream reports arrive as flat row grids. A row with a non-blank key
//! cell starts a new operation; rows with a blank key cell are continuation
//! rows and attach to the operation above them. Cell markers fold into
//! operation flags: a removal marker anywhere excludes the whole operation,
//! a change-window marker marks it as part of an approved change.
//!
//! The builder is diagnostic-preserving rather than fail-fast: operations
//! with malformed keys and rows above the first keyed row are skipped and
//! reported, not fatal. Only a key-order violation aborts, and only when
//! order validation is enabled.

use crate::config::CompareConfig;
use crate::error_codes;
use crate::opkey::{MalformedKeyError, OpKey};
use crate::route::{CellMarker, Operation, Route, RouteKind, SourceRow, KEY_COL};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result of building a route: the route itself plus what was left out.
#[derive(Debug)]
pub struct RouteBuildReport {
    pub route: Route,
    /// Input that never made it into an operation, with row positions.
    pub skipped: Vec<SkippedOperation>,
    /// Operations dropped because a removal marker excluded them.
    pub excluded: usize,
}

/// Diagnostic for input rows that were dropped during building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedOperation {
    /// Zero-based index of the first source row involved.
    pub first_row: usize,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum SkipReason {
    /// The key cell held text that does not canonicalize.
    MalformedKey { input: String },
    /// Rows above the first keyed row have no operation to attach to.
    NoLeadingOperation,
}

/// Errors that abort route building.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RouteBuildError {
    #[error(
        "[RTDIFF_BUILD_001] key {key} at row {row} does not ascend past {previous}. Suggestion: the upstream report must list operations in strictly increasing key order."
    )]
    KeyOrderViolation {
        row: usize,
        key: OpKey,
        previous: OpKey,
    },
}

impl RouteBuildError {
    pub fn code(&self) -> &'static str {
        match self {
            RouteBuildError::KeyOrderViolation { .. } => error_codes::BUILD_KEY_ORDER,
        }
    }
}

/// Build a route from raw source rows.
///
/// With `config.validate_key_order` set (the default), each new operation's
/// key must compare strictly greater than the previous one; otherwise keys
/// are accepted in any order and duplicates overwrite in place.
pub fn build_route(
    route_id: impl Into<String>,
    product_id: impl Into<String>,
    kind: RouteKind,
    rows: &[SourceRow],
    config: &CompareConfig,
) -> Result<RouteBuildReport, RouteBuildError> {
    let mut builder = Builder {
        route: Route::new(route_id, product_id, kind),
        skipped: Vec::new(),
        excluded: 0,
        current: None,
        last_key: None,
        validate_key_order: config.validate_key_order,
    };

    for (row_idx, row) in rows.iter().enumerate() {
        let key_cell = row.get(KEY_COL);
        let keyed = key_cell.is_some_and(|cell| !cell.is_blank());
        if keyed {
            builder.flush()?;
            builder.start(row_idx, row);
        } else {
            builder.continue_with(row_idx, row);
        }
    }
    builder.flush()?;

    let report = RouteBuildReport {
        route: builder.route,
        skipped: builder.skipped,
        excluded: builder.excluded,
    };
    debug!(
        "built {} ({} skipped, {} excluded)",
        report.route,
        report.skipped.len(),
        report.excluded
    );
    Ok(report)
}

enum Pending {
    /// A keyed operation under construction.
    Keyed {
        row: usize,
        key: OpKey,
        op: Operation,
    },
    /// A group whose key cell failed to canonicalize; continuation rows are
    /// swallowed so they don't attach to the previous good operation.
    BadKey { row: usize, err: MalformedKeyError },
}

struct Builder {
    route: Route,
    skipped: Vec<SkippedOperation>,
    excluded: usize,
    current: Option<Pending>,
    last_key: Option<OpKey>,
    validate_key_order: bool,
}

impl Builder {
    fn start(&mut self, row_idx: usize, row: &SourceRow) {
        let key_cell = row.get(KEY_COL).and_then(|cell| cell.value.as_ref());
        match OpKey::from_cell(key_cell) {
            Ok(key) => {
                let mut op = Operation {
                    rows: Vec::new(),
                    excluded: false,
                    part_of_change: false,
                };
                absorb_row(&mut op, row);
                self.current = Some(Pending::Keyed {
                    row: row_idx,
                    key,
                    op,
                });
            }
            Err(err) => {
                warn!("skipping operation at row {row_idx}: {err}");
                self.current = Some(Pending::BadKey { row: row_idx, err });
            }
        }
    }

    fn continue_with(&mut self, row_idx: usize, row: &SourceRow) {
        match &mut self.current {
            Some(Pending::Keyed { op, .. }) => absorb_row(op, row),
            Some(Pending::BadKey { .. }) => {}
            None => {
                // Blank rows above the first operation carry no data worth
                // reporting; anything else gets a diagnostic.
                if row.iter().all(|cell| cell.is_blank()) {
                    return;
                }
                self.skipped.push(SkippedOperation {
                    first_row: row_idx,
                    reason: SkipReason::NoLeadingOperation,
                });
            }
        }
    }

    fn flush(&mut self) -> Result<(), RouteBuildError> {
        match self.current.take() {
            None => Ok(()),
            Some(Pending::BadKey { row, err }) => {
                self.skipped.push(SkippedOperation {
                    first_row: row,
                    reason: SkipReason::MalformedKey { input: err.input },
                });
                Ok(())
            }
            Some(Pending::Keyed { row, key, op }) => {
                if op.excluded {
                    self.excluded += 1;
                    return Ok(());
                }
                if self.validate_key_order {
                    if let Some(previous) = &self.last_key {
                        if &key <= previous {
                            return Err(RouteBuildError::KeyOrderViolation {
                                row,
                                key,
                                previous: previous.clone(),
                            });
                        }
                    }
                }
                self.last_key = Some(key.clone());
                self.route.push(key, op);
                Ok(())
            }
        }
    }
}

fn absorb_row(op: &mut Operation, row: &SourceRow) {
    let mut cells = Vec::with_capacity(row.len());
    for cell in row {
        match cell.marker {
            Some(CellMarker::Removal) => op.excluded = true,
            Some(CellMarker::ChangeWindow) => op.part_of_change = true,
            None => {}
        }
        cells.push(cell.value.clone());
    }
    op.rows.push(cells);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::{CellScalar, SourceCell};

    fn keyed_row(key: &str, desc: &str) -> SourceRow {
        vec![
            SourceCell::empty(),
            SourceCell::text(key),
            SourceCell::text(desc),
        ]
    }

    fn continuation_row(text: &str) -> SourceRow {
        vec![SourceCell::empty(), SourceCell::empty(), SourceCell::text(text)]
    }

    fn build(rows: &[SourceRow]) -> RouteBuildReport {
        build_route("R1", "P1", RouteKind::Rte, rows, &CompareConfig::default()).unwrap()
    }

    #[test]
    fn keyed_rows_start_operations_and_blank_keys_continue_them() {
        let rows = vec![
            keyed_row("10", "DRILL"),
            continuation_row("overflow text"),
            keyed_row("20", "DEBURR"),
        ];
        let report = build(&rows);
        assert_eq!(report.route.len(), 2);
        let first = report.route.get("10.0000").unwrap();
        assert_eq!(first.rows.len(), 2);
        assert_eq!(report.route.get("20.0000").unwrap().rows.len(), 1);
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn removal_marker_excludes_the_whole_operation() {
        let mut marked = keyed_row("10", "DRILL");
        marked[2] = SourceCell::text("DRILL").with_marker(CellMarker::Removal);
        let rows = vec![marked, keyed_row("20", "DEBURR")];
        let report = build(&rows);
        assert_eq!(report.route.len(), 1);
        assert_eq!(report.excluded, 1);
        assert!(!report.route.contains_key("10.0000"));
    }

    #[test]
    fn removal_marker_on_continuation_row_also_excludes() {
        let mut cont = continuation_row("tail");
        cont[2] = SourceCell::text("tail").with_marker(CellMarker::Removal);
        let rows = vec![keyed_row("10", "DRILL"), cont];
        let report = build(&rows);
        assert_eq!(report.route.len(), 0);
        assert_eq!(report.excluded, 1);
    }

    #[test]
    fn change_window_marker_sets_part_of_change() {
        let mut marked = keyed_row("10", "DRILL");
        marked[2] = SourceCell::text("DRILL").with_marker(CellMarker::ChangeWindow);
        let report = build(&[marked]);
        assert!(report.route.get("10.0000").unwrap().part_of_change);
    }

    #[test]
    fn malformed_key_skips_operation_and_its_continuations() {
        let rows = vec![
            keyed_row("10", "DRILL"),
            keyed_row("not-a-key", "MYSTERY"),
            continuation_row("belongs to the bad one"),
            keyed_row("20", "DEBURR"),
        ];
        let report = build(&rows);
        assert_eq!(report.route.len(), 2);
        assert_eq!(report.route.get("10.0000").unwrap().rows.len(), 1);
        assert_eq!(
            report.skipped,
            vec![SkippedOperation {
                first_row: 1,
                reason: SkipReason::MalformedKey {
                    input: "not-a-key".to_string()
                },
            }]
        );
    }

    #[test]
    fn trailing_dot_key_builds_instead_of_skipping() {
        let rows = vec![keyed_row("12.", "DRILL")];
        let report = build(&rows);
        assert!(report.skipped.is_empty());
        assert!(report.route.contains_key("12.0000"));
    }

    #[test]
    fn nonblank_rows_before_first_operation_are_reported() {
        let rows = vec![
            continuation_row("header junk"),
            vec![SourceCell::empty(), SourceCell::empty()],
            keyed_row("10", "DRILL"),
        ];
        let report = build(&rows);
        assert_eq!(report.route.len(), 1);
        assert_eq!(
            report.skipped,
            vec![SkippedOperation {
                first_row: 0,
                reason: SkipReason::NoLeadingOperation,
            }]
        );
    }

    #[test]
    fn descending_keys_abort_with_order_violation() {
        let rows = vec![keyed_row("20", "DEBURR"), keyed_row("10", "DRILL")];
        let err = build_route("R1", "P1", RouteKind::Rte, &rows, &CompareConfig::default())
            .expect_err("descending keys must be rejected");
        match &err {
            RouteBuildError::KeyOrderViolation { row, key, previous } => {
                assert_eq!(*row, 1);
                assert_eq!(key.as_str(), "10.0000");
                assert_eq!(previous.as_str(), "20.0000");
            }
        }
        assert_eq!(err.code(), "RTDIFF_BUILD_001");
    }

    #[test]
    fn order_validation_can_be_disabled() {
        let rows = vec![keyed_row("20", "DEBURR"), keyed_row("10", "DRILL")];
        let config = CompareConfig::builder()
            .validate_key_order(false)
            .build()
            .unwrap();
        let report = build_route("R1", "P1", RouteKind::Rte, &rows, &config).unwrap();
        assert_eq!(report.route.len(), 2);
        assert_eq!(report.route.key_at(0).unwrap().as_str(), "20.0000");
    }

    #[test]
    fn duplicate_key_overwrites_earlier_operation() {
        let rows = vec![keyed_row("10", "DRILL"), keyed_row("10", "DRILL v2")];
        let config = CompareConfig::builder()
            .validate_key_order(false)
            .build()
            .unwrap();
        let report = build_route("R1", "P1", RouteKind::Rte, &rows, &config).unwrap();
        assert_eq!(report.route.len(), 1);
        let op = report.route.get("10.0000").unwrap();
        assert_eq!(
            op.rows[0][2],
            Some(CellScalar::Text("DRILL v2".to_string()))
        );
    }
}
