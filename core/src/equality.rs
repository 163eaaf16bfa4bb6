//! Pure record equality with an optional per-cell difference mask.
//!
//! Two operations are equal iff they have the same number of rows and every
//! cell compares equal after mapping absent/empty values to the empty
//! string, except cell `(0, 0)`: that cell holds a free-text comment and is
//! always treated as equal regardless of content. Unequal row counts
//! short-circuit without any cell comparison.

use crate::route::{CellScalar, Operation, COMMENT_COL};
use serde::{Deserialize, Serialize};

/// Outcome of comparing two operations.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationCmp {
    Equal,
    /// Row counts differ; cells were not compared.
    RowCountMismatch { left_rows: usize, right_rows: usize },
    /// Same row count, at least one cell differs.
    CellsDiffer { mask: DiffMask },
}

impl OperationCmp {
    pub fn is_equal(&self) -> bool {
        matches!(self, OperationCmp::Equal)
    }
}

/// Per-cell difference flags for renderers: `rows[r][c]` is true when the
/// cell at that position differs. Each mask row spans the wider of the two
/// compared rows; cells missing on one side count as empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffMask {
    pub rows: Vec<Vec<bool>>,
}

impl DiffMask {
    /// Number of differing cells.
    pub fn count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.iter().filter(|&&d| d).count())
            .sum()
    }
}

/// Boolean view of [`compare_operations`].
pub fn operations_equal(a: &Operation, b: &Operation) -> bool {
    compare_operations(a, b).is_equal()
}

/// Compare two operations cell by cell.
pub fn compare_operations(a: &Operation, b: &Operation) -> OperationCmp {
    if a.rows.len() != b.rows.len() {
        return OperationCmp::RowCountMismatch {
            left_rows: a.rows.len(),
            right_rows: b.rows.len(),
        };
    }

    let mut any_diff = false;
    let mut mask_rows = Vec::with_capacity(a.rows.len());
    for (r, (row_a, row_b)) in a.rows.iter().zip(b.rows.iter()).enumerate() {
        let width = row_a.len().max(row_b.len());
        let mut mask_row = Vec::with_capacity(width);
        for c in 0..width {
            let differs = if r == 0 && c == COMMENT_COL {
                false
            } else {
                !cell_eq(
                    row_a.get(c).and_then(|v| v.as_ref()),
                    row_b.get(c).and_then(|v| v.as_ref()),
                )
            };
            any_diff |= differs;
            mask_row.push(differs);
        }
        mask_rows.push(mask_row);
    }

    if any_diff {
        OperationCmp::CellsDiffer {
            mask: DiffMask { rows: mask_rows },
        }
    } else {
        OperationCmp::Equal
    }
}

/// Cell equality with absent/empty-text unified.
pub(crate) fn cell_eq(a: Option<&CellScalar>, b: Option<&CellScalar>) -> bool {
    match (a, b) {
        (a, b) if is_blank(a) && is_blank(b) => true,
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn is_blank(cell: Option<&CellScalar>) -> bool {
    match cell {
        None => true,
        Some(CellScalar::Text(s)) => s.is_empty(),
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(rows: Vec<Vec<Option<CellScalar>>>) -> Operation {
        Operation {
            rows,
            excluded: false,
            part_of_change: false,
        }
    }

    fn text(s: &str) -> Option<CellScalar> {
        Some(CellScalar::Text(s.to_string()))
    }

    fn num(n: f64) -> Option<CellScalar> {
        Some(CellScalar::Number(n))
    }

    #[test]
    fn identical_operations_compare_equal() {
        let a = op(vec![vec![text("c"), num(12.0), text("MOD-A")]]);
        let b = a.clone();
        assert!(operations_equal(&a, &b));
    }

    #[test]
    fn comment_cell_is_always_equal() {
        let a = op(vec![vec![text("checked 5/1"), num(12.0)]]);
        let b = op(vec![vec![None, num(12.0)]]);
        assert!(operations_equal(&a, &b));
    }

    #[test]
    fn comment_exception_applies_only_to_first_row() {
        let a = op(vec![
            vec![text("comment"), num(12.0)],
            vec![text("note"), text("x")],
        ]);
        let b = op(vec![
            vec![None, num(12.0)],
            vec![text("other note"), text("x")],
        ]);
        let cmp = compare_operations(&a, &b);
        match cmp {
            OperationCmp::CellsDiffer { mask } => {
                assert!(!mask.rows[0][0]);
                assert!(mask.rows[1][0]);
                assert_eq!(mask.count(), 1);
            }
            other => panic!("expected CellsDiffer, got {other:?}"),
        }
    }

    #[test]
    fn row_count_mismatch_short_circuits() {
        let a = op(vec![vec![None, num(1.0)], vec![None, num(2.0)]]);
        let b = op(vec![vec![None, num(1.0)]]);
        assert_eq!(
            compare_operations(&a, &b),
            OperationCmp::RowCountMismatch {
                left_rows: 2,
                right_rows: 1
            }
        );
    }

    #[test]
    fn absent_and_empty_text_cells_are_equal() {
        let a = op(vec![vec![None, num(1.0), None]]);
        let b = op(vec![vec![None, num(1.0), text("")]]);
        assert!(operations_equal(&a, &b));
    }

    #[test]
    fn trailing_blank_cells_do_not_differ() {
        let a = op(vec![vec![None, num(1.0)]]);
        let b = op(vec![vec![None, num(1.0), None, text("")]]);
        assert!(operations_equal(&a, &b));
    }

    #[test]
    fn value_difference_sets_mask_position() {
        let a = op(vec![vec![None, num(1.0), text("DEPT-1")]]);
        let b = op(vec![vec![None, num(1.0), text("DEPT-2")]]);
        match compare_operations(&a, &b) {
            OperationCmp::CellsDiffer { mask } => {
                assert_eq!(mask.rows, vec![vec![false, false, true]]);
            }
            other => panic!("expected CellsDiffer, got {other:?}"),
        }
    }

    #[test]
    fn text_and_number_never_compare_equal() {
        let a = op(vec![vec![None, num(1.0), text("12")]]);
        let b = op(vec![vec![None, num(1.0), num(12.0)]]);
        assert!(!operations_equal(&a, &b));
    }
}
