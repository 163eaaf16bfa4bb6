//! Hash utilities for operation content signatures.
//!
//! Signatures let renderers bucket repeated one-sided operations without
//! re-walking row data. Hashing must agree with [`crate::equality`]: cells
//! that compare equal (empty text vs. absent, `-0.0` vs. `0.0`) hash alike,
//! and the comment cell is excluded from content identity.

use crate::route::{CellScalar, Operation, OperationSignature, COMMENT_COL};
use std::hash::{Hash, Hasher};
use xxhash_rust::xxh64::Xxh64;

pub(crate) const XXH64_SEED: u64 = 0;

/// Collapse float representations that should compare equal: the sign of
/// zero and the lowest two mantissa bits (ULP drift from upstream
/// round-tripping through text).
pub(crate) fn normalize_float_for_hash(value: f64) -> u64 {
    if value == 0.0 {
        return 0;
    }
    if value.is_nan() {
        return u64::MAX;
    }
    value.to_bits() & !0b11
}

/// Compute the content signature of an operation.
pub(crate) fn operation_signature(op: &Operation) -> OperationSignature {
    let mut hasher = Xxh64::new(XXH64_SEED);
    for (r, row) in op.rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            if r == 0 && c == COMMENT_COL {
                continue;
            }
            hash_cell(cell.as_ref(), &mut hasher);
        }
        // Row separator so [a, b] + [c] and [a] + [b, c] hash differently.
        0xffu8.hash(&mut hasher);
    }
    OperationSignature {
        hash: hasher.finish(),
    }
}

fn hash_cell(cell: Option<&CellScalar>, hasher: &mut Xxh64) {
    match cell {
        None => 0u8.hash(hasher),
        Some(CellScalar::Text(s)) if s.is_empty() => 0u8.hash(hasher),
        Some(CellScalar::Number(n)) => {
            1u8.hash(hasher);
            normalize_float_for_hash(*n).hash(hasher);
        }
        Some(CellScalar::Text(s)) => {
            2u8.hash(hasher);
            s.hash(hasher);
        }
        Some(CellScalar::Bool(b)) => {
            3u8.hash(hasher);
            b.hash(hasher);
        }
    }
}
