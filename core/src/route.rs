//! Routes, operations, and the cell values they carry.
//!
//! A [`Route`] is an arena of operations plus an ordered key list and a
//! key-to-position index, so the alignment engine can both walk keys in
//! order and answer membership probes in O(1).

use crate::hashing::{normalize_float_for_hash, operation_signature};
use crate::opkey::{MalformedKeyError, OpKey};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Column of the free-text comment cell in an operation's first row.
pub const COMMENT_COL: usize = 0;
/// Column holding the operation number in an operation's first row.
pub const KEY_COL: usize = 1;

/// A scalar cell value.
///
/// Numbers compare with zero-sign and low-ULP drift collapsed, matching the
/// signature hash, so values round-tripped through text upstream still
/// compare equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellScalar {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl PartialEq for CellScalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellScalar::Number(a), CellScalar::Number(b)) => {
                normalize_float_for_hash(*a) == normalize_float_for_hash(*b)
            }
            (CellScalar::Text(a), CellScalar::Text(b)) => a == b,
            (CellScalar::Bool(a), CellScalar::Bool(b)) => a == b,
            _ => false,
        }
    }
}

/// Annotation attached to a source cell by the upstream report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellMarker {
    /// The operation this row belongs to is slated for removal.
    Removal,
    /// The cell sits inside an approved change window.
    ChangeWindow,
}

/// One cell of raw source input: a value plus an optional marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceCell {
    pub value: Option<CellScalar>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub marker: Option<CellMarker>,
}

impl SourceCell {
    pub fn empty() -> SourceCell {
        SourceCell {
            value: None,
            marker: None,
        }
    }

    pub fn text(s: impl Into<String>) -> SourceCell {
        SourceCell {
            value: Some(CellScalar::Text(s.into())),
            marker: None,
        }
    }

    pub fn number(n: f64) -> SourceCell {
        SourceCell {
            value: Some(CellScalar::Number(n)),
            marker: None,
        }
    }

    pub fn with_marker(mut self, marker: CellMarker) -> SourceCell {
        self.marker = Some(marker);
        self
    }

    pub fn is_blank(&self) -> bool {
        match &self.value {
            None => true,
            Some(CellScalar::Text(s)) => s.is_empty(),
            Some(_) => false,
        }
    }
}

/// One raw row as read from the upstream report.
pub type SourceRow = Vec<SourceCell>;

/// A single manufacturing operation: one or more rows of cells.
///
/// The first row's key cell carries the operation number; continuation rows
/// hold overflow text. `excluded` operations never reach a [`Route`];
/// `part_of_change` marks operations inside an approved change window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub rows: Vec<Vec<Option<CellScalar>>>,
    #[serde(default)]
    pub excluded: bool,
    #[serde(default)]
    pub part_of_change: bool,
}

impl Operation {
    /// Derive this operation's canonical key from its first row.
    pub fn key(&self) -> Result<OpKey, MalformedKeyError> {
        let cell = self
            .rows
            .first()
            .and_then(|row| row.get(KEY_COL))
            .and_then(|cell| cell.as_ref());
        OpKey::from_cell(cell)
    }

    /// Content signature over all cells except the comment cell.
    pub fn signature(&self) -> OperationSignature {
        operation_signature(self)
    }
}

/// xxh64 content signature of an operation, serialized as fixed-width hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationSignature {
    #[serde(with = "hex_u64")]
    pub hash: u64,
}

mod hex_u64 {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{value:016x}"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let s = String::deserialize(deserializer)?;
        u64::from_str_radix(&s, 16).map_err(serde::de::Error::custom)
    }
}

/// Which report a route was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteKind {
    /// The submitted (engineering) route.
    Rte,
    /// The staged (system master) route.
    Sm,
    /// The production baseline route.
    MmBaseline,
}

impl std::fmt::Display for RouteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteKind::Rte => f.write_str("RTE"),
            RouteKind::Sm => f.write_str("SM"),
            RouteKind::MmBaseline => f.write_str("MM"),
        }
    }
}

/// An ordered, indexed collection of operations for one route report.
#[derive(Debug, Clone)]
pub struct Route {
    ops: Vec<Operation>,
    keys: Vec<OpKey>,
    index: FxHashMap<String, usize>,
    pub route_id: String,
    pub product_id: String,
    pub kind: RouteKind,
}

impl Route {
    pub fn new(
        route_id: impl Into<String>,
        product_id: impl Into<String>,
        kind: RouteKind,
    ) -> Route {
        Route {
            ops: Vec::new(),
            keys: Vec::new(),
            index: FxHashMap::default(),
            route_id: route_id.into(),
            product_id: product_id.into(),
            kind,
        }
    }

    /// Append an operation under `key`. A duplicate key overwrites the
    /// existing operation in place, keeping the first occurrence's position.
    pub(crate) fn push(&mut self, key: OpKey, op: Operation) {
        debug_assert!(!op.rows.is_empty(), "operations must have at least one row");
        debug_assert!(!op.excluded, "excluded operations must not enter a route");
        if let Some(&pos) = self.index.get(key.as_str()) {
            self.ops[pos] = op;
        } else {
            self.index.insert(key.as_str().to_string(), self.ops.len());
            self.keys.push(key);
            self.ops.push(op);
        }
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Keys in route order.
    pub fn keys(&self) -> &[OpKey] {
        &self.keys
    }

    pub fn contains_key(&self, canonical: &str) -> bool {
        self.index.contains_key(canonical)
    }

    pub fn get(&self, canonical: &str) -> Option<&Operation> {
        self.index.get(canonical).map(|&pos| &self.ops[pos])
    }

    pub fn key_at(&self, pos: usize) -> Option<&OpKey> {
        self.keys.get(pos)
    }

    pub fn op_at(&self, pos: usize) -> Option<&Operation> {
        self.ops.get(pos)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OpKey, &Operation)> {
        self.keys.iter().zip(self.ops.iter())
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} route '{}' for product '{}' ({} operations)",
            self.kind,
            self.route_id,
            self.product_id,
            self.len()
        )
    }
}
