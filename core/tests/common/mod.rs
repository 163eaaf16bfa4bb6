#![allow(dead_code)]

use route_diff::{build_route, CompareConfig, DiffEntry, Route, RouteKind, SourceCell, SourceRow};

/// One keyed operation row: comment, key, description.
pub fn op_row(key: &str, desc: &str) -> SourceRow {
    vec![
        SourceCell::empty(),
        SourceCell::text(key),
        SourceCell::text(desc),
    ]
}

/// A continuation row carrying overflow text (blank key cell).
pub fn overflow_row(text: &str) -> SourceRow {
    vec![SourceCell::empty(), SourceCell::empty(), SourceCell::text(text)]
}

pub fn route_from_rows(kind: RouteKind, id: &str, rows: &[SourceRow]) -> Route {
    build_route(id, "P-100", kind, rows, &CompareConfig::default())
        .unwrap()
        .route
}

pub fn route(kind: RouteKind, id: &str, ops: &[(&str, &str)]) -> Route {
    let rows: Vec<SourceRow> = ops.iter().map(|&(k, d)| op_row(k, d)).collect();
    route_from_rows(kind, id, &rows)
}

/// Build a route without the ascending-key check, for shaping inputs that
/// violate the ordering assumption.
pub fn unordered_route(kind: RouteKind, id: &str, ops: &[(&str, &str)]) -> Route {
    let rows: Vec<SourceRow> = ops.iter().map(|&(k, d)| op_row(k, d)).collect();
    let config = CompareConfig::builder()
        .validate_key_order(false)
        .build()
        .unwrap();
    build_route(id, "P-100", kind, &rows, &config).unwrap().route
}

pub fn rte(ops: &[(&str, &str)]) -> Route {
    route(RouteKind::Rte, "RTE-1", ops)
}

pub fn sm(ops: &[(&str, &str)]) -> Route {
    route(RouteKind::Sm, "SM-1", ops)
}

pub fn mm(ops: &[(&str, &str)]) -> Route {
    route(RouteKind::MmBaseline, "MM-1", ops)
}

/// Collapse entries to (classification, canonical key) pairs for ordering
/// assertions.
pub fn classified(entries: &[DiffEntry]) -> Vec<(&'static str, String)> {
    entries
        .iter()
        .map(|entry| {
            let label = match entry {
                DiffEntry::Equal { .. } => "equal",
                DiffEntry::Different { .. } => "different",
                DiffEntry::ExtraLeft { .. } => "extra_left",
                DiffEntry::ExtraRight { .. } => "extra_right",
                DiffEntry::Neutralized { .. } => "neutralized",
                other => panic!("unexpected entry {other:?}"),
            };
            (label, entry.key().to_string())
        })
        .collect()
}
