//! Route Diff: a reconciliation engine for manufacturing routes.
//!
//! This crate provides functionality for:
//! - Building ordered, indexed routes from raw report rows
//! - Canonicalizing operation-number keys to a fixed `D.DDDD` form
//! - Aligning a submitted (RTE) route against a staged (SM) route and
//!   classifying every key as equal, different, or one-sided
//! - Neutralizing differences already present in a production (MM) baseline
//! - Serializing reports to JSON or streaming them as JSON Lines
//!
//! # Quick Start
//!
//! ```ignore
//! use route_diff::{build_route, compare_routes, CompareConfig, RouteKind};
//!
//! let config = CompareConfig::default();
//! let rte = build_route("RTE-1", "P-100", RouteKind::Rte, &rte_rows, &config)?.route;
//! let sm = build_route("SM-1", "P-100", RouteKind::Sm, &sm_rows, &config)?.route;
//! let report = compare_routes(&rte, &sm, None, &config)?;
//!
//! for entry in &report.entries {
//!     println!("{:?}", entry);
//! }
//! ```

mod baseline;
mod config;
mod diff;
mod engine;
mod equality;
pub mod error_codes;
pub(crate) mod hashing;
mod opkey;
mod output;
mod route;
mod route_builder;
mod sink;

pub use baseline::should_neutralize;
pub use config::{CompareConfig, CompareConfigBuilder, ConfigError};
pub use diff::{CompareError, CompareReport, CompareSummary, DiffEntry, RouteSide};
pub use engine::{compare_routes, try_compare_routes_streaming};
pub use equality::{compare_operations, operations_equal, DiffMask, OperationCmp};
pub use opkey::{MalformedKeyError, OpKey};
pub use output::json::{report_to_key_diffs, serialize_compare_report, DiffStatus, KeyDiff};
pub use output::json_lines::JsonLinesSink;
pub use route::{
    CellMarker, CellScalar, Operation, OperationSignature, Route, RouteKind, SourceCell,
    SourceRow, COMMENT_COL, KEY_COL,
};
pub use route_builder::{
    build_route, RouteBuildError, RouteBuildReport, SkipReason, SkippedOperation,
};
pub use sink::{CallbackSink, CompareSink, VecSink};
