//! Loading route files from disk.
//!
//! A route file is a JSON document with the route's identity and its raw
//! rows, cell markers included:
//!
//! ```json
//! {
//!   "route_id": "RTE-1042",
//!   "product_id": "P-100",
//!   "rows": [
//!     [{"value": null}, {"value": "10"}, {"value": "DRILL"}],
//!     [{"value": null}, {"value": null}, {"value": "torque to 40 Nm"}]
//!   ]
//! }
//! ```

use anyhow::{Context, Result};
use route_diff::{build_route, CompareConfig, RouteBuildReport, RouteKind, SourceRow};
use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
pub struct RouteFile {
    pub route_id: String,
    pub product_id: String,
    pub rows: Vec<SourceRow>,
}

pub fn load_route(path: &str, kind: RouteKind, config: &CompareConfig) -> Result<RouteBuildReport> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read route file: {path}"))?;
    let file: RouteFile = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse route file: {path}"))?;
    let report = build_route(file.route_id, file.product_id, kind, &file.rows, config)
        .with_context(|| format!("Failed to build {kind} route from: {path}"))?;

    for skipped in &report.skipped {
        eprintln!(
            "Warning: {path}: skipped input at row {}: {:?}",
            skipped.first_row, skipped.reason
        );
    }

    Ok(report)
}
