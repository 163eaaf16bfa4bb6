use crate::input::load_route;
use crate::KindArg;
use anyhow::Result;
use route_diff::{CompareConfig, RouteKind};
use std::io::{self, Write};
use std::process::ExitCode;

pub fn run(path: &str, kind: KindArg) -> Result<ExitCode> {
    let kind = match kind {
        KindArg::Rte => RouteKind::Rte,
        KindArg::Sm => RouteKind::Sm,
        KindArg::Mm => RouteKind::MmBaseline,
    };
    // Info accepts whatever the file contains; ordering problems are
    // reported by `compare`, not here.
    let config = CompareConfig::builder()
        .validate_key_order(false)
        .build()
        .expect("default limits are valid");
    let report = load_route(path, kind, &config)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    let route = &report.route;
    writeln!(handle, "Route: {}", route.route_id)?;
    writeln!(handle, "Kind: {}", route.kind)?;
    writeln!(handle, "Product: {}", route.product_id)?;
    writeln!(handle, "Operations: {}", route.len())?;
    if !route.is_empty() {
        if let (Some(first), Some(last)) = (route.key_at(0), route.key_at(route.len() - 1)) {
            writeln!(handle, "Key range: {first} .. {last}")?;
        }
    }
    if report.excluded > 0 {
        writeln!(handle, "Excluded by removal markers: {}", report.excluded)?;
    }
    if !report.skipped.is_empty() {
        writeln!(handle, "Skipped input groups: {}", report.skipped.len())?;
    }

    Ok(ExitCode::from(0))
}
