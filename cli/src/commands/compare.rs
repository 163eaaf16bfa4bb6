use crate::input::load_route;
use crate::output::{json, text};
use crate::OutputFormat;
use anyhow::{bail, Context, Result};
use log::debug;
use route_diff::{
    compare_routes, try_compare_routes_streaming, CompareConfig, CompareSummary, JsonLinesSink,
    RouteKind,
};
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

#[allow(clippy::too_many_arguments)]
pub fn run(
    rte_path: &str,
    sm_path: &str,
    baseline_path: Option<&str>,
    format: OutputFormat,
    quiet: bool,
    verbose: bool,
    allow_unordered: bool,
    no_neutralize: bool,
    no_signatures: bool,
    max_operations: Option<u32>,
) -> Result<ExitCode> {
    if quiet && verbose {
        bail!("Cannot use both --quiet and --verbose flags together");
    }

    let verbosity = if quiet {
        Verbosity::Quiet
    } else if verbose {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    };

    let mut builder = CompareConfig::builder()
        .validate_key_order(!allow_unordered)
        .enable_baseline_neutralization(!no_neutralize)
        .include_signatures(!no_signatures);
    if let Some(limit) = max_operations {
        builder = builder.max_route_operations(limit);
    }
    let config = builder.build().context("Invalid configuration")?;

    let left = load_route(rte_path, RouteKind::Rte, &config)?.route;
    let right = load_route(sm_path, RouteKind::Sm, &config)?.route;
    let baseline = baseline_path
        .map(|path| load_route(path, RouteKind::MmBaseline, &config))
        .transpose()?
        .map(|report| report.route);
    debug!("loaded {left} and {right}");

    if format == OutputFormat::Jsonl {
        let stdout = io::stdout();
        let handle = stdout.lock();
        let mut writer = BufWriter::new(handle);
        let mut sink = JsonLinesSink::new(&mut writer);

        let summary =
            try_compare_routes_streaming(&left, &right, baseline.as_ref(), &config, &mut sink)
                .context("Streaming comparison failed")?;
        writer.flush()?;
        return Ok(exit_code_from_summary(&summary));
    }

    let report = compare_routes(&left, &right, baseline.as_ref(), &config)
        .context("Comparison failed")?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    match format {
        OutputFormat::Text => text::write_text_report(&mut handle, &report, verbosity)?,
        OutputFormat::Json => json::write_json_report(&mut handle, &report)?,
        OutputFormat::Jsonl => unreachable!("JSONL handled by streaming path"),
    }

    Ok(exit_code_from_summary(&report.summary))
}

fn exit_code_from_summary(summary: &CompareSummary) -> ExitCode {
    if summary.is_clean() {
        ExitCode::from(0)
    } else {
        ExitCode::from(1)
    }
}
