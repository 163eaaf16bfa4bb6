use crate::commands::compare::Verbosity;
use anyhow::Result;
use route_diff::{CellScalar, CompareReport, DiffEntry, Operation, KEY_COL};
use std::io::Write;

pub fn write_text_report<W: Write>(
    w: &mut W,
    report: &CompareReport,
    verbosity: Verbosity,
) -> Result<()> {
    if report.summary.is_clean() && report.summary.neutralized == 0 {
        writeln!(w, "No differences found.")?;
        write_summary(w, report)?;
        return Ok(());
    }

    if verbosity != Verbosity::Quiet {
        for entry in &report.entries {
            if let Some(line) = render_entry(entry, verbosity) {
                writeln!(w, "  {line}")?;
            }
        }
        writeln!(w)?;
    }

    write_summary(w, report)?;
    Ok(())
}

fn render_entry(entry: &DiffEntry, verbosity: Verbosity) -> Option<String> {
    match entry {
        DiffEntry::Equal { key } => {
            if verbosity == Verbosity::Verbose {
                Some(format!("{key}  unchanged"))
            } else {
                None
            }
        }
        DiffEntry::Different { key, mask, .. } => {
            let detail = match mask {
                Some(mask) => format!("{} cell(s) changed", mask.count()),
                None => "row count changed".to_string(),
            };
            Some(format!("~ {key}  {detail}"))
        }
        DiffEntry::ExtraLeft { key, operation, .. } => {
            Some(format!("- {key}  only in submitted route{}", describe(operation)))
        }
        DiffEntry::ExtraRight { key, operation, .. } => {
            Some(format!("+ {key}  only in staged route{}", describe(operation)))
        }
        DiffEntry::Neutralized { key, .. } => {
            Some(format!("= {key}  differs but matches production baseline"))
        }
        other => Some(format!("? {}  {other:?}", other.key())),
    }
}

/// First non-key text cell of the operation's first row, as a short label.
fn describe(op: &Operation) -> String {
    let label = op.rows.first().and_then(|row| {
        row.iter().enumerate().find_map(|(c, cell)| match cell {
            Some(CellScalar::Text(s)) if c > KEY_COL && !s.is_empty() => Some(s.as_str()),
            _ => None,
        })
    });
    match label {
        Some(text) => format!(" ({text})"),
        None => String::new(),
    }
}

fn write_summary<W: Write>(w: &mut W, report: &CompareReport) -> Result<()> {
    let s = &report.summary;
    writeln!(
        w,
        "Summary: {} equal, {} different, {} neutralized, {} only-submitted, {} only-staged",
        s.equal, s.different, s.neutralized, s.extra_left, s.extra_right
    )?;
    Ok(())
}
