use anyhow::Result;
use route_diff::{serialize_compare_report, CompareReport};
use std::io::Write;

pub fn write_json_report<W: Write>(w: &mut W, report: &CompareReport) -> Result<()> {
    let json = serialize_compare_report(report)?;
    writeln!(w, "{json}")?;
    Ok(())
}
