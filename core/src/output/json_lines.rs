//! Streaming JSON Lines output.
//!
//! One JSON object per line: a header with schema version and route
//! identities, then one line per diff entry as it is classified, then a
//! trailing summary line. Suited to piping large comparisons without
//! buffering the whole report.

use crate::diff::{CompareError, CompareSummary, DiffEntry};
use crate::route::Route;
use crate::sink::CompareSink;
use serde::Serialize;
use std::io::Write;

/// A [`CompareSink`] that writes JSON Lines to any writer.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    summary: CompareSummary,
}

#[derive(Serialize)]
struct Header<'a> {
    version: &'a str,
    rte_route_id: &'a str,
    sm_route_id: &'a str,
    product_id: &'a str,
}

#[derive(Serialize)]
struct Trailer<'a> {
    summary: &'a CompareSummary,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> JsonLinesSink<W> {
        JsonLinesSink {
            writer,
            summary: CompareSummary::default(),
        }
    }

    /// Running tallies of emitted entries.
    pub fn summary(&self) -> &CompareSummary {
        &self.summary
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line<T: Serialize>(&mut self, value: &T) -> Result<(), CompareError> {
        let line = serde_json::to_string(value).map_err(sink_err)?;
        self.writer.write_all(line.as_bytes()).map_err(sink_err)?;
        self.writer.write_all(b"\n").map_err(sink_err)
    }
}

fn sink_err(err: impl std::fmt::Display) -> CompareError {
    CompareError::SinkError {
        message: err.to_string(),
    }
}

impl<W: Write> CompareSink for JsonLinesSink<W> {
    fn begin(&mut self, left: &Route, right: &Route) -> Result<(), CompareError> {
        self.write_line(&Header {
            version: crate::diff::CompareReport::SCHEMA_VERSION,
            rte_route_id: &left.route_id,
            sm_route_id: &right.route_id,
            product_id: &left.product_id,
        })
    }

    fn emit(&mut self, entry: DiffEntry) -> Result<(), CompareError> {
        self.summary.record(&entry);
        self.write_line(&entry)
    }

    fn finish(&mut self) -> Result<(), CompareError> {
        let summary = self.summary;
        self.write_line(&Trailer { summary: &summary })?;
        self.writer.flush().map_err(sink_err)
    }
}
