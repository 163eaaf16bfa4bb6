use crate::diff::{CompareError, DiffEntry};
use crate::route::Route;

/// Trait for streaming diff entries to a consumer.
pub trait CompareSink {
    /// Called once before any entries are emitted, with both input routes
    /// available for header metadata.
    ///
    /// Default is a no-op so sinks that don't need setup can ignore it.
    fn begin(&mut self, _left: &Route, _right: &Route) -> Result<(), CompareError> {
        Ok(())
    }

    fn emit(&mut self, entry: DiffEntry) -> Result<(), CompareError>;

    fn finish(&mut self) -> Result<(), CompareError> {
        Ok(())
    }
}

/// A sink that collects entries into a Vec.
#[derive(Default)]
pub struct VecSink {
    entries: Vec<DiffEntry>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_entries(self) -> Vec<DiffEntry> {
        self.entries
    }
}

impl CompareSink for VecSink {
    fn emit(&mut self, entry: DiffEntry) -> Result<(), CompareError> {
        self.entries.push(entry);
        Ok(())
    }
}

/// A sink that forwards entries to a callback.
pub struct CallbackSink<F: FnMut(DiffEntry)> {
    f: F,
}

impl<F: FnMut(DiffEntry)> CallbackSink<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F: FnMut(DiffEntry)> CompareSink for CallbackSink<F> {
    fn emit(&mut self, entry: DiffEntry) -> Result<(), CompareError> {
        (self.f)(entry);
        Ok(())
    }
}
