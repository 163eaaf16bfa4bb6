//! The route alignment engine.
//!
//! Walks the ordered key lists of two routes with a pair of cursors and
//! classifies every key as equal, different, neutralized, or
//! present-on-one-side-only. The cursor walk is expressed as an explicit
//! state machine rather than nested loops:
//!
//! - `Scanning`: both cursors on live keys; equal keys are compared,
//!   complete mismatches emit both one-sided entries, and a numeric gap
//!   switches to a realignment state.
//! - `RealignLeft` / `RealignRight`: one side holds keys missing from the
//!   other; the lagging cursor advances, emitting one-sided entries, until
//!   it reaches the other side's current key. Running off the end means the
//!   ascending-key assumption was violated and the run aborts.
//! - `DrainLeft` / `DrainRight`: either cursor hit its end; the remainder of
//!   each side is emitted as one-sided entries without further comparison.
//!
//! Every step advances at least one cursor, so a run takes at most
//! `left.len() + right.len()` steps. For fixed inputs the emitted entry
//! stream is fully determined.

use crate::baseline::should_neutralize;
use crate::config::CompareConfig;
use crate::diff::{CompareError, CompareReport, CompareSummary, DiffEntry, RouteSide};
use crate::equality::{compare_operations, OperationCmp};
use crate::opkey::OpKey;
use crate::route::Route;
use crate::sink::{CompareSink, VecSink};
use log::{debug, trace};

/// Compare two routes and collect the full report.
///
/// This is the batch entry point; report metadata (route/product id) is
/// taken from the submitted (left/RTE) route.
pub fn compare_routes(
    left: &Route,
    right: &Route,
    baseline: Option<&Route>,
    config: &CompareConfig,
) -> Result<CompareReport, CompareError> {
    let mut sink = VecSink::new();
    try_compare_routes_streaming(left, right, baseline, config, &mut sink)?;
    Ok(CompareReport::new(
        left.route_id.clone(),
        left.product_id.clone(),
        sink.into_entries(),
    ))
}

/// Compare two routes, streaming entries into `sink`.
pub fn try_compare_routes_streaming<S: CompareSink>(
    left: &Route,
    right: &Route,
    baseline: Option<&Route>,
    config: &CompareConfig,
    sink: &mut S,
) -> Result<CompareSummary, CompareError> {
    check_side(left, RouteSide::Rte, config)?;
    check_side(right, RouteSide::Sm, config)?;

    debug!(
        "comparing {} against {} (baseline: {})",
        left,
        right,
        baseline.map_or("none", |_| "present")
    );

    sink.begin(left, right)?;
    let mut aligner = Aligner {
        left,
        right,
        baseline,
        config,
        sink,
        i: 0,
        j: 0,
        state: AlignState::Scanning,
        summary: CompareSummary::default(),
    };
    aligner.run()?;
    let summary = aligner.summary;
    sink.finish()?;
    Ok(summary)
}

fn check_side(route: &Route, side: RouteSide, config: &CompareConfig) -> Result<(), CompareError> {
    if route.is_empty() {
        return Err(CompareError::EmptyRoute {
            side,
            route_id: route.route_id.clone(),
        });
    }
    if route.len() > config.max_route_operations as usize {
        return Err(CompareError::LimitsExceeded {
            side,
            operations: route.len(),
            max_operations: config.max_route_operations,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AlignState {
    Scanning,
    RealignLeft,
    RealignRight,
    DrainLeft,
    DrainRight,
    Done,
}

struct Aligner<'a, S: CompareSink> {
    left: &'a Route,
    right: &'a Route,
    baseline: Option<&'a Route>,
    config: &'a CompareConfig,
    sink: &'a mut S,
    i: usize,
    j: usize,
    state: AlignState,
    summary: CompareSummary,
}

impl<S: CompareSink> Aligner<'_, S> {
    fn run(&mut self) -> Result<(), CompareError> {
        loop {
            match self.state {
                AlignState::Scanning => self.scan()?,
                AlignState::RealignLeft => self.realign(RouteSide::Rte)?,
                AlignState::RealignRight => self.realign(RouteSide::Sm)?,
                AlignState::DrainLeft => self.drain_left()?,
                AlignState::DrainRight => self.drain_right()?,
                AlignState::Done => return Ok(()),
            }
        }
    }

    fn scan(&mut self) -> Result<(), CompareError> {
        // Asymmetric termination: the walk stops when either side runs out.
        if self.i >= self.left.len() || self.j >= self.right.len() {
            self.state = AlignState::DrainLeft;
            return Ok(());
        }

        let lk = self.current_left_key();
        let rk = self.current_right_key();

        if lk == rk {
            self.compare_current()?;
            self.i += 1;
            self.j += 1;
            return Ok(());
        }

        // Both current keys one-sided: emit both extras and move on without
        // any realignment search.
        if !self.right.contains_key(lk.as_str()) && !self.left.contains_key(rk.as_str()) {
            trace!("complete mismatch at RTE {lk} / SM {rk}");
            self.emit_extra_left()?;
            self.emit_extra_right()?;
            self.i += 1;
            self.j += 1;
            return Ok(());
        }

        if lk.numeric() < rk.numeric() {
            self.state = AlignState::RealignLeft;
        } else if lk.numeric() > rk.numeric() {
            self.state = AlignState::RealignRight;
        } else {
            // Canonical keys with equal numeric values cannot differ
            // textually; reaching this arm means the key format broke.
            return Err(CompareError::InternalError {
                message: format!("keys {lk} and {rk} are numerically equal but not identical"),
            });
        }
        Ok(())
    }

    /// Advance the lagging cursor past keys missing from the other side
    /// until the two cursors reference the same key again.
    fn realign(&mut self, side: RouteSide) -> Result<(), CompareError> {
        let target = match side {
            RouteSide::Rte => self.current_right_key().clone(),
            RouteSide::Sm => self.current_left_key().clone(),
        };
        trace!("realigning {side} cursor toward {target}");

        loop {
            let (route, cursor) = match side {
                RouteSide::Rte => (self.left, self.i),
                RouteSide::Sm => (self.right, self.j),
            };
            match route.key_at(cursor) {
                None => {
                    return Err(CompareError::AlignmentUnderflow { side, target });
                }
                Some(key) if key.numeric() < target.numeric() => match side {
                    RouteSide::Rte => {
                        self.emit_extra_left()?;
                        self.i += 1;
                    }
                    RouteSide::Sm => {
                        self.emit_extra_right()?;
                        self.j += 1;
                    }
                },
                Some(key) => {
                    // The scan stopped on a key >= target. Anything other
                    // than an exact match means the ascending-key invariant
                    // does not hold and the run cannot continue.
                    if key != &target {
                        return Err(CompareError::AlignmentUnderflow { side, target });
                    }
                    break;
                }
            }
        }

        trace!(
            "realigned at RTE {} / SM {}",
            self.current_left_key(),
            self.current_right_key()
        );
        self.compare_current()?;
        self.i += 1;
        self.j += 1;
        self.state = AlignState::Scanning;
        Ok(())
    }

    fn drain_left(&mut self) -> Result<(), CompareError> {
        while self.i < self.left.len() {
            self.emit_extra_left()?;
            self.i += 1;
        }
        self.state = AlignState::DrainRight;
        Ok(())
    }

    fn drain_right(&mut self) -> Result<(), CompareError> {
        while self.j < self.right.len() {
            self.emit_extra_right()?;
            self.j += 1;
        }
        self.state = AlignState::Done;
        Ok(())
    }

    /// Compare the operations under the shared current key and emit the
    /// resulting entry. Callers guarantee `left.keys[i] == right.keys[j]`.
    fn compare_current(&mut self) -> Result<(), CompareError> {
        let key = self.current_left_key().clone();
        let lop = self.left.op_at(self.i).expect("cursor within bounds");
        let rop = self.right.op_at(self.j).expect("cursor within bounds");

        let entry = match compare_operations(lop, rop) {
            OperationCmp::Equal => DiffEntry::Equal { key },
            cmp => {
                let neutralize = self.config.enable_baseline_neutralization
                    && should_neutralize(lop, &key, rop, self.baseline);
                if neutralize {
                    trace!("difference at {key} neutralized by baseline");
                    DiffEntry::Neutralized {
                        key,
                        left: lop.clone(),
                        right: rop.clone(),
                    }
                } else {
                    let mask = match cmp {
                        OperationCmp::CellsDiffer { mask } => Some(mask),
                        _ => None,
                    };
                    DiffEntry::Different {
                        key,
                        left: lop.clone(),
                        right: rop.clone(),
                        mask,
                    }
                }
            }
        };
        self.emit(entry)
    }

    fn emit_extra_left(&mut self) -> Result<(), CompareError> {
        let key = self.current_left_key().clone();
        let operation = self.left.op_at(self.i).expect("cursor within bounds").clone();
        let signature = self
            .config
            .include_signatures
            .then(|| operation.signature());
        self.emit(DiffEntry::ExtraLeft {
            key,
            operation,
            signature,
        })
    }

    fn emit_extra_right(&mut self) -> Result<(), CompareError> {
        let key = self.current_right_key().clone();
        let operation = self.right.op_at(self.j).expect("cursor within bounds").clone();
        let signature = self
            .config
            .include_signatures
            .then(|| operation.signature());
        self.emit(DiffEntry::ExtraRight {
            key,
            operation,
            signature,
        })
    }

    fn emit(&mut self, entry: DiffEntry) -> Result<(), CompareError> {
        self.summary.record(&entry);
        self.sink.emit(entry)
    }

    fn current_left_key(&self) -> &OpKey {
        self.left.key_at(self.i).expect("cursor within bounds")
    }

    fn current_right_key(&self) -> &OpKey {
        self.right.key_at(self.j).expect("cursor within bounds")
    }
}
