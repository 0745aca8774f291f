//! Micro-worldtest harness for deterministic, tick-based scenario tests.
//!
//! A micro-worldtest is intentionally small: it steps a tiny simulation for a
//! fixed number of ticks and snapshots selected state each tick. The frames
//! are returned for assertions, optionally compared against a golden JSON
//! file, and two runs can be compared with [`assert_same_json`].

use crate::snapshot::{assert_json_snapshot, assert_same_json};
use anyhow::Result;
use blockmotion_core::SimTick;
use serde::Serialize;
use std::path::PathBuf;

/// Configuration for a micro-worldtest.
#[derive(Debug, Clone)]
pub struct MicroWorldtestConfig {
    /// Human-readable name (written into the report).
    pub name: String,
    /// Number of ticks to step (report includes the initial snapshot at tick 0).
    pub ticks: u64,
    /// Golden JSON file to compare against, if any.
    pub snapshot_path: Option<PathBuf>,
}

impl MicroWorldtestConfig {
    /// Config without a golden file.
    pub fn new(name: impl Into<String>, ticks: u64) -> Self {
        Self {
            name: name.into(),
            ticks,
            snapshot_path: None,
        }
    }
}

/// Single snapshot frame captured at a given tick.
#[derive(Debug, Clone, Serialize)]
pub struct MicroWorldtestFrame<S> {
    /// Tick number.
    pub tick: u64,
    /// Snapshot payload.
    pub snapshot: S,
}

/// Every frame of one run.
#[derive(Debug, Clone, Serialize)]
pub struct MicroWorldtestReport<S> {
    /// Name from the config.
    pub name: String,
    /// Frames in tick order, starting with tick 0.
    pub frames: Vec<MicroWorldtestFrame<S>>,
}

impl<S> MicroWorldtestReport<S> {
    /// Snapshot after the last step.
    pub fn last(&self) -> Option<&S> {
        self.frames.last().map(|frame| &frame.snapshot)
    }

    /// Iterate snapshots in tick order.
    pub fn snapshots(&self) -> impl Iterator<Item = &S> {
        self.frames.iter().map(|frame| &frame.snapshot)
    }
}

impl<S: Serialize> MicroWorldtestReport<S> {
    /// Fail unless `other` recorded exactly the same frames.
    pub fn assert_matches(&self, other: &Self) -> Result<()> {
        assert_same_json(&self.frames, &other.frames)
    }
}

/// Run a micro-worldtest and return its frames.
///
/// Captures the initial snapshot at tick 0, then steps `config.ticks` times,
/// capturing a snapshot after each step (so the report contains `ticks + 1`
/// frames). A failing step aborts the run. When `config.snapshot_path` is set
/// the report is also checked against (or written to) that golden file.
pub fn run_micro_worldtest<State, Snapshot, StepFn, SnapFn>(
    config: MicroWorldtestConfig,
    mut state: State,
    mut step: StepFn,
    mut snapshot: SnapFn,
) -> Result<MicroWorldtestReport<Snapshot>>
where
    Snapshot: Serialize,
    StepFn: FnMut(SimTick, &mut State) -> Result<()>,
    SnapFn: FnMut(SimTick, &State) -> Snapshot,
{
    let mut frames = Vec::with_capacity(config.ticks as usize + 1);

    let mut tick = SimTick::ZERO;
    frames.push(MicroWorldtestFrame {
        tick: tick.0,
        snapshot: snapshot(tick, &state),
    });

    for _ in 0..config.ticks {
        step(tick, &mut state)?;
        tick = tick.advance(1);
        frames.push(MicroWorldtestFrame {
            tick: tick.0,
            snapshot: snapshot(tick, &state),
        });
    }

    let report = MicroWorldtestReport {
        name: config.name,
        frames,
    };
    if let Some(path) = config.snapshot_path {
        assert_json_snapshot(path, &report)?;
    }
    Ok(report)
}
