//! Per-stencil segment aggregation.
//!
//! The aggregator is a small state machine driven by the ordered event stream:
//! no stencil is active until a product is loaded, and every board print while a
//! stencil is active counts toward it. Gaps between consecutive prints of the
//! same segment are bucketed as cycle or downtime.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;

use super::summary::{summarize, SummaryRow};
use crate::parsers::types::{LogEvent, ParsedLine};
use crate::state::DOWNTIME_THRESHOLD_SECS;

/// Bucket for the gap between two board prints
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeltaKind {
    Cycle,
    Downtime,
}

/// Bucket a gap in seconds against the downtime threshold.
///
/// Non-positive gaps (clock went backwards, duplicate timestamps) are not
/// recorded anywhere and yield `None`. The threshold itself is still a cycle.
pub fn classify_delta(delta_secs: i64, threshold_secs: i64) -> Option<DeltaKind> {
    if delta_secs <= 0 {
        None
    } else if delta_secs > threshold_secs {
        Some(DeltaKind::Downtime)
    } else {
        Some(DeltaKind::Cycle)
    }
}

/// Accumulated counters for one stencil across the whole run
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StencilState {
    pub name: String,
    /// Boards printed while this stencil was active
    pub board_count: u64,
    /// Cycle gaps in seconds, in the order they were observed
    pub cycle_durations: Vec<i64>,
    /// Downtime gaps in seconds, in the order they were observed
    pub downtime_durations: Vec<i64>,
}

impl StencilState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Check if this stencil produced at least one observable cycle
    pub fn qualifies(&self) -> bool {
        self.board_count > 1 && !self.cycle_durations.is_empty()
    }

    fn record(&mut self, delta_secs: i64, threshold_secs: i64) {
        match classify_delta(delta_secs, threshold_secs) {
            Some(DeltaKind::Cycle) => self.cycle_durations.push(delta_secs),
            Some(DeltaKind::Downtime) => self.downtime_durations.push(delta_secs),
            None => tracing::trace!(
                stencil = %self.name,
                delta_secs,
                "Discarding non-positive board interval"
            ),
        }
    }
}

/// The stencil currently loaded on the stream and the last print seen for it
#[derive(Clone, Debug)]
struct ActiveSegment {
    index: usize,
    last_timestamp: Option<NaiveDateTime>,
}

/// Folds timestamped events into per-stencil state
#[derive(Clone, Debug)]
pub struct CycleAggregator {
    threshold_secs: i64,
    /// Stencils in first-seen order
    stencils: Vec<StencilState>,
    index: HashMap<String, usize>,
    active: Option<ActiveSegment>,
}

impl Default for CycleAggregator {
    fn default() -> Self {
        Self::with_threshold(DOWNTIME_THRESHOLD_SECS)
    }
}

impl CycleAggregator {
    /// Create an aggregator using [`DOWNTIME_THRESHOLD_SECS`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an aggregator with a custom downtime threshold in seconds
    pub fn with_threshold(threshold_secs: i64) -> Self {
        Self {
            threshold_secs,
            stencils: vec![],
            index: HashMap::new(),
            active: None,
        }
    }

    pub fn threshold_secs(&self) -> i64 {
        self.threshold_secs
    }

    /// Start a new input stream (a new file).
    ///
    /// No stencil is active until the stream loads one; accumulated counters
    /// are kept.
    pub fn begin_stream(&mut self) {
        self.active = None;
    }

    /// Apply one parsed line. Returns true if the line changed any state.
    pub fn apply(&mut self, line: &ParsedLine) -> bool {
        match &line.event {
            LogEvent::ProductLoaded { stencil } => {
                self.load_product(stencil);
                true
            }
            LogEvent::BoardPrinted => self.record_print(line.timestamp),
            LogEvent::Other => false,
        }
    }

    /// Make `stencil` the active stencil and restart its delta chain.
    ///
    /// An empty name leaves no stencil active.
    pub fn load_product(&mut self, stencil: &str) {
        if stencil.is_empty() {
            self.active = None;
            return;
        }

        let index = match self.index.get(stencil) {
            Some(&index) => index,
            None => {
                self.stencils.push(StencilState::new(stencil));
                let index = self.stencils.len() - 1;
                self.index.insert(stencil.to_string(), index);
                index
            }
        };

        self.active = Some(ActiveSegment {
            index,
            last_timestamp: None,
        });
    }

    /// Count a printed board for the active stencil.
    ///
    /// Returns false when no stencil is active and the print was ignored.
    pub fn record_print(&mut self, timestamp: NaiveDateTime) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };

        let state = &mut self.stencils[active.index];
        state.board_count += 1;

        if let Some(last) = active.last_timestamp {
            let delta_secs = (timestamp - last).num_seconds();
            state.record(delta_secs, self.threshold_secs);
        }
        active.last_timestamp = Some(timestamp);
        true
    }

    /// Name of the stencil currently loaded on the stream
    pub fn active_stencil(&self) -> Option<&str> {
        self.active
            .as_ref()
            .map(|a| self.stencils[a.index].name.as_str())
    }

    /// All stencils seen so far, in first-seen order
    pub fn stencils(&self) -> &[StencilState] {
        &self.stencils
    }

    /// Look up a stencil's accumulated state by name
    pub fn get(&self, stencil: &str) -> Option<&StencilState> {
        self.index.get(stencil).map(|&i| &self.stencils[i])
    }

    /// Reduce the accumulated state into summary rows
    pub fn summarize(&self) -> Vec<SummaryRow> {
        summarize(&self.stencils)
    }
}
