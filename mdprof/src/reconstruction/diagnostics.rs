//! Recoverable anomalies collected while reconstructing
//!
//! None of these stop the run. They are returned next to the intervals so
//! the caller can report how much of the trace had to be patched up.

use std::fmt;
use std::sync::Arc;

use crate::domain::{Categories, Cycle, TrackId};

/// One recoverable problem found in the event stream
#[derive(Debug, Clone, PartialEq)]
pub enum Anomaly {
    /// Return with no open frame on the active stack
    UnmatchedReturn { index: usize, timestamp: Cycle, track: TrackId },
    /// Interrupt exit with no open interrupt frame
    UnmatchedInterruptExit { index: usize, timestamp: Cycle },
    /// Frame closed because an outer frame returned past it
    FrameUnwound { index: usize, timestamp: Cycle, label: Arc<str>, track: TrackId },
    /// Interval still open at end of stream, closed at the final timestamp
    ForcedClosure { label: Arc<str>, track: TrackId, opened_at: Cycle, closed_at: Cycle },
}

impl Anomaly {
    /// Render with `track_name` deciding how each track is spelled
    fn write_with(&self, f: &mut dyn fmt::Write, track_name: &dyn Fn(TrackId) -> String) -> fmt::Result {
        match self {
            Anomaly::UnmatchedReturn { index, timestamp, track } => {
                let track = track_name(*track);
                write!(f, "event #{index} at {timestamp}: return with empty stack on {track}")
            }
            Anomaly::UnmatchedInterruptExit { index, timestamp } => {
                write!(f, "event #{index} at {timestamp}: interrupt exit with no open interrupt")
            }
            Anomaly::FrameUnwound { index, timestamp, label, track } => {
                let track = track_name(*track);
                write!(f, "event #{index} at {timestamp}: {label} on {track} unwound without return")
            }
            Anomaly::ForcedClosure { label, track, opened_at, closed_at } => {
                let track = track_name(*track);
                write!(f, "{label} on {track} opened at {opened_at} still open, closed at {closed_at}")
            }
        }
    }
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_with(f, &|track| track.to_string())
    }
}

/// Anomalies in the order they were found, plus per-kind counters
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    anomalies: Vec<Anomaly>,
    pub unmatched_returns: usize,
    pub unmatched_interrupt_exits: usize,
    pub frames_unwound: usize,
    pub forced_closures: usize,
}

impl Diagnostics {
    pub fn record(&mut self, anomaly: Anomaly) {
        match anomaly {
            Anomaly::UnmatchedReturn { .. } => self.unmatched_returns += 1,
            Anomaly::UnmatchedInterruptExit { .. } => self.unmatched_interrupt_exits += 1,
            Anomaly::FrameUnwound { .. } => self.frames_unwound += 1,
            Anomaly::ForcedClosure { .. } => self.forced_closures += 1,
        }
        self.anomalies.push(anomaly);
    }

    #[must_use]
    pub fn anomalies(&self) -> &[Anomaly] {
        &self.anomalies
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.anomalies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.anomalies.is_empty()
    }
}

/// Print a one-line anomaly summary, then up to `detail_limit` entries
pub fn display_diagnostics(diagnostics: &Diagnostics, categories: &Categories, detail_limit: usize) {
    if diagnostics.is_empty() {
        return;
    }
    eprintln!(
        "anomalies: unmatched_returns={} unmatched_interrupt_exits={} frames_unwound={} forced_closures={}",
        diagnostics.unmatched_returns,
        diagnostics.unmatched_interrupt_exits,
        diagnostics.frames_unwound,
        diagnostics.forced_closures,
    );
    for anomaly in diagnostics.anomalies().iter().take(detail_limit) {
        eprintln!("  {}", describe(anomaly, categories));
    }
    if diagnostics.len() > detail_limit {
        eprintln!("  ... and {} more", diagnostics.len() - detail_limit);
    }
}

/// Anomaly text with tracks spelled as category names
fn describe(anomaly: &Anomaly, categories: &Categories) -> String {
    let mut text = String::new();
    // Writing into a String cannot fail
    let _ = anomaly.write_with(&mut text, &|track| categories.name(track).to_string());
    text
}
