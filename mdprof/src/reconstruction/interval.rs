use std::sync::Arc;

use crate::domain::{Cycle, TrackId};
use crate::intervals::RuleId;

/// What opened an interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalSource {
    AutomaticCall,
    Interrupt,
    ManualRule(RuleId),
}

/// A named span on one track, open until `end` is set
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    pub label: Arc<str>,
    pub source: IntervalSource,
    pub track: TrackId,
    pub start: Cycle,
    pub end: Option<Cycle>,
    /// Closed at end of stream rather than by a matching event
    pub truncated: bool,
    /// Global order in which intervals were opened
    pub open_seq: u64,
    /// Stack pointer recorded with the opening event
    pub stack_pointer: Option<u32>,
}

impl Interval {
    pub(crate) fn open(
        label: Arc<str>,
        source: IntervalSource,
        track: TrackId,
        start: Cycle,
        open_seq: u64,
        stack_pointer: Option<u32>,
    ) -> Self {
        Self { label, source, track, start, end: None, truncated: false, open_seq, stack_pointer }
    }

    pub(crate) fn close(mut self, at: Cycle, truncated: bool) -> Self {
        debug_assert!(at >= self.start, "interval closed before it opened");
        self.end = Some(at.max(self.start));
        self.truncated = truncated;
        self
    }

    /// Cycles between start and end; zero while open
    #[must_use]
    pub fn duration(&self) -> u64 {
        self.end.map_or(0, |end| end.since(self.start))
    }

    /// `true` if `other` lies entirely within this interval
    #[must_use]
    pub fn contains(&self, other: &Interval) -> bool {
        match (self.end, other.end) {
            (Some(end), Some(other_end)) => self.start <= other.start && other_end <= end,
            _ => false,
        }
    }

    /// `true` if the two intervals share no time (touching endpoints allowed)
    #[must_use]
    pub fn is_disjoint(&self, other: &Interval) -> bool {
        match (self.end, other.end) {
            (Some(end), Some(other_end)) => end <= other.start || other_end <= self.start,
            _ => false,
        }
    }
}

/// Marker kinds drawn as instant events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    HInt,
    VInt,
}

impl MarkerKind {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            MarkerKind::HInt => "HInt",
            MarkerKind::VInt => "VInt",
        }
    }
}

/// Point-in-time event kept alongside the intervals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub kind: MarkerKind,
    pub track: TrackId,
    pub timestamp: Cycle,
}
