use super::interval::{Interval, IntervalSource};
use crate::domain::TrackId;

/// Open intervals of one category, most recently opened last
///
/// Frames only ever leave from the top, so whatever this stack closes is
/// strictly nested.
#[derive(Debug, Clone)]
pub struct CategoryStack {
    track: TrackId,
    frames: Vec<Interval>,
    max_depth: usize,
}

impl CategoryStack {
    #[must_use]
    pub fn new(track: TrackId) -> Self {
        Self { track, frames: Vec::new(), max_depth: 0 }
    }

    pub fn push(&mut self, interval: Interval) {
        debug_assert_eq!(interval.track, self.track);
        self.frames.push(interval);
        self.max_depth = self.max_depth.max(self.frames.len());
    }

    pub fn pop(&mut self) -> Option<Interval> {
        self.frames.pop()
    }

    /// Index of the most recent frame opened by `source`
    #[must_use]
    pub fn position_of_last(&self, source: IntervalSource) -> Option<usize> {
        self.frames.iter().rposition(|f| f.source == source)
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Deepest the stack has been
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Open frames, outermost first
    #[must_use]
    pub fn frames(&self) -> &[Interval] {
        &self.frames
    }
}
