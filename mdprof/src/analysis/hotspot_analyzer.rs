//! Hotspot analysis for reconstructed intervals.
//!
//! Aggregates intervals by (category, label) to show which subroutines,
//! interrupt handlers and manual intervals account for the most time.
//!
//! Durations are inclusive: a subroutine's time includes everything it
//! called. Intervals closed at end of stream are counted with the duration
//! they were given.

// Percentage calculations intentionally convert u64 to f64
#![allow(clippy::cast_precision_loss)]

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{Categories, Cycle, TrackId};
use crate::reconstruction::{Interval, Reconstruction};

/// Aggregated statistics for one label on one track.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelHotspot {
    pub track: TrackId,
    pub label: Arc<str>,

    /// Number of intervals with this label.
    pub count: u64,

    /// Sum of inclusive durations, in cycles.
    pub total_cycles: u64,

    /// Longest single interval, in cycles.
    pub max_cycles: u64,

    /// Share of the traced span (0.0 - 100.0).
    pub percentage: f64,
}

#[derive(Debug, Clone, Default)]
struct LabelStats {
    count: u64,
    total_cycles: u64,
    max_cycles: u64,
}

/// Incremental aggregator, fed one interval at a time.
#[derive(Debug, Default)]
pub struct HotspotStats {
    labels: HashMap<(TrackId, Arc<str>), LabelStats>,
    first_start: Option<Cycle>,
    last_end: Option<Cycle>,
}

impl HotspotStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one closed interval; open intervals are ignored.
    pub fn record_interval(&mut self, interval: &Interval) {
        let Some(end) = interval.end else {
            return;
        };
        let duration = interval.duration();

        let stats = self.labels.entry((interval.track, interval.label.clone())).or_default();
        stats.count += 1;
        stats.total_cycles += duration;
        stats.max_cycles = stats.max_cycles.max(duration);

        self.first_start = Some(self.first_start.map_or(interval.start, |s| s.min(interval.start)));
        self.last_end = Some(self.last_end.map_or(end, |e| e.max(end)));
    }

    /// Cycles between the earliest start and the latest end seen.
    #[must_use]
    pub fn span_cycles(&self) -> u64 {
        match (self.first_start, self.last_end) {
            (Some(start), Some(end)) => end.since(start),
            _ => 0,
        }
    }

    /// Hotspots sorted by total time, longest first; ties broken by label.
    #[must_use]
    pub fn to_hotspots(&self) -> Vec<LabelHotspot> {
        let span = self.span_cycles();
        let mut hotspots: Vec<LabelHotspot> = self
            .labels
            .iter()
            .map(|((track, label), stats)| LabelHotspot {
                track: *track,
                label: label.clone(),
                count: stats.count,
                total_cycles: stats.total_cycles,
                max_cycles: stats.max_cycles,
                percentage: if span > 0 {
                    stats.total_cycles as f64 / span as f64 * 100.0
                } else {
                    0.0
                },
            })
            .collect();

        hotspots.sort_by(|a, b| {
            b.total_cycles
                .cmp(&a.total_cycles)
                .then_with(|| a.track.cmp(&b.track))
                .then_with(|| a.label.cmp(&b.label))
        });
        hotspots
    }
}

/// Analyze a whole reconstruction (batch form of [`HotspotStats`]).
#[must_use]
pub fn analyze_hotspots(reconstruction: &Reconstruction) -> Vec<LabelHotspot> {
    let mut stats = HotspotStats::new();
    for interval in &reconstruction.intervals {
        stats.record_interval(interval);
    }
    stats.to_hotspots()
}

/// Print the `top` hotspots as a table on stdout.
pub fn display_hotspots(hotspots: &[LabelHotspot], categories: &Categories, top: usize, clock_hz: f64) {
    if hotspots.is_empty() || top == 0 {
        return;
    }
    println!("{:>7}  {:>10}  {:>10}  {:<12}  LABEL", "TIME%", "TOTAL ms", "CALLS", "CATEGORY");
    for hotspot in hotspots.iter().take(top) {
        let total_ms = Cycle(hotspot.total_cycles).as_micros(clock_hz) / 1000.0;
        println!(
            "{:>6.2}%  {:>10.3}  {:>10}  {:<12}  {}",
            hotspot.percentage,
            total_ms,
            hotspot.count,
            categories.name(hotspot.track),
            hotspot.label,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconstruction::IntervalSource;

    fn interval(label: &str, track: TrackId, start: u64, end: u64) -> Interval {
        Interval {
            label: label.into(),
            source: IntervalSource::AutomaticCall,
            track,
            start: Cycle(start),
            end: Some(Cycle(end)),
            truncated: false,
            open_seq: 0,
            stack_pointer: None,
        }
    }

    #[test]
    fn test_aggregates_by_track_and_label() {
        let reconstruction = Reconstruction {
            intervals: vec![
                interval("Update", TrackId::MAIN_THREAD, 0, 40),
                interval("Update", TrackId::MAIN_THREAD, 50, 70),
                interval("Update", TrackId::INTERRUPTS, 40, 45),
                interval("Draw", TrackId::MAIN_THREAD, 70, 100),
            ],
            ..Default::default()
        };
        let hotspots = analyze_hotspots(&reconstruction);

        assert_eq!(hotspots.len(), 3);
        assert_eq!(&*hotspots[0].label, "Update");
        assert_eq!(hotspots[0].track, TrackId::MAIN_THREAD);
        assert_eq!(hotspots[0].count, 2);
        assert_eq!(hotspots[0].total_cycles, 60);
        assert_eq!(hotspots[0].max_cycles, 40);
        assert!((hotspots[0].percentage - 60.0).abs() < 1e-9);
        assert_eq!(&*hotspots[1].label, "Draw");
        assert_eq!(hotspots[2].track, TrackId::INTERRUPTS);
    }

    #[test]
    fn test_empty_reconstruction() {
        let hotspots = analyze_hotspots(&Reconstruction::default());
        assert!(hotspots.is_empty());
    }

    #[test]
    fn test_zero_span_has_zero_percentage() {
        let mut stats = HotspotStats::new();
        stats.record_interval(&interval("Tick", TrackId::MAIN_THREAD, 5, 5));
        let hotspots = stats.to_hotspots();
        assert_eq!(hotspots[0].count, 1);
        assert!(hotspots[0].percentage.abs() < f64::EPSILON);
    }
}
