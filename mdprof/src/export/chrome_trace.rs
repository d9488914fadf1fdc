use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::io::Write;

use crate::domain::{Categories, Cycle, ExportError, TrackId};
use crate::reconstruction::{Interval, IntervalSource, Marker, Reconstruction};

/// Name shown for the single traced process
pub const PROCESS_NAME: &str = "M68000";

const PID: u32 = 0;

/// Chrome Trace Event format
/// Format reference: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU/preview
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChromeTraceEvent {
    /// Event name (subroutine label, interval name or metadata key)
    name: String,
    /// Category name, used for filtering
    #[serde(default, skip_serializing_if = "String::is_empty")]
    cat: String,
    /// Phase: "X" = complete, "i" = instant, "M" = metadata
    ph: String,
    /// Timestamp in microseconds
    ts: f64,
    /// Duration in microseconds (complete events only)
    #[serde(skip_serializing_if = "Option::is_none")]
    dur: Option<f64>,
    /// Process ID
    pid: u32,
    /// Thread ID, one per category
    tid: u32,
    /// Instant event scope ("g" = global)
    #[serde(skip_serializing_if = "Option::is_none")]
    s: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    args: Option<Map<String, JsonValue>>,
}

impl ChromeTraceEvent {
    fn metadata(name: &str, tid: u32, key: &str, value: JsonValue) -> Self {
        let mut args = Map::new();
        args.insert(key.to_string(), value);
        Self {
            name: name.to_string(),
            cat: String::new(),
            ph: "M".to_string(),
            ts: 0.0,
            dur: None,
            pid: PID,
            tid,
            s: None,
            args: Some(args),
        }
    }
}

/// Chrome Trace Format container
#[derive(Debug, Serialize)]
struct ChromeTrace<'a> {
    #[serde(rename = "traceEvents")]
    trace_events: &'a [ChromeTraceEvent],
    #[serde(rename = "displayTimeUnit")]
    display_time_unit: &'a str,
}

/// Chrome trace exporter: one track per category, intervals as complete events
pub struct ChromeTraceExporter {
    events: Vec<ChromeTraceEvent>,
    categories: Categories,
    /// Master clock used to turn cycles into microseconds
    clock_hz: f64,
    pretty: bool,
}

impl ChromeTraceExporter {
    /// Create an exporter for the given categories and master clock
    #[must_use]
    pub fn new(categories: Categories, clock_hz: f64) -> Self {
        Self { events: Vec::new(), categories, clock_hz, pretty: false }
    }

    /// Indent the JSON output (much larger files)
    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Add every interval and marker of a reconstruction
    ///
    /// Intervals are ordered by start time, then by the order they were
    /// opened, so a parent always precedes the children starting with it.
    pub fn add_reconstruction(&mut self, reconstruction: &Reconstruction) {
        let mut intervals: Vec<&Interval> = reconstruction.intervals.iter().collect();
        intervals.sort_by_key(|i| (i.start, i.open_seq));
        self.events.reserve(intervals.len() + reconstruction.markers.len());

        for interval in intervals {
            self.add_interval(interval);
        }
        for marker in &reconstruction.markers {
            self.add_marker(marker);
        }
    }

    /// Add one closed interval as a complete ("X") event
    pub fn add_interval(&mut self, interval: &Interval) {
        let mut args = Map::new();
        match interval.source {
            IntervalSource::AutomaticCall => {}
            IntervalSource::Interrupt => {
                args.insert("source".to_string(), "interrupt".into());
            }
            IntervalSource::ManualRule(rule) => {
                args.insert("source".to_string(), "interval".into());
                args.insert("rule".to_string(), rule.0.into());
            }
        }
        if interval.truncated {
            args.insert("truncated".to_string(), true.into());
        }

        self.events.push(ChromeTraceEvent {
            name: interval.label.to_string(),
            cat: self.categories.name(interval.track).to_string(),
            ph: "X".to_string(),
            ts: interval.start.as_micros(self.clock_hz),
            dur: Some(Cycle(interval.duration()).as_micros(self.clock_hz)),
            pid: PID,
            tid: interval.track.0,
            s: None,
            args: if args.is_empty() { None } else { Some(args) },
        });
    }

    /// Add a global instant event
    pub fn add_marker(&mut self, marker: &Marker) {
        self.events.push(ChromeTraceEvent {
            name: marker.kind.name().to_string(),
            cat: self.categories.name(marker.track).to_string(),
            ph: "i".to_string(),
            ts: marker.timestamp.as_micros(self.clock_hz),
            dur: None,
            pid: PID,
            tid: marker.track.0,
            s: Some("g".to_string()),
            args: None,
        });
    }

    /// Process and thread naming events; user categories sort below the built-ins
    fn metadata_events(&self) -> Vec<ChromeTraceEvent> {
        let mut events = vec![ChromeTraceEvent::metadata(
            "process_name",
            TrackId::MAIN_THREAD.0,
            "name",
            PROCESS_NAME.into(),
        )];
        for (track, name) in self.categories.iter() {
            events.push(ChromeTraceEvent::metadata("thread_name", track.0, "name", name.into()));
            events.push(ChromeTraceEvent::metadata(
                "thread_sort_index",
                track.0,
                "sort_index",
                track.0.into(),
            ));
        }
        events
    }

    /// Export the trace to any writer (file, stdout, buffer, etc.)
    ///
    /// # Example
    /// ```
    /// use mdprof::domain::Categories;
    /// use mdprof::export::ChromeTraceExporter;
    /// use mdprof::intervals::IntervalRuleTable;
    /// use mdprof::reconstruction::{reconstruct, ReconstructionOptions};
    /// use mdprof::recording::RawEvent;
    /// use mdprof::symbolization::SymbolTable;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let events = [RawEvent::call(10, 0x200), RawEvent::ret(50)];
    /// let reconstruction = reconstruct(
    ///     events.into_iter().map(Ok),
    ///     &IntervalRuleTable::default(),
    ///     &SymbolTable::default(),
    ///     ReconstructionOptions::default(),
    /// )?;
    ///
    /// let mut exporter = ChromeTraceExporter::new(Categories::new(), 1_000_000.0);
    /// exporter.add_reconstruction(&reconstruction);
    ///
    /// let mut buffer = Vec::new();
    /// exporter.export(&mut buffer)?;
    /// # Ok(())
    /// # }
    /// # example().unwrap();
    /// ```
    ///
    /// # Errors
    /// Returns an error if serialization or writing fails
    pub fn export<W: Write>(&self, mut writer: W) -> Result<(), ExportError> {
        let mut all_events = self.metadata_events();
        all_events.extend(self.events.iter().cloned());

        let trace = ChromeTrace { trace_events: &all_events, display_time_unit: "ms" };

        if self.pretty {
            serde_json::to_writer_pretty(&mut writer, &trace)?;
        } else {
            serde_json::to_writer(&mut writer, &trace)?;
        }
        writer.flush()?;

        Ok(())
    }

    /// Get the number of events collected (metadata excluded)
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.events.len()
    }
}
