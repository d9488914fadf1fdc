//! # Stack Reconstruction Engine
//!
//! Replays the event stream against one [`CategoryStack`] per track plus one
//! open/closed slot per interval rule.
//!
//! ## Transitions
//!
//! | Event            | Effect                                                     |
//! |------------------|------------------------------------------------------------|
//! | `Call`           | push on the active stack                                   |
//! | `Return`         | close the latest call on the active stack, else            |
//! |                  | `UnmatchedReturn`; interrupt frames are left open          |
//! | `InterruptEnter` | push on the Interrupts stack; main thread left untouched   |
//! | `InterruptExit`  | pop Interrupts down to the latest interrupt frame          |
//! | `BreakpointHit`  | close matching rules listing it as exit, then open entries |
//! | `HInt`/`VInt`    | optional instant marker on the Interrupts track            |
//!
//! The active stack is Interrupts while it holds any frame, the main thread
//! otherwise. At end of stream every open interval is closed at the last
//! timestamp and flagged as truncated.

use log::{debug, trace};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use super::category::CategoryStack;
use super::diagnostics::{Anomaly, Diagnostics};
use super::interval::{Interval, IntervalSource, Marker, MarkerKind};
use crate::domain::{Address, Cycle, DecodeError, TrackId};
use crate::intervals::{IntervalRuleTable, RuleId};
use crate::recording::{EventKind, RawEvent};
use crate::symbolization::{label_for, SymbolResolver};

/// Engine knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconstructionOptions {
    /// Emit a marker for every vertical interrupt
    pub vint_markers: bool,
    /// Emit a marker for every horizontal interrupt (one per scanline, noisy)
    pub hint_markers: bool,
    /// On return, also unwind deeper frames whose entry stack pointer shows
    /// they were abandoned (requires stack pointers in the recording)
    pub unwind_by_stack_pointer: bool,
}

impl Default for ReconstructionOptions {
    fn default() -> Self {
        Self { vint_markers: true, hint_markers: false, unwind_by_stack_pointer: false }
    }
}

/// Everything the engine produced for one run
#[derive(Debug, Default, Clone)]
pub struct Reconstruction {
    /// Closed intervals in closing order
    pub intervals: Vec<Interval>,
    pub markers: Vec<Marker>,
    pub diagnostics: Diagnostics,
    /// Timestamp of the final event, `None` for an empty stream
    pub last_timestamp: Option<Cycle>,
    pub event_count: usize,
    /// Deepest nesting reached per track
    pub max_depth: BTreeMap<TrackId, usize>,
}

impl Reconstruction {
    /// Intervals drawn on `track`, in closing order
    pub fn intervals_on(&self, track: TrackId) -> impl Iterator<Item = &Interval> {
        self.intervals.iter().filter(move |i| i.track == track)
    }

    /// Intervals closed synthetically at end of stream
    pub fn truncated(&self) -> impl Iterator<Item = &Interval> {
        self.intervals.iter().filter(|i| i.truncated)
    }
}

/// Reconstruct intervals from a decoded event stream
///
/// Pure function of (events, rules, symbols): nothing outside the returned
/// [`Reconstruction`] is touched.
///
/// # Errors
/// Propagates the first decode error from `events`, or
/// [`DecodeError::OutOfOrder`] if a timestamp goes backwards.
pub fn reconstruct<I, R>(
    events: I,
    rules: &IntervalRuleTable,
    symbols: &R,
    options: ReconstructionOptions,
) -> Result<Reconstruction, DecodeError>
where
    I: IntoIterator<Item = Result<RawEvent, DecodeError>>,
    R: SymbolResolver + ?Sized,
{
    let mut engine = StackEngine::new(rules, symbols, options);
    for event in events {
        engine.process(&event?)?;
    }
    Ok(engine.finish())
}

/// Incremental form of [`reconstruct`]
pub struct StackEngine<'a, R: SymbolResolver + ?Sized> {
    rules: &'a IntervalRuleTable,
    symbols: &'a R,
    options: ReconstructionOptions,

    stacks: BTreeMap<TrackId, CategoryStack>,
    open_rules: BTreeMap<RuleId, Interval>,
    labels: HashMap<Address, Arc<str>>,

    closed: Vec<Interval>,
    markers: Vec<Marker>,
    diagnostics: Diagnostics,
    next_seq: u64,
    event_count: usize,
    last_timestamp: Option<Cycle>,
}

impl<'a, R: SymbolResolver + ?Sized> StackEngine<'a, R> {
    #[must_use]
    pub fn new(rules: &'a IntervalRuleTable, symbols: &'a R, options: ReconstructionOptions) -> Self {
        Self {
            rules,
            symbols,
            options,
            stacks: BTreeMap::new(),
            open_rules: BTreeMap::new(),
            labels: HashMap::new(),
            closed: Vec::new(),
            markers: Vec::new(),
            diagnostics: Diagnostics::default(),
            next_seq: 0,
            event_count: 0,
            last_timestamp: None,
        }
    }

    /// Apply one event
    ///
    /// # Errors
    /// Returns [`DecodeError::OutOfOrder`] if `event` is older than its predecessor
    pub fn process(&mut self, event: &RawEvent) -> Result<(), DecodeError> {
        let index = self.event_count;
        if let Some(previous) = self.last_timestamp {
            if event.timestamp < previous {
                return Err(DecodeError::OutOfOrder {
                    previous: previous.0,
                    current: event.timestamp.0,
                    index,
                });
            }
        }
        self.event_count += 1;
        self.last_timestamp = Some(event.timestamp);

        match event.kind {
            EventKind::Call { target } => {
                let track = self.active_track();
                let label = self.label(target);
                self.push(track, label, IntervalSource::AutomaticCall, event);
            }
            EventKind::Return => self.handle_return(index, event),
            EventKind::InterruptEnter { vector } => {
                let label = self.label(vector);
                self.push(TrackId::INTERRUPTS, label, IntervalSource::Interrupt, event);
            }
            EventKind::InterruptExit => self.handle_interrupt_exit(index, event.timestamp),
            EventKind::BreakpointHit { address } => self.handle_breakpoint(address, event),
            EventKind::VerticalInterrupt => {
                if self.options.vint_markers {
                    self.mark(MarkerKind::VInt, event.timestamp);
                }
            }
            EventKind::HorizontalInterrupt => {
                if self.options.hint_markers {
                    self.mark(MarkerKind::HInt, event.timestamp);
                }
            }
        }
        Ok(())
    }

    /// Close everything still open at the last timestamp and hand back the result
    #[must_use]
    pub fn finish(mut self) -> Reconstruction {
        let end = self.last_timestamp.unwrap_or_default();

        let mut max_depth = BTreeMap::new();
        for (track, mut stack) in std::mem::take(&mut self.stacks) {
            max_depth.insert(track, stack.max_depth());
            while let Some(frame) = stack.pop() {
                self.force_close(frame, end);
            }
        }
        for (_, interval) in std::mem::take(&mut self.open_rules) {
            self.force_close(interval, end);
        }

        debug!(
            "Reconstructed {} intervals from {} events ({} anomalies)",
            self.closed.len(),
            self.event_count,
            self.diagnostics.len()
        );

        Reconstruction {
            intervals: self.closed,
            markers: self.markers,
            diagnostics: self.diagnostics,
            last_timestamp: self.last_timestamp,
            event_count: self.event_count,
            max_depth,
        }
    }

    /// Stack that calls and returns currently apply to
    fn active_track(&self) -> TrackId {
        let in_interrupt = self.stacks.get(&TrackId::INTERRUPTS).is_some_and(|s| !s.is_empty());
        if in_interrupt {
            TrackId::INTERRUPTS
        } else {
            TrackId::MAIN_THREAD
        }
    }

    fn stack(&mut self, track: TrackId) -> &mut CategoryStack {
        self.stacks.entry(track).or_insert_with(|| CategoryStack::new(track))
    }

    fn label(&mut self, address: Address) -> Arc<str> {
        let symbols = self.symbols;
        self.labels.entry(address).or_insert_with(|| label_for(symbols, address.0).into()).clone()
    }

    fn open_interval(
        &mut self,
        track: TrackId,
        label: Arc<str>,
        source: IntervalSource,
        event: &RawEvent,
    ) -> Interval {
        let seq = self.next_seq;
        self.next_seq += 1;
        Interval::open(label, source, track, event.timestamp, seq, event.stack_pointer)
    }

    fn push(&mut self, track: TrackId, label: Arc<str>, source: IntervalSource, event: &RawEvent) {
        trace!("{} open {label} on {track}", event.timestamp);
        let interval = self.open_interval(track, label, source, event);
        self.stack(track).push(interval);
    }

    fn handle_return(&mut self, index: usize, event: &RawEvent) {
        let track = self.active_track();
        let timestamp = event.timestamp;
        let Some(position) = self.returning_frame(track, event) else {
            debug!("Unmatched return at {timestamp} (event #{index}) on {track}");
            self.diagnostics.record(Anomaly::UnmatchedReturn { index, timestamp, track });
            return;
        };

        // Frames above the returning one were left without their own return
        while self.stack(track).depth() > position + 1 {
            if let Some(frame) = self.stack(track).pop() {
                self.diagnostics.record(Anomaly::FrameUnwound {
                    index,
                    timestamp,
                    label: frame.label.clone(),
                    track,
                });
                self.closed.push(frame.close(timestamp, false));
            }
        }
        if let Some(frame) = self.stack(track).pop() {
            self.closed.push(frame.close(timestamp, false));
        }
    }

    /// Stack position of the call a return belongs to
    ///
    /// An interrupt frame only closes on its interrupt exit, so a return with
    /// nothing but the interrupt above it matches no frame.
    fn returning_frame(&mut self, track: TrackId, event: &RawEvent) -> Option<usize> {
        let unwind = self.options.unwind_by_stack_pointer;
        let frames = self.stack(track).frames();
        let top = frames.len().checked_sub(1)?;
        if frames[top].source != IntervalSource::AutomaticCall {
            return None;
        }
        let Some(sp) = event.stack_pointer.filter(|_| unwind) else {
            return Some(top);
        };

        // Every call whose entry SP is at or below the returning SP (+4 for
        // the return address not yet popped) is gone; the outermost of them
        // is the one returning
        let mut position = top;
        for (i, frame) in frames.iter().enumerate().rev() {
            let gone = frame.source == IntervalSource::AutomaticCall
                && frame.stack_pointer.is_some_and(|entry| entry <= sp.saturating_add(4));
            if !gone {
                break;
            }
            position = i;
        }
        Some(position)
    }

    fn handle_interrupt_exit(&mut self, index: usize, timestamp: Cycle) {
        let stack = self.stack(TrackId::INTERRUPTS);
        let Some(position) = stack.position_of_last(IntervalSource::Interrupt) else {
            debug!("Unmatched interrupt exit at {timestamp} (event #{index})");
            self.diagnostics.record(Anomaly::UnmatchedInterruptExit { index, timestamp });
            return;
        };

        // Calls made by the handler that never returned
        while self.stack(TrackId::INTERRUPTS).depth() > position + 1 {
            if let Some(frame) = self.stack(TrackId::INTERRUPTS).pop() {
                self.diagnostics.record(Anomaly::FrameUnwound {
                    index,
                    timestamp,
                    label: frame.label.clone(),
                    track: TrackId::INTERRUPTS,
                });
                self.closed.push(frame.close(timestamp, false));
            }
        }
        if let Some(frame) = self.stack(TrackId::INTERRUPTS).pop() {
            self.closed.push(frame.close(timestamp, false));
        }
    }

    /// Exits of every matching rule first, then entries, so an address that
    /// is both closes the running instance and immediately reopens it
    fn handle_breakpoint(&mut self, address: Address, event: &RawEvent) {
        let rules = self.rules;
        let matching = rules.matching(address);
        if matching.is_empty() {
            trace!("Breakpoint at {address} matches no interval rule");
            return;
        }

        for &id in matching {
            if rules.rule(id).is_exit(address) {
                if let Some(open) = self.open_rules.remove(&id) {
                    self.closed.push(open.close(event.timestamp, false));
                }
            }
        }
        for &id in matching {
            let rule = rules.rule(id);
            if rule.is_entry(address) && !self.open_rules.contains_key(&id) {
                let label: Arc<str> = Arc::from(rule.name.as_str());
                let interval =
                    self.open_interval(rule.track, label, IntervalSource::ManualRule(id), event);
                self.open_rules.insert(id, interval);
            }
        }
    }

    fn mark(&mut self, kind: MarkerKind, timestamp: Cycle) {
        self.markers.push(Marker { kind, track: TrackId::INTERRUPTS, timestamp });
    }

    fn force_close(&mut self, interval: Interval, end: Cycle) {
        self.diagnostics.record(Anomaly::ForcedClosure {
            label: interval.label.clone(),
            track: interval.track,
            opened_at: interval.start,
            closed_at: end,
        });
        self.closed.push(interval.close(end, true));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Categories;
    use crate::intervals::IntervalRule;
    use crate::symbolization::SymbolTable;

    fn run(events: &[RawEvent], rules: &IntervalRuleTable) -> Reconstruction {
        let symbols = SymbolTable::from_pairs([(0xA000, "PlayerUpdate"), (0x0200, "VBlank")]);
        reconstruct(events.iter().copied().map(Ok), rules, &symbols, ReconstructionOptions::default())
            .unwrap()
    }

    fn span(interval: &Interval) -> (u64, u64) {
        (interval.start.0, interval.end.map_or(u64::MAX, |e| e.0))
    }

    fn toggle_rules() -> IntervalRuleTable {
        IntervalRuleTable::compile(
            vec![IntervalRule::new(&[0x1000], &[0x1000], "Frame", TrackId::MAIN_THREAD)],
            Categories::new(),
        )
    }

    #[test]
    fn test_single_call_return() {
        let result =
            run(&[RawEvent::call(10, 0xA000), RawEvent::ret(50)], &IntervalRuleTable::default());
        assert_eq!(result.intervals.len(), 1);
        let interval = &result.intervals[0];
        assert_eq!(&*interval.label, "PlayerUpdate");
        assert_eq!(span(interval), (10, 50));
        assert_eq!(interval.track, TrackId::MAIN_THREAD);
        assert!(!interval.truncated);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_unresolved_call_gets_synthesized_label() {
        let result =
            run(&[RawEvent::call(0, 0xB00), RawEvent::ret(1)], &IntervalRuleTable::default());
        assert_eq!(&*result.intervals[0].label, "sub_000B00");
    }

    #[test]
    fn test_unmatched_return_is_recoverable() {
        let result = run(&[RawEvent::ret(30)], &IntervalRuleTable::default());
        assert!(result.intervals.is_empty());
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(
            result.diagnostics.anomalies()[0],
            Anomaly::UnmatchedReturn { index: 0, timestamp: Cycle(30), track: TrackId::MAIN_THREAD }
        );
    }

    #[test]
    fn test_interrupt_does_not_split_main_thread() {
        let result = run(
            &[
                RawEvent::call(90, 0xA000),
                RawEvent::interrupt_enter(100, 0x0200),
                RawEvent::interrupt_exit(120),
                RawEvent::ret(200),
            ],
            &IntervalRuleTable::default(),
        );
        let main: Vec<_> = result.intervals_on(TrackId::MAIN_THREAD).map(span).collect();
        let interrupts: Vec<_> = result.intervals_on(TrackId::INTERRUPTS).collect();
        assert_eq!(main, vec![(90, 200)]);
        assert_eq!(interrupts.len(), 1);
        assert_eq!(span(interrupts[0]), (100, 120));
        assert_eq!(&*interrupts[0].label, "VBlank");
    }

    #[test]
    fn test_calls_inside_interrupt_nest_under_handler() {
        let result = run(
            &[
                RawEvent::call(0, 0xA000),
                RawEvent::interrupt_enter(10, 0x0200),
                RawEvent::call(12, 0xC000),
                RawEvent::ret(15),
                RawEvent::interrupt_exit(20),
                RawEvent::ret(30),
            ],
            &IntervalRuleTable::default(),
        );
        let interrupts: Vec<_> = result.intervals_on(TrackId::INTERRUPTS).map(span).collect();
        assert_eq!(interrupts, vec![(12, 15), (10, 20)]);
        let main: Vec<_> = result.intervals_on(TrackId::MAIN_THREAD).map(span).collect();
        assert_eq!(main, vec![(0, 30)]);
    }

    #[test]
    fn test_interrupt_exit_unwinds_handler_calls() {
        let result = run(
            &[
                RawEvent::interrupt_enter(10, 0x0200),
                RawEvent::call(12, 0xC000),
                RawEvent::interrupt_exit(20),
            ],
            &IntervalRuleTable::default(),
        );
        let spans: Vec<_> = result.intervals.iter().map(span).collect();
        assert_eq!(spans, vec![(12, 20), (10, 20)]);
        assert_eq!(result.diagnostics.frames_unwound, 1);
        assert_eq!(result.diagnostics.forced_closures, 0);
    }

    #[test]
    fn test_unmatched_interrupt_exit() {
        let result = run(&[RawEvent::interrupt_exit(5)], &IntervalRuleTable::default());
        assert!(result.intervals.is_empty());
        assert_eq!(result.diagnostics.unmatched_interrupt_exits, 1);
    }

    #[test]
    fn test_toggle_rule() {
        let result = run(
            &[RawEvent::breakpoint(5, 0x1000), RawEvent::breakpoint(9, 0x1000), RawEvent::breakpoint(20, 0x1000)],
            &toggle_rules(),
        );
        let closed: Vec<_> = result.intervals.iter().filter(|i| !i.truncated).map(span).collect();
        assert_eq!(closed, vec![(5, 9), (9, 20)]);
        // the instance reopened at 20 is closed synthetically at the same instant
        let truncated: Vec<_> = result.truncated().map(span).collect();
        assert_eq!(truncated, vec![(20, 20)]);
    }

    #[test]
    fn test_entry_while_open_is_ignored() {
        let rules = IntervalRuleTable::compile(
            vec![IntervalRule::new(&[0x10, 0x11], &[0x20], "Load", TrackId::MAIN_THREAD)],
            Categories::new(),
        );
        let result = run(
            &[
                RawEvent::breakpoint(1, 0x20),
                RawEvent::breakpoint(2, 0x10),
                RawEvent::breakpoint(3, 0x11),
                RawEvent::breakpoint(7, 0x20),
            ],
            &rules,
        );
        let spans: Vec<_> = result.intervals.iter().map(span).collect();
        assert_eq!(spans, vec![(2, 7)]);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_rules_sharing_an_address_are_independent() {
        let mut categories = Categories::new();
        let dma = categories.intern("DMA");
        let rules = IntervalRuleTable::compile(
            vec![
                IntervalRule::new(&[0x10], &[0x30], "Outer", TrackId::MAIN_THREAD),
                IntervalRule::new(&[0x20], &[0x10], "Inner", dma),
            ],
            categories,
        );
        let result = run(
            &[
                RawEvent::breakpoint(1, 0x20),
                RawEvent::breakpoint(4, 0x10),
                RawEvent::breakpoint(8, 0x30),
            ],
            &rules,
        );
        let inner: Vec<_> = result.intervals_on(dma).map(span).collect();
        let outer: Vec<_> = result.intervals_on(TrackId::MAIN_THREAD).map(span).collect();
        assert_eq!(inner, vec![(1, 4)]);
        assert_eq!(outer, vec![(4, 8)]);
    }

    #[test]
    fn test_open_frames_force_closed_at_last_timestamp() {
        let result = run(
            &[RawEvent::call(0, 0xA000), RawEvent::call(5, 0xB000), RawEvent::ret(8), RawEvent::call(12, 0xC000)],
            &IntervalRuleTable::default(),
        );
        let spans: Vec<_> = result.intervals.iter().map(|i| (span(i), i.truncated)).collect();
        assert_eq!(spans, vec![((5, 8), false), ((12, 12), true), ((0, 12), true)]);
        assert_eq!(result.diagnostics.forced_closures, 2);
    }

    #[test]
    fn test_zero_duration_interval_preserved() {
        let result =
            run(&[RawEvent::call(7, 0xA000), RawEvent::ret(7)], &IntervalRuleTable::default());
        assert_eq!(result.intervals.len(), 1);
        assert_eq!(result.intervals[0].duration(), 0);
        assert!(!result.intervals[0].truncated);
    }

    #[test]
    fn test_stack_pointer_unwinding() {
        let symbols = SymbolTable::default();
        let options = ReconstructionOptions { unwind_by_stack_pointer: true, ..Default::default() };
        let events = [
            RawEvent::call(0, 0xA000).with_stack_pointer(0xFFF0),
            RawEvent::call(2, 0xB000).with_stack_pointer(0xFFE0),
            RawEvent::call(4, 0xC000).with_stack_pointer(0xFFD0),
            // C longjmps back into A, abandoning B
            RawEvent::ret(6).with_stack_pointer(0xFFE8),
            RawEvent::ret(9).with_stack_pointer(0xFFFC),
        ];
        let result =
            reconstruct(events.iter().copied().map(Ok), &IntervalRuleTable::default(), &symbols, options)
                .unwrap();
        let spans: Vec<_> = result.intervals.iter().map(span).collect();
        assert_eq!(spans, vec![(4, 6), (2, 6), (0, 9)]);
        assert_eq!(result.diagnostics.frames_unwound, 1);
        assert!(matches!(
            &result.diagnostics.anomalies()[0],
            Anomaly::FrameUnwound { index: 3, label, .. } if &**label == "sub_00C000"
        ));
    }

    #[test]
    fn test_stack_pointer_on_top_frame_is_plain_return() {
        let symbols = SymbolTable::default();
        let options = ReconstructionOptions { unwind_by_stack_pointer: true, ..Default::default() };
        let events = [
            RawEvent::call(0, 0xA000).with_stack_pointer(0xFFF0),
            RawEvent::call(2, 0xB000).with_stack_pointer(0xFFE0),
            RawEvent::ret(5).with_stack_pointer(0xFFDC),
            RawEvent::ret(9).with_stack_pointer(0xFFEC),
        ];
        let result =
            reconstruct(events.iter().copied().map(Ok), &IntervalRuleTable::default(), &symbols, options)
                .unwrap();
        let spans: Vec<_> = result.intervals.iter().map(span).collect();
        assert_eq!(spans, vec![(2, 5), (0, 9)]);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_return_never_closes_interrupt_frame() {
        let result = run(
            &[
                RawEvent::call(0, 0xA000),
                RawEvent::interrupt_enter(10, 0x0200),
                RawEvent::ret(12),
                RawEvent::call(14, 0x0300),
                RawEvent::interrupt_exit(20),
                RawEvent::ret(25),
                RawEvent::ret(30),
            ],
            &IntervalRuleTable::default(),
        );

        let interrupts: Vec<_> =
            result.intervals_on(TrackId::INTERRUPTS).map(|i| (&*i.label, span(i))).collect();
        assert_eq!(interrupts, vec![("sub_000300", (14, 20)), ("VBlank", (10, 20))]);
        let main: Vec<_> = result.intervals_on(TrackId::MAIN_THREAD).map(span).collect();
        assert_eq!(main, vec![(0, 25)]);

        assert_eq!(
            result.diagnostics.anomalies()[0],
            Anomaly::UnmatchedReturn { index: 2, timestamp: Cycle(12), track: TrackId::INTERRUPTS }
        );
        assert_eq!(result.diagnostics.unmatched_returns, 2);
        assert_eq!(result.diagnostics.unmatched_interrupt_exits, 0);
        assert_eq!(result.diagnostics.frames_unwound, 1);
    }

    #[test]
    fn test_stack_pointers_ignored_by_default() {
        let result = run(
            &[
                RawEvent::call(0, 0xA000).with_stack_pointer(0xFFF0),
                RawEvent::call(2, 0xB000).with_stack_pointer(0xFFE0),
                RawEvent::ret(6).with_stack_pointer(0xFFFC),
            ],
            &IntervalRuleTable::default(),
        );
        assert_eq!(result.diagnostics.frames_unwound, 0);
        assert_eq!(result.truncated().count(), 1);
    }

    #[test]
    fn test_markers() {
        let result = run(
            &[
                RawEvent::new(3, EventKind::VerticalInterrupt),
                RawEvent::new(4, EventKind::HorizontalInterrupt),
            ],
            &IntervalRuleTable::default(),
        );
        assert_eq!(
            result.markers,
            vec![Marker { kind: MarkerKind::VInt, track: TrackId::INTERRUPTS, timestamp: Cycle(3) }]
        );
    }

    #[test]
    fn test_out_of_order_events_are_fatal() {
        let err = reconstruct(
            [RawEvent::call(10, 0xA000), RawEvent::ret(5)].into_iter().map(Ok),
            &IntervalRuleTable::default(),
            &SymbolTable::default(),
            ReconstructionOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, DecodeError::OutOfOrder { previous: 10, current: 5, index: 1 }));
    }

    #[test]
    fn test_empty_stream() {
        let result = run(&[], &toggle_rules());
        assert!(result.intervals.is_empty());
        assert_eq!(result.last_timestamp, None);
    }
}
