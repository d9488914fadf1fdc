//! # Event Stream Reader
//!
//! Decodes the `.mdp` recording written by the emulator into an ordered,
//! lazily produced sequence of [`RawEvent`]s.
//!
//! ```text
//! bytes ──▶ Recording::parse ──▶ RecordingHeader (clock, version)
//!                    │
//!                    └──▶ Recording::events() ──▶ Result<RawEvent, DecodeError> ...
//! ```
//!
//! Decoding is strict: an unknown tag, a packet cut short by end of file or a
//! timestamp lower than its predecessor ends the stream with a
//! [`DecodeError`](crate::domain::DecodeError). The reader never clamps.

pub mod reader;

pub use reader::{EventReader, Recording, RecordingHeader, NTSC_MCLK_HZ};

use crate::domain::{Address, Cycle};

/// One decoded entry of the recording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEvent {
    /// Master clock cycle, non-decreasing across the stream
    pub timestamp: Cycle,
    pub kind: EventKind,
    /// 68000 stack pointer when the packet was recorded
    ///
    /// `None` for events that did not come from a recording (hand-built feeds).
    pub stack_pointer: Option<u32>,
}

/// What happened at [`RawEvent::timestamp`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Call { target: Address },
    Return,
    InterruptEnter { vector: Address },
    InterruptExit,
    BreakpointHit { address: Address },
    HorizontalInterrupt,
    VerticalInterrupt,
}

impl RawEvent {
    #[must_use]
    pub fn new(timestamp: u64, kind: EventKind) -> Self {
        Self { timestamp: Cycle(timestamp), kind, stack_pointer: None }
    }

    #[must_use]
    pub fn with_stack_pointer(mut self, stack_pointer: u32) -> Self {
        self.stack_pointer = Some(stack_pointer);
        self
    }

    pub fn call(timestamp: u64, target: u32) -> Self {
        Self::new(timestamp, EventKind::Call { target: Address(target) })
    }

    pub fn ret(timestamp: u64) -> Self {
        Self::new(timestamp, EventKind::Return)
    }

    pub fn interrupt_enter(timestamp: u64, vector: u32) -> Self {
        Self::new(timestamp, EventKind::InterruptEnter { vector: Address(vector) })
    }

    pub fn interrupt_exit(timestamp: u64) -> Self {
        Self::new(timestamp, EventKind::InterruptExit)
    }

    pub fn breakpoint(timestamp: u64, address: u32) -> Self {
        Self::new(timestamp, EventKind::BreakpointHit { address: Address(address) })
    }
}
