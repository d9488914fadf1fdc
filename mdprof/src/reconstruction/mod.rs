//! # Trace Reconstruction
//!
//! Turns the flat event stream into properly nested, time-stamped intervals
//! per category.
//!
//! ```text
//! RawEvent ──▶ StackEngine ──┬──▶ CategoryStack "Main thread"  ─┐
//!                 ▲          ├──▶ CategoryStack "Interrupts"   ─┼──▶ Reconstruction
//!                 │          └──▶ per-rule open slots          ─┘    (intervals,
//!        IntervalRuleTable                                            markers,
//!        SymbolResolver                                               diagnostics)
//! ```
//!
//! Interrupts never close or shorten main-thread frames: they live on their
//! own stack and the preempted frame simply keeps running across them.

pub mod category;
pub mod diagnostics;
pub mod engine;
pub mod interval;

pub use category::CategoryStack;
pub use diagnostics::{display_diagnostics, Anomaly, Diagnostics};
pub use engine::{reconstruct, Reconstruction, ReconstructionOptions, StackEngine};
pub use interval::{Interval, IntervalSource, Marker, MarkerKind};
