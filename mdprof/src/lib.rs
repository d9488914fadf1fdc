//! # mdprof - Mega Drive profiling recordings to Chrome traces
//!
//! mdprof converts the `.mdp` recordings written by a Mega Drive / Genesis
//! emulator's 68000 profiler into Chrome Trace Event Format JSON, viewable in
//! Perfetto or `chrome://tracing`.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────┐  ┌──────────────┐  ┌──────────────┐
//! │  recording   │  │ symbolization│  │  intervals   │
//! │  (.mdp file) │  │ (sym / lst / │  │ (rule file)  │
//! │              │  │   nm text)   │  │              │
//! └──────┬───────┘  └──────┬───────┘  └──────┬───────┘
//!        │ RawEvent        │ labels          │ IntervalRuleTable
//!        ▼                 ▼                 ▼
//! ┌─────────────────────────────────────────────────────┐
//! │                  reconstruction                     │
//! │  per-category call stacks, interrupt nesting,       │
//! │  manual interval toggling, end-of-stream closure    │
//! └──────────────────────────┬──────────────────────────┘
//!                            │ Reconstruction
//!              ┌─────────────┴─────────────┐
//!              ▼                           ▼
//!      ┌──────────────┐            ┌──────────────┐
//!      │    export    │            │   analysis   │
//!      │ (trace.json) │            │  (hotspots)  │
//!      └──────────────┘            └──────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - [`recording`]: Decode the `.mdp` header and packet stream into [`recording::RawEvent`]s
//! - [`symbolization`]: Load asm68k, AS listing and nm symbol files; synthesize labels
//! - [`intervals`]: Parse manual interval rules and write emulator breakpoint files
//! - [`reconstruction`]: Turn the flat event stream into nested, closed intervals
//! - [`export`]: Write Chrome Trace Event Format JSON
//! - [`analysis`]: Aggregate intervals into a hotspot summary
//! - [`cli`]: Command-line argument parsing
//! - [`preflight`]: Input file checks before parsing
//! - [`domain`]: Core domain types (Address, Cycle, TrackId) and error types
//!
//! ## Typical Usage
//!
//! ```bash
//! # Convert a recording, naming subroutines from an asm68k symbol file
//! mdprof capture.mdp -s game.sym
//!
//! # Add manual intervals, then tell the emulator where to break
//! mdprof -s game.sym -i frames.txt --breakpoints game.bpt
//! mdprof capture.mdp -s game.sym -i frames.txt --top 20
//! ```
//!
//! ## Key Concepts
//!
//! - **Track**: One timeline in the trace. "Main thread" and "Interrupts" are
//!   built in; each manual interval category adds another
//! - **Manual interval**: Bounded by breakpoint hits at entry and exit
//!   addresses rather than by calls and returns
//! - **Cycle**: Master clock tick; converted to microseconds with the header's clock

// Expose modules for testing
pub mod analysis;
pub mod cli;
pub mod domain;
pub mod export;
pub mod intervals;
pub mod preflight;
pub mod reconstruction;
pub mod recording;
pub mod symbolization;
