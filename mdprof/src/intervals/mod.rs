//! # Manual Intervals
//!
//! User-declared spans bounded by breakpoint addresses rather than by
//! call/return pairs.
//!
//! ## Definition File
//!
//! One rule per line, `//` starts a comment line:
//!
//! ```text
//! // NAME alone: NAME_start opens, NAME_end closes
//! vblank_work
//! // ENTRIES,EXITS[,NAME[,CATEGORY]] with ';'-separated address lists
//! ReadJoypads,ReadJoypads@done,Input,Input
//! frame_top,frame_top,Frame
//! ```
//!
//! Each address element is an exact label, a hex literal, or the stem of a
//! family of `mdp_label_<stem>...` labels (all of which are used).
//!
//! ## Flow
//!
//! ```text
//! definition text ──▶ rules::parse_rules ──▶ Vec<IntervalRule> + Categories
//!                                                   │
//!                                 IntervalRuleTable::compile (address index)
//!                                    │                       │
//!                     reconstruction engine       breakpoints::write_breakpoints
//! ```

pub mod breakpoints;
pub mod rules;
pub mod table;

pub use breakpoints::{write_breakpoints, write_breakpoints_file};
pub use rules::{parse_rules, IntervalRule, RuleId};
pub use table::IntervalRuleTable;
