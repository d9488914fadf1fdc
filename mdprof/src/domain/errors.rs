//! Structured error types for mdprof
//!
//! Using thiserror for automatic Display implementation and error chaining.

use mdprof_common::HEADER_SIZE;
use thiserror::Error;

/// Fatal recording decode failure
///
/// Every packet-level variant carries the byte offset of the offending packet
/// and its index among decoded packets so the problem can be located.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Recording is {len} bytes, shorter than the {HEADER_SIZE}-byte header")]
    TruncatedHeader { len: usize },

    #[error("Unknown packet tag {tag} at byte offset {offset} (packet #{index})")]
    UnknownTag { tag: u8, offset: usize, index: usize },

    #[error(
        "Recording truncated in packet #{index} at byte offset {offset}: \
         needed {needed} bytes, {available} left"
    )]
    Truncated { offset: usize, index: usize, needed: usize, available: usize },

    #[error(
        "Timestamp regressed from {previous} to {current} cycles at byte offset {offset} \
         (packet #{index})"
    )]
    TimestampRegression { previous: u64, current: u64, offset: usize, index: usize },

    #[error("Event #{index} at {current} cycles precedes the previous event at {previous} cycles")]
    OutOfOrder { previous: u64, current: u64, index: usize },
}

#[derive(Error, Debug)]
pub enum SymbolError {
    #[error("Unknown label kind {kind} for {label} at byte offset {offset}")]
    UnknownLabelKind { kind: u8, label: String, offset: usize },

    #[error("Local label {label} at byte offset {offset} has no parent global label")]
    OrphanLocalLabel { label: String, offset: usize },

    #[error("Symbol file truncated at byte offset {offset}")]
    Truncated { offset: usize },

    #[error("No \"Symbols in Segment\" section found in AS listing")]
    MissingSymbolSection,

    #[error("Malformed symbol line {line}: {content}")]
    MalformedLine { line: usize, content: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Interval definition failure, always tied to a 1-based line number
#[derive(Error, Debug)]
pub enum RuleError {
    #[error("Line {line}: {element} not found in the symbol file")]
    Unresolved { line: usize, element: String },

    #[error("Line {line}: empty {field} address list")]
    EmptyAddressList { line: usize, field: &'static str },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
