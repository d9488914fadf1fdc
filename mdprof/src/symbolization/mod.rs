//! # Symbol Resolution
//!
//! Maps 68000 addresses to the labels an assembler or compiler emitted for
//! them, and labels back to addresses for interval definitions.
//!
//! ## Supported Symbol Files
//!
//! | Dialect  | Detection              | Produced by                    |
//! |----------|------------------------|--------------------------------|
//! | asm68k   | starts with `MND`      | `asm68k /p` binary symbol dump |
//! | AS       | starts with `Segment CODE` | Alfred Arnold's AS listing |
//! | nm       | anything else          | `m68k-elf-nm` on a C build     |
//!
//! The reconstruction engine only sees the [`SymbolResolver`] trait, so tests
//! and alternative front ends can supply any address→name mapping.

pub mod symbol_table;

pub use symbol_table::{SymbolDialect, SymbolTable};

/// Address ↔ label lookup used by the rest of the pipeline
pub trait SymbolResolver {
    /// Display label for an address, `None` when unresolved
    fn resolve(&self, address: u32) -> Option<&str>;

    /// Address of an exact label
    fn lookup(&self, label: &str) -> Option<u32>;

    /// Addresses of every label starting with `prefix`, in label order
    fn with_prefix(&self, prefix: &str) -> Vec<u32>;
}

/// Label used when an address has no symbol
#[must_use]
pub fn synthesize_label(address: u32) -> String {
    format!("sub_{address:06X}")
}

/// Resolve an address, falling back to a synthesized `sub_XXXXXX` label
pub fn label_for<R: SymbolResolver + ?Sized>(resolver: &R, address: u32) -> String {
    resolver.resolve(address).map_or_else(|| synthesize_label(address), str::to_string)
}
