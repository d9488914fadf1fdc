//! Breakpoint-address file for the emulator
//!
//! The emulator loads this file before recording and emits a breakpoint
//! packet whenever execution reaches one of the listed addresses. Entries
//! are little-endian u32, sorted, without duplicates.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use super::IntervalRuleTable;

/// Write every watched address of `table`; returns the number written
///
/// # Errors
/// Returns an error if writing fails
pub fn write_breakpoints<W: Write>(table: &IntervalRuleTable, mut writer: W) -> io::Result<usize> {
    let addresses = table.addresses();
    for address in &addresses {
        writer.write_all(&address.0.to_le_bytes())?;
    }
    writer.flush()?;
    Ok(addresses.len())
}

/// # Errors
/// Returns an error if the file cannot be created or written
pub fn write_breakpoints_file<P: AsRef<Path>>(
    table: &IntervalRuleTable,
    path: P,
) -> io::Result<usize> {
    let file = File::create(path.as_ref())?;
    write_breakpoints(table, BufWriter::new(file))
}
