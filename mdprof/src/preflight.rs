//! Pre-flight checks for mdprof
//!
//! Validates input files before anything is parsed, so a typo in a path
//! produces a clear message instead of a decode error.

use anyhow::{bail, Context, Result};
use std::path::Path;

/// Check that a required input file exists, is a regular file and is non-empty.
pub fn check_input_file(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        bail!(
            "{what} not found: {}\n\n\
             Make sure the path is correct and the file exists.",
            path.display()
        );
    }
    if !path.is_file() {
        bail!("Not a file: {}\n\n{what} must be a regular file, not a directory.", path.display());
    }

    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Failed to read metadata for {}", path.display()))?;
    if metadata.len() == 0 {
        bail!("{what} is empty: {}", path.display());
    }

    Ok(())
}

/// Run the file checks for every input that was given on the command line.
pub fn run_preflight_checks(
    input: Option<&Path>,
    symbols: Option<&Path>,
    intervals: Option<&Path>,
) -> Result<()> {
    if let Some(path) = input {
        check_input_file(path, "Recording")?;
    }
    if let Some(path) = symbols {
        check_input_file(path, "Symbol file")?;
    }
    if let Some(path) = intervals {
        check_input_file(path, "Interval file")?;
    }
    Ok(())
}
