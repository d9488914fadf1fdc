//! Trace export functionality
//!
//! This module provides functionality for exporting reconstructed intervals.
//! Currently supports Chrome Trace Event Format for visualization in Perfetto
//! or chrome://tracing.

pub mod chrome_trace;

pub use chrome_trace::{ChromeTraceExporter, PROCESS_NAME};
