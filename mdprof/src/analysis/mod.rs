//! Analysis logic for reconstructed traces
//!
//! This module contains pure aggregation over the engine's output, separated
//! from the export and presentation layers.

pub mod hotspot_analyzer;

pub use hotspot_analyzer::{analyze_hotspots, display_hotspots, HotspotStats, LabelHotspot};
