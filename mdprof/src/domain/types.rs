//! Domain types providing compile-time safety and self-documentation
//!
//! These newtype wrappers keep 68000 addresses, emulator cycle counts and
//! output track ids from being mixed up in function signatures.

use std::fmt;

/// Display name of the built-in call-stack category
pub const MAIN_THREAD: &str = "Main thread";

/// Display name of the built-in interrupt category
pub const INTERRUPTS: &str = "Interrupts";

/// 68000 address (24 significant bits, stored as recorded)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub u32);

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:06x}", self.0)
    }
}

impl From<u32> for Address {
    fn from(address: u32) -> Self {
        Address(address)
    }
}

/// Emulator master clock cycle count
///
/// Monotonic across a recording once cycle-counter rebases are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Cycle(pub u64);

impl Cycle {
    /// Cycles elapsed since `earlier` (zero if `earlier` is later)
    #[must_use]
    pub fn since(self, earlier: Cycle) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// Convert to microseconds for a clock running at `clock_hz`
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn as_micros(self, clock_hz: f64) -> f64 {
        self.0 as f64 * 1_000_000.0 / clock_hz
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}cy", self.0)
    }
}

/// Output track ("thread") identifier
///
/// Track 0 is always [`MAIN_THREAD`], track 1 always [`INTERRUPTS`]; user
/// categories are numbered from 2 in order of first appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(pub u32);

impl TrackId {
    pub const MAIN_THREAD: TrackId = TrackId(0);
    pub const INTERRUPTS: TrackId = TrackId(1);
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TID:{}", self.0)
    }
}

/// Registry of category names, indexed by [`TrackId`]
///
/// Built once while interval rules are compiled and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Categories {
    names: Vec<String>,
}

impl Default for Categories {
    fn default() -> Self {
        Self::new()
    }
}

impl Categories {
    /// Registry holding only the two built-in categories
    #[must_use]
    pub fn new() -> Self {
        Self { names: vec![MAIN_THREAD.to_string(), INTERRUPTS.to_string()] }
    }

    /// Track id for `name`, registering it if unseen
    ///
    /// An empty name maps to the main thread.
    pub fn intern(&mut self, name: &str) -> TrackId {
        let name = name.trim();
        if name.is_empty() {
            return TrackId::MAIN_THREAD;
        }
        if let Some(track) = self.get(name) {
            return track;
        }
        self.names.push(name.to_string());
        TrackId(u32::try_from(self.names.len() - 1).unwrap_or(u32::MAX))
    }

    /// Track id of an already registered category
    #[must_use]
    pub fn get(&self, name: &str) -> Option<TrackId> {
        self.names
            .iter()
            .position(|n| n == name)
            .and_then(|i| u32::try_from(i).ok())
            .map(TrackId)
    }

    /// Display name of a track; unknown ids fall back to the main thread name
    #[must_use]
    pub fn name(&self, track: TrackId) -> &str {
        self.names.get(track.0 as usize).map_or(MAIN_THREAD, String::as_str)
    }

    /// All categories in track order, built-ins first
    pub fn iter(&self) -> impl Iterator<Item = (TrackId, &str)> {
        self.names.iter().enumerate().map(|(i, n)| (TrackId(i as u32), n.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
