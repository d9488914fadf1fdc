use log::{debug, warn};
use mdprof_common::{
    packet_has_payload, packet_size, HEADER_M68K_DIVIDER_OFFSET, HEADER_MCLK_OFFSET, HEADER_SIZE,
    HEADER_VERSION_OFFSET, MDP_VERSION, PACKET_ADJUST_CYCLES, PACKET_HINT,
    PACKET_INTERRUPT_ENTER, PACKET_INTERRUPT_EXIT, PACKET_MANUAL_BREAKPOINT,
    PACKET_PREFIX_SIZE, PACKET_SUBROUTINE_ENTER, PACKET_SUBROUTINE_EXIT, PACKET_VINT,
};

use super::{EventKind, RawEvent};
use crate::domain::{Address, Cycle, DecodeError};

/// NTSC Mega Drive master clock, used when a header records a zero clock
pub const NTSC_MCLK_HZ: u32 = 53_693_175;

/// Fixed-size header at the start of every recording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordingHeader {
    pub version: u8,
    /// Master clock frequency in Hz
    pub mclk: u32,
    /// Master clock cycles per 68000 cycle
    pub m68k_divider: u32,
}

impl RecordingHeader {
    /// Decode the header from the start of a recording
    ///
    /// # Errors
    /// Returns [`DecodeError::TruncatedHeader`] if `bytes` is shorter than the header
    pub fn parse(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() < HEADER_SIZE {
            return Err(DecodeError::TruncatedHeader { len: bytes.len() });
        }

        let version = bytes[HEADER_VERSION_OFFSET];
        if version != MDP_VERSION {
            warn!(
                "Recording uses mdp format version {version} but this build understands \
                 version {MDP_VERSION}"
            );
        }

        let mut mclk = read_u32(bytes, HEADER_MCLK_OFFSET).unwrap_or(0);
        if mclk == 0 {
            warn!("Recording header has no master clock, assuming NTSC ({NTSC_MCLK_HZ} Hz)");
            mclk = NTSC_MCLK_HZ;
        }
        let m68k_divider = read_u32(bytes, HEADER_M68K_DIVIDER_OFFSET).unwrap_or(0);

        Ok(Self { version, mclk, m68k_divider })
    }

    /// Master clock as a float, for cycle to time conversion
    #[must_use]
    pub fn clock_hz(&self) -> f64 {
        f64::from(self.mclk)
    }
}

/// A recording held in memory, header already validated
#[derive(Debug, Clone, Copy)]
pub struct Recording<'a> {
    pub header: RecordingHeader,
    packets: &'a [u8],
}

impl<'a> Recording<'a> {
    /// # Errors
    /// Returns an error if the header is truncated
    pub fn parse(bytes: &'a [u8]) -> Result<Self, DecodeError> {
        let header = RecordingHeader::parse(bytes)?;
        debug!(
            "Recording v{} mclk={} Hz divider={} ({} packet bytes)",
            header.version,
            header.mclk,
            header.m68k_divider,
            bytes.len() - HEADER_SIZE
        );
        Ok(Self { header, packets: &bytes[HEADER_SIZE..] })
    }

    /// Lazy single-pass decoder over the packets
    #[must_use]
    pub fn events(&self) -> EventReader<'a> {
        EventReader::new(self.packets)
    }
}

/// Iterator decoding packets into [`RawEvent`]s
///
/// Yields `Err` at most once; the iterator is fused afterwards.
pub struct EventReader<'a> {
    bytes: &'a [u8],
    /// Position inside `bytes`
    pos: usize,
    /// Packets consumed so far, including cycle rebases
    index: usize,
    cycle_offset: u64,
    last_timestamp: Option<u64>,
    failed: bool,
}

impl<'a> EventReader<'a> {
    /// Decoder over packet bytes (header already stripped)
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0, index: 0, cycle_offset: 0, last_timestamp: None, failed: false }
    }

    fn decode_next(&mut self) -> Option<Result<RawEvent, DecodeError>> {
        loop {
            if self.pos >= self.bytes.len() {
                return None;
            }

            // Offsets in errors are relative to the whole file
            let offset = HEADER_SIZE + self.pos;
            let index = self.index;
            let tag = self.bytes[self.pos];

            let Some(size) = packet_size(tag) else {
                return Some(Err(DecodeError::UnknownTag { tag, offset, index }));
            };
            let available = self.bytes.len() - self.pos;
            if available < size {
                return Some(Err(DecodeError::Truncated {
                    offset,
                    index,
                    needed: size,
                    available,
                }));
            }

            let packet = &self.bytes[self.pos..self.pos + size];
            self.pos += size;
            self.index += 1;

            let cycle32 = u64::from(read_u32(packet, 1).unwrap_or(0));
            let stack_pointer = read_u32(packet, 5).unwrap_or(0);
            let payload = if packet_has_payload(tag) {
                read_u32(packet, PACKET_PREFIX_SIZE).unwrap_or(0)
            } else {
                0
            };

            let kind = match tag {
                PACKET_SUBROUTINE_ENTER => EventKind::Call { target: Address(payload) },
                PACKET_SUBROUTINE_EXIT => EventKind::Return,
                PACKET_INTERRUPT_ENTER => EventKind::InterruptEnter { vector: Address(payload) },
                PACKET_INTERRUPT_EXIT => EventKind::InterruptExit,
                PACKET_HINT => EventKind::HorizontalInterrupt,
                PACKET_VINT => EventKind::VerticalInterrupt,
                PACKET_MANUAL_BREAKPOINT => EventKind::BreakpointHit { address: Address(payload) },
                PACKET_ADJUST_CYCLES => {
                    self.cycle_offset += cycle32;
                    debug!("Cycle counter rebased by {cycle32} at packet #{index}");
                    continue;
                }
                _ => return Some(Err(DecodeError::UnknownTag { tag, offset, index })),
            };

            let timestamp = self.cycle_offset + cycle32;
            if let Some(previous) = self.last_timestamp {
                if timestamp < previous {
                    return Some(Err(DecodeError::TimestampRegression {
                        previous,
                        current: timestamp,
                        offset,
                        index,
                    }));
                }
            }
            self.last_timestamp = Some(timestamp);

            return Some(Ok(RawEvent {
                timestamp: Cycle(timestamp),
                kind,
                stack_pointer: Some(stack_pointer),
            }));
        }
    }
}

impl Iterator for EventReader<'_> {
    type Item = Result<RawEvent, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let item = self.decode_next();
        if matches!(item, Some(Err(_))) {
            self.failed = true;
        }
        item
    }
}

impl std::iter::FusedIterator for EventReader<'_> {}

fn read_u32(bytes: &[u8], at: usize) -> Option<u32> {
    let field = bytes.get(at..at + 4)?;
    Some(u32::from_le_bytes(field.try_into().ok()?))
}
