//! Helpers shared by the integration tests

#![allow(dead_code)]

use mdprof_common::{
    HEADER_M68K_DIVIDER_OFFSET, HEADER_MCLK_OFFSET, HEADER_SIZE, HEADER_VERSION_OFFSET,
    MDP_VERSION, PACKET_ADJUST_CYCLES, PACKET_HINT, PACKET_INTERRUPT_ENTER, PACKET_INTERRUPT_EXIT,
    PACKET_MANUAL_BREAKPOINT, PACKET_SUBROUTINE_ENTER, PACKET_SUBROUTINE_EXIT, PACKET_VINT,
};

/// Stack pointer written into packets that don't care about it
pub const DEFAULT_SP: u32 = 0x00FF_FE00;

/// Builds `.mdp` recordings in memory
pub struct RecordingBuilder {
    bytes: Vec<u8>,
}

impl RecordingBuilder {
    pub fn new(mclk: u32) -> Self {
        let mut bytes = vec![0u8; HEADER_SIZE];
        bytes[HEADER_VERSION_OFFSET] = MDP_VERSION;
        bytes[HEADER_MCLK_OFFSET..HEADER_MCLK_OFFSET + 4].copy_from_slice(&mclk.to_le_bytes());
        bytes[HEADER_M68K_DIVIDER_OFFSET..HEADER_M68K_DIVIDER_OFFSET + 4]
            .copy_from_slice(&7u32.to_le_bytes());
        Self { bytes }
    }

    fn packet(mut self, tag: u8, cycle: u32, payload: Option<u32>) -> Self {
        self.bytes.push(tag);
        self.bytes.extend_from_slice(&cycle.to_le_bytes());
        self.bytes.extend_from_slice(&DEFAULT_SP.to_le_bytes());
        if let Some(payload) = payload {
            self.bytes.extend_from_slice(&payload.to_le_bytes());
        }
        self
    }

    pub fn call(self, cycle: u32, target: u32) -> Self {
        self.packet(PACKET_SUBROUTINE_ENTER, cycle, Some(target))
    }

    pub fn ret(self, cycle: u32) -> Self {
        self.packet(PACKET_SUBROUTINE_EXIT, cycle, None)
    }

    pub fn interrupt_enter(self, cycle: u32, vector: u32) -> Self {
        self.packet(PACKET_INTERRUPT_ENTER, cycle, Some(vector))
    }

    pub fn interrupt_exit(self, cycle: u32) -> Self {
        self.packet(PACKET_INTERRUPT_EXIT, cycle, None)
    }

    pub fn hint(self, cycle: u32) -> Self {
        self.packet(PACKET_HINT, cycle, None)
    }

    pub fn vint(self, cycle: u32) -> Self {
        self.packet(PACKET_VINT, cycle, None)
    }

    pub fn adjust_cycles(self, delta: u32) -> Self {
        self.packet(PACKET_ADJUST_CYCLES, delta, None)
    }

    pub fn breakpoint(self, cycle: u32, address: u32) -> Self {
        self.packet(PACKET_MANUAL_BREAKPOINT, cycle, Some(address))
    }

    /// Append raw bytes, for corrupt-input tests
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}
