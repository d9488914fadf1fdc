//! # Shared Recording Format (Emulator ↔ Converter)
//!
//! Constants describing the `.mdp` profiling recording written by the
//! companion emulator and read by `mdprof`. Both sides must agree on every
//! value in this file; bump [`MDP_VERSION`] whenever the layout changes.
//!
//! ## File Layout
//!
//! ```text
//! ┌──────────────────────────── header (256 bytes) ────────────────────────────┐
//! │ [0..3] reserved │ [3] version │ [4..8] mclk Hz │ [8..12] 68k divider │ ... │
//! └────────────────────────────────────────────────────────────────────────────┘
//! ┌──────── packet ────────┐┌──────── packet ────────┐
//! │ tag │ cycle │ sp │ arg? ││ tag │ cycle │ sp │ arg? │ ...
//! └────────────────────────┘└────────────────────────┘
//! ```
//!
//! All multi-byte fields are little-endian.

#![no_std]

// ============================================================================
// Header
// ============================================================================

/// Recording format version understood by this build
pub const MDP_VERSION: u8 = 1;

/// Size of the fixed header preceding the first packet
pub const HEADER_SIZE: usize = 256;

/// Offset of the version byte
pub const HEADER_VERSION_OFFSET: usize = 3;

/// Offset of the master clock frequency (u32, Hz)
pub const HEADER_MCLK_OFFSET: usize = 4;

/// Offset of the 68000 clock divider (u32)
pub const HEADER_M68K_DIVIDER_OFFSET: usize = 8;

// ============================================================================
// Packet Tags
// ============================================================================

/// **Call**: `JSR`/`BSR` executed
///
/// Payload: call target address
pub const PACKET_SUBROUTINE_ENTER: u8 = 0;

/// **Return**: `RTS`/`RTR` about to execute
pub const PACKET_SUBROUTINE_EXIT: u8 = 1;

/// **Interrupt entry**: CPU jumped through an exception vector
///
/// Payload: handler address
pub const PACKET_INTERRUPT_ENTER: u8 = 2;

/// **Interrupt exit**: `RTE` about to execute
pub const PACKET_INTERRUPT_EXIT: u8 = 3;

/// **Marker**: VDP raised a horizontal interrupt
pub const PACKET_HINT: u8 = 4;

/// **Marker**: VDP raised a vertical interrupt
pub const PACKET_VINT: u8 = 5;

/// **Clock rebase**: the emulator's 32-bit cycle counter was reset
///
/// The packet's cycle field is added to a running offset applied to every
/// later packet. Produces no event.
pub const PACKET_ADJUST_CYCLES: u8 = 6;

/// **Breakpoint**: execution reached a watched address
///
/// Payload: program counter
pub const PACKET_MANUAL_BREAKPOINT: u8 = 7;

// ============================================================================
// Packet Sizes
// ============================================================================

/// Bytes common to every packet: tag (1) + cycle (4) + stack pointer (4)
pub const PACKET_PREFIX_SIZE: usize = 9;

/// Bytes of the optional u32 payload
pub const PACKET_PAYLOAD_SIZE: usize = 4;

/// Returns `true` if packets with this tag carry a u32 payload
#[must_use]
pub const fn packet_has_payload(tag: u8) -> bool {
    matches!(tag, PACKET_SUBROUTINE_ENTER | PACKET_INTERRUPT_ENTER | PACKET_MANUAL_BREAKPOINT)
}

/// Total encoded size of a packet with this tag, `None` for unknown tags
#[must_use]
pub const fn packet_size(tag: u8) -> Option<usize> {
    match tag {
        PACKET_SUBROUTINE_ENTER..=PACKET_MANUAL_BREAKPOINT => {
            if packet_has_payload(tag) {
                Some(PACKET_PREFIX_SIZE + PACKET_PAYLOAD_SIZE)
            } else {
                Some(PACKET_PREFIX_SIZE)
            }
        }
        _ => None,
    }
}

/// Size of one entry in the breakpoint-address file consumed by the emulator
pub const BREAKPOINT_ENTRY_SIZE: usize = 4;
