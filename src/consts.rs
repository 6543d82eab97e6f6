//! Binary layout constants for the WebSocket frame header
//! ([RFC 6455 Section 5.2](https://datatracker.ietf.org/doc/html/rfc6455#section-5.2)).
//!
//! Byte 0 carries the FIN/RSV flags and the opcode; byte 1 carries the mask
//! bit and the 7-bit payload length. Everything after byte 1 is positioned
//! relative to `LEN_OFFSET`.

/// FIN flag, byte 0 bit 7.
pub(crate) const FIN: u8 = 0x80;
/// RSV1 flag, byte 0 bit 6.
pub(crate) const RSV1: u8 = 0x40;
/// RSV2 flag, byte 0 bit 5.
pub(crate) const RSV2: u8 = 0x20;
/// RSV3 flag, byte 0 bit 4.
pub(crate) const RSV3: u8 = 0x10;
/// Opcode, low nibble of byte 0.
pub(crate) const OPCODE: u8 = 0x0F;
/// Mask flag, byte 1 bit 7.
pub(crate) const MASK: u8 = 0x80;
/// 7-bit payload length, byte 1 bits 6..0.
pub(crate) const LEN: u8 = 0x7F;

/// Largest payload length the 7-bit field can hold literally.
pub(crate) const MAX_LITERAL_LEN: u64 = 125;
/// Largest payload length the 2-byte extended field can hold.
pub(crate) const MAX_U16_LEN: u64 = 65535;

/// Every frame starts with these two fixed header bytes.
pub(crate) const MIN_FRAME_LEN: usize = 2;
/// Offset of the first byte after the fixed header, where the extended
/// length, masking key and payload regions begin.
pub(crate) const LEN_OFFSET: usize = 2;
/// Width of the masking key when the mask bit is set.
pub(crate) const MASKING_KEY_LEN: usize = 4;
