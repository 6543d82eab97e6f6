//! Offset arithmetic over a frame's header bytes.
//!
//! Every function here is a pure function of the buffer's current contents:
//! nothing is cached, so the answers stay correct across in-place edits and
//! while a frame is still streaming in. Buffers shorter than the region a
//! function describes are handled by returning `None` (for the declared
//! length) or by saturating (for the resident byte count); callers never
//! need to pre-check raggedness.

use bytes::{BufMut, BytesMut};

use crate::consts;

/// The raw 7-bit length value from byte 1.
pub(crate) fn initial_len(buf: &[u8]) -> u8 {
    buf[1] & consts::LEN
}

/// Width of the extended length field: 0, 2 or 8 bytes, fully determined
/// by the 7-bit value (126 and 127 are escape codes, not lengths).
pub(crate) fn ext_len_width(buf: &[u8]) -> usize {
    match initial_len(buf) {
        127 => 8,
        126 => 2,
        _ => 0,
    }
}

/// Whether byte 1 has the mask bit set.
pub(crate) fn is_masked(buf: &[u8]) -> bool {
    buf[1] & consts::MASK != 0
}

/// Offset where the masking key would sit, whether or not one is present.
pub(crate) fn masking_key_offset(buf: &[u8]) -> usize {
    consts::LEN_OFFSET + ext_len_width(buf)
}

/// Offset of the first payload byte.
pub(crate) fn payload_offset(buf: &[u8]) -> usize {
    let offset = masking_key_offset(buf);
    if is_masked(buf) {
        offset + consts::MASKING_KEY_LEN
    } else {
        offset
    }
}

/// Number of payload bytes actually resident in the buffer. Zero while the
/// header itself is still arriving.
pub(crate) fn resident_len(buf: &[u8]) -> usize {
    buf.len().saturating_sub(payload_offset(buf))
}

/// The payload length the header declares, or `None` while the extended
/// length bytes have not all arrived.
pub(crate) fn declared_len(buf: &[u8]) -> Option<u64> {
    let start = consts::LEN_OFFSET;
    match initial_len(buf) {
        127 => {
            let bytes: [u8; 8] = buf.get(start..start + 8)?.try_into().ok()?;
            Some(u64::from_be_bytes(bytes))
        }
        126 => {
            let bytes: [u8; 2] = buf.get(start..start + 2)?.try_into().ok()?;
            Some(u64::from(u16::from_be_bytes(bytes)))
        }
        literal => Some(u64::from(literal)),
    }
}

/// The 4-byte masking key, present iff the mask bit is set and the key
/// region has fully arrived.
pub(crate) fn masking_key(buf: &[u8]) -> Option<[u8; 4]> {
    if !is_masked(buf) {
        return None;
    }
    let offset = masking_key_offset(buf);
    buf.get(offset..offset + consts::MASKING_KEY_LEN)?
        .try_into()
        .ok()
}

/// Appends byte 1 and the extended length bytes for `len` to `dst`,
/// choosing the literal, 16-bit or 64-bit representation by magnitude.
/// `mask_bit` is OR-ed into byte 1 (pass 0 or [`consts::MASK`]).
pub(crate) fn put_len(dst: &mut BytesMut, mask_bit: u8, len: u64) {
    if len > consts::MAX_U16_LEN {
        dst.put_u8(mask_bit | 127);
        dst.put_u64(len);
    } else if len > consts::MAX_LITERAL_LEN {
        dst.put_u8(mask_bit | 126);
        dst.put_u16(len as u16);
    } else {
        dst.put_u8(mask_bit | len as u8);
    }
}
