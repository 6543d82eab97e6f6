//! Building a wire-correct frame buffer from a field descriptor.
//!
//! [`FrameDesc`] is the encode-path counterpart to adopting raw bytes: every
//! field is optional and defaults to 0 or absent, and [`FrameDesc::encode`]
//! validates each supplied field before a single byte is assembled. This is
//! the only path that produces a frame from scratch; raw-buffer construction
//! bypasses it entirely.

use bytes::{BufMut, Bytes, BytesMut};

use crate::{consts, layout, mask, validate, Result};

/// Descriptor for a frame under construction.
///
/// The bit flags and the opcode are raw field values (`0` or `1` for flags,
/// `0..=15` for the opcode), matching the wire representation rather than a
/// decoded enum, since a frame may legitimately carry reserved values.
///
/// ```rust
/// use wsframe::FrameDesc;
///
/// let bytes = FrameDesc::new()
///     .fin(1)
///     .opcode(1)
///     .payload("abc")
///     .encode()
///     .unwrap();
/// assert_eq!(&bytes[..], &[0x81, 0x03, b'a', b'b', b'c']);
/// ```
#[derive(Debug, Default, Clone)]
pub struct FrameDesc {
    fin: u8,
    rsv1: u8,
    rsv2: u8,
    rsv3: u8,
    opcode: u8,
    masking_key: Option<Bytes>,
    payload: Option<Bytes>,
}

impl FrameDesc {
    /// Creates an empty descriptor: all flags 0, opcode 0, no key, no
    /// payload. Encoding it yields the minimal two-byte frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the FIN flag (0 or 1, validated at encode time).
    pub fn fin(mut self, value: u8) -> Self {
        self.fin = value;
        self
    }

    /// Sets the RSV1 flag (0 or 1, validated at encode time).
    pub fn rsv1(mut self, value: u8) -> Self {
        self.rsv1 = value;
        self
    }

    /// Sets the RSV2 flag (0 or 1, validated at encode time).
    pub fn rsv2(mut self, value: u8) -> Self {
        self.rsv2 = value;
        self
    }

    /// Sets the RSV3 flag (0 or 1, validated at encode time).
    pub fn rsv3(mut self, value: u8) -> Self {
        self.rsv3 = value;
        self
    }

    /// Sets the opcode (0..=15, validated at encode time).
    pub fn opcode(mut self, value: u8) -> Self {
        self.opcode = value;
        self
    }

    /// Sets the masking key. Must be exactly 4 bytes; the length is
    /// validated at encode time so the builder chain stays infallible.
    pub fn masking_key(mut self, key: impl Into<Bytes>) -> Self {
        self.masking_key = Some(key.into());
        self
    }

    /// Sets a randomly generated 4-byte masking key, as a client would
    /// before sending the frame.
    pub fn random_masking_key(self) -> Self {
        self.masking_key(rand::random::<[u8; 4]>().to_vec())
    }

    /// Sets the payload. Strings and byte vectors both convert.
    pub fn payload(mut self, payload: impl Into<Bytes>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Validates every supplied field and assembles the wire buffer:
    /// `[byte0][byte1 + extended length][key?][payload, masked when keyed]`.
    ///
    /// # Errors
    /// [`FrameError::InvalidBitFlag`](crate::FrameError::InvalidBitFlag),
    /// [`FrameError::InvalidOpCode`](crate::FrameError::InvalidOpCode) or
    /// [`FrameError::InvalidMaskingKeyLength`](crate::FrameError::InvalidMaskingKeyLength),
    /// all raised before any assembly happens.
    pub fn encode(&self) -> Result<BytesMut> {
        validate::check_bit_flag("fin", self.fin)?;
        validate::check_bit_flag("rsv1", self.rsv1)?;
        validate::check_bit_flag("rsv2", self.rsv2)?;
        validate::check_bit_flag("rsv3", self.rsv3)?;
        validate::check_opcode(self.opcode)?;

        let key = match &self.masking_key {
            Some(key) => Some(validate::check_masking_key(key)?),
            None => None,
        };

        let payload_len = self.payload.as_ref().map_or(0, Bytes::len);
        let mut buf = BytesMut::with_capacity(
            consts::LEN_OFFSET + 8 + consts::MASKING_KEY_LEN + payload_len,
        );

        buf.put_u8(
            self.fin << 7
                | self.rsv1 << 6
                | self.rsv2 << 5
                | self.rsv3 << 4
                | self.opcode,
        );

        let mask_bit = if key.is_some() { consts::MASK } else { 0 };
        layout::put_len(&mut buf, mask_bit, payload_len as u64);

        if let Some(key) = key {
            buf.put_slice(&key);
        }

        if let Some(payload) = &self.payload {
            let start = buf.len();
            buf.put_slice(payload);
            if let Some(key) = key {
                mask::apply_mask(&mut buf[start..], key);
            }
        }

        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FrameError;

    #[test]
    fn test_empty_descriptor_encodes_minimal_frame() {
        let buf = FrameDesc::new().encode().unwrap();
        assert_eq!(&buf[..], &[0x00, 0x00]);
    }

    #[test]
    fn test_text_frame() {
        let buf = FrameDesc::new()
            .fin(1)
            .opcode(1)
            .payload("abc")
            .encode()
            .unwrap();
        assert_eq!(&buf[..], &[0x81, 0x03, b'a', b'b', b'c']);
    }

    #[test]
    fn test_all_header_bits() {
        let buf = FrameDesc::new()
            .fin(1)
            .rsv1(1)
            .rsv2(1)
            .rsv3(1)
            .opcode(0x0F)
            .encode()
            .unwrap();
        assert_eq!(&buf[..], &[0xFF, 0x00]);
    }

    #[test]
    fn test_extended_length_16() {
        let payload = vec![0x42u8; 300];
        let buf = FrameDesc::new()
            .fin(1)
            .opcode(2)
            .payload(payload.clone())
            .encode()
            .unwrap();

        assert_eq!(buf[1], 126);
        assert_eq!(&buf[2..4], &300u16.to_be_bytes());
        assert_eq!(&buf[4..], &payload[..]);
    }

    #[test]
    fn test_extended_length_64() {
        let buf = FrameDesc::new()
            .fin(1)
            .opcode(2)
            .payload(vec![0u8; 70_000])
            .encode()
            .unwrap();

        assert_eq!(buf[1], 127);
        assert_eq!(&buf[2..10], &70_000u64.to_be_bytes());
        assert_eq!(buf.len(), 10 + 70_000);
    }

    #[test]
    fn test_masked_payload_is_wire_masked() {
        let key = [0x11u8, 0x22, 0x33, 0x44];
        let buf = FrameDesc::new()
            .fin(1)
            .opcode(2)
            .masking_key(key.to_vec())
            .payload(vec![0xA0, 0xA1, 0xA2, 0xA3, 0xA4])
            .encode()
            .unwrap();

        assert_eq!(buf[1], 0x80 | 5);
        assert_eq!(&buf[2..6], &key);
        let expected: Vec<u8> = [0xA0u8, 0xA1, 0xA2, 0xA3, 0xA4]
            .iter()
            .enumerate()
            .map(|(i, b)| b ^ key[i % 4])
            .collect();
        assert_eq!(&buf[6..], &expected[..]);
    }

    #[test]
    fn test_key_without_payload_sets_mask_bit() {
        let buf = FrameDesc::new()
            .masking_key(vec![1, 2, 3, 4])
            .encode()
            .unwrap();
        assert_eq!(&buf[..], &[0x00, 0x80, 1, 2, 3, 4]);
    }

    #[test]
    fn test_random_masking_key_is_well_formed() {
        let buf = FrameDesc::new()
            .random_masking_key()
            .payload("abcd")
            .encode()
            .unwrap();
        assert_eq!(buf[1] & 0x80, 0x80);
        assert_eq!(buf.len(), 2 + 4 + 4);
    }

    #[test]
    fn test_rejects_out_of_range_flags() {
        let err = FrameDesc::new().fin(2).encode().unwrap_err();
        assert_eq!(
            err,
            FrameError::InvalidBitFlag {
                field: "fin",
                value: 2
            }
        );

        let err = FrameDesc::new().rsv3(7).encode().unwrap_err();
        assert_eq!(
            err,
            FrameError::InvalidBitFlag {
                field: "rsv3",
                value: 7
            }
        );
    }

    #[test]
    fn test_rejects_out_of_range_opcode() {
        let err = FrameDesc::new().opcode(16).encode().unwrap_err();
        assert_eq!(err, FrameError::InvalidOpCode(16));
    }

    #[test]
    fn test_rejects_short_masking_key() {
        let err = FrameDesc::new()
            .masking_key(vec![1, 2, 3])
            .encode()
            .unwrap_err();
        assert_eq!(err, FrameError::InvalidMaskingKeyLength(3));
    }
}
