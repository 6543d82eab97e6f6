//! # Frame
//!
//! A single WebSocket frame as defined in
//! [RFC 6455 Section 5.2](https://datatracker.ietf.org/doc/html/rfc6455#section-5.2),
//! modeled as a mutable, structurally validated byte buffer.
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-------+-+-------------+-------------------------------+
//! |F|R|R|R| opcode|M| Payload len |    Extended payload length    |
//! |I|S|S|S|  (4)  |A|     (7)     |         (16 or 64 bits)       |
//! |N|V|V|V|       |S|             |                               |
//! | |1|2|3|       |K|             |                               |
//! +-+-+-+-+-------+-+-------------+-------------------------------+
//! |        Extended payload length continued, if payload len == 127|
//! +---------------------------------------------------------------+
//! |                               |   Masking-key, if MASK set to 1|
//! +-------------------------------+-------------------------------+
//! |     Masking-key (continued)       |          Payload Data      |
//! +-----------------------------------+ - - - - - - - - - - - - - -+
//! :                     Payload Data continued ...                :
//! +---------------------------------------------------------------+
//! ```
//!
//! [`Frame`] owns its backing buffer and exposes getters and setters for
//! every header field. The buffer always holds wire-exact bytes: when the
//! mask bit is set the resident payload is stored masked, and the
//! [`payload`](Frame::payload) getter derives a plaintext copy on read
//! rather than keeping a second representation or a hidden status flag.
//!
//! A frame may hold fewer resident payload bytes than its header declares
//! while it is still streaming in. [`is_complete`](Frame::is_complete) and
//! [`is_valid`](Frame::is_valid) are the queries over that state: a frame
//! goes *receiving* (`is_complete()` false) to *complete* (`true`) to either
//! *valid* or *malformed*; there is no explicit state field, only the bytes.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::{builder::FrameDesc, consts, layout, mask, validate, FrameError, Result};

/// A mutable WebSocket frame backed by an owned, contiguous byte buffer.
///
/// Constructed either by adopting raw bytes ([`Frame::from_bytes`], the
/// decode path) or from a [`FrameDesc`] ([`Frame::from_desc`], the encode
/// path). All field accessors recompute offsets from the buffer's current
/// bytes on every call, so they stay correct across mutations.
///
/// Every setter validates its input fully before touching the buffer and
/// either flips header bits in place or builds the complete replacement
/// buffer aside and swaps it in, so a failed call leaves the frame in its
/// prior state. The frame exclusively owns its buffer; sharing one across
/// threads requires external serialization, though `Frame` is `Send`.
///
/// ```rust
/// use wsframe::{Frame, FrameDesc};
///
/// let mut frame = Frame::from_desc(
///     &FrameDesc::new().fin(1).opcode(1).payload("abc"),
/// )?;
/// assert_eq!(frame.as_bytes(), &[0x81, 0x03, b'a', b'b', b'c']);
/// assert_eq!(frame.payload_len(), 3);
/// assert!(frame.is_valid());
///
/// frame.set_masking_key([0x01, 0x02, 0x03, 0x04])?;
/// // The wire bytes are now masked, but reads stay plaintext.
/// assert_eq!(frame.payload().unwrap().as_ref(), b"abc");
/// # Ok::<(), wsframe::FrameError>(())
/// ```
pub struct Frame {
    /// Wire-exact bytes: header, optional extended length, optional masking
    /// key, then the payload (masked iff the mask bit is set).
    buf: BytesMut,
}

impl Frame {
    /// Takes raw wire bytes as a frame. The buffer may hold fewer payload
    /// bytes than its header declares (a frame still streaming in); probe
    /// with [`is_complete`](Frame::is_complete).
    ///
    /// # Errors
    /// [`FrameError::BufferTooShort`](crate::FrameError::BufferTooShort) if
    /// `bytes` is shorter than the two fixed header bytes.
    pub fn from_bytes(bytes: impl AsRef<[u8]>) -> Result<Self> {
        let bytes = bytes.as_ref();
        validate::check_min_len(bytes)?;
        Ok(Self {
            buf: BytesMut::from(bytes),
        })
    }

    /// Builds a frame from a descriptor via the encoder.
    ///
    /// # Errors
    /// Whatever [`FrameDesc::encode`] raises for an invalid field.
    pub fn from_desc(desc: &FrameDesc) -> Result<Self> {
        Ok(Self {
            buf: desc.encode()?,
        })
    }

    /// The frame's wire bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the frame, returning its wire buffer.
    pub fn into_bytes(self) -> BytesMut {
        self.buf
    }

    /// Appends bytes received from the wire to the end of the buffer, for
    /// frames being filled incrementally from a stream.
    pub fn extend_from_wire(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    fn flag(&self, bit: u8) -> u8 {
        u8::from(self.buf[0] & bit != 0)
    }

    /// Rewrites a single bit of byte 0, leaving the rest untouched.
    fn set_flag(&mut self, field: &'static str, bit: u8, value: u8) -> Result<()> {
        validate::check_bit_flag(field, value)?;
        if value == 0 {
            self.buf[0] &= !bit;
        } else {
            self.buf[0] |= bit;
        }
        Ok(())
    }

    /// The FIN flag: 1 on the final fragment of a message.
    pub fn fin(&self) -> u8 {
        self.flag(consts::FIN)
    }

    /// Sets the FIN flag to 0 or 1.
    pub fn set_fin(&mut self, value: u8) -> Result<()> {
        self.set_flag("fin", consts::FIN, value)
    }

    /// The RSV1 flag, reserved for extensions.
    pub fn rsv1(&self) -> u8 {
        self.flag(consts::RSV1)
    }

    /// Sets the RSV1 flag to 0 or 1.
    pub fn set_rsv1(&mut self, value: u8) -> Result<()> {
        self.set_flag("rsv1", consts::RSV1, value)
    }

    /// The RSV2 flag, reserved for extensions.
    pub fn rsv2(&self) -> u8 {
        self.flag(consts::RSV2)
    }

    /// Sets the RSV2 flag to 0 or 1.
    pub fn set_rsv2(&mut self, value: u8) -> Result<()> {
        self.set_flag("rsv2", consts::RSV2, value)
    }

    /// The RSV3 flag, reserved for extensions.
    pub fn rsv3(&self) -> u8 {
        self.flag(consts::RSV3)
    }

    /// Sets the RSV3 flag to 0 or 1.
    pub fn set_rsv3(&mut self, value: u8) -> Result<()> {
        self.set_flag("rsv3", consts::RSV3, value)
    }

    /// The raw 4-bit opcode, 0..=15. Reserved values pass through
    /// untouched; interpreting them is the caller's business.
    pub fn opcode(&self) -> u8 {
        self.buf[0] & consts::OPCODE
    }

    /// Sets the opcode, rewriting only the low nibble of byte 0.
    pub fn set_opcode(&mut self, value: u8) -> Result<()> {
        validate::check_opcode(value)?;
        self.buf[0] = (self.buf[0] & !consts::OPCODE) | value;
        Ok(())
    }

    /// The mask bit from byte 1. Read-only; it changes only through
    /// [`set_masking_key`](Frame::set_masking_key) and
    /// [`remove_masking_key`](Frame::remove_masking_key).
    pub fn mask(&self) -> u8 {
        u8::from(layout::is_masked(&self.buf))
    }

    /// The payload length the header declares: the 7-bit literal, or the
    /// big-endian 16/64-bit value following it when the literal reads
    /// 126/127. Derived from the bytes on every call, never stored.
    ///
    /// Returns 0 while the extended length bytes have not all arrived;
    /// [`is_complete`](Frame::is_complete) stays `false` in that window.
    pub fn payload_len(&self) -> u64 {
        layout::declared_len(&self.buf).unwrap_or(0)
    }

    /// The 4-byte masking key, or `None` when the mask bit is clear (or
    /// the key region has not fully arrived yet).
    pub fn masking_key(&self) -> Option<[u8; 4]> {
        layout::masking_key(&self.buf)
    }

    /// Installs `key` as the masking key, leaving the mask bit set.
    ///
    /// With a key already present the new key is copied into place and the
    /// resident payload is re-masked from the old key to the new one. With
    /// no key present the buffer is rebuilt with a key region inserted
    /// before the payload, the payload is masked under the new key, and the
    /// mask bit is set.
    ///
    /// # Errors
    /// [`FrameError::InvalidMaskingKeyLength`](crate::FrameError::InvalidMaskingKeyLength)
    /// unless `key` is exactly 4 bytes, and
    /// [`FrameError::IncompleteLengthField`](crate::FrameError::IncompleteLengthField)
    /// while the extended length bytes are still streaming in, since the key
    /// region cannot be positioned until the length field is whole. The
    /// frame is untouched on failure.
    pub fn set_masking_key(&mut self, key: impl AsRef<[u8]>) -> Result<()> {
        let new_key = validate::check_masking_key(key.as_ref())?;

        match self.masking_key() {
            Some(old_key) => {
                let key_offset = layout::masking_key_offset(&self.buf);
                self.buf[key_offset..key_offset + consts::MASKING_KEY_LEN]
                    .copy_from_slice(&new_key);

                let payload_offset = layout::payload_offset(&self.buf);
                let payload = &mut self.buf[payload_offset..];
                // Wire bytes go old key -> plaintext -> new key.
                mask::apply_mask(payload, old_key);
                mask::apply_mask(payload, new_key);
            }
            None => {
                // Inserting the key mid-length-field would leave a buffer
                // that claims a key it cannot locate.
                if layout::declared_len(&self.buf).is_none() {
                    return Err(FrameError::IncompleteLengthField);
                }

                #[cfg(feature = "logging")]
                log::trace!("rebuilding frame buffer to insert masking key");

                // The length field is whole, so the key offset is resident;
                // the payload offset still clamps in case the buffer ends in
                // a partial key region.
                let key_offset = layout::masking_key_offset(&self.buf).min(self.buf.len());
                let payload_offset = layout::payload_offset(&self.buf).min(self.buf.len());

                let mut next =
                    BytesMut::with_capacity(self.buf.len() + consts::MASKING_KEY_LEN);
                next.extend_from_slice(&self.buf[..key_offset]);
                next.extend_from_slice(&new_key);
                let start = next.len();
                next.extend_from_slice(&self.buf[payload_offset..]);
                mask::apply_mask(&mut next[start..], new_key);
                next[1] |= consts::MASK;

                self.buf = next;
            }
        }
        Ok(())
    }

    /// Strips the masking key, clears the mask bit and restores the
    /// resident payload to plaintext, returning the removed key. A no-op
    /// returning `None` when no key exists, idempotent under repeated
    /// calls.
    pub fn remove_masking_key(&mut self) -> Option<[u8; 4]> {
        let key = self.masking_key()?;
        let key_offset = layout::masking_key_offset(&self.buf);
        let payload_offset = layout::payload_offset(&self.buf);

        let mut next =
            BytesMut::with_capacity(self.buf.len() - consts::MASKING_KEY_LEN);
        next.extend_from_slice(&self.buf[..key_offset]);
        let start = next.len();
        next.extend_from_slice(&self.buf[payload_offset..]);
        mask::apply_mask(&mut next[start..], key);
        next[1] &= !consts::MASK;

        self.buf = next;
        Some(key)
    }

    /// A plaintext copy of the resident payload bytes, unmasked under the
    /// current key when the mask bit is set, or `None` when the declared
    /// payload length is 0. Reading never mutates the stored wire bytes.
    ///
    /// While a frame is streaming in, this returns the bytes resident so
    /// far, which may be fewer than [`payload_len`](Frame::payload_len)
    /// declares.
    pub fn payload(&self) -> Option<Bytes> {
        let declared = layout::declared_len(&self.buf)?;
        if declared == 0 {
            return None;
        }

        let offset = layout::payload_offset(&self.buf).min(self.buf.len());
        let mut plaintext = BytesMut::from(&self.buf[offset..]);
        if let Some(key) = self.masking_key() {
            mask::apply_mask(&mut plaintext, key);
        }
        Some(plaintext.freeze())
    }

    /// Replaces the payload, rewriting the length field for the new length
    /// and masking the new bytes under the current key if one is present.
    /// The buffer is rebuilt as `[byte0][length][key?][payload]`.
    ///
    /// The payload itself is always representable as bytes, so unlike the
    /// other setters this cannot fail.
    pub fn set_payload(&mut self, payload: impl Into<Bytes>) {
        let payload = payload.into();
        let key = self.masking_key();

        #[cfg(feature = "logging")]
        log::trace!("rebuilding frame buffer for new payload (len={})", payload.len());

        let mut next = BytesMut::with_capacity(
            consts::LEN_OFFSET + 8 + consts::MASKING_KEY_LEN + payload.len(),
        );
        next.put_u8(self.buf[0]);
        // The mask bit survives only with a fully resident key; a ragged
        // masked prefix degrades to an unmasked frame rather than claiming
        // a key it does not hold.
        let mask_bit = if key.is_some() { consts::MASK } else { 0 };
        layout::put_len(&mut next, mask_bit, payload.len() as u64);
        if let Some(key) = key {
            next.put_slice(&key);
        }
        let start = next.len();
        next.put_slice(&payload);
        if let Some(key) = key {
            mask::apply_mask(&mut next[start..], key);
        }

        self.buf = next;
    }

    /// Strips the payload and zeroes the length field back to a 0-byte
    /// literal, keeping the masking key (and mask bit) if one is present.
    /// Returns the previously held plaintext payload, or `None` when the
    /// declared length was already 0.
    pub fn remove_payload(&mut self) -> Option<Bytes> {
        let payload = self.payload()?;
        let key = self.masking_key();

        let mut next =
            BytesMut::with_capacity(consts::LEN_OFFSET + consts::MASKING_KEY_LEN);
        next.put_u8(self.buf[0]);
        next.put_u8(if key.is_some() { consts::MASK } else { 0 });
        if let Some(key) = key {
            next.put_slice(&key);
        }

        self.buf = next;
        Some(payload)
    }

    /// Whether the buffer is structurally sound and the resident payload
    /// byte count exactly equals the declared length, no more and no fewer.
    /// Never raises; structural failures report as `false` so untrusted or
    /// partially received data can be probed freely.
    pub fn is_valid(&self) -> bool {
        if validate::check_min_len(&self.buf).is_err() {
            return false;
        }
        match layout::declared_len(&self.buf) {
            Some(declared) => layout::resident_len(&self.buf) as u64 == declared,
            None => false,
        }
    }

    /// [`is_valid`](Frame::is_valid) plus protocol-level legality: the
    /// opcode must be one RFC 6455 defines (0-2, 8-10) and the reserved
    /// bits must be zero. Shape-only validity is the default; this is the
    /// stricter query for callers that want it.
    pub fn is_valid_strict(&self) -> bool {
        self.is_valid()
            && matches!(self.opcode(), 0x0..=0x2 | 0x8..=0xA)
            && self.buf[0] & (consts::RSV1 | consts::RSV2 | consts::RSV3) == 0
    }

    /// Whether at least as many payload bytes are resident as the header
    /// declares. `false` while a frame is still streaming in; once `true`
    /// it stays `true` as more bytes are appended.
    pub fn is_complete(&self) -> bool {
        match layout::declared_len(&self.buf) {
            Some(declared) => layout::resident_len(&self.buf) as u64 >= declared,
            None => false,
        }
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("fin", &self.fin())
            .field("rsv1", &self.rsv1())
            .field("rsv2", &self.rsv2())
            .field("rsv3", &self.rsv3())
            .field("opcode", &self.opcode())
            .field("mask", &self.mask())
            .field("payload_len", &self.payload_len())
            .field("resident_len", &layout::resident_len(&self.buf))
            .finish()
    }
}
