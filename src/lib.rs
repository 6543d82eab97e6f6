//! # wsframe
//! A mutable WebSocket frame codec implementing the wire layout of
//! [RFC 6455 Section 5.2](https://datatracker.ietf.org/doc/html/rfc6455#section-5.2):
//! a single protocol frame modeled as an owned, structurally validated byte
//! buffer with accessors for every header field, safe payload mutation,
//! masking-key management and streaming completeness checks.
//!
//! The crate never performs I/O; it only operates on byte buffers already in
//! memory. Connection lifecycle, the HTTP upgrade handshake, multi-frame
//! message reassembly, close/ping/pong semantics and compression extensions
//! are all outside its scope: it is the frame layer those layers build on.
//!
//! # Features
//! - `logging`: trace-level notes at buffer-rebuild points using the `log`
//!   crate. Off by default.
//!
//! # Decode path
//! Adopt raw wire bytes, including a partial frame still streaming in:
//!
//! ```rust
//! use wsframe::Frame;
//!
//! let mut frame = Frame::from_bytes(vec![0x81, 0x05, b'h', b'e'])?;
//! assert_eq!(frame.opcode(), 0x1);
//! assert_eq!(frame.payload_len(), 5);
//! assert!(!frame.is_complete());
//!
//! frame.extend_from_wire(b"llo");
//! assert!(frame.is_complete());
//! assert!(frame.is_valid());
//! assert_eq!(frame.payload().unwrap().as_ref(), b"hello");
//! # Ok::<(), wsframe::FrameError>(())
//! ```
//!
//! # Encode path
//! Build a frame from a field descriptor; every field is optional and
//! independently validated:
//!
//! ```rust
//! use wsframe::{Frame, FrameDesc};
//!
//! let mut frame = Frame::from_desc(
//!     &FrameDesc::new()
//!         .fin(1)
//!         .opcode(2)
//!         .masking_key([0x37, 0xFA, 0x21, 0x3D].to_vec())
//!         .payload(vec![1, 2, 3]),
//! )?;
//!
//! // Resident bytes are wire-exact (masked); reads are plaintext.
//! assert_eq!(frame.payload().unwrap().as_ref(), &[1, 2, 3][..]);
//! let key = frame.remove_masking_key();
//! assert_eq!(key, Some([0x37, 0xFA, 0x21, 0x3D]));
//! assert_eq!(frame.as_bytes(), &[0x82, 0x03, 1, 2, 3]);
//! # Ok::<(), wsframe::FrameError>(())
//! ```

pub mod builder;
pub mod frame;

mod consts;
mod layout;
mod mask;
mod validate;

pub use builder::FrameDesc;
pub use frame::Frame;

use thiserror::Error;

/// A result type for frame operations, using [`FrameError`] as the error
/// type.
pub type Result<T> = std::result::Result<T, FrameError>;

/// Errors raised by frame construction and mutation.
///
/// Every error is raised synchronously at the point of violation, before
/// any buffer byte is mutated, so a failed operation leaves the frame in
/// its prior state. [`Frame::is_valid`] deliberately converts structural
/// failures to `false` instead of propagating them, so untrusted or
/// partially received buffers can be probed without error handling.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FrameError {
    /// A raw buffer handed to [`Frame::from_bytes`] is shorter than the two
    /// fixed header bytes every frame starts with.
    #[error("frame buffer must be at least 2 bytes long (got {0})")]
    BufferTooShort(usize),

    /// A FIN or RSV flag was given a value other than 0 or 1.
    #[error("{field} must be 0 or 1 (got {value})")]
    InvalidBitFlag {
        /// Which flag was rejected: `"fin"`, `"rsv1"`, `"rsv2"` or `"rsv3"`.
        field: &'static str,
        /// The rejected value.
        value: u8,
    },

    /// An opcode outside the 4-bit range 0..=15. Reserved opcodes inside
    /// the range are accepted; this is a shape check, not a protocol one.
    #[error("opcode must be within range 0..=15 (got {0})")]
    InvalidOpCode(u8),

    /// A masking key whose byte length is not exactly 4.
    #[error("masking key must be exactly 4 bytes long (got {0})")]
    InvalidMaskingKeyLength(usize),

    /// A masking key was installed on a frame whose extended length bytes
    /// have not all arrived. The key region sits after the length field,
    /// so it cannot be positioned until the field is whole; retry once the
    /// remaining length bytes have been appended.
    #[error("extended length field has not fully arrived; cannot position the masking key")]
    IncompleteLengthField,
}
