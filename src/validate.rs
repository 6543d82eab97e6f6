//! Stateless field checks shared by the encoder and the frame setters.
//!
//! Every check runs before any buffer byte is touched, so a rejected input
//! leaves the frame exactly as it was.

use crate::{consts, FrameError, Result};

/// A FIN or RSV flag must be exactly 0 or 1.
pub(crate) fn check_bit_flag(field: &'static str, value: u8) -> Result<()> {
    if value > 1 {
        return Err(FrameError::InvalidBitFlag { field, value });
    }
    Ok(())
}

/// An opcode must fit the 4-bit field, 0..=15 inclusive.
pub(crate) fn check_opcode(value: u8) -> Result<()> {
    if value > 0x0F {
        return Err(FrameError::InvalidOpCode(value));
    }
    Ok(())
}

/// A masking key must be exactly 4 bytes; returns it as a fixed array.
pub(crate) fn check_masking_key(key: &[u8]) -> Result<[u8; 4]> {
    key.try_into()
        .map_err(|_| FrameError::InvalidMaskingKeyLength(key.len()))
}

/// A raw buffer must hold at least the two fixed header bytes.
pub(crate) fn check_min_len(buf: &[u8]) -> Result<()> {
    if buf.len() < consts::MIN_FRAME_LEN {
        return Err(FrameError::BufferTooShort(buf.len()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_flag_range() {
        assert!(check_bit_flag("fin", 0).is_ok());
        assert!(check_bit_flag("fin", 1).is_ok());

        let err = check_bit_flag("rsv2", 2).unwrap_err();
        assert_eq!(
            err,
            FrameError::InvalidBitFlag {
                field: "rsv2",
                value: 2
            }
        );
    }

    #[test]
    fn test_opcode_range() {
        for value in 0..=0x0F {
            assert!(check_opcode(value).is_ok());
        }
        assert_eq!(check_opcode(16).unwrap_err(), FrameError::InvalidOpCode(16));
        assert_eq!(
            check_opcode(255).unwrap_err(),
            FrameError::InvalidOpCode(255)
        );
    }

    #[test]
    fn test_masking_key_length() {
        assert_eq!(
            check_masking_key(&[1, 2, 3, 4]).unwrap(),
            [1u8, 2, 3, 4]
        );

        for len in [0usize, 1, 3, 5, 19] {
            let key = vec![0u8; len];
            assert_eq!(
                check_masking_key(&key).unwrap_err(),
                FrameError::InvalidMaskingKeyLength(len)
            );
        }
    }

    #[test]
    fn test_min_len() {
        assert_eq!(
            check_min_len(&[]).unwrap_err(),
            FrameError::BufferTooShort(0)
        );
        assert_eq!(
            check_min_len(&[0x81]).unwrap_err(),
            FrameError::BufferTooShort(1)
        );
        assert!(check_min_len(&[0x81, 0x00]).is_ok());
    }
}
