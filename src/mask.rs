//! XOR masking of payload bytes
//! ([RFC 6455 Section 5.3](https://datatracker.ietf.org/doc/html/rfc6455#section-5.3)).
//!
//! The transform is its own inverse: applying it twice with the same key
//! restores the original bytes. The algorithm carries no direction, so
//! masking and unmasking are the same call; tracking whether resident bytes
//! are currently wire-masked or plaintext is the caller's job.

/// Masks or unmasks `buf` in place with the 4-byte `key`.
#[inline]
pub(crate) fn apply_mask(buf: &mut [u8], key: [u8; 4]) {
    apply_mask_words(buf, key);
}

/// Byte-at-a-time masking, correct at any alignment.
#[inline]
fn apply_mask_bytewise(buf: &mut [u8], key: [u8; 4]) {
    for (i, byte) in buf.iter_mut().enumerate() {
        *byte ^= key[i & 3];
    }
}

/// Masks in whole `u32` words, handling the unaligned head and tail a byte
/// at a time. The key word is rotated by however many bytes the head
/// consumed so the key position stays in phase across the three regions.
fn apply_mask_words(buf: &mut [u8], key: [u8; 4]) {
    let key_word = u32::from_ne_bytes(key);

    let (head, words, tail) = unsafe { buf.align_to_mut::<u32>() };
    apply_mask_bytewise(head, key);

    let consumed = head.len() & 3;
    let key_word = if consumed > 0 {
        if cfg!(target_endian = "big") {
            key_word.rotate_left(8 * consumed as u32)
        } else {
            key_word.rotate_right(8 * consumed as u32)
        }
    } else {
        key_word
    };

    for word in words.iter_mut() {
        *word ^= key_word;
    }
    apply_mask_bytewise(tail, key_word.to_ne_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_involution() {
        let key = [0xAA, 0xBB, 0xCC, 0xDD];
        let original = b"payloads of various lengths should all round-trip";

        let mut data = original.to_vec();
        apply_mask(&mut data, key);
        assert_ne!(&data[..], &original[..]);

        apply_mask(&mut data, key);
        assert_eq!(&data[..], &original[..]);
    }

    #[test]
    fn test_zero_key_is_identity() {
        let mut data = b"untouched".to_vec();
        apply_mask(&mut data, [0; 4]);
        assert_eq!(&data[..], b"untouched");
    }

    #[test]
    fn test_short_buffers() {
        let key = [0x12, 0x34, 0x56, 0x78];

        let mut empty: Vec<u8> = vec![];
        apply_mask(&mut empty, key);
        assert!(empty.is_empty());

        let mut three = vec![0xAB, 0xCD, 0xEF];
        apply_mask(&mut three, key);
        assert_eq!(three, vec![0xAB ^ 0x12, 0xCD ^ 0x34, 0xEF ^ 0x56]);
    }

    #[test]
    fn test_key_position_mod_4() {
        let key = [0x01, 0x02, 0x03, 0x04];
        let original: Vec<u8> = (0..1000).map(|i| (i % 256) as u8).collect();

        let mut data = original.clone();
        apply_mask(&mut data, key);

        for (i, &byte) in data.iter().enumerate() {
            assert_eq!(byte, original[i] ^ key[i % 4], "index {i}");
        }
    }

    #[test]
    fn test_word_path_matches_bytewise_at_any_alignment() {
        let key = [0x6D, 0xB6, 0xB2, 0x80];
        let data: Vec<u8> = (0..64).map(|i| (i * 7) as u8).collect();

        for offset in 0..=4 {
            for len in 0..=(data.len() - offset) {
                let mut bytewise = data.clone();
                apply_mask_bytewise(&mut bytewise[offset..offset + len], key);

                let mut words = data.clone();
                apply_mask_words(&mut words[offset..offset + len], key);

                assert_eq!(bytewise, words, "offset={offset} len={len}");
            }
        }
    }
}
