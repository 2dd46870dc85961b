//! Synch-safe integers as used by the ID3v2 tag header.
//!
//! Each of the four bytes carries 7 significant bits, most significant byte
//! first, so the encoded field never contains `0xFF` and cannot be mistaken
//! for an MPEG sync pattern.

use crate::{Result, TsError};

/// Largest value representable in four synch-safe bytes (28 bits).
pub const MAX_SYNCH_SAFE_U32: u32 = 0x0FFF_FFFF;

/// Decodes a 4-byte synch-safe integer.
///
/// Bytes with the high bit set are rejected rather than masked.
pub fn read_synch_safe_u32(bytes: [u8; 4]) -> Result<u32> {
    if let Some(&bad) = bytes.iter().find(|&&b| b & 0x80 != 0) {
        return Err(TsError::InvalidSynchSafeInteger(bad));
    }

    Ok((bytes[0] as u32) << 21
        | (bytes[1] as u32) << 14
        | (bytes[2] as u32) << 7
        | bytes[3] as u32)
}

/// Encodes `value` as a 4-byte synch-safe integer.
pub fn write_synch_safe_u32(value: u32) -> Result<[u8; 4]> {
    if value > MAX_SYNCH_SAFE_U32 {
        return Err(TsError::SynchSafeOverflow(value));
    }

    Ok([
        ((value >> 21) & 0x7F) as u8,
        ((value >> 14) & 0x7F) as u8,
        ((value >> 7) & 0x7F) as u8,
        (value & 0x7F) as u8,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_known_values() {
        assert_eq!(read_synch_safe_u32([0x00, 0x00, 0x02, 0x01]).unwrap(), 257);
        assert_eq!(read_synch_safe_u32([0x00, 0x00, 0x00, 0x00]).unwrap(), 0);
        assert_eq!(read_synch_safe_u32([0x00, 0x00, 0x00, 0x7F]).unwrap(), 127);
        assert_eq!(read_synch_safe_u32([0x00, 0x00, 0x01, 0x00]).unwrap(), 128);
        assert_eq!(
            read_synch_safe_u32([0x7F, 0x7F, 0x7F, 0x7F]).unwrap(),
            MAX_SYNCH_SAFE_U32
        );
    }

    #[test]
    fn test_decode_rejects_high_bit() {
        let err = read_synch_safe_u32([0x00, 0x80, 0x00, 0x00]).unwrap_err();
        assert!(matches!(err, TsError::InvalidSynchSafeInteger(0x80)));

        let err = read_synch_safe_u32([0x00, 0x00, 0x00, 0xFF]).unwrap_err();
        assert!(matches!(err, TsError::InvalidSynchSafeInteger(0xFF)));
    }

    #[test]
    fn test_encode() {
        assert_eq!(write_synch_safe_u32(257).unwrap(), [0x00, 0x00, 0x02, 0x01]);
        assert_eq!(write_synch_safe_u32(0).unwrap(), [0x00; 4]);
        assert_eq!(
            read_synch_safe_u32(write_synch_safe_u32(1_000_000).unwrap()).unwrap(),
            1_000_000
        );
    }

    #[test]
    fn test_encode_overflow() {
        let err = write_synch_safe_u32(MAX_SYNCH_SAFE_U32 + 1).unwrap_err();
        assert!(matches!(err, TsError::SynchSafeOverflow(0x1000_0000)));
    }
}
