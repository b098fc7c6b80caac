//! Definitions shared by the frame synchronizer, the correction engine and the parser.

use chrono::{DateTime, Utc};


pub const SYN: u8 = 0x16;
pub const SOH: u8 = 0x01;
pub const STX: u8 = 0x02;
/// ETX and ETB as received, parity bit included
pub const ETX: u8 = 0x83;
pub const ETB: u8 = 0x97;
pub const DEL: u8 = 0x7f;

/// Longest text a frame may carry before it is abandoned
pub const MAX_FRAME_LEN: usize = 240;

/// Frames reaching this length are no longer candidates for two bit correction
pub const TWO_ERROR_MAX_LEN: usize = 142;

/// Mode, address, ack, label, block id and start marker
pub const HEADER_LEN: usize = 13;

pub const CRC_LEN: usize = 2;


/// A frame as captured by a channel's synchronizer: the bytes between SOH and the end marker
/// (end marker included, parity bits untouched) followed by the two CRC bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFrame {
    pub channel: usize,
    pub text: Vec<u8>,
    pub crc: [u8; CRC_LEN],
    pub date_time: Option<DateTime<Utc>>,
    pub level: f32,
}

impl RawFrame {

    pub fn new(channel: usize) -> RawFrame {

        RawFrame {
            channel,
            text: Vec::with_capacity(MAX_FRAME_LEN + 1),
            crc: [0; CRC_LEN],
            date_time: None,
            level: 0.0,
        }
    }
}


/// True when the byte carries odd parity over its 8 bits
pub fn odd_parity(byte: u8) -> bool {
    byte.count_ones() & 1 == 1
}

/// Sets bit 7 so that the byte has odd parity
pub fn with_parity(byte: u8) -> u8 {

    let byte = byte & 0x7f;

    if odd_parity(byte) { byte } else { byte | 0x80 }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_have_odd_parity() {
        for &marker in &[SYN, SOH, STX, ETX, ETB, DEL] {
            assert!(odd_parity(marker), "{:#04x}", marker);
        }
    }

    #[test]
    fn test_with_parity() {
        assert_eq!(with_parity(0x03), ETX);
        assert_eq!(with_parity(0x17), ETB);
        assert_eq!(with_parity(b'2'), b'2');
        assert_eq!(with_parity(b'N'), 0xce);
        for byte in 0..=255u8 {
            assert!(odd_parity(with_parity(byte)));
        }
    }
}
