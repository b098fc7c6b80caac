//! CCITT 16 bit CRC as used by ACARS. Bytes are fed least significant bit first into a plain
//! polynomial division register: no preset, no final inversion. Feeding a frame followed by its
//! two CRC bytes leaves a zero register, and because the division is linear the residue left by a
//! damaged frame only depends on which bits were flipped.

use super::common::CRC_LEN;

pub const POLY: u16 = 0x1021;


/// Feeds one byte into the register
pub fn update(crc: u16, byte: u8) -> u16 {

    let mut crc = crc;

    for i in 0..8 {
        let flag = crc & 0x8000 != 0;
        crc <<= 1;
        if byte & (1 << i) != 0 { crc |= 1; }
        if flag { crc ^= POLY; }
    }

    crc
}

/// Register left after the frame text and its CRC bytes. Zero for a clean frame.
pub fn residue(text: &[u8], crc: &[u8; CRC_LEN]) -> u16 {
    text.iter().chain(crc.iter()).fold(0, |crc, &byte| update(crc, byte))
}

/// CRC bytes to transmit after `text`
pub fn checksum(text: &[u8]) -> [u8; CRC_LEN] {

    let remainder = text.iter().chain([0u8; CRC_LEN].iter()).fold(0, |crc, &byte| update(crc, byte));

    // The first transmitted bit cancels the highest remainder coefficient
    [((remainder >> 8) as u8).reverse_bits(), (remainder as u8).reverse_bits()]
}
