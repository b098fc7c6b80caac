//! Validation and repair of captured frames.
//!
//! Every byte of an ACARS frame carries odd parity and the whole frame is protected by the CRC.
//! A frame with at most one parity error and a failing CRC is repaired when its syndrome matches
//! a single bit error anywhere in the frame, or, when parity is clean, two errors within the same
//! byte. Whatever the repair, the parity of every byte must agree afterwards.

use log::debug;

use crate::error::Rejection;

use super::common::{odd_parity, RawFrame, CRC_LEN, HEADER_LEN, TWO_ERROR_MAX_LEN};
use super::crc;
use super::syndrome::{self, BitError};


/// Number of bytes failing odd parity
pub fn parity_errors(text: &[u8]) -> usize {
    text.iter().filter(|&&byte| !odd_parity(byte)).count()
}

/// Checks the frame, repairs it when possible and strips the parity bits from its text.
/// Returns the number of bits corrected: 0, 1 or 2.
pub fn correct(frame: &mut RawFrame) -> Result<u8, Rejection> {

    let len = frame.text.len();

    if len < HEADER_LEN {
        return Err(Rejection::TooShort { len });
    }

    let parity = parity_errors(&frame.text);
    if parity > 1 {
        return Err(Rejection::Parity { count: parity });
    }

    let syndrome = crc::residue(&frame.text, &frame.crc);
    let mut errors = 0;

    if syndrome != 0 {

        let table = syndrome::table();
        let span = len + CRC_LEN;

        debug!("#{} CRC error {:#06x}, trying to recover 1 error", frame.channel + 1, syndrome);
        let mut repair = table.find_single(syndrome, span).map(|error| (error, 1));

        if repair.is_none() && parity == 0 && len < TWO_ERROR_MAX_LEN {
            debug!("#{} trying to recover 2 close errors", frame.channel + 1);
            repair = table.find_double(syndrome, span).map(|error| (error, 2));
        }

        match repair {
            Some((error, count)) => {
                fix(frame, error);
                errors = count;
            },
            None => return Err(Rejection::Uncorrectable { syndrome }),
        }
    }

    let parity = parity_errors(&frame.text);
    for byte in frame.text.iter_mut() {
        *byte &= 0x7f;
    }

    if parity > 0 {
        return Err(Rejection::ParityAfterRepair { count: parity });
    }

    Ok(errors)
}

fn fix(frame: &mut RawFrame, error: BitError) {

    if error.in_crc() {
        debug!("#{} error in CRC bytes, left as received", frame.channel + 1);
        return;
    }

    let index = frame.text.len() - 1 - (error.distance - CRC_LEN);
    debug!("#{} fixed byte {} with mask {:#04x}", frame.channel + 1, index, error.mask);
    frame.text[index] ^= error.mask;
}
