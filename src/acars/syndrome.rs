//! Syndrome tables for the ACARS CRC.
//!
//! A bit flipped `d` bytes before the end of a frame (CRC bytes included, the last CRC byte being
//! at distance 0) always leaves the same residue in the CRC register whatever the frame content,
//! so the residues of every single bit error and of every two bit error inside one byte can be
//! computed once over an all-zero buffer and looked up when a frame fails its check.

use once_cell::sync::Lazy;

use super::common::{CRC_LEN, MAX_FRAME_LEN, TWO_ERROR_MAX_LEN};
use super::crc;

/// Byte positions covered by the single error table: the longest text, its end marker (accepted
/// even right after the text reached its limit) and the CRC bytes
pub const ONE_ERROR_SPAN: usize = MAX_FRAME_LEN + 1 + CRC_LEN;

/// Byte positions covered by the two error table. Going further would make some pairs near the
/// start of long frames indistinguishable from pairs inside the CRC bytes.
pub const TWO_ERROR_SPAN: usize = TWO_ERROR_MAX_LEN;

/// Number of distinct bit pairs inside a byte
pub const BIT_PAIRS: usize = 28;

static TABLE: Lazy<SyndromeTable> = Lazy::new(SyndromeTable::build);


/// Location of an error: byte distance from the end of the frame and the bits to flip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitError {
    pub distance: usize,
    pub mask: u8,
}

impl BitError {

    /// True when the error lies in the two CRC bytes rather than in the text
    pub fn in_crc(&self) -> bool {
        self.distance < CRC_LEN
    }
}


#[derive(Debug)]
pub struct SyndromeTable {
    /// Indexed by `distance * 8 + bit`
    one: Vec<u16>,
    /// Bit pair masks, low bit first, in search order
    pairs: Vec<u8>,
    /// Indexed by `pair * TWO_ERROR_SPAN + distance`
    two: Vec<u16>,
}

/// Process-wide tables, built on first use
pub fn table() -> &'static SyndromeTable {
    &TABLE
}

impl SyndromeTable {

    fn build() -> SyndromeTable {

        let mut one = vec![0u16; ONE_ERROR_SPAN * 8];

        for bit in 0..8 {
            let mut syndrome = crc::update(0, 1 << bit);
            for distance in 0..ONE_ERROR_SPAN {
                one[distance * 8 + bit] = syndrome;
                syndrome = crc::update(syndrome, 0);
            }
        }

        let mut pairs = Vec::with_capacity(BIT_PAIRS);
        for high in 1..8 {
            for low in 0..high {
                pairs.push((1u8 << low) | (1u8 << high));
            }
        }

        let mut two = vec![0u16; BIT_PAIRS * TWO_ERROR_SPAN];

        for (pair, &mask) in pairs.iter().enumerate() {
            let mut syndrome = crc::update(0, mask);
            for distance in 0..TWO_ERROR_SPAN {
                two[pair * TWO_ERROR_SPAN + distance] = syndrome;
                syndrome = crc::update(syndrome, 0);
            }
        }

        SyndromeTable { one, pairs, two }
    }

    /// Residue left by flipping `bit` at `distance`
    pub fn single(&self, distance: usize, bit: usize) -> u16 {
        self.one[distance * 8 + bit]
    }

    /// Residue left by flipping the bit pair number `pair` at `distance`
    pub fn double(&self, distance: usize, pair: usize) -> u16 {
        self.two[pair * TWO_ERROR_SPAN + distance]
    }

    pub fn pairs(&self) -> &[u8] {
        &self.pairs
    }

    /// Looks for a single bit error explaining `syndrome` within the last `span` bytes
    pub fn find_single(&self, syndrome: u16, span: usize) -> Option<BitError> {

        let span = span.min(ONE_ERROR_SPAN);

        self.one[..span * 8]
            .iter()
            .position(|&entry| entry == syndrome)
            .map(|index| BitError { distance: index / 8, mask: 1 << (index % 8) })
    }

    /// Looks for two errors inside the same byte explaining `syndrome` within the last `span`
    /// bytes
    pub fn find_double(&self, syndrome: u16, span: usize) -> Option<BitError> {

        let span = span.min(TWO_ERROR_SPAN);

        for (pair, &mask) in self.pairs.iter().enumerate() {
            let row = &self.two[pair * TWO_ERROR_SPAN..pair * TWO_ERROR_SPAN + span];
            if let Some(distance) = row.iter().position(|&entry| entry == syndrome) {
                return Some(BitError { distance, mask });
            }
        }

        None
    }
}
