//! Frame synchronizer: rebuilds ACARS frames from a channel's stream of bit decisions.
//!
//! Bits arrive least significant first and are shifted into a byte register. Once enough bits
//! were received the byte is evaluated against the current stage. While hunting for the SYN
//! preamble the register is re-examined after every bit, everywhere else once per byte. The
//! per-bit work is a shift and at most one comparison; validation and parsing of a completed
//! frame happen on the worker side of the queue.

use std::mem;
use std::sync::Arc;

use chrono::Utc;
use log::trace;

use super::common::{RawFrame, DEL, ETB, ETX, MAX_FRAME_LEN, SOH, SYN};
use super::queue::FrameQueue;

/// A frame longer than this that ends with DEL is assumed to have lost its end marker
const MISSED_END_MIN_LEN: usize = 20;


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStage {
    AwaitSync,
    SyncConfirmed,
    HeaderStart,
    Text,
    Crc1,
    Crc2,
    InterFrameGap,
}

/// Diagnostic counters, never used for control flow
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub frames: usize,
    pub overruns: usize,
    pub missed_ends: usize,
    pub polarity_flips: usize,
}


#[derive(Debug)]
pub struct Synchronizer {
    channel: usize,
    byte: u8,
    stage: FrameStage,
    remaining_bits: i32,
    frame: RawFrame,
    queue: Arc<FrameQueue>,
    realtime: bool,
    level_offset: f64,
    carrier: f64,
    inverted: bool,
    flipped: bool,
    stats: SyncStats,
}

impl Synchronizer {

    pub fn new(channel: usize, queue: Arc<FrameQueue>, realtime: bool, level_offset: f64) -> Synchronizer {

        Synchronizer {
            channel,
            byte: 0b_0000_0000,
            stage: FrameStage::AwaitSync,
            remaining_bits: 8,
            frame: RawFrame::new(channel),
            queue,
            realtime,
            level_offset,
            carrier: 1.0,
            inverted: false,
            flipped: false,
            stats: SyncStats::default(),
        }
    }

    pub fn stage(&self) -> FrameStage {
        self.stage
    }

    pub fn stats(&self) -> SyncStats {
        self.stats
    }

    /// Current polarity of the bit stream as seen by the preamble detector
    pub fn inverted(&self) -> bool {
        self.inverted
    }

    /// Reports, once, that an inverted preamble was seen since the last call
    pub fn polarity_flipped(&mut self) -> bool {
        mem::replace(&mut self.flipped, false)
    }

    /// Updates the received carrier magnitude used for the level of the next completed frame
    pub fn set_carrier(&mut self, magnitude: f64) {
        self.carrier = magnitude;
    }

    /// Feeds one soft decision, a positive value being a 1
    pub fn put_bit(&mut self, value: f64) {

        self.byte >>= 1;
        if value > 0.0 { self.byte |= 0b_1000_0000; }
        self.remaining_bits -= 1;

        if self.remaining_bits <= 0 {
            self.decode(self.byte);
        }
    }

    fn decode(&mut self, byte: u8) {

        match self.stage {

            FrameStage::AwaitSync => {

                if byte == SYN {
                    self.stage = FrameStage::SyncConfirmed;
                    self.remaining_bits = 8;
                } else if byte == !SYN {
                    self.flip_polarity();
                    self.stage = FrameStage::SyncConfirmed;
                    self.remaining_bits = 8;
                } else {
                    self.remaining_bits = 1;
                }
            },

            FrameStage::SyncConfirmed => {

                if byte == SYN {
                    self.stage = FrameStage::HeaderStart;
                    self.remaining_bits = 8;
                } else if byte == !SYN {
                    self.flip_polarity();
                    self.remaining_bits = 8;
                } else {
                    self.resync();
                }
            },

            FrameStage::HeaderStart => {

                if byte == SOH {
                    trace!("#{} SOH", self.channel + 1);
                    self.frame.date_time = if self.realtime { Some(Utc::now()) } else { None };
                    self.frame.text.clear();
                    self.stage = FrameStage::Text;
                    self.remaining_bits = 8;
                } else {
                    self.resync();
                }
            },

            FrameStage::Text => {

                self.frame.text.push(byte);
                let len = self.frame.text.len();

                if byte == ETX || byte == ETB {
                    self.stage = FrameStage::Crc1;
                    self.remaining_bits = 8;
                } else if len > MISSED_END_MIN_LEN && byte == DEL {
                    // The end marker was damaged: the DEL closing the frame came right after
                    // what must have been the two CRC bytes
                    trace!("#{} missed text end", self.channel + 1);
                    self.stats.missed_ends += 1;
                    let len = len - 3;
                    self.frame.crc = [self.frame.text[len], self.frame.text[len + 1]];
                    self.frame.text.truncate(len);
                    self.complete();
                } else if len > MAX_FRAME_LEN {
                    trace!("#{} too long", self.channel + 1);
                    self.stats.overruns += 1;
                    self.resync();
                } else {
                    self.remaining_bits = 8;
                }
            },

            FrameStage::Crc1 => {

                self.frame.crc[0] = byte;
                self.stage = FrameStage::Crc2;
                self.remaining_bits = 8;
            },

            FrameStage::Crc2 => {

                self.frame.crc[1] = byte;
                self.complete();
            },

            FrameStage::InterFrameGap => {

                self.stage = FrameStage::AwaitSync;
                self.remaining_bits = 8;
            },
        }
    }

    /// Hands the frame over to the workers and starts a fresh one
    fn complete(&mut self) {

        self.frame.level = (20.0 * self.carrier.max(1e-6).log10() + self.level_offset) as f32;

        let frame = mem::replace(&mut self.frame, RawFrame::new(self.channel));
        self.queue.push(frame);
        self.stats.frames += 1;

        self.stage = FrameStage::InterFrameGap;
        self.remaining_bits = 8;
    }

    fn resync(&mut self) {
        self.stage = FrameStage::AwaitSync;
        self.remaining_bits = 1;
    }

    fn flip_polarity(&mut self) {
        trace!("#{} inverted SYN", self.channel + 1);
        self.inverted = !self.inverted;
        self.flipped = true;
        self.stats.polarity_flips += 1;
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::acars::common::with_parity;
    use crate::acars::crc;

    fn put_bytes(sync: &mut Synchronizer, bytes: &[u8]) {
        for &byte in bytes {
            for i in 0..8 {
                sync.put_bit(if byte & (1 << i) != 0 { 1.0 } else { -1.0 });
            }
        }
    }

    fn text(body: &[u8]) -> Vec<u8> {
        let mut text: Vec<u8> = body.iter().map(|&byte| with_parity(byte)).collect();
        text.push(ETX);
        text
    }

    fn transmission(text: &[u8]) -> Vec<u8> {
        let mut bytes = vec![0xff, 0xff, 0x2b, 0x2a, SYN, SYN, SOH];
        bytes.extend_from_slice(text);
        bytes.extend_from_slice(&crc::checksum(text));
        bytes.push(DEL);
        bytes
    }

    fn synchronizer(realtime: bool) -> (Synchronizer, Arc<FrameQueue>) {
        let queue = Arc::new(FrameQueue::new());
        (Synchronizer::new(2, queue.clone(), realtime, 106.0), queue)
    }

    #[test]
    fn test_frame() {
        let (mut sync, queue) = synchronizer(true);
        let text = text(b"2.N12345\x155Z1");

        put_bytes(&mut sync, &transmission(&text));

        let frame = queue.try_pop().unwrap();
        assert_eq!(frame.channel, 2);
        assert_eq!(frame.text, text);
        assert_eq!(frame.crc, crc::checksum(&text));
        assert!(frame.date_time.is_some());
        assert_eq!(frame.level, 106.0);
        assert!(queue.is_empty());
        assert_eq!(sync.stats().frames, 1);
        assert_eq!(sync.stage(), FrameStage::AwaitSync);
    }

    #[test]
    fn test_bit_alignment() {
        let (mut sync, queue) = synchronizer(false);
        let text = text(b"2.N12345\x155Z1");

        // Three stray bits shift the byte boundaries of everything that follows
        sync.put_bit(1.0);
        sync.put_bit(-1.0);
        sync.put_bit(1.0);
        put_bytes(&mut sync, &transmission(&text));

        let frame = queue.try_pop().unwrap();
        assert_eq!(frame.text, text);
        assert!(frame.date_time.is_none());
    }

    #[test]
    fn test_back_to_back_frames() {
        let (mut sync, queue) = synchronizer(false);
        let first = text(b"2.N12345\x155Z1");
        let second = text(b"2.F-GHQJ\x06H\x7fA");

        let mut bytes = transmission(&first);
        bytes.extend_from_slice(&transmission(&second));
        put_bytes(&mut sync, &bytes);

        assert_eq!(queue.pop().text, first);
        assert_eq!(queue.pop().text, second);
    }

    #[test]
    fn test_etb() {
        let (mut sync, queue) = synchronizer(false);
        let mut text = text(b"2.N12345\x155Z1\x02M01A");
        *text.last_mut().unwrap() = ETB;

        put_bytes(&mut sync, &transmission(&text));
        assert_eq!(queue.pop().text, text);
    }

    #[test]
    fn test_carrier_level() {
        let (mut sync, queue) = synchronizer(false);
        sync.set_carrier(0.1);
        put_bytes(&mut sync, &transmission(&text(b"2.N12345\x155Z1")));
        assert!((queue.pop().level - 86.0).abs() < 1e-3);
    }

    #[test]
    fn test_inverted_preamble() {
        let (mut sync, queue) = synchronizer(false);

        put_bytes(&mut sync, &[0xff, !SYN]);
        assert_eq!(sync.stage(), FrameStage::SyncConfirmed);
        assert!(sync.inverted());
        assert!(sync.polarity_flipped());
        assert!(!sync.polarity_flipped());

        put_bytes(&mut sync, &[SYN, SOH]);
        assert_eq!(sync.stage(), FrameStage::Text);
        assert_eq!(sync.stats().polarity_flips, 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_missing_soh() {
        let (mut sync, queue) = synchronizer(false);
        put_bytes(&mut sync, &[SYN, SYN, 0x55]);
        assert_eq!(sync.stage(), FrameStage::AwaitSync);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_overrun() {
        let (mut sync, queue) = synchronizer(false);

        let mut bytes = vec![SYN, SYN, SOH];
        bytes.extend(std::iter::repeat(with_parity(b'A')).take(MAX_FRAME_LEN + 1));
        put_bytes(&mut sync, &bytes);

        assert_eq!(sync.stats().overruns, 1);
        assert_ne!(sync.stage(), FrameStage::Text);
        assert!(queue.is_empty());

        // The channel still locks on the next frame
        let text = text(b"2.N12345\x155Z1");
        put_bytes(&mut sync, &transmission(&text));
        assert_eq!(queue.pop().text, text);
    }

    #[test]
    fn test_missed_end() {
        let (mut sync, queue) = synchronizer(false);

        let mut text = text(b"2.N12345\x155Z1\x02M01AAB1234HELLO");
        let crc = crc::checksum(&text);
        // End marker damaged into an ordinary character
        *text.last_mut().unwrap() = with_parity(b'#');

        let mut bytes = vec![SYN, SYN, SOH];
        bytes.extend_from_slice(&text);
        bytes.extend_from_slice(&crc);
        bytes.push(DEL);
        put_bytes(&mut sync, &bytes);

        let frame = queue.pop();
        assert_eq!(frame.text, text);
        assert_eq!(frame.crc, crc);
        assert_eq!(sync.stats().missed_ends, 1);
        assert_eq!(sync.stage(), FrameStage::InterFrameGap);
    }
}
