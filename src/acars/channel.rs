//! A receiving channel: the MSK demodulator and the frame synchronizer of one frequency.

use std::sync::Arc;

use log::info;

use crate::config::Config;

use super::frame::{SyncStats, Synchronizer};
use super::msk::Demod;
use super::queue::FrameQueue;


#[derive(Debug)]
pub struct Channel {
    index: usize,
    msk: Demod,
    sync: Synchronizer,
}

impl Channel {

    pub fn new(index: usize, queue: Arc<FrameQueue>, config: &Config) -> Channel {

        let msk = Demod::new(config.channel_rate);
        let sync = Synchronizer::new(index, queue, config.realtime, config.level_offset);

        info!(" - ACARS decoder channel #{} at {} samples/s", index + 1, config.channel_rate);

        Channel {
            index,
            msk,
            sync,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Demodulates a block of amplitude samples taken at the configured channel rate
    pub fn process(&mut self, samples: &[f64]) {
        self.msk.demodulate(samples, &mut self.sync);
    }

    /// Feeds one bit decision from an external demodulator, a positive value being a 1
    pub fn put_bit(&mut self, value: f64) {
        self.sync.put_bit(value);
    }

    /// Carrier magnitude reported with frames fed through `put_bit`
    pub fn set_carrier(&mut self, magnitude: f64) {
        self.sync.set_carrier(magnitude);
    }

    pub fn stats(&self) -> SyncStats {
        self.sync.stats()
    }
}
