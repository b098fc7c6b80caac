//! Decoder setup and parser workers.
//!
//! `Decoder::start` creates the frame queue shared by every channel and spawns one worker per
//! channel. Workers are not tied to a channel: each one takes the oldest captured frame, checks
//! and repairs it, parses it and hands the message to the sink. They run for the lifetime of the
//! process.

use std::sync::Arc;
use std::thread;

use log::{debug, info, warn};

use crate::config::Config;
use crate::error::{Rejection, Result};
use crate::output::{Reception, Sink};

use super::channel::Channel;
use super::common::RawFrame;
use super::correct::correct;
use super::message::Message;
use super::queue::FrameQueue;


pub struct Decoder {
    queue: Arc<FrameQueue>,
    workers: Vec<thread::JoinHandle<()>>,
}

impl Decoder {

    /// Spawns the workers and returns the channels to feed, one per configured channel
    pub fn start<S: Sink + Clone>(config: &Config, sink: S) -> Result<(Decoder, Vec<Channel>)> {

        config.validate()?;

        let queue = Arc::new(FrameQueue::new());
        let mut workers = Vec::with_capacity(config.channels);

        for index in 0..config.channels {

            let queue = queue.clone();
            let sink = sink.clone();

            let worker = thread::Builder::new()
                .name(format!("acars-worker-{}", index + 1))
                .spawn(move || Decoder::work(queue, sink))?;

            workers.push(worker);
        }

        let channels = (0..config.channels)
            .map(|index| Channel::new(index, queue.clone(), config))
            .collect();

        info!("ACARS decoder started with {} channel(s)", config.channels);

        Ok((Decoder { queue, workers }, channels))
    }

    pub fn queue(&self) -> &Arc<FrameQueue> {
        &self.queue
    }

    /// Blocks on the workers, which only return if one of them panics
    pub fn join(self) {

        for worker in self.workers {
            if worker.join().is_err() {
                warn!("ACARS worker terminated abnormally");
            }
        }
    }

    fn work<S: Sink>(queue: Arc<FrameQueue>, sink: S) {

        loop {

            let mut frame = queue.pop();

            match decode(&mut frame) {
                Ok(message) => {
                    let reception = Reception {
                        channel: frame.channel,
                        date_time: frame.date_time,
                        message,
                    };

                    if let Err(error) = sink.deliver(reception) {
                        warn!("#{} message dropped: {}", frame.channel + 1, error);
                    }
                },
                Err(rejection) => debug!("#{} frame rejected: {}", frame.channel + 1, rejection),
            }
        }
    }
}

/// Checks, repairs and parses one captured frame
pub fn decode(frame: &mut RawFrame) -> std::result::Result<Message, Rejection> {

    let errors = correct(frame)?;

    Message::parse(&frame.text, errors, frame.level)
}
