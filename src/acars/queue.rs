//! Hand-off of captured frames from the channels' bit paths to the parser workers.
//!
//! All channels push into the same queue and all workers pop from it, so frames are dequeued in
//! the order they were captured across every channel. Pushing never waits for a consumer.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use super::common::RawFrame;


#[derive(Debug, Default)]
pub struct FrameQueue {
    frames: Mutex<VecDeque<RawFrame>>,
    ready: Condvar,
}

impl FrameQueue {

    pub fn new() -> FrameQueue {
        FrameQueue::default()
    }

    /// Appends a frame and wakes one waiting worker
    pub fn push(&self, frame: RawFrame) {

        let mut frames = self.lock();
        frames.push_back(frame);
        drop(frames);

        self.ready.notify_one();
    }

    /// Removes the oldest frame, waiting for one if the queue is empty
    pub fn pop(&self) -> RawFrame {

        let mut frames = self.lock();

        loop {
            if let Some(frame) = frames.pop_front() {
                return frame;
            }
            frames = self.ready.wait(frames).unwrap_or_else(PoisonError::into_inner);
        }
    }

    pub fn try_pop(&self) -> Option<RawFrame> {
        self.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A worker that panicked while holding the lock leaves the queue itself consistent
    fn lock(&self) -> MutexGuard<'_, VecDeque<RawFrame>> {
        self.frames.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
