//! Plain old ACARS: frame synchronization, CRC error correction and message parsing.

pub mod channel;
pub mod common;
pub mod correct;
pub mod crc;
pub mod decoder;
pub mod frame;
pub mod message;
pub mod msk;
pub mod queue;
pub mod syndrome;

pub use self::channel::Channel;
pub use self::common::RawFrame;
pub use self::decoder::{decode, Decoder};
pub use self::message::Message;
pub use self::queue::FrameQueue;
