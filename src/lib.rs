//! ACARS decoder core. Each channel turns a stream of bit decisions (or amplitude samples, through
//! the MSK demodulator) into frames; a pool of workers checks them against parity and CRC, repairs
//! up to two bit errors, parses the message fields and hands the result to an output sink.
//!
//! ```no_run
//! use std::sync::mpsc;
//! use acarsrx::{Config, Decoder, Reception};
//!
//! let (tx, rx) = mpsc::channel::<Reception>();
//! let (_decoder, mut channels) = Decoder::start(&Config::default(), tx).unwrap();
//!
//! channels[0].process(&[0.0; 1024]);
//! for reception in rx.iter() {
//!     println!("{} {}", reception.message.address, reception.message.text);
//! }
//! ```

pub mod acars;
pub mod config;
pub mod error;
pub mod output;

pub use crate::acars::{Channel, Decoder, Message};
pub use crate::config::Config;
pub use crate::error::{Error, Rejection, Result};
pub use crate::output::{Reception, Sink};
