//! Error types shared by the decoder. `Error` covers the setup side (configuration, worker
//! threads, output sink) while `Rejection` names why a single frame was discarded.

use thiserror::Error;


/// Decoder setup and output errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {msg}")]
    InvalidConfig { msg: String },

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Unable to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Output sink disconnected")]
    SinkClosed,
}

/// Result type for decoder operations
pub type Result<T> = std::result::Result<T, Error>;


/// Reasons for discarding a frame. None of them is fatal: the worker logs the rejection and
/// moves on to the next frame.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("frame too short: {len} bytes")]
    TooShort { len: usize },

    #[error("too many parity errors: {count}")]
    Parity { count: usize },

    #[error("CRC error {syndrome:#06x} could not be corrected")]
    Uncorrectable { syndrome: u16 },

    #[error("parity error after correction: {count}")]
    ParityAfterRepair { count: usize },
}
