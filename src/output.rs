//! Delivery of decoded messages. Workers hand every accepted message to a `Sink`; how it is
//! displayed or stored is up to the sink. The usual sink is the sending half of a channel read by
//! an output thread.

use std::sync::mpsc;

use chrono::{DateTime, Utc};
use serde_derive::Serialize;

use crate::acars::message::Message;
use crate::error::{Error, Result};


/// A decoded message with its reception context
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reception {
    pub channel: usize,
    /// Capture time of the frame, absent when not decoding in real time
    pub date_time: Option<DateTime<Utc>>,
    pub message: Message,
}

pub trait Sink: Send + 'static {

    /// Called from the parser workers, once per accepted message
    fn deliver(&self, reception: Reception) -> Result<()>;
}

impl Sink for mpsc::Sender<Reception> {

    fn deliver(&self, reception: Reception) -> Result<()> {
        self.send(reception).map_err(|_| Error::SinkClosed)
    }
}
