//! ACARS message fields, read at fixed offsets from a validated frame whose parity bits were
//! already stripped.

use serde_derive::Serialize;

use crate::error::Rejection;

use super::common::{DEL, HEADER_LEN};

/// ETX once the parity bit is stripped
const ETX: u8 = 0x03;


#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub mode: char,
    pub address: String,
    pub ack: char,
    pub label: String,
    pub block_id: char,
    /// STX, or ETX when the message has no text
    pub start: u8,
    /// ETX or ETB
    pub end: u8,
    pub number: String,
    pub flight_id: String,
    pub text: String,
    /// Bits fixed by the CRC: 0, 1 or 2
    pub errors: u8,
    pub level: f32,
}

impl Message {

    /// Reads the fields of a frame. `text` has no parity bits and ends with the end marker.
    pub fn parse(text: &[u8], errors: u8, level: f32) -> Result<Message, Rejection> {

        let len = text.len();

        if len < HEADER_LEN {
            return Err(Rejection::TooShort { len });
        }

        let mut k = 0;

        let mode = text[k] as char;
        k += 1;

        let address = field(&text[k..k + 7]);
        k += 7;

        let ack = text[k] as char;
        k += 1;

        let mut label = String::with_capacity(2);
        label.push(text[k] as char);
        label.push(if text[k + 1] == DEL { 'd' } else { text[k + 1] as char });
        k += 2;

        let block_id = text[k] as char;
        k += 1;

        let start = text[k];
        k += 1;

        let end = text[len - 1];
        let mut number = String::new();
        let mut flight_id = String::new();
        let mut body = String::new();

        if start != ETX && k < len {

            // The end marker is not part of any field
            let rest = &text[k..len - 1];
            let (head, rest) = rest.split_at(rest.len().min(4));
            number = field(head);

            let (head, rest) = rest.split_at(rest.len().min(6));
            flight_id = field(head);

            body = field(rest);
        }

        Ok(Message {
            mode,
            address,
            ack,
            label,
            block_id,
            start,
            end,
            number,
            flight_id,
            text: body,
            errors,
            level,
        })
    }

    /// True when the message is the last block of a multi-block transmission
    pub fn is_last_block(&self) -> bool {
        self.end == ETX
    }

    pub fn has_text(&self) -> bool {
        self.start != ETX
    }
}

/// Text of a fixed field, which stops at the first NUL
fn field(bytes: &[u8]) -> String {
    bytes.iter().take_while(|&&byte| byte != 0).map(|&byte| byte as char).collect()
}
