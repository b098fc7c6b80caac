use std::sync::mpsc;
use std::time::Duration;

use acarsrx::acars::common::{with_parity, DEL, ETX, SOH, SYN};
use acarsrx::acars::crc;
use acarsrx::{Channel, Config, Decoder, Reception};

const NAK: u8 = 0x15;

fn text(body: &[u8]) -> Vec<u8> {
    let mut text: Vec<u8> = body.iter().map(|&byte| with_parity(byte)).collect();
    text.push(ETX);
    text
}

fn put_bytes(channel: &mut Channel, bytes: &[u8]) {
    for &byte in bytes {
        for i in 0..8 {
            channel.put_bit(if byte & (1 << i) != 0 { 0.7 } else { -0.7 });
        }
    }
}

fn transmit(channel: &mut Channel, text: &[u8], crc: [u8; 2]) {
    let mut bytes = vec![0xff, 0xff, 0x2b, 0x2a, SYN, SYN, SOH];
    bytes.extend_from_slice(text);
    bytes.extend_from_slice(&crc);
    bytes.push(DEL);
    put_bytes(channel, &bytes);
}

fn start(channels: usize) -> (Decoder, Vec<Channel>, mpsc::Receiver<Reception>) {
    let (tx, rx) = mpsc::channel();
    let config = Config { channels, realtime: false, ..Config::default() };
    let (decoder, channels) = Decoder::start(&config, tx).unwrap();
    (decoder, channels, rx)
}

fn receive(rx: &mpsc::Receiver<Reception>) -> Reception {
    rx.recv_timeout(Duration::from_secs(5)).unwrap()
}

fn no_text_frame() -> Vec<u8> {
    let mut body = b"2.N12345".to_vec();
    body.push(NAK);
    body.extend_from_slice(b"5Z1");
    text(&body)
}

#[test]
fn clean_no_text_frame() {
    let (_decoder, mut channels, rx) = start(1);
    let text = no_text_frame();

    transmit(&mut channels[0], &text, crc::checksum(&text));

    let reception = receive(&rx);
    let message = reception.message;
    assert_eq!(reception.channel, 0);
    assert!(reception.date_time.is_none());
    assert_eq!(message.mode, '2');
    assert_eq!(message.address, ".N12345");
    assert_eq!(message.ack, NAK as char);
    assert_eq!(message.label, "5Z");
    assert_eq!(message.block_id, '1');
    assert!(message.text.is_empty());
    assert!(message.flight_id.is_empty());
    assert_eq!(message.errors, 0);
    assert_eq!(channels[0].stats().frames, 1);
}

#[test]
fn single_error_in_address() {
    let (_decoder, mut channels, rx) = start(1);
    let text = no_text_frame();
    let crc = crc::checksum(&text);

    let mut damaged = text.clone();
    damaged[3] ^= 0x04;
    transmit(&mut channels[0], &damaged, crc);

    let message = receive(&rx).message;
    assert_eq!(message.address, ".N12345");
    assert_eq!(message.errors, 1);
}

#[test]
fn double_error_in_one_byte() {
    let (_decoder, mut channels, rx) = start(1);
    let text = text(b"2.N12345\x155Z1\x02M01AAB1234HELLO WORLD");
    let crc = crc::checksum(&text);

    let mut damaged = text.clone();
    damaged[4] ^= 0x11;
    transmit(&mut channels[0], &damaged, crc);

    let message = receive(&rx).message;
    assert_eq!(message.address, ".N12345");
    assert_eq!(message.number, "M01A");
    assert_eq!(message.flight_id, "AB1234");
    assert_eq!(message.text, "HELLO WORLD");
    assert_eq!(message.errors, 2);
}

#[test]
fn damaged_frames_are_not_delivered() {
    let (_decoder, mut channels, rx) = start(1);
    let text = text(b"2.N12345\x155Z1\x02M01AAB1234HELLO WORLD");
    let crc = crc::checksum(&text);

    let mut damaged = text.clone();
    damaged[5] ^= 0x01;
    damaged[20] ^= 0x01;
    transmit(&mut channels[0], &damaged, crc);
    transmit(&mut channels[0], &text, crc);

    let message = receive(&rx).message;
    assert_eq!(message.errors, 0);
    assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
    assert_eq!(channels[0].stats().frames, 2);
}

#[test]
fn del_label() {
    let (_decoder, mut channels, rx) = start(1);
    let text = text(b"2.F-GHQJ\x06H\x7fA");

    transmit(&mut channels[0], &text, crc::checksum(&text));

    assert_eq!(receive(&rx).message.label, "Hd");
}

#[test]
fn frames_from_every_channel() {
    let (_decoder, mut channels, rx) = start(3);

    for round in 0..4u8 {
        for channel in channels.iter_mut() {
            let body = format!("2.N1234{}\x155Z{}", channel.index(), round);
            let text = text(body.as_bytes());
            transmit(channel, &text, crc::checksum(&text));
        }
    }

    let mut received: Vec<(usize, String, char)> = (0..12)
        .map(|_| receive(&rx))
        .map(|reception| (reception.channel, reception.message.address, reception.message.block_id))
        .collect();
    received.sort();

    let mut expected = Vec::new();
    for channel in 0..3 {
        for round in 0..4u8 {
            expected.push((channel, format!(".N1234{}", channel), (b'0' + round) as char));
        }
    }
    assert_eq!(received, expected);
}
