//! Transactions driven end to end through the concrete transfer helpers.

#![expect(clippy::little_endian_bytes, reason = "wire format is little-endian")]

use std::{
    io::{self, Cursor, Read, Write},
    sync::Arc,
};

use spectrolink::{
    legacy::{self, SPECTRUM_SYNC_BYTE},
    message::{HEADER_BLOCK_LEN, Message, MessageType},
    test_helpers::{ScriptedEndpoints, response_frame},
    transaction::{ProtocolError, Transaction, query_device},
    transfer::{
        PaddedTransferHelper,
        SplitReadTransferHelper,
        StreamTransferHelper,
        TransferError,
        UsbTransferHelper,
    },
};

const OUT: u8 = 0x01;
const IN: u8 = 0x81;

#[test]
fn word_aligned_device_reads_padded_remainder() {
    let serial = b"OFX0000123456789ABC";
    let frame = response_frame(MessageType::GetSerialNumber, serial);
    assert_eq!(frame.len(), HEADER_BLOCK_LEN + serial.len());

    let endpoints = Arc::new(ScriptedEndpoints::default());
    endpoints.push_read(IN, frame.get(..HEADER_BLOCK_LEN).expect("block").to_vec());
    let mut remainder = frame.get(HEADER_BLOCK_LEN..).expect("rest").to_vec();
    remainder.resize(20, 0);
    endpoints.push_read(IN, remainder);

    let mut helper = PaddedTransferHelper::new(UsbTransferHelper::new(Arc::clone(&endpoints), OUT, IN));
    let data = query_device(&mut helper, MessageType::GetSerialNumber, &[])
        .expect("query")
        .expect("data");
    assert_eq!(data, serial);

    let writes = endpoints.writes();
    let (endpoint, request) = writes.first().expect("request written");
    assert_eq!(*endpoint, OUT);
    assert_eq!(request.len(), HEADER_BLOCK_LEN);
}

#[test]
fn desynchronised_padding_surfaces_as_transport_error() {
    let endpoints = Arc::new(ScriptedEndpoints::default());
    endpoints.push_read(IN, vec![0xC1; 60]);
    let mut helper = PaddedTransferHelper::new(UsbTransferHelper::new(Arc::clone(&endpoints), OUT, IN));

    let err = query_device(&mut helper, MessageType::GetSerialNumber, &[]).expect_err("desync");
    assert!(matches!(
        err,
        ProtocolError::Transport(TransferError::PaddingDesync {
            requested: 64,
            actual: 60
        })
    ));
}

/// TCP-like stream that hands out its reply a few bytes at a time.
struct ChunkedStream {
    reply: Cursor<Vec<u8>>,
    chunk: usize,
    sent: Vec<u8>,
}

impl Read for ChunkedStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let limit = buf.len().min(self.chunk);
        self.reply.read(buf.get_mut(..limit).unwrap_or_default())
    }
}

impl Write for ChunkedStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.sent.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> { Ok(()) }
}

#[test]
fn stream_transport_reassembles_fragmented_reply() {
    let readings: Vec<u8> = [18.5f32, 19.0, 19.5, 20.0, 20.5]
        .iter()
        .flat_map(|r| r.to_le_bytes())
        .collect();
    let stream = ChunkedStream {
        reply: Cursor::new(response_frame(MessageType::GetAllTemperatures, &readings)),
        chunk: 7,
        sent: Vec::new(),
    };
    let mut helper = StreamTransferHelper::tcp(stream);

    let data = Transaction::new(&mut helper)
        .query(MessageType::GetAllTemperatures, &[])
        .expect("query")
        .expect("data");
    assert_eq!(data, readings);
    let request = Message::parse(&helper.get_ref().sent).expect("request parses");
    assert_eq!(request.message_type(), MessageType::GetAllTemperatures);
}

#[test]
fn closed_stream_is_a_transport_error() {
    let stream = ChunkedStream {
        reply: Cursor::new(Vec::new()),
        chunk: 64,
        sent: Vec::new(),
    };
    let mut helper = StreamTransferHelper::tcp(stream);
    let err = query_device(&mut helper, MessageType::GetSerialNumber, &[]).expect_err("closed");
    assert!(matches!(err, ProtocolError::Transport(TransferError::Closed)));
}

#[test]
fn legacy_spectrum_spans_both_endpoints() {
    const SECONDARY: u8 = 0x86;
    const PRIMARY: u8 = 0x82;
    let pixels: Vec<u16> = (0..2048).collect();
    let mut raw: Vec<u8> = pixels.iter().flat_map(|p| p.to_le_bytes()).collect();
    raw.push(SPECTRUM_SYNC_BYTE);

    let endpoints = Arc::new(ScriptedEndpoints::default());
    let (first, second) = raw.split_at(2048);
    endpoints.push_read(SECONDARY, first.to_vec());
    endpoints.push_read(PRIMARY, second.to_vec());
    let mut helper = SplitReadTransferHelper::new(Arc::clone(&endpoints), OUT, PRIMARY, SECONDARY);

    assert_eq!(legacy::read_spectrum(&mut helper, 2048).expect("spectrum"), pixels);
    assert_eq!(endpoints.writes(), vec![(OUT, vec![legacy::opcode::REQUEST_SPECTRUM])]);
}
