//! Wire-level scenarios for the framed protocol codec.

#![expect(clippy::little_endian_bytes, reason = "wire format is little-endian")]

use proptest::prelude::*;
use rstest::rstest;
use spectrolink::message::{
    FOOTER,
    FramingError,
    HEADER_BLOCK_LEN,
    MAGIC,
    Message,
    MessageFlags,
    MessageType,
};

#[test]
fn tec_temperature_query_is_one_header_block() {
    let bytes = Message::new(MessageType::from(0x0042_0004)).to_bytes();
    assert_eq!(bytes.len(), 64);
    assert_eq!(bytes.get(..2), Some(MAGIC.as_slice()));
    assert_eq!(bytes.get(8..12), Some([0x04, 0x00, 0x42, 0x00].as_slice()));
    assert_eq!(bytes.get(60..), Some(FOOTER.as_slice()));
}

#[test]
fn bytes_remaining_of_24_means_a_68_byte_frame() {
    let mut response = Message::new(MessageType::GetTecTemperature);
    response.set_flags(MessageFlags::RESPONSE);
    response
        .set_payload(vec![0, 0, 0xC8, 0x41])
        .expect("small payload");
    let bytes = response.to_bytes();
    assert_eq!(bytes.len(), 68);
    assert_eq!(bytes.get(40..44), Some(24u32.to_le_bytes().as_slice()));

    let header = Message::parse_header(bytes.get(..HEADER_BLOCK_LEN).expect("header block"))
        .expect("header parses");
    assert_eq!(header.bytes_remaining(), 24);
    assert_eq!(header.extended_payload_len(), 4);
    assert_eq!(HEADER_BLOCK_LEN + header.extended_payload_len(), 68);

    let full = Message::parse(&bytes).expect("full frame parses");
    assert_eq!(full.payload(), &[0, 0, 0xC8, 0x41]);
}

#[test]
fn twenty_immediate_bytes_are_clamped_to_sixteen() {
    let input: Vec<u8> = (1..=20).collect();
    let mut msg = Message::new(MessageType::SetDeviceAlias);
    msg.set_immediate_data(&input);
    let decoded = Message::parse(&msg.to_bytes()).expect("parses");
    assert_eq!(decoded.immediate_data(), input.get(..16).expect("prefix"));
    assert_eq!(decoded.bytes_remaining(), 20);
}

#[rstest]
#[case::magic(0, 0x00)]
#[case::footer(63, 0x00)]
#[case::bytes_remaining(40, 19)]
fn corrupted_frames_never_parse(#[case] offset: usize, #[case] value: u8) {
    let mut bytes = Message::new(MessageType::GetSerialNumber).to_bytes();
    if let Some(byte) = bytes.get_mut(offset) {
        *byte = value;
    }
    let err = Message::parse(&bytes).expect_err("corrupted");
    assert!(matches!(
        err,
        FramingError::BadMagic(_) | FramingError::BadFooter(_) | FramingError::BytesRemainingTooSmall(19)
    ));
}

proptest! {
    #[test]
    fn payload_and_immediate_data_stay_exclusive(
        immediate in proptest::collection::vec(any::<u8>(), 0..32),
        payload in proptest::collection::vec(any::<u8>(), 1..256),
        payload_first in any::<bool>(),
    ) {
        let mut msg = Message::new(MessageType::GetUserString);
        if payload_first {
            msg.set_payload(payload.clone()).expect("payload");
            msg.set_immediate_data(&immediate);
            prop_assert!(msg.payload().is_empty());
            prop_assert_eq!(msg.bytes_remaining(), 20);
        } else {
            msg.set_immediate_data(&immediate);
            msg.set_payload(payload.clone()).expect("payload");
            prop_assert!(msg.immediate_data().is_empty());
            prop_assert_eq!(msg.bytes_remaining() as usize, payload.len() + 20);
        }
        let decoded = Message::parse(&msg.to_bytes()).expect("parses");
        prop_assert_eq!(decoded.data(), msg.data());
    }
}
