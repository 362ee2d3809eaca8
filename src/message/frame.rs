//! Frame-level encoding and decoding.
//!
//! [`Message`] is built fresh for every request and parsed fresh from every
//! response; it is never reused across transactions. Numeric fields are
//! assembled byte-by-byte in little-endian order regardless of the host.

#![expect(clippy::little_endian_bytes, reason = "wire format is little-endian")]

use super::{
    CHECKSUM_LEN,
    FOOTER,
    HEADER_LEN,
    MAGIC,
    MAX_IMMEDIATE_LEN,
    MAX_PAYLOAD_LEN,
    MessageFlags,
    MessageType,
    PROTOCOL_VERSION,
    TRAILER_LEN,
    errors::FramingError,
};

const VERSION_OFFSET: usize = 2;
const FLAGS_OFFSET: usize = 4;
const ERRNO_OFFSET: usize = 6;
const TYPE_OFFSET: usize = 8;
const REGARDING_OFFSET: usize = 12;
const RESERVED_LEN: usize = 6;
const CHECKSUM_TYPE_OFFSET: usize = 22;
const IMMEDIATE_LEN_OFFSET: usize = 23;
const IMMEDIATE_OFFSET: usize = 24;
const BYTES_REMAINING_OFFSET: usize = 40;

#[expect(clippy::cast_possible_truncation, reason = "constant is 20")]
const MIN_BYTES_REMAINING: u32 = TRAILER_LEN as u32;

/// Copy `N` bytes starting at `offset` out of `buf`.
fn field<const N: usize>(buf: &[u8], offset: usize) -> Result<[u8; N], FramingError> {
    buf.get(offset..offset + N)
        .and_then(|s| <[u8; N]>::try_from(s).ok())
        .ok_or(FramingError::ShortBuffer {
            needed: offset + N,
            available: buf.len(),
        })
}

fn read_u16(buf: &[u8], offset: usize) -> Result<u16, FramingError> {
    field::<2>(buf, offset).map(u16::from_le_bytes)
}

fn read_u32(buf: &[u8], offset: usize) -> Result<u32, FramingError> {
    field::<4>(buf, offset).map(u32::from_le_bytes)
}

fn slice(buf: &[u8], offset: usize, len: usize) -> Result<&[u8], FramingError> {
    buf.get(offset..offset + len)
        .ok_or(FramingError::ShortBuffer {
            needed: offset + len,
            available: buf.len(),
        })
}

/// One binary frame exchanged with a device.
///
/// Immediate data and extended payload are mutually exclusive: setting one
/// clears the other, and bytes-remaining is kept equal to the payload length
/// plus the checksum and footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    protocol_version: u16,
    flags: MessageFlags,
    error_number: u16,
    message_type: MessageType,
    regarding: u32,
    checksum_type: u8,
    immediate_data: Vec<u8>,
    payload: Vec<u8>,
    bytes_remaining: u32,
}

impl Message {
    /// Create an empty request frame for `message_type`.
    #[must_use]
    pub const fn new(message_type: MessageType) -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION,
            flags: MessageFlags::empty(),
            error_number: 0,
            message_type,
            regarding: 0,
            checksum_type: 0,
            immediate_data: Vec::new(),
            payload: Vec::new(),
            bytes_remaining: MIN_BYTES_REMAINING,
        }
    }

    /// Protocol version field.
    #[must_use]
    pub const fn protocol_version(&self) -> u16 { self.protocol_version }

    /// Override the protocol version field.
    pub const fn set_protocol_version(&mut self, version: u16) { self.protocol_version = version; }

    /// Flag word.
    #[must_use]
    pub const fn flags(&self) -> MessageFlags { self.flags }

    /// Replace the flag word.
    pub const fn set_flags(&mut self, flags: MessageFlags) { self.flags = flags; }

    /// Error number reported by the device (zero on success).
    #[must_use]
    pub const fn error_number(&self) -> u16 { self.error_number }

    /// Set the error number field.
    pub const fn set_error_number(&mut self, errno: u16) { self.error_number = errno; }

    /// Message-type opcode.
    #[must_use]
    pub const fn message_type(&self) -> MessageType { self.message_type }

    /// Set the message-type opcode.
    pub const fn set_message_type(&mut self, message_type: MessageType) {
        self.message_type = message_type;
    }

    /// Correlation id the frame refers to.
    #[must_use]
    pub const fn regarding(&self) -> u32 { self.regarding }

    /// Set the correlation id.
    pub const fn set_regarding(&mut self, regarding: u32) { self.regarding = regarding; }

    /// Checksum type byte; carried but never acted on.
    #[must_use]
    pub const fn checksum_type(&self) -> u8 { self.checksum_type }

    /// Set the checksum type byte.
    pub const fn set_checksum_type(&mut self, checksum_type: u8) {
        self.checksum_type = checksum_type;
    }

    /// Inline immediate data (at most 16 bytes).
    #[must_use]
    pub fn immediate_data(&self) -> &[u8] { &self.immediate_data }

    /// Store `data` inline, dropping anything beyond 16 bytes.
    ///
    /// Clears the extended payload.
    pub fn set_immediate_data(&mut self, data: &[u8]) {
        let len = data.len().min(MAX_IMMEDIATE_LEN);
        self.immediate_data = data.get(..len).unwrap_or_default().to_vec();
        self.payload.clear();
        self.bytes_remaining = MIN_BYTES_REMAINING;
    }

    /// Extended payload following the header.
    #[must_use]
    pub fn payload(&self) -> &[u8] { &self.payload }

    /// Store an extended payload and update bytes-remaining.
    ///
    /// Clears immediate data.
    ///
    /// # Errors
    /// Returns [`FramingError::PayloadTooLarge`] if the payload exceeds
    /// [`MAX_PAYLOAD_LEN`].
    pub fn set_payload(&mut self, payload: Vec<u8>) -> Result<(), FramingError> {
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(FramingError::PayloadTooLarge(payload.len()));
        }
        let remaining = u32::try_from(payload.len() + TRAILER_LEN)
            .map_err(|_| FramingError::PayloadTooLarge(payload.len()))?;
        self.immediate_data.clear();
        self.payload = payload;
        self.bytes_remaining = remaining;
        Ok(())
    }

    /// Bytes following the 44-byte header: payload, checksum and footer.
    #[must_use]
    pub const fn bytes_remaining(&self) -> u32 { self.bytes_remaining }

    /// Length of the extended payload implied by bytes-remaining.
    #[must_use]
    pub const fn extended_payload_len(&self) -> usize {
        (self.bytes_remaining - MIN_BYTES_REMAINING) as usize
    }

    /// Whether the device acknowledged the request.
    #[must_use]
    pub const fn is_ack(&self) -> bool { self.flags.is_ack() }

    /// Whether the device rejected the request.
    #[must_use]
    pub const fn is_nack(&self) -> bool { self.flags.is_nack() }

    /// Response data: the immediate bytes when present, else the payload.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        if self.immediate_data.is_empty() {
            &self.payload
        } else {
            &self.immediate_data
        }
    }

    /// Consume the frame, returning its response data.
    #[must_use]
    pub fn into_data(self) -> Vec<u8> {
        if self.immediate_data.is_empty() {
            self.payload
        } else {
            self.immediate_data
        }
    }

    /// Parse the fixed 44-byte header, leaving the payload unset.
    ///
    /// # Errors
    /// Returns a [`FramingError`] if the magic is wrong, the buffer is too
    /// short, or bytes-remaining cannot cover the checksum and footer.
    pub fn parse_header(buf: &[u8]) -> Result<Self, FramingError> {
        let magic = field::<2>(buf, 0)?;
        if magic != MAGIC {
            return Err(FramingError::BadMagic(magic));
        }
        if buf.len() < HEADER_LEN {
            return Err(FramingError::ShortBuffer {
                needed: HEADER_LEN,
                available: buf.len(),
            });
        }
        let [checksum_type] = field::<1>(buf, CHECKSUM_TYPE_OFFSET)?;
        let [declared_len] = field::<1>(buf, IMMEDIATE_LEN_OFFSET)?;
        let immediate_len = usize::from(declared_len).min(MAX_IMMEDIATE_LEN);
        let bytes_remaining = read_u32(buf, BYTES_REMAINING_OFFSET)?;
        if bytes_remaining < MIN_BYTES_REMAINING {
            return Err(FramingError::BytesRemainingTooSmall(bytes_remaining));
        }
        let payload_len = (bytes_remaining - MIN_BYTES_REMAINING) as usize;
        if payload_len > MAX_PAYLOAD_LEN {
            return Err(FramingError::PayloadTooLarge(payload_len));
        }
        Ok(Self {
            protocol_version: read_u16(buf, VERSION_OFFSET)?,
            flags: MessageFlags::from_bits_retain(read_u16(buf, FLAGS_OFFSET)?),
            error_number: read_u16(buf, ERRNO_OFFSET)?,
            message_type: MessageType::from(read_u32(buf, TYPE_OFFSET)?),
            regarding: read_u32(buf, REGARDING_OFFSET)?,
            checksum_type,
            immediate_data: slice(buf, IMMEDIATE_OFFSET, immediate_len)?.to_vec(),
            payload: Vec::new(),
            bytes_remaining,
        })
    }

    /// Parse a complete frame: header, payload, checksum and footer.
    ///
    /// The checksum bytes are skipped without verification.
    ///
    /// # Errors
    /// Returns a [`FramingError`] for any header error, a buffer shorter
    /// than the declared frame, or a footer mismatch.
    pub fn parse(buf: &[u8]) -> Result<Self, FramingError> {
        let mut msg = Self::parse_header(buf)?;
        let payload_len = msg.extended_payload_len();
        if payload_len > 0 {
            msg.payload = slice(buf, HEADER_LEN, payload_len)?.to_vec();
        }
        let footer_offset = HEADER_LEN + payload_len + CHECKSUM_LEN;
        let footer = field::<4>(buf, footer_offset)?;
        if footer != FOOTER {
            return Err(FramingError::BadFooter(footer));
        }
        Ok(msg)
    }

    /// Serialise the frame.
    ///
    /// Immediate data is zero-padded to 16 bytes; the checksum slot is
    /// always zero.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_LEN + self.payload.len() + TRAILER_LEN);
        buf.extend_from_slice(&MAGIC);
        buf.extend_from_slice(&self.protocol_version.to_le_bytes());
        buf.extend_from_slice(&self.flags.bits().to_le_bytes());
        buf.extend_from_slice(&self.error_number.to_le_bytes());
        buf.extend_from_slice(&self.message_type.code().to_le_bytes());
        buf.extend_from_slice(&self.regarding.to_le_bytes());
        buf.extend_from_slice(&[0u8; RESERVED_LEN]);
        buf.push(self.checksum_type);

        let mut immediate = [0u8; MAX_IMMEDIATE_LEN];
        let immediate_len = if self.payload.is_empty() {
            let len = self.immediate_data.len().min(MAX_IMMEDIATE_LEN);
            if let (Some(dst), Some(src)) =
                (immediate.get_mut(..len), self.immediate_data.get(..len))
            {
                dst.copy_from_slice(src);
            }
            len
        } else {
            0
        };
        buf.push(u8::try_from(immediate_len).unwrap_or(u8::MAX));
        buf.extend_from_slice(&immediate);

        #[expect(
            clippy::cast_possible_truncation,
            reason = "payload length is bounded by MAX_PAYLOAD_LEN"
        )]
        let remaining = (self.payload.len() + TRAILER_LEN) as u32;
        buf.extend_from_slice(&remaining.to_le_bytes());
        buf.extend_from_slice(&self.payload);
        buf.extend_from_slice(&[0u8; CHECKSUM_LEN]);
        buf.extend_from_slice(&FOOTER);
        buf
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rstest::rstest;

    use super::*;
    use crate::message::HEADER_BLOCK_LEN;

    fn header_block(bytes_remaining: u32) -> Vec<u8> {
        let mut msg = Message::new(MessageType::GetTemperature);
        msg.set_immediate_data(&[1, 2, 3, 4]);
        let mut bytes = msg.to_bytes();
        if let Some(dst) = bytes.get_mut(BYTES_REMAINING_OFFSET..BYTES_REMAINING_OFFSET + 4) {
            dst.copy_from_slice(&bytes_remaining.to_le_bytes());
        }
        bytes
    }

    #[test]
    fn empty_request_is_one_header_block() {
        let bytes = Message::new(MessageType::GetTecTemperature).to_bytes();
        assert_eq!(bytes.len(), HEADER_BLOCK_LEN);
        assert_eq!(&bytes[..2], &MAGIC);
        assert_eq!(&bytes[8..12], &[0x04, 0x00, 0x42, 0x00]);
        assert_eq!(&bytes[40..44], &[20, 0, 0, 0]);
        assert_eq!(&bytes[60..], &FOOTER);
    }

    #[test]
    fn immediate_data_is_clamped_to_sixteen_bytes() {
        let input: Vec<u8> = (0u8..20).collect();
        let mut msg = Message::new(MessageType::SetUserString);
        msg.set_immediate_data(&input);
        assert_eq!(msg.immediate_data(), &input[..16]);

        let decoded = Message::parse(&msg.to_bytes()).expect("decode");
        assert_eq!(decoded.immediate_data(), &input[..16]);
        assert!(!decoded.immediate_data().contains(&16));
    }

    #[test]
    fn setting_payload_clears_immediate_data() {
        let mut msg = Message::new(MessageType::SetDeviceAlias);
        msg.set_immediate_data(&[9, 9]);
        msg.set_payload(vec![1; 40]).expect("payload fits");
        assert!(msg.immediate_data().is_empty());
        assert_eq!(msg.bytes_remaining(), 60);

        msg.set_immediate_data(&[7]);
        assert!(msg.payload().is_empty());
        assert_eq!(msg.bytes_remaining(), 20);
    }

    #[test]
    fn oversized_payload_is_rejected() {
        let mut msg = Message::new(MessageType::SetIrradianceCalibration);
        let err = msg
            .set_payload(vec![0; MAX_PAYLOAD_LEN + 1])
            .expect_err("payload must be rejected");
        assert_eq!(err, FramingError::PayloadTooLarge(MAX_PAYLOAD_LEN + 1));
    }

    #[test]
    fn bad_magic_is_rejected() {
        let mut bytes = Message::new(MessageType::GetSerialNumber).to_bytes();
        bytes[0] = 0x00;
        assert_eq!(
            Message::parse_header(&bytes),
            Err(FramingError::BadMagic([0x00, 0xC0]))
        );
    }

    #[test]
    fn bad_footer_is_rejected() {
        let mut bytes = Message::new(MessageType::GetSerialNumber).to_bytes();
        let last = bytes.len() - 1;
        bytes[last] = 0xFF;
        assert_eq!(
            Message::parse(&bytes),
            Err(FramingError::BadFooter([0xC5, 0xC4, 0xC3, 0xFF]))
        );
    }

    #[rstest]
    #[case(0)]
    #[case(4)]
    #[case(19)]
    fn small_bytes_remaining_is_rejected(#[case] remaining: u32) {
        let bytes = header_block(remaining);
        assert_eq!(
            Message::parse_header(&bytes),
            Err(FramingError::BytesRemainingTooSmall(remaining))
        );
    }

    #[test]
    fn truncated_frame_is_rejected() {
        let mut msg = Message::new(MessageType::GetRawSpectrumNow);
        msg.set_payload(vec![0xAB; 32]).expect("payload fits");
        let bytes = msg.to_bytes();
        let err = Message::parse(&bytes[..bytes.len() - 8]).expect_err("must fail");
        assert!(matches!(err, FramingError::ShortBuffer { .. }));
    }

    #[test]
    fn header_parse_reports_remaining_payload() {
        let bytes = header_block(24);
        let header = Message::parse_header(&bytes).expect("header");
        assert_eq!(header.extended_payload_len(), 4);
        assert!(header.payload().is_empty());
        assert_eq!(header.immediate_data(), &[1, 2, 3, 4]);
    }

    fn message_strategy() -> impl Strategy<Value = Message> {
        (
            any::<u16>(),
            any::<u16>(),
            any::<u16>(),
            any::<u32>(),
            any::<u32>(),
            any::<u8>(),
            prop::option::of(prop::collection::vec(any::<u8>(), 0..=16)),
            prop::collection::vec(any::<u8>(), 1..512),
        )
            .prop_map(|(version, flags, errno, ty, regarding, ck, immediate, payload)| {
                let mut msg = Message::new(MessageType::from(ty));
                msg.set_protocol_version(version);
                msg.set_flags(MessageFlags::from_bits_retain(flags));
                msg.set_error_number(errno);
                msg.set_regarding(regarding);
                msg.set_checksum_type(ck);
                match immediate {
                    Some(data) => msg.set_immediate_data(&data),
                    None => msg.set_payload(payload).expect("payload fits"),
                }
                msg
            })
    }

    proptest! {
        /// Every field survives an encode/decode round trip.
        #[test]
        fn round_trip_preserves_fields(msg in message_strategy()) {
            let bytes = msg.to_bytes();
            prop_assert_eq!(bytes.len(), HEADER_BLOCK_LEN + msg.payload().len());
            let decoded = Message::parse(&bytes).expect("decode");
            prop_assert_eq!(decoded, msg);
        }

        /// bytes-remaining always tracks the payload length.
        #[test]
        fn bytes_remaining_tracks_payload(len in 0usize..2048) {
            let mut msg = Message::new(MessageType::GetBufferedSpectrum);
            msg.set_payload(vec![0; len]).expect("payload fits");
            prop_assert_eq!(msg.bytes_remaining() as usize, len + TRAILER_LEN);
        }
    }
}
