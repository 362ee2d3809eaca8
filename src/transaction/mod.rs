//! Request/response state machine for the framed protocol.
//!
//! A [`Transaction`] sends one request frame and reads back exactly one
//! response: first the fixed 64-byte header block, then, if the header
//! declares an extended payload, the remaining bytes in a second blocking
//! read. Queries return the response data; commands request an
//! acknowledgement and return whether it arrived.
//!
//! Query failures are asymmetric: a response whose header parses but names a
//! different message type is a [`ProtocolError::TypeMismatch`], while a
//! response whose header does not parse at all, or which carries the nack
//! flag, is reported as "no data" (`Ok(None)`). Some firmware answers queries
//! for optional hardware with deliberately malformed frames.

pub mod errors;

use tracing::{debug, warn};

pub use errors::ProtocolError;

use crate::{
    message::{
        HEADER_BLOCK_LEN,
        MAX_IMMEDIATE_LEN,
        Message,
        MessageFlags,
        MessageType,
        PROTOCOL_VERSION,
    },
    transfer::TransferHelper,
};

/// One request/response exchange over a transfer helper.
pub struct Transaction<'a> {
    helper: &'a mut dyn TransferHelper,
    protocol_version: u16,
}

impl<'a> Transaction<'a> {
    /// Create a transaction over `helper` using [`PROTOCOL_VERSION`].
    #[must_use]
    pub fn new(helper: &'a mut dyn TransferHelper) -> Self {
        Self {
            helper,
            protocol_version: PROTOCOL_VERSION,
        }
    }

    /// Override the protocol version stamped on the request.
    #[must_use]
    pub const fn with_protocol_version(mut self, version: u16) -> Self {
        self.protocol_version = version;
        self
    }

    /// Build a request, carrying `payload` inline when it fits in the
    /// immediate slot.
    fn build_request(
        &self,
        message_type: MessageType,
        payload: &[u8],
        flags: MessageFlags,
    ) -> Result<Message, ProtocolError> {
        let mut request = Message::new(message_type);
        request.set_protocol_version(self.protocol_version);
        request.set_flags(flags);
        if payload.len() <= MAX_IMMEDIATE_LEN {
            request.set_immediate_data(payload);
        } else {
            request.set_payload(payload.to_vec())?;
        }
        Ok(request)
    }

    fn send_request(&mut self, request: &Message) -> Result<(), ProtocolError> {
        let bytes = request.to_bytes();
        debug!(
            message_type = %request.message_type(),
            bytes = bytes.len(),
            "sending request"
        );
        self.helper.send_all(&bytes)?;
        Ok(())
    }

    fn read_header_block(&mut self) -> Result<Vec<u8>, ProtocolError> {
        Ok(self.helper.receive_exact(HEADER_BLOCK_LEN)?)
    }

    /// Send a query and return the response data.
    ///
    /// Returns `Ok(None)` when the response header cannot be parsed or the
    /// device nacks the request.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Transport`] if bytes cannot be moved,
    /// [`ProtocolError::TypeMismatch`] if the response answers a different
    /// request, and [`ProtocolError::Framing`] if the full frame is malformed.
    pub fn query(
        &mut self,
        message_type: MessageType,
        payload: &[u8],
    ) -> Result<Option<Vec<u8>>, ProtocolError> {
        let request = self.build_request(message_type, payload, MessageFlags::empty())?;
        self.send_request(&request)?;

        let mut frame = self.read_header_block()?;
        let header = match Message::parse_header(&frame) {
            Ok(header) => header,
            Err(error) => {
                warn!(%message_type, %error, "unparseable query response; returning no data");
                return Ok(None);
            }
        };
        if header.message_type() != message_type {
            return Err(ProtocolError::TypeMismatch {
                expected: message_type,
                actual: header.message_type(),
            });
        }
        if header.is_nack() {
            warn!(
                %message_type,
                errno = header.error_number(),
                "query rejected by device; returning no data"
            );
            return Ok(None);
        }

        let remaining = header.extended_payload_len();
        debug!(
            %message_type,
            bytes_remaining = header.bytes_remaining(),
            "received response header"
        );
        if remaining > 0 {
            let rest = self.helper.receive_exact(remaining)?;
            frame.extend_from_slice(&rest);
        }
        let response = Message::parse(&frame)?;
        Ok(Some(response.into_data()))
    }

    /// Send a command with the ack-requested flag and report whether the
    /// device acknowledged it.
    ///
    /// A nack or a response for a different message type yields `Ok(false)`;
    /// some commands legitimately fail, for example when probing for
    /// optional hardware.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Transport`] if bytes cannot be moved,
    /// [`ProtocolError::Framing`] if the response header is malformed, and
    /// [`ProtocolError::MissingAck`] if it carries neither ack nor nack.
    pub fn command(
        &mut self,
        message_type: MessageType,
        payload: &[u8],
    ) -> Result<bool, ProtocolError> {
        let request = self.build_request(message_type, payload, MessageFlags::ACK_REQUESTED)?;
        self.send_request(&request)?;

        let block = self.read_header_block()?;
        let response = Message::parse_header(&block)?;
        if response.is_nack() {
            warn!(
                %message_type,
                errno = response.error_number(),
                "command rejected by device"
            );
            return Ok(false);
        }
        if response.message_type() != message_type {
            warn!(
                %message_type,
                actual = %response.message_type(),
                "command acknowledged for a different message type"
            );
            return Ok(false);
        }
        if response.is_ack() {
            debug!(%message_type, "command acknowledged");
            return Ok(true);
        }
        Err(ProtocolError::MissingAck(message_type))
    }
}

/// Send a query over `helper`; see [`Transaction::query`].
///
/// # Errors
/// Propagates the errors of [`Transaction::query`].
pub fn query_device(
    helper: &mut dyn TransferHelper,
    message_type: MessageType,
    payload: &[u8],
) -> Result<Option<Vec<u8>>, ProtocolError> {
    Transaction::new(helper).query(message_type, payload)
}

/// Send a command over `helper`; see [`Transaction::command`].
///
/// # Errors
/// Propagates the errors of [`Transaction::command`].
pub fn send_command_to_device(
    helper: &mut dyn TransferHelper,
    message_type: MessageType,
    payload: &[u8],
) -> Result<bool, ProtocolError> {
    Transaction::new(helper).command(message_type, payload)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rstest::rstest;

    use super::*;
    use crate::{
        message::{FOOTER, HEADER_LEN, MAGIC},
        test_helpers::{
            ScriptedEndpoints,
            ScriptedTransport,
            nack_frame,
            response_frame,
            tracing::capture_events,
        },
        transfer::{TransferError, UsbTransferHelper},
    };

    #[test]
    fn query_returns_immediate_data() {
        let transport = ScriptedTransport::default();
        transport.push_read(response_frame(MessageType::GetTecTemperature, &[0, 0, 0x20, 0x41]));
        let mut helper = transport.clone();

        let data = query_device(&mut helper, MessageType::GetTecTemperature, &[])
            .expect("query")
            .expect("data");
        assert_eq!(data, vec![0, 0, 0x20, 0x41]);

        let request = transport.written();
        assert_eq!(request.len(), HEADER_BLOCK_LEN);
        assert_eq!(&request[..2], &MAGIC);
        assert_eq!(&request[8..12], &[0x04, 0x00, 0x42, 0x00]);
        assert_eq!(&request[60..], &FOOTER);
    }

    #[test]
    fn query_reads_extended_payload_in_a_second_read() {
        let transport = ScriptedTransport::default();
        let frame = response_frame(MessageType::GetSerialNumber, b"SN-0000000000000001");
        assert_eq!(frame.len(), HEADER_BLOCK_LEN + 19);
        transport.push_read(frame);
        let mut helper = transport.clone();

        let data = query_device(&mut helper, MessageType::GetSerialNumber, &[])
            .expect("query")
            .expect("data");
        assert_eq!(data, b"SN-0000000000000001");
        assert_eq!(transport.read_sizes(), vec![HEADER_BLOCK_LEN, 19]);
    }

    #[test]
    fn long_request_payload_goes_in_extended_payload() {
        let transport = ScriptedTransport::default();
        transport.push_read(response_frame(MessageType::GetUserString, &[]));
        let mut helper = transport.clone();
        let payload = [0x55u8; 24];

        query_device(&mut helper, MessageType::GetUserString, &payload).expect("query");
        let request = Message::parse(&transport.written()).expect("request parses");
        assert!(request.immediate_data().is_empty());
        assert_eq!(request.payload(), &payload);
        assert_eq!(request.bytes_remaining(), 44);
        assert_eq!(transport.written().len(), HEADER_LEN + 24 + 20);
    }

    #[test]
    fn mismatched_response_type_is_an_error() {
        let transport = ScriptedTransport::default();
        transport.push_read(response_frame(MessageType::GetTemperature, &[1, 2, 3, 4]));
        let mut helper = transport.clone();

        let err = query_device(&mut helper, MessageType::GetTecTemperature, &[])
            .expect_err("mismatch");
        match err {
            ProtocolError::TypeMismatch { expected, actual } => {
                assert_eq!(expected.code(), 0x0042_0004);
                assert_eq!(actual.code(), 0x0040_0001);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn garbled_response_is_no_data() {
        let transport = ScriptedTransport::default();
        transport.push_read(vec![0xFF; HEADER_BLOCK_LEN]);
        let mut helper = transport.clone();

        let events = capture_events(|| {
            let result = query_device(&mut helper, MessageType::GetTecTemperature, &[]);
            assert!(matches!(result, Ok(None)));
        });
        assert!(events.iter().any(|e| e.level() == tracing::Level::WARN));
    }

    #[test]
    fn nacked_query_is_no_data() {
        let transport = ScriptedTransport::default();
        transport.push_read(nack_frame(MessageType::GetLightSourceEnable, 3));
        let mut helper = transport.clone();
        let result = query_device(&mut helper, MessageType::GetLightSourceEnable, &[0, 0]);
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn bad_footer_after_payload_is_a_framing_error() {
        let transport = ScriptedTransport::default();
        let mut frame = response_frame(MessageType::GetSerialNumber, &[b'x'; 20]);
        let last = frame.len() - 1;
        frame[last] = 0;
        transport.push_read(frame);
        let mut helper = transport.clone();

        let err = query_device(&mut helper, MessageType::GetSerialNumber, &[]).expect_err("footer");
        assert!(matches!(err, ProtocolError::Framing(_)));
    }

    #[test]
    fn transport_failure_is_distinct() {
        let mut helper = ScriptedTransport::default();
        let err = query_device(&mut helper, MessageType::GetSerialNumber, &[]).expect_err("eof");
        assert!(matches!(err, ProtocolError::Transport(TransferError::Closed)));
    }

    #[rstest]
    #[case::inside_header(40)]
    #[case::inside_immediate_data(50)]
    fn short_header_read_is_a_transport_error(#[case] delivered: usize) {
        let frame = response_frame(MessageType::GetTecTemperature, &[0, 0, 0x20, 0x41]);
        let endpoints = Arc::new(ScriptedEndpoints::default());
        endpoints.push_read(0x81, frame.get(..delivered).expect("prefix").to_vec());
        let mut helper = UsbTransferHelper::new(Arc::clone(&endpoints), 0x01, 0x81);

        let err = query_device(&mut helper, MessageType::GetTecTemperature, &[])
            .expect_err("short read");
        assert!(matches!(
            err,
            ProtocolError::Transport(TransferError::ShortTransfer { expected: 64, actual })
                if actual == delivered
        ));
    }

    #[test]
    fn short_command_reply_is_a_transport_error() {
        let transport = ScriptedTransport::default();
        let reply = response_frame(MessageType::SetTecEnable, &[]);
        transport.push_read(reply.get(..HEADER_LEN).expect("prefix"));
        let mut helper = transport.clone();

        let err = send_command_to_device(&mut helper, MessageType::SetTecEnable, &[1])
            .expect_err("short read");
        assert!(matches!(
            err,
            ProtocolError::Transport(TransferError::ShortTransfer { expected: 64, actual: 44 })
        ));
    }

    #[test]
    fn command_sets_ack_requested() {
        let transport = ScriptedTransport::default();
        transport.push_read(response_frame(MessageType::SetIntegrationTimeMicros, &[]));
        let mut helper = transport.clone();

        let acked = send_command_to_device(
            &mut helper,
            MessageType::SetIntegrationTimeMicros,
            &100_000u32.to_le_bytes(),
        )
        .expect("command");
        assert!(acked);
        let request = Message::parse(&transport.written()).expect("request parses");
        assert!(request.flags().contains(MessageFlags::ACK_REQUESTED));
        assert_eq!(request.immediate_data(), &100_000u32.to_le_bytes());
    }

    #[rstest]
    #[case::nack(nack_frame(MessageType::SetTecEnable, 1))]
    #[case::wrong_type(response_frame(MessageType::SetTecSetpoint, &[]))]
    fn command_failures_are_false(#[case] reply: Vec<u8>) {
        let transport = ScriptedTransport::default();
        transport.push_read(reply);
        let mut helper = transport.clone();
        let acked = send_command_to_device(&mut helper, MessageType::SetTecEnable, &[1])
            .expect("command");
        assert!(!acked);
    }

    #[test]
    fn command_without_ack_or_nack_is_an_error() {
        let transport = ScriptedTransport::default();
        let mut reply = Message::new(MessageType::SetTecEnable);
        reply.set_flags(MessageFlags::RESPONSE);
        transport.push_read(reply.to_bytes());
        let mut helper = transport.clone();
        let err = send_command_to_device(&mut helper, MessageType::SetTecEnable, &[1])
            .expect_err("missing ack");
        assert!(matches!(err, ProtocolError::MissingAck(MessageType::SetTecEnable)));
    }

    #[test]
    fn malformed_command_response_is_a_framing_error() {
        let transport = ScriptedTransport::default();
        transport.push_read(vec![0u8; HEADER_BLOCK_LEN]);
        let mut helper = transport.clone();
        let err = send_command_to_device(&mut helper, MessageType::SetTecEnable, &[1])
            .expect_err("framing");
        assert!(matches!(err, ProtocolError::Framing(_)));
    }
}
