//! Acquisition control and raw spectrum reads.

#![expect(clippy::little_endian_bytes, reason = "wire format is little-endian")]

use super::{Command, Query, decode};
use crate::{identity::Hint, message::MessageType, transaction::ProtocolError};

/// Set the integration time.
#[derive(Debug, Clone, Copy)]
pub struct SetIntegrationTime {
    /// Integration time in microseconds.
    pub micros: u32,
}

impl Command for SetIntegrationTime {
    fn message_type(&self) -> MessageType { MessageType::SetIntegrationTimeMicros }

    fn payload(&self) -> Vec<u8> { self.micros.to_le_bytes().to_vec() }
}

/// Select how acquisitions are triggered.
#[derive(Debug, Clone, Copy)]
pub struct SetTriggerMode {
    /// Device-specific trigger mode number; 0 is free-running.
    pub mode: u8,
}

impl Command for SetTriggerMode {
    fn message_type(&self) -> MessageType { MessageType::SetTriggerMode }

    fn payload(&self) -> Vec<u8> { vec![self.mode] }
}

/// Acquire and read one unprocessed spectrum.
///
/// Runs on the spectrum channel; pixels are little-endian `u16` counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetRawSpectrum;

impl Query for GetRawSpectrum {
    type Output = Vec<u16>;

    fn message_type(&self) -> MessageType { MessageType::GetRawSpectrumNow }

    fn hint(&self) -> Hint { Hint::Spectrum }

    fn decode(&self, data: &[u8]) -> Result<Vec<u16>, ProtocolError> { Ok(decode::u16_list(data)) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bus::HelperBus,
        exchange::{command, query},
        identity::BusFamily,
        message::Message,
        test_helpers::{ScriptedTransport, response_frame},
    };

    #[test]
    fn integration_time_is_little_endian_micros() {
        let transport = ScriptedTransport::default();
        transport.push_read(response_frame(MessageType::SetIntegrationTimeMicros, &[]));
        let mut bus = HelperBus::single(BusFamily::Usb, transport.clone());

        assert!(command(&mut bus, &SetIntegrationTime { micros: 10_000 }).expect("command"));
        let request = Message::parse(&transport.written()).expect("request parses");
        assert_eq!(request.immediate_data(), &[0x10, 0x27, 0, 0]);
    }

    #[test]
    fn raw_spectrum_decodes_pixel_counts() {
        let pixels: Vec<u16> = (0..1024).map(|p| p * 3).collect();
        let data: Vec<u8> = pixels.iter().flat_map(|p| p.to_le_bytes()).collect();
        let transport = ScriptedTransport::default();
        transport.push_read(response_frame(MessageType::GetRawSpectrumNow, &data));
        let mut bus = HelperBus::single(BusFamily::Usb, transport);

        assert_eq!(query(&mut bus, &GetRawSpectrum).expect("spectrum"), pixels);
    }
}
