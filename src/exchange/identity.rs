//! Device identity: serial number, revisions and alias.

use super::{Command, Query, decode};
use crate::{message::MessageType, transaction::ProtocolError};

/// Read the serial number string.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetSerialNumber;

impl Query for GetSerialNumber {
    type Output = String;

    fn message_type(&self) -> MessageType { MessageType::GetSerialNumber }

    fn decode(&self, data: &[u8]) -> Result<String, ProtocolError> { Ok(decode::string(data)) }
}

/// Read the maximum serial number length.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetSerialNumberMaxLength;

impl Query for GetSerialNumberMaxLength {
    type Output = u8;

    fn message_type(&self) -> MessageType { MessageType::GetSerialNumberMaxLength }

    fn decode(&self, data: &[u8]) -> Result<u8, ProtocolError> { decode::u8_at(data, 0) }
}

/// Read the hardware revision byte.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetHardwareRevision;

impl Query for GetHardwareRevision {
    type Output = u8;

    fn message_type(&self) -> MessageType { MessageType::GetHardwareRevision }

    fn decode(&self, data: &[u8]) -> Result<u8, ProtocolError> { decode::u8_at(data, 0) }
}

/// Read the firmware revision word.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetFirmwareRevision;

impl Query for GetFirmwareRevision {
    type Output = u16;

    fn message_type(&self) -> MessageType { MessageType::GetFirmwareRevision }

    fn decode(&self, data: &[u8]) -> Result<u16, ProtocolError> { decode::u16_at(data, 0) }
}

/// Read the user-assigned alias.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetDeviceAlias;

impl Query for GetDeviceAlias {
    type Output = String;

    fn message_type(&self) -> MessageType { MessageType::GetDeviceAlias }

    fn decode(&self, data: &[u8]) -> Result<String, ProtocolError> { Ok(decode::string(data)) }
}

/// Store a new alias. Aliases longer than 16 bytes travel as an extended
/// payload.
#[derive(Debug, Clone)]
pub struct SetDeviceAlias {
    /// New alias.
    pub alias: String,
}

impl Command for SetDeviceAlias {
    fn message_type(&self) -> MessageType { MessageType::SetDeviceAlias }

    fn payload(&self) -> Vec<u8> { self.alias.as_bytes().to_vec() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bus::HelperBus,
        exchange::{command, query},
        identity::BusFamily,
        message::{HEADER_LEN, Message},
        test_helpers::{ScriptedTransport, response_frame},
    };

    #[test]
    fn serial_number_is_trimmed_at_nul() {
        let transport = ScriptedTransport::default();
        transport.push_read(response_frame(MessageType::GetSerialNumber, b"QEP01234\0\0\0\0"));
        let mut bus = HelperBus::single(BusFamily::Usb, transport);
        assert_eq!(query(&mut bus, &GetSerialNumber).expect("serial"), "QEP01234");
    }

    #[test]
    fn firmware_revision_is_little_endian() {
        let transport = ScriptedTransport::default();
        transport.push_read(response_frame(MessageType::GetFirmwareRevision, &[0x02, 0x01]));
        let mut bus = HelperBus::single(BusFamily::Usb, transport);
        assert_eq!(query(&mut bus, &GetFirmwareRevision).expect("revision"), 0x0102);
    }

    #[test]
    fn long_alias_uses_extended_payload() {
        let transport = ScriptedTransport::default();
        transport.push_read(response_frame(MessageType::SetDeviceAlias, &[]));
        let mut bus = HelperBus::single(BusFamily::Usb, transport.clone());
        let alias = "bench-spectrometer-02".to_owned();

        let acked = command(&mut bus, &SetDeviceAlias { alias: alias.clone() }).expect("alias");
        assert!(acked);
        let written = transport.written();
        assert_eq!(written.len(), HEADER_LEN + alias.len() + 20);
        let request = Message::parse(&written).expect("request parses");
        assert_eq!(request.payload(), alias.as_bytes());
    }
}
