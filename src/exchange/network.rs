//! Network interfaces and their Ethernet addresses.
//!
//! Every exchange except the interface count names the interface by its
//! zero-based index in the first payload byte.

use std::fmt;

use super::{Command, Query, decode};
use crate::{message::MessageType, transaction::ProtocolError};

/// Link type reported for a network interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkInterfaceKind {
    /// Loopback interface.
    Loopback,
    /// Wired Ethernet.
    WiredEthernet,
    /// Wireless LAN.
    Wifi,
    /// Ethernet emulated over USB (CDC).
    UsbEthernet,
    /// Any code not listed above.
    Other(u8),
}

impl From<u8> for NetworkInterfaceKind {
    fn from(code: u8) -> Self {
        match code {
            0 => Self::Loopback,
            1 => Self::WiredEthernet,
            2 => Self::Wifi,
            3 => Self::UsbEthernet,
            other => Self::Other(other),
        }
    }
}

impl fmt::Display for NetworkInterfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loopback => f.write_str("loopback"),
            Self::WiredEthernet => f.write_str("ethernet"),
            Self::Wifi => f.write_str("wifi"),
            Self::UsbEthernet => f.write_str("usb-ethernet"),
            Self::Other(code) => write!(f, "unknown({code})"),
        }
    }
}

/// Six-byte Ethernet hardware address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacAddress(pub [u8; 6]);

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, octet) in self.0.iter().enumerate() {
            if position > 0 {
                f.write_str(":")?;
            }
            write!(f, "{octet:02x}")?;
        }
        Ok(())
    }
}

/// Read the number of network interfaces.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetNetworkInterfaceCount;

impl Query for GetNetworkInterfaceCount {
    type Output = u8;

    fn message_type(&self) -> MessageType { MessageType::GetNetworkInterfaceCount }

    fn decode(&self, data: &[u8]) -> Result<u8, ProtocolError> { decode::u8_at(data, 0) }
}

/// Read the link type of one interface.
#[derive(Debug, Clone, Copy)]
pub struct GetNetworkInterfaceType {
    /// Interface index.
    pub interface: u8,
}

impl Query for GetNetworkInterfaceType {
    type Output = NetworkInterfaceKind;

    fn message_type(&self) -> MessageType { MessageType::GetNetworkInterfaceType }

    fn payload(&self) -> Vec<u8> { vec![self.interface] }

    fn decode(&self, data: &[u8]) -> Result<NetworkInterfaceKind, ProtocolError> {
        decode::u8_at(data, 0).map(NetworkInterfaceKind::from)
    }
}

/// Read whether one interface is enabled.
#[derive(Debug, Clone, Copy)]
pub struct GetNetworkInterfaceEnable {
    /// Interface index.
    pub interface: u8,
}

impl Query for GetNetworkInterfaceEnable {
    type Output = bool;

    fn message_type(&self) -> MessageType { MessageType::GetNetworkInterfaceEnable }

    fn payload(&self) -> Vec<u8> { vec![self.interface] }

    fn decode(&self, data: &[u8]) -> Result<bool, ProtocolError> { decode::bool_at(data, 0) }
}

/// Run the self test of one interface; the reply is non-zero on a pass.
#[derive(Debug, Clone, Copy)]
pub struct RunNetworkInterfaceSelfTest {
    /// Interface index.
    pub interface: u8,
}

impl Query for RunNetworkInterfaceSelfTest {
    type Output = bool;

    fn message_type(&self) -> MessageType { MessageType::RunNetworkInterfaceSelfTest }

    fn payload(&self) -> Vec<u8> { vec![self.interface] }

    fn decode(&self, data: &[u8]) -> Result<bool, ProtocolError> { decode::bool_at(data, 0) }
}

/// Enable or disable one interface.
#[derive(Debug, Clone, Copy)]
pub struct SetNetworkInterfaceEnable {
    /// Interface index.
    pub interface: u8,
    /// Desired state.
    pub enable: bool,
}

impl Command for SetNetworkInterfaceEnable {
    fn message_type(&self) -> MessageType { MessageType::SetNetworkInterfaceEnable }

    fn payload(&self) -> Vec<u8> { vec![self.interface, u8::from(self.enable)] }
}

/// Persist the settings of one interface across power cycles.
#[derive(Debug, Clone, Copy)]
pub struct SaveNetworkInterfaceSettings {
    /// Interface index.
    pub interface: u8,
}

impl Command for SaveNetworkInterfaceSettings {
    fn message_type(&self) -> MessageType { MessageType::SaveNetworkInterfaceSettings }

    fn payload(&self) -> Vec<u8> { vec![self.interface] }
}

/// Read the MAC address of one interface.
#[derive(Debug, Clone, Copy)]
pub struct GetMacAddress {
    /// Interface index.
    pub interface: u8,
}

impl Query for GetMacAddress {
    type Output = MacAddress;

    fn message_type(&self) -> MessageType { MessageType::GetMacAddress }

    fn payload(&self) -> Vec<u8> { vec![self.interface] }

    fn decode(&self, data: &[u8]) -> Result<MacAddress, ProtocolError> {
        decode::array_at::<6>(data, 0).map(MacAddress)
    }
}

/// Change the MAC address of one interface.
#[derive(Debug, Clone, Copy)]
pub struct SetMacAddress {
    /// Interface index.
    pub interface: u8,
    /// New address.
    pub mac: MacAddress,
}

impl Command for SetMacAddress {
    fn message_type(&self) -> MessageType { MessageType::SetMacAddress }

    fn payload(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(7);
        payload.push(self.interface);
        payload.extend_from_slice(&self.mac.0);
        payload
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0, NetworkInterfaceKind::Loopback)]
    #[case(1, NetworkInterfaceKind::WiredEthernet)]
    #[case(3, NetworkInterfaceKind::UsbEthernet)]
    #[case(9, NetworkInterfaceKind::Other(9))]
    fn interface_kind_codes(#[case] code: u8, #[case] kind: NetworkInterfaceKind) {
        let decoded = GetNetworkInterfaceType { interface: 0 }
            .decode(&[code])
            .expect("decode");
        assert_eq!(decoded, kind);
    }

    #[test]
    fn mac_address_round_trips_through_payload_and_reply() {
        let mac = MacAddress([0x00, 0x1B, 0x2C, 0x3D, 0x4E, 0x5F]);
        let payload = SetMacAddress { interface: 1, mac }.payload();
        assert_eq!(payload, vec![1, 0x00, 0x1B, 0x2C, 0x3D, 0x4E, 0x5F]);

        let decoded = GetMacAddress { interface: 1 }
            .decode(payload.get(1..).expect("address bytes"))
            .expect("decode");
        assert_eq!(decoded, mac);
        assert_eq!(decoded.to_string(), "00:1b:2c:3d:4e:5f");
    }

    #[test]
    fn truncated_mac_reply_is_too_short() {
        let err = GetMacAddress { interface: 0 }
            .decode(&[1, 2, 3])
            .expect_err("short");
        assert!(matches!(
            err,
            ProtocolError::ResponseTooShort {
                expected: 6,
                actual: 3
            }
        ));
    }
}
