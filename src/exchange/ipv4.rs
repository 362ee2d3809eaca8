//! IPv4 configuration of a network interface.
//!
//! Addresses travel in network byte order (first octet first); netmasks
//! travel as a prefix length. Every request starts with the interface
//! index.

use std::{fmt, net::Ipv4Addr};

use super::{Command, Query, decode};
use crate::{message::MessageType, transaction::ProtocolError};

/// Longest valid IPv4 prefix.
pub const MAX_PREFIX_LEN: u8 = 32;

/// One static address and the length of its network prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Assignment {
    /// Interface address.
    pub address: Ipv4Addr,
    /// Netmask as a prefix length, `0..=32`.
    pub prefix_len: u8,
}

impl Ipv4Assignment {
    /// Netmask in dotted form; prefix lengths above 32 saturate.
    #[must_use]
    pub fn netmask(self) -> Ipv4Addr {
        let host_bits = u32::from(MAX_PREFIX_LEN.saturating_sub(self.prefix_len));
        Ipv4Addr::from(u32::MAX.checked_shl(host_bits).unwrap_or(0))
    }

    fn bytes(self) -> [u8; 5] {
        let [a, b, c, d] = self.address.octets();
        [a, b, c, d, self.prefix_len]
    }
}

impl fmt::Display for Ipv4Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix_len)
    }
}

fn address_at(data: &[u8], offset: usize) -> Result<Ipv4Addr, ProtocolError> {
    decode::array_at::<4>(data, offset).map(Ipv4Addr::from)
}

/// Read whether DHCP configures an interface.
#[derive(Debug, Clone, Copy)]
pub struct GetDhcpEnable {
    /// Interface index.
    pub interface: u8,
}

impl Query for GetDhcpEnable {
    type Output = bool;

    fn message_type(&self) -> MessageType { MessageType::GetIpv4DhcpEnable }

    fn payload(&self) -> Vec<u8> { vec![self.interface] }

    fn decode(&self, data: &[u8]) -> Result<bool, ProtocolError> { decode::bool_at(data, 0) }
}

/// Enable or disable DHCP on an interface.
#[derive(Debug, Clone, Copy)]
pub struct SetDhcpEnable {
    /// Interface index.
    pub interface: u8,
    /// Desired state.
    pub enable: bool,
}

impl Command for SetDhcpEnable {
    fn message_type(&self) -> MessageType { MessageType::SetIpv4DhcpEnable }

    fn payload(&self) -> Vec<u8> { vec![self.interface, u8::from(self.enable)] }
}

/// Read the number of static addresses on an interface.
#[derive(Debug, Clone, Copy)]
pub struct GetIpv4AddressCount {
    /// Interface index.
    pub interface: u8,
}

impl Query for GetIpv4AddressCount {
    type Output = u8;

    fn message_type(&self) -> MessageType { MessageType::GetIpv4AddressCount }

    fn payload(&self) -> Vec<u8> { vec![self.interface] }

    fn decode(&self, data: &[u8]) -> Result<u8, ProtocolError> { decode::u8_at(data, 0) }
}

/// Read one static address.
#[derive(Debug, Clone, Copy)]
pub struct GetIpv4Address {
    /// Interface index.
    pub interface: u8,
    /// Address index on the interface.
    pub index: u8,
}

impl Query for GetIpv4Address {
    type Output = Ipv4Assignment;

    fn message_type(&self) -> MessageType { MessageType::GetIpv4Address }

    fn payload(&self) -> Vec<u8> { vec![self.interface, self.index] }

    fn decode(&self, data: &[u8]) -> Result<Ipv4Assignment, ProtocolError> {
        Ok(Ipv4Assignment {
            address: address_at(data, 0)?,
            prefix_len: decode::u8_at(data, 4)?,
        })
    }
}

/// Add a static address to an interface.
#[derive(Debug, Clone, Copy)]
pub struct AddIpv4Address {
    /// Interface index.
    pub interface: u8,
    /// Address to add.
    pub assignment: Ipv4Assignment,
}

impl Command for AddIpv4Address {
    fn message_type(&self) -> MessageType { MessageType::AddIpv4Address }

    fn payload(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(6);
        payload.push(self.interface);
        payload.extend_from_slice(&self.assignment.bytes());
        payload
    }
}

/// Remove a static address from an interface.
#[derive(Debug, Clone, Copy)]
pub struct DeleteIpv4Address {
    /// Interface index.
    pub interface: u8,
    /// Address index on the interface.
    pub index: u8,
}

impl Command for DeleteIpv4Address {
    fn message_type(&self) -> MessageType { MessageType::DeleteIpv4Address }

    fn payload(&self) -> Vec<u8> { vec![self.interface, self.index] }
}

/// Read the default gateway of an interface.
#[derive(Debug, Clone, Copy)]
pub struct GetDefaultGateway {
    /// Interface index.
    pub interface: u8,
}

impl Query for GetDefaultGateway {
    type Output = Ipv4Addr;

    fn message_type(&self) -> MessageType { MessageType::GetIpv4DefaultGateway }

    fn payload(&self) -> Vec<u8> { vec![self.interface] }

    fn decode(&self, data: &[u8]) -> Result<Ipv4Addr, ProtocolError> { address_at(data, 0) }
}

/// Change the default gateway of an interface.
#[derive(Debug, Clone, Copy)]
pub struct SetDefaultGateway {
    /// Interface index.
    pub interface: u8,
    /// New gateway.
    pub gateway: Ipv4Addr,
}

impl Command for SetDefaultGateway {
    fn message_type(&self) -> MessageType { MessageType::SetIpv4DefaultGateway }

    fn payload(&self) -> Vec<u8> {
        let [a, b, c, d] = self.gateway.octets();
        vec![self.interface, a, b, c, d]
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(24, Ipv4Addr::new(255, 255, 255, 0))]
    #[case(16, Ipv4Addr::new(255, 255, 0, 0))]
    #[case(32, Ipv4Addr::BROADCAST)]
    #[case(0, Ipv4Addr::UNSPECIFIED)]
    fn prefix_length_maps_to_netmask(#[case] prefix_len: u8, #[case] netmask: Ipv4Addr) {
        let assignment = Ipv4Assignment {
            address: Ipv4Addr::new(10, 0, 0, 5),
            prefix_len,
        };
        assert_eq!(assignment.netmask(), netmask);
    }

    #[test]
    fn address_reply_carries_prefix_after_octets() {
        let assignment = GetIpv4Address {
            interface: 0,
            index: 1,
        }
        .decode(&[192, 168, 1, 20, 24])
        .expect("decode");
        assert_eq!(assignment.address, Ipv4Addr::new(192, 168, 1, 20));
        assert_eq!(assignment.to_string(), "192.168.1.20/24");
    }

    #[test]
    fn address_reply_without_prefix_is_too_short() {
        let err = GetIpv4Address {
            interface: 0,
            index: 0,
        }
        .decode(&[192, 168, 1, 20])
        .expect_err("short");
        assert!(matches!(
            err,
            ProtocolError::ResponseTooShort {
                expected: 5,
                actual: 4
            }
        ));
    }

    #[test]
    fn add_address_payload_is_interface_octets_prefix() {
        let payload = AddIpv4Address {
            interface: 2,
            assignment: Ipv4Assignment {
                address: Ipv4Addr::new(10, 1, 2, 3),
                prefix_len: 8,
            },
        }
        .payload();
        assert_eq!(payload, vec![2, 10, 1, 2, 3, 8]);
    }

    #[test]
    fn gateway_payload_is_network_order() {
        let payload = SetDefaultGateway {
            interface: 0,
            gateway: Ipv4Addr::new(192, 168, 0, 1),
        }
        .payload();
        assert_eq!(payload, vec![0, 192, 168, 0, 1]);
    }
}
