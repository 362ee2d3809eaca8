//! General-purpose I/O pins.
//!
//! Pin state travels as 32-bit vectors, one bit per pin. Writes carry a
//! mask selecting the pins to change.

#![expect(clippy::little_endian_bytes, reason = "wire format is little-endian")]

use super::{Command, Query, decode};
use crate::{message::MessageType, transaction::ProtocolError};

/// Read the number of GPIO pins.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetGpioPinCount;

impl Query for GetGpioPinCount {
    type Output = u8;

    fn message_type(&self) -> MessageType { MessageType::GetGpioPinCount }

    fn decode(&self, data: &[u8]) -> Result<u8, ProtocolError> { decode::u8_at(data, 0) }
}

/// Read the output-enable vector.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetGpioOutputEnable;

impl Query for GetGpioOutputEnable {
    type Output = u32;

    fn message_type(&self) -> MessageType { MessageType::GetGpioOutputEnable }

    fn decode(&self, data: &[u8]) -> Result<u32, ProtocolError> { decode::u32_at(data, 0) }
}

/// Read the pin value vector.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetGpioValue;

impl Query for GetGpioValue {
    type Output = u32;

    fn message_type(&self) -> MessageType { MessageType::GetGpioValue }

    fn decode(&self, data: &[u8]) -> Result<u32, ProtocolError> { decode::u32_at(data, 0) }
}

fn masked_payload(bits: u32, mask: u32) -> Vec<u8> {
    let mut payload = Vec::with_capacity(8);
    payload.extend_from_slice(&bits.to_le_bytes());
    payload.extend_from_slice(&mask.to_le_bytes());
    payload
}

/// Write output-enable bits for the pins selected by `mask`.
#[derive(Debug, Clone, Copy)]
pub struct SetGpioOutputEnable {
    /// New output-enable bits.
    pub bits: u32,
    /// Pins to change.
    pub mask: u32,
}

impl Command for SetGpioOutputEnable {
    fn message_type(&self) -> MessageType { MessageType::SetGpioOutputEnable }

    fn payload(&self) -> Vec<u8> { masked_payload(self.bits, self.mask) }
}

/// Write value bits for the pins selected by `mask`.
#[derive(Debug, Clone, Copy)]
pub struct SetGpioValue {
    /// New pin values.
    pub bits: u32,
    /// Pins to change.
    pub mask: u32,
}

impl Command for SetGpioValue {
    fn message_type(&self) -> MessageType { MessageType::SetGpioValue }

    fn payload(&self) -> Vec<u8> { masked_payload(self.bits, self.mask) }
}
