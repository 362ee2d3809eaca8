//! I2C master buses on the device's accessory connector.
//!
//! Targets are addressed with 7-bit addresses.

#![expect(clippy::little_endian_bytes, reason = "wire format is little-endian")]

use super::{Command, Query, decode};
use crate::{message::MessageType, transaction::ProtocolError};

/// Highest valid 7-bit target address.
pub const MAX_I2C_ADDRESS: u8 = 0x7F;

/// Read the number of I2C buses.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetI2cBusCount;

impl Query for GetI2cBusCount {
    type Output = u8;

    fn message_type(&self) -> MessageType { MessageType::GetI2cBusCount }

    fn decode(&self, data: &[u8]) -> Result<u8, ProtocolError> { decode::u8_at(data, 0) }
}

/// Limit the clock rate of one bus.
#[derive(Debug, Clone, Copy)]
pub struct SetI2cClockLimit {
    /// Bus index.
    pub bus: u8,
    /// Upper clock bound in hertz.
    pub hertz: u32,
}

impl Command for SetI2cClockLimit {
    fn message_type(&self) -> MessageType { MessageType::SetI2cClockLimit }

    fn payload(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(5);
        payload.push(self.bus);
        payload.extend_from_slice(&self.hertz.to_le_bytes());
        payload
    }
}

/// Read `len` bytes from the target at `address`.
#[derive(Debug, Clone, Copy)]
pub struct ReadI2cBus {
    /// Bus index.
    pub bus: u8,
    /// 7-bit target address.
    pub address: u8,
    /// Bytes to read.
    pub len: u16,
}

impl Query for ReadI2cBus {
    type Output = Vec<u8>;

    fn message_type(&self) -> MessageType { MessageType::ReadI2cBus }

    fn payload(&self) -> Vec<u8> {
        let [lo, hi] = self.len.to_le_bytes();
        vec![self.bus, self.address, lo, hi]
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<u8>, ProtocolError> {
        let len = usize::from(self.len);
        data.get(..len)
            .map(<[u8]>::to_vec)
            .ok_or(ProtocolError::ResponseTooShort {
                expected: len,
                actual: data.len(),
            })
    }
}

/// Write `data` to the target at `address`.
#[derive(Debug, Clone)]
pub struct WriteI2cBus {
    /// Bus index.
    pub bus: u8,
    /// 7-bit target address.
    pub address: u8,
    /// Bytes to write.
    pub data: Vec<u8>,
}

impl Command for WriteI2cBus {
    fn message_type(&self) -> MessageType { MessageType::WriteI2cBus }

    fn payload(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(2 + self.data.len());
        payload.push(self.bus);
        payload.push(self.address);
        payload.extend_from_slice(&self.data);
        payload
    }
}
