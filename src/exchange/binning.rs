//! Pixel binning factors.

use super::{Command, Query, decode};
use crate::{message::MessageType, transaction::ProtocolError};

/// Read the active binning factor.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetPixelBinningFactor;

impl Query for GetPixelBinningFactor {
    type Output = u8;

    fn message_type(&self) -> MessageType { MessageType::GetPixelBinningFactor }

    fn decode(&self, data: &[u8]) -> Result<u8, ProtocolError> { decode::u8_at(data, 0) }
}

/// Read the power-on binning factor.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetDefaultBinningFactor;

impl Query for GetDefaultBinningFactor {
    type Output = u8;

    fn message_type(&self) -> MessageType { MessageType::GetDefaultBinningFactor }

    fn decode(&self, data: &[u8]) -> Result<u8, ProtocolError> { decode::u8_at(data, 0) }
}

/// Read the largest factor the device accepts.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetMaxBinningFactor;

impl Query for GetMaxBinningFactor {
    type Output = u8;

    fn message_type(&self) -> MessageType { MessageType::GetMaxBinningFactor }

    fn decode(&self, data: &[u8]) -> Result<u8, ProtocolError> { decode::u8_at(data, 0) }
}

/// Change the active binning factor.
#[derive(Debug, Clone, Copy)]
pub struct SetPixelBinningFactor {
    /// New factor.
    pub factor: u8,
}

impl Command for SetPixelBinningFactor {
    fn message_type(&self) -> MessageType { MessageType::SetPixelBinningFactor }

    fn payload(&self) -> Vec<u8> { vec![self.factor] }
}

/// Change the power-on binning factor; `None` restores the factory default.
#[derive(Debug, Clone, Copy)]
pub struct SetDefaultBinningFactor {
    /// New default, or `None` to reset.
    pub factor: Option<u8>,
}

impl Command for SetDefaultBinningFactor {
    fn message_type(&self) -> MessageType { MessageType::SetDefaultBinningFactor }

    fn payload(&self) -> Vec<u8> { self.factor.into_iter().collect() }
}
