//! Integrated light sources, addressed by module and source index.

#![expect(clippy::little_endian_bytes, reason = "wire format is little-endian")]

use super::{Command, Query, decode};
use crate::{message::MessageType, transaction::ProtocolError};

/// Module and source index of one light source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LightSourceAddress {
    /// Accessory module index.
    pub module: u8,
    /// Source index within the module.
    pub source: u8,
}

impl LightSourceAddress {
    fn bytes(self) -> [u8; 2] { [self.module, self.source] }
}

/// Read whether a source is lit.
#[derive(Debug, Clone, Copy)]
pub struct GetLightSourceEnable {
    /// Source to query.
    pub address: LightSourceAddress,
}

impl Query for GetLightSourceEnable {
    type Output = bool;

    fn message_type(&self) -> MessageType { MessageType::GetLightSourceEnable }

    fn payload(&self) -> Vec<u8> { self.address.bytes().to_vec() }

    fn decode(&self, data: &[u8]) -> Result<bool, ProtocolError> { decode::bool_at(data, 0) }
}

/// Switch a source on or off.
#[derive(Debug, Clone, Copy)]
pub struct SetLightSourceEnable {
    /// Source to change.
    pub address: LightSourceAddress,
    /// Desired state.
    pub enable: bool,
}

impl Command for SetLightSourceEnable {
    fn message_type(&self) -> MessageType { MessageType::SetLightSourceEnable }

    fn payload(&self) -> Vec<u8> {
        let [module, source] = self.address.bytes();
        vec![module, source, u8::from(self.enable)]
    }
}

/// Read a source's intensity as a fraction of full scale.
#[derive(Debug, Clone, Copy)]
pub struct GetLightSourceIntensity {
    /// Source to query.
    pub address: LightSourceAddress,
}

impl Query for GetLightSourceIntensity {
    type Output = f32;

    fn message_type(&self) -> MessageType { MessageType::GetLightSourceIntensity }

    fn payload(&self) -> Vec<u8> { self.address.bytes().to_vec() }

    fn decode(&self, data: &[u8]) -> Result<f32, ProtocolError> { decode::f32_at(data, 0) }
}

/// Change a source's intensity.
#[derive(Debug, Clone, Copy)]
pub struct SetLightSourceIntensity {
    /// Source to change.
    pub address: LightSourceAddress,
    /// Fraction of full scale, 0.0 to 1.0.
    pub intensity: f32,
}

impl Command for SetLightSourceIntensity {
    fn message_type(&self) -> MessageType { MessageType::SetLightSourceIntensity }

    fn payload(&self) -> Vec<u8> {
        let mut payload = self.address.bytes().to_vec();
        payload.extend_from_slice(&self.intensity.to_le_bytes());
        payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intensity_follows_address() {
        let payload = SetLightSourceIntensity {
            address: LightSourceAddress {
                module: 0,
                source: 1,
            },
            intensity: 0.5,
        }
        .payload();
        assert_eq!(payload.get(..2), Some([0u8, 1].as_slice()));
        assert_eq!(payload.get(2..), Some(0.5f32.to_le_bytes().as_slice()));
    }
}
