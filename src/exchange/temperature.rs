//! Temperature sensors and the thermo-electric cooler.

#![expect(clippy::little_endian_bytes, reason = "wire format is little-endian")]

use super::{Command, Query, decode};
use crate::{message::MessageType, transaction::ProtocolError};

/// Read the number of temperature sensors.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetTemperatureCount;

impl Query for GetTemperatureCount {
    type Output = u8;

    fn message_type(&self) -> MessageType { MessageType::GetTemperatureCount }

    fn decode(&self, data: &[u8]) -> Result<u8, ProtocolError> { decode::u8_at(data, 0) }
}

/// Read one sensor in degrees Celsius.
#[derive(Debug, Clone, Copy)]
pub struct ReadTemperature {
    /// Sensor index.
    pub index: u8,
}

impl Query for ReadTemperature {
    type Output = f32;

    fn message_type(&self) -> MessageType { MessageType::GetTemperature }

    fn payload(&self) -> Vec<u8> { vec![self.index] }

    fn decode(&self, data: &[u8]) -> Result<f32, ProtocolError> { decode::f32_at(data, 0) }
}

/// Read every sensor in index order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadAllTemperatures;

impl Query for ReadAllTemperatures {
    type Output = Vec<f32>;

    fn message_type(&self) -> MessageType { MessageType::GetAllTemperatures }

    fn decode(&self, data: &[u8]) -> Result<Vec<f32>, ProtocolError> { Ok(decode::f32_list(data)) }
}

/// Read whether the cooler is enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetTecEnable;

impl Query for GetTecEnable {
    type Output = bool;

    fn message_type(&self) -> MessageType { MessageType::GetTecEnable }

    fn decode(&self, data: &[u8]) -> Result<bool, ProtocolError> { decode::bool_at(data, 0) }
}

/// Read the cooler setpoint in degrees Celsius.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetTecSetpoint;

impl Query for GetTecSetpoint {
    type Output = f32;

    fn message_type(&self) -> MessageType { MessageType::GetTecSetpoint }

    fn decode(&self, data: &[u8]) -> Result<f32, ProtocolError> { decode::f32_at(data, 0) }
}

/// Read whether the cooler has reached its setpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetTecStable;

impl Query for GetTecStable {
    type Output = bool;

    fn message_type(&self) -> MessageType { MessageType::GetTecStable }

    fn decode(&self, data: &[u8]) -> Result<bool, ProtocolError> { decode::bool_at(data, 0) }
}

/// Read the cooler temperature in degrees Celsius.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetTecTemperature;

impl Query for GetTecTemperature {
    type Output = f32;

    fn message_type(&self) -> MessageType { MessageType::GetTecTemperature }

    fn decode(&self, data: &[u8]) -> Result<f32, ProtocolError> { decode::f32_at(data, 0) }
}

/// Enable or disable the cooler.
#[derive(Debug, Clone, Copy)]
pub struct SetTecEnable {
    /// Desired state.
    pub enable: bool,
}

impl Command for SetTecEnable {
    fn message_type(&self) -> MessageType { MessageType::SetTecEnable }

    fn payload(&self) -> Vec<u8> { vec![u8::from(self.enable)] }
}

/// Change the cooler setpoint.
#[derive(Debug, Clone, Copy)]
pub struct SetTecSetpoint {
    /// Target temperature in degrees Celsius.
    pub celsius: f32,
}

impl Command for SetTecSetpoint {
    fn message_type(&self) -> MessageType { MessageType::SetTecSetpoint }

    fn payload(&self) -> Vec<u8> { self.celsius.to_le_bytes().to_vec() }
}

/// Enable or disable the cooler fan.
#[derive(Debug, Clone, Copy)]
pub struct SetTecFanEnable {
    /// Desired state.
    pub enable: bool,
}

impl Command for SetTecFanEnable {
    fn message_type(&self) -> MessageType { MessageType::SetTecFanEnable }

    fn payload(&self) -> Vec<u8> { vec![u8::from(self.enable)] }
}
