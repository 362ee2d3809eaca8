//! Calibration coefficients stored on the device.

use std::fmt;

use super::{Query, decode};
use crate::{message::MessageType, transaction::ProtocolError};

/// Coefficient table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoefficientKind {
    /// Pixel-to-wavelength polynomial.
    Wavelength,
    /// Detector nonlinearity correction polynomial.
    Nonlinearity,
    /// Stray light correction.
    StrayLight,
}

impl CoefficientKind {
    const fn count_type(self) -> MessageType {
        match self {
            Self::Wavelength => MessageType::GetWavelengthCoeffCount,
            Self::Nonlinearity => MessageType::GetNonlinearityCoeffCount,
            Self::StrayLight => MessageType::GetStrayLightCoeffCount,
        }
    }

    const fn read_type(self) -> MessageType {
        match self {
            Self::Wavelength => MessageType::GetWavelengthCoeff,
            Self::Nonlinearity => MessageType::GetNonlinearityCoeff,
            Self::StrayLight => MessageType::GetStrayLightCoeff,
        }
    }
}

impl fmt::Display for CoefficientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Wavelength => "wavelength",
            Self::Nonlinearity => "nonlinearity",
            Self::StrayLight => "stray light",
        })
    }
}

/// Read the number of coefficients in a table.
#[derive(Debug, Clone, Copy)]
pub struct GetCoefficientCount {
    /// Table to query.
    pub kind: CoefficientKind,
}

impl Query for GetCoefficientCount {
    type Output = u8;

    fn message_type(&self) -> MessageType { self.kind.count_type() }

    fn decode(&self, data: &[u8]) -> Result<u8, ProtocolError> { decode::u8_at(data, 0) }
}

/// Read one coefficient.
#[derive(Debug, Clone, Copy)]
pub struct GetCoefficient {
    /// Table to read from.
    pub kind: CoefficientKind,
    /// Coefficient index.
    pub index: u8,
}

impl Query for GetCoefficient {
    type Output = f32;

    fn message_type(&self) -> MessageType { self.kind.read_type() }

    fn payload(&self) -> Vec<u8> { vec![self.index] }

    fn decode(&self, data: &[u8]) -> Result<f32, ProtocolError> { decode::f32_at(data, 0) }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(CoefficientKind::Wavelength, 0x0018_0100, 0x0018_0101)]
    #[case(CoefficientKind::Nonlinearity, 0x0018_1100, 0x0018_1101)]
    #[case(CoefficientKind::StrayLight, 0x0018_3100, 0x0018_3101)]
    fn tables_map_to_opcodes(#[case] kind: CoefficientKind, #[case] count: u32, #[case] read: u32) {
        assert_eq!(GetCoefficientCount { kind }.message_type().code(), count);
        let exchange = GetCoefficient { kind, index: 3 };
        assert_eq!(exchange.message_type().code(), read);
        assert_eq!(exchange.payload(), vec![3]);
    }
}
