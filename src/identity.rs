//! Identity tags for buses, wire protocols, and device features.
//!
//! These are closed enumerations compared by value. A capability
//! implementation is bound to one [`ProtocolFamily`] at construction, and a
//! bus resolves a [`Hint`] to the transfer helper that serves it.

use std::fmt;

/// Physical or transport medium carrying bytes to a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BusFamily {
    /// USB bulk endpoints.
    Usb,
    /// RS232 serial line.
    Rs232,
    /// TCP over IPv4.
    TcpIpv4,
    /// UDP over IPv4.
    UdpIpv4,
}

impl BusFamily {
    /// Numeric identifier of the family.
    #[must_use]
    pub const fn id(self) -> u16 {
        match self {
            Self::Usb => 0,
            Self::Rs232 => 1,
            Self::TcpIpv4 => 2,
            Self::UdpIpv4 => 3,
        }
    }

    /// Human-readable family name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Usb => "USB",
            Self::Rs232 => "RS232",
            Self::TcpIpv4 => "TCP/IPv4",
            Self::UdpIpv4 => "UDP/IPv4",
        }
    }
}

impl fmt::Display for BusFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

/// Wire command set spoken by a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolFamily {
    /// Legacy fixed-offset command set (single opcode byte, fixed replies).
    Legacy,
    /// Self-describing binary protocol with 64-byte framed messages.
    Obp,
}

impl ProtocolFamily {
    /// Numeric identifier of the family.
    #[must_use]
    pub const fn id(self) -> u16 {
        match self {
            Self::Legacy => 0,
            Self::Obp => 1,
        }
    }

    /// Human-readable family name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Legacy => "Legacy",
            Self::Obp => "OBP",
        }
    }
}

impl fmt::Display for ProtocolFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

/// Semantic device capability exposed to applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureFamily {
    /// Spectrum acquisition, integration time and triggering.
    Spectrometer,
    /// Serial number readout.
    SerialNumber,
    /// Hardware and firmware revision readout.
    Revision,
    /// Board temperature sensors.
    Temperature,
    /// Thermo-electric cooler control.
    ThermoElectric,
    /// Raw EEPROM slot access.
    Eeprom,
    /// Detector pixel binning.
    PixelBinning,
    /// General purpose I/O pins.
    Gpio,
    /// Integrated light sources.
    LightSource,
    /// Single and continuous strobe outputs.
    Strobe,
    /// Stored calibration coefficients.
    Calibration,
    /// Network interface enumeration and control.
    NetworkInterface,
    /// IPv4 addressing of network interfaces.
    Ipv4,
    /// I2C master buses.
    I2cMaster,
}

impl FeatureFamily {
    /// Human-readable family name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Spectrometer => "Spectrometer",
            Self::SerialNumber => "SerialNumber",
            Self::Revision => "Revision",
            Self::Temperature => "Temperature",
            Self::ThermoElectric => "ThermoElectric",
            Self::Eeprom => "EEPROM",
            Self::PixelBinning => "PixelBinning",
            Self::Gpio => "GPIO",
            Self::LightSource => "LightSource",
            Self::Strobe => "Strobe",
            Self::Calibration => "Calibration",
            Self::NetworkInterface => "NetworkInterface",
            Self::Ipv4 => "IPv4",
            Self::I2cMaster => "I2CMaster",
        }
    }
}

impl fmt::Display for FeatureFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

/// Kind of transfer an exchange needs; a bus maps each hint to a helper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hint {
    /// Low-volume control traffic.
    Control,
    /// Bulk spectral data.
    Spectrum,
}

impl fmt::Display for Hint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Control => f.write_str("control"),
            Self::Spectrum => f.write_str("spectrum"),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(BusFamily::Usb, 0, "USB")]
    #[case(BusFamily::Rs232, 1, "RS232")]
    #[case(BusFamily::TcpIpv4, 2, "TCP/IPv4")]
    #[case(BusFamily::UdpIpv4, 3, "UDP/IPv4")]
    fn bus_family_identity(#[case] bus: BusFamily, #[case] id: u16, #[case] name: &str) {
        assert_eq!(bus.id(), id);
        assert_eq!(bus.to_string(), name);
    }

    #[test]
    fn protocol_families_compare_by_value() {
        assert_eq!(ProtocolFamily::Obp, ProtocolFamily::Obp);
        assert_ne!(ProtocolFamily::Obp, ProtocolFamily::Legacy);
        assert_ne!(ProtocolFamily::Obp.id(), ProtocolFamily::Legacy.id());
    }
}
