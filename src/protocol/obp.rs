//! Capability implementations over the framed binary protocol.

use std::net::Ipv4Addr;

use tracing::debug;

use super::capabilities::{
    CalibrationProtocol,
    GpioProtocol,
    I2cMasterProtocol,
    Ipv4Protocol,
    LightSourceProtocol,
    NetworkInterfaceProtocol,
    PixelBinningProtocol,
    ProtocolImplementation,
    RevisionProtocol,
    SerialNumberProtocol,
    SpectrometerProtocol,
    StrobeProtocol,
    TemperatureProtocol,
    ThermoElectricProtocol,
};
use crate::{
    bus::Bus,
    exchange::{
        acquisition::{GetRawSpectrum, SetIntegrationTime, SetTriggerMode},
        binning::{
            GetDefaultBinningFactor,
            GetMaxBinningFactor,
            GetPixelBinningFactor,
            SetDefaultBinningFactor,
            SetPixelBinningFactor,
        },
        calibration::{CoefficientKind, GetCoefficient, GetCoefficientCount},
        gpio::{GetGpioOutputEnable, GetGpioPinCount, GetGpioValue, SetGpioOutputEnable, SetGpioValue},
        i2c::{GetI2cBusCount, MAX_I2C_ADDRESS, ReadI2cBus, SetI2cClockLimit, WriteI2cBus},
        identity::{GetFirmwareRevision, GetHardwareRevision, GetSerialNumber, GetSerialNumberMaxLength},
        ipv4::{
            AddIpv4Address,
            DeleteIpv4Address,
            GetDefaultGateway,
            GetDhcpEnable,
            GetIpv4Address,
            GetIpv4AddressCount,
            Ipv4Assignment,
            MAX_PREFIX_LEN,
            SetDefaultGateway,
            SetDhcpEnable,
        },
        light_source::{
            GetLightSourceEnable,
            GetLightSourceIntensity,
            LightSourceAddress,
            SetLightSourceEnable,
            SetLightSourceIntensity,
        },
        network::{
            GetMacAddress,
            GetNetworkInterfaceCount,
            GetNetworkInterfaceEnable,
            GetNetworkInterfaceType,
            MacAddress,
            NetworkInterfaceKind,
            RunNetworkInterfaceSelfTest,
            SaveNetworkInterfaceSettings,
            SetMacAddress,
            SetNetworkInterfaceEnable,
        },
        query,
        require_ack,
        strobe::{SetStrobeEnable, SetStrobeTiming, StrobeOutput, StrobeTiming},
        temperature::{
            GetTecEnable,
            GetTecSetpoint,
            GetTecStable,
            GetTecTemperature,
            GetTemperatureCount,
            ReadAllTemperatures,
            ReadTemperature,
            SetTecEnable,
            SetTecFanEnable,
            SetTecSetpoint,
        },
    },
    identity::ProtocolFamily,
    transaction::ProtocolError,
};

macro_rules! obp_implementation {
    ($($name:ident),+ $(,)?) => {
        $(
            impl ProtocolImplementation for $name {
                fn protocol(&self) -> ProtocolFamily { ProtocolFamily::Obp }
            }
        )+
    };
}

/// Serial number over the framed protocol.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObpSerialNumber;
/// Revisions over the framed protocol.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObpRevision;
/// Temperature sensors over the framed protocol.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObpTemperature;
/// Thermo-electric cooler over the framed protocol.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObpThermoElectric;
/// Pixel binning over the framed protocol.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObpPixelBinning;
/// Acquisition over the framed protocol.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObpSpectrometer;
/// GPIO over the framed protocol.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObpGpio;
/// Light sources over the framed protocol.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObpLightSource;
/// Strobe outputs over the framed protocol.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObpStrobe;
/// Calibration coefficients over the framed protocol.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObpCalibration;
/// Network interfaces over the framed protocol.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObpNetworkInterface;
/// IPv4 addressing over the framed protocol.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObpIpv4;
/// I2C master buses over the framed protocol.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObpI2cMaster;

obp_implementation!(
    ObpSerialNumber,
    ObpRevision,
    ObpTemperature,
    ObpThermoElectric,
    ObpPixelBinning,
    ObpSpectrometer,
    ObpGpio,
    ObpLightSource,
    ObpStrobe,
    ObpCalibration,
    ObpNetworkInterface,
    ObpIpv4,
    ObpI2cMaster,
);

impl SerialNumberProtocol for ObpSerialNumber {
    fn serial_number(&self, bus: &mut dyn Bus) -> Result<String, ProtocolError> {
        query(bus, &GetSerialNumber)
    }

    fn serial_number_max_length(&self, bus: &mut dyn Bus) -> Result<u8, ProtocolError> {
        query(bus, &GetSerialNumberMaxLength)
    }
}

impl RevisionProtocol for ObpRevision {
    fn hardware_revision(&self, bus: &mut dyn Bus) -> Result<u8, ProtocolError> {
        query(bus, &GetHardwareRevision)
    }

    fn firmware_revision(&self, bus: &mut dyn Bus) -> Result<u16, ProtocolError> {
        query(bus, &GetFirmwareRevision)
    }
}

impl TemperatureProtocol for ObpTemperature {
    fn sensor_count(&self, bus: &mut dyn Bus) -> Result<u8, ProtocolError> {
        query(bus, &GetTemperatureCount)
    }

    fn read_temperature(&self, bus: &mut dyn Bus, index: u8) -> Result<f32, ProtocolError> {
        query(bus, &ReadTemperature { index })
    }

    fn read_all_temperatures(&self, bus: &mut dyn Bus) -> Result<Vec<f32>, ProtocolError> {
        query(bus, &ReadAllTemperatures)
    }
}

impl ThermoElectricProtocol for ObpThermoElectric {
    fn is_enabled(&self, bus: &mut dyn Bus) -> Result<bool, ProtocolError> { query(bus, &GetTecEnable) }

    fn set_enabled(&self, bus: &mut dyn Bus, enable: bool) -> Result<(), ProtocolError> {
        require_ack(bus, &SetTecEnable { enable })
    }

    fn setpoint(&self, bus: &mut dyn Bus) -> Result<f32, ProtocolError> { query(bus, &GetTecSetpoint) }

    fn set_setpoint(&self, bus: &mut dyn Bus, celsius: f32) -> Result<(), ProtocolError> {
        require_ack(bus, &SetTecSetpoint { celsius })
    }

    fn set_fan_enabled(&self, bus: &mut dyn Bus, enable: bool) -> Result<(), ProtocolError> {
        require_ack(bus, &SetTecFanEnable { enable })
    }

    fn is_stable(&self, bus: &mut dyn Bus) -> Result<bool, ProtocolError> { query(bus, &GetTecStable) }

    fn temperature(&self, bus: &mut dyn Bus) -> Result<f32, ProtocolError> {
        query(bus, &GetTecTemperature)
    }
}

impl ObpPixelBinning {
    fn check_factor(bus: &mut dyn Bus, factor: u8) -> Result<(), ProtocolError> {
        let max = query(bus, &GetMaxBinningFactor)?;
        if factor > max {
            return Err(ProtocolError::OutOfRange {
                what: "binning factor",
                value: u64::from(factor),
                max: u64::from(max),
            });
        }
        Ok(())
    }
}

impl PixelBinningProtocol for ObpPixelBinning {
    fn binning_factor(&self, bus: &mut dyn Bus) -> Result<u8, ProtocolError> {
        query(bus, &GetPixelBinningFactor)
    }

    fn default_binning_factor(&self, bus: &mut dyn Bus) -> Result<u8, ProtocolError> {
        query(bus, &GetDefaultBinningFactor)
    }

    fn max_binning_factor(&self, bus: &mut dyn Bus) -> Result<u8, ProtocolError> {
        query(bus, &GetMaxBinningFactor)
    }

    fn set_binning_factor(&self, bus: &mut dyn Bus, factor: u8) -> Result<(), ProtocolError> {
        Self::check_factor(bus, factor)?;
        require_ack(bus, &SetPixelBinningFactor { factor })
    }

    fn set_default_binning_factor(&self, bus: &mut dyn Bus, factor: u8) -> Result<(), ProtocolError> {
        Self::check_factor(bus, factor)?;
        require_ack(bus, &SetDefaultBinningFactor {
            factor: Some(factor),
        })
    }

    fn reset_default_binning_factor(&self, bus: &mut dyn Bus) -> Result<(), ProtocolError> {
        require_ack(bus, &SetDefaultBinningFactor { factor: None })
    }
}

impl SpectrometerProtocol for ObpSpectrometer {
    fn set_integration_time_micros(&self, bus: &mut dyn Bus, micros: u32) -> Result<(), ProtocolError> {
        require_ack(bus, &SetIntegrationTime { micros })
    }

    fn set_trigger_mode(&self, bus: &mut dyn Bus, mode: u8) -> Result<(), ProtocolError> {
        require_ack(bus, &SetTriggerMode { mode })
    }

    fn read_raw_spectrum(&self, bus: &mut dyn Bus) -> Result<Vec<u16>, ProtocolError> {
        let pixels = query(bus, &GetRawSpectrum)?;
        debug!(pixels = pixels.len(), "read raw spectrum");
        Ok(pixels)
    }
}

impl ObpGpio {
    /// Bit selecting `pin` after checking it against the device pin count.
    fn pin_bit(bus: &mut dyn Bus, pin: u8) -> Result<u32, ProtocolError> {
        let count = query(bus, &GetGpioPinCount)?;
        if pin >= count || u32::from(pin) >= u32::BITS {
            return Err(ProtocolError::OutOfRange {
                what: "GPIO pin",
                value: u64::from(pin),
                max: u64::from(count.saturating_sub(1)),
            });
        }
        Ok(1 << pin)
    }
}

impl GpioProtocol for ObpGpio {
    fn pin_count(&self, bus: &mut dyn Bus) -> Result<u8, ProtocolError> { query(bus, &GetGpioPinCount) }

    fn output_enable_vector(&self, bus: &mut dyn Bus) -> Result<u32, ProtocolError> {
        query(bus, &GetGpioOutputEnable)
    }

    fn set_output_enable(&self, bus: &mut dyn Bus, pin: u8, output: bool) -> Result<(), ProtocolError> {
        let mask = Self::pin_bit(bus, pin)?;
        require_ack(bus, &SetGpioOutputEnable {
            bits: if output { mask } else { 0 },
            mask,
        })
    }

    fn value_vector(&self, bus: &mut dyn Bus) -> Result<u32, ProtocolError> { query(bus, &GetGpioValue) }

    fn set_value(&self, bus: &mut dyn Bus, pin: u8, high: bool) -> Result<(), ProtocolError> {
        let mask = Self::pin_bit(bus, pin)?;
        require_ack(bus, &SetGpioValue {
            bits: if high { mask } else { 0 },
            mask,
        })
    }
}

impl LightSourceProtocol for ObpLightSource {
    fn is_enabled(&self, bus: &mut dyn Bus, address: LightSourceAddress) -> Result<bool, ProtocolError> {
        query(bus, &GetLightSourceEnable { address })
    }

    fn set_enabled(
        &self,
        bus: &mut dyn Bus,
        address: LightSourceAddress,
        enable: bool,
    ) -> Result<(), ProtocolError> {
        require_ack(bus, &SetLightSourceEnable { address, enable })
    }

    fn intensity(&self, bus: &mut dyn Bus, address: LightSourceAddress) -> Result<f32, ProtocolError> {
        query(bus, &GetLightSourceIntensity { address })
    }

    fn set_intensity(
        &self,
        bus: &mut dyn Bus,
        address: LightSourceAddress,
        intensity: f32,
    ) -> Result<(), ProtocolError> {
        require_ack(bus, &SetLightSourceIntensity { address, intensity })
    }
}

impl StrobeProtocol for ObpStrobe {
    fn set_timing(&self, bus: &mut dyn Bus, timing: StrobeTiming) -> Result<(), ProtocolError> {
        require_ack(bus, &SetStrobeTiming { timing })
    }

    fn set_enabled(&self, bus: &mut dyn Bus, output: StrobeOutput, enable: bool) -> Result<(), ProtocolError> {
        require_ack(bus, &SetStrobeEnable { output, enable })
    }
}

impl CalibrationProtocol for ObpCalibration {
    fn coefficient_count(&self, bus: &mut dyn Bus, kind: CoefficientKind) -> Result<u8, ProtocolError> {
        query(bus, &GetCoefficientCount { kind })
    }

    fn coefficient(&self, bus: &mut dyn Bus, kind: CoefficientKind, index: u8) -> Result<f32, ProtocolError> {
        query(bus, &GetCoefficient { kind, index })
    }
}

impl NetworkInterfaceProtocol for ObpNetworkInterface {
    fn interface_count(&self, bus: &mut dyn Bus) -> Result<u8, ProtocolError> {
        query(bus, &GetNetworkInterfaceCount)
    }

    fn interface_kind(&self, bus: &mut dyn Bus, interface: u8) -> Result<NetworkInterfaceKind, ProtocolError> {
        query(bus, &GetNetworkInterfaceType { interface })
    }

    fn is_enabled(&self, bus: &mut dyn Bus, interface: u8) -> Result<bool, ProtocolError> {
        query(bus, &GetNetworkInterfaceEnable { interface })
    }

    fn set_enabled(&self, bus: &mut dyn Bus, interface: u8, enable: bool) -> Result<(), ProtocolError> {
        require_ack(bus, &SetNetworkInterfaceEnable { interface, enable })
    }

    fn run_self_test(&self, bus: &mut dyn Bus, interface: u8) -> Result<bool, ProtocolError> {
        query(bus, &RunNetworkInterfaceSelfTest { interface })
    }

    fn save_settings(&self, bus: &mut dyn Bus, interface: u8) -> Result<(), ProtocolError> {
        require_ack(bus, &SaveNetworkInterfaceSettings { interface })
    }

    fn mac_address(&self, bus: &mut dyn Bus, interface: u8) -> Result<MacAddress, ProtocolError> {
        query(bus, &GetMacAddress { interface })
    }

    fn set_mac_address(&self, bus: &mut dyn Bus, interface: u8, mac: MacAddress) -> Result<(), ProtocolError> {
        require_ack(bus, &SetMacAddress { interface, mac })
    }
}

impl Ipv4Protocol for ObpIpv4 {
    fn dhcp_enabled(&self, bus: &mut dyn Bus, interface: u8) -> Result<bool, ProtocolError> {
        query(bus, &GetDhcpEnable { interface })
    }

    fn set_dhcp_enabled(&self, bus: &mut dyn Bus, interface: u8, enable: bool) -> Result<(), ProtocolError> {
        require_ack(bus, &SetDhcpEnable { interface, enable })
    }

    fn address_count(&self, bus: &mut dyn Bus, interface: u8) -> Result<u8, ProtocolError> {
        query(bus, &GetIpv4AddressCount { interface })
    }

    fn address(&self, bus: &mut dyn Bus, interface: u8, index: u8) -> Result<Ipv4Assignment, ProtocolError> {
        query(bus, &GetIpv4Address { interface, index })
    }

    fn add_address(
        &self,
        bus: &mut dyn Bus,
        interface: u8,
        assignment: Ipv4Assignment,
    ) -> Result<(), ProtocolError> {
        if assignment.prefix_len > MAX_PREFIX_LEN {
            return Err(ProtocolError::OutOfRange {
                what: "IPv4 prefix length",
                value: u64::from(assignment.prefix_len),
                max: u64::from(MAX_PREFIX_LEN),
            });
        }
        require_ack(bus, &AddIpv4Address { interface, assignment })
    }

    fn delete_address(&self, bus: &mut dyn Bus, interface: u8, index: u8) -> Result<(), ProtocolError> {
        let count = self.address_count(bus, interface)?;
        if index >= count {
            return Err(ProtocolError::OutOfRange {
                what: "IPv4 address index",
                value: u64::from(index),
                max: u64::from(count.saturating_sub(1)),
            });
        }
        require_ack(bus, &DeleteIpv4Address { interface, index })
    }

    fn default_gateway(&self, bus: &mut dyn Bus, interface: u8) -> Result<Ipv4Addr, ProtocolError> {
        query(bus, &GetDefaultGateway { interface })
    }

    fn set_default_gateway(&self, bus: &mut dyn Bus, interface: u8, gateway: Ipv4Addr) -> Result<(), ProtocolError> {
        require_ack(bus, &SetDefaultGateway { interface, gateway })
    }
}

impl ObpI2cMaster {
    fn check_address(address: u8) -> Result<(), ProtocolError> {
        if address > MAX_I2C_ADDRESS {
            return Err(ProtocolError::OutOfRange {
                what: "I2C address",
                value: u64::from(address),
                max: u64::from(MAX_I2C_ADDRESS),
            });
        }
        Ok(())
    }
}

impl I2cMasterProtocol for ObpI2cMaster {
    fn bus_count(&self, bus: &mut dyn Bus) -> Result<u8, ProtocolError> { query(bus, &GetI2cBusCount) }

    fn set_clock_limit(&self, bus: &mut dyn Bus, i2c_bus: u8, hertz: u32) -> Result<(), ProtocolError> {
        require_ack(bus, &SetI2cClockLimit { bus: i2c_bus, hertz })
    }

    fn read(&self, bus: &mut dyn Bus, i2c_bus: u8, address: u8, len: u16) -> Result<Vec<u8>, ProtocolError> {
        Self::check_address(address)?;
        query(bus, &ReadI2cBus {
            bus: i2c_bus,
            address,
            len,
        })
    }

    fn write(&self, bus: &mut dyn Bus, i2c_bus: u8, address: u8, data: &[u8]) -> Result<(), ProtocolError> {
        Self::check_address(address)?;
        require_ack(bus, &WriteI2cBus {
            bus: i2c_bus,
            address,
            data: data.to_vec(),
        })
    }
}
