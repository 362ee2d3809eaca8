//! Capability-oriented call surfaces.
//!
//! Each trait is one device capability; an implementation is bound to the
//! wire protocol reported by [`ProtocolImplementation::protocol`]. Setters
//! fail with [`ProtocolError::Rejected`] when the device nacks.

use std::net::Ipv4Addr;

use crate::{
    bus::Bus,
    exchange::{
        calibration::CoefficientKind,
        ipv4::Ipv4Assignment,
        light_source::LightSourceAddress,
        network::{MacAddress, NetworkInterfaceKind},
        strobe::{StrobeOutput, StrobeTiming},
    },
    identity::ProtocolFamily,
    transaction::ProtocolError,
};

/// A capability implementation bound to one wire protocol.
pub trait ProtocolImplementation: Send + Sync {
    /// Wire protocol this implementation speaks.
    fn protocol(&self) -> ProtocolFamily;
}

/// Serial number readout.
pub trait SerialNumberProtocol: ProtocolImplementation {
    /// Read the serial number.
    ///
    /// # Errors
    /// Propagates transport, framing and decode errors.
    fn serial_number(&self, bus: &mut dyn Bus) -> Result<String, ProtocolError>;

    /// Read the longest serial number the device can store.
    ///
    /// # Errors
    /// Propagates transport, framing and decode errors.
    fn serial_number_max_length(&self, bus: &mut dyn Bus) -> Result<u8, ProtocolError>;
}

/// Hardware and firmware revisions.
pub trait RevisionProtocol: ProtocolImplementation {
    /// Read the hardware revision.
    ///
    /// # Errors
    /// Propagates transport, framing and decode errors.
    fn hardware_revision(&self, bus: &mut dyn Bus) -> Result<u8, ProtocolError>;

    /// Read the firmware revision.
    ///
    /// # Errors
    /// Propagates transport, framing and decode errors.
    fn firmware_revision(&self, bus: &mut dyn Bus) -> Result<u16, ProtocolError>;
}

/// Board temperature sensors.
pub trait TemperatureProtocol: ProtocolImplementation {
    /// Number of sensors.
    ///
    /// # Errors
    /// Propagates transport, framing and decode errors.
    fn sensor_count(&self, bus: &mut dyn Bus) -> Result<u8, ProtocolError>;

    /// Read sensor `index` in degrees Celsius.
    ///
    /// # Errors
    /// Propagates transport, framing and decode errors.
    fn read_temperature(&self, bus: &mut dyn Bus, index: u8) -> Result<f32, ProtocolError>;

    /// Read every sensor in index order.
    ///
    /// # Errors
    /// Propagates transport, framing and decode errors.
    fn read_all_temperatures(&self, bus: &mut dyn Bus) -> Result<Vec<f32>, ProtocolError>;
}

/// Thermo-electric cooler control.
pub trait ThermoElectricProtocol: ProtocolImplementation {
    /// Whether the cooler is enabled.
    ///
    /// # Errors
    /// Propagates transport, framing and decode errors.
    fn is_enabled(&self, bus: &mut dyn Bus) -> Result<bool, ProtocolError>;

    /// Enable or disable the cooler.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Rejected`] on a nack, or a transport error.
    fn set_enabled(&self, bus: &mut dyn Bus, enable: bool) -> Result<(), ProtocolError>;

    /// Setpoint in degrees Celsius.
    ///
    /// # Errors
    /// Propagates transport, framing and decode errors.
    fn setpoint(&self, bus: &mut dyn Bus) -> Result<f32, ProtocolError>;

    /// Change the setpoint.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Rejected`] on a nack, or a transport error.
    fn set_setpoint(&self, bus: &mut dyn Bus, celsius: f32) -> Result<(), ProtocolError>;

    /// Enable or disable the cooler fan.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Rejected`] on a nack, or a transport error.
    fn set_fan_enabled(&self, bus: &mut dyn Bus, enable: bool) -> Result<(), ProtocolError>;

    /// Whether the cooler has stabilised at its setpoint.
    ///
    /// # Errors
    /// Propagates transport, framing and decode errors.
    fn is_stable(&self, bus: &mut dyn Bus) -> Result<bool, ProtocolError>;

    /// Detector temperature in degrees Celsius.
    ///
    /// # Errors
    /// Propagates transport, framing and decode errors.
    fn temperature(&self, bus: &mut dyn Bus) -> Result<f32, ProtocolError>;
}

/// Pixel binning.
pub trait PixelBinningProtocol: ProtocolImplementation {
    /// Active binning factor.
    ///
    /// # Errors
    /// Propagates transport, framing and decode errors.
    fn binning_factor(&self, bus: &mut dyn Bus) -> Result<u8, ProtocolError>;

    /// Power-on binning factor.
    ///
    /// # Errors
    /// Propagates transport, framing and decode errors.
    fn default_binning_factor(&self, bus: &mut dyn Bus) -> Result<u8, ProtocolError>;

    /// Largest factor the device accepts.
    ///
    /// # Errors
    /// Propagates transport, framing and decode errors.
    fn max_binning_factor(&self, bus: &mut dyn Bus) -> Result<u8, ProtocolError>;

    /// Change the active factor after checking it against the device
    /// maximum.
    ///
    /// # Errors
    /// Returns [`ProtocolError::OutOfRange`] before sending if `factor`
    /// exceeds the maximum, [`ProtocolError::Rejected`] on a nack, or a
    /// transport error.
    fn set_binning_factor(&self, bus: &mut dyn Bus, factor: u8) -> Result<(), ProtocolError>;

    /// Change the power-on factor after checking it against the device
    /// maximum.
    ///
    /// # Errors
    /// As [`PixelBinningProtocol::set_binning_factor`].
    fn set_default_binning_factor(&self, bus: &mut dyn Bus, factor: u8) -> Result<(), ProtocolError>;

    /// Restore the factory power-on factor.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Rejected`] on a nack, or a transport error.
    fn reset_default_binning_factor(&self, bus: &mut dyn Bus) -> Result<(), ProtocolError>;
}

/// Acquisition control and spectrum readout.
pub trait SpectrometerProtocol: ProtocolImplementation {
    /// Set the integration time.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Rejected`] on a nack, or a transport error.
    fn set_integration_time_micros(&self, bus: &mut dyn Bus, micros: u32) -> Result<(), ProtocolError>;

    /// Select the trigger mode.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Rejected`] on a nack, or a transport error.
    fn set_trigger_mode(&self, bus: &mut dyn Bus, mode: u8) -> Result<(), ProtocolError>;

    /// Acquire and read one unprocessed spectrum.
    ///
    /// # Errors
    /// Propagates transport, framing and decode errors.
    fn read_raw_spectrum(&self, bus: &mut dyn Bus) -> Result<Vec<u16>, ProtocolError>;
}

/// General-purpose I/O pins.
pub trait GpioProtocol: ProtocolImplementation {
    /// Number of pins.
    ///
    /// # Errors
    /// Propagates transport, framing and decode errors.
    fn pin_count(&self, bus: &mut dyn Bus) -> Result<u8, ProtocolError>;

    /// Output-enable bits, one per pin.
    ///
    /// # Errors
    /// Propagates transport, framing and decode errors.
    fn output_enable_vector(&self, bus: &mut dyn Bus) -> Result<u32, ProtocolError>;

    /// Configure `pin` as an output or an input.
    ///
    /// # Errors
    /// Returns [`ProtocolError::OutOfRange`] before sending if `pin` is not
    /// below the pin count, [`ProtocolError::Rejected`] on a nack, or a
    /// transport error.
    fn set_output_enable(&self, bus: &mut dyn Bus, pin: u8, output: bool) -> Result<(), ProtocolError>;

    /// Pin values, one bit per pin.
    ///
    /// # Errors
    /// Propagates transport, framing and decode errors.
    fn value_vector(&self, bus: &mut dyn Bus) -> Result<u32, ProtocolError>;

    /// Drive `pin` high or low.
    ///
    /// # Errors
    /// As [`GpioProtocol::set_output_enable`].
    fn set_value(&self, bus: &mut dyn Bus, pin: u8, high: bool) -> Result<(), ProtocolError>;
}

/// Integrated light sources.
pub trait LightSourceProtocol: ProtocolImplementation {
    /// Whether a source is lit.
    ///
    /// # Errors
    /// Propagates transport, framing and decode errors.
    fn is_enabled(&self, bus: &mut dyn Bus, address: LightSourceAddress) -> Result<bool, ProtocolError>;

    /// Switch a source on or off.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Rejected`] on a nack, or a transport error.
    fn set_enabled(
        &self,
        bus: &mut dyn Bus,
        address: LightSourceAddress,
        enable: bool,
    ) -> Result<(), ProtocolError>;

    /// Intensity as a fraction of full scale.
    ///
    /// # Errors
    /// Propagates transport, framing and decode errors.
    fn intensity(&self, bus: &mut dyn Bus, address: LightSourceAddress) -> Result<f32, ProtocolError>;

    /// Change a source's intensity.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Rejected`] on a nack, or a transport error.
    fn set_intensity(
        &self,
        bus: &mut dyn Bus,
        address: LightSourceAddress,
        intensity: f32,
    ) -> Result<(), ProtocolError>;
}

/// Strobe outputs.
pub trait StrobeProtocol: ProtocolImplementation {
    /// Set one timing parameter.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Rejected`] on a nack, or a transport error.
    fn set_timing(&self, bus: &mut dyn Bus, timing: StrobeTiming) -> Result<(), ProtocolError>;

    /// Enable or disable an output.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Rejected`] on a nack, or a transport error.
    fn set_enabled(&self, bus: &mut dyn Bus, output: StrobeOutput, enable: bool) -> Result<(), ProtocolError>;
}

/// Stored calibration coefficients.
pub trait CalibrationProtocol: ProtocolImplementation {
    /// Number of coefficients in a table.
    ///
    /// # Errors
    /// Propagates transport, framing and decode errors.
    fn coefficient_count(&self, bus: &mut dyn Bus, kind: CoefficientKind) -> Result<u8, ProtocolError>;

    /// Read one coefficient.
    ///
    /// # Errors
    /// Propagates transport, framing and decode errors.
    fn coefficient(&self, bus: &mut dyn Bus, kind: CoefficientKind, index: u8) -> Result<f32, ProtocolError>;

    /// Read a whole table in index order.
    ///
    /// # Errors
    /// Propagates the first error from the count or any coefficient read.
    fn coefficients(&self, bus: &mut dyn Bus, kind: CoefficientKind) -> Result<Vec<f32>, ProtocolError> {
        let count = self.coefficient_count(bus, kind)?;
        (0..count)
            .map(|index| self.coefficient(bus, kind, index))
            .collect()
    }
}

/// Slot-addressed non-volatile storage.
pub trait EepromProtocol: ProtocolImplementation {
    /// Read slot `slot`.
    ///
    /// # Errors
    /// Returns [`ProtocolError::OutOfRange`] before any I/O for slots
    /// beyond the device's table, or a transport error.
    fn read_slot(&self, bus: &mut dyn Bus, slot: u8) -> Result<Vec<u8>, ProtocolError>;

    /// Write slot `slot`.
    ///
    /// # Errors
    /// As [`EepromProtocol::read_slot`].
    fn write_slot(&self, bus: &mut dyn Bus, slot: u8, data: &[u8]) -> Result<(), ProtocolError>;
}

/// Network interface enumeration and control.
pub trait NetworkInterfaceProtocol: ProtocolImplementation {
    /// Number of interfaces.
    ///
    /// # Errors
    /// Propagates transport, framing and decode errors.
    fn interface_count(&self, bus: &mut dyn Bus) -> Result<u8, ProtocolError>;

    /// Link type of `interface`.
    ///
    /// # Errors
    /// Propagates transport, framing and decode errors.
    fn interface_kind(&self, bus: &mut dyn Bus, interface: u8) -> Result<NetworkInterfaceKind, ProtocolError>;

    /// Whether `interface` is enabled.
    ///
    /// # Errors
    /// Propagates transport, framing and decode errors.
    fn is_enabled(&self, bus: &mut dyn Bus, interface: u8) -> Result<bool, ProtocolError>;

    /// Enable or disable `interface`.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Rejected`] on a nack, or a transport error.
    fn set_enabled(&self, bus: &mut dyn Bus, interface: u8, enable: bool) -> Result<(), ProtocolError>;

    /// Run the interface self test and report whether it passed.
    ///
    /// # Errors
    /// Propagates transport, framing and decode errors.
    fn run_self_test(&self, bus: &mut dyn Bus, interface: u8) -> Result<bool, ProtocolError>;

    /// Persist the settings of `interface`.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Rejected`] on a nack, or a transport error.
    fn save_settings(&self, bus: &mut dyn Bus, interface: u8) -> Result<(), ProtocolError>;

    /// Hardware address of `interface`.
    ///
    /// # Errors
    /// Propagates transport, framing and decode errors.
    fn mac_address(&self, bus: &mut dyn Bus, interface: u8) -> Result<MacAddress, ProtocolError>;

    /// Change the hardware address of `interface`.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Rejected`] on a nack, or a transport error.
    fn set_mac_address(&self, bus: &mut dyn Bus, interface: u8, mac: MacAddress) -> Result<(), ProtocolError>;
}

/// IPv4 addressing of network interfaces.
pub trait Ipv4Protocol: ProtocolImplementation {
    /// Whether DHCP configures `interface`.
    ///
    /// # Errors
    /// Propagates transport, framing and decode errors.
    fn dhcp_enabled(&self, bus: &mut dyn Bus, interface: u8) -> Result<bool, ProtocolError>;

    /// Enable or disable DHCP on `interface`.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Rejected`] on a nack, or a transport error.
    fn set_dhcp_enabled(&self, bus: &mut dyn Bus, interface: u8, enable: bool) -> Result<(), ProtocolError>;

    /// Number of static addresses on `interface`.
    ///
    /// # Errors
    /// Propagates transport, framing and decode errors.
    fn address_count(&self, bus: &mut dyn Bus, interface: u8) -> Result<u8, ProtocolError>;

    /// Static address `index` of `interface`.
    ///
    /// # Errors
    /// Propagates transport, framing and decode errors.
    fn address(&self, bus: &mut dyn Bus, interface: u8, index: u8) -> Result<Ipv4Assignment, ProtocolError>;

    /// Every static address of `interface`, in index order.
    ///
    /// # Errors
    /// Propagates the first error from the count or any address read.
    fn addresses(&self, bus: &mut dyn Bus, interface: u8) -> Result<Vec<Ipv4Assignment>, ProtocolError> {
        let count = self.address_count(bus, interface)?;
        (0..count)
            .map(|index| self.address(bus, interface, index))
            .collect()
    }

    /// Add a static address to `interface`.
    ///
    /// # Errors
    /// Returns [`ProtocolError::OutOfRange`] before sending if the prefix
    /// length exceeds 32, [`ProtocolError::Rejected`] on a nack, or a
    /// transport error.
    fn add_address(
        &self,
        bus: &mut dyn Bus,
        interface: u8,
        assignment: Ipv4Assignment,
    ) -> Result<(), ProtocolError>;

    /// Remove static address `index` from `interface`.
    ///
    /// # Errors
    /// Returns [`ProtocolError::OutOfRange`] before sending if `index` is
    /// not below the address count, [`ProtocolError::Rejected`] on a nack,
    /// or a transport error.
    fn delete_address(&self, bus: &mut dyn Bus, interface: u8, index: u8) -> Result<(), ProtocolError>;

    /// Default gateway of `interface`.
    ///
    /// # Errors
    /// Propagates transport, framing and decode errors.
    fn default_gateway(&self, bus: &mut dyn Bus, interface: u8) -> Result<Ipv4Addr, ProtocolError>;

    /// Change the default gateway of `interface`.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Rejected`] on a nack, or a transport error.
    fn set_default_gateway(&self, bus: &mut dyn Bus, interface: u8, gateway: Ipv4Addr) -> Result<(), ProtocolError>;
}

/// I2C master buses.
pub trait I2cMasterProtocol: ProtocolImplementation {
    /// Number of buses.
    ///
    /// # Errors
    /// Propagates transport, framing and decode errors.
    fn bus_count(&self, bus: &mut dyn Bus) -> Result<u8, ProtocolError>;

    /// Limit the clock rate of `i2c_bus`.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Rejected`] on a nack, or a transport error.
    fn set_clock_limit(&self, bus: &mut dyn Bus, i2c_bus: u8, hertz: u32) -> Result<(), ProtocolError>;

    /// Read `len` bytes from the target at `address`.
    ///
    /// # Errors
    /// Returns [`ProtocolError::OutOfRange`] before sending for addresses
    /// wider than seven bits, or transport, framing and decode errors.
    fn read(&self, bus: &mut dyn Bus, i2c_bus: u8, address: u8, len: u16) -> Result<Vec<u8>, ProtocolError>;

    /// Write `data` to the target at `address`.
    ///
    /// # Errors
    /// As [`I2cMasterProtocol::read`], plus [`ProtocolError::Rejected`] on
    /// a nack.
    fn write(&self, bus: &mut dyn Bus, i2c_bus: u8, address: u8, data: &[u8]) -> Result<(), ProtocolError>;
}
