//! Capability implementations over the legacy command set.

use super::capabilities::{EepromProtocol, ProtocolImplementation, SerialNumberProtocol, SpectrometerProtocol};
use crate::{
    bus::Bus,
    exchange::{decode, helper_for},
    identity::{Hint, ProtocolFamily},
    legacy::{self, EEPROM_SLOT_LEN},
    transaction::ProtocolError,
};

/// Information slot holding the serial number.
pub const SERIAL_NUMBER_SLOT: u8 = 0;

/// Serial number read from information slot 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacySerialNumber;

/// Slot-addressed information storage.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyEeprom;

/// Acquisition for legacy spectrometers with a fixed pixel count.
#[derive(Debug, Clone, Copy)]
pub struct LegacySpectrometer {
    pixels: usize,
}

impl LegacySpectrometer {
    /// Create an implementation reading `pixels` counts per spectrum.
    #[must_use]
    pub const fn new(pixels: usize) -> Self { Self { pixels } }
}

impl ProtocolImplementation for LegacySerialNumber {
    fn protocol(&self) -> ProtocolFamily { ProtocolFamily::Legacy }
}

impl ProtocolImplementation for LegacyEeprom {
    fn protocol(&self) -> ProtocolFamily { ProtocolFamily::Legacy }
}

impl ProtocolImplementation for LegacySpectrometer {
    fn protocol(&self) -> ProtocolFamily { ProtocolFamily::Legacy }
}

impl SerialNumberProtocol for LegacySerialNumber {
    fn serial_number(&self, bus: &mut dyn Bus) -> Result<String, ProtocolError> {
        let data = LegacyEeprom.read_slot(bus, SERIAL_NUMBER_SLOT)?;
        Ok(decode::string(&data))
    }

    fn serial_number_max_length(&self, _bus: &mut dyn Bus) -> Result<u8, ProtocolError> {
        Ok(u8::try_from(EEPROM_SLOT_LEN).unwrap_or(u8::MAX))
    }
}

impl EepromProtocol for LegacyEeprom {
    fn read_slot(&self, bus: &mut dyn Bus, slot: u8) -> Result<Vec<u8>, ProtocolError> {
        legacy::read_eeprom_slot(helper_for(bus, Hint::Control)?, slot)
    }

    fn write_slot(&self, bus: &mut dyn Bus, slot: u8, data: &[u8]) -> Result<(), ProtocolError> {
        legacy::write_eeprom_slot(helper_for(bus, Hint::Control)?, slot, data)
    }
}

impl SpectrometerProtocol for LegacySpectrometer {
    fn set_integration_time_micros(&self, bus: &mut dyn Bus, micros: u32) -> Result<(), ProtocolError> {
        legacy::set_integration_time(helper_for(bus, Hint::Control)?, micros)
    }

    fn set_trigger_mode(&self, bus: &mut dyn Bus, mode: u8) -> Result<(), ProtocolError> {
        legacy::set_trigger_mode(helper_for(bus, Hint::Control)?, mode)
    }

    fn read_raw_spectrum(&self, bus: &mut dyn Bus) -> Result<Vec<u16>, ProtocolError> {
        legacy::read_spectrum(helper_for(bus, Hint::Spectrum)?, self.pixels)
    }
}
