//! Capability protocols and dispatch by wire protocol.
//!
//! A feature holds one [`ProtocolHelpers`] table per capability and asks it
//! for the implementation matching the protocol the device speaks. Lookup
//! is a plain comparison of [`ProtocolFamily`] tags.

pub mod capabilities;
pub mod legacy;
pub mod obp;

pub use capabilities::{
    CalibrationProtocol,
    EepromProtocol,
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
use tracing::debug;

use crate::{
    identity::{FeatureFamily, ProtocolFamily},
    transaction::ProtocolError,
};

/// Implementations of one capability, keyed by wire protocol.
pub struct ProtocolHelpers<T: ?Sized> {
    feature: FeatureFamily,
    helpers: Vec<Box<T>>,
}

impl<T: ProtocolImplementation + ?Sized> ProtocolHelpers<T> {
    /// Create an empty table for `feature`.
    #[must_use]
    pub const fn new(feature: FeatureFamily) -> Self {
        Self {
            feature,
            helpers: Vec::new(),
        }
    }

    /// Register an implementation, replacing any for the same protocol.
    #[must_use]
    pub fn with(mut self, helper: Box<T>) -> Self {
        let protocol = helper.protocol();
        self.helpers.retain(|existing| existing.protocol() != protocol);
        self.helpers.push(helper);
        self
    }

    /// Capability served by this table.
    #[must_use]
    pub const fn feature(&self) -> FeatureFamily { self.feature }

    /// Protocols with a registered implementation, in registration order.
    pub fn protocols(&self) -> impl Iterator<Item = ProtocolFamily> + '_ {
        self.helpers.iter().map(|helper| helper.protocol())
    }

    /// Implementation for `protocol`.
    ///
    /// # Errors
    /// Returns [`ProtocolError::UnsupportedProtocol`] when none is
    /// registered.
    pub fn lookup(&self, protocol: ProtocolFamily) -> Result<&T, ProtocolError> {
        debug!(feature = %self.feature, %protocol, "resolving protocol helper");
        self.helpers
            .iter()
            .find(|helper| helper.protocol() == protocol)
            .map(|helper| &**helper)
            .ok_or(ProtocolError::UnsupportedProtocol {
                feature: self.feature,
                protocol,
            })
    }
}

/// Serial number readout over both protocols.
#[must_use]
pub fn serial_number_helpers() -> ProtocolHelpers<dyn SerialNumberProtocol> {
    ProtocolHelpers::<dyn SerialNumberProtocol>::new(FeatureFamily::SerialNumber)
        .with(Box::new(obp::ObpSerialNumber))
        .with(Box::new(legacy::LegacySerialNumber))
}

/// Spectrum acquisition over both protocols; legacy devices need their
/// pixel count.
#[must_use]
pub fn spectrometer_helpers(legacy_pixels: usize) -> ProtocolHelpers<dyn SpectrometerProtocol> {
    ProtocolHelpers::<dyn SpectrometerProtocol>::new(FeatureFamily::Spectrometer)
        .with(Box::new(obp::ObpSpectrometer))
        .with(Box::new(legacy::LegacySpectrometer::new(legacy_pixels)))
}

/// IPv4 addressing; only the framed protocol carries network settings.
#[must_use]
pub fn ipv4_helpers() -> ProtocolHelpers<dyn Ipv4Protocol> {
    ProtocolHelpers::<dyn Ipv4Protocol>::new(FeatureFamily::Ipv4).with(Box::new(obp::ObpIpv4))
}
