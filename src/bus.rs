//! Buses resolve transfer hints to concrete helpers.

use crate::{
    identity::{BusFamily, Hint},
    transfer::TransferHelper,
};

/// A connection to one device over one transport medium.
pub trait Bus {
    /// Transport family of this bus.
    fn family(&self) -> BusFamily;

    /// Helper serving `hint`, if this bus has one.
    fn helper(&mut self, hint: Hint) -> Option<&mut dyn TransferHelper>;
}

/// Bus backed by a table of hint-to-helper registrations.
///
/// USB buses register one helper per endpoint pair; stream buses (RS232,
/// TCP) register a single fallback that serves every hint.
pub struct HelperBus {
    family: BusFamily,
    helpers: Vec<(Hint, Box<dyn TransferHelper>)>,
    fallback: Option<Box<dyn TransferHelper>>,
}

impl HelperBus {
    /// Create an empty bus of the given family.
    #[must_use]
    pub const fn new(family: BusFamily) -> Self {
        Self {
            family,
            helpers: Vec::new(),
            fallback: None,
        }
    }

    /// Create a bus whose single helper serves every hint.
    #[must_use]
    pub fn single(family: BusFamily, helper: impl TransferHelper + 'static) -> Self {
        Self::new(family).with_fallback(helper)
    }

    /// Register `helper` for `hint`, replacing any previous registration.
    #[must_use]
    pub fn with_helper(mut self, hint: Hint, helper: impl TransferHelper + 'static) -> Self {
        self.add_helper(hint, Box::new(helper));
        self
    }

    /// Register the helper used for hints without their own registration.
    #[must_use]
    pub fn with_fallback(mut self, helper: impl TransferHelper + 'static) -> Self {
        self.fallback = Some(Box::new(helper));
        self
    }

    /// Register `helper` for `hint`, replacing any previous registration.
    pub fn add_helper(&mut self, hint: Hint, helper: Box<dyn TransferHelper>) {
        self.helpers.retain(|(registered, _)| *registered != hint);
        self.helpers.push((hint, helper));
    }
}

impl Bus for HelperBus {
    fn family(&self) -> BusFamily { self.family }

    fn helper(&mut self, hint: Hint) -> Option<&mut dyn TransferHelper> {
        match self
            .helpers
            .iter_mut()
            .find(|(registered, _)| *registered == hint)
        {
            Some((_, helper)) => Some(&mut **helper),
            None => match &mut self.fallback {
                Some(helper) => Some(&mut **helper),
                None => None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::ScriptedTransport;

    #[test]
    fn hint_selects_registered_helper() {
        let control = ScriptedTransport::default();
        let spectrum = ScriptedTransport::default();
        let mut bus = HelperBus::new(BusFamily::Usb)
            .with_helper(Hint::Control, control.clone())
            .with_helper(Hint::Spectrum, spectrum.clone());

        bus.helper(Hint::Spectrum)
            .expect("spectrum helper")
            .send(&[1])
            .expect("send");
        assert!(control.writes().is_empty());
        assert_eq!(spectrum.writes(), vec![vec![1]]);
    }

    #[test]
    fn missing_hint_without_fallback_is_none() {
        let mut bus =
            HelperBus::new(BusFamily::Usb).with_helper(Hint::Control, ScriptedTransport::default());
        assert!(bus.helper(Hint::Spectrum).is_none());
    }

    #[test]
    fn fallback_serves_every_hint() {
        let stream = ScriptedTransport::default();
        let mut bus = HelperBus::single(BusFamily::Rs232, stream.clone());
        assert_eq!(bus.family(), BusFamily::Rs232);
        assert!(bus.helper(Hint::Control).is_some());
        assert!(bus.helper(Hint::Spectrum).is_some());
    }
}
