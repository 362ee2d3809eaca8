//! Open a bus from a [`ConnectionConfig`].

use std::{sync::Arc, time::Duration};

use thiserror::Error;
use tracing::info;

use crate::{
    bus::HelperBus,
    config::{ConfigError, ConnectionConfig, TransportKind},
    identity::{BusFamily, Hint},
    transfer::{
        BulkEndpoints,
        PaddedTransferHelper,
        SplitReadTransferHelper,
        TransferError,
        UsbTransferHelper,
        stream,
    },
};

/// Bulk OUT endpoint of framed-protocol USB devices.
pub const OBP_SEND_ENDPOINT: u8 = 0x01;
/// Bulk IN endpoint of framed-protocol USB devices.
pub const OBP_RECEIVE_ENDPOINT: u8 = 0x81;
/// Bulk OUT endpoint carrying legacy commands.
pub const LEGACY_SEND_ENDPOINT: u8 = 0x01;
/// Bulk IN endpoint carrying legacy command replies.
pub const LEGACY_CONTROL_ENDPOINT: u8 = 0x81;
/// Bulk IN endpoint delivering the tail of a legacy spectrum.
pub const LEGACY_PRIMARY_SPECTRUM_ENDPOINT: u8 = 0x82;
/// Bulk IN endpoint delivering the head of a legacy spectrum.
pub const LEGACY_SECONDARY_SPECTRUM_ENDPOINT: u8 = 0x86;
/// Connect timeout for TCP transports without an explicit I/O timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Failures while opening a connection.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// The configuration is incomplete.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The transport could not be opened.
    #[error("failed to open transport: {0}")]
    Transfer(#[from] TransferError),
    /// The transport was not compiled in.
    #[error("{0} support is not enabled in this build")]
    Disabled(&'static str),
}

/// Open the transport described by `config` as a bus.
///
/// Framed-protocol USB devices get one endpoint pair serving every hint,
/// wrapped in the word-aligned helper when `word_aligned` is set. With
/// `legacy_usb` the bus is composed by [`legacy_usb_bus`] instead. Stream
/// transports use one helper for every hint.
///
/// # Errors
/// Returns [`ConnectError::Config`] if the configuration is incomplete,
/// [`ConnectError::Transfer`] if the transport cannot be opened, or
/// [`ConnectError::Disabled`] if its feature is not compiled in.
pub fn open_bus(config: &ConnectionConfig) -> Result<HelperBus, ConnectError> {
    config.validate()?;
    let bus = match config.transport {
        TransportKind::Usb => open_usb(config)?,
        TransportKind::Rs232 => open_serial(config)?,
        TransportKind::Tcp => {
            let address = config.tcp_socket_addr()?;
            let helper = stream::open_tcp(address, config.io_timeout().unwrap_or(DEFAULT_CONNECT_TIMEOUT))?
                .with_deadline(config.io_timeout());
            HelperBus::single(BusFamily::TcpIpv4, helper)
        }
    };
    info!(transport = ?config.transport, "connection opened");
    Ok(bus)
}

/// Bus of a framed-protocol USB device: one endpoint pair for every hint.
#[must_use]
pub fn obp_usb_bus<D: BulkEndpoints + ?Sized + 'static>(
    device: Arc<D>,
    timeout: Duration,
    word_aligned: bool,
) -> HelperBus {
    let helper = UsbTransferHelper::new(device, OBP_SEND_ENDPOINT, OBP_RECEIVE_ENDPOINT).with_timeout(timeout);
    if word_aligned {
        HelperBus::single(BusFamily::Usb, PaddedTransferHelper::new(helper))
    } else {
        HelperBus::single(BusFamily::Usb, helper)
    }
}

/// Bus of a legacy 2K/4K-pixel USB spectrometer.
///
/// Commands and their replies use the control endpoint pair; spectra are
/// read secondary-then-primary through a [`SplitReadTransferHelper`]
/// registered for [`Hint::Spectrum`].
#[must_use]
pub fn legacy_usb_bus<D: BulkEndpoints + ?Sized + 'static>(device: Arc<D>, timeout: Duration) -> HelperBus {
    let control = UsbTransferHelper::new(Arc::clone(&device), LEGACY_SEND_ENDPOINT, LEGACY_CONTROL_ENDPOINT)
        .with_timeout(timeout);
    let spectrum = SplitReadTransferHelper::new(
        device,
        LEGACY_SEND_ENDPOINT,
        LEGACY_PRIMARY_SPECTRUM_ENDPOINT,
        LEGACY_SECONDARY_SPECTRUM_ENDPOINT,
    )
    .with_timeout(timeout);
    HelperBus::new(BusFamily::Usb)
        .with_helper(Hint::Control, control)
        .with_helper(Hint::Spectrum, spectrum)
}

#[cfg(feature = "usb")]
fn open_usb(config: &ConnectionConfig) -> Result<HelperBus, ConnectError> {
    use crate::transfer::{DEFAULT_USB_TIMEOUT, open_usb_device};

    let device = open_usb_device(config.usb_vendor_id, config.usb_product_id, config.usb_index)?;
    let timeout = config.io_timeout().unwrap_or(DEFAULT_USB_TIMEOUT);
    Ok(if config.legacy_usb {
        legacy_usb_bus(device, timeout)
    } else {
        obp_usb_bus(device, timeout, config.word_aligned)
    })
}

#[cfg(not(feature = "usb"))]
fn open_usb(_config: &ConnectionConfig) -> Result<HelperBus, ConnectError> { Err(ConnectError::Disabled("usb")) }

#[cfg(feature = "serial")]
fn open_serial(config: &ConnectionConfig) -> Result<HelperBus, ConnectError> {
    let path = config
        .serial_port
        .as_deref()
        .ok_or(ConfigError::MissingSerialPort)?;
    let helper = stream::open_rs232(path, config.baud_rate, stream::ZERO_PROGRESS_BACKOFF)?
        .with_deadline(config.io_timeout());
    Ok(HelperBus::single(BusFamily::Rs232, helper))
}

#[cfg(not(feature = "serial"))]
fn open_serial(_config: &ConnectionConfig) -> Result<HelperBus, ConnectError> {
    Err(ConnectError::Disabled("serial"))
}

#[cfg(test)]
mod tests {
    #![expect(clippy::little_endian_bytes, reason = "wire format is little-endian")]

    use super::*;
    use crate::{
        exchange::helper_for,
        legacy::{SPECTRUM_SYNC_BYTE, opcode},
        message::MessageType,
        protocol::{SpectrometerProtocol, legacy::LegacySpectrometer},
        test_helpers::{ScriptedEndpoints, response_frame},
        transaction::query_device,
        transfer::DEFAULT_USB_TIMEOUT,
    };

    #[test]
    fn legacy_usb_spectrum_reads_both_spectrum_endpoints() {
        let pixels: Vec<u16> = (0..1100).collect();
        let mut raw: Vec<u8> = pixels.iter().flat_map(|p| p.to_le_bytes()).collect();
        raw.push(SPECTRUM_SYNC_BYTE);
        let (head, tail) = raw.split_at(2048);

        let endpoints = Arc::new(ScriptedEndpoints::default());
        endpoints.push_read(LEGACY_SECONDARY_SPECTRUM_ENDPOINT, head.to_vec());
        endpoints.push_read(LEGACY_PRIMARY_SPECTRUM_ENDPOINT, tail.to_vec());
        let mut bus = legacy_usb_bus(Arc::clone(&endpoints), DEFAULT_USB_TIMEOUT);

        let spectrometer = LegacySpectrometer::new(pixels.len());
        spectrometer
            .set_integration_time_micros(&mut bus, 10_000)
            .expect("integration time");
        assert_eq!(spectrometer.read_raw_spectrum(&mut bus).expect("spectrum"), pixels);

        let writes = endpoints.writes();
        let opcodes: Vec<(u8, u8)> = writes
            .iter()
            .filter_map(|(endpoint, bytes)| bytes.first().map(|op| (*endpoint, *op)))
            .collect();
        assert_eq!(
            opcodes,
            vec![
                (LEGACY_SEND_ENDPOINT, opcode::SET_INTEGRATION_TIME),
                (LEGACY_SEND_ENDPOINT, opcode::REQUEST_SPECTRUM),
            ]
        );
    }

    #[test]
    fn word_aligned_obp_bus_pads_requests() {
        let endpoints = Arc::new(ScriptedEndpoints::default());
        endpoints.push_read(OBP_RECEIVE_ENDPOINT, response_frame(MessageType::GetUserString, &[]));
        let mut bus = obp_usb_bus(Arc::clone(&endpoints), DEFAULT_USB_TIMEOUT, true);

        let helper = helper_for(&mut bus, Hint::Spectrum).expect("fallback helper");
        query_device(helper, MessageType::GetUserString, &[7; 17])
            .expect("query")
            .expect("data");
        let writes = endpoints.writes();
        let (endpoint, request) = writes.first().expect("request written");
        assert_eq!(*endpoint, OBP_SEND_ENDPOINT);
        assert_eq!(request.len(), 84);
    }

    #[test]
    fn incomplete_config_fails_before_io() {
        let config = ConnectionConfig {
            transport: TransportKind::Tcp,
            ..ConnectionConfig::default()
        };
        assert!(matches!(
            open_bus(&config),
            Err(ConnectError::Config(ConfigError::MissingTcpAddress))
        ));
    }
}
