//! Layered connection configuration.
//!
//! Values are merged, lowest precedence first, from built-in defaults, an
//! optional `spectrolink.toml` in the working directory, `SPECTROLINK_*`
//! environment variables and explicit overrides such as command-line
//! flags.

use std::{net::SocketAddr, time::Duration};

use clap::{Args, ValueEnum};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "spectrolink.toml";
/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "SPECTROLINK_";
/// Ocean Insight USB vendor id.
pub const DEFAULT_USB_VENDOR_ID: u16 = 0x2457;
/// Product id of the default framed-protocol spectrometer.
pub const DEFAULT_USB_PRODUCT_ID: u16 = 0x4000;
/// Default RS232 line rate.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Physical transport used to reach the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// USB bulk endpoints.
    #[default]
    Usb,
    /// RS232 serial line.
    Rs232,
    /// TCP/IPv4 socket.
    Tcp,
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A provider failed or a value had the wrong type.
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),
    /// The RS232 transport was selected without a port.
    #[error("rs232 transport requires serial_port")]
    MissingSerialPort,
    /// The TCP transport was selected without an address.
    #[error("tcp transport requires tcp_address")]
    MissingTcpAddress,
    /// The TCP address did not parse.
    #[error("invalid tcp_address {address:?}: {source}")]
    InvalidTcpAddress {
        /// Configured value.
        address: String,
        /// Parse failure.
        source: std::net::AddrParseError,
    },
}

/// How to reach one device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Transport to open.
    pub transport: TransportKind,
    /// Serial device path for the RS232 transport.
    pub serial_port: Option<String>,
    /// RS232 line rate.
    pub baud_rate: u32,
    /// `host:port` for the TCP transport.
    pub tcp_address: Option<String>,
    /// USB vendor id.
    pub usb_vendor_id: u16,
    /// USB product id.
    pub usb_product_id: u16,
    /// Which matching USB device to open, counting from zero.
    pub usb_index: usize,
    /// Per-call I/O timeout; stream transports block indefinitely when
    /// unset.
    pub io_timeout_ms: Option<u64>,
    /// Pad USB transfers to four-byte multiples.
    pub word_aligned: bool,
    /// The USB device is a legacy 2K/4K-pixel spectrometer: commands use
    /// the legacy endpoint pair and spectra arrive split across two
    /// endpoints.
    pub legacy_usb: bool,
    /// `tracing` filter directive used by binaries when `RUST_LOG` is
    /// unset.
    pub log_filter: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            transport: TransportKind::Usb,
            serial_port: None,
            baud_rate: DEFAULT_BAUD_RATE,
            tcp_address: None,
            usb_vendor_id: DEFAULT_USB_VENDOR_ID,
            usb_product_id: DEFAULT_USB_PRODUCT_ID,
            usb_index: 0,
            io_timeout_ms: None,
            word_aligned: false,
            legacy_usb: false,
            log_filter: "info".to_owned(),
        }
    }
}

/// Command-line overrides; unset flags leave lower layers untouched.
#[derive(Args, Debug, Clone, Default, Serialize)]
pub struct ConnectionArgs {
    /// Transport to open.
    #[arg(long, value_enum)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport: Option<TransportKind>,
    /// Serial device path.
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_port: Option<String>,
    /// RS232 line rate.
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baud_rate: Option<u32>,
    /// TCP `host:port`.
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tcp_address: Option<String>,
    /// Which matching USB device to open.
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usb_index: Option<usize>,
    /// Per-call I/O timeout in milliseconds.
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub io_timeout_ms: Option<u64>,
}

impl ConnectionConfig {
    /// Defaults, configuration file and environment, without overrides.
    #[must_use]
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load every layer and apply `overrides` last.
    ///
    /// # Errors
    /// Returns [`ConfigError::Load`] if a layer cannot be read or a value
    /// has the wrong type, or a validation error.
    pub fn load(overrides: &ConnectionArgs) -> Result<Self, ConfigError> {
        let config: Self = Self::figment()
            .merge(Serialized::defaults(overrides))
            .extract()
            .map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the selected transport has its parameters.
    ///
    /// # Errors
    /// Returns the [`ConfigError`] describing the first missing or invalid
    /// parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.transport {
            TransportKind::Usb => Ok(()),
            TransportKind::Rs232 => self
                .serial_port
                .as_ref()
                .map(|_| ())
                .ok_or(ConfigError::MissingSerialPort),
            TransportKind::Tcp => self.tcp_socket_addr().map(|_| ()),
        }
    }

    /// Parsed TCP address.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingTcpAddress`] or
    /// [`ConfigError::InvalidTcpAddress`].
    pub fn tcp_socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let address = self
            .tcp_address
            .as_deref()
            .ok_or(ConfigError::MissingTcpAddress)?;
        address
            .parse()
            .map_err(|source| ConfigError::InvalidTcpAddress {
                address: address.to_owned(),
                source,
            })
    }

    /// Configured I/O timeout.
    #[must_use]
    pub fn io_timeout(&self) -> Option<Duration> { self.io_timeout_ms.map(Duration::from_millis) }
}
