//! Transport-level failures.

use std::{io, time::Duration};

use thiserror::Error;

/// Errors raised while moving bytes over a transport.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The underlying stream or socket failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The USB stack reported an error.
    #[cfg(feature = "usb")]
    #[error("USB error: {0}")]
    Usb(#[from] rusb::Error),
    /// Opening or configuring a serial port failed.
    #[cfg(feature = "serial")]
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),
    /// Fewer bytes moved than were required.
    #[error("short transfer: expected {expected} bytes, moved {actual}")]
    ShortTransfer {
        /// Bytes requested.
        expected: usize,
        /// Bytes actually moved.
        actual: usize,
    },
    /// A word-aligned transfer moved a different length than it was padded to.
    #[error("padded transfer desynchronised: requested {requested} bytes, device moved {actual}")]
    PaddingDesync {
        /// Padded length requested.
        requested: usize,
        /// Length the device moved.
        actual: usize,
    },
    /// The configured deadline passed before the transfer completed.
    #[error("transfer timed out after {elapsed:?} with {moved} of {expected} bytes moved")]
    Timeout {
        /// Bytes requested.
        expected: usize,
        /// Bytes moved before the deadline.
        moved: usize,
        /// Time spent waiting.
        elapsed: Duration,
    },
    /// The peer closed the stream.
    #[error("transport closed by peer")]
    Closed,
    /// No device matched the requested identifiers.
    #[error("no device found: {0}")]
    NotFound(String),
}
