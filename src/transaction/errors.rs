//! Error types for transactions, exchanges, and capability protocols.

use thiserror::Error;

use crate::{
    identity::{BusFamily, FeatureFamily, Hint, ProtocolFamily},
    message::{FramingError, MessageType},
    transfer::TransferError,
};

/// Errors surfaced by the protocol layer to its callers.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// A response frame was malformed.
    #[error(transparent)]
    Framing(#[from] FramingError),
    /// The bus transport failed to move bytes.
    #[error("bus transport failure: {0}")]
    Transport(#[from] TransferError),
    /// The response answered a different request.
    #[error("response type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Type of the request.
        expected: MessageType,
        /// Type carried by the response.
        actual: MessageType,
    },
    /// The bus has no helper for the hint an exchange needs.
    #[error("no {hint} transfer helper on {bus} bus")]
    NoHelper {
        /// Bus that was asked.
        bus: BusFamily,
        /// Hint that could not be served.
        hint: Hint,
    },
    /// No capability implementation exists for the device's protocol.
    #[error("no {feature} implementation for the {protocol} protocol")]
    UnsupportedProtocol {
        /// Capability that was requested.
        feature: FeatureFamily,
        /// Protocol the device speaks.
        protocol: ProtocolFamily,
    },
    /// The device returned no data for a query.
    #[error("device returned no data for {0}")]
    NoResponse(MessageType),
    /// A command response carried neither ack nor nack.
    #[error("device neither acknowledged nor rejected {0}")]
    MissingAck(MessageType),
    /// The device rejected a command.
    #[error("device rejected {0}")]
    Rejected(MessageType),
    /// A response payload was shorter than its layout requires.
    #[error("response too short: need {expected} bytes, got {actual}")]
    ResponseTooShort {
        /// Bytes the layout requires.
        expected: usize,
        /// Bytes received.
        actual: usize,
    },
    /// A legacy response did not end with its sync byte.
    #[error("legacy response ended with {0:#04x} instead of the sync byte")]
    MissingSyncByte(u8),
    /// An argument failed client-side validation; nothing was sent.
    #[error("{what} {value} out of range (max {max})")]
    OutOfRange {
        /// Name of the argument.
        what: &'static str,
        /// Rejected value.
        value: u64,
        /// Largest accepted value.
        max: u64,
    },
}
