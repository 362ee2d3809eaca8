//! Catalog of single-operation request/response pairings.
//!
//! Each exchange is a small value type that knows its message type, the
//! payload it sends, the bus hint it needs and how to decode the reply.
//! [`query`] and [`command`] resolve a transfer helper on the bus and run
//! the exchange through a [`Transaction`].

pub mod acquisition;
pub mod binning;
pub mod calibration;
pub mod decode;
pub mod gpio;
pub mod i2c;
pub mod identity;
pub mod ipv4;
pub mod light_source;
pub mod network;
pub mod strobe;
pub mod temperature;

use tracing::debug;

use crate::{
    bus::Bus,
    identity::Hint,
    message::MessageType,
    transaction::{ProtocolError, Transaction},
    transfer::TransferHelper,
};

/// An operation that reads a typed value from the device.
pub trait Query {
    /// Decoded reply type.
    type Output;

    /// Message type of the request.
    fn message_type(&self) -> MessageType;

    /// Channel the exchange runs on.
    fn hint(&self) -> Hint { Hint::Control }

    /// Request payload; empty for most queries.
    fn payload(&self) -> Vec<u8> { Vec::new() }

    /// Decode the response data.
    ///
    /// # Errors
    /// Returns [`ProtocolError::ResponseTooShort`] if `data` does not cover
    /// the reply layout.
    fn decode(&self, data: &[u8]) -> Result<Self::Output, ProtocolError>;
}

/// An operation that changes device state and expects an acknowledgement.
pub trait Command {
    /// Message type of the request.
    fn message_type(&self) -> MessageType;

    /// Channel the exchange runs on.
    fn hint(&self) -> Hint { Hint::Control }

    /// Encoded command arguments.
    fn payload(&self) -> Vec<u8>;
}

/// Resolve the helper serving `hint`.
///
/// # Errors
/// Returns [`ProtocolError::NoHelper`] when the bus has no such helper.
pub fn helper_for(bus: &mut dyn Bus, hint: Hint) -> Result<&mut dyn TransferHelper, ProtocolError> {
    let family = bus.family();
    bus.helper(hint)
        .ok_or(ProtocolError::NoHelper { bus: family, hint })
}

/// Run `exchange`, returning `Ok(None)` when the device reports no data.
///
/// # Errors
/// Returns [`ProtocolError::NoHelper`] if the bus cannot serve the
/// exchange's hint, any transaction error, or a decode error.
pub fn try_query<Q: Query + ?Sized>(
    bus: &mut dyn Bus,
    exchange: &Q,
) -> Result<Option<Q::Output>, ProtocolError> {
    let message_type = exchange.message_type();
    let helper = helper_for(bus, exchange.hint())?;
    let payload = exchange.payload();
    match Transaction::new(helper).query(message_type, &payload)? {
        Some(data) => {
            debug!(%message_type, bytes = data.len(), "decoding query response");
            exchange.decode(&data).map(Some)
        }
        None => Ok(None),
    }
}

/// Run `exchange`, treating a missing reply as an error.
///
/// # Errors
/// As [`try_query`], plus [`ProtocolError::NoResponse`] when the device
/// returns no data.
pub fn query<Q: Query + ?Sized>(bus: &mut dyn Bus, exchange: &Q) -> Result<Q::Output, ProtocolError> {
    try_query(bus, exchange)?.ok_or(ProtocolError::NoResponse(exchange.message_type()))
}

/// Run `exchange`, returning whether the device acknowledged it.
///
/// # Errors
/// Returns [`ProtocolError::NoHelper`] if the bus cannot serve the
/// exchange's hint, or any transaction error.
pub fn command<C: Command + ?Sized>(bus: &mut dyn Bus, exchange: &C) -> Result<bool, ProtocolError> {
    let helper = helper_for(bus, exchange.hint())?;
    Transaction::new(helper).command(exchange.message_type(), &exchange.payload())
}

/// Run `exchange` and fail unless the device acknowledged it.
///
/// # Errors
/// As [`command`], plus [`ProtocolError::Rejected`] when the device nacks.
pub fn require_ack<C: Command + ?Sized>(bus: &mut dyn Bus, exchange: &C) -> Result<(), ProtocolError> {
    if command(bus, exchange)? {
        Ok(())
    } else {
        Err(ProtocolError::Rejected(exchange.message_type()))
    }
}
