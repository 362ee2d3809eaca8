//! Fixed-offset framing of the legacy command set.
//!
//! A legacy request is one opcode byte followed by little-endian
//! arguments. Replies have a fixed length known from the opcode; there is
//! no header, length field or acknowledgement. Only the operations shared
//! with the framed protocol are modelled here.

#![expect(clippy::little_endian_bytes, reason = "wire format is little-endian")]

use tracing::{debug, warn};

use crate::{
    exchange::decode,
    transaction::ProtocolError,
    transfer::TransferHelper,
};

/// Legacy opcode bytes.
pub mod opcode {
    /// Set the integration time.
    pub const SET_INTEGRATION_TIME: u8 = 0x02;
    /// Read one information slot.
    pub const QUERY_INFORMATION: u8 = 0x05;
    /// Write one information slot.
    pub const WRITE_INFORMATION: u8 = 0x06;
    /// Acquire and return a spectrum.
    pub const REQUEST_SPECTRUM: u8 = 0x09;
    /// Set the trigger mode.
    pub const SET_TRIGGER_MODE: u8 = 0x0A;
}

/// Highest addressable information slot.
pub const MAX_EEPROM_SLOT: u8 = 16;
/// Data bytes held by one information slot.
pub const EEPROM_SLOT_LEN: usize = 15;
/// Reply length of a slot read: opcode echo, slot echo, slot data.
pub const EEPROM_REPLY_LEN: usize = EEPROM_SLOT_LEN + 2;
/// Byte terminating every spectrum transfer.
pub const SPECTRUM_SYNC_BYTE: u8 = 0x69;

fn check_slot(slot: u8) -> Result<(), ProtocolError> {
    if slot > MAX_EEPROM_SLOT {
        return Err(ProtocolError::OutOfRange {
            what: "EEPROM slot",
            value: u64::from(slot),
            max: u64::from(MAX_EEPROM_SLOT),
        });
    }
    Ok(())
}

fn send_opcode(
    helper: &mut dyn TransferHelper,
    opcode: u8,
    args: &[u8],
) -> Result<(), ProtocolError> {
    let mut request = Vec::with_capacity(1 + args.len());
    request.push(opcode);
    request.extend_from_slice(args);
    debug!(opcode, bytes = request.len(), "sending legacy request");
    helper.send_all(&request)?;
    Ok(())
}

/// Read information slot `slot` and return its 15 data bytes.
///
/// # Errors
/// Returns [`ProtocolError::OutOfRange`] for slots above
/// [`MAX_EEPROM_SLOT`] before any I/O, or a transport error.
pub fn read_eeprom_slot(helper: &mut dyn TransferHelper, slot: u8) -> Result<Vec<u8>, ProtocolError> {
    check_slot(slot)?;
    send_opcode(helper, opcode::QUERY_INFORMATION, &[slot])?;
    let reply = helper.receive_exact(EEPROM_REPLY_LEN)?;
    let echo = decode::array_at::<2>(&reply, 0)?;
    if echo != [opcode::QUERY_INFORMATION, slot] {
        warn!(?echo, slot, "unexpected legacy information echo");
    }
    Ok(reply.get(2..).unwrap_or_default().to_vec())
}

/// Write `data` to information slot `slot`, zero-padding or truncating it
/// to the slot length.
///
/// # Errors
/// Returns [`ProtocolError::OutOfRange`] for slots above
/// [`MAX_EEPROM_SLOT`] before any I/O, or a transport error.
pub fn write_eeprom_slot(
    helper: &mut dyn TransferHelper,
    slot: u8,
    data: &[u8],
) -> Result<(), ProtocolError> {
    check_slot(slot)?;
    let mut args = vec![0u8; EEPROM_SLOT_LEN + 1];
    if let Some(first) = args.first_mut() {
        *first = slot;
    }
    let len = data.len().min(EEPROM_SLOT_LEN);
    if let (Some(dst), Some(src)) = (args.get_mut(1..=len), data.get(..len)) {
        dst.copy_from_slice(src);
    }
    send_opcode(helper, opcode::WRITE_INFORMATION, &args)
}

/// Set the integration time in microseconds.
///
/// # Errors
/// Returns a transport error if the request cannot be sent.
pub fn set_integration_time(helper: &mut dyn TransferHelper, micros: u32) -> Result<(), ProtocolError> {
    send_opcode(helper, opcode::SET_INTEGRATION_TIME, &micros.to_le_bytes())
}

/// Set the trigger mode.
///
/// # Errors
/// Returns a transport error if the request cannot be sent.
pub fn set_trigger_mode(helper: &mut dyn TransferHelper, mode: u8) -> Result<(), ProtocolError> {
    send_opcode(helper, opcode::SET_TRIGGER_MODE, &u16::from(mode).to_le_bytes())
}

/// Request a spectrum and read `pixels` little-endian counts plus the
/// trailing sync byte.
///
/// `helper` is typically a split-read helper serving the spectrum channel.
///
/// # Errors
/// Returns [`ProtocolError::OutOfRange`] before any I/O if the transfer
/// length overflows `usize`, a transport error, or
/// [`ProtocolError::MissingSyncByte`] if the transfer does not end with
/// [`SPECTRUM_SYNC_BYTE`].
pub fn read_spectrum(helper: &mut dyn TransferHelper, pixels: usize) -> Result<Vec<u16>, ProtocolError> {
    let len = pixels
        .checked_mul(2)
        .and_then(|bytes| bytes.checked_add(1))
        .ok_or(ProtocolError::OutOfRange {
            what: "spectrum pixel count",
            value: u64::try_from(pixels).unwrap_or(u64::MAX),
            max: u64::try_from(usize::MAX >> 1).unwrap_or(u64::MAX),
        })?;
    send_opcode(helper, opcode::REQUEST_SPECTRUM, &[])?;
    let mut raw = helper.receive_exact(len)?;
    match raw.pop() {
        Some(SPECTRUM_SYNC_BYTE) => Ok(decode::u16_list(&raw)),
        Some(other) => Err(ProtocolError::MissingSyncByte(other)),
        None => Err(ProtocolError::ResponseTooShort {
            expected: 1,
            actual: 0,
        }),
    }
}
