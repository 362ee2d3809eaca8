//! Little-endian field extraction for response payloads.
//!
//! Values are assembled from copied byte arrays, never by reinterpreting
//! the buffer in place.

#![expect(clippy::little_endian_bytes, reason = "wire format is little-endian")]

use crate::transaction::ProtocolError;

/// Copy `N` bytes starting at `offset`.
///
/// # Errors
/// Returns [`ProtocolError::ResponseTooShort`] if `data` ends early.
pub fn array_at<const N: usize>(data: &[u8], offset: usize) -> Result<[u8; N], ProtocolError> {
    data.get(offset..offset + N)
        .and_then(|bytes| <[u8; N]>::try_from(bytes).ok())
        .ok_or(ProtocolError::ResponseTooShort {
            expected: offset + N,
            actual: data.len(),
        })
}

/// Read the byte at `offset`.
///
/// # Errors
/// Returns [`ProtocolError::ResponseTooShort`] if `data` ends early.
pub fn u8_at(data: &[u8], offset: usize) -> Result<u8, ProtocolError> {
    let [byte] = array_at::<1>(data, offset)?;
    Ok(byte)
}

/// Read a boolean encoded as one non-zero byte.
///
/// # Errors
/// Returns [`ProtocolError::ResponseTooShort`] if `data` is empty.
pub fn bool_at(data: &[u8], offset: usize) -> Result<bool, ProtocolError> {
    Ok(u8_at(data, offset)? != 0)
}

/// Read a little-endian `u16` at `offset`.
///
/// # Errors
/// Returns [`ProtocolError::ResponseTooShort`] if `data` ends early.
pub fn u16_at(data: &[u8], offset: usize) -> Result<u16, ProtocolError> {
    array_at(data, offset).map(u16::from_le_bytes)
}

/// Read a little-endian `u32` at `offset`.
///
/// # Errors
/// Returns [`ProtocolError::ResponseTooShort`] if `data` ends early.
pub fn u32_at(data: &[u8], offset: usize) -> Result<u32, ProtocolError> {
    array_at(data, offset).map(u32::from_le_bytes)
}

/// Read a little-endian IEEE-754 single at `offset`.
///
/// # Errors
/// Returns [`ProtocolError::ResponseTooShort`] if `data` ends early.
pub fn f32_at(data: &[u8], offset: usize) -> Result<f32, ProtocolError> {
    array_at(data, offset).map(f32::from_le_bytes)
}

/// Decode consecutive little-endian singles, ignoring a trailing partial
/// value.
#[must_use]
pub fn f32_list(data: &[u8]) -> Vec<f32> {
    data.chunks_exact(4)
        .filter_map(|chunk| <[u8; 4]>::try_from(chunk).ok())
        .map(f32::from_le_bytes)
        .collect()
}

/// Decode consecutive little-endian `u16` values, ignoring a trailing odd
/// byte.
#[must_use]
pub fn u16_list(data: &[u8]) -> Vec<u16> {
    data.chunks_exact(2)
        .filter_map(|chunk| <[u8; 2]>::try_from(chunk).ok())
        .map(u16::from_le_bytes)
        .collect()
}

/// Decode a string, stopping at the first NUL.
///
/// Invalid UTF-8 is replaced rather than rejected; device strings are
/// nominally ASCII.
#[must_use]
pub fn string(data: &[u8]) -> String {
    let end = data.iter().position(|b| *b == 0).unwrap_or(data.len());
    String::from_utf8_lossy(data.get(..end).unwrap_or_default()).into_owned()
}
