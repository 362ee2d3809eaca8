//! Error types for frame decoding and encoding.

use thiserror::Error;

/// Errors raised when bytes do not form a well-formed frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FramingError {
    /// The first two bytes are not the start-of-frame marker.
    #[error("bad start-of-frame marker {0:02x?}")]
    BadMagic([u8; 2]),
    /// The four bytes after the checksum are not the footer sentinel.
    #[error("bad footer {0:02x?}")]
    BadFooter([u8; 4]),
    /// bytes-remaining cannot even cover the checksum and footer.
    #[error("bytes remaining {0} is smaller than checksum and footer")]
    BytesRemainingTooSmall(u32),
    /// Buffer ended before the declared frame did.
    #[error("buffer too short: need {needed} bytes, have {available}")]
    ShortBuffer {
        /// Bytes required by the header.
        needed: usize,
        /// Bytes actually supplied.
        available: usize,
    },
    /// Payload length cannot be expressed in the 32-bit length field.
    #[error("payload of {0} bytes does not fit in a frame")]
    PayloadTooLarge(usize),
}
