//! Encoding and decoding of self-describing protocol frames.
//!
//! Every frame starts with a fixed 44-byte header (magic, version, flags,
//! error number, message type, correlation id, checksum type, up to 16 bytes
//! of immediate data, and a bytes-remaining count), followed by an optional
//! extended payload, a 16-byte checksum slot, and a 4-byte footer. A frame
//! without extended payload is exactly [`HEADER_BLOCK_LEN`] bytes long, which
//! is what a transaction reads before deciding whether more bytes follow.
//!
//! The checksum slot is always written as zeros and never verified; the
//! devices in the field do not enforce it either.

pub mod errors;
pub mod flags;
pub mod frame;
pub mod message_type;

pub use errors::FramingError;
pub use flags::MessageFlags;
pub use frame::Message;
pub use message_type::MessageType;

/// Start-of-frame marker.
pub const MAGIC: [u8; 2] = [0xC1, 0xC0];
/// End-of-frame sentinel.
pub const FOOTER: [u8; 4] = [0xC5, 0xC4, 0xC3, 0xC2];
/// Length of the fixed header fields, up to and including bytes-remaining.
pub const HEADER_LEN: usize = 44;
/// Length of the checksum slot.
pub const CHECKSUM_LEN: usize = 16;
/// Length of the footer.
pub const FOOTER_LEN: usize = 4;
/// Checksum plus footer; the smallest legal bytes-remaining value.
pub const TRAILER_LEN: usize = CHECKSUM_LEN + FOOTER_LEN;
/// Size of a frame with no extended payload.
pub const HEADER_BLOCK_LEN: usize = HEADER_LEN + TRAILER_LEN;
/// Capacity of the inline immediate-data slot.
pub const MAX_IMMEDIATE_LEN: usize = 16;
/// Protocol version stamped on outgoing frames.
pub const PROTOCOL_VERSION: u16 = 0x1100;
/// Largest extended payload accepted from or sent to a device.
pub const MAX_PAYLOAD_LEN: usize = 1024 * 1024; // 1 MiB
