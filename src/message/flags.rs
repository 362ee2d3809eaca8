//! Header flag bits.

use bitflags::bitflags;

bitflags! {
    /// Flag word at offset 4 of every frame.
    ///
    /// Unknown bits received from a device are retained so a decoded frame
    /// re-encodes to the same bytes.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MessageFlags: u16 {
        /// Bit 0: the frame is a response.
        const RESPONSE = 1 << 0;
        /// Bit 1: the device acknowledged the request.
        const ACK = 1 << 1;
        /// Bit 2: the sender wants an acknowledgement.
        const ACK_REQUESTED = 1 << 2;
        /// Bit 3: the device rejected the request.
        const NACK = 1 << 3;
        /// Bit 4: the device hit an exception handling the request.
        const EXCEPTION = 1 << 4;
    }
}

impl MessageFlags {
    /// Check whether the acknowledgement bit is set.
    #[must_use]
    pub const fn is_ack(self) -> bool { self.contains(Self::ACK) }

    /// Check whether the negative-acknowledgement bit is set.
    #[must_use]
    pub const fn is_nack(self) -> bool { self.contains(Self::NACK) }

    /// Check whether this frame is a response.
    #[must_use]
    pub const fn is_response(self) -> bool { self.contains(Self::RESPONSE) }
}
