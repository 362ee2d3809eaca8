//! Blocking byte transports used by the protocol layer.
//!
//! A [`TransferHelper`] moves bytes over exactly one transport configuration:
//! a USB endpoint pair, a word-aligned USB pair, a split spectrum read across
//! two endpoints, or a serial/TCP byte stream. Every call blocks until the
//! requested length has been moved or a hard transport error occurs.
//!
//! Helpers are owned by one bus for one physical connection; the layer
//! performs no locking, so callers serialise access per connection.

use std::time::Duration;

pub mod errors;
pub mod padded;
pub mod split;
pub mod stream;
pub mod usb;

pub use errors::TransferError;
pub use padded::PaddedTransferHelper;
pub use split::SplitReadTransferHelper;
pub use stream::StreamTransferHelper;
pub use usb::{BulkEndpoints, UsbTransferHelper};
#[cfg(feature = "usb")]
pub use usb::open_usb_device;

/// Timeout passed to every USB bulk call.
pub const DEFAULT_USB_TIMEOUT: Duration = Duration::from_secs(5);

/// Uniform blocking send/receive over one transport.
pub trait TransferHelper: Send {
    /// Send all of `data`, returning the number of bytes sent.
    ///
    /// # Errors
    /// Returns a [`TransferError`] if the transport fails.
    fn send(&mut self, data: &[u8]) -> Result<usize, TransferError>;

    /// Fill `buf` from the transport, returning the number of bytes received.
    ///
    /// # Errors
    /// Returns a [`TransferError`] if the transport fails.
    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, TransferError>;

    /// Receive exactly `len` bytes into a fresh buffer.
    ///
    /// # Errors
    /// Returns [`TransferError::ShortTransfer`] if fewer bytes arrive, or any
    /// transport error from [`TransferHelper::receive`].
    fn receive_exact(&mut self, len: usize) -> Result<Vec<u8>, TransferError> {
        let mut buf = vec![0u8; len];
        let received = self.receive(&mut buf)?;
        if received != len {
            return Err(TransferError::ShortTransfer {
                expected: len,
                actual: received,
            });
        }
        Ok(buf)
    }

    /// Send all of `data`, failing unless every byte was accepted.
    ///
    /// # Errors
    /// Returns [`TransferError::ShortTransfer`] on a partial send, or any
    /// transport error from [`TransferHelper::send`].
    fn send_all(&mut self, data: &[u8]) -> Result<(), TransferError> {
        let sent = self.send(data)?;
        if sent != data.len() {
            return Err(TransferError::ShortTransfer {
                expected: data.len(),
                actual: sent,
            });
        }
        Ok(())
    }
}

impl<T: TransferHelper + ?Sized> TransferHelper for Box<T> {
    fn send(&mut self, data: &[u8]) -> Result<usize, TransferError> { (**self).send(data) }

    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, TransferError> {
        (**self).receive(buf)
    }
}
