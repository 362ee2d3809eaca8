//! USB bulk endpoint transfers.
//!
//! [`BulkEndpoints`] abstracts a claimed USB device so helpers can be
//! exercised without hardware; with the `usb` feature it is implemented for
//! [`rusb::DeviceHandle`]. Several helpers for the same device share one
//! handle through an [`Arc`].

use std::{sync::Arc, time::Duration};

use tracing::trace;

use super::{DEFAULT_USB_TIMEOUT, TransferError, TransferHelper};

/// Bulk transfers on a claimed USB device.
pub trait BulkEndpoints: Send + Sync {
    /// Write `data` to `endpoint`, returning the number of bytes written.
    ///
    /// # Errors
    /// Returns a [`TransferError`] if the USB stack reports a failure.
    fn write_bulk(
        &self,
        endpoint: u8,
        data: &[u8],
        timeout: Duration,
    ) -> Result<usize, TransferError>;

    /// Read from `endpoint` into `buf`, returning the number of bytes read.
    ///
    /// # Errors
    /// Returns a [`TransferError`] if the USB stack reports a failure.
    fn read_bulk(
        &self,
        endpoint: u8,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, TransferError>;
}

/// Transfers over a fixed send/receive endpoint pair.
pub struct UsbTransferHelper<D: ?Sized> {
    device: Arc<D>,
    send_endpoint: u8,
    receive_endpoint: u8,
    timeout: Duration,
}

impl<D: BulkEndpoints + ?Sized> UsbTransferHelper<D> {
    /// Create a helper bound to `send_endpoint` and `receive_endpoint`.
    #[must_use]
    pub const fn new(device: Arc<D>, send_endpoint: u8, receive_endpoint: u8) -> Self {
        Self {
            device,
            send_endpoint,
            receive_endpoint,
            timeout: DEFAULT_USB_TIMEOUT,
        }
    }

    /// Override the timeout passed to each bulk call.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl<D: BulkEndpoints + ?Sized> TransferHelper for UsbTransferHelper<D> {
    fn send(&mut self, data: &[u8]) -> Result<usize, TransferError> {
        let sent = self
            .device
            .write_bulk(self.send_endpoint, data, self.timeout)?;
        trace!(endpoint = self.send_endpoint, requested = data.len(), sent, "bulk write");
        if sent != data.len() {
            return Err(TransferError::ShortTransfer {
                expected: data.len(),
                actual: sent,
            });
        }
        Ok(sent)
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, TransferError> {
        let received = self
            .device
            .read_bulk(self.receive_endpoint, buf, self.timeout)?;
        trace!(
            endpoint = self.receive_endpoint,
            requested = buf.len(),
            received,
            "bulk read"
        );
        if received == 0 && !buf.is_empty() {
            return Err(TransferError::ShortTransfer {
                expected: buf.len(),
                actual: 0,
            });
        }
        Ok(received)
    }
}

#[cfg(feature = "usb")]
mod hardware {
    use std::{sync::Arc, time::Duration};

    use rusb::{Context, DeviceHandle, UsbContext};
    use tracing::debug;

    use super::BulkEndpoints;
    use crate::transfer::TransferError;

    impl<T: UsbContext> BulkEndpoints for DeviceHandle<T> {
        fn write_bulk(
            &self,
            endpoint: u8,
            data: &[u8],
            timeout: Duration,
        ) -> Result<usize, TransferError> {
            Ok(Self::write_bulk(self, endpoint, data, timeout)?)
        }

        fn read_bulk(
            &self,
            endpoint: u8,
            buf: &mut [u8],
            timeout: Duration,
        ) -> Result<usize, TransferError> {
            Ok(Self::read_bulk(self, endpoint, buf, timeout)?)
        }
    }

    /// Open the `nth` attached device matching `vendor_id:product_id` and
    /// claim interface 0.
    ///
    /// # Errors
    /// Returns [`TransferError::NotFound`] when no such device is attached, or
    /// [`TransferError::Usb`] if opening or claiming fails.
    pub fn open_usb_device(
        vendor_id: u16,
        product_id: u16,
        nth: usize,
    ) -> Result<Arc<DeviceHandle<Context>>, TransferError> {
        let context = Context::new()?;
        let device = context
            .devices()?
            .iter()
            .filter(|device| {
                device
                    .device_descriptor()
                    .is_ok_and(|desc| {
                        desc.vendor_id() == vendor_id && desc.product_id() == product_id
                    })
            })
            .nth(nth)
            .ok_or_else(|| {
                TransferError::NotFound(format!(
                    "USB device {vendor_id:04x}:{product_id:04x} not found at index #{nth}"
                ))
            })?;
        debug!(?device, "opening USB device");
        let mut handle = device.open()?;
        if handle.kernel_driver_active(0).unwrap_or(false) {
            handle.detach_kernel_driver(0)?;
        }
        handle.claim_interface(0)?;
        Ok(Arc::new(handle))
    }
}

#[cfg(feature = "usb")]
pub use hardware::open_usb_device;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::test_helpers::ScriptedEndpoints;

    #[test]
    fn sends_on_the_configured_endpoint() {
        let endpoints = Arc::new(ScriptedEndpoints::default());
        let mut helper = UsbTransferHelper::new(Arc::clone(&endpoints), 0x01, 0x81);
        assert_eq!(helper.send(&[1, 2, 3]).expect("send"), 3);
        assert_eq!(endpoints.writes(), vec![(0x01, vec![1, 2, 3])]);
    }

    #[test]
    fn receives_from_the_configured_endpoint() {
        let endpoints = Arc::new(ScriptedEndpoints::default());
        endpoints.push_read(0x81, vec![9, 8, 7, 6]);
        let mut helper = UsbTransferHelper::new(Arc::clone(&endpoints), 0x01, 0x81);
        let bytes = helper.receive_exact(4).expect("receive");
        assert_eq!(bytes, vec![9, 8, 7, 6]);
    }

    #[test]
    fn short_write_is_a_transfer_error() {
        let endpoints = Arc::new(ScriptedEndpoints::default());
        endpoints.limit_writes(2);
        let mut helper = UsbTransferHelper::new(Arc::clone(&endpoints), 0x01, 0x81);
        let err = helper.send(&[1, 2, 3]).expect_err("short write");
        assert!(matches!(
            err,
            TransferError::ShortTransfer {
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn empty_read_is_a_transfer_error() {
        let endpoints = Arc::new(ScriptedEndpoints::default());
        endpoints.push_read(0x81, Vec::new());
        let mut helper = UsbTransferHelper::new(Arc::clone(&endpoints), 0x01, 0x81);
        let mut buf = [0u8; 8];
        assert!(helper.receive(&mut buf).is_err());
    }
}
