//! Spectrum reads split across two bulk endpoints.
//!
//! Older 2K/4K-pixel spectrometers deliver the first part of every spectrum
//! on a secondary endpoint and the rest on the primary one. One logical read
//! is therefore two physical reads, concatenated secondary-then-primary.

use std::{sync::Arc, time::Duration};

use tracing::trace;

use super::{BulkEndpoints, DEFAULT_USB_TIMEOUT, TransferError, TransferHelper};

/// Bytes delivered on the secondary endpoint before the primary one.
pub const DEFAULT_SECONDARY_LEN: usize = 2048;

/// Logical receive assembled from a secondary and a primary endpoint read.
pub struct SplitReadTransferHelper<D: ?Sized> {
    device: Arc<D>,
    send_endpoint: u8,
    primary_endpoint: u8,
    secondary_endpoint: u8,
    secondary_len: usize,
    timeout: Duration,
}

impl<D: BulkEndpoints + ?Sized> SplitReadTransferHelper<D> {
    /// Create a helper reading [`DEFAULT_SECONDARY_LEN`] bytes from
    /// `secondary_endpoint` ahead of `primary_endpoint`.
    #[must_use]
    pub const fn new(
        device: Arc<D>,
        send_endpoint: u8,
        primary_endpoint: u8,
        secondary_endpoint: u8,
    ) -> Self {
        Self {
            device,
            send_endpoint,
            primary_endpoint,
            secondary_endpoint,
            secondary_len: DEFAULT_SECONDARY_LEN,
            timeout: DEFAULT_USB_TIMEOUT,
        }
    }

    /// Override the number of bytes read from the secondary endpoint.
    #[must_use]
    pub const fn with_secondary_len(mut self, secondary_len: usize) -> Self {
        self.secondary_len = secondary_len;
        self
    }

    /// Override the timeout passed to each bulk call.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read one segment from `endpoint` and copy it to the front of `dst`.
    ///
    /// The copy is capped to the smaller of the bytes read and `dst.len()`.
    fn read_segment(
        &self,
        endpoint: u8,
        request_len: usize,
        dst: &mut [u8],
    ) -> Result<usize, TransferError> {
        let mut scratch = vec![0u8; request_len];
        let read = self.device.read_bulk(endpoint, &mut scratch, self.timeout)?;
        let copied = read.min(dst.len());
        if let (Some(to), Some(from)) = (dst.get_mut(..copied), scratch.get(..copied)) {
            to.copy_from_slice(from);
        }
        trace!(endpoint, request_len, read, copied, "split read segment");
        Ok(copied)
    }
}

impl<D: BulkEndpoints + ?Sized> TransferHelper for SplitReadTransferHelper<D> {
    fn send(&mut self, data: &[u8]) -> Result<usize, TransferError> {
        let sent = self
            .device
            .write_bulk(self.send_endpoint, data, self.timeout)?;
        if sent != data.len() {
            return Err(TransferError::ShortTransfer {
                expected: data.len(),
                actual: sent,
            });
        }
        Ok(sent)
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, TransferError> {
        let first = self.read_segment(self.secondary_endpoint, self.secondary_len, buf)?;
        let primary_len = buf.len().saturating_sub(self.secondary_len);
        if primary_len == 0 {
            return Ok(first);
        }
        let rest = buf.get_mut(first..).unwrap_or_default();
        let second = self.read_segment(self.primary_endpoint, primary_len, rest)?;
        Ok(first + second)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::test_helpers::ScriptedEndpoints;

    const SECONDARY: u8 = 0x86;
    const PRIMARY: u8 = 0x82;

    fn split(endpoints: &Arc<ScriptedEndpoints>) -> SplitReadTransferHelper<ScriptedEndpoints> {
        SplitReadTransferHelper::new(Arc::clone(endpoints), 0x02, PRIMARY, SECONDARY)
    }

    #[test]
    fn secondary_segment_precedes_primary() {
        let endpoints = Arc::new(ScriptedEndpoints::default());
        endpoints.push_read(SECONDARY, vec![0xAA; 2048]);
        endpoints.push_read(PRIMARY, vec![0xBB; 2049]);
        let mut helper = split(&endpoints);

        let mut buf = vec![0u8; 4097];
        assert_eq!(helper.receive(&mut buf).expect("receive"), 4097);
        assert!(buf[..2048].iter().all(|b| *b == 0xAA));
        assert!(buf[2048..].iter().all(|b| *b == 0xBB));
    }

    #[test]
    fn result_is_truncated_to_destination() {
        let endpoints = Arc::new(ScriptedEndpoints::default());
        endpoints.push_read(SECONDARY, vec![0xAA; 2048]);
        let mut helper = split(&endpoints);

        let mut buf = vec![0u8; 1000];
        assert_eq!(helper.receive(&mut buf).expect("receive"), 1000);
        assert!(buf.iter().all(|b| *b == 0xAA));
    }

    #[test]
    fn short_secondary_read_shifts_primary_forward() {
        let endpoints = Arc::new(ScriptedEndpoints::default());
        endpoints.push_read(SECONDARY, vec![0xAA; 16]);
        endpoints.push_read(PRIMARY, vec![0xBB; 8]);
        let mut helper = split(&endpoints).with_secondary_len(16);

        let mut buf = vec![0u8; 32];
        assert_eq!(helper.receive(&mut buf).expect("receive"), 24);
        assert_eq!(&buf[..16], &[0xAA; 16]);
        assert_eq!(&buf[16..24], &[0xBB; 8]);
        assert_eq!(&buf[24..], &[0u8; 8]);
    }

    #[test]
    fn sends_on_the_command_endpoint() {
        let endpoints = Arc::new(ScriptedEndpoints::default());
        let mut helper = split(&endpoints);
        helper.send(&[0x09]).expect("send");
        assert_eq!(endpoints.writes(), vec![(0x02, vec![0x09])]);
    }
}
