//! Word-aligned transfers for devices that only accept multiples of four
//! bytes per USB transfer.

use tracing::trace;

use super::{TransferError, TransferHelper};

const WORD_LEN: usize = 4;

/// Pads every transfer to a multiple of four bytes.
///
/// Sends zero-pad the tail; receives read the padded length and return only
/// the requested bytes. A device that moves any other length has lost frame
/// alignment and the transfer fails with [`TransferError::PaddingDesync`].
pub struct PaddedTransferHelper<T> {
    inner: T,
}

impl<T: TransferHelper> PaddedTransferHelper<T> {
    /// Wrap `inner`, typically a [`super::UsbTransferHelper`].
    #[must_use]
    pub const fn new(inner: T) -> Self { Self { inner } }

    /// Unwrap the underlying helper.
    #[must_use]
    pub fn into_inner(self) -> T { self.inner }
}

const fn padded_len(len: usize) -> usize { len.next_multiple_of(WORD_LEN) }

impl<T: TransferHelper> TransferHelper for PaddedTransferHelper<T> {
    fn send(&mut self, data: &[u8]) -> Result<usize, TransferError> {
        let padded = padded_len(data.len());
        if padded == data.len() {
            let sent = self.inner.send(data)?;
            if sent != padded {
                return Err(TransferError::PaddingDesync {
                    requested: padded,
                    actual: sent,
                });
            }
            return Ok(sent);
        }
        let mut buf = vec![0u8; padded];
        if let Some(head) = buf.get_mut(..data.len()) {
            head.copy_from_slice(data);
        }
        trace!(logical = data.len(), padded, "padding outgoing transfer");
        let sent = self.inner.send(&buf)?;
        if sent != padded {
            return Err(TransferError::PaddingDesync {
                requested: padded,
                actual: sent,
            });
        }
        Ok(data.len())
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, TransferError> {
        let padded = padded_len(buf.len());
        if padded == buf.len() {
            let received = self.inner.receive(buf)?;
            if received != padded {
                return Err(TransferError::PaddingDesync {
                    requested: padded,
                    actual: received,
                });
            }
            return Ok(received);
        }
        let mut scratch = vec![0u8; padded];
        let received = self.inner.receive(&mut scratch)?;
        if received != padded {
            return Err(TransferError::PaddingDesync {
                requested: padded,
                actual: received,
            });
        }
        trace!(logical = buf.len(), padded, "truncating padded transfer");
        if let Some(head) = scratch.get(..buf.len()) {
            buf.copy_from_slice(head);
        }
        Ok(buf.len())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rstest::rstest;

    use super::*;
    use crate::{test_helpers::ScriptedEndpoints, transfer::UsbTransferHelper};

    fn helper(endpoints: &Arc<ScriptedEndpoints>) -> PaddedTransferHelper<UsbTransferHelper<ScriptedEndpoints>> {
        PaddedTransferHelper::new(UsbTransferHelper::new(Arc::clone(endpoints), 0x01, 0x81))
    }

    #[rstest]
    #[case(1, 4)]
    #[case(3, 4)]
    #[case(4, 4)]
    #[case(5, 8)]
    #[case(64, 64)]
    #[case(65, 68)]
    fn send_pads_to_word_boundary(#[case] logical: usize, #[case] physical: usize) {
        let endpoints = Arc::new(ScriptedEndpoints::default());
        let mut padded = helper(&endpoints);
        let data = vec![0xAB; logical];
        assert_eq!(padded.send(&data).expect("send"), logical);

        let writes = endpoints.writes();
        let (_, written) = writes.first().expect("one write");
        assert_eq!(written.len(), physical);
        assert!(written.get(logical..).unwrap_or_default().iter().all(|b| *b == 0));
    }

    #[test]
    fn receive_truncates_to_logical_length() {
        let endpoints = Arc::new(ScriptedEndpoints::default());
        endpoints.push_read(0x81, vec![1, 2, 3, 4, 5, 6, 7, 8]);
        let mut padded = helper(&endpoints);
        let mut buf = [0u8; 6];
        assert_eq!(padded.receive(&mut buf).expect("receive"), 6);
        assert_eq!(buf, [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn mismatched_receive_length_is_a_desync() {
        let endpoints = Arc::new(ScriptedEndpoints::default());
        endpoints.push_read(0x81, vec![1, 2, 3, 4, 5]);
        let mut padded = helper(&endpoints);
        let mut buf = [0u8; 6];
        let err = padded.receive(&mut buf).expect_err("desync");
        assert!(matches!(
            err,
            TransferError::PaddingDesync {
                requested: 8,
                actual: 5
            }
        ));
    }

    #[test]
    fn mismatched_send_length_is_a_desync() {
        let endpoints = Arc::new(ScriptedEndpoints::default());
        endpoints.limit_writes(64);
        let mut padded = helper(&endpoints);
        let err = padded.send(&[0u8; 66]).expect_err("desync");
        assert!(matches!(
            err,
            TransferError::ShortTransfer { .. } | TransferError::PaddingDesync { .. }
        ));
    }
}
