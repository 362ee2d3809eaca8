//! Scripted transports and frame builders for exercising the protocol layer
//! without hardware.
//!
//! Enabled for unit tests and, through the `test-support` feature, for
//! integration tests.

pub mod tracing;

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use crate::{
    message::{MAX_IMMEDIATE_LEN, Message, MessageFlags, MessageType},
    transfer::{BulkEndpoints, TransferError, TransferHelper},
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[derive(Default)]
struct TransportState {
    incoming: VecDeque<u8>,
    writes: Vec<Vec<u8>>,
    read_sizes: Vec<usize>,
}

/// In-memory byte stream that replays scripted device output.
///
/// Clones share state, so a test keeps one handle for inspection and hands
/// another to the code under test. Queued reads are concatenated into one
/// stream; a receive on an empty stream fails with [`TransferError::Closed`].
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    state: Arc<Mutex<TransportState>>,
}

impl ScriptedTransport {
    /// Queue bytes for later receives.
    pub fn push_read(&self, bytes: impl AsRef<[u8]>) {
        lock(&self.state).incoming.extend(bytes.as_ref());
    }

    /// Queue a serialised frame for later receives.
    pub fn push_response(&self, message: &Message) { self.push_read(message.to_bytes()); }

    /// Every send, in order.
    #[must_use]
    pub fn writes(&self) -> Vec<Vec<u8>> { lock(&self.state).writes.clone() }

    /// All sent bytes concatenated.
    #[must_use]
    pub fn written(&self) -> Vec<u8> { lock(&self.state).writes.concat() }

    /// Buffer length requested by every receive, in order.
    #[must_use]
    pub fn read_sizes(&self) -> Vec<usize> { lock(&self.state).read_sizes.clone() }

    /// Bytes still queued for receives.
    #[must_use]
    pub fn pending(&self) -> usize { lock(&self.state).incoming.len() }
}

impl TransferHelper for ScriptedTransport {
    fn send(&mut self, data: &[u8]) -> Result<usize, TransferError> {
        lock(&self.state).writes.push(data.to_vec());
        Ok(data.len())
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, TransferError> {
        let mut state = lock(&self.state);
        state.read_sizes.push(buf.len());
        if state.incoming.is_empty() && !buf.is_empty() {
            return Err(TransferError::Closed);
        }
        let n = buf.len().min(state.incoming.len());
        for (slot, byte) in buf.iter_mut().zip(state.incoming.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}

#[derive(Default)]
struct EndpointState {
    reads: HashMap<u8, VecDeque<Vec<u8>>>,
    writes: Vec<(u8, Vec<u8>)>,
    write_limit: Option<usize>,
}

/// Fake USB device with one scripted read queue per endpoint.
///
/// Each queued read satisfies exactly one bulk call; an empty queue fails
/// with [`TransferError::Closed`].
#[derive(Default)]
pub struct ScriptedEndpoints {
    state: Mutex<EndpointState>,
}

impl ScriptedEndpoints {
    /// Queue one bulk read on `endpoint`.
    pub fn push_read(&self, endpoint: u8, bytes: Vec<u8>) {
        lock(&self.state)
            .reads
            .entry(endpoint)
            .or_default()
            .push_back(bytes);
    }

    /// Cap the bytes accepted by each bulk write.
    pub fn limit_writes(&self, limit: usize) { lock(&self.state).write_limit = Some(limit); }

    /// Every bulk write as `(endpoint, bytes)`, in order.
    #[must_use]
    pub fn writes(&self) -> Vec<(u8, Vec<u8>)> { lock(&self.state).writes.clone() }
}

impl BulkEndpoints for ScriptedEndpoints {
    fn write_bulk(
        &self,
        endpoint: u8,
        data: &[u8],
        _timeout: Duration,
    ) -> Result<usize, TransferError> {
        let mut state = lock(&self.state);
        let accepted = state.write_limit.map_or(data.len(), |limit| limit.min(data.len()));
        let chunk = data.get(..accepted).unwrap_or_default().to_vec();
        state.writes.push((endpoint, chunk));
        Ok(accepted)
    }

    fn read_bulk(
        &self,
        endpoint: u8,
        buf: &mut [u8],
        _timeout: Duration,
    ) -> Result<usize, TransferError> {
        let next = lock(&self.state)
            .reads
            .get_mut(&endpoint)
            .and_then(VecDeque::pop_front)
            .ok_or(TransferError::Closed)?;
        let n = next.len().min(buf.len());
        if let (Some(dst), Some(src)) = (buf.get_mut(..n), next.get(..n)) {
            dst.copy_from_slice(src);
        }
        Ok(n)
    }
}

/// Serialise an acknowledged response of `message_type` carrying `data`.
///
/// Data up to 16 bytes travels as immediate data, longer data as the
/// extended payload.
///
/// # Panics
/// Panics if `data` exceeds the maximum payload length.
#[must_use]
pub fn response_frame(message_type: MessageType, data: &[u8]) -> Vec<u8> {
    let mut msg = Message::new(message_type);
    msg.set_flags(MessageFlags::RESPONSE | MessageFlags::ACK);
    if data.len() <= MAX_IMMEDIATE_LEN {
        msg.set_immediate_data(data);
    } else {
        if let Err(error) = msg.set_payload(data.to_vec()) {
            panic!("response payload rejected: {error}");
        }
    }
    msg.to_bytes()
}

/// Serialise a nacked response of `message_type` with error number `errno`.
#[must_use]
pub fn nack_frame(message_type: MessageType, errno: u16) -> Vec<u8> {
    let mut msg = Message::new(message_type);
    msg.set_flags(MessageFlags::RESPONSE | MessageFlags::NACK);
    msg.set_error_number(errno);
    msg.to_bytes()
}
