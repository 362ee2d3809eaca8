//! Byte-stream transfers for RS232 and TCP/IPv4 connections.
//!
//! Reads and writes loop until the requested length is satisfied. When an
//! attempt moves zero bytes the helper sleeps for a short backoff before
//! retrying, so the descriptor can make progress without a busy spin.

use std::{
    io::{ErrorKind, Read, Write},
    thread,
    time::{Duration, Instant},
};

use tracing::trace;

use super::{TransferError, TransferHelper};

/// Sleep between attempts that moved no bytes.
pub const ZERO_PROGRESS_BACKOFF: Duration = Duration::from_millis(10);

/// Blocking send/receive over any `Read + Write` stream.
pub struct StreamTransferHelper<S> {
    stream: S,
    deadline: Option<Duration>,
    eof_is_closed: bool,
}

impl<S: Read + Write + Send> StreamTransferHelper<S> {
    /// Wrap a serial port. Zero-length reads are treated as "no data yet".
    #[must_use]
    pub const fn rs232(stream: S) -> Self {
        Self {
            stream,
            deadline: None,
            eof_is_closed: false,
        }
    }

    /// Wrap a TCP stream. A zero-length read means the peer closed.
    #[must_use]
    pub const fn tcp(stream: S) -> Self {
        Self {
            stream,
            deadline: None,
            eof_is_closed: true,
        }
    }

    /// Bound each send or receive call by `deadline`; `None` blocks
    /// indefinitely.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Borrow the wrapped stream.
    #[must_use]
    pub const fn get_ref(&self) -> &S { &self.stream }

    fn check_deadline(
        &self,
        started: Instant,
        expected: usize,
        moved: usize,
    ) -> Result<(), TransferError> {
        match self.deadline {
            Some(limit) if started.elapsed() >= limit => Err(TransferError::Timeout {
                expected,
                moved,
                elapsed: started.elapsed(),
            }),
            _ => Ok(()),
        }
    }
}

fn is_transient(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::Interrupted | ErrorKind::WouldBlock | ErrorKind::TimedOut
    )
}

impl<S: Read + Write + Send> TransferHelper for StreamTransferHelper<S> {
    fn send(&mut self, data: &[u8]) -> Result<usize, TransferError> {
        let started = Instant::now();
        let mut sent = 0;
        while sent < data.len() {
            let pending = data.get(sent..).unwrap_or_default();
            match self.stream.write(pending) {
                Ok(0) => {
                    self.check_deadline(started, data.len(), sent)?;
                    thread::sleep(ZERO_PROGRESS_BACKOFF);
                }
                Ok(n) => sent += n,
                Err(e) if is_transient(e.kind()) => {
                    self.check_deadline(started, data.len(), sent)?;
                    thread::sleep(ZERO_PROGRESS_BACKOFF);
                }
                Err(e) => return Err(e.into()),
            }
        }
        self.stream.flush()?;
        trace!(bytes = sent, "stream write");
        Ok(sent)
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, TransferError> {
        let started = Instant::now();
        let expected = buf.len();
        let mut received = 0;
        while received < expected {
            let pending = buf.get_mut(received..).unwrap_or_default();
            match self.stream.read(pending) {
                Ok(0) if self.eof_is_closed => return Err(TransferError::Closed),
                Ok(0) => {
                    self.check_deadline(started, expected, received)?;
                    thread::sleep(ZERO_PROGRESS_BACKOFF);
                }
                Ok(n) => received += n,
                Err(e) if is_transient(e.kind()) => {
                    self.check_deadline(started, expected, received)?;
                    thread::sleep(ZERO_PROGRESS_BACKOFF);
                }
                Err(e) => return Err(e.into()),
            }
        }
        trace!(bytes = received, "stream read");
        Ok(received)
    }
}

#[cfg(feature = "serial")]
/// Open `path` at `baud_rate` as an RS232 transfer helper.
///
/// `read_timeout` bounds each individual read syscall; the helper keeps
/// retrying until its own deadline, if any.
///
/// # Errors
/// Returns [`TransferError::Serial`] if the port cannot be opened.
pub fn open_rs232(
    path: &str,
    baud_rate: u32,
    read_timeout: Duration,
) -> Result<StreamTransferHelper<Box<dyn serialport::SerialPort>>, TransferError> {
    let port = serialport::new(path, baud_rate)
        .timeout(read_timeout)
        .open()?;
    tracing::debug!(path, baud_rate, "opened serial port");
    Ok(StreamTransferHelper::rs232(port))
}

/// Connect to `address` as a TCP/IPv4 transfer helper.
///
/// # Errors
/// Returns [`TransferError::Io`] if the connection cannot be established.
pub fn open_tcp(
    address: std::net::SocketAddr,
    connect_timeout: Duration,
) -> Result<StreamTransferHelper<std::net::TcpStream>, TransferError> {
    let stream = std::net::TcpStream::connect_timeout(&address, connect_timeout)?;
    stream.set_nodelay(true)?;
    tracing::debug!(%address, "connected TCP transport");
    Ok(StreamTransferHelper::tcp(stream))
}

#[cfg(test)]
mod tests {
    use std::{
        collections::VecDeque,
        io::{self, Read, Write},
        time::Duration,
    };

    use super::*;

    /// Stream that alternates empty reads with single-byte reads.
    #[derive(Default)]
    struct Trickle {
        incoming: VecDeque<u8>,
        outgoing: Vec<u8>,
        stall_next: bool,
        write_chunk: usize,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.stall_next = !self.stall_next;
            if self.stall_next {
                return Err(io::Error::from(io::ErrorKind::TimedOut));
            }
            match (self.incoming.pop_front(), buf.first_mut()) {
                (Some(byte), Some(slot)) => {
                    *slot = byte;
                    Ok(1)
                }
                _ => Ok(0),
            }
        }
    }

    impl Write for Trickle {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let n = buf.len().min(self.write_chunk.max(1));
            self.outgoing.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> { Ok(()) }
    }

    #[test]
    fn receive_retries_until_satisfied() {
        let stream = Trickle {
            incoming: (1u8..=5).collect(),
            ..Trickle::default()
        };
        let mut helper = StreamTransferHelper::rs232(stream);
        let mut buf = [0u8; 5];
        assert_eq!(helper.receive(&mut buf).expect("receive"), 5);
        assert_eq!(buf, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn send_loops_over_partial_writes() {
        let stream = Trickle {
            write_chunk: 3,
            ..Trickle::default()
        };
        let mut helper = StreamTransferHelper::rs232(stream);
        let data: Vec<u8> = (0..10).collect();
        assert_eq!(helper.send(&data).expect("send"), 10);
        assert_eq!(helper.get_ref().outgoing, data);
    }

    #[test]
    fn deadline_bounds_a_stalled_receive() {
        let mut helper =
            StreamTransferHelper::rs232(Trickle::default()).with_deadline(Some(Duration::from_millis(30)));
        let mut buf = [0u8; 4];
        let err = helper.receive(&mut buf).expect_err("must time out");
        assert!(matches!(
            err,
            TransferError::Timeout {
                expected: 4,
                moved: 0,
                ..
            }
        ));
    }

    #[test]
    fn tcp_eof_is_closed() {
        let mut helper = StreamTransferHelper::tcp(io::Cursor::new(Vec::<u8>::new()));
        let mut buf = [0u8; 4];
        assert!(matches!(helper.receive(&mut buf), Err(TransferError::Closed)));
    }
}
