//! Transport abstraction: a listening endpoint that hands out one client
//! connection at a time.
//!
//! Concrete implementations:
//! - TCP socket over WiFi ([`TcpTransport`](crate::adapters::tcp_transport::TcpTransport))
//! - scripted in-memory connections in tests
//!
//! The dispatcher is generic over `Transport`, so link bring-up, address
//! assignment and socket options stay outside the control loop.

use core::fmt;

/// Listening endpoint.
pub trait Transport {
    type Conn: Connection;

    /// Hand out a waiting client, if any. Must return immediately.
    fn poll_client(&mut self) -> Option<Self::Conn>;
}

/// Outcome of a single bounded read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStatus {
    /// `n > 0` bytes were copied into the buffer.
    Data(usize),
    /// Nothing arrived within the transport's read slice.
    Pending,
    /// The peer closed its sending side.
    Eof,
}

/// One accepted client. Closed exactly once by the dispatcher.
pub trait Connection {
    type Error: fmt::Debug;

    /// Read up to `buf.len()` bytes, waiting no longer than one read slice.
    fn read(&mut self, buf: &mut [u8]) -> Result<ReadStatus, Self::Error>;

    /// Write all of `data` or fail.
    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Release the connection. No keep-alive.
    fn close(self);
}

/// Errors from the socket layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// Binding or configuring the listener failed.
    Bind,
    /// A socket read or write failed.
    Io,
    /// The write timed out with bytes still unsent.
    WriteTimeout,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bind => write!(f, "listener bind failed"),
            Self::Io => write!(f, "socket I/O error"),
            Self::WriteTimeout => write!(f, "socket write timed out"),
        }
    }
}
