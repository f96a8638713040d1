//! TCP transport adapter.
//!
//! Implements [`Transport`] over `std::net`. ESP-IDF ships a std
//! socket layer on top of lwIP, so the same code runs on the device and
//! on the host.
//!
//! ## Connection model
//!
//! 1. `bind()` opens a listener on `0.0.0.0:<port>` in non-blocking mode,
//!    so `poll_client()` returns immediately when nobody is waiting.
//! 2. An accepted stream is switched to blocking mode with a short read
//!    timeout (`io_slice_ms`): a read waits at most one slice and reports
//!    [`ReadStatus::Pending`] when it expires.
//! 3. Writes carry their own timeout (`write_timeout_ms`).
//! 4. `close()` half-closes the write side (FIN after the reply) and drops
//!    the socket.

use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::time::Duration;

use log::{debug, info, warn};

use crate::config::LampConfig;
use crate::http::transport::{Connection, ReadStatus, Transport, TransportError};

/// Non-blocking single-endpoint TCP listener.
pub struct TcpTransport {
    listener: TcpListener,
    io_slice: Duration,
    write_timeout: Duration,
    accepted: u32,
}

impl TcpTransport {
    /// Bind `0.0.0.0:<port>`. Pass port `0` to let the OS pick a free
    /// port (use [`local_addr()`](Self::local_addr) to discover it).
    pub fn bind(port: u16, config: &LampConfig) -> Result<Self, TransportError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = TcpListener::bind(addr).map_err(|e| {
            warn!("TCP: bind {} failed: {}", addr, e);
            TransportError::Bind
        })?;
        listener
            .set_nonblocking(true)
            .map_err(|_| TransportError::Bind)?;

        info!("TCP: listening on port {}", port);

        Ok(Self {
            listener,
            io_slice: Duration::from_millis(u64::from(config.io_slice_ms.max(1))),
            write_timeout: Duration::from_millis(u64::from(config.write_timeout_ms.max(1))),
            accepted: 0,
        })
    }

    /// The actual bound address.
    pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        self.listener.local_addr().map_err(|_| TransportError::Io)
    }

    /// Clients accepted since bind.
    pub fn accepted(&self) -> u32 {
        self.accepted
    }

    fn configure(&self, stream: &TcpStream) -> std::io::Result<()> {
        stream.set_nonblocking(false)?;
        stream.set_read_timeout(Some(self.io_slice))?;
        stream.set_write_timeout(Some(self.write_timeout))?;
        stream.set_nodelay(true)
    }
}

impl Transport for TcpTransport {
    type Conn = TcpConnection;

    fn poll_client(&mut self) -> Option<TcpConnection> {
        match self.listener.accept() {
            Ok((stream, peer)) => {
                if let Err(e) = self.configure(&stream) {
                    warn!("TCP: dropping {}: socket setup failed: {}", peer, e);
                    return None;
                }
                self.accepted = self.accepted.wrapping_add(1);
                debug!("TCP: client {} connected", peer);
                Some(TcpConnection { stream, peer })
            }
            Err(ref e) if e.kind() == ErrorKind::WouldBlock => None,
            Err(e) => {
                warn!("TCP: accept error: {}", e);
                None
            }
        }
    }
}

/// One accepted TCP client.
pub struct TcpConnection {
    stream: TcpStream,
    peer: SocketAddr,
}

impl Connection for TcpConnection {
    type Error = TransportError;

    fn read(&mut self, buf: &mut [u8]) -> Result<ReadStatus, TransportError> {
        if buf.is_empty() {
            return Ok(ReadStatus::Pending);
        }
        match self.stream.read(buf) {
            Ok(0) => Ok(ReadStatus::Eof),
            Ok(n) => Ok(ReadStatus::Data(n)),
            Err(ref e)
                if matches!(
                    e.kind(),
                    ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted
                ) =>
            {
                Ok(ReadStatus::Pending)
            }
            Err(e) => {
                debug!("TCP: read from {} failed: {}", self.peer, e);
                Err(TransportError::Io)
            }
        }
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), TransportError> {
        self.stream
            .write_all(data)
            .and_then(|()| self.stream.flush())
            .map_err(|e| match e.kind() {
                ErrorKind::WouldBlock | ErrorKind::TimedOut => TransportError::WriteTimeout,
                _ => TransportError::Io,
            })
    }

    fn close(self) {
        // NotConnected here just means the peer already went away.
        let _ = self.stream.shutdown(Shutdown::Write);
        debug!("TCP: client {} closed", self.peer);
    }
}

// ───────────────────────────────────────────────────────────────
// Tests (host path)
// ───────────────────────────────────────────────────────────────
