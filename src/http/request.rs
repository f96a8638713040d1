//! Request-line framing and verb resolution.
//!
//! Only the first line of a request is inspected. It is read under two
//! bounds: a byte cap and a wall-clock deadline measured on the
//! [`ClockPort`]. Whatever follows the line (headers, body) is drained
//! without interpretation.
//!
//! Verb resolution is plain substring matching in fixed priority order:
//! `/on` first, then `/off`, otherwise nothing.

use core::fmt;

use log::debug;

use crate::app::ports::ClockPort;
use crate::config::LampConfig;

use super::transport::{Connection, ReadStatus};

/// Compile-time ceiling for the request-line buffer.
pub const REQUEST_LINE_CAPACITY: usize = 512;

const READ_CHUNK: usize = 64;

/// Bounds applied while reading the request line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineLimits {
    pub max_len: usize,
    pub timeout_ms: u32,
}

impl LineLimits {
    pub fn from_config(config: &LampConfig) -> Self {
        Self {
            max_len: config.max_request_line.min(REQUEST_LINE_CAPACITY),
            timeout_ms: config.read_timeout_ms,
        }
    }
}

/// The first line of a request, terminator stripped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestLine {
    bytes: heapless::Vec<u8, REQUEST_LINE_CAPACITY>,
}

impl RequestLine {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Display for RequestLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match core::str::from_utf8(&self.bytes) {
            Ok(s) => write!(f, "{}", s.escape_debug()),
            Err(_) => write!(f, "<{} non-UTF-8 bytes>", self.bytes.len()),
        }
    }
}

/// How the request line ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineRead {
    /// Terminator (`\r` or `\n`) seen.
    Complete(RequestLine),
    /// The peer closed before sending a terminator.
    Partial(RequestLine),
}

/// Why a request line could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineError {
    /// Deadline passed before the terminator arrived.
    Timeout,
    /// The line exceeded the byte cap.
    TooLong,
    /// The connection failed mid-read.
    Transport,
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "request line timed out"),
            Self::TooLong => write!(f, "request line too long"),
            Self::Transport => write!(f, "connection failed while reading"),
        }
    }
}

/// Read the first line of a request, bounded in size and time.
pub fn read_request_line<C: Connection>(
    conn: &mut C,
    clock: &impl ClockPort,
    limits: &LineLimits,
) -> Result<LineRead, LineError> {
    let start = clock.now_ms();
    let max_len = limits.max_len.min(REQUEST_LINE_CAPACITY);
    let mut line = RequestLine::default();
    let mut chunk = [0u8; READ_CHUNK];

    loop {
        match conn.read(&mut chunk) {
            Ok(ReadStatus::Data(n)) => {
                for &byte in &chunk[..n.min(READ_CHUNK)] {
                    if byte == b'\r' || byte == b'\n' {
                        return Ok(LineRead::Complete(line));
                    }
                    if line.bytes.len() >= max_len {
                        return Err(LineError::TooLong);
                    }
                    line.bytes.push(byte).map_err(|_| LineError::TooLong)?;
                }
            }
            Ok(ReadStatus::Pending) => {}
            Ok(ReadStatus::Eof) => return Ok(LineRead::Partial(line)),
            Err(e) => {
                debug!("request: read failed: {:?}", e);
                return Err(LineError::Transport);
            }
        }

        if clock.now_ms().wrapping_sub(start) >= limits.timeout_ms {
            return Err(LineError::Timeout);
        }
    }
}

/// Discard whatever the client already sent after the request line.
/// Stops at the first empty read, after `limit` bytes, or once `timeout_ms`
/// has elapsed, whichever comes first. Returns the number of bytes dropped.
pub fn drain_remainder<C: Connection>(
    conn: &mut C,
    clock: &impl ClockPort,
    limit: usize,
    timeout_ms: u32,
) -> usize {
    let start = clock.now_ms();
    let mut chunk = [0u8; READ_CHUNK];
    let mut drained = 0;
    while drained < limit {
        let want = (limit - drained).min(READ_CHUNK);
        match conn.read(&mut chunk[..want]) {
            Ok(ReadStatus::Data(n)) => drained += n,
            Ok(ReadStatus::Pending | ReadStatus::Eof) | Err(_) => break,
        }
        if clock.now_ms().wrapping_sub(start) >= timeout_ms {
            break;
        }
    }
    drained
}

/// Request verbs the lamp understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    On,
    Off,
    /// Anything else, including partial lines. Never an error.
    Unrecognized,
}

impl Verb {
    /// First match wins: `/on` beats `/off`.
    pub fn resolve(line: &[u8]) -> Self {
        if contains(line, b"/on") {
            Self::On
        } else if contains(line, b"/off") {
            Self::Off
        } else {
            Self::Unrecognized
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => write!(f, "/on"),
            Self::Off => write!(f, "/off"),
            Self::Unrecognized => write!(f, "(none)"),
        }
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
