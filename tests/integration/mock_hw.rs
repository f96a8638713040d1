//! Mock adapters for integration tests.
//!
//! Records every LED call and every byte written to a client so tests can
//! assert on the full history without a GPIO bank or a socket.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use wakelamp::app::events::AppEvent;
use wakelamp::app::ports::{ButtonPort, ClockPort, EventSink, LedPort};
use wakelamp::app::state::ActuatorState;
use wakelamp::drivers::button::Level;
use wakelamp::http::transport::{Connection, ReadStatus, Transport, TransportError};

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub level: Level,
    pub led_calls: Vec<ActuatorState>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            level: Level::High,
            led_calls: Vec::new(),
        }
    }

    pub fn press(&mut self) {
        self.level = Level::Low;
    }

    pub fn release(&mut self) {
        self.level = Level::High;
    }

    pub fn led(&self) -> Option<ActuatorState> {
        self.led_calls.last().copied()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl ButtonPort for MockHardware {
    fn read_level(&mut self) -> Level {
        self.level
    }
}

impl LedPort for MockHardware {
    fn set_led(&mut self, state: ActuatorState) {
        self.led_calls.push(state);
    }
}

// ── MockClock ─────────────────────────────────────────────────

/// Manually advanced clock. Clones share the same time source, so a
/// connection can burn a read slice while the dispatcher waits on it.
#[derive(Clone, Default)]
pub struct MockClock {
    now: Rc<Cell<u32>>,
}

#[allow(dead_code)]
impl MockClock {
    pub fn starting_at(ms: u32) -> Self {
        let clock = Self::default();
        clock.set(ms);
        clock
    }

    pub fn set(&self, ms: u32) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl ClockPort for MockClock {
    fn now_ms(&self) -> u32 {
        self.now.get()
    }
}

// ── MockTransport ─────────────────────────────────────────────

/// What one scripted read returns.
#[derive(Debug, Clone)]
pub enum ReadStep {
    Data(Vec<u8>),
    Fail,
}

/// Observable side of a client after the dispatcher is done with it.
#[derive(Default)]
pub struct ClientRecord {
    pub received: RefCell<Vec<u8>>,
    pub closed: Cell<bool>,
}

#[allow(dead_code)]
impl ClientRecord {
    pub fn reply(&self) -> String {
        String::from_utf8_lossy(&self.received.borrow()).into_owned()
    }

    /// Body after the blank line.
    pub fn body(&self) -> String {
        let reply = self.reply();
        match reply.split_once("\r\n\r\n") {
            Some((_, body)) => body.to_string(),
            None => String::new(),
        }
    }
}

pub struct MockConn {
    steps: VecDeque<ReadStep>,
    /// Exhausted script reads `Eof` (peer half-closed) instead of `Pending`.
    eof_when_empty: bool,
    fail_writes: bool,
    clock: MockClock,
    slice_ms: u32,
    /// Time each delivered chunk takes to arrive.
    data_ms: u32,
    record: Rc<ClientRecord>,
}

impl Connection for MockConn {
    type Error = TransportError;

    fn read(&mut self, buf: &mut [u8]) -> Result<ReadStatus, TransportError> {
        match self.steps.pop_front() {
            Some(ReadStep::Data(mut data)) => {
                self.clock.advance(self.data_ms);
                let n = data.len().min(buf.len());
                buf[..n].copy_from_slice(&data[..n]);
                if n < data.len() {
                    self.steps.push_front(ReadStep::Data(data.split_off(n)));
                }
                Ok(ReadStatus::Data(n))
            }
            Some(ReadStep::Fail) => Err(TransportError::Io),
            None if self.eof_when_empty => Ok(ReadStatus::Eof),
            None => {
                self.clock.advance(self.slice_ms);
                Ok(ReadStatus::Pending)
            }
        }
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), TransportError> {
        if self.fail_writes {
            return Err(TransportError::WriteTimeout);
        }
        self.record.received.borrow_mut().extend_from_slice(data);
        Ok(())
    }

    fn close(self) {
        self.record.closed.set(true);
    }
}

/// Queue of clients handed out one per `poll_client()`.
pub struct MockTransport {
    clock: MockClock,
    waiting: VecDeque<MockConn>,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new(clock: &MockClock) -> Self {
        Self {
            clock: clock.clone(),
            waiting: VecDeque::new(),
        }
    }

    /// Client that sends `request` and then half-closes.
    pub fn request(&mut self, request: &str) -> Rc<ClientRecord> {
        let steps = if request.is_empty() {
            Vec::new()
        } else {
            vec![ReadStep::Data(request.as_bytes().to_vec())]
        };
        self.push(steps, true, false)
    }

    /// Client that sends `request` in one chunk per entry, then waits.
    pub fn chunked(&mut self, chunks: &[&str]) -> Rc<ClientRecord> {
        let steps = chunks
            .iter()
            .map(|c| ReadStep::Data(c.as_bytes().to_vec()))
            .collect();
        self.push(steps, false, false)
    }

    /// Client that connects and never sends anything.
    pub fn silent(&mut self) -> Rc<ClientRecord> {
        self.push(Vec::new(), false, false)
    }

    /// Client whose socket refuses the reply.
    pub fn unwritable(&mut self, request: &str) -> Rc<ClientRecord> {
        self.push(vec![ReadStep::Data(request.as_bytes().to_vec())], true, true)
    }

    pub fn scripted(&mut self, steps: Vec<ReadStep>, eof_when_empty: bool) -> Rc<ClientRecord> {
        self.push(steps, eof_when_empty, false)
    }

    /// Client that sends `line` promptly, then dribbles `tail_len` bytes one
    /// at a time, each taking `ms_per_byte` to arrive.
    pub fn trickle(&mut self, line: &str, tail_len: usize, ms_per_byte: u32) -> Rc<ClientRecord> {
        let record = self.push(vec![ReadStep::Data(line.as_bytes().to_vec())], false, false);
        if let Some(conn) = self.waiting.back_mut() {
            conn.steps.extend((0..tail_len).map(|_| ReadStep::Data(vec![b'x'])));
            conn.data_ms = ms_per_byte;
        }
        record
    }

    pub fn waiting(&self) -> usize {
        self.waiting.len()
    }

    fn push(&mut self, steps: Vec<ReadStep>, eof_when_empty: bool, fail_writes: bool) -> Rc<ClientRecord> {
        let record = Rc::new(ClientRecord::default());
        self.waiting.push_back(MockConn {
            steps: steps.into(),
            eof_when_empty,
            fail_writes,
            clock: self.clock.clone(),
            slice_ms: 5,
            data_ms: 0,
            record: Rc::clone(&record),
        });
        record
    }
}

impl Transport for MockTransport {
    type Conn = MockConn;

    fn poll_client(&mut self) -> Option<MockConn> {
        self.waiting.pop_front()
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
