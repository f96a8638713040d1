//! Fuzz target: `read_request_line` + `Verb::resolve`
//!
//! The first input byte picks a read chunk size; the rest is the client's
//! byte stream. Asserts the reader never panics, never returns a line
//! longer than the configured cap, and never includes a terminator.
//!
//! cargo fuzz run fuzz_request_line

#![no_main]

use core::cell::Cell;

use libfuzzer_sys::fuzz_target;
use wakelamp::app::ports::ClockPort;
use wakelamp::http::request::{LineLimits, LineRead, Verb, drain_remainder, read_request_line};
use wakelamp::http::transport::{Connection, ReadStatus};

struct Stream<'a> {
    data: &'a [u8],
    chunk: usize,
}

impl Connection for Stream<'_> {
    type Error = ();

    fn read(&mut self, buf: &mut [u8]) -> Result<ReadStatus, ()> {
        if self.data.is_empty() {
            return Ok(ReadStatus::Eof);
        }
        let n = self.chunk.min(buf.len()).min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(ReadStatus::Data(n))
    }

    fn write_all(&mut self, _data: &[u8]) -> Result<(), ()> {
        Ok(())
    }

    fn close(self) {}
}

/// Advances one millisecond per query so the deadline is always reachable.
struct Ticking(Cell<u32>);

impl ClockPort for Ticking {
    fn now_ms(&self) -> u32 {
        let t = self.0.get();
        self.0.set(t.wrapping_add(1));
        t
    }
}

fuzz_target!(|data: &[u8]| {
    let Some((&first, rest)) = data.split_first() else {
        return;
    };
    let limits = LineLimits {
        max_len: 256,
        timeout_ms: 250,
    };
    let mut conn = Stream {
        data: rest,
        chunk: usize::from(first % 64) + 1,
    };
    let clock = Ticking(Cell::new(0));

    if let Ok(LineRead::Complete(line) | LineRead::Partial(line)) =
        read_request_line(&mut conn, &clock, &limits)
    {
        assert!(line.len() <= limits.max_len);
        assert!(!line.as_bytes().iter().any(|b| *b == b'\r' || *b == b'\n'));
        let _ = Verb::resolve(line.as_bytes());
    }

    let drained = drain_remainder(&mut conn, &clock, 1024, 20);
    assert!(drained <= 1024);
});
