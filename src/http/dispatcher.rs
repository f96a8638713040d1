//! Request dispatcher: services at most one client per loop tick.
//!
//! ```text
//!  poll_client ─▶ read line ─▶ drain rest ─▶ apply verb ─▶ reply ─▶ close
//!      │ none         │ timeout / too long / I/O error
//!      ▼              ▼
//!    Idle          close without reply (pending wake kept)
//! ```
//!
//! The wake flag is only cleared once a wake reply has been written in
//! full, so a client that vanishes mid-reply does not swallow a press.

use core::fmt;

use log::debug;

use crate::app::events::AppEvent;
use crate::app::ports::{ClockPort, EventSink, LedPort};
use crate::app::state::{ActuatorState, ControlLoopState};
use crate::config::LampConfig;

use super::request::{LineError, LineLimits, LineRead, Verb, drain_remainder, read_request_line};
use super::response::Reply;
use super::transport::{Connection, Transport};

/// Why a client was closed without a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    Read(LineError),
    WriteFailed,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(e) => write!(f, "{}", e),
            Self::WriteFailed => write!(f, "reply write failed"),
        }
    }
}

/// Result of one dispatch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No client was waiting.
    Idle,
    Served { verb: Verb, reply: Reply },
    Dropped(DropReason),
}

pub struct RequestDispatcher {
    limits: LineLimits,
    drain_limit: usize,
    drain_timeout_ms: u32,
    served: u32,
    dropped: u32,
}

impl RequestDispatcher {
    pub fn new(config: &LampConfig) -> Self {
        Self {
            limits: LineLimits::from_config(config),
            drain_limit: config.drain_limit,
            drain_timeout_ms: config.drain_timeout_ms,
            served: 0,
            dropped: 0,
        }
    }

    /// Poll the transport and handle one client if present.
    pub fn poll_and_dispatch<T: Transport>(
        &mut self,
        transport: &mut T,
        state: &mut ControlLoopState,
        led: &mut impl LedPort,
        clock: &impl ClockPort,
        sink: &mut impl EventSink,
    ) -> DispatchOutcome {
        let Some(mut conn) = transport.poll_client() else {
            return DispatchOutcome::Idle;
        };

        let verb = match read_request_line(&mut conn, clock, &self.limits) {
            Ok(LineRead::Complete(line)) => {
                debug!("request: \"{}\"", line);
                Verb::resolve(line.as_bytes())
            }
            Ok(LineRead::Partial(line)) => {
                debug!("request: partial line ({} bytes), ignoring verb", line.len());
                Verb::Unrecognized
            }
            Err(e) => return self.drop_client(conn, DropReason::Read(e), sink),
        };

        let drained = drain_remainder(&mut conn, clock, self.drain_limit, self.drain_timeout_ms);
        if drained > 0 {
            debug!("request: discarded {} trailing bytes", drained);
        }

        Self::apply_verb(verb, state, led, sink);

        let reply = Reply::select(state.pending_wake, state.actuator);
        if let Err(e) = conn.write_all(reply.render().as_bytes()) {
            debug!("request: reply write failed: {:?}", e);
            return self.drop_client(conn, DropReason::WriteFailed, sink);
        }
        if reply == Reply::Wake {
            state.pending_wake = false;
        }
        conn.close();

        self.served = self.served.wrapping_add(1);
        sink.emit(&AppEvent::RequestServed { verb, reply });
        DispatchOutcome::Served { verb, reply }
    }

    /// Requests answered since boot.
    pub fn served(&self) -> u32 {
        self.served
    }

    /// Clients closed without a reply since boot.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    fn apply_verb(
        verb: Verb,
        state: &mut ControlLoopState,
        led: &mut impl LedPort,
        sink: &mut impl EventSink,
    ) {
        let target = match verb {
            Verb::On => ActuatorState::On,
            Verb::Off => ActuatorState::Off,
            Verb::Unrecognized => return,
        };
        let from = state.actuator;
        state.actuator = target;
        led.set_led(target);
        if from != target {
            sink.emit(&AppEvent::LedChanged { from, to: target });
        }
    }

    fn drop_client<C: Connection>(
        &mut self,
        conn: C,
        reason: DropReason,
        sink: &mut impl EventSink,
    ) -> DispatchOutcome {
        conn.close();
        self.dropped = self.dropped.wrapping_add(1);
        sink.emit(&AppEvent::ConnectionDropped(reason));
        DispatchOutcome::Dropped(reason)
    }
}
