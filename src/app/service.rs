//! Control loop service, the hexagonal core.
//!
//! [`ControlLoop`] owns the shared [`ControlLoopState`], the debouncer and
//! the request dispatcher. All I/O flows through port traits injected at
//! call sites, making the whole loop testable with mock adapters.
//!
//! ```text
//!  ButtonPort ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                 │        ControlLoop        │
//!    LedPort ◀──  │ Debouncer · Dispatcher    │ ◀──▶ Transport
//!                 └──────────────────────────┘
//! ```
//!
//! One [`tick`](ControlLoop::tick) is: sample button → debounce → poll
//! transport → dispatch at most one request. Sampling always precedes
//! dispatch, so a press confirmed in a tick is visible to a request served
//! later in the same tick.

use log::info;

use crate::config::LampConfig;
use crate::drivers::button::{self, ButtonEdge, Debouncer};
use crate::http::dispatcher::{DispatchOutcome, RequestDispatcher};
use crate::http::transport::Transport;

use super::events::AppEvent;
use super::ports::{ButtonPort, ClockPort, EventSink, LedPort};
use super::state::{ActuatorState, ControlLoopState};

pub struct ControlLoop {
    state: ControlLoopState,
    debouncer: Debouncer,
    dispatcher: RequestDispatcher,
    isr_fast_path: bool,
    tick_count: u64,
}

impl ControlLoop {
    /// Construct the loop from configuration.
    ///
    /// Does **not** touch hardware. Call [`start`](Self::start) next.
    pub fn new(config: &LampConfig) -> Self {
        Self {
            state: ControlLoopState::new(),
            debouncer: Debouncer::new(config.debounce_ms),
            dispatcher: RequestDispatcher::new(config),
            isr_fast_path: config.isr_fast_path,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive the LED to its initial (OFF) state.
    pub fn start(&mut self, led: &mut impl LedPort, sink: &mut impl EventSink) {
        led.set_led(self.state.actuator);
        sink.emit(&AppEvent::Started(self.state.actuator));
        info!(
            "ControlLoop started (LED {}, settle {}ms, ISR fast path {})",
            self.state.actuator,
            self.debouncer.settle_ms(),
            if self.isr_fast_path { "on" } else { "off" }
        );
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one loop iteration. Never fails, never blocks beyond the
    /// transport's read and write bounds.
    ///
    /// The `hw` parameter satisfies **both** [`ButtonPort`] and
    /// [`LedPort`]. This avoids a double mutable borrow while keeping
    /// the port boundary explicit.
    pub fn tick<T: Transport>(
        &mut self,
        hw: &mut (impl ButtonPort + LedPort),
        transport: &mut T,
        clock: &impl ClockPort,
        sink: &mut impl EventSink,
    ) -> DispatchOutcome {
        self.tick_count += 1;

        // 1. Sample + debounce
        let raw = hw.read_level();
        let now_ms = clock.now_ms();
        match self.debouncer.tick(&mut self.state, raw, now_ms) {
            Some(ButtonEdge::Pressed { coalesced }) => {
                sink.emit(&AppEvent::ButtonPressed);
                sink.emit(&AppEvent::WakeQueued { coalesced });
            }
            Some(ButtonEdge::Released) => sink.emit(&AppEvent::ButtonReleased),
            None => {}
        }

        // 2. Interrupt fast path (redundant with the polled path)
        if self.isr_fast_path && button::take_isr_press() {
            if let Some(coalesced) = self.debouncer.isr_press(&mut self.state) {
                sink.emit(&AppEvent::WakeQueued { coalesced });
            }
        }

        // 3. Serve at most one client
        self.dispatcher
            .poll_and_dispatch(transport, &mut self.state, hw, clock, sink)
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current LED state.
    pub fn actuator(&self) -> ActuatorState {
        self.state.actuator
    }

    /// Whether a press is waiting to be reported.
    pub fn pending_wake(&self) -> bool {
        self.state.pending_wake
    }

    /// Whether the debounced button is currently held down.
    pub fn button_held(&self) -> bool {
        self.state.debounce.is_pressed()
    }

    /// Total ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Requests answered since startup.
    pub fn requests_served(&self) -> u32 {
        self.dispatcher.served()
    }

    /// Clients closed without a reply since startup.
    pub fn connections_dropped(&self) -> u32 {
        self.dispatcher.dropped()
    }
}
