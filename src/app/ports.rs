//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlLoop (domain)
//! ```
//!
//! Driven adapters (button, LED, clock, event sinks) implement these
//! traits. The [`ControlLoop`](super::service::ControlLoop) consumes them
//! via generics, so the domain core never touches hardware directly.
//! The network side is covered by [`Transport`](crate::http::transport::Transport).

use crate::drivers::button::Level;

use super::state::ActuatorState;

// ───────────────────────────────────────────────────────────────
// Button port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain samples the raw button line once per tick.
pub trait ButtonPort {
    /// Instantaneous line level. Pull-up wiring: idle is [`Level::High`].
    fn read_level(&mut self) -> Level;
}

// ───────────────────────────────────────────────────────────────
// LED port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain drives the lamp LED.
pub trait LedPort {
    fn set_led(&mut self, state: ActuatorState);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock. Wraps at `u32::MAX`; callers compare
/// with `wrapping_sub`.
pub trait ClockPort {
    fn now_ms(&self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
