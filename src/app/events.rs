//! Outbound application events.
//!
//! The [`ControlLoop`](super::service::ControlLoop) emits these through the
//! [`EventSink`](super::ports::EventSink) port.

use crate::http::dispatcher::DropReason;
use crate::http::request::Verb;
use crate::http::response::Reply;

use super::state::ActuatorState;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The loop has started (carries the initial LED state).
    Started(ActuatorState),

    /// Debounced press (idle → active).
    ButtonPressed,

    /// Debounced release (active → idle).
    ButtonReleased,

    /// A wake event is waiting for the next client.
    /// `coalesced` is set when one was already pending.
    WakeQueued { coalesced: bool },

    /// A request verb changed the LED.
    LedChanged { from: ActuatorState, to: ActuatorState },

    /// A client received a reply.
    RequestServed { verb: Verb, reply: Reply },

    /// A client was closed without a reply.
    ConnectionDropped(DropReason),
}
