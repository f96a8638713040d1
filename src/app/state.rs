//! Shared control-loop state.
//!
//! One owned [`ControlLoopState`] is passed by reference to the debouncer
//! and the dispatcher on every tick. Both run on the same thread of
//! control, so no locking is involved.

use core::fmt;

use crate::drivers::button::{DebounceWindow, Level};

/// Logical state of the lamp LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActuatorState {
    On,
    #[default]
    Off,
}

impl ActuatorState {
    /// Body text reported to a polling client.
    pub const fn report(self) -> &'static str {
        match self {
            Self::On => "LED is ON",
            Self::Off => "LED is OFF",
        }
    }

    /// Output pin level (active high).
    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

impl fmt::Display for ActuatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => write!(f, "ON"),
            Self::Off => write!(f, "OFF"),
        }
    }
}

/// Everything that lives for the process lifetime.
#[derive(Debug, Clone)]
pub struct ControlLoopState {
    /// Owned by the dispatcher; the debouncer never touches it.
    pub actuator: ActuatorState,
    /// Owned by the debouncer.
    pub debounce: DebounceWindow,
    /// Presence-only: a second press before the next reply is coalesced.
    pub pending_wake: bool,
}

impl ControlLoopState {
    /// LED off, button idle (pulled high), nothing pending.
    pub fn new() -> Self {
        Self {
            actuator: ActuatorState::Off,
            debounce: DebounceWindow::new(Level::High),
            pending_wake: false,
        }
    }

    /// Latch a wake event. Returns `true` if one was already pending.
    pub fn raise_wake(&mut self) -> bool {
        let coalesced = self.pending_wake;
        self.pending_wake = true;
        coalesced
    }
}

impl Default for ControlLoopState {
    fn default() -> Self {
        Self::new()
    }
}
