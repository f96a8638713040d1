//! Polled button debouncer with an optional interrupt fast path.
//!
//! ## Hardware
//!
//! Active-low momentary switch with pull-up: the line idles high and
//! reads low while pressed.
//!
//! ## Debounce
//!
//! [`Debouncer::tick`] is called once per loop iteration with the raw
//! level. Any transition restarts the settle timer, bounce included. The
//! confirmed level only follows the raw level once it has been stable for
//! longer than the settle duration.
//!
//! | Commit         | Effect                         |
//! |----------------|--------------------------------|
//! | High → Low     | press: raise the wake flag     |
//! | Low → High     | release: no side effect        |
//!
//! ## Interrupt fast path
//!
//! A falling-edge ISR may call [`button_isr_handler`], which sets a
//! lock-free latch. The loop drains it with [`take_isr_press`]. The latch
//! holds at most one edge, matching the presence-only wake flag. It sees
//! raw edges, so bounce can set it; the polled path stays authoritative.
//! [`Debouncer::isr_press`] marks the press as reported, so the debounced
//! commit that follows it does not queue a second wake. The mark clears
//! once the line has settled high again.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::app::state::ControlLoopState;

/// Set by the ISR, drained by the main loop.
static BUTTON_ISR_LATCH: AtomicBool = AtomicBool::new(false);

/// Digital line level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    High,
    Low,
}

impl Level {
    pub const fn from_high(is_high: bool) -> Self {
        if is_high { Self::High } else { Self::Low }
    }
}

/// Debounced edges reported by [`Debouncer::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEdge {
    /// Idle → active. `coalesced` is set when the press queued nothing new:
    /// a wake event was already pending, or the interrupt already reported it.
    Pressed { coalesced: bool },
    /// Active → idle.
    Released,
}

/// Debounce bookkeeping. Lives inside [`ControlLoopState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceWindow {
    last_observed: Level,
    last_change_ms: u32,
    confirmed: Level,
    isr_reported: bool,
}

impl DebounceWindow {
    pub const fn new(idle: Level) -> Self {
        Self {
            last_observed: idle,
            last_change_ms: 0,
            confirmed: idle,
            isr_reported: false,
        }
    }

    /// Last accepted level.
    pub fn confirmed(&self) -> Level {
        self.confirmed
    }

    /// Whether the confirmed level is the pressed (low) level.
    pub fn is_pressed(&self) -> bool {
        self.confirmed == Level::Low
    }
}

pub struct Debouncer {
    settle_ms: u32,
}

impl Debouncer {
    pub fn new(settle_ms: u32) -> Self {
        Self { settle_ms }
    }

    pub fn settle_ms(&self) -> u32 {
        self.settle_ms
    }

    /// Feed one raw sample. Never blocks, never allocates.
    pub fn tick(&self, state: &mut ControlLoopState, raw: Level, now_ms: u32) -> Option<ButtonEdge> {
        let window = &mut state.debounce;

        if raw != window.last_observed {
            window.last_change_ms = now_ms;
            window.last_observed = raw;
        }

        let stable_ms = now_ms.wrapping_sub(window.last_change_ms);
        if stable_ms <= self.settle_ms {
            return None;
        }
        if raw == Level::High {
            window.isr_reported = false;
        }
        if raw == window.confirmed {
            return None;
        }

        window.confirmed = raw;
        match raw {
            Level::Low if window.isr_reported => Some(ButtonEdge::Pressed { coalesced: true }),
            Level::Low => {
                let coalesced = state.raise_wake();
                Some(ButtonEdge::Pressed { coalesced })
            }
            Level::High => Some(ButtonEdge::Released),
        }
    }

    /// Merge a latched interrupt edge. Raises the wake flag unless this
    /// press was already reported, either by an earlier edge or by a
    /// debounced commit. Returns `Some(coalesced)` when it raised.
    pub fn isr_press(&self, state: &mut ControlLoopState) -> Option<bool> {
        let window = &mut state.debounce;
        if window.isr_reported || window.confirmed == Level::Low {
            return None;
        }
        window.isr_reported = true;
        Some(state.raise_wake())
    }
}

/// ISR handler. Register this on the button GPIO falling edge.
/// Safe to call from interrupt context (lock-free atomic store).
pub fn button_isr_handler() {
    BUTTON_ISR_LATCH.store(true, Ordering::Release);
}

/// Drain the ISR latch. Returns `true` at most once per latched edge.
pub fn take_isr_press() -> bool {
    BUTTON_ISR_LATCH.swap(false, Ordering::AcqRel)
}
