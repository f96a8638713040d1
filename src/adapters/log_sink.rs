//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the
//! ESP-IDF logger (UART / USB-CDC in production, stderr on the host).

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                info!("START | LED {}", state);
            }
            AppEvent::ButtonPressed => {
                info!("BUTTON | pressed");
            }
            AppEvent::ButtonReleased => {
                debug!("BUTTON | released");
            }
            AppEvent::WakeQueued { coalesced: false } => {
                info!("WAKE | queued for next client");
            }
            AppEvent::WakeQueued { coalesced: true } => {
                info!("WAKE | already pending, coalesced");
            }
            AppEvent::LedChanged { from, to } => {
                info!("LED | {} -> {}", from, to);
            }
            AppEvent::RequestServed { verb, reply } => {
                info!("HTTP | {} -> {}", verb, reply);
            }
            AppEvent::ConnectionDropped(reason) => {
                warn!("HTTP | dropped: {}", reason);
            }
        }
    }
}
