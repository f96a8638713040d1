//! Fixed-format replies.
//!
//! Every reply is `200 OK` with a `text/html` content type. The body is
//! either the wake token or the LED state report, never both.

use core::fmt::{self, Write as _};

use crate::app::state::ActuatorState;

/// Body sent when a button press is waiting to be reported.
pub const WAKE_TOKEN: &str = "AWAKE";

const STATUS_LINE: &str = "HTTP/1.1 200 OK";
const CONTENT_TYPE: &str = "Content-Type: text/html";

/// Upper bound on a rendered reply.
pub const REPLY_CAPACITY: usize = 96;

/// What a reply reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// A press happened since the last report. Suppresses the state report.
    Wake,
    /// Current LED state.
    State(ActuatorState),
}

impl Reply {
    /// Wake takes precedence over the state report.
    pub fn select(pending_wake: bool, actuator: ActuatorState) -> Self {
        if pending_wake {
            Self::Wake
        } else {
            Self::State(actuator)
        }
    }

    /// Render the full reply: status line, header, blank line, body.
    pub fn render(&self) -> heapless::String<REPLY_CAPACITY> {
        let mut out = heapless::String::new();
        let head = write!(out, "{}\r\n{}\r\n\r\n", STATUS_LINE, CONTENT_TYPE);
        let body = match self {
            Self::Wake => write!(out, "{}\r\n", WAKE_TOKEN),
            Self::State(state) => write!(out, "{}", state.report()),
        };
        debug_assert!(head.is_ok() && body.is_ok(), "reply overflows REPLY_CAPACITY");
        out
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wake => write!(f, "{}", WAKE_TOKEN),
            Self::State(state) => write!(f, "{}", state.report()),
        }
    }
}
