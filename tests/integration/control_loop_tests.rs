//! End-to-end tests for the ControlLoop: button → debounce → wake flag →
//! request dispatch → LED + reply.

use std::sync::{Mutex, MutexGuard};

use super::mock_hw::{MockClock, MockHardware, MockTransport, RecordingSink};

use wakelamp::app::events::AppEvent;
use wakelamp::app::service::ControlLoop;
use wakelamp::app::state::ActuatorState;
use wakelamp::config::LampConfig;
use wakelamp::drivers::button;
use wakelamp::http::dispatcher::DispatchOutcome;
use wakelamp::http::request::Verb;
use wakelamp::http::response::Reply;

/// The ISR latch is a process-wide static; tests that fire it take turns.
static ISR_LATCH: Mutex<()> = Mutex::new(());

fn isr_latch() -> MutexGuard<'static, ()> {
    ISR_LATCH.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

const WAKE_REPLY: &str = "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\nAWAKE\r\n";

struct Rig {
    control: ControlLoop,
    hw: MockHardware,
    clock: MockClock,
    transport: MockTransport,
    sink: RecordingSink,
}

impl Rig {
    fn new() -> Self {
        Self::with_config(LampConfig::default(), 0)
    }

    fn with_config(config: LampConfig, start_ms: u32) -> Self {
        let clock = MockClock::starting_at(start_ms);
        let transport = MockTransport::new(&clock);
        let mut hw = MockHardware::new();
        let mut sink = RecordingSink::new();
        let mut control = ControlLoop::new(&config);
        control.start(&mut hw, &mut sink);
        Self {
            control,
            hw,
            clock,
            transport,
            sink,
        }
    }

    fn tick(&mut self) -> DispatchOutcome {
        self.control
            .tick(&mut self.hw, &mut self.transport, &self.clock, &mut self.sink)
    }

    /// One tick per simulated millisecond.
    fn run_for(&mut self, ms: u32) {
        for _ in 0..ms {
            self.clock.advance(1);
            self.tick();
        }
    }

    /// A clean press-and-release, each phase held past the settle time.
    fn press(&mut self) {
        self.hw.press();
        self.run_for(60);
        self.hw.release();
        self.run_for(60);
    }

    fn get(&mut self, path: &str) -> (DispatchOutcome, String) {
        let request = format!("GET {} HTTP/1.1\r\nHost: lamp\r\n\r\n", path);
        let client = self.transport.request(&request);
        let outcome = self.tick();
        assert!(client.closed.get(), "client must be closed after one request");
        (outcome, client.body())
    }
}

// ── Boot ──────────────────────────────────────────────────────

#[test]
fn start_drives_led_off() {
    let rig = Rig::new();
    assert_eq!(rig.hw.led_calls, vec![ActuatorState::Off]);
    assert_eq!(rig.sink.events.first(), Some(&AppEvent::Started(ActuatorState::Off)));
    assert!(!rig.control.pending_wake());
}

#[test]
fn idle_ticks_are_no_ops() {
    let mut rig = Rig::new();
    for _ in 0..100 {
        rig.clock.advance(1);
        assert_eq!(rig.tick(), DispatchOutcome::Idle);
    }
    assert_eq!(rig.control.tick_count(), 100);
    assert_eq!(rig.sink.events.len(), 1);
}

// ── Wake reporting ────────────────────────────────────────────

#[test]
fn single_press_reports_wake_once_then_state() {
    let mut rig = Rig::new();
    rig.press();
    assert!(rig.control.pending_wake());

    let client = rig.transport.request("GET / HTTP/1.1\r\n\r\n");
    rig.tick();
    assert_eq!(client.reply(), WAKE_REPLY);
    assert!(!rig.control.pending_wake());

    let (_, body) = rig.get("/");
    assert_eq!(body, "LED is OFF");
}

#[test]
fn two_presses_before_a_request_coalesce() {
    let mut rig = Rig::new();
    rig.press();
    rig.press();

    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::ButtonPressed)), 2);
    assert_eq!(
        rig.sink.count(|e| *e == AppEvent::WakeQueued { coalesced: true }),
        1
    );

    let (_, first) = rig.get("/");
    let (_, second) = rig.get("/");
    assert_eq!(first, "AWAKE\r\n");
    assert_eq!(second, "LED is OFF");
}

#[test]
fn holding_the_button_raises_one_wake() {
    let mut rig = Rig::new();
    rig.hw.press();
    rig.run_for(60);
    assert!(rig.control.button_held());

    let (_, body) = rig.get("/");
    assert_eq!(body, "AWAKE\r\n");

    rig.run_for(500);
    assert!(!rig.control.pending_wake(), "held button must not re-arm");
    assert!(rig.control.button_held());
}

#[test]
fn bouncing_contact_never_confirms() {
    let mut rig = Rig::new();
    for i in 0..20 {
        if i % 2 == 0 {
            rig.hw.press();
        } else {
            rig.hw.release();
        }
        rig.run_for(10);
    }
    rig.hw.release();
    rig.run_for(100);
    assert!(!rig.control.pending_wake());
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::ButtonPressed)), 0);
}

#[test]
fn press_spanning_clock_wrap_is_detected() {
    let mut rig = Rig::with_config(LampConfig::default(), u32::MAX - 20);
    rig.press();
    assert!(rig.control.pending_wake());
}

// ── LED verbs ─────────────────────────────────────────────────

#[test]
fn on_then_off_drive_led_and_report_state() {
    let mut rig = Rig::new();

    let (outcome, body) = rig.get("/on");
    assert_eq!(
        outcome,
        DispatchOutcome::Served {
            verb: Verb::On,
            reply: Reply::State(ActuatorState::On)
        }
    );
    assert_eq!(body, "LED is ON");
    assert_eq!(rig.hw.led(), Some(ActuatorState::On));

    let (_, body) = rig.get("/off");
    assert_eq!(body, "LED is OFF");
    assert_eq!(rig.hw.led(), Some(ActuatorState::Off));
    assert_eq!(rig.control.actuator(), ActuatorState::Off);
}

#[test]
fn unrecognised_path_reports_without_touching_led() {
    let mut rig = Rig::new();
    rig.get("/on");
    let calls_before = rig.hw.led_calls.len();

    let (outcome, body) = rig.get("/status");
    assert_eq!(body, "LED is ON");
    assert_eq!(rig.hw.led_calls.len(), calls_before);
    assert!(matches!(
        outcome,
        DispatchOutcome::Served {
            verb: Verb::Unrecognized,
            ..
        }
    ));
}

#[test]
fn repeated_on_redrives_pin_but_reports_one_change() {
    let mut rig = Rig::new();
    rig.get("/on");
    rig.get("/on");
    assert_eq!(
        rig.hw.led_calls,
        vec![ActuatorState::Off, ActuatorState::On, ActuatorState::On]
    );
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::LedChanged { .. })), 1);
}

#[test]
fn wake_reply_still_applies_the_verb() {
    let mut rig = Rig::new();
    rig.press();

    let (outcome, body) = rig.get("/on");
    assert_eq!(body, "AWAKE\r\n");
    assert_eq!(
        outcome,
        DispatchOutcome::Served {
            verb: Verb::On,
            reply: Reply::Wake
        }
    );
    assert_eq!(rig.hw.led(), Some(ActuatorState::On));

    let (_, body) = rig.get("/");
    assert_eq!(body, "LED is ON");
}

#[test]
fn press_confirmed_in_the_serving_tick_wins() {
    let mut rig = Rig::new();
    rig.hw.press();
    // Level change seen at t=1; confirmed once more than 50ms have passed.
    rig.run_for(51);
    assert!(!rig.control.pending_wake());

    let client = rig.transport.request("GET /on HTTP/1.1\r\n\r\n");
    rig.clock.advance(1);
    let outcome = rig.tick();

    assert_eq!(client.body(), "AWAKE\r\n");
    assert_eq!(
        outcome,
        DispatchOutcome::Served {
            verb: Verb::On,
            reply: Reply::Wake
        }
    );
    assert_eq!(rig.control.actuator(), ActuatorState::On);
}

// ── Failure paths ─────────────────────────────────────────────

#[test]
fn dropped_clients_keep_the_pending_wake() {
    let mut rig = Rig::new();
    rig.press();

    let silent = rig.transport.silent();
    assert!(matches!(rig.tick(), DispatchOutcome::Dropped(_)));
    assert!(silent.closed.get());
    assert!(silent.received.borrow().is_empty());
    assert!(rig.control.pending_wake());

    let broken = rig.transport.unwritable("GET / HTTP/1.1\r\n\r\n");
    assert!(matches!(rig.tick(), DispatchOutcome::Dropped(_)));
    assert!(broken.closed.get());
    assert!(rig.control.pending_wake());

    let (_, body) = rig.get("/");
    assert_eq!(body, "AWAKE\r\n");
    assert_eq!(rig.control.requests_served(), 1);
    assert_eq!(rig.control.connections_dropped(), 2);
}

// ── Interrupt fast path ───────────────────────────────────────

#[test]
fn isr_latch_feeds_wake_flag_when_enabled() {
    let config = LampConfig {
        isr_fast_path: true,
        ..LampConfig::default()
    };
    let _latch = isr_latch();
    let mut rig = Rig::with_config(config, 0);

    button::button_isr_handler();
    rig.clock.advance(1);
    rig.tick();
    assert!(rig.control.pending_wake());
    assert_eq!(
        rig.sink.count(|e| *e == AppEvent::WakeQueued { coalesced: false }),
        1
    );

    let (_, body) = rig.get("/");
    assert_eq!(body, "AWAKE\r\n");
}

#[test]
fn interrupt_and_debounce_report_one_press() {
    let config = LampConfig {
        isr_fast_path: true,
        ..LampConfig::default()
    };
    let _latch = isr_latch();
    let mut rig = Rig::with_config(config, 0);

    rig.hw.press();
    button::button_isr_handler();
    rig.run_for(10);
    let (_, body) = rig.get("/");
    assert_eq!(body, "AWAKE\r\n");

    // Still held: the debounced commit lands around t=51.
    rig.run_for(140);
    assert!(rig.control.button_held());
    assert!(!rig.control.pending_wake());
    let (_, body) = rig.get("/");
    assert_eq!(body, "LED is OFF");

    assert_eq!(rig.sink.count(|e| *e == AppEvent::ButtonPressed), 1);
    assert_eq!(
        rig.sink.count(|e| *e == AppEvent::WakeQueued { coalesced: false }),
        1
    );
}
