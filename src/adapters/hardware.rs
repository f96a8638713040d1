//! Hardware adapter: bridges the lamp pins to the domain ports.
//!
//! Wraps the [`StatusLed`] driver and the raw button input so that
//! [`ControlLoop`](crate::app::service::ControlLoop) sees only
//! [`ButtonPort`] and [`LedPort`].
//!
//! Generic over `embedded_hal` pin traits: `PinDriver` on the device,
//! mock pins in tests.

use embedded_hal::digital::{InputPin, OutputPin};
use log::warn;

use crate::app::ports::{ButtonPort, LedPort};
use crate::app::state::ActuatorState;
use crate::drivers::button::Level;
use crate::drivers::status_led::StatusLed;

pub struct HardwareAdapter<L, B> {
    led: StatusLed<L>,
    button: B,
    read_faults: u32,
}

impl<L: OutputPin, B: InputPin> HardwareAdapter<L, B> {
    pub fn new(led: StatusLed<L>, button: B) -> Self {
        Self {
            led,
            button,
            read_faults: 0,
        }
    }

    pub fn led_state(&self) -> ActuatorState {
        self.led.current()
    }

    /// Button reads that failed and were reported as idle.
    pub fn read_faults(&self) -> u32 {
        self.read_faults
    }
}

impl<L: OutputPin, B: InputPin> ButtonPort for HardwareAdapter<L, B> {
    fn read_level(&mut self) -> Level {
        match self.button.is_high() {
            Ok(high) => Level::from_high(high),
            Err(e) => {
                // Treat as released so a flaky pin can never fake a press.
                if self.read_faults == 0 {
                    warn!("BUTTON: pin read failed ({:?}), treating as released", e);
                }
                self.read_faults = self.read_faults.saturating_add(1);
                Level::High
            }
        }
    }
}

impl<L: OutputPin, B: InputPin> LedPort for HardwareAdapter<L, B> {
    fn set_led(&mut self, state: ActuatorState) {
        self.led.set(state);
    }
}
