//! Lamp LED driver.
//!
//! A single active-high GPIO output behind `embedded_hal::digital::OutputPin`.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: wraps an `esp_idf_hal::gpio::PinDriver` in output mode.
//! On host/test: any `OutputPin` (mock pins record writes).

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::state::ActuatorState;

pub struct StatusLed<P> {
    pin: P,
    current: ActuatorState,
}

impl<P: OutputPin> StatusLed<P> {
    /// Takes ownership of the pin and drives it low (OFF).
    pub fn new(pin: P) -> Self {
        let mut led = Self {
            pin,
            current: ActuatorState::Off,
        };
        led.set(ActuatorState::Off);
        led
    }

    /// A failed pin write keeps the logical state; the next command retries.
    pub fn set(&mut self, state: ActuatorState) {
        let result = if state.is_on() {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        if let Err(e) = result {
            warn!("LED: pin write failed ({:?})", e);
        }
        self.current = state;
    }

    pub fn current(&self) -> ActuatorState {
        self.current
    }
}
