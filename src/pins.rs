//! GPIO assignments for the lamp board.
//!
//! `main()` takes the matching `peripherals.pins.gpioN` fields; keep the
//! two in sync when rewiring.

/// Lamp LED, active HIGH.
pub const LED_GPIO: i32 = 2;

/// Push button to GND with internal pull-up. LOW = pressed.
pub const BUTTON_GPIO: i32 = 12;
