//! Button and LED drivers, interrupt setup, and the loop watchdog.

pub mod button;
pub mod hw_init;
pub mod status_led;
pub mod watchdog;
