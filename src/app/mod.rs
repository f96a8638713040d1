//! Application core: pure domain logic, zero I/O.
//!
//! This module holds the control-loop state and orchestration: button
//! debouncing feeds a wake flag, request dispatch reads and clears it and
//! owns the LED state. All interaction with hardware happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
pub mod state;
