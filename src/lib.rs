//! Wakelamp firmware library.
//!
//! A debounced push button queues a wake event; a tiny HTTP endpoint
//! switches the lamp LED (`/on`, `/off`) and hands the wake event to the
//! next client. Everything except the ESP-IDF bring-up lives here so the
//! control loop can be exercised on the host. ESP-IDF-specific code is
//! guarded by `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod http;
pub mod pins;

pub use error::{Error, Result};
