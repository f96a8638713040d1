//! System configuration parameters
//!
//! All tunable parameters for the lamp firmware. Values are compiled-in
//! defaults, optionally overridden at build time by a JSON document in
//! `WAKELAMP_CONFIG_JSON`. Nothing is persisted to flash.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::http::request::REQUEST_LINE_CAPACITY;

/// Core lamp configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LampConfig {
    // --- Network ---
    /// TCP port the request dispatcher listens on
    pub http_port: u16,

    // --- Button ---
    /// Settle duration: the raw level must be stable for longer than this
    /// before a transition is accepted (milliseconds)
    pub debounce_ms: u32,
    /// Merge the GPIO falling-edge interrupt latch into the pending wake flag
    pub isr_fast_path: bool,

    // --- Request handling ---
    /// Deadline for receiving the full request line (milliseconds)
    pub read_timeout_ms: u32,
    /// Longest single wait granted to one socket read (milliseconds)
    pub io_slice_ms: u32,
    /// Socket send timeout for the reply (milliseconds)
    pub write_timeout_ms: u32,
    /// Byte cap for the request line
    pub max_request_line: usize,
    /// Maximum bytes of headers/body discarded after the request line
    pub drain_limit: usize,
    /// Deadline for discarding the bytes after the request line (milliseconds)
    pub drain_timeout_ms: u32,

    // --- Timing ---
    /// Pause at the end of every loop tick (milliseconds)
    pub loop_idle_ms: u32,
    /// Task watchdog timeout (milliseconds)
    pub watchdog_timeout_ms: u32,
}

impl Default for LampConfig {
    fn default() -> Self {
        Self {
            // Network
            http_port: 80,

            // Button
            debounce_ms: 50,
            isr_fast_path: false,

            // Request handling
            read_timeout_ms: 250,
            io_slice_ms: 5,
            write_timeout_ms: 500,
            max_request_line: 256,
            drain_limit: 1024,
            drain_timeout_ms: 20,

            // Timing
            loop_idle_ms: 1,
            watchdog_timeout_ms: 5_000,
        }
    }
}

impl LampConfig {
    /// Reject values that would break loop timing or the request bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http_port == 0 {
            return Err(ConfigError::ValidationFailed("http_port must be non-zero"));
        }
        if self.debounce_ms == 0 {
            return Err(ConfigError::ValidationFailed("debounce_ms must be non-zero"));
        }
        if self.loop_idle_ms >= self.debounce_ms {
            return Err(ConfigError::ValidationFailed(
                "loop_idle_ms must be shorter than debounce_ms",
            ));
        }
        if self.read_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed("read_timeout_ms must be non-zero"));
        }
        if self.io_slice_ms == 0 || self.io_slice_ms > self.read_timeout_ms {
            return Err(ConfigError::ValidationFailed(
                "io_slice_ms must be within 1..=read_timeout_ms",
            ));
        }
        if self.write_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed("write_timeout_ms must be non-zero"));
        }
        if self.max_request_line < 16 || self.max_request_line > REQUEST_LINE_CAPACITY {
            return Err(ConfigError::ValidationFailed(
                "max_request_line must be within 16..=512",
            ));
        }
        if self.drain_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed("drain_timeout_ms must be non-zero"));
        }
        let dispatch_ms = self
            .read_timeout_ms
            .saturating_add(self.drain_timeout_ms)
            .saturating_add(self.write_timeout_ms);
        if self.watchdog_timeout_ms <= dispatch_ms {
            return Err(ConfigError::ValidationFailed(
                "watchdog_timeout_ms must exceed the worst-case dispatch time",
            ));
        }
        Ok(())
    }

    /// Parse a JSON override. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Malformed)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, overridden by `WAKELAMP_CONFIG_JSON` if it was set at
    /// build time. A rejected override is logged and ignored.
    pub fn from_build_env() -> Self {
        Self::from_override(option_env!("WAKELAMP_CONFIG_JSON"))
    }

    fn from_override(json: Option<&str>) -> Self {
        match json {
            Some(doc) => Self::from_json(doc).unwrap_or_else(|e| {
                log::warn!("Config: override rejected ({}), using defaults", e);
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// Serialise for the boot log.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string(self).map_err(|_| ConfigError::Malformed)
    }
}

/// Errors from loading or validating [`LampConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The override document is not valid JSON for this struct.
    Malformed,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "config document malformed"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}
