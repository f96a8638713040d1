//! Unified error type for the wakelamp firmware.
//!
//! Each subsystem keeps its own small error enum next to the code that
//! raises it. Boot code funnels them into [`Error`]. The control loop itself
//! never returns errors: per-connection failures are reported as events.

use core::fmt;

use crate::adapters::wifi::ConnectivityError;
use crate::config::ConfigError;
use crate::drivers::hw_init::HwInitError;
use crate::http::transport::TransportError;

/// Every fallible boot step funnels into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Configuration is invalid or could not be parsed.
    Config(ConfigError),
    /// The listener could not be opened.
    Transport(TransportError),
    /// WiFi credentials were missing or association failed.
    Connectivity(ConnectivityError),
    /// Interrupt setup failed.
    HwInit(HwInitError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Connectivity(e) => write!(f, "wifi: {e}"),
            Self::HwInit(e) => write!(f, "hw init: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

impl From<ConnectivityError> for Error {
    fn from(e: ConnectivityError) -> Self {
        Self::Connectivity(e)
    }
}

impl From<HwInitError> for Error {
    fn from(e: HwInitError) -> Self {
        Self::HwInit(e)
    }
}

pub type Result<T> = core::result::Result<T, Error>;
