//! WiFi station-mode bring-up.
//!
//! Credentials are baked in at build time from `WAKELAMP_WIFI_SSID` and
//! `WAKELAMP_WIFI_PASS`. Validation is plain Rust and runs on the host;
//! the association itself only exists on ESP-IDF.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `esp_idf_svc::wifi` blocking driver.
//! - **all other targets**: only the credential types (the host build
//!   serves on whatever interface the OS already has).

use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectivityError {
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
    ConnectionFailed,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no WiFi credentials configured"),
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)"),
            Self::ConnectionFailed => write!(f, "WiFi connection failed"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_ssid(ssid: &str) -> Result<(), ConnectivityError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(ConnectivityError::InvalidSsid);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ConnectivityError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(ConnectivityError::InvalidPassword);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// Credentials
// ───────────────────────────────────────────────────────────────

#[derive(Clone, PartialEq, Eq)]
pub struct WifiCredentials {
    ssid: heapless::String<32>,
    password: heapless::String<64>,
}

impl WifiCredentials {
    pub fn new(ssid: &str, password: &str) -> Result<Self, ConnectivityError> {
        validate_ssid(ssid)?;
        validate_password(password)?;

        let mut creds = Self {
            ssid: heapless::String::new(),
            password: heapless::String::new(),
        };
        creds
            .ssid
            .push_str(ssid)
            .map_err(|()| ConnectivityError::InvalidSsid)?;
        creds
            .password
            .push_str(password)
            .map_err(|()| ConnectivityError::InvalidPassword)?;
        Ok(creds)
    }

    /// Credentials compiled into the firmware image.
    pub fn from_build_env() -> Result<Self, ConnectivityError> {
        match option_env!("WAKELAMP_WIFI_SSID") {
            Some(ssid) => Self::new(ssid, option_env!("WAKELAMP_WIFI_PASS").unwrap_or("")),
            None => Err(ConnectivityError::NoCredentials),
        }
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Open network (no passphrase).
    pub fn is_open(&self) -> bool {
        self.password.is_empty()
    }
}

// Never print the passphrase.
impl fmt::Debug for WifiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WifiCredentials")
            .field("ssid", &self.ssid)
            .field("open", &self.is_open())
            .finish()
    }
}

// ───────────────────────────────────────────────────────────────
// Station bring-up (ESP-IDF)
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub use station::connect_station;

#[cfg(target_os = "espidf")]
mod station {
    use anyhow::anyhow;
    use esp_idf_hal::modem::Modem;
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;
    use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};
    use log::{info, warn};

    use super::{ConnectivityError, WifiCredentials};
    use crate::error::Error;

    /// Associate with the access point and wait until DHCP assigns an
    /// address. Blocks; called once before the control loop starts.
    ///
    /// The returned driver must stay alive for as long as the network is
    /// in use.
    pub fn connect_station(
        modem: Modem,
        sysloop: EspSystemEventLoop,
        nvs: EspDefaultNvsPartition,
        creds: &WifiCredentials,
    ) -> anyhow::Result<BlockingWifi<EspWifi<'static>>> {
        let mut wifi = BlockingWifi::wrap(EspWifi::new(modem, sysloop.clone(), Some(nvs))?, sysloop)?;

        let config = Configuration::Client(ClientConfiguration {
            ssid: creds
                .ssid()
                .try_into()
                .map_err(|_| anyhow!("SSID does not fit driver buffer"))?,
            password: creds
                .password()
                .try_into()
                .map_err(|_| anyhow!("password does not fit driver buffer"))?,
            auth_method: if creds.is_open() {
                AuthMethod::None
            } else {
                AuthMethod::WPA2Personal
            },
            ..Default::default()
        });
        wifi.set_configuration(&config)?;

        wifi.start()?;
        info!("WiFi: started, associating with '{}'", creds.ssid());

        wifi.connect().map_err(|e| {
            warn!("WiFi: association with '{}' failed: {:?}", creds.ssid(), e);
            Error::from(ConnectivityError::ConnectionFailed)
        })?;
        wifi.wait_netif_up().map_err(|e| {
            warn!("WiFi: no address from DHCP: {:?}", e);
            Error::from(ConnectivityError::ConnectionFailed)
        })?;

        let ip = wifi.wifi().sta_netif().get_ip_info()?.ip;
        info!("WiFi: connected, address {}", ip);
        Ok(wifi)
    }
}
