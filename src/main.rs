//! Wakelamp Firmware: Main Entry Point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                    │
//! │                                                            │
//! │  HardwareAdapter   TcpTransport   MonotonicClock           │
//! │  (Button+LED)      (Transport)    (ClockPort)              │
//! │  LogEventSink      WiFi STA (boot only)                    │
//! │                                                            │
//! │  ──────────────── Port Trait Boundary ───────────────      │
//! │                                                            │
//! │  ┌──────────────────────────────────────────────────┐      │
//! │  │            ControlLoop (pure logic)              │      │
//! │  │  Debouncer · RequestDispatcher                   │      │
//! │  └──────────────────────────────────────────────────┘      │
//! └────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::time::Duration;

use anyhow::Result;
use esp_idf_hal::gpio::{PinDriver, Pull};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use log::{info, warn};

use wakelamp::adapters::hardware::HardwareAdapter;
use wakelamp::adapters::log_sink::LogEventSink;
use wakelamp::adapters::tcp_transport::TcpTransport;
use wakelamp::adapters::time::MonotonicClock;
use wakelamp::adapters::wifi::{self, WifiCredentials};
use wakelamp::app::service::ControlLoop;
use wakelamp::config::LampConfig;
use wakelamp::drivers::hw_init;
use wakelamp::drivers::status_led::StatusLed;
use wakelamp::drivers::watchdog::Watchdog;
use wakelamp::pins;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Wakelamp v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Config (compiled-in defaults + optional override) ──
    let config = LampConfig::from_build_env();
    match config.to_json() {
        Ok(json) => info!("Config: {}", json),
        Err(e) => warn!("Config: cannot render ({})", e),
    }

    // ── 3. LED + button ───────────────────────────────────────
    let peripherals = Peripherals::take()?;

    // pins::LED_GPIO / pins::BUTTON_GPIO
    let led_pin = PinDriver::output(peripherals.pins.gpio2)?;
    let mut button_pin = PinDriver::input(peripherals.pins.gpio12)?;
    button_pin.set_pull(Pull::Up)?;
    info!("GPIO: LED on {}, button on {} (pull-up)", pins::LED_GPIO, pins::BUTTON_GPIO);

    let mut hw = HardwareAdapter::new(StatusLed::new(led_pin), button_pin);

    if config.isr_fast_path {
        if let Err(e) = hw_init::init_button_isr(pins::BUTTON_GPIO) {
            warn!("{}, continuing with polled button only", e);
        }
    }

    // ── 4. Network ────────────────────────────────────────────
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;
    let creds = WifiCredentials::from_build_env().map_err(wakelamp::Error::from)?;
    // Held for the lifetime of the program; dropping it tears down WiFi.
    let _wifi = wifi::connect_station(peripherals.modem, sysloop, nvs, &creds)?;

    let mut transport = TcpTransport::bind(config.http_port, &config).map_err(wakelamp::Error::from)?;

    // ── 5. Control loop ───────────────────────────────────────
    let clock = MonotonicClock::new();
    let mut sink = LogEventSink::new();
    let watchdog = Watchdog::new(config.watchdog_timeout_ms);

    let mut control = ControlLoop::new(&config);
    control.start(&mut hw, &mut sink);

    let idle = Duration::from_millis(u64::from(config.loop_idle_ms));
    loop {
        control.tick(&mut hw, &mut transport, &clock, &mut sink);
        watchdog.feed();
        std::thread::sleep(idle);
    }
}
