//! Task Watchdog Timer (TWDT) driver.
//!
//! Resets the device if the control loop stops ticking for longer than
//! the configured timeout. The loop calls `feed()` once per tick.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

pub struct Watchdog {
    #[cfg(target_os = "espidf")]
    subscribed: bool,
}

impl Watchdog {
    /// Reconfigure the TWDT and subscribe the calling task.
    pub fn new(timeout_ms: u32) -> Self {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: called once from the main task before the loop starts.
            let subscribed = unsafe {
                let cfg = esp_task_wdt_config_t {
                    timeout_ms,
                    idle_core_mask: 0,
                    trigger_panic: true,
                };
                let ret = esp_task_wdt_reconfigure(&cfg);
                if ret != ESP_OK as i32 {
                    log::warn!("Watchdog: reconfigure returned {} (keeping existing TWDT)", ret);
                }
                esp_task_wdt_add(core::ptr::null_mut()) == ESP_OK as i32
            };
            if subscribed {
                log::info!("Watchdog: loop task subscribed ({}ms)", timeout_ms);
            } else {
                log::warn!("Watchdog: subscribe failed, loop stalls will not reset");
            }
            Self { subscribed }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            log::info!("Watchdog(sim): {}ms timeout not enforced", timeout_ms);
            Self {}
        }
    }

    /// Must be called at least once per timeout period.
    pub fn feed(&self) {
        #[cfg(target_os = "espidf")]
        {
            if self.subscribed {
                // SAFETY: resets the TWDT entry for the current (subscribed) task.
                unsafe {
                    esp_task_wdt_reset();
                }
            }
        }
    }
}
