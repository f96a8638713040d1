//! One-shot GPIO interrupt setup for the button fast path.
//!
//! The LED and button pins themselves are configured through
//! `esp_idf_hal::gpio::PinDriver` in `main()`. This module only installs
//! the per-pin ISR service and hooks the button's falling edge to
//! [`button_isr_handler`](crate::drivers::button::button_isr_handler),
//! using raw ESP-IDF sys calls. Called once before the loop starts.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot interrupt setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    IsrInstallFailed(i32),
    IsrHandlerFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
            Self::IsrHandlerFailed(rc) => write!(f, "GPIO ISR handler add failed (rc={})", rc),
        }
    }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn button_gpio_isr(_arg: *mut core::ffi::c_void) {
    crate::drivers::button::button_isr_handler();
}

/// Install the GPIO ISR service and register the button falling-edge
/// handler. The pin must already be an input with pull-up.
#[cfg(target_os = "espidf")]
pub fn init_button_isr(button_gpio: i32) -> Result<(), HwInitError> {
    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed (acceptable). The handler registered
    // below only stores to a lock-free atomic.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK as i32 && ret != ESP_ERR_INVALID_STATE as i32 {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        gpio_set_intr_type(button_gpio, gpio_int_type_t_GPIO_INTR_NEGEDGE);
        let ret = gpio_isr_handler_add(button_gpio, Some(button_gpio_isr), core::ptr::null_mut());
        if ret != ESP_OK as i32 {
            return Err(HwInitError::IsrHandlerFailed(ret));
        }
        gpio_intr_enable(button_gpio);
    }
    log::info!("hw_init: button ISR on GPIO{} (falling edge)", button_gpio);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_button_isr(button_gpio: i32) -> Result<(), HwInitError> {
    log::info!("hw_init(sim): button ISR on GPIO{} skipped", button_gpio);
    Ok(())
}
