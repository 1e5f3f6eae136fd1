//! Task watchdog for the control loop.
//!
//! The loop task subscribes once at boot and calls [`Watchdog::feed`] every
//! iteration. If the loop stalls past the timeout the TWDT panics and the
//! chip restarts into `Locked`, which is the safe state for the door.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

pub struct Watchdog {
    timeout_ms: u32,
    #[cfg(target_os = "espidf")]
    subscribed: bool,
}

impl Watchdog {
    /// Subscribe the calling task with a `timeout_ms` window.
    #[cfg(target_os = "espidf")]
    pub fn new(timeout_ms: u32) -> Self {
        let cfg = esp_task_wdt_config_t {
            timeout_ms,
            idle_core_mask: 0,
            trigger_panic: true,
        };
        // SAFETY: plain FFI calls with a stack config; NULL subscribes the
        // current task.
        let subscribed = unsafe {
            let ret = esp_task_wdt_reconfigure(&cfg);
            if ret != ESP_OK as i32 {
                log::warn!("watchdog: reconfigure returned {}", ret);
            }
            esp_task_wdt_add(core::ptr::null_mut()) == ESP_OK as i32
        };
        if subscribed {
            log::info!("watchdog: control loop subscribed ({} ms)", timeout_ms);
        } else {
            log::warn!("watchdog: subscribe failed, loop is unguarded");
        }
        Self {
            timeout_ms,
            subscribed,
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(timeout_ms: u32) -> Self {
        log::info!("watchdog(sim): {} ms window, not enforced", timeout_ms);
        Self { timeout_ms }
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    pub fn feed(&self) {
        #[cfg(target_os = "espidf")]
        if self.subscribed {
            // SAFETY: the task was subscribed in `new`.
            unsafe {
                esp_task_wdt_reset();
            }
        }
    }
}
