//! System configuration parameters
//!
//! All tunable parameters for the room controller. Values live in RAM only;
//! nothing here survives a power cycle.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of digits in the access code.
pub const PASSWORD_LENGTH: usize = 4;

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    // --- Access control ---
    /// Code loaded at boot (exactly [`PASSWORD_LENGTH`] ASCII digits).
    pub default_password: heapless::String<PASSWORD_LENGTH>,
    /// Inactivity window during code entry before re-locking (ms).
    pub input_timeout_ms: u32,
    /// Dwell time in the denied state before re-locking (ms).
    pub access_denied_timeout_ms: u32,

    // --- Fan thresholds ---
    /// Lower bound (inclusive) of the Low band (Celsius).
    pub fan_low_threshold_c: f32,
    /// Lower bound (inclusive) of the Med band (Celsius).
    pub fan_med_threshold_c: f32,
    /// Lower bound (inclusive) of the High band (Celsius).
    pub fan_high_threshold_c: f32,
    /// Readings below this are treated as a sensor fault (Celsius).
    pub sensor_min_c: f32,
    /// Readings above this are treated as a sensor fault (Celsius).
    pub sensor_max_c: f32,
    /// Temperature assumed at boot before the first sample (Celsius).
    pub boot_temperature_c: f32,

    // --- Timing ---
    /// Keypad debounce window (ms).
    pub keypad_debounce_ms: u32,
    /// Main loop period (ms).
    pub control_loop_interval_ms: u32,
    /// Temperature sample interval (ms).
    pub temperature_sample_interval_ms: u32,
    /// Control-loop stall window before the task watchdog resets (ms).
    pub watchdog_timeout_ms: u32,
}

impl Default for RoomConfig {
    fn default() -> Self {
        let mut default_password = heapless::String::new();
        // Literal is exactly PASSWORD_LENGTH bytes.
        let _ = default_password.push_str("2222");

        Self {
            // Access control
            default_password,
            input_timeout_ms: 10_000,
            access_denied_timeout_ms: 3_000,

            // Fan thresholds
            fan_low_threshold_c: 25.0,
            fan_med_threshold_c: 28.0,
            fan_high_threshold_c: 31.0,
            sensor_min_c: -20.0,
            sensor_max_c: 80.0,
            boot_temperature_c: 22.0,

            // Timing
            keypad_debounce_ms: 30,
            control_loop_interval_ms: 5,
            temperature_sample_interval_ms: 500,
            watchdog_timeout_ms: 5_000,
        }
    }
}

impl RoomConfig {
    /// Range-check every field. Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<()> {
        let pw = self.default_password.as_bytes();
        if pw.len() != PASSWORD_LENGTH || !pw.iter().all(u8::is_ascii_digit) {
            return Err(Error::Config("default_password must be 4 ASCII digits"));
        }
        if self.input_timeout_ms == 0 || self.access_denied_timeout_ms == 0 {
            return Err(Error::Config("timeouts must be non-zero"));
        }
        if !(self.sensor_min_c < self.fan_low_threshold_c
            && self.fan_low_threshold_c < self.fan_med_threshold_c
            && self.fan_med_threshold_c < self.fan_high_threshold_c
            && self.fan_high_threshold_c <= self.sensor_max_c)
        {
            return Err(Error::Config(
                "fan thresholds must be strictly increasing inside the sensor range",
            ));
        }
        if self.control_loop_interval_ms == 0
            || self.control_loop_interval_ms >= self.access_denied_timeout_ms
        {
            return Err(Error::Config("control loop must be faster than the shortest timeout"));
        }
        if self.watchdog_timeout_ms <= self.control_loop_interval_ms {
            return Err(Error::Config("watchdog window must exceed the control loop period"));
        }
        Ok(())
    }
}
