//! LM35 analog temperature sensor (10 mV/°C, 0 °C at 0 V).
//!
//! Read through one bounded oneshot ADC conversion and converted linearly:
//!
//! ```text
//!   V = raw / 4095 * 3.3
//!   T = V * 100
//! ```
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1_CH4 via the oneshot API (initialised by hw_init).
//! On host/test: reads from a static AtomicU16 for injection, with a
//! separate flag to simulate a conversion timeout.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, AtomicU16, Ordering};

use log::warn;

use crate::app::ports::TemperaturePort;
use crate::error::SensorError;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

/// Value reported when a sample cannot be taken. Lies below the valid
/// range, so the fan policy maps it to `Off`.
pub const SENSOR_FAULT_C: f32 = -40.0;

const ADC_MAX: f32 = 4095.0;
const V_REF: f32 = 3.3;
const MV_PER_DEG: f32 = 10.0;
/// Top of the LM35's rated range. Anything above means a floating or
/// shorted input, not a hot room.
const LM35_MAX_C: f32 = 150.0;

#[cfg(not(target_os = "espidf"))]
static SIM_TEMP_ADC: AtomicU16 = AtomicU16::new(273); // ≈ 22 °C
#[cfg(not(target_os = "espidf"))]
static SIM_ADC_TIMEOUT: AtomicBool = AtomicBool::new(false);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_temp_adc(raw: u16) {
    SIM_TEMP_ADC.store(raw, Ordering::Relaxed);
}

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_adc_timeout(timeout: bool) {
    SIM_ADC_TIMEOUT.store(timeout, Ordering::Relaxed);
}

/// Convert a 12-bit ADC reading to °C.
pub fn adc_to_celsius(raw: u16) -> f32 {
    let volts = f32::from(raw.min(4095)) / ADC_MAX * V_REF;
    volts * 1000.0 / MV_PER_DEG
}

pub struct Lm35Sensor {
    channel: u32,
}

impl Lm35Sensor {
    pub fn new(channel: u32) -> Self {
        Self { channel }
    }

    /// Fail-soft read: any error is logged and reported as
    /// [`SENSOR_FAULT_C`].
    pub fn sample(&mut self) -> f32 {
        self.read_celsius().unwrap_or_else(|e| {
            warn!("LM35 (ch{}): {}, reporting {:.1} C", self.channel, e, SENSOR_FAULT_C);
            SENSOR_FAULT_C
        })
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> Result<u16, SensorError> {
        hw_init::adc1_read(self.channel)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> Result<u16, SensorError> {
        if SIM_ADC_TIMEOUT.load(Ordering::Relaxed) {
            return Err(SensorError::AdcTimeout);
        }
        Ok(SIM_TEMP_ADC.load(Ordering::Relaxed))
    }
}

impl TemperaturePort for Lm35Sensor {
    fn read_celsius(&mut self) -> Result<f32, SensorError> {
        let celsius = adc_to_celsius(self.read_adc()?);
        if celsius > LM35_MAX_C {
            return Err(SensorError::OutOfRange);
        }
        Ok(celsius)
    }
}
