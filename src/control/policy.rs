//! Temperature policy: maps a temperature sample to a discrete fan level.
//!
//! Bands are half-open on the lower bound:
//!
//! ```text
//!   < low      → Off
//!   [low, med) → Low
//!   [med, high)→ Med
//!   >= high    → High
//! ```
//!
//! Anything outside the sensor range (or NaN) is a sensor fault and maps to
//! `Off`. There is no hysteresis: a reading that oscillates across a band
//! edge flips the level on every sample.

use crate::config::RoomConfig;

/// Discrete fan speed requested by the room controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum FanLevel {
    #[default]
    Off = 0,
    Low = 1,
    Med = 2,
    High = 3,
}

impl FanLevel {
    /// PWM duty (percent of a 0–99 period) driven for this level.
    pub const fn duty(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::Low => 30,
            Self::Med => 70,
            Self::High => 99,
        }
    }

    /// Level for a keypad / protocol digit `'0'..='3'`.
    pub fn from_digit(c: char) -> Option<Self> {
        match c {
            '0' => Some(Self::Off),
            '1' => Some(Self::Low),
            '2' => Some(Self::Med),
            '3' => Some(Self::High),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Low => "LOW",
            Self::Med => "MED",
            Self::High => "HIGH",
        }
    }
}

/// Band thresholds, lifted out of [`RoomConfig`] so the policy stays `Copy`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureBands {
    pub low_c: f32,
    pub med_c: f32,
    pub high_c: f32,
    pub min_valid_c: f32,
    pub max_valid_c: f32,
}

impl Default for TemperatureBands {
    fn default() -> Self {
        Self::from_config(&RoomConfig::default())
    }
}

impl TemperatureBands {
    pub fn from_config(config: &RoomConfig) -> Self {
        Self {
            low_c: config.fan_low_threshold_c,
            med_c: config.fan_med_threshold_c,
            high_c: config.fan_high_threshold_c,
            min_valid_c: config.sensor_min_c,
            max_valid_c: config.sensor_max_c,
        }
    }

    /// Resolve the fan level for `celsius`. Pure; never fails.
    pub fn level_for(&self, celsius: f32) -> FanLevel {
        // `!(a <= x && x <= b)` also catches NaN.
        if !(self.min_valid_c <= celsius && celsius <= self.max_valid_c) {
            return FanLevel::Off;
        }
        if celsius < self.low_c {
            FanLevel::Off
        } else if celsius < self.med_c {
            FanLevel::Low
        } else if celsius < self.high_c {
            FanLevel::Med
        } else {
            FanLevel::High
        }
    }
}

/// Resolve a fan level with the default bands.
pub fn fan_level_for(celsius: f32) -> FanLevel {
    TemperatureBands::default().level_for(celsius)
}
