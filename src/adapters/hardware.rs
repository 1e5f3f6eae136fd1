//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the door latch, the fan PWM, and the OLED, exposing them through
//! [`DoorPort`], [`FanPort`] and [`DisplayPort`] so the controller can take
//! all three as one `&mut`. On non-espidf targets the fan driver uses its
//! simulation stub; door and display are generic over `embedded-hal` pins
//! and buses.

use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::I2c;

use crate::adapters::display::OledDisplay;
use crate::app::ports::{DisplayPort, DoorPort, FanPort};
use crate::app::service::RoomStatus;
use crate::drivers::door::DoorLock;
use crate::drivers::fan_pwm::FanPwm;
use crate::error::ActuatorError;

/// Concrete adapter that combines all output hardware behind port traits.
pub struct HardwareAdapter<P, I> {
    door: DoorLock<P>,
    fan: FanPwm,
    display: OledDisplay<I>,
}

impl<P: OutputPin, I: I2c> HardwareAdapter<P, I> {
    pub fn new(door: DoorLock<P>, fan: FanPwm, display: OledDisplay<I>) -> Self {
        Self { door, fan, display }
    }

    pub fn fan(&mut self) -> &mut FanPwm {
        &mut self.fan
    }
}

// ── DoorPort implementation ───────────────────────────────────

impl<P: OutputPin, I: I2c> DoorPort for HardwareAdapter<P, I> {
    fn set_locked(&mut self, locked: bool) {
        // Failure is logged by the driver; next tick re-asserts.
        let _ = self.door.set_locked(locked);
    }
}

// ── FanPort implementation ────────────────────────────────────

impl<P: OutputPin, I: I2c> FanPort for HardwareAdapter<P, I> {
    fn write_duty(&mut self, duty: u8) {
        self.fan.write_duty(duty);
    }

    fn fade_ready(&self) -> bool {
        self.fan.fade_ready()
    }

    fn start_fade(&mut self, steps: &[u8]) -> Result<(), ActuatorError> {
        self.fan.start_fade(steps)
    }

    fn stop_fade(&mut self) {
        self.fan.stop_fade();
    }
}

// ── DisplayPort implementation ────────────────────────────────

impl<P: OutputPin, I: I2c> DisplayPort for HardwareAdapter<P, I> {
    fn render(&mut self, status: &RoomStatus) {
        self.display.render(status);
    }
}
