//! Door latch relay driver.
//!
//! The latch is energised (locked) while the output is HIGH. The controller
//! re-asserts its intent every tick, so only edges are logged.

use embedded_hal::digital::OutputPin;
use log::{info, warn};

use crate::error::ActuatorError;

pub struct DoorLock<P> {
    pin: P,
    locked: Option<bool>,
}

impl<P: OutputPin> DoorLock<P> {
    pub fn new(pin: P) -> Self {
        Self { pin, locked: None }
    }

    pub fn set_locked(&mut self, locked: bool) -> Result<(), ActuatorError> {
        let res = if locked { self.pin.set_high() } else { self.pin.set_low() };
        if res.is_err() {
            warn!("door: GPIO write failed (locked={})", locked);
            return Err(ActuatorError::GpioWriteFailed);
        }
        if self.locked != Some(locked) {
            info!("door: {}", if locked { "locked" } else { "released" });
            self.locked = Some(locked);
        }
        Ok(())
    }

    /// Last state successfully written, `None` before the first write.
    pub fn is_locked(&self) -> Option<bool> {
        self.locked
    }
}
