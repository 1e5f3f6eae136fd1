//! Actuator and peripheral drivers, plus one-shot hardware initialisation.

pub mod door;
pub mod fan_pwm;
pub mod hw_init;
pub mod keypad;
pub mod oled;
pub mod watchdog;
