//! Fan control: the temperature policy and the fading PWM actuator.

pub mod fan;
pub mod policy;
