//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ RoomController (domain)
//! ```
//!
//! Driven adapters (door latch, fan PWM, display, temperature sensor, event
//! sinks) implement these traits. The
//! [`RoomController`](super::service::RoomController) consumes them via
//! generics, so the domain core never touches hardware directly.

use crate::error::{ActuatorError, SensorError};

use super::service::RoomStatus;

// ───────────────────────────────────────────────────────────────
// Door port (driven adapter: domain → lock relay)
// ───────────────────────────────────────────────────────────────

/// The domain pushes its lock intent through this port on every tick.
pub trait DoorPort {
    /// `true` energises the latch, `false` releases it.
    fn set_locked(&mut self, locked: bool);
}

// ───────────────────────────────────────────────────────────────
// Fan port (driven adapter: domain → PWM + fade channel)
// ───────────────────────────────────────────────────────────────

/// PWM output with an optional buffered fade channel.
///
/// Duties are percent of a 0–99 period. `start_fade` plays `steps` one per
/// timer period; when the last one is out, the platform calls
/// [`FadeSignal::on_transfer_complete`](crate::control::fan::FadeSignal::on_transfer_complete).
pub trait FanPort {
    /// Write a duty immediately, bypassing any fade.
    fn write_duty(&mut self, duty: u8);

    /// Whether a fade can be dispatched right now.
    fn fade_ready(&self) -> bool;

    /// Begin playing `steps`. Must not block.
    fn start_fade(&mut self, steps: &[u8]) -> Result<(), ActuatorError>;

    /// Halt the fade channel. Idempotent; callable from interrupt context.
    fn stop_fade(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → screen)
// ───────────────────────────────────────────────────────────────

/// Renders a status snapshot. Only invoked when something visible changed.
pub trait DisplayPort {
    fn render(&mut self, status: &RoomStatus);
}

// ───────────────────────────────────────────────────────────────
// Temperature port (driving adapter: sensor → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port for the ambient temperature sensor.
pub trait TemperaturePort {
    /// One sample in °C.
    fn read_celsius(&mut self) -> Result<f32, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
