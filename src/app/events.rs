//! Outbound application events.
//!
//! The [`RoomController`](super::service::RoomController) emits these
//! through the [`EventSink`](super::ports::EventSink) port.

use crate::control::policy::FanLevel;
use crate::fsm::RoomState;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The controller has started (carries initial state).
    Started(RoomState),

    /// The FSM transitioned between states.
    StateChanged { from: RoomState, to: RoomState },

    /// The requested fan level changed.
    FanLevelChanged { level: FanLevel, manual: bool },

    /// A new temperature sample was accepted.
    TemperatureSampled(f32),

    /// The stored access code was replaced.
    PasswordChanged,

    /// A fade could not be dispatched; the duty was written directly.
    FadeFallback { duty: u8 },
}
