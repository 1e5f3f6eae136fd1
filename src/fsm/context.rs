//! Shared mutable context threaded through every FSM handler.
//!
//! `RoomContext` is the single struct that state handlers read from and
//! write to: the stored code, the entry buffer, timing, door intent, and
//! the fan mode. Think of it as the "blackboard" in a blackboard
//! architecture.

use crate::config::{PASSWORD_LENGTH, RoomConfig};
use crate::control::policy::{FanLevel, TemperatureBands};

// ---------------------------------------------------------------------------
// Access code
// ---------------------------------------------------------------------------

/// Stored access code. Always exactly [`PASSWORD_LENGTH`] bytes.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Password([u8; PASSWORD_LENGTH]);

impl Password {
    /// Accepts any candidate of the right length; digit content is the
    /// caller's concern.
    pub fn parse(candidate: &str) -> Option<Self> {
        let bytes: [u8; PASSWORD_LENGTH] = candidate.as_bytes().try_into().ok()?;
        Some(Self(bytes))
    }

    pub fn matches(&self, entered: &[u8]) -> bool {
        self.0.as_slice() == entered
    }
}

impl core::fmt::Debug for Password {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Password(****)")
    }
}

// ---------------------------------------------------------------------------
// Entry buffer
// ---------------------------------------------------------------------------

/// Digits typed so far. Capacity is the code length; pushes past it fail.
#[derive(Debug, Clone, Default)]
pub struct InputBuffer(heapless::Vec<u8, PASSWORD_LENGTH>);

impl InputBuffer {
    /// Append a digit. Returns `false` if the buffer is already full.
    pub fn push(&mut self, digit: u8) -> bool {
        self.0.push(digit).is_ok()
    }

    pub fn pop(&mut self) -> Option<u8> {
        self.0.pop()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.0.is_full()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// RoomContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct RoomContext {
    // -- Timing --
    /// Monotonic ms of the current call (key press or tick).
    pub now_ms: u32,
    /// Monotonic ms of the last key press, of any kind.
    pub last_input_ms: u32,
    /// Monotonic ms at which the current state was entered.
    pub state_enter_ms: u32,
    pub input_timeout_ms: u32,
    pub access_denied_timeout_ms: u32,

    // -- Access control --
    pub password: Password,
    pub input: InputBuffer,
    /// Lock intent pushed to the door driver every tick.
    pub door_locked: bool,

    // -- Climate --
    pub temperature_c: f32,
    pub fan_level: FanLevel,
    /// While set, the temperature policy is not consulted.
    pub manual_fan_override: bool,
    /// Manual level to return to when Emergency ends.
    pub held_fan_level: FanLevel,
    pub bands: TemperatureBands,

    // -- Display --
    /// Edge-triggered: set on any visible change, cleared after render.
    pub display_dirty: bool,
}

impl RoomContext {
    pub fn new(config: &RoomConfig) -> Self {
        let password = Password::parse(config.default_password.as_str())
            .unwrap_or(Password(*b"2222"));
        Self {
            now_ms: 0,
            last_input_ms: 0,
            state_enter_ms: 0,
            input_timeout_ms: config.input_timeout_ms,
            access_denied_timeout_ms: config.access_denied_timeout_ms,
            password,
            input: InputBuffer::default(),
            door_locked: true,
            temperature_c: config.boot_temperature_c,
            fan_level: FanLevel::Off,
            manual_fan_override: false,
            held_fan_level: FanLevel::Off,
            bands: TemperatureBands::from_config(config),
            display_dirty: true,
        }
    }

    /// Milliseconds since the last key press (wrap-safe).
    pub fn ms_since_input(&self) -> u32 {
        self.now_ms.wrapping_sub(self.last_input_ms)
    }

    /// Milliseconds since the current state was entered (wrap-safe).
    pub fn ms_in_state(&self) -> u32 {
        self.now_ms.wrapping_sub(self.state_enter_ms)
    }

    /// Switch to manual mode at `level`.
    pub fn force_fan_level(&mut self, level: FanLevel) {
        self.manual_fan_override = true;
        self.fan_level = level;
        self.held_fan_level = level;
        self.display_dirty = true;
    }

    /// Leave manual mode and re-derive the level from the last sample.
    pub fn resume_auto_fan(&mut self) {
        self.manual_fan_override = false;
        self.fan_level = self.bands.level_for(self.temperature_c);
    }

    /// Compare the full entry buffer against the stored code.
    pub fn entry_matches(&self) -> bool {
        self.password.matches(self.input.as_slice())
    }
}
