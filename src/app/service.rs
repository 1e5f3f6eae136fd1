//! Application service: the hexagonal core.
//!
//! [`RoomController`] owns the FSM, the shared context, and the fan
//! actuator. It exposes a hardware-agnostic API; all I/O flows through port
//! traits injected at call sites, and time is always passed in as `now_ms`
//! so the controller never reads a clock of its own.
//!
//! ```text
//!   keys ─────────▶ ┌────────────────────────┐ ──▶ DoorPort
//!   temperature ──▶ │     RoomController     │ ──▶ FanPort
//!   commands ─────▶ │  FSM · policy · fan    │ ──▶ DisplayPort
//!                   └────────────────────────┘ ──▶ EventSink
//! ```

use core::fmt::Write as _;

use log::{debug, info, warn};

use crate::config::RoomConfig;
use crate::control::fan::{FadeSignal, FanAction, FanActuator};
use crate::control::policy::FanLevel;
use crate::fsm::context::{Password, RoomContext};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, RoomState};

use super::commands::{AppCommand, Reply};
use super::events::AppEvent;
use super::ports::{DisplayPort, DoorPort, EventSink, FanPort};

// ───────────────────────────────────────────────────────────────
// Status snapshot
// ───────────────────────────────────────────────────────────────

/// Point-in-time view of the controller, handed to the display and the
/// status command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomStatus {
    pub state: RoomState,
    pub door_locked: bool,
    pub fan_level: FanLevel,
    pub manual_fan_override: bool,
    pub temperature_c: f32,
    /// Digits typed so far in the current entry.
    pub input_len: usize,
}

// ───────────────────────────────────────────────────────────────
// RoomController
// ───────────────────────────────────────────────────────────────

/// The room controller orchestrates all domain logic.
pub struct RoomController {
    fsm: Fsm,
    ctx: RoomContext,
    fan: FanActuator,
    /// Fan mode last reported through the event sink.
    reported_fan: (FanLevel, bool),
    /// Stored code replaced since the last `PasswordChanged` event.
    password_changed: bool,
    tick_count: u64,
}

impl RoomController {
    /// Construct the controller from configuration.
    ///
    /// Does **not** start the FSM; call [`start`](Self::start) next.
    /// `fade` is the completion handoff shared with the platform's fade
    /// callback.
    pub fn new(config: &RoomConfig, fade: &'static FadeSignal) -> Self {
        let ctx = RoomContext::new(config);
        let fsm = Fsm::new(build_state_table(), RoomState::Locked);
        let reported_fan = (ctx.fan_level, ctx.manual_fan_override);

        Self {
            fsm,
            ctx,
            fan: FanActuator::new(fade),
            reported_fan,
            password_changed: false,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Enter the initial state (Locked).
    pub fn start(&mut self, now_ms: u32, sink: &mut impl EventSink) {
        self.ctx.now_ms = now_ms;
        self.ctx.last_input_ms = now_ms;
        self.fsm.start(&mut self.ctx);
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        info!("RoomController started in {:?}", self.fsm.current_state());
    }

    // ── Inputs ────────────────────────────────────────────────

    /// Feed one debounced key press.
    pub fn process_key(&mut self, key: char, now_ms: u32, sink: &mut impl EventSink) {
        debug!("key {:?} in {}", key, self.fsm.current_name());
        self.ctx.now_ms = now_ms;
        self.ctx.last_input_ms = now_ms;
        self.ctx.display_dirty = true;

        let prev = self.fsm.current_state();
        self.fsm.handle_key(key, &mut self.ctx);
        self.emit_state_change(prev, sink);
    }

    /// Record a temperature sample and, in automatic mode, re-derive the
    /// fan level from it.
    pub fn set_temperature(&mut self, celsius: f32, sink: &mut impl EventSink) {
        self.ctx.temperature_c = celsius;
        sink.emit(&AppEvent::TemperatureSampled(celsius));

        if self.ctx.manual_fan_override {
            return;
        }
        let level = self.ctx.bands.level_for(celsius);
        if level != self.ctx.fan_level {
            self.ctx.fan_level = level;
            self.ctx.display_dirty = true;
        }
    }

    /// Replace the stored code. Ignored unless `candidate` is exactly four
    /// bytes long; returns whether it was accepted. The `PasswordChanged`
    /// event goes out on the next [`update`](Self::update).
    pub fn change_password(&mut self, candidate: &str) -> bool {
        match Password::parse(candidate) {
            Some(password) => {
                self.store_password(password);
                true
            }
            None => {
                warn!("access code change rejected (length {})", candidate.len());
                false
            }
        }
    }

    /// Switch to manual fan mode at `level`.
    pub fn force_fan_level(&mut self, level: FanLevel) {
        self.ctx.force_fan_level(level);
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle: FSM tick → door → fan → display.
    ///
    /// The `hw` parameter satisfies all three output ports; this avoids
    /// multiple mutable borrows while keeping the port boundary explicit.
    pub fn update(
        &mut self,
        now_ms: u32,
        hw: &mut (impl DoorPort + FanPort + DisplayPort),
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;
        self.ctx.now_ms = now_ms;

        // 1. FSM tick (timeouts, per-state intent)
        let prev = self.fsm.current_state();
        self.fsm.tick(&mut self.ctx);
        self.emit_state_change(prev, sink);
        self.emit_password_change(sink);

        // 2. Door
        hw.set_locked(self.ctx.door_locked);

        // 3. Fan
        let fan_mode = (self.ctx.fan_level, self.ctx.manual_fan_override);
        if fan_mode != self.reported_fan {
            self.reported_fan = fan_mode;
            sink.emit(&AppEvent::FanLevelChanged {
                level: fan_mode.0,
                manual: fan_mode.1,
            });
        }
        if self.fan.service(self.ctx.fan_level, hw) == FanAction::FadeFailed {
            sink.emit(&AppEvent::FadeFallback {
                duty: self.fan.applied_duty(),
            });
        }

        // 4. Display
        if self.ctx.display_dirty {
            hw.render(&self.status());
            self.ctx.display_dirty = false;
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Act on a parsed console command and build the reply line.
    pub fn handle_command(&mut self, cmd: AppCommand, sink: &mut impl EventSink) -> Reply {
        let mut reply = Reply::new();
        // Every reply fits the buffer; a failed write would only truncate it.
        let _ = match cmd {
            AppCommand::GetTemp => write!(reply, "TEMP: {:.2} C", self.ctx.temperature_c),
            AppCommand::GetStatus => write!(
                reply,
                "STATUS: state={}, fan={}, door_locked={}",
                self.fsm.current_state() as u8,
                self.ctx.fan_level as u8,
                u8::from(self.ctx.door_locked)
            ),
            AppCommand::ForceFan(level) => {
                self.force_fan_level(level);
                write!(reply, "OK: FAN={}", level as u8)
            }
            AppCommand::SetPassword(password) => {
                self.store_password(password);
                self.emit_password_change(sink);
                reply.write_str("OK: PASS")
            }
        };
        reply
    }

    /// Parse and execute one console line.
    pub fn handle_line(&mut self, line: &str, sink: &mut impl EventSink) -> Reply {
        match AppCommand::parse(line) {
            Ok(cmd) => self.handle_command(cmd, sink),
            Err(e) => {
                debug!("console: rejected {:?}", e);
                e.reply()
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current FSM state.
    pub fn state(&self) -> RoomState {
        self.fsm.current_state()
    }

    pub fn is_door_locked(&self) -> bool {
        self.ctx.door_locked
    }

    pub fn fan_level(&self) -> FanLevel {
        self.ctx.fan_level
    }

    /// Last recorded temperature sample in °C.
    pub fn temperature(&self) -> f32 {
        self.ctx.temperature_c
    }

    pub fn is_manual_override(&self) -> bool {
        self.ctx.manual_fan_override
    }

    /// Digits typed so far in the current entry.
    pub fn input_len(&self) -> usize {
        self.ctx.input.len()
    }

    /// Duty the fan actuator last committed to.
    pub fn applied_fan_duty(&self) -> u8 {
        self.fan.applied_duty()
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn status(&self) -> RoomStatus {
        RoomStatus {
            state: self.fsm.current_state(),
            door_locked: self.ctx.door_locked,
            fan_level: self.ctx.fan_level,
            manual_fan_override: self.ctx.manual_fan_override,
            temperature_c: self.ctx.temperature_c,
            input_len: self.ctx.input.len(),
        }
    }

    // ── Internal ──────────────────────────────────────────────

    /// Single write path for the stored code.
    fn store_password(&mut self, password: Password) {
        self.ctx.password = password;
        self.password_changed = true;
        info!("access code changed");
    }

    fn emit_password_change(&mut self, sink: &mut impl EventSink) {
        if core::mem::take(&mut self.password_changed) {
            sink.emit(&AppEvent::PasswordChanged);
        }
    }

    fn emit_state_change(&self, prev: RoomState, sink: &mut impl EventSink) {
        let now = self.fsm.current_state();
        if now != prev {
            sink.emit(&AppEvent::StateChanged { from: prev, to: now });
        }
    }
}
