//! Fan actuator: turns a discrete [`FanLevel`] into a smoothed PWM duty.
//!
//! ```text
//!            level change + fade channel ready
//!   ┌──────┐ ─────────────────────────────────▶ ┌────────┐
//!   │ Idle │                                    │ Fading │
//!   └──────┘ ◀───────────────────────────────── └────────┘
//!              transfer-complete callback
//! ```
//!
//! When the requested duty differs from the applied one and the buffered
//! fade channel is free, a linear sequence of [`FADE_STEPS`] duties is
//! handed to the hardware. The new duty is recorded as applied immediately;
//! the fade is only the path to it. When the hardware finishes, the
//! completion callback writes the exact target, so rounding can never leave
//! the output short.
//!
//! Anything that prevents a fade (no channel, channel busy, dispatch error)
//! degrades to a direct write. Fades are never queued or retried.
//!
//! ## Interrupt handoff
//!
//! The completion callback runs in interrupt-like context and only touches
//! [`FadeSignal`]: it clears `in_progress` and writes the stored target.
//! Everything else in this module runs from the main loop.

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use log::{debug, warn};

use crate::app::ports::FanPort;
use crate::control::policy::FanLevel;

/// Number of intermediate duties in one fade.
pub const FADE_STEPS: usize = 20;

/// Build the fade path from `start` to `target`.
///
/// `buf[i] = start + delta * (i + 1) / FADE_STEPS` with truncating integer
/// division, so the last element is exactly `target`.
pub fn fade_sequence(start: u8, target: u8) -> [u8; FADE_STEPS] {
    let start = i32::from(start);
    let delta = i32::from(target) - start;
    let steps = FADE_STEPS as i32;
    core::array::from_fn(|i| (start + delta * (i as i32 + 1) / steps) as u8)
}

// ---------------------------------------------------------------------------
// Completion handoff
// ---------------------------------------------------------------------------

/// Lock-free handoff between the main loop and the fade-completion callback.
pub struct FadeSignal {
    in_progress: AtomicBool,
    target: AtomicU8,
}

impl FadeSignal {
    pub const fn new() -> Self {
        Self {
            in_progress: AtomicBool::new(false),
            target: AtomicU8::new(0),
        }
    }

    /// True while a dispatched fade has not reported completion.
    pub fn in_progress(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }

    /// Duty the output must settle on.
    pub fn target(&self) -> u8 {
        self.target.load(Ordering::Acquire)
    }

    /// Transfer-complete handler. Safe to call from interrupt context.
    ///
    /// Stops the transfer, clears the in-progress flag, and forces the
    /// output to the exact target.
    pub fn on_transfer_complete(&self, port: &mut impl FanPort) {
        port.stop_fade();
        self.in_progress.store(false, Ordering::Release);
        port.write_duty(self.target());
    }

    fn set_target(&self, duty: u8) {
        self.target.store(duty, Ordering::Release);
    }

    fn arm(&self, duty: u8) {
        self.set_target(duty);
        self.in_progress.store(true, Ordering::Release);
    }

    fn disarm(&self) {
        self.in_progress.store(false, Ordering::Release);
    }
}

impl Default for FadeSignal {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Actuator
// ---------------------------------------------------------------------------

/// What [`FanActuator::service`] did this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanAction {
    /// Target already applied; duty re-asserted directly.
    Reasserted,
    /// Fade channel unavailable or busy; target written directly.
    Direct,
    /// Fade sequence dispatched.
    FadeStarted,
    /// Dispatch failed; target written directly.
    FadeFailed,
}

pub struct FanActuator {
    signal: &'static FadeSignal,
    applied_duty: u8,
    fade_buffer: [u8; FADE_STEPS],
    /// Main-loop view of the last dispatched fade, for completion logging.
    fade_outstanding: bool,
}

impl FanActuator {
    pub fn new(signal: &'static FadeSignal) -> Self {
        Self {
            signal,
            applied_duty: 0,
            fade_buffer: [0; FADE_STEPS],
            fade_outstanding: false,
        }
    }

    /// Drive the output towards `level`. Called once per main-loop tick.
    pub fn service(&mut self, level: FanLevel, port: &mut impl FanPort) -> FanAction {
        self.ack_completion();

        let target = level.duty();

        if target == self.applied_duty {
            // Leave an in-flight fade alone; its completion lands on this duty.
            if !self.signal.in_progress() {
                port.write_duty(target);
            }
            return FanAction::Reasserted;
        }

        if !port.fade_ready() || self.signal.in_progress() {
            debug!("fan: direct {} -> {} (fade channel not ready)", self.applied_duty, target);
            self.apply_direct(target, port);
            return FanAction::Direct;
        }

        let start = self.applied_duty;
        self.fade_buffer = fade_sequence(start, target);
        self.applied_duty = target;
        self.signal.arm(target);

        match port.start_fade(&self.fade_buffer) {
            Ok(()) => {
                self.fade_outstanding = true;
                debug!("fan: fading {} -> {} over {} steps", start, target, FADE_STEPS);
                FanAction::FadeStarted
            }
            Err(e) => {
                warn!("fan: fade dispatch failed ({}), applying {} directly", e, target);
                self.signal.disarm();
                port.write_duty(target);
                FanAction::FadeFailed
            }
        }
    }

    /// Duty most recently committed to (possibly still fading towards it).
    pub fn applied_duty(&self) -> u8 {
        self.applied_duty
    }

    pub fn is_fading(&self) -> bool {
        self.signal.in_progress()
    }

    /// The in-flight fade path, valid only while a fade is running.
    pub fn fade_path(&self) -> Option<&[u8; FADE_STEPS]> {
        self.signal.in_progress().then_some(&self.fade_buffer)
    }

    fn apply_direct(&mut self, target: u8, port: &mut impl FanPort) {
        // Keep the completion callback converging on the newest duty.
        self.signal.set_target(target);
        port.write_duty(target);
        self.applied_duty = target;
    }

    fn ack_completion(&mut self) {
        if self.fade_outstanding && !self.signal.in_progress() {
            self.fade_outstanding = false;
            debug!("fan: fade settled at {}", self.signal.target());
        }
    }
}
