//! Mock hardware adapter for integration tests.
//!
//! Records every output-port call so tests can assert on the full command
//! history without touching real GPIO, PWM or I²C.

use roomguard::app::events::AppEvent;
use roomguard::app::ports::{DisplayPort, DoorPort, EventSink, FanPort};
use roomguard::app::service::{RoomController, RoomStatus};
use roomguard::config::RoomConfig;
use roomguard::control::fan::FadeSignal;
use roomguard::error::ActuatorError;

// ── Output call record ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum HwCall {
    SetLocked(bool),
    WriteDuty(u8),
    StartFade(Vec<u8>),
    StopFade,
}

// ── MockHardware ──────────────────────────────────────────────

/// How the mock fade channel behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeMode {
    /// Accepts fades and stays busy until `complete_fade` is called.
    Available,
    /// Reports not ready; every change is a direct write.
    Unavailable,
    /// Reports ready but rejects every dispatch.
    Failing,
}

pub struct MockHardware {
    pub calls: Vec<HwCall>,
    pub renders: Vec<RoomStatus>,
    pub fade_mode: FadeMode,
    fading: bool,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self::with_fade(FadeMode::Available)
    }

    pub fn with_fade(fade_mode: FadeMode) -> Self {
        Self {
            calls: Vec::new(),
            renders: Vec::new(),
            fade_mode,
            fading: false,
        }
    }

    pub fn door_locked(&self) -> Option<bool> {
        self.calls.iter().rev().find_map(|c| match c {
            HwCall::SetLocked(locked) => Some(*locked),
            _ => None,
        })
    }

    pub fn last_duty(&self) -> Option<u8> {
        self.calls.iter().rev().find_map(|c| match c {
            HwCall::WriteDuty(duty) => Some(*duty),
            _ => None,
        })
    }

    pub fn fades(&self) -> Vec<&Vec<u8>> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HwCall::StartFade(steps) => Some(steps),
                _ => None,
            })
            .collect()
    }

    pub fn duty_writes(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, HwCall::WriteDuty(_)))
            .count()
    }

    /// Play the completion callback the way the fade timer would.
    pub fn complete_fade(&mut self, signal: &FadeSignal) {
        signal.on_transfer_complete(self);
    }

    pub fn clear(&mut self) {
        self.calls.clear();
        self.renders.clear();
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl DoorPort for MockHardware {
    fn set_locked(&mut self, locked: bool) {
        self.calls.push(HwCall::SetLocked(locked));
    }
}

impl FanPort for MockHardware {
    fn write_duty(&mut self, duty: u8) {
        self.calls.push(HwCall::WriteDuty(duty));
    }

    fn fade_ready(&self) -> bool {
        self.fade_mode != FadeMode::Unavailable && !self.fading
    }

    fn start_fade(&mut self, steps: &[u8]) -> Result<(), ActuatorError> {
        if self.fade_mode == FadeMode::Failing {
            return Err(ActuatorError::FadeDispatchFailed);
        }
        self.fading = true;
        self.calls.push(HwCall::StartFade(steps.to_vec()));
        Ok(())
    }

    fn stop_fade(&mut self) {
        self.fading = false;
        self.calls.push(HwCall::StopFade);
    }
}

impl DisplayPort for MockHardware {
    fn render(&mut self, status: &RoomStatus) {
        self.renders.push(*status);
    }
}

// ── Event recording ───────────────────────────────────────────

/// Event sink that keeps everything it receives.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, event: &AppEvent) -> bool {
        self.events.contains(event)
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Fixtures ──────────────────────────────────────────────────

/// Fresh controller started at t=0, plus the fade signal it reports to.
#[allow(dead_code)]
pub fn started_controller() -> (RoomController, &'static FadeSignal, RecordingSink) {
    let signal: &'static FadeSignal = Box::leak(Box::new(FadeSignal::new()));
    let mut app = RoomController::new(&RoomConfig::default(), signal);
    let mut sink = RecordingSink::new();
    app.start(0, &mut sink);
    (app, signal, sink)
}

/// Type `keys` one per 100 ms starting at `t0`; returns the time of the
/// last key.
#[allow(dead_code)]
pub fn type_keys(app: &mut RoomController, keys: &str, t0: u32, sink: &mut RecordingSink) -> u32 {
    let mut t = t0;
    for (i, key) in keys.chars().enumerate() {
        t = t0 + 100 * i as u32;
        app.process_key(key, t, sink);
    }
    t
}
