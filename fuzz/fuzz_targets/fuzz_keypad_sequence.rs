//! Fuzz target: keypad and clock sequences into the FSM
//!
//! Each input byte pair is a key and a time advance. Asserts the entry
//! buffer never overflows and the door intent matches the state after
//! every tick.
//!
//! cargo fuzz run fuzz_keypad_sequence

#![no_main]

use libfuzzer_sys::fuzz_target;
use roomguard::app::events::AppEvent;
use roomguard::app::ports::{DisplayPort, DoorPort, EventSink, FanPort};
use roomguard::app::service::{RoomController, RoomStatus};
use roomguard::config::{PASSWORD_LENGTH, RoomConfig};
use roomguard::control::fan::FadeSignal;
use roomguard::error::ActuatorError;
use roomguard::fsm::RoomState;

struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: &AppEvent) {}
}

struct NullHw;

impl DoorPort for NullHw {
    fn set_locked(&mut self, _locked: bool) {}
}

impl FanPort for NullHw {
    fn write_duty(&mut self, _duty: u8) {}
    fn fade_ready(&self) -> bool {
        false
    }
    fn start_fade(&mut self, _steps: &[u8]) -> Result<(), ActuatorError> {
        Err(ActuatorError::FadeChannelUnavailable)
    }
    fn stop_fade(&mut self) {}
}

impl DisplayPort for NullHw {
    fn render(&mut self, _status: &RoomStatus) {}
}

static FADE: FadeSignal = FadeSignal::new();

fuzz_target!(|data: &[u8]| {
    let mut app = RoomController::new(&RoomConfig::default(), &FADE);
    app.start(0, &mut Discard);
    let mut hw = NullHw;
    let mut now = 0u32;

    for pair in data.chunks(2) {
        app.process_key(char::from(pair[0]), now, &mut Discard);
        if let Some(&advance) = pair.get(1) {
            now = now.wrapping_add(u32::from(advance) * 64);
        }
        app.update(now, &mut hw, &mut Discard);

        assert!(app.input_len() <= PASSWORD_LENGTH);
        let locked = !matches!(app.state(), RoomState::Unlocked | RoomState::Emergency);
        assert_eq!(app.is_door_locked(), locked);
    }
});
