//! Fan output path: fade dispatch, completion, and the direct-write
//! fallbacks, first against the recording mock, then through the real
//! `HardwareAdapter` with the simulated fade timer.

use std::cell::Cell;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType as PinErrorType, OutputPin};
use embedded_hal::i2c::{ErrorType as I2cErrorType, I2c, Operation};

use roomguard::adapters::display::OledDisplay;
use roomguard::adapters::hardware::HardwareAdapter;
use roomguard::app::events::AppEvent;
use roomguard::app::ports::FanPort;
use roomguard::app::service::RoomController;
use roomguard::config::RoomConfig;
use roomguard::control::fan::{FADE_STEPS, FadeSignal};
use roomguard::control::policy::FanLevel;
use roomguard::drivers::door::DoorLock;
use roomguard::drivers::fan_pwm::{FadeChannel, FadeTick, FanPwm};
use roomguard::drivers::oled::Ssd1306;

use crate::mock_hw::{FadeMode, HwCall, MockHardware, RecordingSink, started_controller};

// ── Against the mock ──────────────────────────────────────────

#[test]
fn fade_runs_to_exact_target() {
    let (mut app, signal, mut sink) = started_controller();
    let mut hw = MockHardware::new();

    app.force_fan_level(FanLevel::High);
    app.update(5, &mut hw, &mut sink);

    let fades = hw.fades();
    assert_eq!(fades.len(), 1);
    let path = fades[0].clone();
    assert_eq!(path.len(), FADE_STEPS);
    assert_eq!(path.last(), Some(&99));
    assert!(path.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(app.applied_fan_duty(), 99);

    // Nothing is written over a running fade.
    hw.clear();
    app.update(10, &mut hw, &mut sink);
    assert_eq!(hw.duty_writes(), 0);

    hw.complete_fade(signal);
    assert_eq!(&hw.calls[hw.calls.len() - 2..], &[HwCall::StopFade, HwCall::WriteDuty(99)]);
    assert!(!signal.in_progress());

    hw.clear();
    app.update(15, &mut hw, &mut sink);
    assert_eq!(hw.last_duty(), Some(99));
}

#[test]
fn unavailable_channel_writes_directly() {
    let (mut app, _, mut sink) = started_controller();
    let mut hw = MockHardware::with_fade(FadeMode::Unavailable);

    app.force_fan_level(FanLevel::Med);
    app.update(5, &mut hw, &mut sink);

    assert!(hw.fades().is_empty());
    assert_eq!(hw.last_duty(), Some(70));
    assert_eq!(sink.count(|e| matches!(e, AppEvent::FadeFallback { .. })), 0);
}

#[test]
fn failed_dispatch_falls_back_and_reports() {
    let (mut app, signal, mut sink) = started_controller();
    let mut hw = MockHardware::with_fade(FadeMode::Failing);

    app.force_fan_level(FanLevel::High);
    app.update(5, &mut hw, &mut sink);

    assert_eq!(hw.last_duty(), Some(99));
    assert!(!signal.in_progress());
    assert!(sink.contains(&AppEvent::FadeFallback { duty: 99 }));
}

#[test]
fn change_during_fade_retargets_completion() {
    let (mut app, signal, mut sink) = started_controller();
    let mut hw = MockHardware::new();

    app.force_fan_level(FanLevel::High);
    app.update(5, &mut hw, &mut sink);
    assert!(signal.in_progress());

    app.force_fan_level(FanLevel::Low);
    app.update(10, &mut hw, &mut sink);
    assert_eq!(hw.fades().len(), 1);
    assert_eq!(hw.last_duty(), Some(30));

    hw.complete_fade(signal);
    assert_eq!(hw.last_duty(), Some(30));
    assert_eq!(app.applied_fan_duty(), 30);
}

// ── Through the hardware adapter ──────────────────────────────

struct LatchPin(Rc<Cell<Option<bool>>>);

impl PinErrorType for LatchPin {
    type Error = core::convert::Infallible;
}

impl OutputPin for LatchPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.set(Some(false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.set(Some(true));
        Ok(())
    }
}

struct NullI2c;

impl I2cErrorType for NullI2c {
    type Error = core::convert::Infallible;
}

impl I2c for NullI2c {
    fn transaction(&mut self, _: u8, _: &mut [Operation<'_>]) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[test]
fn simulated_timer_plays_fade_through_adapter() {
    let signal: &'static FadeSignal = Box::leak(Box::new(FadeSignal::new()));
    let channel: &'static FadeChannel = Box::leak(Box::new(FadeChannel::new(signal)));

    let latch = Rc::new(Cell::new(None));
    let mut hw = HardwareAdapter::new(
        DoorLock::new(LatchPin(latch.clone())),
        FanPwm::new(0, channel),
        OledDisplay::new(Ssd1306::new(NullI2c, 0x3C)),
    );

    let mut app = RoomController::new(&RoomConfig::default(), signal);
    let mut sink = RecordingSink::new();
    app.start(0, &mut sink);
    app.update(0, &mut hw, &mut sink);
    assert_eq!(latch.get(), Some(true));

    app.force_fan_level(FanLevel::Med);
    app.update(5, &mut hw, &mut sink);
    assert!(!hw.fan().fade_ready());

    let mut played = Vec::new();
    loop {
        match hw.fan().sim_step() {
            FadeTick::Step(duty) => played.push(duty),
            FadeTick::Finished => break,
            FadeTick::Idle => panic!("fade stopped early"),
        }
    }
    assert_eq!(played.len(), FADE_STEPS);
    assert_eq!(hw.fan().duty(), 70);
    assert!(hw.fan().fade_ready());
    assert!(!signal.in_progress());
}
