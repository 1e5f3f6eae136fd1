//! Integration tests for the keypad → FSM → door/fan/display pipeline.
//!
//! Drive a started `RoomController` with keys, temperature samples and
//! ticks, and check what reaches the mock hardware and the event sink.

use roomguard::app::events::AppEvent;
use roomguard::control::policy::FanLevel;
use roomguard::fsm::RoomState;

use crate::mock_hw::{MockHardware, RecordingSink, started_controller, type_keys};

// ── Boot ──────────────────────────────────────────────────────

#[test]
fn boots_locked_with_door_engaged() {
    let (mut app, _, mut sink) = started_controller();
    let mut hw = MockHardware::new();

    assert!(sink.contains(&AppEvent::Started(RoomState::Locked)));
    app.update(0, &mut hw, &mut sink);

    assert_eq!(app.state(), RoomState::Locked);
    assert_eq!(hw.door_locked(), Some(true));
    assert_eq!(app.fan_level(), FanLevel::Off);
    assert_eq!(hw.renders.len(), 1);
    assert_eq!(hw.renders[0].state, RoomState::Locked);
}

// ── Access codes ──────────────────────────────────────────────

#[test]
fn correct_code_unlocks_door() {
    let (mut app, _, mut sink) = started_controller();
    let mut hw = MockHardware::new();

    let t = type_keys(&mut app, "2222", 100, &mut sink);
    assert_eq!(app.state(), RoomState::Unlocked);
    assert_eq!(app.input_len(), 0);

    app.update(t + 5, &mut hw, &mut sink);
    assert_eq!(hw.door_locked(), Some(false));
    assert!(sink.contains(&AppEvent::StateChanged {
        from: RoomState::InputPassword,
        to: RoomState::Unlocked,
    }));
}

#[test]
fn wrong_code_is_denied_then_relocks_after_three_seconds() {
    let (mut app, _, mut sink) = started_controller();
    let mut hw = MockHardware::new();

    let t = type_keys(&mut app, "5222", 100, &mut sink);
    assert_eq!(app.state(), RoomState::AccessDenied);
    assert_eq!(app.input_len(), 0);

    // Keys are ignored while denied.
    app.process_key('2', t + 10, &mut sink);
    assert_eq!(app.state(), RoomState::AccessDenied);
    assert_eq!(app.input_len(), 0);

    // The denied state was entered with the fourth key at `t`.
    app.update(t + 3_000, &mut hw, &mut sink);
    assert_eq!(app.state(), RoomState::AccessDenied);
    assert_eq!(hw.door_locked(), Some(true));

    app.update(t + 3_001, &mut hw, &mut sink);
    assert_eq!(app.state(), RoomState::Locked);
}

#[test]
fn entry_times_out_after_ten_seconds_of_silence() {
    let (mut app, _, mut sink) = started_controller();
    let mut hw = MockHardware::new();

    app.process_key('1', 1_000, &mut sink);
    assert_eq!(app.state(), RoomState::InputPassword);

    app.update(11_000, &mut hw, &mut sink);
    assert_eq!(app.state(), RoomState::InputPassword);

    app.update(11_001, &mut hw, &mut sink);
    assert_eq!(app.state(), RoomState::Locked);
    assert_eq!(app.input_len(), 0);
}

#[test]
fn each_key_restarts_the_entry_timeout() {
    let (mut app, _, mut sink) = started_controller();
    let mut hw = MockHardware::new();

    app.process_key('1', 0, &mut sink);
    app.process_key('2', 9_000, &mut sink);
    app.update(18_000, &mut hw, &mut sink);
    assert_eq!(app.state(), RoomState::InputPassword);
    assert_eq!(app.input_len(), 2);
}

#[test]
fn star_cancels_and_c_deletes() {
    let (mut app, _, mut sink) = started_controller();

    type_keys(&mut app, "12", 0, &mut sink);
    app.process_key('C', 300, &mut sink);
    assert_eq!(app.input_len(), 1);

    app.process_key('*', 400, &mut sink);
    assert_eq!(app.state(), RoomState::Locked);
    assert_eq!(app.input_len(), 0);
}

#[test]
fn changed_password_replaces_the_old_one() {
    let (mut app, _, mut sink) = started_controller();

    assert!(app.change_password("1234"));
    type_keys(&mut app, "2222", 0, &mut sink);
    assert_eq!(app.state(), RoomState::AccessDenied);

    let (mut app, _, mut sink) = started_controller();
    assert!(app.change_password("1234"));
    type_keys(&mut app, "1234", 0, &mut sink);
    assert_eq!(app.state(), RoomState::Unlocked);
}

#[test]
fn wrong_length_password_change_is_ignored() {
    let (mut app, _, mut sink) = started_controller();

    assert!(!app.change_password("123"));
    assert!(!app.change_password("12345"));
    type_keys(&mut app, "2222", 0, &mut sink);
    assert_eq!(app.state(), RoomState::Unlocked);
}

#[test]
fn both_password_paths_report_one_change_each() {
    let (mut app, _, mut sink) = started_controller();
    let mut hw = MockHardware::new();
    let changes = |sink: &RecordingSink| sink.count(|e| *e == AppEvent::PasswordChanged);

    assert!(app.change_password("1234"));
    assert!(!app.change_password("12"));
    assert_eq!(changes(&sink), 0);
    app.update(5, &mut hw, &mut sink);
    assert_eq!(changes(&sink), 1);
    app.update(10, &mut hw, &mut sink);
    assert_eq!(changes(&sink), 1);

    assert_eq!(app.handle_line("SET_PASS:5678", &mut sink).as_str(), "OK: PASS");
    assert_eq!(changes(&sink), 2);
    app.update(15, &mut hw, &mut sink);
    assert_eq!(changes(&sink), 2);

    type_keys(&mut app, "5678", 20, &mut sink);
    assert_eq!(app.state(), RoomState::Unlocked);
}

// ── Fan control ───────────────────────────────────────────────

#[test]
fn automatic_fan_follows_temperature_bands() {
    let (mut app, _, mut sink) = started_controller();

    for (celsius, level) in [
        (24.9, FanLevel::Off),
        (25.0, FanLevel::Low),
        (28.0, FanLevel::Med),
        (31.0, FanLevel::High),
        (-40.0, FanLevel::Off),
    ] {
        app.set_temperature(celsius, &mut sink);
        assert_eq!(app.fan_level(), level, "{celsius} C");
    }
    assert!(!app.is_manual_override());
}

#[test]
fn keypad_override_then_auto_resume_recomputes_level() {
    let (mut app, _, mut sink) = started_controller();
    let mut hw = MockHardware::new();

    type_keys(&mut app, "2222", 0, &mut sink);
    app.set_temperature(26.0, &mut sink);
    assert_eq!(app.fan_level(), FanLevel::Low);

    app.process_key('2', 1_000, &mut sink);
    assert_eq!(app.fan_level(), FanLevel::Med);
    assert!(app.is_manual_override());

    // Manual mode ignores new samples.
    app.set_temperature(32.0, &mut sink);
    assert_eq!(app.fan_level(), FanLevel::Med);

    app.update(1_005, &mut hw, &mut sink);
    assert!(sink.contains(&AppEvent::FanLevelChanged {
        level: FanLevel::Med,
        manual: true,
    }));

    app.process_key('A', 2_000, &mut sink);
    assert!(!app.is_manual_override());
    assert_eq!(app.fan_level(), FanLevel::High);

    app.update(2_005, &mut hw, &mut sink);
    assert!(sink.contains(&AppEvent::FanLevelChanged {
        level: FanLevel::High,
        manual: false,
    }));
}

#[test]
fn fan_keys_only_work_when_unlocked() {
    let (mut app, _, mut sink) = started_controller();

    app.process_key('3', 0, &mut sink);
    assert_eq!(app.state(), RoomState::InputPassword);
    assert!(!app.is_manual_override());
    assert_eq!(app.fan_level(), FanLevel::Off);
}

#[test]
fn forcing_the_same_level_twice_is_idempotent() {
    let (mut app, _, mut sink) = started_controller();
    let mut hw = MockHardware::new();

    app.force_fan_level(FanLevel::Med);
    app.update(5, &mut hw, &mut sink);
    app.force_fan_level(FanLevel::Med);
    app.update(10, &mut hw, &mut sink);

    assert_eq!(app.fan_level(), FanLevel::Med);
    assert_eq!(hw.fades().len(), 1);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::FanLevelChanged { .. })),
        1
    );
}

// ── Emergency ─────────────────────────────────────────────────

#[test]
fn emergency_releases_door_and_runs_fan_flat_out() {
    let (mut app, _, mut sink) = started_controller();
    let mut hw = MockHardware::new();

    type_keys(&mut app, "2222", 0, &mut sink);
    app.process_key('D', 1_000, &mut sink);
    assert_eq!(app.state(), RoomState::Emergency);

    app.update(1_005, &mut hw, &mut sink);
    assert_eq!(hw.door_locked(), Some(false));
    assert_eq!(app.fan_level(), FanLevel::High);

    // Other keys do nothing; '#' leaves.
    app.process_key('*', 1_100, &mut sink);
    app.process_key('B', 1_200, &mut sink);
    assert_eq!(app.state(), RoomState::Emergency);

    app.process_key('#', 1_300, &mut sink);
    assert_eq!(app.state(), RoomState::Locked);
    app.update(1_305, &mut hw, &mut sink);
    assert_eq!(hw.door_locked(), Some(true));
    assert_eq!(app.fan_level(), FanLevel::Off);
}

#[test]
fn emergency_is_unreachable_from_locked() {
    let (mut app, _, mut sink) = started_controller();

    app.process_key('D', 0, &mut sink);
    assert_eq!(app.state(), RoomState::Locked);
}

#[test]
fn b_relocks_from_unlocked() {
    let (mut app, _, mut sink) = started_controller();
    let mut hw = MockHardware::new();

    type_keys(&mut app, "2222", 0, &mut sink);
    app.update(400, &mut hw, &mut sink);
    assert_eq!(hw.door_locked(), Some(false));

    app.process_key('B', 500, &mut sink);
    app.update(505, &mut hw, &mut sink);
    assert_eq!(app.state(), RoomState::Locked);
    assert_eq!(hw.door_locked(), Some(true));
}

// ── Per-tick output ───────────────────────────────────────────

#[test]
fn door_is_asserted_every_tick() {
    let (mut app, _, mut sink) = started_controller();
    let mut hw = MockHardware::new();

    for t in 0..5 {
        app.update(t * 5, &mut hw, &mut sink);
    }
    let door_writes = hw
        .calls
        .iter()
        .filter(|c| matches!(c, crate::mock_hw::HwCall::SetLocked(true)))
        .count();
    assert_eq!(door_writes, 5);
    assert_eq!(app.tick_count(), 5);
}

#[test]
fn display_redraws_only_after_a_change() {
    let (mut app, _, mut sink) = started_controller();
    let mut hw = MockHardware::new();

    app.update(0, &mut hw, &mut sink);
    app.update(5, &mut hw, &mut sink);
    app.update(10, &mut hw, &mut sink);
    assert_eq!(hw.renders.len(), 1);

    app.process_key('7', 20, &mut sink);
    app.update(25, &mut hw, &mut sink);
    assert_eq!(hw.renders.len(), 2);
    assert_eq!(hw.renders[1].state, RoomState::InputPassword);
    assert_eq!(hw.renders[1].input_len, 1);

    // Temperature inside the same band changes nothing on screen.
    app.set_temperature(23.0, &mut sink);
    app.update(30, &mut hw, &mut sink);
    assert_eq!(hw.renders.len(), 2);
}

#[test]
fn sink_sees_the_full_unlock_story() {
    let (mut app, _, _) = started_controller();
    let mut sink = RecordingSink::new();

    type_keys(&mut app, "2222", 0, &mut sink);
    let transitions: Vec<_> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::StateChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        transitions,
        [
            (RoomState::Locked, RoomState::InputPassword),
            (RoomState::InputPassword, RoomState::Unlocked),
        ]
    );
}
