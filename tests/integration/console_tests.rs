//! Serial console: raw UART bytes → `LineAssembler` → `handle_line` →
//! reply text.

use roomguard::adapters::serial_console::LineAssembler;
use roomguard::app::events::AppEvent;
use roomguard::app::service::RoomController;
use roomguard::control::policy::FanLevel;
use roomguard::fsm::RoomState;

use crate::mock_hw::{MockHardware, RecordingSink, started_controller, type_keys};

/// Push `bytes` through an assembler and collect the replies.
fn send(
    app: &mut RoomController,
    console: &mut LineAssembler,
    bytes: &[u8],
    sink: &mut RecordingSink,
) -> Vec<String> {
    bytes
        .iter()
        .filter_map(|&b| console.push(b))
        .map(|line| app.handle_line(&line, sink).as_str().to_owned())
        .collect()
}

#[test]
fn queries_report_boot_state() {
    let (mut app, _, mut sink) = started_controller();
    let mut console = LineAssembler::new();

    let replies = send(&mut app, &mut console, b"GET_TEMP\r\nGET_STATUS\r\n", &mut sink);
    assert_eq!(
        replies,
        ["TEMP: 22.00 C", "STATUS: state=0, fan=0, door_locked=1"]
    );
}

#[test]
fn status_tracks_unlock_and_sampled_temperature() {
    let (mut app, _, mut sink) = started_controller();
    let mut console = LineAssembler::new();

    type_keys(&mut app, "2222", 0, &mut sink);
    app.set_temperature(29.456, &mut sink);

    let replies = send(&mut app, &mut console, b"GET_TEMP\nGET_STATUS\n", &mut sink);
    assert_eq!(
        replies,
        ["TEMP: 29.46 C", "STATUS: state=2, fan=2, door_locked=0"]
    );
}

#[test]
fn force_fan_sets_manual_mode() {
    let (mut app, _, mut sink) = started_controller();
    let mut console = LineAssembler::new();

    assert_eq!(send(&mut app, &mut console, b"FORCE_FAN:3\n", &mut sink), ["OK: FAN=3"]);
    assert_eq!(app.fan_level(), FanLevel::High);
    assert!(app.is_manual_override());

    // Manual mode survives the lock state; samples do not move it.
    app.set_temperature(20.0, &mut sink);
    assert_eq!(app.fan_level(), FanLevel::High);
}

#[test]
fn bad_arguments_change_nothing() {
    let (mut app, _, mut sink) = started_controller();
    let mut console = LineAssembler::new();

    let replies = send(
        &mut app,
        &mut console,
        b"FORCE_FAN:9\nSET_PASS:12\nSET_PASS:12ab\n",
        &mut sink,
    );
    assert_eq!(replies, ["ERR: FORCE_FAN arg", "ERR: PASS", "ERR: PASS"]);
    assert!(!app.is_manual_override());

    type_keys(&mut app, "2222", 0, &mut sink);
    assert_eq!(app.state(), RoomState::Unlocked);
}

#[test]
fn set_pass_replaces_code_without_echoing_it() {
    let (mut app, _, mut sink) = started_controller();
    let mut console = LineAssembler::new();

    let replies = send(&mut app, &mut console, b"SET_PASS:4321\n", &mut sink);
    assert_eq!(replies, ["OK: PASS"]);
    assert!(sink.contains(&AppEvent::PasswordChanged));

    type_keys(&mut app, "4321", 0, &mut sink);
    assert_eq!(app.state(), RoomState::Unlocked);
}

#[test]
fn unknown_command_is_echoed_back() {
    let (mut app, _, mut sink) = started_controller();
    let mut console = LineAssembler::new();

    assert_eq!(
        send(&mut app, &mut console, b"OPEN_SESAME\n", &mut sink),
        ["ERR: UNKNOWN CMD (OPEN_SESAME)"]
    );
}

#[test]
fn both_consoles_drive_the_same_controller() {
    let (mut app, _, mut sink) = started_controller();
    let mut hw = MockHardware::new();
    let mut debug = LineAssembler::new();
    let mut bridge = LineAssembler::new();

    assert!(send(&mut app, &mut debug, b"FORCE_", &mut sink).is_empty());
    assert_eq!(send(&mut app, &mut bridge, b"FORCE_FAN:1\n", &mut sink), ["OK: FAN=1"]);
    assert_eq!(send(&mut app, &mut debug, b"FAN:2\n", &mut sink), ["OK: FAN=2"]);

    app.update(5, &mut hw, &mut sink);
    assert_eq!(app.fan_level(), FanLevel::Med);
    assert_eq!(hw.renders.last().map(|s| s.fan_level), Some(FanLevel::Med));
}

#[test]
fn split_multibyte_char_still_gets_a_reply() {
    let (mut app, _, mut sink) = started_controller();
    let mut console = LineAssembler::new();

    let mut bytes = b"GET_TEMPERATURE_OF_THE_ROOM_NO".to_vec();
    bytes.extend_from_slice("°C\n".as_bytes());
    assert_eq!(
        send(&mut app, &mut console, &bytes, &mut sink),
        ["ERR: UNKNOWN CMD (GET_TEMPERATURE_OF_THE_ROOM_NO)"]
    );
}
