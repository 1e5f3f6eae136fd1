//! Fuzz target: serial console line handling
//!
//! Streams arbitrary bytes through a `LineAssembler` into
//! `RoomController::handle_line` and asserts that nothing panics, every
//! completed line fits the console limit, and every reply is non-empty.
//!
//! cargo fuzz run fuzz_console_line

#![no_main]

use libfuzzer_sys::fuzz_target;
use roomguard::adapters::serial_console::LineAssembler;
use roomguard::app::commands::MAX_LINE_LEN;
use roomguard::app::events::AppEvent;
use roomguard::app::ports::EventSink;
use roomguard::app::service::RoomController;
use roomguard::config::RoomConfig;
use roomguard::control::fan::FadeSignal;

struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: &AppEvent) {}
}

static FADE: FadeSignal = FadeSignal::new();

fuzz_target!(|data: &[u8]| {
    let mut app = RoomController::new(&RoomConfig::default(), &FADE);
    app.start(0, &mut Discard);
    let mut console = LineAssembler::new();

    for &byte in data {
        if let Some(line) = console.push(byte) {
            assert!(line.len() <= MAX_LINE_LEN, "line exceeds console limit");
            let reply = app.handle_line(&line, &mut Discard);
            assert!(!reply.is_empty(), "every line gets a reply");
        }
    }
});
