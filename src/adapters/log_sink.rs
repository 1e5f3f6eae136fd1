//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::FanLevelChanged { level, manual } => {
                info!(
                    "FAN   | level={} duty={}% mode={}",
                    level.label(),
                    level.duty(),
                    if *manual { "MANUAL" } else { "AUTO" }
                );
            }
            AppEvent::TemperatureSampled(celsius) => {
                debug!("TEMP  | {:.2}\u{00b0}C", celsius);
            }
            AppEvent::PasswordChanged => {
                info!("AUTH  | access code replaced");
            }
            AppEvent::FadeFallback { duty } => {
                warn!("FAN   | fade unavailable, applied {}% directly", duty);
            }
        }
    }
}
