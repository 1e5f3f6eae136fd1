//! Line assembly for the serial command consoles.
//!
//! Bytes arrive one at a time from a UART. [`LineAssembler`] accumulates
//! them until `\n`, then yields the line with trailing `\r` and spaces
//! trimmed. Lines longer than [`MAX_LINE_LEN`] keep their first
//! `MAX_LINE_LEN` bytes; the rest is dropped. Text after the first invalid
//! UTF-8 byte is dropped too. Empty lines are swallowed.
//!
//! Each UART owns its own assembler; nothing is shared between consoles.

use log::warn;

use crate::app::commands::MAX_LINE_LEN;

pub type Line = heapless::String<MAX_LINE_LEN>;

#[derive(Debug, Default)]
pub struct LineAssembler {
    buf: heapless::Vec<u8, MAX_LINE_LEN>,
    overflowed: bool,
}

impl LineAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte. Returns a completed, non-empty line on `\n`.
    pub fn push(&mut self, byte: u8) -> Option<Line> {
        if byte != b'\n' {
            if self.buf.push(byte).is_err() {
                self.overflowed = true;
            }
            return None;
        }

        if self.overflowed {
            warn!("console: line over {} bytes truncated", MAX_LINE_LEN);
        }
        let line = self.take();

        let trimmed = line.trim_end_matches(['\r', ' ']);
        if trimmed.is_empty() {
            return None;
        }
        let mut out = Line::new();
        // `trimmed` is a prefix of a line that already fit.
        let _ = out.push_str(trimmed);
        Some(out)
    }

    /// Drain the buffer as text, keeping the longest valid UTF-8 prefix.
    /// A multi-byte char split by truncation is dropped whole.
    fn take(&mut self) -> Line {
        let bytes = core::mem::take(&mut self.buf);
        self.overflowed = false;
        let valid = match core::str::from_utf8(&bytes) {
            Ok(text) => text,
            Err(e) => {
                warn!("console: non-UTF-8 byte at {}, line cut", e.valid_up_to());
                core::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or_default()
            }
        };
        let mut line = Line::new();
        // `valid` is no longer than the buffer it came from.
        let _ = line.push_str(valid);
        line
    }
}
