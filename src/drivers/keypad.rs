//! 4x4 matrix keypad scanner with debounce.
//!
//! ## Hardware
//!
//! Rows are push-pull outputs idling HIGH; columns are inputs with pull-ups.
//! A scan drives one row LOW at a time and reads the columns: a pressed key
//! shorts its column to the active row and reads LOW.
//!
//! ```text
//!          C0  C1  C2  C3
//!   R0     1   2   3   A
//!   R1     4   5   6   B
//!   R2     7   8   9   C
//!   R3     *   0   #   D
//! ```
//!
//! ## Debounce
//!
//! `poll()` runs from the main loop. A key is reported once, after it has
//! read the same for `debounce_ms`; it must be released before it (or any
//! other key) can be reported again. Held keys never repeat.

use embedded_hal::digital::{InputPin, OutputPin};

pub const KEYMAP: [[char; 4]; 4] = [
    ['1', '2', '3', 'A'],
    ['4', '5', '6', 'B'],
    ['7', '8', '9', 'C'],
    ['*', '0', '#', 'D'],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Idle,
    Debounce { key: char, since_ms: u32 },
    Held { key: char },
}

pub struct Keypad<R, C> {
    rows: [R; 4],
    cols: [C; 4],
    debounce_ms: u32,
    state: ScanState,
}

impl<R: OutputPin, C: InputPin> Keypad<R, C> {
    pub fn new(mut rows: [R; 4], cols: [C; 4], debounce_ms: u32) -> Self {
        for row in &mut rows {
            let _ = row.set_high();
        }
        Self {
            rows,
            cols,
            debounce_ms,
            state: ScanState::Idle,
        }
    }

    /// Call from the main loop every pass. Returns a key on the poll where
    /// a press finishes debouncing.
    pub fn poll(&mut self, now_ms: u32) -> Option<char> {
        let raw = self.scan();

        match self.state {
            ScanState::Idle => {
                if let Some(key) = raw {
                    self.state = ScanState::Debounce { key, since_ms: now_ms };
                }
                None
            }

            ScanState::Debounce { key, since_ms } => match raw {
                Some(k) if k == key => {
                    if now_ms.wrapping_sub(since_ms) >= self.debounce_ms {
                        self.state = ScanState::Held { key };
                        log::debug!("keypad: '{}'", key);
                        return Some(key);
                    }
                    None
                }
                Some(other) => {
                    self.state = ScanState::Debounce { key: other, since_ms: now_ms };
                    None
                }
                None => {
                    self.state = ScanState::Idle;
                    None
                }
            },

            ScanState::Held { key } => {
                if raw != Some(key) {
                    self.state = match raw {
                        Some(other) => ScanState::Debounce { key: other, since_ms: now_ms },
                        None => ScanState::Idle,
                    };
                }
                None
            }
        }
    }

    /// Return the first pressed key in row-major order, if any.
    /// Pin errors read as "not pressed".
    fn scan(&mut self) -> Option<char> {
        let mut found = None;
        for (r, row) in self.rows.iter_mut().enumerate() {
            let _ = row.set_low();
            for (c, col) in self.cols.iter_mut().enumerate() {
                if found.is_none() && col.is_low().unwrap_or(false) {
                    found = Some(KEYMAP[r][c]);
                }
            }
            let _ = row.set_high();
            if found.is_some() {
                break;
            }
        }
        found
    }
}
