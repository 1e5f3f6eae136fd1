//! Inbound commands to the application service.
//!
//! Remote control arrives as line-terminated ASCII over the serial
//! consoles. [`AppCommand::parse`] turns one trimmed line into a command or
//! a [`CommandError`]; the [`RoomController`](super::service::RoomController)
//! acts on it and formats the reply.
//!
//! | Line                  | Command                     |
//! |-----------------------|-----------------------------|
//! | `GET_TEMP`            | [`AppCommand::GetTemp`]     |
//! | `GET_STATUS`          | [`AppCommand::GetStatus`]   |
//! | `FORCE_FAN:<0-3>`     | [`AppCommand::ForceFan`]    |
//! | `SET_PASS:<4 digits>` | [`AppCommand::SetPassword`] |

use core::fmt::Write as _;

use crate::config::PASSWORD_LENGTH;
use crate::control::policy::FanLevel;
use crate::fsm::context::Password;

/// Longest line the console keeps; longer input is truncated.
pub const MAX_LINE_LEN: usize = 31;

/// Reply text sent back on the console the command arrived on.
pub type Reply = heapless::String<64>;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Report the last temperature sample.
    GetTemp,
    /// Report state code, fan level and door intent.
    GetStatus,
    /// Switch the fan to manual mode at the given level.
    ForceFan(FanLevel),
    /// Replace the stored access code.
    SetPassword(Password),
}

/// Why a line was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// `FORCE_FAN:` argument not a single digit in `0..=3`.
    BadFanArg,
    /// `SET_PASS:` argument not exactly four ASCII digits.
    BadPassword,
    /// Not a recognised command; carries the offending line.
    Unknown(heapless::String<MAX_LINE_LEN>),
}

impl AppCommand {
    /// Parse one already-trimmed line.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        match line {
            "GET_TEMP" => return Ok(Self::GetTemp),
            "GET_STATUS" => return Ok(Self::GetStatus),
            _ => {}
        }

        if let Some(arg) = line.strip_prefix("FORCE_FAN:") {
            let mut chars = arg.chars();
            return match (chars.next().and_then(FanLevel::from_digit), chars.next()) {
                (Some(level), None) => Ok(Self::ForceFan(level)),
                _ => Err(CommandError::BadFanArg),
            };
        }

        if let Some(arg) = line.strip_prefix("SET_PASS:") {
            if arg.len() != PASSWORD_LENGTH || !arg.bytes().all(|b| b.is_ascii_digit()) {
                return Err(CommandError::BadPassword);
            }
            return Password::parse(arg)
                .map(Self::SetPassword)
                .ok_or(CommandError::BadPassword);
        }

        Err(CommandError::Unknown(truncated(line)))
    }
}

impl CommandError {
    /// Error reply text for this rejection.
    pub fn reply(&self) -> Reply {
        let mut out = Reply::new();
        // Capacity covers the longest line; a failed write only shortens the echo.
        let _ = match self {
            Self::BadFanArg => out.write_str("ERR: FORCE_FAN arg"),
            Self::BadPassword => out.write_str("ERR: PASS"),
            Self::Unknown(line) => write!(out, "ERR: UNKNOWN CMD ({})", line),
        };
        out
    }
}

/// Copy up to [`MAX_LINE_LEN`] bytes of `line`, stopping on a char boundary.
fn truncated(line: &str) -> heapless::String<MAX_LINE_LEN> {
    let mut out = heapless::String::new();
    for c in line.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
