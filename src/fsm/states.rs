//! Concrete state handler functions and table builder.
//!
//! Each state is a row of plain `fn` pointers: no closures, no dynamic
//! dispatch, no heap.
//!
//! ```text
//!  LOCKED ──[digit / C]──▶ INPUT_PASSWORD ──[4th digit, match]──▶ UNLOCKED
//!    ▲  ▲                     │   │                                │   │
//!    │  └────[* / timeout]────┘   └──[4th digit, mismatch]──┐      │  [D]
//!    │                                                      ▼      │   ▼
//!    ├───────────[timeout]──────────────────────────── ACCESS_DENIED │ EMERGENCY
//!    ├───────────[B]────────────────────────────────────────────────┘   │
//!    └───────────[#]────────────────────────────────────────────────────┘
//! ```

use super::context::RoomContext;
use super::{RoomState, StateDescriptor};
use crate::control::policy::FanLevel;
use log::{info, warn};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; RoomState::COUNT] {
    [
        // Index 0: Locked
        StateDescriptor {
            id: RoomState::Locked,
            name: "Locked",
            on_enter: Some(locked_enter),
            on_exit: None,
            on_key: locked_key,
            on_update: locked_update,
        },
        // Index 1: InputPassword
        StateDescriptor {
            id: RoomState::InputPassword,
            name: "InputPassword",
            on_enter: None,
            on_exit: None,
            on_key: input_key,
            on_update: input_update,
        },
        // Index 2: Unlocked
        StateDescriptor {
            id: RoomState::Unlocked,
            name: "Unlocked",
            on_enter: Some(unlocked_enter),
            on_exit: None,
            on_key: unlocked_key,
            on_update: unlocked_update,
        },
        // Index 3: AccessDenied
        StateDescriptor {
            id: RoomState::AccessDenied,
            name: "AccessDenied",
            on_enter: Some(denied_enter),
            on_exit: None,
            on_key: denied_key,
            on_update: denied_update,
        },
        // Index 4: Emergency
        StateDescriptor {
            id: RoomState::Emergency,
            name: "Emergency",
            on_enter: Some(emergency_enter),
            on_exit: Some(emergency_exit),
            on_key: emergency_key,
            on_update: emergency_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  LOCKED state
// ═══════════════════════════════════════════════════════════════════════════

fn locked_enter(ctx: &mut RoomContext) {
    ctx.door_locked = true;
    ctx.input.clear();
}

fn locked_key(ctx: &mut RoomContext, key: char) -> Option<RoomState> {
    match key {
        '0'..='9' => {
            ctx.input.clear();
            ctx.input.push(key as u8);
            Some(RoomState::InputPassword)
        }
        'C' | 'c' => {
            ctx.input.clear();
            Some(RoomState::InputPassword)
        }
        _ => None,
    }
}

fn locked_update(ctx: &mut RoomContext) -> Option<RoomState> {
    ctx.door_locked = true;
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  INPUT_PASSWORD state: collecting digits
// ═══════════════════════════════════════════════════════════════════════════

fn input_key(ctx: &mut RoomContext, key: char) -> Option<RoomState> {
    match key {
        '*' => Some(RoomState::Locked),
        'C' | 'c' => {
            ctx.input.pop();
            ctx.display_dirty = true;
            None
        }
        '0'..='9' => {
            if !ctx.input.push(key as u8) {
                return None;
            }
            ctx.display_dirty = true;
            ctx.input.is_full().then(|| verdict(ctx))
        }
        '#' if ctx.input.is_full() => Some(verdict(ctx)),
        _ => None,
    }
}

/// Compare the complete entry against the stored code and clear it.
fn verdict(ctx: &mut RoomContext) -> RoomState {
    let granted = ctx.entry_matches();
    ctx.input.clear();
    if granted {
        info!("INPUT: code accepted");
        RoomState::Unlocked
    } else {
        warn!("INPUT: code rejected");
        RoomState::AccessDenied
    }
}

fn input_update(ctx: &mut RoomContext) -> Option<RoomState> {
    if ctx.ms_since_input() > ctx.input_timeout_ms {
        info!("INPUT: no key for {} ms, relocking", ctx.ms_since_input());
        return Some(RoomState::Locked);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  UNLOCKED state: door open, fan keys live
// ═══════════════════════════════════════════════════════════════════════════

fn unlocked_enter(ctx: &mut RoomContext) {
    ctx.door_locked = false;
    ctx.manual_fan_override = false;
}

fn unlocked_key(ctx: &mut RoomContext, key: char) -> Option<RoomState> {
    if let Some(level) = FanLevel::from_digit(key) {
        ctx.force_fan_level(level);
        info!("UNLOCKED: fan forced to {}", level.label());
        return None;
    }
    match key {
        'A' | 'a' => {
            ctx.resume_auto_fan();
            info!("UNLOCKED: fan back to auto ({})", ctx.fan_level.label());
            None
        }
        'B' | 'b' => Some(RoomState::Locked),
        'D' | 'd' => Some(RoomState::Emergency),
        _ => None,
    }
}

fn unlocked_update(ctx: &mut RoomContext) -> Option<RoomState> {
    ctx.door_locked = false;
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  ACCESS_DENIED state: lockout after a wrong code
// ═══════════════════════════════════════════════════════════════════════════

fn denied_enter(ctx: &mut RoomContext) {
    ctx.input.clear();
}

fn denied_key(_ctx: &mut RoomContext, _key: char) -> Option<RoomState> {
    None
}

fn denied_update(ctx: &mut RoomContext) -> Option<RoomState> {
    if ctx.ms_in_state() > ctx.access_denied_timeout_ms {
        return Some(RoomState::Locked);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  EMERGENCY state: door released, fan at full
// ═══════════════════════════════════════════════════════════════════════════

fn emergency_enter(ctx: &mut RoomContext) {
    ctx.door_locked = false;
    ctx.held_fan_level = ctx.fan_level;
    warn!("EMERGENCY: door released");
}

fn emergency_exit(ctx: &mut RoomContext) {
    ctx.fan_level = if ctx.manual_fan_override {
        ctx.held_fan_level
    } else {
        ctx.bands.level_for(ctx.temperature_c)
    };
    info!("EMERGENCY: cleared, fan {}", ctx.fan_level.label());
}

fn emergency_key(_ctx: &mut RoomContext, key: char) -> Option<RoomState> {
    (key == '#').then_some(RoomState::Locked)
}

fn emergency_update(ctx: &mut RoomContext) -> Option<RoomState> {
    ctx.door_locked = false;
    if ctx.fan_level != FanLevel::High {
        ctx.fan_level = FanLevel::High;
        ctx.display_dirty = true;
    }
    None
}
