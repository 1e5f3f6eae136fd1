//! Function-pointer finite state machine engine.
//!
//! Classic embedded FSM pattern ported to Rust:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  StateTable                                                      │
//! │  ┌───────────────┬──────────┬──────────┬───────────┬───────────┐ │
//! │  │ RoomState     │ on_enter │ on_exit  │ on_key    │ on_update │ │
//! │  ├───────────────┼──────────┼──────────┼───────────┼───────────┤ │
//! │  │ Locked        │ fn(ctx)  │    -     │ fn(ctx,k) │ fn(ctx)   │ │
//! │  │ InputPassword │    -     │    -     │ fn(ctx,k) │ fn(ctx)   │ │
//! │  │ Unlocked      │ fn(ctx)  │    -     │ fn(ctx,k) │ fn(ctx)   │ │
//! │  │ AccessDenied  │ fn(ctx)  │    -     │ fn(ctx,k) │ fn(ctx)   │ │
//! │  │ Emergency     │ fn(ctx)  │ fn(ctx)  │ fn(ctx,k) │ fn(ctx)   │ │
//! │  └───────────────┴──────────┴──────────┴───────────┴───────────┘ │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Key presses go to `on_key` of the **current** state; periodic ticks go to
//! `on_update`. Either may return `Some(next)`, in which case the engine
//! runs `on_exit` for the current state, stamps the entry time, marks the
//! display dirty, and runs `on_enter` for the next. Entry actions depend
//! only on the state being entered, never on how it was reached.

pub mod context;
pub mod states;

use context::RoomContext;
use log::info;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of all access-control states.
/// Must stay in sync with the state table built in [`states::build_state_table`].
/// The discriminants are the numeric codes reported by `GET_STATUS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RoomState {
    Locked = 0,
    InputPassword = 1,
    Unlocked = 2,
    AccessDenied = 3,
    Emergency = 4,
}

impl RoomState {
    /// Total number of states, used to size the table array.
    pub const COUNT: usize = 5;

    /// Convert an index back to `RoomState`. Asserts in debug builds;
    /// falls back to `Locked` in release (the door stays shut).
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Locked,
            1 => Self::InputPassword,
            2 => Self::Unlocked,
            3 => Self::AccessDenied,
            4 => Self::Emergency,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Locked
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
pub type StateActionFn = fn(&mut RoomContext);

/// Signature for the key handler. Returns `Some(next)` to transition.
pub type StateKeyFn = fn(&mut RoomContext, char) -> Option<RoomState>;

/// Signature for the per-tick handler. Returns `Some(next)` to transition.
pub type StateUpdateFn = fn(&mut RoomContext) -> Option<RoomState>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
/// Stored in a fixed-size array: no heap, no `dyn`.
pub struct StateDescriptor {
    pub id: RoomState,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_key: StateKeyFn,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
///
/// Owns the state table and the index of the active row. The mutable
/// [`RoomContext`] is owned by the caller and threaded through every call.
pub struct Fsm {
    /// Fixed-size table indexed by `RoomState as usize`.
    table: [StateDescriptor; RoomState::COUNT],
    /// Index of the currently active state.
    current: usize,
}

impl Fsm {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor; RoomState::COUNT], initial: RoomState) -> Self {
        Self {
            table,
            current: initial as usize,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first key or tick.
    pub fn start(&mut self, ctx: &mut RoomContext) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        ctx.state_enter_ms = ctx.now_ms;
        ctx.display_dirty = true;
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Dispatch a key press to the current state.
    pub fn handle_key(&mut self, key: char, ctx: &mut RoomContext) {
        if let Some(next) = (self.table[self.current].on_key)(ctx, key) {
            self.transition(next, ctx);
        }
    }

    /// Run the current state's periodic handler.
    pub fn tick(&mut self, ctx: &mut RoomContext) {
        if let Some(next) = (self.table[self.current].on_update)(ctx) {
            self.transition(next, ctx);
        }
    }

    /// The current state's identity.
    pub fn current_state(&self) -> RoomState {
        RoomState::from_index(self.current)
    }

    /// Display name of the current state.
    pub fn current_name(&self) -> &'static str {
        self.table[self.current].name
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: RoomState, ctx: &mut RoomContext) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {} (temp={:.1}, fan={:?}, manual={})",
            self.table[self.current].name,
            self.table[next_idx].name,
            ctx.temperature_c,
            ctx.fan_level,
            ctx.manual_fan_override
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;
        ctx.state_enter_ms = ctx.now_ms;
        ctx.display_dirty = true;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
