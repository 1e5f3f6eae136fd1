//! RoomGuard firmware library.
//!
//! Exposes the access-control and climate logic for integration testing
//! and host simulation. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod fsm;
pub mod pins;

// Hardware-facing modules carry host stubs so the crate builds off-target.
pub mod adapters;
pub mod drivers;
pub mod sensors;
