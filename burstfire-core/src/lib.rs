//! Board-agnostic core logic for burst-fire heater control
//!
//! This crate contains all control logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (state setter, heater bank)
//! - Per-channel heater state with a bounded power history
//! - Half-period frame schedule and its builder
//! - Zero-crossing controller
//! - Configuration type definitions
//!
//! One second of mains is modelled as [`scheduler::FRAME_COUNT`] half-period
//! frames. A heater at 40 % is listed in 40 of those frames, so it is
//! switched on for 40 of the 100 zero-crossing intervals of every second.

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod controller;
pub mod heater;
pub mod scheduler;
pub mod traits;

pub use controller::{ControllerError, Heaters};
pub use heater::{Heater, HeaterId, Power, HISTORY_LEN, MAX_POWER};
pub use scheduler::{build_schedule, peak_bank_load, BankLoad, HeatFrame, Schedule, FRAME_COUNT};
pub use traits::{HeaterBank, StateSetter};
