//! Half-period frame scheduler
//!
//! Converts per-heater power requests into one second of half-period
//! frames and measures the bank load that schedule produces.

pub mod frame;
pub mod schedule;

pub use frame::HeatFrame;
pub use schedule::{build_schedule, peak_bank_load, BankLoad, Schedule};

/// Half-periods per second (50 Hz mains)
pub const FRAME_COUNT: usize = 100;
