//! Hardware abstraction traits
//!
//! These traits define the interface between the burst-fire logic
//! and the hardware (or test doubles) around it.

pub mod heater;

pub use heater::{HeaterBank, StateSetter};
