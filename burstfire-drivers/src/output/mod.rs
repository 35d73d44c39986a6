//! Heater output stages

pub mod ssr;

pub use ssr::{SsrBank, SsrChannel};
