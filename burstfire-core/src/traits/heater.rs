//! Heater output and heater bank traits

use crate::heater::{HeaterId, Power};
use crate::scheduler::BankLoad;

/// Trait for the heater output stage
///
/// Implementations drive the triac/SSR of a heater channel. The controller
/// calls this once per heater on every zero crossing, whether or not the
/// state changed, so implementations must be cheap and idempotent.
pub trait StateSetter {
    /// Switch heater `heater` on or off for the coming half-period
    fn set_state(&mut self, heater: HeaterId, on: bool);
}

impl<F> StateSetter for F
where
    F: FnMut(HeaterId, bool),
{
    fn set_state(&mut self, heater: HeaterId, on: bool) {
        self(heater, on)
    }
}

/// Command and query surface of a bank of burst-fire heaters
///
/// Implemented by [`crate::Heaters`]. Code that only needs to request power
/// and inspect the result (thermal loops, load planning) should depend
/// on this trait so it can be exercised against a double.
pub trait HeaterBank {
    /// Request `power` percent on `heater`
    ///
    /// Values above [`crate::MAX_POWER`] are ignored.
    fn set_power(&mut self, heater: HeaterId, power: Power);

    /// Power realized `offset` seconds before the last completed second
    ///
    /// `offset = 0` is the last completed second. The second in progress is
    /// never reported. Unknown heaters and offsets past the history report 0.
    fn power(&self, heater: HeaterId, offset: u16) -> Power;

    /// Peak number of simultaneously energized heaters per bank if `heater`
    /// were set to `power`
    ///
    /// Does not change any live state.
    fn max_turned_on_after_power_change(&self, heater: HeaterId, power: Power) -> BankLoad;

    /// State the heater was driven to in the previous half-period
    fn last_half_period_state(&self, heater: HeaterId) -> bool;
}
