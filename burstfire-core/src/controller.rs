//! Zero-crossing heater controller
//!
//! [`Heaters`] owns every heater channel and the current one-second
//! schedule. It is driven by two kinds of calls from the same execution
//! context:
//!
//! - [`Heaters::zero_crossed`] from the zero-crossing interrupt, once per
//!   half-period;
//! - [`Heaters::set_power`] and the queries, between zero crossings.
//!
//! ```ignore
//! let mut heaters: Heaters<_, 8> = Heaters::new(4, |id, on| ssr.set(id, on))?;
//! heaters.set_power(0, 40);
//!
//! // In the zero-crossing interrupt:
//! heaters.zero_crossed();
//! ```

use heapless::Vec;

use crate::config::{BurstFireConfig, ConfigError};
use crate::heater::{Heater, HeaterId, Power, MAX_POWER};
use crate::scheduler::{build_schedule, peak_bank_load, BankLoad, Schedule, FRAME_COUNT};
use crate::traits::{HeaterBank, StateSetter};

/// Controller construction errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControllerError {
    /// Heater count was zero
    NoHeaters,
    /// Heater count exceeds the controller capacity
    TooManyHeaters,
    /// Configuration rejected
    Config(ConfigError),
}

impl From<ConfigError> for ControllerError {
    fn from(e: ConfigError) -> Self {
        ControllerError::Config(e)
    }
}

/// Burst-fire controller for up to `N` heaters
///
/// Every zero crossing drives every heater through the [`StateSetter`],
/// on if the heater is listed in the frame for the current half-period
/// and off otherwise. After the 100th half-period of a second each
/// heater's realized power is committed to its history.
pub struct Heaters<S, const N: usize> {
    heaters: Vec<Heater, N>,
    schedule: Schedule<N>,
    /// Index of the frame applied on the next zero crossing
    current_frame: usize,
    setter: S,
}

impl<S: StateSetter, const N: usize> Heaters<S, N> {
    /// Create a controller with `count` heaters, all at 0 % and off
    pub fn new(count: usize, setter: S) -> Result<Self, ControllerError> {
        if count == 0 {
            return Err(ControllerError::NoHeaters);
        }
        if count > N || count > usize::from(HeaterId::MAX) + 1 {
            return Err(ControllerError::TooManyHeaters);
        }

        let mut heaters = Vec::new();
        for _ in 0..count {
            heaters
                .push(Heater::new())
                .map_err(|_| ControllerError::TooManyHeaters)?;
        }

        Ok(Self {
            heaters,
            schedule: Schedule::empty(),
            current_frame: 0,
            setter,
        })
    }

    /// Create a controller with one heater per configured channel
    ///
    /// Each channel's initial power is requested before the first zero
    /// crossing.
    pub fn from_config(config: &BurstFireConfig, setter: S) -> Result<Self, ControllerError> {
        config.validate()?;

        let mut heaters = Self::new(config.heater_count(), setter)?;
        for (heater, channel) in config.channels.iter().enumerate() {
            if let Some(h) = heaters.heaters.get_mut(heater) {
                h.set_power(channel.initial_power);
            }
        }
        heaters.rebuild();

        Ok(heaters)
    }

    /// Request `power` percent on `heater` and reschedule
    ///
    /// Requests above [`MAX_POWER`] and unknown heaters are ignored. The new
    /// schedule applies from the next zero crossing; the half-periods
    /// already driven this second are kept, so the realized power of this
    /// second blends the old and new requests.
    pub fn set_power(&mut self, heater: HeaterId, power: Power) {
        let Some(h) = self.heaters.get_mut(usize::from(heater)) else {
            #[cfg(feature = "defmt")]
            defmt::warn!("set_power: unknown heater {}", heater);
            return;
        };

        if !h.set_power(power) {
            #[cfg(feature = "defmt")]
            defmt::debug!("set_power: heater {} rejected {}%", heater, power);
            return;
        }

        self.rebuild();
    }

    /// Realized power of `heater`, `offset` seconds before the last
    /// completed second (0 for unknown heaters)
    pub fn power(&self, heater: HeaterId, offset: u16) -> Power {
        self.heaters
            .get(usize::from(heater))
            .map_or(0, |h| h.power(offset))
    }

    /// Requested power of `heater` (0 for unknown heaters)
    pub fn current_power(&self, heater: HeaterId) -> Power {
        self.heaters
            .get(usize::from(heater))
            .map_or(0, Heater::current_power)
    }

    /// State `heater` was driven to in the previous half-period
    pub fn last_half_period_state(&self, heater: HeaterId) -> bool {
        self.heaters
            .get(usize::from(heater))
            .is_some_and(Heater::last_state)
    }

    /// Peak heaters on per bank if `heater` were requested at `power`
    ///
    /// Runs the schedule builder on a copy of the requested powers; the
    /// live schedule and heaters are left untouched. An unknown heater or
    /// a power above [`MAX_POWER`] leaves the copy as it is, matching what
    /// [`Heaters::set_power`] would do.
    pub fn max_turned_on_after_power_change(&self, heater: HeaterId, power: Power) -> BankLoad {
        let mut powers: Vec<Power, N> = self.heaters.iter().map(Heater::current_power).collect();

        if power <= MAX_POWER {
            if let Some(p) = powers.get_mut(usize::from(heater)) {
                *p = power;
            }
        }

        let schedule: Schedule<N> = build_schedule(&powers);
        peak_bank_load(&schedule)
    }

    /// Advance one half-period
    ///
    /// Must be called once per zero crossing, never re-entrantly.
    pub fn zero_crossed(&mut self) {
        let mut on = [false; N];
        if let Some(frame) = self.schedule.frame(self.current_frame) {
            for &heater in frame {
                if let Some(slot) = on.get_mut(usize::from(heater)) {
                    *slot = true;
                }
            }
        }

        for (id, (heater, &state)) in self.heaters.iter_mut().zip(on.iter()).enumerate() {
            heater.set_state(state);
            self.setter.set_state(id as HeaterId, state);
        }

        self.current_frame += 1;

        if self.current_frame >= FRAME_COUNT {
            self.current_frame = 0;
            for heater in self.heaters.iter_mut() {
                heater.update();
            }

            #[cfg(feature = "defmt")]
            defmt::trace!("second complete, {} heaters committed", self.heaters.len());
        }
    }

    /// Number of heaters
    pub fn heater_count(&self) -> usize {
        self.heaters.len()
    }

    /// Frame that the next zero crossing will apply
    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    /// Schedule currently in force
    pub fn schedule(&self) -> &Schedule<N> {
        &self.schedule
    }

    /// Access the state setter
    pub fn setter(&self) -> &S {
        &self.setter
    }

    /// Mutable access to the state setter
    pub fn setter_mut(&mut self) -> &mut S {
        &mut self.setter
    }

    /// Replace the schedule with one built from the current requests
    fn rebuild(&mut self) {
        let powers: Vec<Power, N> = self.heaters.iter().map(Heater::current_power).collect();
        self.schedule = build_schedule(&powers);
    }
}

impl<S: StateSetter, const N: usize> HeaterBank for Heaters<S, N> {
    fn set_power(&mut self, heater: HeaterId, power: Power) {
        Heaters::set_power(self, heater, power)
    }

    fn power(&self, heater: HeaterId, offset: u16) -> Power {
        Heaters::power(self, heater, offset)
    }

    fn max_turned_on_after_power_change(&self, heater: HeaterId, power: Power) -> BankLoad {
        Heaters::max_turned_on_after_power_change(self, heater, power)
    }

    fn last_half_period_state(&self, heater: HeaterId) -> bool {
        Heaters::last_half_period_state(self, heater)
    }
}
