//! Per-channel heater state
//!
//! A [`Heater`] holds the duty requested for one channel, the on/off state
//! committed on the last two zero crossings and the power it actually
//! realized over the last [`HISTORY_LEN`] seconds.

pub mod history;

pub use history::{PowerHistory, HISTORY_LEN};

/// Heater channel index (0-based)
///
/// Even channels form the top bank, odd channels the bottom bank.
pub type HeaterId = u8;

/// Power in percent of half-periods per second (0-100)
pub type Power = u8;

/// Maximum power in percent
pub const MAX_POWER: Power = 100;

/// State of a single heater channel
#[derive(Debug, Clone, Default)]
pub struct Heater {
    /// Requested power, applied at the next schedule rebuild
    power: Power,
    /// Half-periods driven on during the current second
    on_count: u8,
    /// State committed for the current half-period
    state: bool,
    /// State committed for the previous half-period
    last_state: bool,
    history: PowerHistory,
}

impl Heater {
    /// Create a heater at 0 % with an empty history
    pub const fn new() -> Self {
        Self {
            power: 0,
            on_count: 0,
            state: false,
            last_state: false,
            history: PowerHistory::new(),
        }
    }

    /// Request a power in percent
    ///
    /// Values above [`MAX_POWER`] are ignored and the previous request is
    /// kept. Returns whether the request was accepted.
    pub fn set_power(&mut self, power: Power) -> bool {
        if power > MAX_POWER {
            return false;
        }
        self.power = power;
        true
    }

    /// Requested power (what the next schedule rebuild will use)
    pub fn current_power(&self) -> Power {
        self.power
    }

    /// Realized power `offset` seconds before the last completed second
    ///
    /// The value is the number of half-periods the heater was driven on
    /// during that second, so a request changed mid-second reports the
    /// blend of both requests.
    pub fn power(&self, offset: u16) -> Power {
        self.history.get(usize::from(offset))
    }

    /// Commit the state driven for the current half-period
    pub fn set_state(&mut self, on: bool) {
        self.last_state = self.state;
        self.state = on;

        if on {
            self.on_count = self.on_count.saturating_add(1);
        }
    }

    /// State committed for the previous half-period
    pub fn last_state(&self) -> bool {
        self.last_state
    }

    /// Close the current second
    ///
    /// Must be called exactly once per second, after the last half-period.
    pub fn update(&mut self) {
        self.history.push(self.on_count);
        self.on_count = 0;
    }

    /// Half-periods driven on so far in the current second
    pub fn on_count(&self) -> u8 {
        self.on_count
    }

    /// Realized power history
    pub fn history(&self) -> &PowerHistory {
        &self.history
    }
}
