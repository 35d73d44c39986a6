//! Zero-crossing SSR / triac outputs
//!
//! Each heater channel is switched through a zero-crossing solid state
//! relay or an opto-triac driven by a GPIO pin. The pin can be wired
//! active-high (default) or active-low.
//!
//! # Usage
//!
//! ```ignore
//! let bank = SsrBank::<_, 4>::from_config(&config, [pin0, pin1, pin2, pin3])?;
//! let mut heaters: Heaters<_, 4> = Heaters::from_config(&config, bank)?;
//!
//! // In the zero-crossing interrupt:
//! heaters.zero_crossed();
//! ```

use embedded_hal::digital::OutputPin;
use heapless::Vec;

use burstfire_core::config::{BurstFireConfig, ConfigError};
use burstfire_core::{HeaterId, StateSetter};

/// One SSR output
pub struct SsrChannel<P> {
    pin: P,
    /// If true, heater ON = pin LOW
    inverted: bool,
    /// Current logical state (true = heater on)
    on: bool,
    /// Pin writes that reported an error, including the initial off write
    failed_writes: u32,
}

impl<P: OutputPin> SsrChannel<P> {
    /// Create a new SSR output, switched off
    ///
    /// A failed initial write is counted in [`SsrChannel::failed_writes`].
    ///
    /// # Arguments
    /// - `pin`: The GPIO pin driving the SSR input
    /// - `inverted`: If true, heater is ON when pin is LOW
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut channel = Self {
            pin,
            inverted,
            on: false,
            failed_writes: 0,
        };
        // Ensure heater starts off; a failure is recorded by set_on
        let _ = channel.set_on(false);
        channel
    }

    /// Create a new SSR output with active-high drive
    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    /// Create a new SSR output with active-low drive
    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }

    /// Switch the heater on or off
    ///
    /// The logical state is updated even if the pin write fails; the
    /// failure is counted and returned.
    pub fn set_on(&mut self, on: bool) -> Result<(), P::Error> {
        self.on = on;

        let result = if on != self.inverted {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        if result.is_err() {
            self.failed_writes = self.failed_writes.saturating_add(1);
        }
        result
    }

    /// Pin writes that reported an error since creation
    pub fn failed_writes(&self) -> u32 {
        self.failed_writes
    }

    /// Check if the heater is currently on
    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Release the pin
    pub fn into_inner(self) -> P {
        self.pin
    }
}

/// Bank of SSR outputs indexed by heater id
///
/// Implements [`StateSetter`] so it can be handed straight to the
/// controller. Ids without a channel are ignored. A failed pin write is
/// counted and otherwise ignored; the zero-crossing handler never waits
/// on an output.
pub struct SsrBank<P, const N: usize> {
    channels: Vec<SsrChannel<P>, N>,
}

impl<P: OutputPin, const N: usize> Default for SsrBank<P, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: OutputPin, const N: usize> SsrBank<P, N> {
    /// Create an empty bank
    pub fn new() -> Self {
        Self {
            channels: Vec::new(),
        }
    }

    /// Append a channel; it gets the next heater id
    ///
    /// Returns the channel back if the bank is full.
    pub fn push(&mut self, channel: SsrChannel<P>) -> Result<HeaterId, SsrChannel<P>> {
        let Ok(id) = HeaterId::try_from(self.channels.len()) else {
            return Err(channel);
        };
        self.channels.push(channel)?;
        Ok(id)
    }

    /// Build a bank from configured channels and the matching pins
    ///
    /// Pins are paired with channels in order; each channel's
    /// `inverted` flag selects the drive polarity.
    pub fn from_config<I>(config: &BurstFireConfig, pins: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = P>,
    {
        config.validate()?;

        let mut bank = Self::new();
        let mut pins = pins.into_iter();
        for (heater, channel) in config.channels.iter().enumerate() {
            let pin = pins.next().ok_or(ConfigError::MissingPin {
                channel: heater as HeaterId,
            })?;
            bank.push(SsrChannel::new(pin, channel.pin.inverted))
                .map_err(|_| ConfigError::TooManyChannels)?;
        }

        Ok(bank)
    }

    /// Channel for `heater`
    pub fn channel(&self, heater: HeaterId) -> Option<&SsrChannel<P>> {
        self.channels.get(usize::from(heater))
    }

    /// Number of channels
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Check if the bank has no channels
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Pin writes that reported an error since each channel was created
    ///
    /// Includes the initial off write of channels that failed it.
    pub fn failed_writes(&self) -> u32 {
        self.channels
            .iter()
            .fold(0, |total, c| total.saturating_add(c.failed_writes))
    }

    /// Switch every channel off
    pub fn all_off(&mut self) {
        for heater in 0..self.channels.len() {
            self.set_state(heater as HeaterId, false);
        }
    }
}

impl<P: OutputPin, const N: usize> StateSetter for SsrBank<P, N> {
    fn set_state(&mut self, heater: HeaterId, on: bool) {
        let Some(channel) = self.channels.get_mut(usize::from(heater)) else {
            return;
        };

        if channel.set_on(on).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("ssr: write failed on heater {}", heater);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burstfire_core::config::{ChannelConfig, PinConfig};
    use burstfire_core::Heaters;
    use core::convert::Infallible;
    use embedded_hal::digital::{Error, ErrorKind, ErrorType};

    /// Mock GPIO pin for testing
    struct MockPin {
        high: bool,
    }

    impl MockPin {
        fn new() -> Self {
            Self { high: false }
        }
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.high = true;
            Ok(())
        }

        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.high = false;
            Ok(())
        }
    }

    #[derive(Debug)]
    struct PinFault;

    impl Error for PinFault {
        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    /// Pin whose writes always fail
    struct BrokenPin;

    impl ErrorType for BrokenPin {
        type Error = PinFault;
    }

    impl OutputPin for BrokenPin {
        fn set_high(&mut self) -> Result<(), Self::Error> {
            Err(PinFault)
        }

        fn set_low(&mut self) -> Result<(), Self::Error> {
            Err(PinFault)
        }
    }

    fn config(inverted: &[bool], initial_power: &[u8]) -> BurstFireConfig {
        let mut config = BurstFireConfig::new();
        for (i, (&inverted, &initial_power)) in inverted.iter().zip(initial_power).enumerate() {
            let pin = if inverted {
                PinConfig::inverted(i as u8)
            } else {
                PinConfig::new(i as u8)
            };
            config
                .channels
                .push(ChannelConfig {
                    pin,
                    initial_power,
                    ..ChannelConfig::default()
                })
                .unwrap();
        }
        config
    }

    #[test]
    fn test_active_high_channel() {
        let mut channel = SsrChannel::new_active_high(MockPin::new());

        // Initially off
        assert!(!channel.is_on());
        assert!(!channel.pin.high);

        channel.set_on(true).unwrap();
        assert!(channel.is_on());
        assert!(channel.pin.high);

        channel.set_on(false).unwrap();
        assert!(!channel.is_on());
        assert!(!channel.pin.high);
    }

    #[test]
    fn test_active_low_channel() {
        let mut channel = SsrChannel::new_active_low(MockPin::new());

        // Initially off (pin is high for active-low)
        assert!(!channel.is_on());
        assert!(channel.pin.high);

        channel.set_on(true).unwrap();
        assert!(channel.is_on());
        assert!(!channel.pin.high);

        assert!(!channel.into_inner().high);
    }

    #[test]
    fn test_bank_ignores_unknown_heater() {
        let mut bank = SsrBank::<MockPin, 2>::new();
        assert_eq!(bank.push(SsrChannel::new_active_high(MockPin::new())).ok(), Some(0));

        bank.set_state(5, true);
        assert_eq!(bank.len(), 1);
        assert!(!bank.channel(0).unwrap().is_on());
        assert_eq!(bank.failed_writes(), 0);
    }

    #[test]
    fn test_bank_full() {
        let mut bank = SsrBank::<MockPin, 1>::new();
        assert!(bank.push(SsrChannel::new_active_high(MockPin::new())).is_ok());
        assert!(bank.push(SsrChannel::new_active_high(MockPin::new())).is_err());
    }

    #[test]
    fn test_failed_writes_counted() {
        let mut bank = SsrBank::<BrokenPin, 2>::new();
        let _ = bank.push(SsrChannel::new_active_high(BrokenPin));

        // The initial off write already failed
        assert_eq!(bank.failed_writes(), 1);

        bank.set_state(0, true);
        bank.set_state(0, false);

        assert_eq!(bank.failed_writes(), 3);
        assert!(!bank.channel(0).unwrap().is_on());
    }

    #[test]
    fn test_failed_initial_write_counted() {
        let channel = SsrChannel::new_active_high(BrokenPin);
        assert_eq!(channel.failed_writes(), 1);
        assert!(!channel.is_on());

        let mut bank = SsrBank::<BrokenPin, 1>::new();
        assert_eq!(bank.push(channel).ok(), Some(0));
        assert_eq!(bank.failed_writes(), 1);
    }

    #[test]
    fn test_from_config_reports_failed_initial_writes() {
        let config = config(&[false, true], &[0, 0]);
        let bank = SsrBank::<_, 2>::from_config(&config, [BrokenPin, BrokenPin]).unwrap();

        assert_eq!(bank.failed_writes(), 2);
        assert_eq!(bank.channel(1).unwrap().failed_writes(), 1);
    }

    #[test]
    fn test_healthy_pins_report_no_failures() {
        let mut channel = SsrChannel::new_active_low(MockPin::new());
        channel.set_on(true).unwrap();
        assert_eq!(channel.failed_writes(), 0);
    }

    #[test]
    fn test_from_config_polarity() {
        let config = config(&[false, true], &[0, 0]);
        let bank = SsrBank::<_, 2>::from_config(&config, [MockPin::new(), MockPin::new()]).unwrap();

        assert!(!bank.channel(0).unwrap().pin.high);
        assert!(bank.channel(1).unwrap().pin.high);
    }

    #[test]
    fn test_from_config_errors() {
        let config = config(&[false, false, false], &[0, 0, 0]);

        let missing = SsrBank::<_, 4>::from_config(&config, [MockPin::new(), MockPin::new()]);
        assert_eq!(missing.err(), Some(ConfigError::MissingPin { channel: 2 }));

        let full = SsrBank::<_, 2>::from_config(
            &config,
            [MockPin::new(), MockPin::new(), MockPin::new()],
        );
        assert_eq!(full.err(), Some(ConfigError::TooManyChannels));
    }

    #[test]
    fn test_driven_by_controller() {
        let config = config(&[false, true, false], &[50, 100, 0]);
        let bank = SsrBank::<_, 3>::from_config(
            &config,
            [MockPin::new(), MockPin::new(), MockPin::new()],
        )
        .unwrap();
        let mut heaters = Heaters::<_, 3>::from_config(&config, bank).unwrap();

        let mut on = [0usize; 3];
        for _ in 0..100 {
            heaters.zero_crossed();
            for (heater, count) in on.iter_mut().enumerate() {
                let channel = heaters.setter().channel(heater as HeaterId).unwrap();
                // Logical state and pin level agree with the polarity
                assert_eq!(channel.pin.high, channel.is_on() != (heater == 1));
                if channel.is_on() {
                    *count += 1;
                }
            }
        }
        assert_eq!(on, [50, 100, 0]);

        heaters.setter_mut().all_off();
        assert!(!heaters.setter().channel(1).unwrap().is_on());
        assert!(heaters.setter().channel(1).unwrap().pin.high);
    }
}
