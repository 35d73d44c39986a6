//! Configuration type definitions
//!
//! These types describe the heater channels of a controller. Configuration
//! is stored in flash as postcard-serialized binary data.

use heapless::{String, Vec};

use crate::heater::{HeaterId, Power, MAX_POWER};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum label length
pub const MAX_LABEL_LEN: usize = 16;

/// Maximum heater channels per config
pub const MAX_CHANNELS: usize = 16;

/// Current configuration format version
pub const CONFIG_VERSION: u8 = 1;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Deserialization failed
    Deserialize,
    /// Serialization failed (buffer too small)
    Serialize,
    /// Config version mismatch
    VersionMismatch,
    /// No heater channels configured
    NoChannels,
    /// More channels than the controller or output bank holds
    TooManyChannels,
    /// No output pin supplied for a channel
    MissingPin {
        /// Channel without a pin
        channel: HeaterId,
    },
    /// Initial power above 100 %
    InvalidPower {
        /// Offending channel index
        channel: HeaterId,
    },
    /// Two channels drive the same pin
    DuplicatePin {
        /// GPIO pin number
        pin: u8,
    },
}

/// Output pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinConfig {
    /// GPIO pin number
    pub pin: u8,
    /// Output is active-low (SSR input wired to the supply rail)
    pub inverted: bool,
}

impl PinConfig {
    /// Create an active-high pin config
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
        }
    }

    /// Create an inverted (active-low) pin
    pub const fn inverted(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
        }
    }
}

/// One heater channel
///
/// The channel's position in [`BurstFireConfig::channels`] is its heater
/// id, so its parity decides the bank it belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChannelConfig {
    /// Channel name/identifier
    pub name: String<MAX_LABEL_LEN>,
    /// Triac/SSR output pin
    pub pin: PinConfig,
    /// Power requested at startup (percent)
    pub initial_power: Power,
}

/// Complete controller configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BurstFireConfig {
    /// Configuration version for compatibility checks
    pub version: u8,
    /// Heater channels, indexed by heater id
    pub channels: Vec<ChannelConfig, MAX_CHANNELS>,
}

impl Default for BurstFireConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            channels: Vec::new(),
        }
    }
}

impl BurstFireConfig {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of configured heaters
    pub fn heater_count(&self) -> usize {
        self.channels.len()
    }

    /// Find a channel by name, returning its heater id
    pub fn find_channel(&self, name: &str) -> Option<(HeaterId, &ChannelConfig)> {
        self.channels
            .iter()
            .enumerate()
            .find(|(_, c)| c.name.as_str() == name)
            .and_then(|(i, c)| HeaterId::try_from(i).ok().map(|id| (id, c)))
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != CONFIG_VERSION {
            return Err(ConfigError::VersionMismatch);
        }

        if self.channels.is_empty() {
            return Err(ConfigError::NoChannels);
        }

        for (i, channel) in self.channels.iter().enumerate() {
            if channel.initial_power > MAX_POWER {
                return Err(ConfigError::InvalidPower {
                    channel: i as HeaterId,
                });
            }

            if self.channels[..i].iter().any(|c| c.pin.pin == channel.pin.pin) {
                return Err(ConfigError::DuplicatePin {
                    pin: channel.pin.pin,
                });
            }
        }

        Ok(())
    }

    /// Deserialize and validate a postcard-encoded configuration
    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize into `buf` with postcard, returning the used part
    #[cfg(feature = "serde")]
    pub fn to_slice<'b>(&self, buf: &'b mut [u8]) -> Result<&'b mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Serialize)
    }
}
