//! Decoder configuration. Defaults match a single channel receiver fed in real time; a TOML
//! document can override any field.

use serde_derive::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of channels a single front-end can reasonably feed
pub const MAX_CHANNELS: usize = 8;

/// Channel rate expected by the MSK demodulator
pub const CHANNEL_RATE: u32 = 12_500;

/// Calibration added to 20.log10(carrier) to obtain the reported level
pub const LEVEL_OFFSET: f64 = 106.0;


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of channels, also the number of parser workers
    pub channels: usize,
    /// Stamp frames with the wall clock. Disabled for file or replayed input.
    pub realtime: bool,
    pub level_offset: f64,
    /// Sample rate of the amplitude stream fed to `Channel::process`
    pub channel_rate: u32,
}

impl Default for Config {

    fn default() -> Config {

        Config {
            channels: 1,
            realtime: true,
            level_offset: LEVEL_OFFSET,
            channel_rate: CHANNEL_RATE,
        }
    }
}

impl Config {

    /// Parses and validates a TOML document. Missing keys keep their default value.
    pub fn from_toml(content: &str) -> Result<Config> {

        let config: Config = toml::from_str(content)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {

        if self.channels == 0 || self.channels > MAX_CHANNELS {
            return Err(Error::InvalidConfig {
                msg: format!("channels must be between 1 and {}, got {}", MAX_CHANNELS, self.channels),
            });
        }

        // The MSK matched filter needs at least two samples per bit
        if self.channel_rate < 4_800 {
            return Err(Error::InvalidConfig {
                msg: format!("channel_rate too low: {} Hz", self.channel_rate),
            });
        }

        if !self.level_offset.is_finite() {
            return Err(Error::InvalidConfig { msg: String::from("level_offset must be finite") });
        }

        Ok(())
    }
}
