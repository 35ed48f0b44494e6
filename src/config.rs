use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::util::{MAX_SPEED, MIN_SPEED};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VisualizerConfig {
    pub array_length: usize,
    pub min_value: i32,
    pub max_value: i32,
    pub default_speed: u8,
    /// Length of one delay unit. A paced delay lasts `101 - speed` units.
    pub delay_unit: Duration,
    /// Fixed seed for array generation; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            array_length: 20,
            min_value: 1,
            max_value: 50,
            default_speed: 50,
            delay_unit: Duration::from_millis(1),
            seed: None,
        }
    }
}

impl VisualizerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_value > self.max_value {
            return Err(Error::InvalidConfig(format!(
                "min value {} is greater than max value {}",
                self.min_value, self.max_value
            )));
        }
        if !(MIN_SPEED..=MAX_SPEED).contains(&self.default_speed) {
            return Err(Error::InvalidConfig(format!(
                "speed {} is outside {MIN_SPEED}..={MAX_SPEED}",
                self.default_speed
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = VisualizerConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.array_length, 20);
        assert_eq!(cfg.default_speed, 50);
    }

    #[test]
    fn inverted_value_range_is_rejected() {
        let cfg = VisualizerConfig {
            min_value: 10,
            max_value: 2,
            ..VisualizerConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn speed_out_of_range_is_rejected() {
        for speed in [0, 101] {
            let cfg = VisualizerConfig {
                default_speed: speed,
                ..VisualizerConfig::default()
            };
            assert!(cfg.validate().is_err(), "speed {speed} should be rejected");
        }
    }

    #[test]
    fn json_roundtrip() {
        let cfg = VisualizerConfig {
            seed: Some(9),
            delay_unit: Duration::from_millis(5),
            ..VisualizerConfig::default()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: VisualizerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }
}
