use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::controller::{DEFAULT_BRIGHTNESS, DEFAULT_LED_COUNT};
use crate::sysfs::DEFAULT_GPIO_ROOT;

/// Blinkt! wiring: data on BCM 23, clock on BCM 24.
pub const DEFAULT_DATA_PIN: u32 = 23;
pub const DEFAULT_CLOCK_PIN: u32 = 24;

/// Longest strip a configuration may describe.
pub const MAX_LED_COUNT: usize = u16::MAX as usize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub strip: StripConfig,
    pub lines: LinesConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StripConfig {
    pub led_count: usize,
    /// Brightness applied when a command does not give one
    pub brightness: f32,
}

impl Default for StripConfig {
    fn default() -> Self {
        StripConfig {
            led_count: DEFAULT_LED_COUNT,
            brightness: DEFAULT_BRIGHTNESS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "backend", rename_all = "kebab-case")]
pub enum LinesConfig {
    Sysfs {
        #[serde(default = "default_data_pin")]
        data_pin: u32,
        #[serde(default = "default_clock_pin")]
        clock_pin: u32,
        #[serde(default = "default_gpio_root")]
        gpio_root: PathBuf,
    },
    /// Record line writes in memory, never touching hardware
    DryRun,
}

impl Default for LinesConfig {
    fn default() -> Self {
        LinesConfig::Sysfs {
            data_pin: DEFAULT_DATA_PIN,
            clock_pin: DEFAULT_CLOCK_PIN,
            gpio_root: default_gpio_root(),
        }
    }
}

fn default_data_pin() -> u32 {
    DEFAULT_DATA_PIN
}

fn default_clock_pin() -> u32 {
    DEFAULT_CLOCK_PIN
}

fn default_gpio_root() -> PathBuf {
    PathBuf::from(DEFAULT_GPIO_ROOT)
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config_data = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadingFile {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&config_data)
    }

    pub fn from_json(data: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(data).map_err(ConfigError::Parsing)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.strip.led_count > MAX_LED_COUNT {
            return Err(ConfigError::LedCount(self.strip.led_count));
        }

        let brightness = self.strip.brightness;
        if !(0.0..=1.0).contains(&brightness) {
            return Err(ConfigError::Brightness(brightness));
        }

        if let LinesConfig::Sysfs { data_pin, clock_pin, .. } = &self.lines {
            if data_pin == clock_pin {
                return Err(ConfigError::SharedPin(*data_pin));
            }
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file from path '{}'", .path.display())]
    ReadingFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration")]
    Parsing(#[source] serde_json::Error),

    #[error("LED count {0} exceeds the maximum of {max}", max = MAX_LED_COUNT)]
    LedCount(usize),

    #[error("Brightness {0} is outside 0.0..=1.0")]
    Brightness(f32),

    #[error("Data and clock cannot share GPIO {0}")]
    SharedPin(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_blinkt_board() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.strip.led_count, 8);
        assert_eq!(
            config.lines,
            LinesConfig::Sysfs {
                data_pin: 23,
                clock_pin: 24,
                gpio_root: PathBuf::from("/sys/class/gpio"),
            }
        );
    }

    #[test]
    fn test_parse_full_config() {
        let config = Config::from_json(
            r#"{
                "strip": { "led_count": 144, "brightness": 0.5 },
                "lines": { "backend": "sysfs", "data_pin": 10, "clock_pin": 11, "gpio_root": "/tmp/gpio" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.strip, StripConfig { led_count: 144, brightness: 0.5 });
        assert_eq!(
            config.lines,
            LinesConfig::Sysfs { data_pin: 10, clock_pin: 11, gpio_root: PathBuf::from("/tmp/gpio") }
        );
    }

    #[test]
    fn test_dry_run_backend() {
        let config = Config::from_json(r#"{ "lines": { "backend": "dry-run" } }"#).unwrap();
        assert_eq!(config.lines, LinesConfig::DryRun);
        assert_eq!(config.strip, StripConfig::default());
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Config::from_json(r#"{ "strip": { "led_count": 1000000000000 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::LedCount(_)));

        let config = Config::from_json(r#"{ "strip": { "led_count": 65535 } }"#).unwrap();
        assert_eq!(config.strip.led_count, MAX_LED_COUNT);

        let err = Config::from_json(r#"{ "strip": { "brightness": 1.5 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Brightness(_)));

        let err = Config::from_json(r#"{ "lines": { "backend": "sysfs", "data_pin": 4, "clock_pin": 4 } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::SharedPin(4)));

        let err = Config::from_json(r#"{ "lines": { "backend": "spi" } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parsing(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load(Path::new("/nonexistent/blinkt.json")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadingFile { .. }));
    }
}
