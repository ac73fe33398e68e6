//! Daemon configuration, read from ~/.config/envirod/config.toml.
//!
//! Every tuning constant has a default matching the board the daemon was
//! written for, so an absent file just works. A malformed file is a hard
//! error; running with a typo'd threshold helps nobody.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    Celsius,
    Fahrenheit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorBackend {
    /// Kernel IIO sysfs nodes (bme280 + ltr559 drivers bound).
    Iio,
    Simulated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayBackend {
    /// fbtft framebuffer device.
    Framebuffer,
    Console,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CpuSource {
    Vcgencmd,
    ThermalZone,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seconds between poll cycles.
    pub poll_interval_secs: u64,
    /// Readout unit for the temperature line.
    pub units: Units,
    pub compensation: CompensationConfig,
    pub proximity: ProximityConfig,
    pub sensors: SensorConfig,
    pub display: DisplayConfig,
    pub cpu: CpuConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompensationConfig {
    /// Tuning factor: decrease to adjust the reading down, increase to adjust up.
    pub factor: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProximityConfig {
    /// Raw counts above which a reading counts as a tap.
    pub threshold: u16,
    /// Minimum time between screen toggles.
    pub debounce_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    pub backend: SensorBackend,
    /// IIO device directory for the temperature/humidity/pressure sensor.
    pub environment_dir: PathBuf,
    /// IIO device directory for the proximity sensor.
    pub proximity_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub backend: DisplayBackend,
    pub framebuffer: PathBuf,
    /// Optional sysfs brightness node; backlight calls are no-ops without it.
    pub backlight: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuConfig {
    pub source: CpuSource,
    pub thermal_zone_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_interval_secs: 3,
            units: Units::Fahrenheit,
            compensation: CompensationConfig::default(),
            proximity: ProximityConfig::default(),
            sensors: SensorConfig::default(),
            display: DisplayConfig::default(),
            cpu: CpuConfig::default(),
        }
    }
}

impl Default for CompensationConfig {
    fn default() -> Self {
        Self { factor: 2.25 }
    }
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            threshold: 1500,
            debounce_ms: 500,
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            backend: SensorBackend::Iio,
            environment_dir: PathBuf::from("/sys/bus/iio/devices/iio:device0"),
            proximity_dir: PathBuf::from("/sys/bus/iio/devices/iio:device1"),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            backend: DisplayBackend::Framebuffer,
            framebuffer: PathBuf::from("/dev/fb1"),
            backlight: None,
        }
    }
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            source: CpuSource::Vcgencmd,
            thermal_zone_path: PathBuf::from("/sys/class/thermal/thermal_zone0/temp"),
        }
    }
}

impl Config {
    /// Default config file location.
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("envirod").join("config.toml"))
    }

    /// Load from the override path, or the default location, or defaults when
    /// no file exists.
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let path = match override_path {
            Some(p) => p.to_path_buf(),
            None => match Self::path() {
                Some(p) => p,
                None => {
                    tracing::warn!("could not determine config directory, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        if !path.exists() {
            if override_path.is_some() {
                anyhow::bail!("config file {} does not exist", path.display());
            }
            tracing::info!("no config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        tracing::info!("loaded config from {:?}", path);
        Ok(config)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.proximity.debounce_ms)
    }
}
