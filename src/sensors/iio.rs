//! Kernel IIO sysfs backend.
//!
//! With the bme280 and ltr559 drivers bound, readings appear as nodes under
//! /sys/bus/iio/devices/iio:deviceN. Units follow the IIO ABI: temperature in
//! milli-°C, humidity in milli-%RH, pressure in kPa, proximity as a raw count.

use std::path::PathBuf;

use anyhow::{Context, Result};

use super::{EnvironmentSensor, ProximitySensor};

pub struct IioSensor {
    dir: PathBuf,
}

impl IioSensor {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn read_value(&self, node: &str) -> Result<f64> {
        let path = self.dir.join(node);
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        raw.trim()
            .parse()
            .with_context(|| format!("unexpected contents in {}: {raw:?}", path.display()))
    }
}

impl EnvironmentSensor for IioSensor {
    fn read_temperature(&mut self) -> Result<f64> {
        Ok(self.read_value("in_temp_input")? / 1000.0)
    }

    fn read_humidity(&mut self) -> Result<f64> {
        Ok(self.read_value("in_humidityrelative_input")? / 1000.0)
    }

    fn read_pressure(&mut self) -> Result<f64> {
        // kPa -> hPa
        Ok(self.read_value("in_pressure_input")? * 10.0)
    }
}

impl ProximitySensor for IioSensor {
    fn read_proximity(&mut self) -> Result<u16> {
        Ok(self.read_value("in_proximity_raw")? as u16)
    }
}
