//! Environmental sensor services.
//!
//! The drivers are opaque collaborators; the poll loop only sees these traits.

pub mod iio;
pub mod sim;

use anyhow::Result;

pub trait EnvironmentSensor {
    /// Ambient temperature in °C, before compensation.
    fn read_temperature(&mut self) -> Result<f64>;
    /// Relative humidity in %RH.
    fn read_humidity(&mut self) -> Result<f64>;
    /// Barometric pressure in hPa.
    fn read_pressure(&mut self) -> Result<f64>;
}

pub trait ProximitySensor {
    /// Raw proximity count; larger means closer.
    fn read_proximity(&mut self) -> Result<u16>;
}
