//! CPU die temperature sources.
//!
//! The compensation algorithm only needs "some °C figure for the die", so
//! retrieval sits behind a narrow trait and the poll loop never knows whether
//! the number came from a subprocess or sysfs.

use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ParseTempError {
    #[error("missing '=' in measure_temp output: {0:?}")]
    MissingEquals(String),
    #[error("missing closing quote in measure_temp output: {0:?}")]
    MissingQuote(String),
    #[error("non-numeric temperature in measure_temp output: {0:?}")]
    NotANumber(String),
}

pub trait CpuTempSource {
    /// Current CPU die temperature in °C.
    fn read_cpu_temp(&mut self) -> Result<f64>;
}

/// Firmware query via `vcgencmd measure_temp` (prints `temp=47.2'C`).
pub struct VcgencmdSource {
    command: String,
}

impl VcgencmdSource {
    pub fn new() -> Self {
        Self {
            command: "vcgencmd".to_string(),
        }
    }
}

impl Default for VcgencmdSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuTempSource for VcgencmdSource {
    fn read_cpu_temp(&mut self) -> Result<f64> {
        let output = Command::new(&self.command)
            .arg("measure_temp")
            .output()
            .with_context(|| format!("failed to run {} measure_temp", self.command))?;

        if !output.status.success() {
            anyhow::bail!(
                "{} measure_temp exited with {}: {}",
                self.command,
                output.status,
                String::from_utf8_lossy(&output.stderr)
            );
        }

        let text = String::from_utf8_lossy(&output.stdout);
        Ok(parse_measure_temp(&text)?)
    }
}

/// Parse the `temp=NN.N'C` line printed by the firmware tool.
pub fn parse_measure_temp(output: &str) -> Result<f64, ParseTempError> {
    let eq = output
        .find('=')
        .ok_or_else(|| ParseTempError::MissingEquals(output.to_string()))?;
    let quote = output
        .rfind('\'')
        .filter(|&q| q > eq)
        .ok_or_else(|| ParseTempError::MissingQuote(output.to_string()))?;
    output[eq + 1..quote]
        .trim()
        .parse()
        .map_err(|_| ParseTempError::NotANumber(output.to_string()))
}

/// Kernel thermal zone fallback for boards without the firmware tool.
/// The node holds millidegrees, e.g. `48234`.
pub struct ThermalZoneSource {
    path: PathBuf,
}

impl ThermalZoneSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CpuTempSource for ThermalZoneSource {
    fn read_cpu_temp(&mut self) -> Result<f64> {
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let millideg: f64 = raw
            .trim()
            .parse()
            .with_context(|| format!("unexpected thermal zone contents {raw:?}"))?;
        Ok(millideg / 1000.0)
    }
}

/// Constant source for the simulated backend.
pub struct FixedSource(pub f64);

impl CpuTempSource for FixedSource {
    fn read_cpu_temp(&mut self) -> Result<f64> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_firmware_output() {
        assert_eq!(parse_measure_temp("temp=47.2'C\n"), Ok(47.2));
        assert_eq!(parse_measure_temp("temp=47.2'C"), Ok(47.2));
        assert_eq!(parse_measure_temp("temp= 47.2 'C"), Ok(47.2));
    }

    #[test]
    fn rejects_missing_equals() {
        assert!(matches!(
            parse_measure_temp("47.2'C"),
            Err(ParseTempError::MissingEquals(_))
        ));
    }

    #[test]
    fn rejects_missing_quote() {
        assert!(matches!(
            parse_measure_temp("temp=47.2"),
            Err(ParseTempError::MissingQuote(_))
        ));
    }

    #[test]
    fn rejects_quote_before_equals() {
        assert!(matches!(
            parse_measure_temp("'=C"),
            Err(ParseTempError::MissingQuote(_))
        ));
    }

    #[test]
    fn rejects_non_numeric_payload() {
        assert!(matches!(
            parse_measure_temp("temp=hot'C"),
            Err(ParseTempError::NotANumber(_))
        ));
        assert!(matches!(
            parse_measure_temp("temp='C"),
            Err(ParseTempError::NotANumber(_))
        ));
    }

    #[test]
    fn thermal_zone_scales_millidegrees() {
        let dir = std::env::temp_dir().join(format!("envirod-thermal-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("temp");
        std::fs::write(&path, "48234\n").unwrap();

        let mut source = ThermalZoneSource::new(&path);
        let temp = source.read_cpu_temp().unwrap();
        assert!((temp - 48.234).abs() < 1e-9);
    }

    #[test]
    fn thermal_zone_missing_node_is_an_error() {
        let mut source = ThermalZoneSource::new("/nonexistent/thermal_zone99/temp");
        assert!(source.read_cpu_temp().is_err());
    }

    #[test]
    fn fixed_source_is_constant() {
        let mut source = FixedSource(45.0);
        assert_eq!(source.read_cpu_temp().unwrap(), 45.0);
        assert_eq!(source.read_cpu_temp().unwrap(), 45.0);
    }
}
