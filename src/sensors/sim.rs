//! Simulated backend for development off-target.

use anyhow::Result;

use super::{EnvironmentSensor, ProximitySensor};

/// Deterministic, slowly varying readings in plausible indoor ranges.
pub struct SimulatedEnvironment {
    tick: u64,
}

impl SimulatedEnvironment {
    pub fn new() -> Self {
        Self { tick: 0 }
    }
}

impl Default for SimulatedEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvironmentSensor for SimulatedEnvironment {
    fn read_temperature(&mut self) -> Result<f64> {
        self.tick += 1;
        // Triangle wave around room temperature, one cycle per 40 polls.
        let phase = (self.tick % 40) as f64;
        Ok(22.0 + (2.0 - (phase - 20.0).abs() / 10.0))
    }

    fn read_humidity(&mut self) -> Result<f64> {
        Ok(45.0 + (self.tick % 20) as f64 / 4.0)
    }

    fn read_pressure(&mut self) -> Result<f64> {
        Ok(1013.25)
    }
}

/// Never reports a tap, so the simulated screen stays on.
pub struct SimulatedProximity;

impl ProximitySensor for SimulatedProximity {
    fn read_proximity(&mut self) -> Result<u16> {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_stays_in_plausible_ranges() {
        let mut env = SimulatedEnvironment::new();
        for _ in 0..100 {
            let temp = env.read_temperature().unwrap();
            let humidity = env.read_humidity().unwrap();
            assert!((20.0..=26.0).contains(&temp));
            assert!((40.0..=55.0).contains(&humidity));
        }
    }

    #[test]
    fn proximity_never_taps() {
        let mut prox = SimulatedProximity;
        assert_eq!(prox.read_proximity().unwrap(), 0);
    }
}
