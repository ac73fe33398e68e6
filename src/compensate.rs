//! CPU self-heating compensation for the ambient temperature reading.
//!
//! The environmental sensor sits close enough to the SoC that its temperature
//! reading runs hot. We keep a short window of CPU die temperatures and pull
//! the ambient reading back in proportion to how much hotter the die is.

use std::collections::VecDeque;

/// Number of CPU temperature samples averaged for compensation.
pub const WINDOW_SIZE: usize = 5;

/// Fixed-capacity FIFO of the most recent CPU die temperatures (°C).
#[derive(Debug, Clone)]
pub struct CpuTempWindow {
    samples: VecDeque<f64>,
}

impl CpuTempWindow {
    /// Seed the window by replicating the first sample so the average is
    /// well-defined from the first poll.
    pub fn seeded(initial: f64) -> Self {
        Self {
            samples: std::iter::repeat(initial).take(WINDOW_SIZE).collect(),
        }
    }

    /// Append a new sample, evicting the oldest.
    pub fn push(&mut self, sample: f64) {
        self.samples.pop_front();
        self.samples.push_back(sample);
    }

    /// Mean of the window contents. Smooths out jitter in the die readings.
    pub fn average(&self) -> f64 {
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }

    #[cfg(test)]
    fn contents(&self) -> Vec<f64> {
        self.samples.iter().copied().collect()
    }
}

/// Correct a raw ambient reading (°C) for self-heating bias.
///
/// `factor` tunes how strongly the correction is applied: decrease it to
/// adjust the result down, increase it to adjust up.
pub fn compensate(raw_ambient_c: f64, avg_cpu_c: f64, factor: f64) -> f64 {
    raw_ambient_c - ((avg_cpu_c - raw_ambient_c) / factor)
}

pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 1.8 + 32.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_window_replicates_first_sample() {
        let window = CpuTempWindow::seeded(20.0);
        assert_eq!(window.contents(), vec![20.0; WINDOW_SIZE]);
        assert_eq!(window.average(), 20.0);
    }

    #[test]
    fn window_holds_last_n_samples_in_arrival_order() {
        let mut window = CpuTempWindow::seeded(0.0);
        for i in 1..=8 {
            window.push(i as f64);
        }
        assert_eq!(window.contents(), vec![4.0, 5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn worked_example_from_tuning_notes() {
        // Seed 20.0 five times, one new die sample of 30.0 -> mean 22.0.
        let mut window = CpuTempWindow::seeded(20.0);
        window.push(30.0);
        assert!((window.average() - 22.0).abs() < 1e-9);

        let adjusted = compensate(25.0, window.average(), 2.25);
        assert!((adjusted - (25.0 + 3.0 / 2.25)).abs() < 1e-9);
        assert!((celsius_to_fahrenheit(adjusted) - 79.4).abs() < 0.05);
    }

    #[test]
    fn compensation_is_deterministic() {
        assert_eq!(compensate(25.0, 22.0, 2.25), compensate(25.0, 22.0, 2.25));
    }

    #[test]
    fn hotter_die_pulls_reading_down() {
        assert!(compensate(25.0, 50.0, 2.25) < 25.0);
    }

    #[test]
    fn fahrenheit_fixed_points() {
        assert_eq!(celsius_to_fahrenheit(0.0), 32.0);
        assert_eq!(celsius_to_fahrenheit(100.0), 212.0);
    }
}
