//! Debounced proximity-tap screen toggle.

use std::time::{Duration, Instant};

/// Screen on/off state, flipped by a hand passing over the proximity sensor.
///
/// A single guarded transition in each direction: a reading above the
/// threshold flips the state unless a flip already happened within the
/// debounce interval. Starts on.
#[derive(Debug)]
pub struct ScreenToggle {
    on: bool,
    last_toggle: Option<Instant>,
    threshold: u16,
    debounce: Duration,
}

impl ScreenToggle {
    pub fn new(threshold: u16, debounce: Duration) -> Self {
        Self {
            on: true,
            last_toggle: None,
            threshold,
            debounce,
        }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Feed one proximity reading. Returns true when the state flipped.
    pub fn update(&mut self, reading: u16, now: Instant) -> bool {
        if reading <= self.threshold {
            return false;
        }
        if let Some(last) = self.last_toggle {
            if now.duration_since(last) <= self.debounce {
                return false;
            }
        }
        self.on = !self.on;
        self.last_toggle = Some(now);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toggle() -> ScreenToggle {
        ScreenToggle::new(1500, Duration::from_millis(500))
    }

    #[test]
    fn starts_on() {
        assert!(toggle().is_on());
    }

    #[test]
    fn below_threshold_never_toggles() {
        let mut t = toggle();
        let now = Instant::now();
        assert!(!t.update(1500, now));
        assert!(!t.update(0, now + Duration::from_secs(5)));
        assert!(t.is_on());
    }

    #[test]
    fn first_tap_is_not_debounced() {
        let mut t = toggle();
        assert!(t.update(2000, Instant::now()));
        assert!(!t.is_on());
    }

    #[test]
    fn rapid_taps_produce_one_toggle() {
        let mut t = toggle();
        let t0 = Instant::now();
        assert!(t.update(2000, t0));
        assert!(!t.update(2000, t0 + Duration::from_millis(300)));
        assert!(!t.is_on());
    }

    #[test]
    fn spaced_taps_alternate_state() {
        let mut t = toggle();
        let t0 = Instant::now();
        assert!(t.update(2000, t0));
        assert!(!t.is_on());
        assert!(!t.update(2000, t0 + Duration::from_millis(300)));
        assert!(t.update(2000, t0 + Duration::from_millis(900)));
        assert!(t.is_on());
    }

    #[test]
    fn exactly_the_debounce_interval_is_still_suppressed() {
        let mut t = toggle();
        let t0 = Instant::now();
        assert!(t.update(2000, t0));
        assert!(!t.update(2000, t0 + Duration::from_millis(500)));
    }
}
