//! The poll loop: one tick reads everything, updates state, and paints.

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::compensate::{self, CpuTempWindow};
use crate::config::{Config, Units};
use crate::cputemp::CpuTempSource;
use crate::display::{DisplayDevice, BACKLIGHT_ON};
use crate::render::{self, Frame};
use crate::screen::ScreenToggle;
use crate::sensors::{EnvironmentSensor, ProximitySensor};

/// All loop state in one place: service handles, the CPU temperature window
/// and the screen toggle. Created at startup, ticked on a fixed cadence, torn
/// down at shutdown.
pub struct Poller {
    env: Box<dyn EnvironmentSensor>,
    prox: Box<dyn ProximitySensor>,
    cpu: Box<dyn CpuTempSource>,
    display: Box<dyn DisplayDevice>,
    window: CpuTempWindow,
    toggle: ScreenToggle,
    factor: f64,
    units: Units,
}

impl Poller {
    /// Seeds the CPU temperature window with one read and switches the
    /// backlight on for the initial screen-on state. A failing CPU source is
    /// fatal here; compensation quality depends on it.
    pub fn new(
        env: Box<dyn EnvironmentSensor>,
        prox: Box<dyn ProximitySensor>,
        mut cpu: Box<dyn CpuTempSource>,
        mut display: Box<dyn DisplayDevice>,
        config: &Config,
    ) -> Result<Self> {
        let first = cpu
            .read_cpu_temp()
            .context("initial CPU temperature read failed")?;
        display.set_backlight(BACKLIGHT_ON)?;
        Ok(Self {
            env,
            prox,
            cpu,
            display,
            window: CpuTempWindow::seeded(first),
            toggle: ScreenToggle::new(config.proximity.threshold, config.debounce()),
            factor: config.compensation.factor,
            units: config.units,
        })
    }

    /// One poll cycle: proximity -> toggle -> compensated temperature ->
    /// humidity/pressure -> paint (screen on) or skip (screen off) -> log.
    pub fn tick(&mut self, now: Instant) -> Result<()> {
        let proximity = self.prox.read_proximity().context("proximity read failed")?;
        if self.toggle.update(proximity, now) {
            let screen_on = self.toggle.is_on();
            info!(proximity, screen_on, "proximity tap toggled screen");
            let level = if screen_on { BACKLIGHT_ON } else { 0 };
            self.display.set_backlight(level)?;
        }

        let cpu_temp = self.cpu.read_cpu_temp().context("CPU temperature read failed")?;
        self.window.push(cpu_temp);
        let raw = self
            .env
            .read_temperature()
            .context("temperature read failed")?;
        let adjusted_c = compensate::compensate(raw, self.window.average(), self.factor);
        let temp = match self.units {
            Units::Celsius => adjusted_c,
            Units::Fahrenheit => compensate::celsius_to_fahrenheit(adjusted_c),
        };
        let humidity = self.env.read_humidity().context("humidity read failed")?;
        let pressure = self.env.read_pressure().context("pressure read failed")?;

        if self.toggle.is_on() {
            let frame = render::render(temp, humidity, self.units);
            self.display
                .present(&frame)
                .context("display present failed")?;
        } else {
            debug!("screen off, skipping render");
        }

        info!(
            "temp: {temp:.1}, humidity: {humidity:.1}, pressure: {pressure:.1} hPa, cpu: {cpu_temp:.1}, proximity: {proximity}"
        );
        Ok(())
    }

    /// Blank the panel and drop the backlight on the way out.
    pub fn shutdown(&mut self) -> Result<()> {
        self.display.present(&Frame::blank())?;
        self.display.set_backlight(0)?;
        Ok(())
    }
}
