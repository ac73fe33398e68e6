//! Display services: where finished frames go.
//!
//! The panel driver itself is an opaque collaborator. On the target the
//! kernel's fbtft binding exposes the ST7735 as a plain framebuffer device,
//! so presenting a frame is one write; off-target the console backend keeps
//! the daemon runnable.

use std::path::PathBuf;

use anyhow::{Context, Result};
use embedded_graphics::prelude::*;
use tracing::debug;

use crate::render::{Frame, HEIGHT, WIDTH};

/// Full-on backlight level. The board's backlight is binary.
pub const BACKLIGHT_ON: u8 = 1;

pub trait DisplayDevice {
    /// Push a finished frame to the panel.
    fn present(&mut self, frame: &Frame) -> Result<()>;
    /// 0 disables the backlight, anything else enables it.
    fn set_backlight(&mut self, level: u8) -> Result<()>;
}

/// fbtft framebuffer device (the ST7735 shows up as /dev/fb1 on a Pi) plus an
/// optional sysfs brightness node.
pub struct FramebufferDisplay {
    device: PathBuf,
    backlight: Option<PathBuf>,
}

impl FramebufferDisplay {
    pub fn new(device: impl Into<PathBuf>, backlight: Option<PathBuf>) -> Self {
        Self {
            device: device.into(),
            backlight,
        }
    }
}

impl DisplayDevice for FramebufferDisplay {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        // Little-endian RGB565, row-major: the fbtft wire format.
        let mut bytes = Vec::with_capacity(WIDTH * HEIGHT * 2);
        for pixel in frame.pixels() {
            bytes.extend_from_slice(&pixel.into_storage().to_le_bytes());
        }
        std::fs::write(&self.device, &bytes)
            .with_context(|| format!("failed to write framebuffer {}", self.device.display()))
    }

    fn set_backlight(&mut self, level: u8) -> Result<()> {
        if let Some(path) = &self.backlight {
            let value = if level == 0 { "0" } else { "1" };
            std::fs::write(path, value)
                .with_context(|| format!("failed to write backlight {}", path.display()))?;
        }
        Ok(())
    }
}

/// Off-target backend: frames become log lines.
pub struct ConsoleDisplay;

impl ConsoleDisplay {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayDevice for ConsoleDisplay {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        let background = frame.pixels().last();
        let lit = frame
            .pixels()
            .filter(|p| Some(*p) != background)
            .count();
        debug!(lit_pixels = lit, "frame presented");
        Ok(())
    }

    fn set_backlight(&mut self, level: u8) -> Result<()> {
        debug!(level, "backlight set");
        Ok(())
    }
}
