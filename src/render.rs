//! Two-line readout rendering.
//!
//! Pure formatting: fills the panel-sized frame with the background colour and
//! draws the temperature and humidity lines at fixed pixel offsets. Nothing
//! here touches hardware; finished frames go to a [`crate::display`] backend.

use embedded_graphics::{
    mono_font::{iso_8859_1::FONT_10X20, MonoTextStyle},
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};
use embedded_graphics_framebuf::FrameBuf;

use crate::config::Units;

/// ST7735 panel geometry on the sensor board.
pub const WIDTH: usize = 160;
pub const HEIGHT: usize = 80;

const BACKGROUND: Rgb565 = Rgb565::BLACK;
const FOREGROUND: Rgb565 = Rgb565::WHITE;
/// Vertical offset of the humidity line, one 20px row plus spacing.
const LINE2_Y: i32 = 25;

/// One panel-sized RGB565 frame, row-major.
pub struct Frame {
    pixels: [Rgb565; WIDTH * HEIGHT],
}

impl Frame {
    pub fn blank() -> Self {
        Self {
            pixels: [BACKGROUND; WIDTH * HEIGHT],
        }
    }

    /// Pixels in the order the panel expects them (row-major, top-left first).
    pub fn pixels(&self) -> impl Iterator<Item = Rgb565> + '_ {
        self.pixels.iter().copied()
    }
}

/// Render the compensated temperature and humidity as two lines of text.
pub fn render(temp: f64, humidity: f64, units: Units) -> Frame {
    let mut frame = Frame::blank();
    let mut fbuf = FrameBuf::new(&mut frame.pixels, WIDTH, HEIGHT);
    let style = MonoTextStyle::new(&FONT_10X20, FOREGROUND);

    let unit = match units {
        Units::Celsius => "C",
        Units::Fahrenheit => "F",
    };
    let line1 = format!("Temp: {temp:.1}°{unit}");
    let line2 = format!("Humidity: {humidity:.0}% ");

    // Drawing into the in-memory framebuf cannot fail.
    Rectangle::new(Point::zero(), Size::new(WIDTH as u32, HEIGHT as u32))
        .into_styled(PrimitiveStyle::with_fill(BACKGROUND))
        .draw(&mut fbuf)
        .unwrap();
    Text::with_baseline(&line1, Point::zero(), style, Baseline::Top)
        .draw(&mut fbuf)
        .unwrap();
    Text::with_baseline(&line2, Point::new(0, LINE2_Y), style, Baseline::Top)
        .draw(&mut fbuf)
        .unwrap();

    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_has_panel_dimensions() {
        assert_eq!(Frame::blank().pixels().count(), WIDTH * HEIGHT);
    }

    #[test]
    fn background_is_filled() {
        let frame = render(79.4, 52.0, Units::Fahrenheit);
        // The bottom-right corner is well clear of both text lines.
        assert_eq!(frame.pixels().last(), Some(BACKGROUND));
    }

    #[test]
    fn text_lights_foreground_pixels() {
        let frame = render(79.4, 52.0, Units::Fahrenheit);
        let lit = frame.pixels().filter(|p| *p == FOREGROUND).count();
        assert!(lit > 0);
    }

    #[test]
    fn unit_label_follows_config() {
        let f = render(79.4, 52.0, Units::Fahrenheit);
        let c = render(79.4, 52.0, Units::Celsius);
        assert!(f.pixels().zip(c.pixels()).any(|(a, b)| a != b));
    }

    #[test]
    fn rendering_is_reproducible() {
        let a = render(26.3, 48.0, Units::Celsius);
        let b = render(26.3, 48.0, Units::Celsius);
        assert!(a.pixels().eq(b.pixels()));
    }
}
