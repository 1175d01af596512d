//! Panel geometry and text rendering.

use embedded_graphics::{
    mono_font::{ascii::FONT_7X13, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};
use megamega::PanelText;

// ── PanelConfig ──────────────────────────────────────────────────────────

/// Geometry and refresh rate of the text panel.
///
/// All layout lives here; there are no module-level layout constants.
/// The defaults centre two 13 px lines on a 128×64 display with room
/// for 16 characters of the 7 px font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelConfig {
    /// Maximum refresh rate in Hz. Default: 30.
    pub update_frequency_hz: u32,

    // ── Layout geometry ──────────────────────────────────────────────
    /// Total display width in pixels. Default: 128.
    pub display_width: u32,
    /// Total display height in pixels. Default: 64.
    pub display_height: u32,
    /// Left margin in pixels. Default: 8.
    pub margin_x: i32,
    /// Top of the first line, in pixels. Default: 16.
    pub line1_y: i32,
    /// Top of the second line, in pixels. Default: 36.
    pub line2_y: i32,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            update_frequency_hz: 30,
            display_width: 128,
            display_height: 64,
            margin_x: 8,
            line1_y: 16,
            line2_y: 36,
        }
    }
}

impl PanelConfig {
    /// Minimum time between two flushes, in milliseconds.
    ///
    /// Formula: `1000 / update_frequency_hz`.
    pub fn update_period_ms(&self) -> u64 {
        1000 / u64::from(self.update_frequency_hz.max(1))
    }
}

// ── Rendering ────────────────────────────────────────────────────────────

/// Draw both lines of `text` into `display`.
///
/// ```text
/// ┌────────────────────────────┐
/// │                            │
/// │  op 2 sust level:          │  ← line1_y
/// │  11                        │  ← line2_y
/// │                            │
/// └────────────────────────────┘
///  ↑ margin_x
/// ```
///
/// The caller clears the frame buffer first.
pub fn render_lines<D>(display: &mut D, text: &PanelText, config: &PanelConfig) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let character_style = MonoTextStyle::new(&FONT_7X13, BinaryColor::On);
    let text_style = TextStyleBuilder::new()
        .alignment(Alignment::Left)
        .baseline(Baseline::Top)
        .build();

    for (line, y) in [(text.line1(), config.line1_y), (text.line2(), config.line2_y)] {
        if line.is_empty() {
            continue;
        }
        Text::with_text_style(line, Point::new(config.margin_x, y), character_style, text_style)
            .draw(display)?;
    }

    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    /// Records every lit pixel.
    struct Frame {
        lit: Vec<Point>,
    }

    impl Frame {
        fn new() -> Self {
            Self { lit: Vec::new() }
        }
    }

    impl OriginDimensions for Frame {
        fn size(&self) -> Size {
            Size::new(128, 64)
        }
    }

    impl DrawTarget for Frame {
        type Color = BinaryColor;
        type Error = Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(point, color) in pixels {
                if color.is_on() {
                    self.lit.push(point);
                }
            }
            Ok(())
        }
    }

    fn render(text: &PanelText) -> Frame {
        let mut frame = Frame::new();
        render_lines(&mut frame, text, &PanelConfig::default()).unwrap();
        frame
    }

    #[test]
    fn empty_text_draws_nothing() {
        assert!(render(&PanelText::default()).lit.is_empty());
    }

    #[test]
    fn lines_land_in_their_rows() {
        let c = PanelConfig::default();
        let top = render(&PanelText::new("algorithm 8:", ""));
        assert!(!top.lit.is_empty());
        assert!(top.lit.iter().all(|p| p.y >= c.line1_y && p.y < c.line2_y));

        let bottom = render(&PanelText::new("", "1~, 2~, 3~, 4~"));
        assert!(!bottom.lit.is_empty());
        assert!(bottom.lit.iter().all(|p| p.y >= c.line2_y && p.y < c.display_height as i32));
    }

    #[test]
    fn full_width_line_fits_horizontally() {
        let c = PanelConfig::default();
        let frame = render(&PanelText::new("WWWWWWWWWWWWWWWW", "MMMMMMMMMMMMMMMM"));
        assert!(frame
            .lit
            .iter()
            .all(|p| p.x >= c.margin_x && p.x < c.display_width as i32));
    }

    #[test]
    fn default_config_values() {
        let c = PanelConfig::default();
        assert_eq!(c.update_frequency_hz, 30);
        assert_eq!(c.display_width, 128);
        assert_eq!(c.display_height, 64);
        assert_eq!(c.margin_x, 8);
        assert_eq!(c.line1_y, 16);
        assert_eq!(c.line2_y, 36);
    }

    #[test]
    fn update_period_30hz() {
        assert_eq!(PanelConfig::default().update_period_ms(), 33);
    }

    #[test]
    fn update_period_60hz() {
        let c = PanelConfig {
            update_frequency_hz: 60,
            ..PanelConfig::default()
        };
        assert_eq!(c.update_period_ms(), 16);
    }

    #[test]
    fn zero_frequency_does_not_divide_by_zero() {
        let c = PanelConfig {
            update_frequency_hz: 0,
            ..PanelConfig::default()
        };
        assert_eq!(c.update_period_ms(), 1000);
    }
}
