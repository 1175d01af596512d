//! Front panel: encoder and button decoding, parameter navigation and
//! the two-line text view.
//!
//! # Controls
//!
//! ```text
//!  rotate               → edit the selected value (±1 per detent)
//!  hold A + rotate      → select parameter within the group
//!  hold B + rotate      → select operator (1–4)
//!  tap A                → previous group
//!  tap B                → next group
//! ```
//!
//! Groups:
//!
//! ```text
//! 0  preset patch  velocity sens  min velocity  polyphony
//! 1  algorithm     feedback       freq mult*    detune*     level*
//! 2  attack*       decay*         sust level*   sust rate*  release*  rate scale*  SSGEG*
//! 3  LFO frequency vibrato        AM sensitivity AM*
//!                                                   (* per operator)
//! ```

mod format;
mod input;
mod navigation;

pub use format::{describe, ALGORITHM_NAMES, LFO_FREQUENCY_NAMES, ON_OFF, SSG_EG_NAMES};
pub use input::{Gesture, PanelDecoder, PanelSample};
pub use navigation::{Cursor, Group, Navigator, GROUP_COUNT, GROUP_SIZES};

use core::fmt::{self, Write as _};
use heapless::String;

/// Characters per display line.
pub const LINE_WIDTH: usize = 16;

/// One display line.
pub type Line = String<LINE_WIDTH>;

/// Destination for the two text lines.
pub trait DisplaySink {
    /// Replace the displayed text. Each line is at most
    /// [`LINE_WIDTH`] characters.
    fn show(&mut self, line1: &str, line2: &str);
}

impl<D: DisplaySink + ?Sized> DisplaySink for &mut D {
    fn show(&mut self, line1: &str, line2: &str) {
        (**self).show(line1, line2);
    }
}

/// Two lines of display text, truncated to [`LINE_WIDTH`].
///
/// ```
/// use megamega::PanelText;
///
/// let text = PanelText::format(
///     format_args!("op {} {}:", 2, "sust level"),
///     format_args!("{}", "a label that is far too long"),
/// );
/// assert_eq!(text.line1(), "op 2 sust level:");
/// assert_eq!(text.line2(), "a label that is ");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PanelText {
    line1: Line,
    line2: Line,
}

impl PanelText {
    /// Build from two strings.
    pub fn new(line1: &str, line2: &str) -> Self {
        Self::format(format_args!("{}", line1), format_args!("{}", line2))
    }

    /// Build from two sets of format arguments.
    pub fn format(line1: fmt::Arguments<'_>, line2: fmt::Arguments<'_>) -> Self {
        let mut text = Self::default();
        // Truncating never reports an error.
        let _ = Truncating(&mut text.line1).write_fmt(line1);
        let _ = Truncating(&mut text.line2).write_fmt(line2);
        text
    }

    /// First line.
    pub fn line1(&self) -> &str {
        &self.line1
    }

    /// Second line.
    pub fn line2(&self) -> &str {
        &self.line2
    }

    /// Send both lines to `sink`.
    pub fn show_on<D: DisplaySink + ?Sized>(&self, sink: &mut D) {
        sink.show(&self.line1, &self.line2);
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PanelText {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "[{=str}|{=str}]", self.line1.as_str(), self.line2.as_str());
    }
}

/// `fmt::Write` adapter that drops characters past the line width.
struct Truncating<'a>(&'a mut Line);

impl fmt::Write for Truncating<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}
