//! Patch parameter model.
//!
//! This module provides the [`PatchStore`] holding every synthesizer
//! parameter, the [`FieldId`] tagged identifier that names one field
//! (and, for per-operator fields, which operator), and the static preset
//! library.
//!
//! # Layout
//!
//! ```text
//! Global:       preset  vel sens  min vel  polyphony
//!               algorithm  feedback  LFO freq  vibrato  tremolo  (sustain)
//! Per operator: [op 1] [op 2] [op 3] [op 4]
//!               multiple  detune  level  attack  decay  sust level
//!               sust rate  release  rate scale  SSGEG  AM
//! ```
//!
//! # Wrap-around
//!
//! Every bounded field wraps instead of clamping: stepping past the top
//! of the range lands on the bottom and vice versa. See [`wrap()`].

mod field;
mod presets;
mod store;

pub use field::{wrap, FieldId, PlayMode};
pub use presets::{Preset, PRESETS, PRESET_COUNT};
pub use store::{OperatorParams, PatchStore};

use crate::error::ParameterError;

/// Number of FM operators per channel.
pub const OPERATOR_COUNT: usize = 4;

/// Index of one of the four operators (0–3).
///
/// The inner value is always in range; construct with [`Operator::new()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Operator(u8);

impl Operator {
    /// All operators in index order.
    pub const ALL: [Operator; OPERATOR_COUNT] =
        [Operator(0), Operator(1), Operator(2), Operator(3)];

    /// Build an operator index, rejecting values above 3.
    ///
    /// ```
    /// use megamega::Operator;
    ///
    /// assert_eq!(Operator::new(2).unwrap().number(), 3);
    /// assert!(Operator::new(4).is_err());
    /// ```
    pub fn new(index: u8) -> Result<Self, ParameterError> {
        if usize::from(index) < OPERATOR_COUNT {
            Ok(Self(index))
        } else {
            Err(ParameterError::InvalidOperator)
        }
    }

    /// Zero-based index, for array access.
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    /// One-based number, as shown on the display.
    pub fn number(self) -> u8 {
        self.0 + 1
    }

    /// The operator `delta` steps away, wrapping within 0–3.
    pub fn step(self, delta: i8) -> Self {
        let next = wrap(i16::from(self.0) + i16::from(delta), 0, OPERATOR_COUNT as i16 - 1);
        Self(next as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_bounds() {
        for i in 0..4 {
            assert_eq!(Operator::new(i).unwrap().index(), usize::from(i));
        }
        assert_eq!(Operator::new(4), Err(ParameterError::InvalidOperator));
        assert_eq!(Operator::new(255), Err(ParameterError::InvalidOperator));
    }

    #[test]
    fn operator_step_wraps() {
        let first = Operator::ALL[0];
        let last = Operator::ALL[3];
        assert_eq!(first.step(-1), last);
        assert_eq!(last.step(1), first);
        assert_eq!(first.step(1), Operator::ALL[1]);
    }

    #[test]
    fn operator_number_is_one_based() {
        assert_eq!(Operator::ALL[0].number(), 1);
        assert_eq!(Operator::ALL[3].number(), 4);
    }
}
