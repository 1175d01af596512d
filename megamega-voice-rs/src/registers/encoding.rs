//! Bit-level encoding of parameter values into register bytes.
//!
//! Downstream hardware depends on the exact layout, so every mode here
//! mirrors the chip's register format:
//!
//! | Mode                | Construction                                  |
//! |---------------------|-----------------------------------------------|
//! | packed-two-field    | [`Encoding::Packed`] with two [`Field`]s       |
//! | reversed polarity   | [`Polarity::Reversed`] (`max - value`)         |
//! | offset-signed       | [`Polarity::Offset`] (detune: −3..3 → 0..6)    |
//! | single-field-direct | [`Encoding::Direct`]                           |
//! | fixed-bit-or        | [`Encoding::FixedBits`] (pan bits always set)  |

use super::OPERATOR_OFFSETS;
use crate::patch::Operator;

/// How a field's value is mapped before it is shifted into place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Value is used as-is.
    Normal,
    /// Value is stored as `max - value` to match hardware polarity
    /// (e.g. rates where 0 is slowest in the UI but fastest on chip).
    Reversed {
        /// Upper bound of the field's range.
        max: u8,
    },
    /// Signed value shifted into an unsigned range by adding `bias`.
    Offset {
        /// Amount added before packing.
        bias: i8,
    },
}

/// One sub-field of a register byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Field {
    /// Logical parameter value.
    pub value: i16,
    /// Bit position of the field's least significant bit.
    pub shift: u8,
    /// Mapping applied before shifting.
    pub polarity: Polarity,
}

impl Field {
    /// A field stored as-is at `shift`.
    pub const fn normal(value: i16, shift: u8) -> Self {
        Self {
            value,
            shift,
            polarity: Polarity::Normal,
        }
    }

    /// A field stored as `max - value` at `shift`.
    pub const fn reversed(value: i16, shift: u8, max: u8) -> Self {
        Self {
            value,
            shift,
            polarity: Polarity::Reversed { max },
        }
    }

    /// A signed field stored as `value + bias` at `shift`.
    pub const fn offset(value: i16, shift: u8, bias: i8) -> Self {
        Self {
            value,
            shift,
            polarity: Polarity::Offset { bias },
        }
    }

    /// The field's bits, positioned within the register byte.
    pub fn bits(&self) -> u8 {
        let raw = match self.polarity {
            Polarity::Normal => self.value,
            Polarity::Reversed { max } => i16::from(max) - self.value,
            Polarity::Offset { bias } => self.value + i16::from(bias),
        };
        (raw as u8).wrapping_shl(u32::from(self.shift))
    }
}

/// How a register byte is assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Encoding {
    /// A single field occupying the register on its own.
    Single(Field),
    /// Two fields sharing one register.
    Packed(Field, Field),
    /// Byte written verbatim.
    Direct(u8),
    /// Two fields combined with a constant mask.
    FixedBits {
        /// Bits that are always set.
        mask: u8,
        /// First packed field.
        first: Field,
        /// Second packed field.
        second: Field,
    },
}

impl Encoding {
    /// Compute the register byte.
    ///
    /// ```
    /// use megamega::registers::{Encoding, Field};
    ///
    /// // Sustain level 3 and release 5, both reversed against 15.
    /// let byte = Encoding::Packed(Field::reversed(3, 4, 15), Field::reversed(5, 0, 15)).byte();
    /// assert_eq!(byte, (12 << 4) | 10);
    /// ```
    pub fn byte(&self) -> u8 {
        match self {
            Encoding::Single(field) => field.bits(),
            Encoding::Packed(first, second) => first.bits() | second.bits(),
            Encoding::Direct(value) => *value,
            Encoding::FixedBits {
                mask,
                first,
                second,
            } => mask | first.bits() | second.bits(),
        }
    }
}

/// Where a register family lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Target {
    /// Per-channel register written identically to all six channels.
    Broadcast {
        /// Base address.
        base: u8,
    },
    /// Per-operator register written to all six channels at the
    /// operator-adjusted address.
    Operator {
        /// Base address.
        base: u8,
        /// Operator whose offset is added.
        operator: Operator,
    },
    /// A single chip-wide register.
    Global {
        /// Register address.
        register: u8,
    },
}

impl Target {
    /// Address of the first channel in each group.
    pub fn address(&self) -> u8 {
        match *self {
            Target::Broadcast { base } => base,
            Target::Operator { base, operator } => base + OPERATOR_OFFSETS[operator.index()],
            Target::Global { register } => register,
        }
    }

    /// Number of writes one emission produces.
    #[cfg(test)]
    fn write_count(&self) -> usize {
        match self {
            Target::Global { .. } => 1,
            _ => 2 * super::CHANNELS_PER_GROUP,
        }
    }
}
