//! Error types for the bounded index newtypes.
//!
//! Runtime handling never fails (values wrap, events are dropped); these
//! errors only surface from the checked constructors such as
//! [`Operator::new()`](crate::patch::Operator::new).

use core::fmt;

/// Errors that can occur when building a bounded index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParameterError {
    /// Operator index is out of bounds (must be < 4).
    InvalidOperator,
    /// Parameter group index is out of bounds (must be < 4).
    InvalidGroup,
    /// Preset index is out of bounds (must be < `PRESET_COUNT`).
    InvalidPreset,
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParameterError::InvalidOperator => write!(f, "Invalid operator index (must be 0-3)"),
            ParameterError::InvalidGroup => write!(f, "Invalid group index (must be 0-3)"),
            ParameterError::InvalidPreset => write!(f, "Invalid preset index"),
        }
    }
}
