use super::input::Gesture;
use crate::error::ParameterError;
use crate::patch::{wrap, FieldId, Operator, PatchStore};
use crate::registers::RegisterSink;

/// Number of parameter groups.
pub const GROUP_COUNT: usize = 4;

/// Parameters per group, indexed by group.
pub const GROUP_SIZES: [usize; GROUP_COUNT] = [4, 5, 7, 4];

/// Index of a parameter group (0–3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Group(u8);

impl Group {
    /// Build a group index, rejecting values above 3.
    pub fn new(index: u8) -> Result<Self, ParameterError> {
        if usize::from(index) < GROUP_COUNT {
            Ok(Self(index))
        } else {
            Err(ParameterError::InvalidGroup)
        }
    }

    /// Zero-based index.
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    /// Number of parameters in this group.
    pub fn param_count(self) -> usize {
        GROUP_SIZES[self.index()]
    }

    /// The group `delta` steps away, wrapping within 0–3.
    pub fn step(self, delta: i8) -> Self {
        let next = wrap(i16::from(self.0) + i16::from(delta), 0, GROUP_COUNT as i16 - 1);
        Self(next as u8)
    }

    /// Field at position `param` of this group, for operator `op`.
    pub fn field(self, param: usize, op: Operator) -> Option<FieldId> {
        let field = match (self.0, param) {
            (0, 0) => FieldId::Preset,
            (0, 1) => FieldId::VelocitySensitivity,
            (0, 2) => FieldId::MinVelocity,
            (0, 3) => FieldId::Polyphony,
            (1, 0) => FieldId::Algorithm,
            (1, 1) => FieldId::Feedback,
            (1, 2) => FieldId::Multiple(op),
            (1, 3) => FieldId::Detune(op),
            (1, 4) => FieldId::TotalLevel(op),
            (2, 0) => FieldId::Attack(op),
            (2, 1) => FieldId::Decay(op),
            (2, 2) => FieldId::SustainLevel(op),
            (2, 3) => FieldId::SustainRate(op),
            (2, 4) => FieldId::Release(op),
            (2, 5) => FieldId::RateScale(op),
            (2, 6) => FieldId::Ssgeg(op),
            (3, 0) => FieldId::LfoFrequency,
            (3, 1) => FieldId::Vibrato,
            (3, 2) => FieldId::Tremolo,
            (3, 3) => FieldId::AmEnable(op),
            _ => return None,
        };
        Some(field)
    }
}

/// Current group, parameter and operator selection.
///
/// `param` is always below the current group's parameter count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cursor {
    group: Group,
    param: u8,
    operator: Operator,
}

impl Cursor {
    /// Selected group.
    pub fn group(&self) -> Group {
        self.group
    }

    /// Selected parameter within the group.
    pub fn param(&self) -> usize {
        usize::from(self.param)
    }

    /// Selected operator.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// The field the cursor points at.
    pub fn field(&self) -> FieldId {
        self.group
            .field(self.param(), self.operator)
            .unwrap_or(FieldId::Preset)
    }
}

/// Applies gestures to the cursor and the patch store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Navigator {
    cursor: Cursor,
}

impl Navigator {
    /// Navigator at group 0, parameter 0, operator 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current selection.
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// Return to group 0, parameter 0. The operator is kept.
    pub fn reset(&mut self) {
        self.cursor.group = Group::default();
        self.cursor.param = 0;
    }

    /// Apply one gesture and return the field to show.
    ///
    /// Group changes reset the parameter index to 0. Parameter steps
    /// wrap within the group. Value steps edit the selected field by
    /// one with wrap-around and write its registers.
    ///
    /// ```
    /// use megamega::panel::{Gesture, Navigator};
    /// use megamega::{ChannelGroup, FieldId, PatchStore, RegisterSink};
    ///
    /// struct Nop;
    /// impl RegisterSink for Nop {
    ///     fn write(&mut self, _: ChannelGroup, _: u8, _: u8) {}
    /// }
    ///
    /// let mut nav = Navigator::new();
    /// let mut store = PatchStore::default();
    /// assert_eq!(nav.apply(Gesture::GroupForward, &mut store, &mut Nop), FieldId::Algorithm);
    /// assert_eq!(nav.apply(Gesture::ParameterStep(1), &mut store, &mut Nop), FieldId::Feedback);
    /// nav.apply(Gesture::ValueStep(-1), &mut store, &mut Nop);
    /// assert_eq!(store.get(FieldId::Feedback), 7);
    /// ```
    pub fn apply<S>(&mut self, gesture: Gesture, store: &mut PatchStore, sink: &mut S) -> FieldId
    where
        S: RegisterSink + ?Sized,
    {
        let cursor = &mut self.cursor;
        match gesture {
            Gesture::GroupBack => {
                cursor.group = cursor.group.step(-1);
                cursor.param = 0;
            }
            Gesture::GroupForward => {
                cursor.group = cursor.group.step(1);
                cursor.param = 0;
            }
            Gesture::ParameterStep(delta) => {
                let last = cursor.group.param_count() as i16 - 1;
                cursor.param = wrap(i16::from(cursor.param) + i16::from(delta), 0, last) as u8;
            }
            Gesture::OperatorStep(delta) => {
                cursor.operator = cursor.operator.step(delta);
            }
            Gesture::ValueStep(delta) => {
                store.step(cursor.field(), delta.into(), sink);
            }
        }

        #[cfg(feature = "defmt")]
        defmt::trace!("panel {} -> {}", gesture, cursor.field());

        cursor.field()
    }
}
