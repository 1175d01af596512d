use super::Operator;

/// Wrap `value` into `[min, max]`.
///
/// A value below `min` becomes `max` and a value above `max` becomes
/// `min`; anything already in range is returned unchanged. This is a
/// one-step wrap for single-detent edits, not modular arithmetic.
///
/// ```
/// use megamega::patch::wrap;
///
/// assert_eq!(wrap(8, 0, 7), 0);
/// assert_eq!(wrap(-1, 0, 7), 7);
/// assert_eq!(wrap(-4, -3, 3), 3);
/// assert_eq!(wrap(5, 0, 7), 5);
/// ```
pub fn wrap(value: i16, min: i16, max: i16) -> i16 {
    if value < min {
        max
    } else if value > max {
        min
    } else {
        value
    }
}

/// Identifies one editable field of the [`PatchStore`](super::PatchStore).
///
/// Per-operator variants carry the operator they address, so a
/// `FieldId` alone is enough to read, write and encode a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FieldId {
    /// Selected preset index.
    Preset,
    /// Velocity sensitivity (0 = ignore velocity, 10 = velocity only).
    VelocitySensitivity,
    /// Lowest effective note velocity.
    MinVelocity,
    /// Play mode.
    Polyphony,
    /// Operator topology.
    Algorithm,
    /// Operator 1 self-feedback.
    Feedback,
    /// Frequency multiple.
    Multiple(Operator),
    /// Detune.
    Detune(Operator),
    /// Total level (0 = loudest).
    TotalLevel(Operator),
    /// Attack rate.
    Attack(Operator),
    /// First decay rate.
    Decay(Operator),
    /// Sustain level.
    SustainLevel(Operator),
    /// Sustain (second decay) rate.
    SustainRate(Operator),
    /// Release rate.
    Release(Operator),
    /// Key rate scaling.
    RateScale(Operator),
    /// SSG-EG envelope type (0 = off).
    Ssgeg(Operator),
    /// LFO frequency index (0 = off).
    LfoFrequency,
    /// Frequency modulation sensitivity.
    Vibrato,
    /// Amplitude modulation sensitivity.
    Tremolo,
    /// Amplitude modulation enable.
    AmEnable(Operator),
}

impl FieldId {
    /// Inclusive `(min, max)` bounds of the field.
    pub fn bounds(self) -> (i16, i16) {
        match self {
            FieldId::Preset => (0, super::PRESET_COUNT as i16 - 1),
            FieldId::VelocitySensitivity => (0, 10),
            FieldId::MinVelocity => (0, 127),
            FieldId::Polyphony => (0, 2),
            FieldId::Algorithm | FieldId::Feedback => (0, 7),
            FieldId::Multiple(_) => (0, 15),
            FieldId::Detune(_) => (-3, 3),
            FieldId::TotalLevel(_) => (0, 127),
            FieldId::Attack(_) | FieldId::Decay(_) | FieldId::SustainRate(_) => (0, 31),
            FieldId::SustainLevel(_) | FieldId::Release(_) => (0, 15),
            FieldId::RateScale(_) => (0, 3),
            FieldId::Ssgeg(_) | FieldId::LfoFrequency => (0, 8),
            FieldId::Vibrato => (0, 7),
            FieldId::Tremolo => (0, 3),
            FieldId::AmEnable(_) => (0, 1),
        }
    }

    /// Short display label.
    pub fn label(self) -> &'static str {
        match self {
            FieldId::Preset => "preset patch",
            FieldId::VelocitySensitivity => "velocity sens",
            FieldId::MinVelocity => "min velocity",
            FieldId::Polyphony => "polyphony",
            FieldId::Algorithm => "algorithm",
            FieldId::Feedback => "feedback",
            FieldId::Multiple(_) => "freq mult",
            FieldId::Detune(_) => "detune",
            FieldId::TotalLevel(_) => "level",
            FieldId::Attack(_) => "attack",
            FieldId::Decay(_) => "decay",
            FieldId::SustainLevel(_) => "sust level",
            FieldId::SustainRate(_) => "sust rate",
            FieldId::Release(_) => "release",
            FieldId::RateScale(_) => "rate scale",
            FieldId::Ssgeg(_) => "SSGEG",
            FieldId::LfoFrequency => "LFO frequency",
            FieldId::Vibrato => "vibrato",
            FieldId::Tremolo => "AM sensitivity",
            FieldId::AmEnable(_) => "AM",
        }
    }

    /// The operator a per-operator field addresses, or `None` for
    /// global fields.
    pub fn operator(self) -> Option<Operator> {
        match self {
            FieldId::Multiple(op)
            | FieldId::Detune(op)
            | FieldId::TotalLevel(op)
            | FieldId::Attack(op)
            | FieldId::Decay(op)
            | FieldId::SustainLevel(op)
            | FieldId::SustainRate(op)
            | FieldId::Release(op)
            | FieldId::RateScale(op)
            | FieldId::Ssgeg(op)
            | FieldId::AmEnable(op) => Some(op),
            _ => None,
        }
    }

    /// Returns `true` if editing this field writes no register.
    pub fn is_silent(self) -> bool {
        matches!(
            self,
            FieldId::VelocitySensitivity | FieldId::MinVelocity | FieldId::Polyphony
        )
    }
}

/// Play mode stored in the polyphony field.
///
/// Only [`Polyphonic`](PlayMode::Polyphonic) allocation is implemented;
/// the mono modes are stored and displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlayMode {
    /// Up to six simultaneous notes.
    #[default]
    Polyphonic,
    /// One note, retriggered on every key.
    MonoRetrigger,
    /// One note, legato between overlapping keys.
    MonoLegato,
}

impl PlayMode {
    /// Map a field value (already wrapped to 0–2) onto a mode.
    pub fn from_value(value: i16) -> Self {
        match value {
            1 => PlayMode::MonoRetrigger,
            2 => PlayMode::MonoLegato,
            _ => PlayMode::Polyphonic,
        }
    }

    /// Field value of this mode.
    pub fn value(self) -> i16 {
        self as i16
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            PlayMode::Polyphonic => "polyphonic",
            PlayMode::MonoRetrigger => "mono retrig",
            PlayMode::MonoLegato => "mono legato",
        }
    }
}
