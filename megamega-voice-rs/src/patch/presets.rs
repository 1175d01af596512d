//! Factory preset library.
//!
//! Each record is a complete assignment of every sound-shaping field.
//! Presets do not touch velocity sensitivity, the velocity floor or the
//! play mode.

use super::OPERATOR_COUNT;
use crate::error::ParameterError;

/// Number of presets in [`PRESETS`].
pub const PRESET_COUNT: usize = 21;

type PerOp<T> = [T; OPERATOR_COUNT];

/// One named full-patch snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Preset {
    /// Display name (fits one 16-character line).
    pub name: &'static str,
    /// Operator topology (0–7).
    pub algorithm: u8,
    /// Operator 1 feedback (0–7).
    pub feedback: u8,
    /// LFO frequency index (0–8).
    pub lfo_frequency: u8,
    /// Vibrato depth (0–7).
    pub vibrato: u8,
    /// Tremolo depth (0–3).
    pub tremolo: u8,
    /// Frequency multiple per operator.
    pub multiple: PerOp<u8>,
    /// Detune per operator.
    pub detune: PerOp<i8>,
    /// Total level per operator.
    pub total_level: PerOp<u8>,
    /// Attack rate per operator.
    pub attack: PerOp<u8>,
    /// First decay rate per operator.
    pub decay: PerOp<u8>,
    /// Sustain level per operator.
    pub sustain_level: PerOp<u8>,
    /// Sustain rate per operator.
    pub sustain_rate: PerOp<u8>,
    /// Release rate per operator.
    pub release: PerOp<u8>,
    /// Rate scaling per operator.
    pub rate_scale: PerOp<u8>,
    /// SSG-EG type per operator.
    pub ssg_eg: PerOp<u8>,
    /// Amplitude modulation enable per operator.
    pub am: PerOp<bool>,
}

impl Preset {
    /// Build a record. `globals` is `[algorithm, feedback, lfo, vibrato, tremolo]`.
    #[allow(clippy::too_many_arguments)]
    const fn new(
        name: &'static str,
        globals: [u8; 5],
        multiple: PerOp<u8>,
        detune: PerOp<i8>,
        total_level: PerOp<u8>,
        attack: PerOp<u8>,
        decay: PerOp<u8>,
        sustain_level: PerOp<u8>,
        sustain_rate: PerOp<u8>,
        release: PerOp<u8>,
        rate_scale: PerOp<u8>,
        ssg_eg: PerOp<u8>,
        am: PerOp<u8>,
    ) -> Self {
        Self {
            name,
            algorithm: globals[0],
            feedback: globals[1],
            lfo_frequency: globals[2],
            vibrato: globals[3],
            tremolo: globals[4],
            multiple,
            detune,
            total_level,
            attack,
            decay,
            sustain_level,
            sustain_rate,
            release,
            rate_scale,
            ssg_eg,
            am: [am[0] != 0, am[1] != 0, am[2] != 0, am[3] != 0],
        }
    }

    /// Look up a preset by index.
    ///
    /// ```
    /// use megamega::patch::Preset;
    ///
    /// assert_eq!(Preset::get(15).unwrap().name, "one operator");
    /// assert!(Preset::get(21).is_err());
    /// ```
    pub fn get(index: usize) -> Result<&'static Preset, ParameterError> {
        PRESETS.get(index).ok_or(ParameterError::InvalidPreset)
    }
}

/// The preset library, in panel order.
#[rustfmt::skip]
pub static PRESETS: [Preset; PRESET_COUNT] = [
    Preset::new("ding dong piano", [7, 0, 0, 0, 0],
        [10, 8, 4, 2], [-3, 1, 3, 0], [63, 117, 117, 127],
        [0, 0, 0, 0], [23, 23, 23, 23], [0, 0, 0, 0], [29, 29, 29, 29],
        [1, 1, 1, 1], [1, 2, 1, 2], [0, 0, 0, 0], [0, 0, 0, 0]),
    Preset::new("toxic sludge", [3, 4, 2, 4, 0],
        [1, 10, 2, 6], [0, 0, 0, 0], [127, 127, 127, 127],
        [0, 2, 12, 7], [4, 0, 23, 31], [14, 5, 0, 13], [29, 16, 0, 29],
        [7, 5, 8, 7], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]),
    Preset::new("wooden steel", [4, 0, 0, 0, 0],
        [10, 8, 4, 2], [-3, 1, 3, 0], [27, 112, 112, 127],
        [0, 0, 9, 0], [16, 16, 16, 21], [0, 0, 0, 0], [29, 29, 29, 29],
        [7, 7, 7, 10], [1, 2, 1, 2], [0, 0, 0, 0], [0, 0, 0, 0]),
    Preset::new("steel drum pad", [5, 3, 3, 0, 3],
        [10, 8, 6, 2], [-3, 1, 3, 0], [100, 117, 117, 127],
        [10, 26, 25, 0], [15, 23, 16, 21], [13, 7, 12, 0], [29, 29, 29, 29],
        [9, 1, 15, 11], [1, 2, 1, 2], [0, 0, 0, 0], [0, 0, 1, 0]),
    Preset::new("(un)naturhythm", [0, 6, 1, 6, 2],
        [10, 8, 1, 2], [-3, 1, 3, 0], [88, 112, 112, 127],
        [14, 17, 14, 8], [18, 19, 19, 22], [0, 0, 0, 15], [29, 29, 29, 29],
        [6, 6, 6, 8], [2, 1, 2, 1], [3, 1, 3, 0], [1, 1, 1, 0]),
    Preset::new("reedy ripper", [2, 5, 0, 0, 0],
        [1, 2, 7, 2], [3, -3, 3, 0], [126, 97, 106, 127],
        [16, 19, 27, 10], [27, 22, 26, 21], [13, 10, 12, 12], [31, 31, 31, 27],
        [8, 8, 8, 8], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]),
    Preset::new("lately who?", [7, 4, 0, 0, 0],
        [4, 2, 1, 2], [-2, 2, 1, -1], [124, 117, 120, 127],
        [0, 0, 0, 0], [16, 23, 31, 12], [0, 0, 0, 0], [29, 29, 0, 18],
        [1, 1, 1, 1], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]),
    Preset::new("tuned bounce", [3, 0, 0, 0, 0],
        [4, 6, 3, 4], [-3, 2, 3, -1], [111, 79, 118, 127],
        [11, 14, 2, 1], [15, 20, 10, 17], [0, 0, 0, 0], [29, 29, 29, 29],
        [9, 1, 10, 9], [2, 2, 1, 2], [0, 0, 0, 0], [0, 0, 0, 0]),
    Preset::new("morph metal", [3, 4, 0, 0, 0],
        [4, 6, 7, 4], [-1, 2, 3, -1], [111, 117, 118, 127],
        [10, 22, 27, 1], [15, 20, 17, 21], [0, 0, 0, 0], [29, 29, 31, 29],
        [9, 1, 10, 9], [2, 2, 1, 2], [0, 0, 0, 0], [0, 0, 0, 0]),
    Preset::new("get(s) nasty", [3, 5, 0, 0, 0],
        [2, 3, 2, 1], [-2, -2, 1, 0], [116, 118, 119, 127],
        [25, 23, 0, 0], [25, 27, 19, 24], [9, 10, 11, 13], [31, 31, 31, 31],
        [4, 4, 4, 4], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]),
    Preset::new("flarp wobble", [5, 5, 2, 5, 2],
        [2, 2, 2, 2], [-1, 1, 3, 0], [108, 117, 124, 127],
        [8, 6, 12, 7], [25, 16, 27, 26], [4, 0, 0, 0], [29, 29, 29, 29],
        [4, 1, 3, 2], [1, 2, 1, 2], [0, 0, 0, 0], [0, 0, 1, 0]),
    Preset::new("pan flute", [4, 6, 3, 2, 3],
        [4, 5, 4, 4], [-3, 3, -2, 0], [117, 114, 117, 127],
        [3, 22, 29, 18], [16, 28, 23, 20], [0, 0, 0, 0], [29, 29, 29, 29],
        [7, 7, 8, 7], [1, 1, 1, 1], [0, 0, 0, 0], [0, 1, 0, 0]),
    Preset::new("deceptive bass", [5, 2, 5, 0, 1],
        [2, 2, 10, 6], [0, 0, 0, 0], [127, 104, 118, 127],
        [27, 16, 0, 0], [25, 19, 19, 21], [5, 0, 12, 0], [31, 31, 31, 31],
        [9, 8, 8, 8], [2, 2, 1, 1], [0, 1, 0, 0], [0, 0, 1, 0]),
    Preset::new("jagged EP", [6, 5, 2, 0, 2],
        [7, 3, 14, 3], [-3, -1, 3, 1], [113, 120, 125, 118],
        [0, 0, 25, 0], [22, 23, 22, 23], [11, 11, 11, 11], [31, 31, 31, 31],
        [10, 8, 8, 8], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 1, 0]),
    Preset::new("all consuming", [5, 5, 3, 0, 2],
        [1, 1, 4, 2], [0, 0, 0, 0], [120, 120, 120, 127],
        [27, 28, 20, 24], [30, 26, 8, 28], [0, 3, 0, 10], [7, 31, 31, 31],
        [9, 7, 7, 7], [1, 1, 1, 1], [0, 0, 1, 0], [0, 1, 0, 0]),
    Preset::new("one operator", [7, 0, 0, 0, 0],
        [2, 2, 2, 2], [0, 0, 0, 0], [0, 0, 0, 127],
        [0, 0, 0, 0], [31, 31, 31, 31], [15, 15, 15, 15], [31, 31, 31, 31],
        [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]),
    Preset::new("squelchy", [1, 0, 0, 0, 0],
        [10, 8, 4, 2], [-3, 1, 3, 0], [27, 112, 112, 127],
        [18, 10, 20, 0], [16, 0, 29, 25], [0, 0, 0, 0], [29, 29, 29, 29],
        [7, 7, 7, 10], [1, 2, 1, 2], [0, 0, 0, 0], [0, 0, 0, 0]),
    Preset::new("ugly bell", [6, 4, 0, 0, 0],
        [10, 1, 1, 1], [0, 0, 0, 0], [120, 120, 120, 127],
        [0, 0, 0, 0], [24, 19, 25, 13], [0, 0, 0, 0], [31, 31, 31, 31],
        [8, 8, 6, 9], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]),
    Preset::new("moving electric", [2, 4, 1, 0, 1],
        [2, 6, 8, 4], [-3, 0, 3, 0], [120, 111, 105, 125],
        [14, 23, 0, 14], [24, 23, 22, 31], [0, 0, 8, 12], [24, 23, 27, 31],
        [9, 8, 8, 9], [1, 2, 2, 0], [0, 0, 7, 0], [0, 1, 1, 0]),
    Preset::new("wurly slow dance", [5, 5, 1, 0, 2],
        [4, 2, 10, 2], [2, -1, 1, 0], [113, 114, 109, 127],
        [0, 23, 21, 0], [23, 24, 26, 27], [0, 0, 0, 0], [31, 31, 31, 31],
        [7, 7, 9, 9], [0, 2, 1, 0], [0, 0, 3, 0], [0, 1, 0, 0]),
    Preset::new("ambient banjo", [4, 4, 0, 0, 0],
        [4, 3, 7, 2], [0, -1, 1, 0], [105, 116, 102, 127],
        [18, 0, 14, 0], [20, 21, 17, 19], [7, 0, 0, 0], [24, 23, 23, 21],
        [9, 9, 9, 9], [0, 0, 0, 0], [8, 0, 0, 0], [0, 0, 0, 0]),
];
