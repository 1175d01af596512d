use super::field::{wrap, FieldId, PlayMode};
use super::presets::{Preset, PRESETS};
use super::{Operator, OPERATOR_COUNT};
use crate::config::SynthConfig;
use crate::registers::{RegisterEncoder, RegisterSink};

/// Envelope and pitch parameters of one operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OperatorParams {
    /// Frequency multiple (0–15, 0 means ×0.5).
    pub multiple: u8,
    /// Detune (−3..3).
    pub detune: i8,
    /// Total level (0–127, 0 = loudest).
    pub total_level: u8,
    /// Attack rate (0–31).
    pub attack: u8,
    /// First decay rate (0–31).
    pub decay: u8,
    /// Sustain level (0–15).
    pub sustain_level: u8,
    /// Sustain rate (0–31).
    pub sustain_rate: u8,
    /// Release rate (0–15).
    pub release: u8,
    /// Key rate scaling (0–3).
    pub rate_scale: u8,
    /// SSG-EG type (0–8, 0 = off).
    pub ssg_eg: u8,
    /// Amplitude modulation enable.
    pub am: bool,
}

/// Every synthesizer parameter, with register side effects.
///
/// Setters wrap the incoming value into the field's bounds, store it,
/// and immediately write the matching register family through the
/// supplied sink. Fields that share a register are re-sent as a whole
/// byte using the current value of the partner field.
///
/// # Example
///
/// ```
/// use megamega::patch::{FieldId, PatchStore};
/// use megamega::{ChannelGroup, RegisterSink, SynthConfig};
///
/// #[derive(Default)]
/// struct Count(usize);
/// impl RegisterSink for Count {
///     fn write(&mut self, _: ChannelGroup, _: u8, _: u8) {
///         self.0 += 1;
///     }
/// }
///
/// let mut store = PatchStore::new(&SynthConfig::default());
/// let mut sink = Count::default();
///
/// // Stepping past the top of the range wraps to the bottom.
/// assert_eq!(store.set(FieldId::Algorithm, 8, &mut sink), 0);
/// assert_eq!(sink.0, 6);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PatchStore {
    preset: u8,
    velocity_sensitivity: u8,
    min_velocity: u8,
    play_mode: PlayMode,
    algorithm: u8,
    feedback: u8,
    lfo_frequency: u8,
    vibrato: u8,
    tremolo: u8,
    sustain: bool,
    operators: [OperatorParams; OPERATOR_COUNT],
}

impl Default for PatchStore {
    fn default() -> Self {
        Self::new(&SynthConfig::default())
    }
}

impl PatchStore {
    /// Create a store with an all-zero patch and the configured
    /// velocity settings. Nothing is written to the chip until a preset
    /// is loaded.
    pub fn new(config: &SynthConfig) -> Self {
        let (vs_min, vs_max) = FieldId::VelocitySensitivity.bounds();
        let (mv_min, mv_max) = FieldId::MinVelocity.bounds();
        Self {
            preset: 0,
            velocity_sensitivity: wrap(config.velocity_sensitivity.into(), vs_min, vs_max) as u8,
            min_velocity: wrap(config.min_velocity.into(), mv_min, mv_max) as u8,
            play_mode: PlayMode::Polyphonic,
            algorithm: 0,
            feedback: 0,
            lfo_frequency: 0,
            vibrato: 0,
            tremolo: 0,
            sustain: false,
            operators: [OperatorParams::default(); OPERATOR_COUNT],
        }
    }

    // -----------------------------------------------------------------------
    // Generic field access
    // -----------------------------------------------------------------------

    /// Current value of `field`.
    pub fn get(&self, field: FieldId) -> i16 {
        match field {
            FieldId::Preset => self.preset.into(),
            FieldId::VelocitySensitivity => self.velocity_sensitivity.into(),
            FieldId::MinVelocity => self.min_velocity.into(),
            FieldId::Polyphony => self.play_mode.value(),
            FieldId::Algorithm => self.algorithm.into(),
            FieldId::Feedback => self.feedback.into(),
            FieldId::LfoFrequency => self.lfo_frequency.into(),
            FieldId::Vibrato => self.vibrato.into(),
            FieldId::Tremolo => self.tremolo.into(),
            FieldId::Multiple(op) => self.op(op).multiple.into(),
            FieldId::Detune(op) => self.op(op).detune.into(),
            FieldId::TotalLevel(op) => self.op(op).total_level.into(),
            FieldId::Attack(op) => self.op(op).attack.into(),
            FieldId::Decay(op) => self.op(op).decay.into(),
            FieldId::SustainLevel(op) => self.op(op).sustain_level.into(),
            FieldId::SustainRate(op) => self.op(op).sustain_rate.into(),
            FieldId::Release(op) => self.op(op).release.into(),
            FieldId::RateScale(op) => self.op(op).rate_scale.into(),
            FieldId::Ssgeg(op) => self.op(op).ssg_eg.into(),
            FieldId::AmEnable(op) => self.op(op).am.into(),
        }
    }

    /// Set `field` to `value`, wrapping into bounds, and write the
    /// register family it belongs to. Returns the stored value.
    ///
    /// Setting [`FieldId::Preset`] loads the (wrapped) preset.
    pub fn set<S>(&mut self, field: FieldId, value: i16, sink: &mut S) -> i16
    where
        S: RegisterSink + ?Sized,
    {
        let (min, max) = field.bounds();
        let value = wrap(value, min, max);

        if field == FieldId::Preset {
            self.load_preset(value, sink);
            return value;
        }

        self.store(field, value);
        self.resend(field, sink);
        value
    }

    /// Move `field` by `delta` (one detent is ±1) with wrap-around.
    pub fn step<S>(&mut self, field: FieldId, delta: i16, sink: &mut S) -> i16
    where
        S: RegisterSink + ?Sized,
    {
        self.set(field, self.get(field) + delta, sink)
    }

    /// Write the register family holding `field` from the stored values.
    ///
    /// Used to restore a register after a temporary controller overlay.
    /// Silent fields and the preset selector write nothing.
    pub fn resend<S>(&self, field: FieldId, sink: &mut S)
    where
        S: RegisterSink + ?Sized,
    {
        let mut enc = RegisterEncoder::new(sink);
        match field {
            FieldId::Preset
            | FieldId::VelocitySensitivity
            | FieldId::MinVelocity
            | FieldId::Polyphony => {}
            FieldId::Algorithm | FieldId::Feedback => {
                enc.algorithm_feedback(self.algorithm, self.feedback);
            }
            FieldId::LfoFrequency => enc.lfo(self.lfo_frequency),
            FieldId::Vibrato | FieldId::Tremolo => enc.vibrato_tremolo(self.vibrato, self.tremolo),
            FieldId::Multiple(op) | FieldId::Detune(op) => {
                let p = self.op(op);
                enc.multiple_detune(op, p.multiple, p.detune);
            }
            FieldId::TotalLevel(op) => enc.total_level(op, self.op(op).total_level),
            FieldId::Attack(op) | FieldId::RateScale(op) => {
                let p = self.op(op);
                enc.attack_rate_scale(op, p.attack, p.rate_scale);
            }
            FieldId::Decay(op) | FieldId::AmEnable(op) => {
                let p = self.op(op);
                enc.decay_am(op, p.decay, p.am);
            }
            FieldId::SustainLevel(op) | FieldId::Release(op) => {
                let p = self.op(op);
                enc.sustain_level_release(op, p.sustain_level, p.release);
            }
            FieldId::SustainRate(op) => enc.sustain_rate(op, self.op(op).sustain_rate),
            FieldId::Ssgeg(op) => enc.ssg_eg(op, self.op(op).ssg_eg),
        }
    }

    // -----------------------------------------------------------------------
    // Presets
    // -----------------------------------------------------------------------

    /// Overwrite every sound-shaping field from preset `index` (wrapped
    /// into the library bounds) and write the full register burst.
    ///
    /// Burst order: algorithm/feedback, LFO, vibrato/tremolo, then for
    /// each operator multiple/detune, total level, attack/rate scale,
    /// decay/AM, sustain level/release, sustain rate, SSG-EG.
    pub fn load_preset<S>(&mut self, index: i16, sink: &mut S) -> &'static Preset
    where
        S: RegisterSink + ?Sized,
    {
        let (min, max) = FieldId::Preset.bounds();
        let index = wrap(index, min, max) as u8;
        let preset = &PRESETS[usize::from(index)];

        #[cfg(feature = "defmt")]
        defmt::info!("loading preset {=u8}: {=str}", index, preset.name);

        self.preset = index;
        self.algorithm = preset.algorithm;
        self.feedback = preset.feedback;
        self.lfo_frequency = preset.lfo_frequency;
        self.vibrato = preset.vibrato;
        self.tremolo = preset.tremolo;
        for op in Operator::ALL {
            let i = op.index();
            self.operators[i] = OperatorParams {
                multiple: preset.multiple[i],
                detune: preset.detune[i],
                total_level: preset.total_level[i],
                attack: preset.attack[i],
                decay: preset.decay[i],
                sustain_level: preset.sustain_level[i],
                sustain_rate: preset.sustain_rate[i],
                release: preset.release[i],
                rate_scale: preset.rate_scale[i],
                ssg_eg: preset.ssg_eg[i],
                am: preset.am[i],
            };
        }

        self.resend(FieldId::Algorithm, sink);
        self.resend(FieldId::LfoFrequency, sink);
        self.resend(FieldId::Vibrato, sink);
        for op in Operator::ALL {
            self.resend(FieldId::Multiple(op), sink);
            self.resend(FieldId::TotalLevel(op), sink);
            self.resend(FieldId::Attack(op), sink);
            self.resend(FieldId::Decay(op), sink);
            self.resend(FieldId::SustainLevel(op), sink);
            self.resend(FieldId::SustainRate(op), sink);
            self.resend(FieldId::Ssgeg(op), sink);
        }

        preset
    }

    /// Name of the selected preset.
    pub fn preset_name(&self) -> &'static str {
        PRESETS[usize::from(self.preset)].name
    }

    // -----------------------------------------------------------------------
    // Typed accessors
    // -----------------------------------------------------------------------

    /// Selected preset index.
    pub fn preset(&self) -> u8 {
        self.preset
    }

    /// Velocity sensitivity (0–10).
    pub fn velocity_sensitivity(&self) -> u8 {
        self.velocity_sensitivity
    }

    /// Velocity floor (0–127).
    pub fn min_velocity(&self) -> u8 {
        self.min_velocity
    }

    /// Stored play mode.
    pub fn play_mode(&self) -> PlayMode {
        self.play_mode
    }

    /// Stored LFO frequency index.
    pub fn lfo_frequency(&self) -> u8 {
        self.lfo_frequency
    }

    /// Stored vibrato depth.
    pub fn vibrato(&self) -> u8 {
        self.vibrato
    }

    /// Stored tremolo depth.
    pub fn tremolo(&self) -> u8 {
        self.tremolo
    }

    /// Parameters of one operator.
    pub fn operator(&self, op: Operator) -> &OperatorParams {
        self.op(op)
    }

    /// Returns `true` while the sustain pedal is held.
    pub fn sustain(&self) -> bool {
        self.sustain
    }

    /// Record the sustain pedal state. Pending releases are drained by
    /// the next tick, not here.
    pub fn set_sustain(&mut self, held: bool) {
        self.sustain = held;
    }

    fn op(&self, op: Operator) -> &OperatorParams {
        &self.operators[op.index()]
    }

    fn store(&mut self, field: FieldId, value: i16) {
        // `value` is already wrapped into the field's bounds.
        let byte = value as u8;
        match field {
            FieldId::Preset => self.preset = byte,
            FieldId::VelocitySensitivity => self.velocity_sensitivity = byte,
            FieldId::MinVelocity => self.min_velocity = byte,
            FieldId::Polyphony => self.play_mode = PlayMode::from_value(value),
            FieldId::Algorithm => self.algorithm = byte,
            FieldId::Feedback => self.feedback = byte,
            FieldId::LfoFrequency => self.lfo_frequency = byte,
            FieldId::Vibrato => self.vibrato = byte,
            FieldId::Tremolo => self.tremolo = byte,
            FieldId::Multiple(op) => self.operators[op.index()].multiple = byte,
            FieldId::Detune(op) => self.operators[op.index()].detune = value as i8,
            FieldId::TotalLevel(op) => self.operators[op.index()].total_level = byte,
            FieldId::Attack(op) => self.operators[op.index()].attack = byte,
            FieldId::Decay(op) => self.operators[op.index()].decay = byte,
            FieldId::SustainLevel(op) => self.operators[op.index()].sustain_level = byte,
            FieldId::SustainRate(op) => self.operators[op.index()].sustain_rate = byte,
            FieldId::Release(op) => self.operators[op.index()].release = byte,
            FieldId::RateScale(op) => self.operators[op.index()].rate_scale = byte,
            FieldId::Ssgeg(op) => self.operators[op.index()].ssg_eg = byte,
            FieldId::AmEnable(op) => self.operators[op.index()].am = value != 0,
        }
    }
}
