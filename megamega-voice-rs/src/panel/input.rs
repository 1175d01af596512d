use heapless::Vec;

/// One snapshot of the four panel inputs, taken on any pin edge.
///
/// Buttons are reported as "pressed" (the firmware inverts the
/// active-low pins). Encoder pins are raw levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelSample {
    /// Encoder pin A level.
    pub enc_a: bool,
    /// Encoder pin B level.
    pub enc_b: bool,
    /// Button A (parameter / previous group) pressed.
    pub button_a: bool,
    /// Button B (operator / next group) pressed.
    pub button_b: bool,
}

impl PanelSample {
    /// Encoder at rest (both pins pulled high), no button pressed.
    pub const IDLE: PanelSample = PanelSample {
        enc_a: true,
        enc_b: true,
        button_a: false,
        button_b: false,
    };

    fn encoder(&self) -> (bool, bool) {
        (self.enc_a, self.enc_b)
    }
}

impl Default for PanelSample {
    fn default() -> Self {
        Self::IDLE
    }
}

/// A decoded user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gesture {
    /// Button A tapped: previous group.
    GroupBack,
    /// Button B tapped: next group.
    GroupForward,
    /// Rotation while button A is held.
    ParameterStep(i8),
    /// Rotation while only button B is held.
    OperatorStep(i8),
    /// Rotation with no button held.
    ValueStep(i8),
}

/// Turns panel samples into [`Gesture`]s.
///
/// # Quadrature
///
/// A detent is counted once, on the transition into A=0, B=1. Arriving
/// from A=0, B=0 is counter-clockwise (−1); arriving from A=1, B=1 is
/// clockwise (+1). All other transitions only update the stored state,
/// so one physical detent yields exactly one step.
///
/// # Button taps
///
/// Any sample with a button pressed arms a tap; any encoder movement
/// disarms it, so a button used as a rotation modifier never also
/// changes group on release. A release of A while armed (and B not
/// held) is [`Gesture::GroupBack`]; a release of B while armed (and A
/// not held) is [`Gesture::GroupForward`].
///
/// ```
/// use megamega::panel::{Gesture, PanelDecoder, PanelSample};
///
/// let mut decoder = PanelDecoder::new();
/// let detent = [(true, false), (false, false), (false, true)];
/// let mut steps = Vec::new();
/// for (enc_a, enc_b) in detent {
///     let sample = PanelSample { enc_a, enc_b, ..PanelSample::IDLE };
///     steps.extend(decoder.update(sample));
/// }
/// assert_eq!(steps, [Gesture::ValueStep(-1)]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelDecoder {
    last: PanelSample,
    armed: bool,
}

impl Default for PanelDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelDecoder {
    /// Decoder assuming the panel starts at rest.
    pub const fn new() -> Self {
        Self::starting_at(PanelSample::IDLE)
    }

    /// Decoder whose previous state is `sample` (read at power-up).
    pub const fn starting_at(sample: PanelSample) -> Self {
        Self {
            last: sample,
            armed: false,
        }
    }

    /// Process one sample. At most two gestures result (both buttons
    /// released in the same sample).
    pub fn update(&mut self, sample: PanelSample) -> Vec<Gesture, 2> {
        let mut gestures = Vec::new();
        let previous = self.last;
        self.last = sample;

        if sample.button_a || sample.button_b {
            self.armed = true;
        }

        if sample.encoder() == previous.encoder() {
            if self.armed {
                if previous.button_a && !sample.button_a && !sample.button_b {
                    let _ = gestures.push(Gesture::GroupBack);
                }
                if previous.button_b && !sample.button_b && !sample.button_a {
                    let _ = gestures.push(Gesture::GroupForward);
                }
            }
            return gestures;
        }

        self.armed = false;

        let delta = match (previous.encoder(), sample.encoder()) {
            ((false, false), (false, true)) => -1,
            ((true, true), (false, true)) => 1,
            _ => return gestures,
        };

        let gesture = if sample.button_a {
            Gesture::ParameterStep(delta)
        } else if sample.button_b {
            Gesture::OperatorStep(delta)
        } else {
            Gesture::ValueStep(delta)
        };
        let _ = gestures.push(gesture);
        gestures
    }
}
