//! Startup configuration for the synth core.
//!
//! [`SynthConfig::default()`] reproduces the stock
//! instrument settings: the "one operator" preset, velocity sensitivity 2 and a
//! velocity floor of 50. The one exception is the sustain pedal: the
//! stock hardware read it as [`SustainPolarity::Inverted`], while the
//! default follows the MIDI convention. Override individual fields with
//! struct-update syntax:
//!
//! ```
//! use megamega::{SustainPolarity, SynthConfig};
//!
//! let config = SynthConfig {
//!     sustain_polarity: SustainPolarity::Inverted,
//!     ..SynthConfig::default()
//! };
//! assert_eq!(config.initial_preset, 15);
//! ```

/// How the sustain pedal controller (#64) value maps onto "held".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SustainPolarity {
    /// Values 64–127 hold, 0–63 release (MIDI convention).
    #[default]
    Standard,
    /// Value 0 holds, anything else releases. Matches normally-closed
    /// pedals that send 0 when pressed.
    Inverted,
}

impl SustainPolarity {
    /// Returns `true` if `value` means the pedal is held down.
    pub fn is_held(self, value: u8) -> bool {
        match self {
            SustainPolarity::Standard => value >= 64,
            SustainPolarity::Inverted => value == 0,
        }
    }
}

/// Configuration consumed by [`Synth::new()`](crate::Synth::new).
#[derive(Debug, Clone, Copy)]
pub struct SynthConfig {
    /// Preset loaded by [`Synth::start()`](crate::Synth::start). Default: 15.
    pub initial_preset: u8,
    /// Initial velocity sensitivity (0–10). Default: 2.
    pub velocity_sensitivity: u8,
    /// Initial minimum velocity floor (0–127). Default: 50.
    pub min_velocity: u8,
    /// Sustain pedal polarity. Default: [`SustainPolarity::Standard`].
    /// Set [`SustainPolarity::Inverted`] for the stock pedal wiring.
    pub sustain_polarity: SustainPolarity,
    /// Tick period in microseconds, used by the firmware's tick task.
    /// Default: 4096 (one 16-bit overflow of a 16 MHz timer).
    pub tick_period_us: u64,
    /// Two lines shown by [`Synth::show_banner()`](crate::Synth::show_banner).
    pub banner: [&'static str; 2],
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            initial_preset: 15,
            velocity_sensitivity: 2,
            min_velocity: 50,
            sustain_polarity: SustainPolarity::Standard,
            tick_period_us: 4096,
            banner: ["  megamega2612", " FM synthesizer"],
        }
    }
}
