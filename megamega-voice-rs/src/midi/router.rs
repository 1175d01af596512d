use super::message::{controller, MidiMessage};
use crate::config::SustainPolarity;
use crate::patch::{FieldId, PatchStore};
use crate::registers::{RegisterEncoder, RegisterSink};
use crate::voice::{NoteOnOutcome, VoiceAllocator};

/// Divisor mapping a 7-bit controller value onto a 3-bit depth (127 / 18 = 7).
pub const OVERLAY_DIVISOR: u8 = 18;

/// What the router did with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MidiAction {
    /// Note-on handed to the allocator.
    NoteOn(NoteOnOutcome),
    /// Note-off handed to the allocator; the released slot, if any.
    NoteOff(Option<usize>),
    /// LFO rate overlay written (`None` restored the stored setting).
    ModWheel(Option<u8>),
    /// Sustain flag updated.
    Sustain(bool),
    /// Vibrato overlay written (`None` restored the stored depth).
    Aftertouch(Option<u8>),
    /// All channels keyed off.
    Panic,
    /// Nothing to do.
    Ignored,
}

/// Dispatches complete MIDI messages. Channels are not filtered.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MidiRouter {
    sustain_polarity: SustainPolarity,
}

impl MidiRouter {
    /// A router using `sustain_polarity` for controller 64.
    pub const fn new(sustain_polarity: SustainPolarity) -> Self {
        Self { sustain_polarity }
    }

    /// Apply `message`.
    ///
    /// - note on / off go to the allocator (any note-on velocity counts
    ///   as "on");
    /// - mod wheel and channel aftertouch write a temporary register
    ///   overlay that leaves the stored LFO and vibrato untouched; value 0
    ///   restores the stored setting;
    /// - the sustain pedal only sets the flag;
    /// - pitch bend keys every channel off.
    pub fn route<S>(
        &self,
        message: MidiMessage,
        voices: &mut VoiceAllocator,
        store: &mut PatchStore,
        sink: &mut S,
    ) -> MidiAction
    where
        S: RegisterSink + ?Sized,
    {
        match message {
            MidiMessage::NoteOn { note, velocity, .. } => {
                let outcome = voices.note_on(note, velocity, store.min_velocity(), sink);
                MidiAction::NoteOn(outcome)
            }
            MidiMessage::NoteOff { note, .. } => MidiAction::NoteOff(voices.note_off(note)),
            MidiMessage::ControlChange {
                controller: controller::MOD_WHEEL,
                value,
                ..
            } => {
                if value == 0 {
                    store.resend(FieldId::LfoFrequency, sink);
                    MidiAction::ModWheel(None)
                } else {
                    let rate = value / OVERLAY_DIVISOR;
                    RegisterEncoder::new(sink).lfo_rate(rate);
                    MidiAction::ModWheel(Some(rate))
                }
            }
            MidiMessage::ControlChange {
                controller: controller::SUSTAIN,
                value,
                ..
            } => {
                let held = self.sustain_polarity.is_held(value);
                store.set_sustain(held);
                MidiAction::Sustain(held)
            }
            MidiMessage::ChannelAftertouch { pressure, .. } => {
                if pressure == 0 {
                    store.resend(FieldId::Vibrato, sink);
                    MidiAction::Aftertouch(None)
                } else {
                    let depth = pressure / OVERLAY_DIVISOR;
                    RegisterEncoder::new(sink).vibrato_tremolo(depth, store.tremolo());
                    MidiAction::Aftertouch(Some(depth))
                }
            }
            MidiMessage::PitchBend { .. } => {
                voices.all_notes_off(sink);
                MidiAction::Panic
            }
            _other => {
                #[cfg(feature = "defmt")]
                defmt::debug!("ignored MIDI message {}", _other);
                MidiAction::Ignored
            }
        }
    }
}
