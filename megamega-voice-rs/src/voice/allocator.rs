use super::slot::{ChannelSlot, Pitch, SLOT_COUNT};
use crate::registers::{RegisterEncoder, RegisterSink};

/// What [`VoiceAllocator::note_on()`] did with a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NoteOnOutcome {
    /// The note was recorded on this free slot; the next tick keys it on.
    Assigned(usize),
    /// The note was already sounding on this slot and was re-keyed now.
    Retriggered(usize),
    /// Every slot was busy with other notes.
    Dropped,
}

/// Maps notes onto the six channel slots.
///
/// There is no voice stealing: when all six slots are busy a new note
/// is dropped.
///
/// ```
/// use megamega::voice::{NoteOnOutcome, VoiceAllocator};
/// use megamega::{ChannelGroup, RegisterSink};
///
/// struct Nop;
/// impl RegisterSink for Nop {
///     fn write(&mut self, _: ChannelGroup, _: u8, _: u8) {}
/// }
///
/// let mut voices = VoiceAllocator::new();
/// assert_eq!(voices.note_on(60, 100, 50, &mut Nop), NoteOnOutcome::Assigned(0));
/// assert_eq!(voices.note_on(64, 100, 50, &mut Nop), NoteOnOutcome::Assigned(1));
/// assert!(voices.slots()[1].requested_on);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VoiceAllocator {
    slots: [ChannelSlot; SLOT_COUNT],
}

impl Default for VoiceAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl VoiceAllocator {
    /// Six idle slots.
    pub const fn new() -> Self {
        Self {
            slots: [ChannelSlot::IDLE; SLOT_COUNT],
        }
    }

    /// Request `note` at `velocity`.
    ///
    /// If a slot is already sounding this exact note it is re-keyed
    /// immediately (key-off, pitch, key-on) and keeps its stored
    /// velocity. Otherwise the lowest free slot records the note, its
    /// pitch and `max(velocity, min_velocity)`, and waits for the tick.
    pub fn note_on<S>(
        &mut self,
        note: u8,
        velocity: u8,
        min_velocity: u8,
        sink: &mut S,
    ) -> NoteOnOutcome
    where
        S: RegisterSink + ?Sized,
    {
        if let Some(index) = self.slots.iter().position(|s| s.is_playing(note)) {
            let pitch = self.slots[index].pitch;
            let mut enc = RegisterEncoder::new(sink);
            enc.key_off(index);
            enc.voice_pitch(index, pitch);
            enc.key_on(index);
            self.slots[index].held_ticks = 0;

            #[cfg(feature = "defmt")]
            defmt::debug!("retrigger note {=u8} on slot {=usize}", note, index);

            return NoteOnOutcome::Retriggered(index);
        }

        match self.slots.iter().position(ChannelSlot::is_free) {
            Some(index) => {
                self.slots[index] = ChannelSlot {
                    note,
                    requested_on: true,
                    sounding: false,
                    velocity: velocity.max(min_velocity),
                    held_ticks: 0,
                    pitch: Pitch::from_note(note),
                };
                NoteOnOutcome::Assigned(index)
            }
            None => {
                #[cfg(feature = "defmt")]
                defmt::debug!("no free slot for note {=u8}, dropped", note);

                NoteOnOutcome::Dropped
            }
        }
    }

    /// Release `note`. Returns the slot whose request was cleared, or
    /// `None` if no slot is sounding that note.
    ///
    /// The key-off itself is written by the tick, and only once the
    /// sustain pedal is up.
    pub fn note_off(&mut self, note: u8) -> Option<usize> {
        let index = self.slots.iter().position(|s| s.is_playing(note));
        match index {
            Some(i) => self.slots[i].requested_on = false,
            None => {
                #[cfg(feature = "defmt")]
                defmt::debug!("note off {=u8} matched no slot", note);
            }
        }
        index
    }

    /// Key every channel off now and return all slots to idle,
    /// regardless of sustain.
    pub fn all_notes_off<S>(&mut self, sink: &mut S)
    where
        S: RegisterSink + ?Sized,
    {
        let mut enc = RegisterEncoder::new(sink);
        for (index, slot) in self.slots.iter_mut().enumerate() {
            enc.key_off(index);
            slot.clear();
        }

        #[cfg(feature = "defmt")]
        defmt::info!("all notes off");
    }

    /// Current slot states.
    pub fn slots(&self) -> &[ChannelSlot; SLOT_COUNT] {
        &self.slots
    }

    /// Number of slots not free.
    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_free()).count()
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [ChannelSlot; SLOT_COUNT] {
        &mut self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers::{ChannelGroup, RegisterWrite};
    use crate::testing::RegisterLog;

    fn sounding(voices: &mut VoiceAllocator, index: usize) {
        voices.slots_mut()[index].sounding = true;
    }

    // ── Allocation ───────────────────────────────────────────────────

    #[test]
    fn lowest_free_slot_is_chosen() {
        let mut v = VoiceAllocator::new();
        let mut log = RegisterLog::new();
        for (i, note) in [60, 62, 64].into_iter().enumerate() {
            assert_eq!(v.note_on(note, 100, 0, &mut log), NoteOnOutcome::Assigned(i));
        }
        // free slot 1 entirely; the next note goes there
        v.slots_mut()[1].clear();
        assert_eq!(v.note_on(65, 100, 0, &mut log), NoteOnOutcome::Assigned(1));
        assert!(log.writes().is_empty());
    }

    #[test]
    fn note_on_sets_request_only() {
        let mut v = VoiceAllocator::new();
        let mut log = RegisterLog::new();
        v.note_on(69, 90, 0, &mut log);
        let s = v.slots()[0];
        assert_eq!(s.note, 69);
        assert!(s.requested_on);
        assert!(!s.sounding);
        assert_eq!(s.pitch, Pitch::from_note(69));
    }

    #[test]
    fn velocity_floor_applies() {
        let mut v = VoiceAllocator::new();
        let mut log = RegisterLog::new();
        v.note_on(60, 10, 50, &mut log);
        v.note_on(61, 80, 50, &mut log);
        assert_eq!(v.slots()[0].velocity, 50);
        assert_eq!(v.slots()[1].velocity, 80);
    }

    #[test]
    fn seventh_note_is_dropped() {
        let mut v = VoiceAllocator::new();
        let mut log = RegisterLog::new();
        for note in 60..66 {
            v.note_on(note, 100, 0, &mut log);
        }
        let before = v.clone();
        assert_eq!(v.note_on(70, 100, 0, &mut log), NoteOnOutcome::Dropped);
        assert_eq!(v, before);
        assert_eq!(v.active_count(), 6);
    }

    #[test]
    fn pending_slot_is_not_free() {
        let mut v = VoiceAllocator::new();
        let mut log = RegisterLog::new();
        v.note_on(60, 100, 0, &mut log);
        // same note again before the tick: slot 0 is requested but not
        // sounding, so this is neither a match nor free
        assert_eq!(v.note_on(60, 100, 0, &mut log), NoteOnOutcome::Assigned(1));
    }

    // ── Retrigger ────────────────────────────────────────────────────

    #[test]
    fn retrigger_rekeys_in_place() {
        let mut v = VoiceAllocator::new();
        let mut log = RegisterLog::new();
        v.note_on(60, 100, 0, &mut log);
        sounding(&mut v, 0);

        assert_eq!(v.note_on(60, 20, 0, &mut log), NoteOnOutcome::Retriggered(0));
        let pitch = Pitch::from_note(60);
        assert_eq!(
            log.writes(),
            &[
                RegisterWrite::new(ChannelGroup::FirstThree, 0x28, 0x00),
                RegisterWrite::new(ChannelGroup::FirstThree, 0xA4, pitch.high()),
                RegisterWrite::new(ChannelGroup::FirstThree, 0xA0, pitch.low()),
                RegisterWrite::new(ChannelGroup::FirstThree, 0x28, 0xF0),
            ]
        );
        let s = v.slots()[0];
        assert!(s.requested_on && s.sounding);
        assert_eq!(s.velocity, 100);
        assert_eq!(v.active_count(), 1);
    }

    #[test]
    fn retrigger_beats_lower_free_slot() {
        let mut v = VoiceAllocator::new();
        let mut log = RegisterLog::new();
        v.note_on(60, 100, 0, &mut log);
        v.note_on(64, 100, 0, &mut log);
        sounding(&mut v, 1);
        v.slots_mut()[0].clear();

        assert_eq!(v.note_on(64, 100, 0, &mut log), NoteOnOutcome::Retriggered(1));
        assert!(v.slots()[0].is_free());
    }

    #[test]
    fn retrigger_on_second_group_uses_last_three() {
        let mut v = VoiceAllocator::new();
        let mut log = RegisterLog::new();
        for note in 60..65 {
            v.note_on(note, 100, 0, &mut log);
        }
        sounding(&mut v, 4);
        log.clear();

        v.note_on(64, 100, 0, &mut log);
        let w = log.writes();
        assert_eq!(w[0], RegisterWrite::new(ChannelGroup::FirstThree, 0x28, 0x05));
        assert_eq!(w[1].group, ChannelGroup::LastThree);
        assert_eq!(w[1].register, 0xA5);
        assert_eq!(w[3], RegisterWrite::new(ChannelGroup::FirstThree, 0x28, 0xF5));
    }

    // ── Release ──────────────────────────────────────────────────────

    #[test]
    fn note_off_clears_request_of_sounding_slot() {
        let mut v = VoiceAllocator::new();
        let mut log = RegisterLog::new();
        v.note_on(60, 100, 0, &mut log);
        sounding(&mut v, 0);
        assert_eq!(v.note_off(60), Some(0));
        assert!(v.slots()[0].is_releasing());
    }

    #[test]
    fn note_off_without_match_is_ignored() {
        let mut v = VoiceAllocator::new();
        let mut log = RegisterLog::new();
        v.note_on(60, 100, 0, &mut log);
        // not yet sounding
        assert_eq!(v.note_off(60), None);
        assert_eq!(v.note_off(61), None);
        assert!(v.slots()[0].requested_on);
    }

    #[test]
    fn all_notes_off_keys_off_every_channel() {
        let mut v = VoiceAllocator::new();
        let mut log = RegisterLog::new();
        v.note_on(60, 100, 0, &mut log);
        sounding(&mut v, 0);
        v.note_on(62, 100, 0, &mut log);

        v.all_notes_off(&mut log);
        assert_eq!(log.values(), vec![0, 1, 2, 4, 5, 6]);
        assert!(v.slots().iter().all(|s| *s == ChannelSlot::IDLE));
    }
}
