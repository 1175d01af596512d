/// Number of hardware channels available for notes.
pub const SLOT_COUNT: usize = 6;

/// Frequency numbers for the twelve semitones, indexed by `note % 12`.
pub const NOTE_FNUMS: [u16; 12] = [311, 329, 349, 370, 392, 415, 440, 466, 493, 523, 554, 586];

/// Highest octave block the chip accepts.
const BLOCK_MAX: i16 = 7;

/// Chip pitch code: octave block plus 11-bit frequency number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pitch {
    /// Octave block (0–7).
    pub block: u8,
    /// Frequency number.
    pub fnum: u16,
}

impl Pitch {
    const ZERO: Pitch = Pitch { block: 0, fnum: 0 };

    /// Pitch code for a MIDI note number.
    ///
    /// The block is `note / 12 - 1`, clamped into 0–7, so notes below
    /// C0 share block 0 and notes above B6 share block 7.
    ///
    /// ```
    /// use megamega::voice::Pitch;
    ///
    /// let a4 = Pitch::from_note(69);
    /// assert_eq!((a4.block, a4.fnum), (4, 493));
    /// ```
    pub fn from_note(note: u8) -> Self {
        let block = (i16::from(note) / 12 - 1).clamp(0, BLOCK_MAX) as u8;
        Self {
            block,
            fnum: NOTE_FNUMS[usize::from(note % 12)],
        }
    }

    /// Value of the frequency-high register: block in bits 3–5, top
    /// three bits of the frequency number in bits 0–2.
    pub fn high(self) -> u8 {
        (self.block << 3) | ((self.fnum >> 8) & 0x07) as u8
    }

    /// Value of the frequency-low register.
    pub fn low(self) -> u8 {
        (self.fnum & 0xFF) as u8
    }
}

/// State of one hardware channel.
///
/// A slot is free when neither flag is set. `requested_on` is owned by
/// note events; `sounding` is owned by the tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelSlot {
    /// Assigned MIDI note (0 when idle).
    pub note: u8,
    /// A note event wants this channel keyed on.
    pub requested_on: bool,
    /// The key-on burst has been written.
    pub sounding: bool,
    /// Effective velocity (after the floor).
    pub velocity: u8,
    /// Ticks elapsed since the key-on burst.
    pub held_ticks: u32,
    /// Pitch captured at note-on.
    pub pitch: Pitch,
}

impl ChannelSlot {
    /// An idle slot.
    pub const IDLE: ChannelSlot = ChannelSlot {
        note: 0,
        requested_on: false,
        sounding: false,
        velocity: 0,
        held_ticks: 0,
        pitch: Pitch::ZERO,
    };

    /// Returns `true` if the slot can take a new note.
    pub fn is_free(&self) -> bool {
        !self.requested_on && !self.sounding
    }

    /// Returns `true` if `note` is held and sounding on this slot.
    pub fn is_playing(&self, note: u8) -> bool {
        self.requested_on && self.sounding && self.note == note
    }

    /// Returns `true` if the note was released but the key-off is still
    /// pending (sustain held, or waiting for the next tick).
    pub fn is_releasing(&self) -> bool {
        !self.requested_on && self.sounding
    }

    pub(crate) fn clear(&mut self) {
        *self = ChannelSlot::IDLE;
    }
}
