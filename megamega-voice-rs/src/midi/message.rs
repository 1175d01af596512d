/// Status nibbles of channel voice messages.
pub mod status {
    /// Note off.
    pub const NOTE_OFF: u8 = 0x80;
    /// Note on.
    pub const NOTE_ON: u8 = 0x90;
    /// Polyphonic key pressure.
    pub const POLY_AFTERTOUCH: u8 = 0xA0;
    /// Control change.
    pub const CONTROL_CHANGE: u8 = 0xB0;
    /// Program change.
    pub const PROGRAM_CHANGE: u8 = 0xC0;
    /// Channel pressure.
    pub const CHANNEL_AFTERTOUCH: u8 = 0xD0;
    /// Pitch bend.
    pub const PITCH_BEND: u8 = 0xE0;
    /// First system real-time byte; these and above are discarded.
    pub const REALTIME: u8 = 0xF8;
}

/// Controller numbers the router acts on.
pub mod controller {
    /// Modulation wheel.
    pub const MOD_WHEEL: u8 = 1;
    /// Sustain (damper) pedal.
    pub const SUSTAIN: u8 = 64;
}

/// A complete MIDI message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MidiMessage {
    NoteOff { channel: u8, note: u8, velocity: u8 },
    NoteOn { channel: u8, note: u8, velocity: u8 },
    PolyAftertouch { channel: u8, note: u8, pressure: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    ProgramChange { channel: u8, program: u8 },
    ChannelAftertouch { channel: u8, pressure: u8 },
    /// Bend relative to centre (−8192..8191).
    PitchBend { channel: u8, value: i16 },
    /// System common status (0xF0–0xF7) with no payload captured.
    System { status: u8 },
}

impl MidiMessage {
    /// Total length in bytes (status included) of a message starting
    /// with status byte `first`.
    pub fn expected_len(first: u8) -> usize {
        match first & 0xF0 {
            status::PROGRAM_CHANGE | status::CHANNEL_AFTERTOUCH => 2,
            0xF0 => 1,
            _ => 3,
        }
    }

    /// Decode a complete message. `bytes` must hold exactly
    /// [`expected_len()`](Self::expected_len) bytes, status first.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let (&first, data) = bytes.split_first()?;
        if first < 0x80 || data.len() + 1 != Self::expected_len(first) {
            return None;
        }
        let channel = first & 0x0F;

        let message = match (first & 0xF0, data) {
            (status::NOTE_OFF, &[note, velocity]) => MidiMessage::NoteOff { channel, note, velocity },
            (status::NOTE_ON, &[note, velocity]) => MidiMessage::NoteOn { channel, note, velocity },
            (status::POLY_AFTERTOUCH, &[note, pressure]) => {
                MidiMessage::PolyAftertouch { channel, note, pressure }
            }
            (status::CONTROL_CHANGE, &[controller, value]) => {
                MidiMessage::ControlChange { channel, controller, value }
            }
            (status::PROGRAM_CHANGE, &[program]) => MidiMessage::ProgramChange { channel, program },
            (status::CHANNEL_AFTERTOUCH, &[pressure]) => {
                MidiMessage::ChannelAftertouch { channel, pressure }
            }
            (status::PITCH_BEND, &[lsb, msb]) => {
                let raw = (i16::from(msb & 0x7F) << 7) | i16::from(lsb & 0x7F);
                MidiMessage::PitchBend { channel, value: raw - 8192 }
            }
            (0xF0, &[]) => MidiMessage::System { status: first },
            _ => return None,
        };
        Some(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lengths_by_status() {
        assert_eq!(MidiMessage::expected_len(0x90), 3);
        assert_eq!(MidiMessage::expected_len(0x8F), 3);
        assert_eq!(MidiMessage::expected_len(0xB3), 3);
        assert_eq!(MidiMessage::expected_len(0xE0), 3);
        assert_eq!(MidiMessage::expected_len(0xC5), 2);
        assert_eq!(MidiMessage::expected_len(0xD0), 2);
        assert_eq!(MidiMessage::expected_len(0xF2), 1);
    }

    #[test]
    fn decodes_channel_messages() {
        assert_eq!(
            MidiMessage::from_bytes(&[0x93, 60, 100]),
            Some(MidiMessage::NoteOn { channel: 3, note: 60, velocity: 100 })
        );
        assert_eq!(
            MidiMessage::from_bytes(&[0xB0, 64, 127]),
            Some(MidiMessage::ControlChange { channel: 0, controller: 64, value: 127 })
        );
        assert_eq!(
            MidiMessage::from_bytes(&[0xD1, 90]),
            Some(MidiMessage::ChannelAftertouch { channel: 1, pressure: 90 })
        );
    }

    #[test]
    fn pitch_bend_is_centred() {
        assert_eq!(
            MidiMessage::from_bytes(&[0xE0, 0x00, 0x40]),
            Some(MidiMessage::PitchBend { channel: 0, value: 0 })
        );
        assert_eq!(
            MidiMessage::from_bytes(&[0xE0, 0x00, 0x00]),
            Some(MidiMessage::PitchBend { channel: 0, value: -8192 })
        );
    }

    #[test]
    fn rejects_wrong_length_or_data_first() {
        assert_eq!(MidiMessage::from_bytes(&[0x90, 60]), None);
        assert_eq!(MidiMessage::from_bytes(&[60, 100]), None);
        assert_eq!(MidiMessage::from_bytes(&[]), None);
    }
}
