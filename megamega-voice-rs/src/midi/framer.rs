use super::message::{status, MidiMessage};
use super::ring::RingBuffer;

/// Longest message the framer reassembles.
const MAX_MESSAGE_LEN: usize = 3;

/// Reassembles raw MIDI bytes into messages.
///
/// A status byte starts a new message; data bytes fill it until its
/// length is reached. Real-time bytes are discarded, and data bytes
/// with no open message (stray bytes, or running status after a
/// completed message) are ignored.
///
/// ```
/// use megamega::midi::{MidiFramer, MidiMessage};
///
/// let mut framer = MidiFramer::new();
/// assert_eq!(framer.push(0x90), None);
/// assert_eq!(framer.push(0xF8), None); // clock, discarded
/// assert_eq!(framer.push(60), None);
/// assert_eq!(
///     framer.push(100),
///     Some(MidiMessage::NoteOn { channel: 0, note: 60, velocity: 100 })
/// );
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MidiFramer {
    ring: RingBuffer<u8, MAX_MESSAGE_LEN>,
    /// Length of the open message; 0 when no message is open.
    expected: usize,
}

impl MidiFramer {
    /// A framer with no open message.
    pub fn new() -> Self {
        Self {
            ring: RingBuffer::new(),
            expected: 0,
        }
    }

    /// Feed one byte. Returns a message when this byte completes one.
    pub fn push(&mut self, byte: u8) -> Option<MidiMessage> {
        if byte >= status::REALTIME {
            return None;
        }

        if byte & 0x80 != 0 {
            self.ring.clear();
            self.ring.push(byte);
            self.expected = MidiMessage::expected_len(byte);
        } else if self.expected == 0 {
            #[cfg(feature = "defmt")]
            defmt::debug!("stray MIDI data byte {=u8:#x}", byte);
            return None;
        } else {
            self.ring.push(byte);
        }

        if self.ring.len() < self.expected {
            return None;
        }

        let mut bytes = [0u8; MAX_MESSAGE_LEN];
        for (i, b) in bytes.iter_mut().enumerate().take(self.expected) {
            *b = self.ring.get(i)?;
        }
        let len = self.expected;
        self.expected = 0;
        MidiMessage::from_bytes(&bytes[..len])
    }

    /// Returns `true` while a message is partially received.
    #[cfg(test)]
    fn is_pending(&self) -> bool {
        self.expected != 0
    }
}
