//! Parameter-to-register translation.
//!
//! [`RegisterEncoder`] borrows a [`RegisterSink`] and turns one logical
//! change into its register writes immediately; nothing is batched. The
//! encoder is a pure translation stage: it receives every value it
//! needs, including the partner field of a shared register, and never
//! reads the patch store or the voice slots.

use super::encoding::{Encoding, Field, Target};
use super::{
    addr, ChannelGroup, RegisterSink, CHANNELS_PER_GROUP, ENABLE_BIT, KEY_CHANNEL_CODES,
    KEY_ON_ALL_OPERATORS, OPERATOR_OFFSETS, PAN_BOTH,
};
use crate::patch::Operator;
use crate::voice::Pitch;

/// Highest total level (quietest).
const TL_MAX: u8 = 127;
/// Highest attack / decay / sustain rate.
const RATE_MAX: u8 = 31;
/// Highest sustain level and release rate.
const NIBBLE_MAX: u8 = 15;
/// Bias that moves detune from −3..3 into 0..6.
const DETUNE_BIAS: i8 = 3;

/// Writes register families to a borrowed sink.
///
/// # Example
///
/// ```
/// use megamega::registers::{ChannelGroup, RegisterEncoder, RegisterSink};
///
/// struct Count(usize);
/// impl RegisterSink for Count {
///     fn write(&mut self, _: ChannelGroup, _: u8, _: u8) {
///         self.0 += 1;
///     }
/// }
///
/// let mut sink = Count(0);
/// RegisterEncoder::new(&mut sink).algorithm_feedback(7, 0);
/// assert_eq!(sink.0, 6); // broadcast to all six channels
/// ```
pub struct RegisterEncoder<'a, S: RegisterSink + ?Sized> {
    sink: &'a mut S,
}

impl<'a, S: RegisterSink + ?Sized> RegisterEncoder<'a, S> {
    /// Wrap a sink.
    pub fn new(sink: &'a mut S) -> Self {
        Self { sink }
    }

    // -----------------------------------------------------------------------
    // Generic emission
    // -----------------------------------------------------------------------

    /// Encode and transmit one register family.
    ///
    /// Broadcast and per-operator targets produce six writes: channels
    /// 0, 1, 2 of the first group, then channels 0, 1, 2 of the last
    /// group. Global targets produce one write with the first group flag.
    pub fn emit(&mut self, target: Target, encoding: Encoding) {
        let value = encoding.byte();
        let address = target.address();

        match target {
            Target::Global { .. } => {
                self.sink.write(ChannelGroup::FirstThree, address, value);
            }
            Target::Broadcast { .. } | Target::Operator { .. } => {
                for group in ChannelGroup::ALL {
                    for channel in 0..CHANNELS_PER_GROUP as u8 {
                        self.sink.write(group, address + channel, value);
                    }
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Channel-wide families
    // -----------------------------------------------------------------------

    /// Feedback/algorithm register (0xB0).
    pub fn algorithm_feedback(&mut self, algorithm: u8, feedback: u8) {
        self.emit(
            Target::Broadcast { base: addr::FB_ALG },
            Encoding::Packed(
                Field::normal(i16::from(algorithm), 0),
                Field::normal(i16::from(feedback), 3),
            ),
        );
    }

    /// Pan/AMS/FMS register (0xB4). Both outputs stay enabled.
    pub fn vibrato_tremolo(&mut self, vibrato: u8, tremolo: u8) {
        self.emit(
            Target::Broadcast {
                base: addr::PAN_AMS_FMS,
            },
            Encoding::FixedBits {
                mask: PAN_BOTH,
                first: Field::normal(i16::from(vibrato), 0),
                second: Field::normal(i16::from(tremolo), 4),
            },
        );
    }

    /// Global LFO register (0x22). Index 0 disables the LFO; index `n`
    /// enables it at hardware rate `n - 1`.
    pub fn lfo(&mut self, frequency: u8) {
        let encoding = match frequency {
            0 => Encoding::Direct(0),
            n => Encoding::Packed(
                Field::normal(i16::from(n - 1), 0),
                Field::normal(1, 3),
            ),
        };
        self.emit(Target::Global { register: addr::LFO }, encoding);
    }

    /// Enable the LFO at a raw hardware rate (0–7), bypassing the
    /// stored index. Used by the modulation wheel overlay.
    pub fn lfo_rate(&mut self, rate: u8) {
        self.emit(
            Target::Global { register: addr::LFO },
            Encoding::Direct(ENABLE_BIT | (rate & 0x07)),
        );
    }

    // -----------------------------------------------------------------------
    // Per-operator families
    // -----------------------------------------------------------------------

    /// Detune/multiple register (0x30).
    pub fn multiple_detune(&mut self, operator: Operator, multiple: u8, detune: i8) {
        self.emit(
            Target::Operator {
                base: addr::DT_MUL,
                operator,
            },
            Encoding::Packed(
                Field::normal(i16::from(multiple), 0),
                Field::offset(i16::from(detune), 4, DETUNE_BIAS),
            ),
        );
    }

    /// Total level register (0x40), reversed so 0 is loudest.
    pub fn total_level(&mut self, operator: Operator, level: u8) {
        self.emit(
            Target::Operator {
                base: addr::TL,
                operator,
            },
            Encoding::Single(Field::reversed(i16::from(level), 0, TL_MAX)),
        );
    }

    /// Rate scale/attack register (0x50). Attack is reversed.
    pub fn attack_rate_scale(&mut self, operator: Operator, attack: u8, rate_scale: u8) {
        self.emit(
            Target::Operator {
                base: addr::RS_AR,
                operator,
            },
            Encoding::Packed(
                Field::reversed(i16::from(attack), 0, RATE_MAX),
                Field::normal(i16::from(rate_scale), 6),
            ),
        );
    }

    /// AM/first decay register (0x60). Decay is reversed.
    pub fn decay_am(&mut self, operator: Operator, decay: u8, am: bool) {
        self.emit(
            Target::Operator {
                base: addr::AM_D1R,
                operator,
            },
            Encoding::Packed(
                Field::reversed(i16::from(decay), 0, RATE_MAX),
                Field::normal(i16::from(am), 7),
            ),
        );
    }

    /// Sustain level/release register (0x80). Both nibbles reversed.
    pub fn sustain_level_release(&mut self, operator: Operator, sustain_level: u8, release: u8) {
        self.emit(
            Target::Operator {
                base: addr::D1L_RR,
                operator,
            },
            Encoding::Packed(
                Field::reversed(i16::from(sustain_level), 4, NIBBLE_MAX),
                Field::reversed(i16::from(release), 0, NIBBLE_MAX),
            ),
        );
    }

    /// Sustain (second decay) rate register (0x70), reversed.
    pub fn sustain_rate(&mut self, operator: Operator, rate: u8) {
        self.emit(
            Target::Operator {
                base: addr::D2R,
                operator,
            },
            Encoding::Single(Field::reversed(i16::from(rate), 0, RATE_MAX)),
        );
    }

    /// SSG-EG register (0x90). Type 0 disables; type `n` enables mode `n - 1`.
    pub fn ssg_eg(&mut self, operator: Operator, envelope: u8) {
        let encoding = match envelope {
            0 => Encoding::Direct(0),
            n => Encoding::Packed(
                Field::normal(i16::from(n - 1), 0),
                Field::normal(1, 3),
            ),
        };
        self.emit(
            Target::Operator {
                base: addr::SSG_EG,
                operator,
            },
            encoding,
        );
    }

    // -----------------------------------------------------------------------
    // Single-voice writes
    // -----------------------------------------------------------------------

    /// Total level of one operator on one voice slot's channel.
    ///
    /// `level` is the blended output level where 127 is loudest; it is
    /// written reversed.
    pub fn voice_level(&mut self, slot: usize, operator: Operator, level: u8) {
        let register = addr::TL + channel_offset(slot) + OPERATOR_OFFSETS[operator.index()];
        let value = Field::reversed(i16::from(level), 0, TL_MAX).bits();
        self.sink.write(ChannelGroup::for_slot(slot), register, value);
    }

    /// Frequency registers of one voice slot: high byte (block) first.
    pub fn voice_pitch(&mut self, slot: usize, pitch: Pitch) {
        let group = ChannelGroup::for_slot(slot);
        let offset = channel_offset(slot);
        self.sink.write(group, addr::FREQ_HI + offset, pitch.high());
        self.sink.write(group, addr::FREQ_LO + offset, pitch.low());
    }

    /// Key all four operators of a voice slot on.
    pub fn key_on(&mut self, slot: usize) {
        self.sink.write(
            ChannelGroup::FirstThree,
            addr::KEY_ON_OFF,
            KEY_ON_ALL_OPERATORS | KEY_CHANNEL_CODES[slot],
        );
    }

    /// Key all four operators of a voice slot off.
    pub fn key_off(&mut self, slot: usize) {
        self.sink.write(
            ChannelGroup::FirstThree,
            addr::KEY_ON_OFF,
            KEY_CHANNEL_CODES[slot],
        );
    }
}

/// Channel offset of a voice slot within its group.
fn channel_offset(slot: usize) -> u8 {
    (slot % CHANNELS_PER_GROUP) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers::RegisterWrite;
    use crate::testing::RegisterLog;

    fn op(i: u8) -> Operator {
        Operator::new(i).unwrap()
    }

    fn broadcast(register: u8, value: u8) -> Vec<RegisterWrite> {
        let mut expected = Vec::new();
        for group in ChannelGroup::ALL {
            for ch in 0..3 {
                expected.push(RegisterWrite::new(group, register + ch, value));
            }
        }
        expected
    }

    // ── Broadcast layout ─────────────────────────────────────────────

    #[test]
    fn broadcast_emits_six_writes_in_group_order() {
        let mut log = RegisterLog::new();
        RegisterEncoder::new(&mut log).algorithm_feedback(4, 5);
        assert_eq!(log.writes(), broadcast(0xB0, 4 | (5 << 3)).as_slice());
    }

    #[test]
    fn operator_family_uses_operator_offset() {
        let mut log = RegisterLog::new();
        RegisterEncoder::new(&mut log).total_level(op(1), 27);
        assert_eq!(log.writes(), broadcast(0x48, 100).as_slice());
    }

    #[test]
    fn global_family_is_one_write() {
        let mut log = RegisterLog::new();
        RegisterEncoder::new(&mut log).lfo(3);
        assert_eq!(
            log.writes(),
            &[RegisterWrite::new(ChannelGroup::FirstThree, 0x22, 0x0A)]
        );
    }

    // ── Family encodings ─────────────────────────────────────────────

    #[test]
    fn lfo_zero_disables() {
        let mut log = RegisterLog::new();
        RegisterEncoder::new(&mut log).lfo(0);
        assert_eq!(log.values(), vec![0x00]);
    }

    #[test]
    fn lfo_rate_override_sets_enable_bit() {
        let mut log = RegisterLog::new();
        RegisterEncoder::new(&mut log).lfo_rate(7);
        assert_eq!(log.values(), vec![0x0F]);
    }

    #[test]
    fn vibrato_tremolo_keeps_pan_bits() {
        let mut log = RegisterLog::new();
        RegisterEncoder::new(&mut log).vibrato_tremolo(5, 2);
        assert_eq!(log.writes(), broadcast(0xB4, 0xC0 | 5 | (2 << 4)).as_slice());
    }

    #[test]
    fn detune_is_offset_into_upper_nibble() {
        let mut log = RegisterLog::new();
        RegisterEncoder::new(&mut log).multiple_detune(op(0), 10, -3);
        assert_eq!(log.values()[0], 10);

        let mut log = RegisterLog::new();
        RegisterEncoder::new(&mut log).multiple_detune(op(0), 2, 1);
        assert_eq!(log.values()[0], 2 | (4 << 4));
    }

    #[test]
    fn attack_is_reversed_rate_scale_is_not() {
        let mut log = RegisterLog::new();
        RegisterEncoder::new(&mut log).attack_rate_scale(op(2), 0, 3);
        assert_eq!(log.writes()[0].register, 0x54);
        assert_eq!(log.values()[0], 31 | (3 << 6));
    }

    #[test]
    fn decay_reversed_with_am_bit() {
        let mut log = RegisterLog::new();
        RegisterEncoder::new(&mut log).decay_am(op(3), 23, true);
        assert_eq!(log.writes()[0].register, 0x6C);
        assert_eq!(log.values()[0], 8 | 0x80);
    }

    #[test]
    fn sustain_level_and_release_both_reversed() {
        let mut log = RegisterLog::new();
        RegisterEncoder::new(&mut log).sustain_level_release(op(0), 0, 15);
        assert_eq!(log.values()[0], 0xF0);
    }

    #[test]
    fn sustain_rate_reversed() {
        let mut log = RegisterLog::new();
        RegisterEncoder::new(&mut log).sustain_rate(op(0), 29);
        assert_eq!(log.values()[0], 2);
    }

    #[test]
    fn ssg_eg_off_and_on() {
        let mut log = RegisterLog::new();
        RegisterEncoder::new(&mut log).ssg_eg(op(0), 0);
        assert_eq!(log.values()[0], 0);

        let mut log = RegisterLog::new();
        RegisterEncoder::new(&mut log).ssg_eg(op(0), 8);
        assert_eq!(log.values()[0], 0x0F);
    }

    // ── Single-voice writes ──────────────────────────────────────────

    #[test]
    fn voice_level_targets_one_channel() {
        let mut log = RegisterLog::new();
        RegisterEncoder::new(&mut log).voice_level(4, op(1), 100);
        assert_eq!(
            log.writes(),
            &[RegisterWrite::new(ChannelGroup::LastThree, 0x40 + 1 + 0x08, 27)]
        );
    }

    #[test]
    fn voice_pitch_writes_high_then_low() {
        let mut log = RegisterLog::new();
        let pitch = Pitch::from_note(69);
        RegisterEncoder::new(&mut log).voice_pitch(2, pitch);
        assert_eq!(
            log.writes(),
            &[
                RegisterWrite::new(ChannelGroup::FirstThree, 0xA6, pitch.high()),
                RegisterWrite::new(ChannelGroup::FirstThree, 0xA2, pitch.low()),
            ]
        );
    }

    #[test]
    fn key_codes_skip_three() {
        let mut log = RegisterLog::new();
        let mut enc = RegisterEncoder::new(&mut log);
        enc.key_on(3);
        enc.key_off(5);
        assert_eq!(
            log.writes(),
            &[
                RegisterWrite::new(ChannelGroup::FirstThree, 0x28, 0xF4),
                RegisterWrite::new(ChannelGroup::FirstThree, 0x28, 0x06),
            ]
        );
    }
}
