//! YM2612 register map and the register sink seam.
//!
//! The YM2612 exposes its six channels as two banks of three. Every
//! write therefore names a [`ChannelGroup`] (which bank), a register
//! address, and a data byte. Per-channel registers add the channel
//! offset (0–2) within the bank to the base address; per-operator
//! registers additionally add [`OPERATOR_OFFSETS`].
//!
//! This module holds the address constants and the [`RegisterSink`]
//! trait. The translation from parameter values to bytes lives in
//! [`encoding`] and [`RegisterEncoder`].

mod encoder;
pub mod encoding;

pub use encoder::RegisterEncoder;
pub use encoding::{Encoding, Field, Polarity, Target};

/// Register addresses used by this crate.
///
/// Per-channel and per-operator addresses are base addresses: add the
/// channel offset and, where relevant, the operator offset.
pub mod addr {
    /// LFO enable and frequency (global).
    pub const LFO: u8 = 0x22;
    /// Key on/off (global, always written with the first group flag).
    pub const KEY_ON_OFF: u8 = 0x28;
    /// Detune and frequency multiple.
    pub const DT_MUL: u8 = 0x30;
    /// Total level.
    pub const TL: u8 = 0x40;
    /// Rate scaling and attack rate.
    pub const RS_AR: u8 = 0x50;
    /// Amplitude modulation enable and first decay rate.
    pub const AM_D1R: u8 = 0x60;
    /// Second decay (sustain) rate.
    pub const D2R: u8 = 0x70;
    /// First decay level (sustain level) and release rate.
    pub const D1L_RR: u8 = 0x80;
    /// SSG-EG envelope mode.
    pub const SSG_EG: u8 = 0x90;
    /// Frequency number, low 8 bits.
    pub const FREQ_LO: u8 = 0xA0;
    /// Block and frequency number, high 3 bits.
    pub const FREQ_HI: u8 = 0xA4;
    /// Feedback and algorithm.
    pub const FB_ALG: u8 = 0xB0;
    /// Stereo pan, AM sensitivity and FM sensitivity.
    pub const PAN_AMS_FMS: u8 = 0xB4;
}

/// Address offset of each operator within a per-operator register block.
///
/// The chip orders operator slots 1, 3, 2, 4, hence the non-monotonic table.
pub const OPERATOR_OFFSETS: [u8; 4] = [0x00, 0x08, 0x04, 0x0C];

/// Channel code written to [`addr::KEY_ON_OFF`] for each voice slot.
///
/// Bit 2 selects the second bank, so code 3 is unused.
pub const KEY_CHANNEL_CODES: [u8; 6] = [0, 1, 2, 4, 5, 6];

/// Upper nibble of a key-on write: all four operators keyed.
pub const KEY_ON_ALL_OPERATORS: u8 = 0xF0;

/// Bits 6–7 of [`addr::PAN_AMS_FMS`]: left and right outputs enabled.
pub const PAN_BOTH: u8 = 0xC0;

/// Enable bit shared by the LFO and SSG-EG registers.
pub const ENABLE_BIT: u8 = 0x08;

/// Number of channels in one [`ChannelGroup`].
pub const CHANNELS_PER_GROUP: usize = 3;

/// One of the YM2612's two three-channel register banks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelGroup {
    /// Channels 1–3 (voice slots 0–2).
    FirstThree,
    /// Channels 4–6 (voice slots 3–5).
    LastThree,
}

impl ChannelGroup {
    /// Both groups, in broadcast order.
    pub const ALL: [ChannelGroup; 2] = [ChannelGroup::FirstThree, ChannelGroup::LastThree];

    /// The group that hosts voice slot `slot` (0–5).
    pub fn for_slot(slot: usize) -> Self {
        if slot < CHANNELS_PER_GROUP {
            ChannelGroup::FirstThree
        } else {
            ChannelGroup::LastThree
        }
    }

    /// Wire flag used by the register bridge: 0 for the first group,
    /// 1 for the last.
    pub fn flag(self) -> u8 {
        match self {
            ChannelGroup::FirstThree => 0,
            ChannelGroup::LastThree => 1,
        }
    }
}

/// Destination for register writes.
///
/// Implementations must be synchronous and fast relative to the tick
/// period; there is no queueing or backpressure.
pub trait RegisterSink {
    /// Write `value` to `register` in bank `group`.
    fn write(&mut self, group: ChannelGroup, register: u8, value: u8);
}

impl<S: RegisterSink + ?Sized> RegisterSink for &mut S {
    fn write(&mut self, group: ChannelGroup, register: u8, value: u8) {
        (**self).write(group, register, value);
    }
}

/// One register write, as a plain value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterWrite {
    /// Register bank.
    pub group: ChannelGroup,
    /// Register address (base + offsets).
    pub register: u8,
    /// Data byte.
    pub value: u8,
}

impl RegisterWrite {
    /// Convenience constructor.
    pub const fn new(group: ChannelGroup, register: u8, value: u8) -> Self {
        Self {
            group,
            register,
            value,
        }
    }
}
