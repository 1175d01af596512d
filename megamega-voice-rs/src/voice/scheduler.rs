use super::allocator::VoiceAllocator;
use crate::patch::{Operator, PatchStore};
use crate::registers::{RegisterEncoder, RegisterSink};

/// Blend a note's velocity with an operator's total level.
///
/// `sensitivity` 0 uses the stored level alone, 10 uses the velocity
/// alone; values in between are a weighted average truncated toward zero.
///
/// ```
/// use megamega::voice::blended_level;
///
/// assert_eq!(blended_level(0, 127, 40), 40);
/// assert_eq!(blended_level(10, 127, 40), 127);
/// assert_eq!(blended_level(2, 100, 0), 20);
/// ```
pub fn blended_level(sensitivity: u8, velocity: u8, total_level: u8) -> u8 {
    let sensitivity = u16::from(sensitivity.min(10));
    let mix = sensitivity * u16::from(velocity) + (10 - sensitivity) * u16::from(total_level);
    (mix / 10) as u8
}

/// What one tick wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    /// Slots keyed on this tick.
    pub keyed_on: u8,
    /// Slots keyed off this tick.
    pub keyed_off: u8,
    /// Released slots held back by the sustain pedal.
    pub sustained: u8,
}

impl TickReport {
    /// Returns `true` if the tick wrote no registers.
    pub fn is_idle(&self) -> bool {
        self.keyed_on == 0 && self.keyed_off == 0
    }
}

/// Periodic reconciliation of requested and sounding state.
///
/// Each tick visits slots 0–5 in order:
///
/// - requested but not sounding: write the four blended operator
///   levels, the pitch, then key-on, and mark the slot sounding;
/// - sounding but no longer requested: unless sustain is held, key-off
///   and return the slot to idle.
///
/// Slots in a stable state produce no writes, so back-to-back ticks
/// with no note events in between write nothing the second time.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickScheduler {
    ticks: u32,
}

impl TickScheduler {
    /// Scheduler with a zeroed tick counter.
    pub const fn new() -> Self {
        Self { ticks: 0 }
    }

    /// Ticks run so far (wrapping).
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Run one reconciliation pass.
    pub fn tick<S>(
        &mut self,
        voices: &mut VoiceAllocator,
        store: &PatchStore,
        sink: &mut S,
    ) -> TickReport
    where
        S: RegisterSink + ?Sized,
    {
        self.ticks = self.ticks.wrapping_add(1);

        let mut report = TickReport::default();
        let mut enc = RegisterEncoder::new(sink);
        let sensitivity = store.velocity_sensitivity();

        for (index, slot) in voices.slots_mut().iter_mut().enumerate() {
            if slot.requested_on && !slot.sounding {
                for op in Operator::ALL {
                    let total_level = store.operator(op).total_level;
                    enc.voice_level(index, op, blended_level(sensitivity, slot.velocity, total_level));
                }
                enc.voice_pitch(index, slot.pitch);
                enc.key_on(index);
                slot.sounding = true;
                slot.held_ticks = 0;
                report.keyed_on += 1;
            } else if slot.is_releasing() {
                if store.sustain() {
                    slot.held_ticks = slot.held_ticks.saturating_add(1);
                    report.sustained += 1;
                } else {
                    enc.key_off(index);
                    slot.clear();
                    report.keyed_off += 1;
                }
            } else if slot.sounding {
                slot.held_ticks = slot.held_ticks.saturating_add(1);
            }
        }

        #[cfg(feature = "defmt")]
        if !report.is_idle() {
            defmt::trace!(
                "tick {=u32}: {=u8} on, {=u8} off",
                self.ticks,
                report.keyed_on,
                report.keyed_off
            );
        }

        report
    }
}
