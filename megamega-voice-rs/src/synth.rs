//! The synth context: every piece of mutable state in one value.
//!
//! [`Synth`] owns the patch, the voice slots, the MIDI framer, the panel
//! decoder and cursor, and the two sinks. Its entry points are plain
//! `&mut self` methods, so host tests drive it directly.
//!
//! On hardware the MIDI, tick and panel interrupts all need it.
//! [`SharedSynth`] wraps it in a critical-section mutex; each `on_*`
//! entry point holds the lock for its whole body.
//!
//! ```text
//!  on_midi_byte ─┐
//!  on_tick ──────┼──► critical section ──► Synth ──► RegisterSink
//!  on_panel_ ────┘                            └────► DisplaySink
//!   sample
//! ```

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::config::SynthConfig;
use crate::midi::{MidiAction, MidiFramer, MidiMessage, MidiRouter};
use crate::panel::{describe, Cursor, DisplaySink, Gesture, Navigator, PanelDecoder, PanelSample, PanelText};
use crate::patch::{FieldId, PatchStore};
use crate::registers::RegisterSink;
use crate::voice::{TickReport, TickScheduler, VoiceAllocator};

/// All synth state plus the register and display sinks.
pub struct Synth<R, D> {
    config: SynthConfig,
    store: PatchStore,
    voices: VoiceAllocator,
    scheduler: TickScheduler,
    framer: MidiFramer,
    router: MidiRouter,
    decoder: PanelDecoder,
    navigator: Navigator,
    regs: R,
    display: D,
}

impl<R: RegisterSink, D: DisplaySink> Synth<R, D> {
    /// Build the context. Nothing is written to either sink until
    /// [`show_banner()`](Self::show_banner) or [`start()`](Self::start).
    pub fn new(config: SynthConfig, regs: R, display: D) -> Self {
        Self {
            store: PatchStore::new(&config),
            voices: VoiceAllocator::new(),
            scheduler: TickScheduler::new(),
            framer: MidiFramer::new(),
            router: MidiRouter::new(config.sustain_polarity),
            decoder: PanelDecoder::new(),
            navigator: Navigator::new(),
            config,
            regs,
            display,
        }
    }

    /// Show the two configured banner lines.
    pub fn show_banner(&mut self) {
        let [line1, line2] = self.config.banner;
        PanelText::new(line1, line2).show_on(&mut self.display);
    }

    /// Load the configured initial preset (full register burst), move
    /// the cursor to group 0 and draw the first parameter.
    ///
    /// The firmware shows the banner first and calls this once the
    /// banner has been on screen for a moment.
    pub fn start(&mut self) {
        let _preset = self
            .store
            .load_preset(i16::from(self.config.initial_preset), &mut self.regs);

        #[cfg(feature = "defmt")]
        defmt::info!("started with preset {=str}", _preset.name);

        self.navigator.reset();
        self.redraw();
    }

    /// Seed the panel decoder with the input levels read at power-up,
    /// so the first real edge is compared against the right state.
    pub fn seed_panel(&mut self, sample: PanelSample) {
        self.decoder = PanelDecoder::starting_at(sample);
    }

    // ---------------------------------------------------------------------------
    // MIDI
    // ---------------------------------------------------------------------------

    /// Feed one received MIDI byte. Returns what was done once a
    /// message completes.
    pub fn handle_midi_byte(&mut self, byte: u8) -> Option<MidiAction> {
        let message = self.framer.push(byte)?;
        Some(self.handle_midi_message(message))
    }

    /// Apply a complete MIDI message.
    pub fn handle_midi_message(&mut self, message: MidiMessage) -> MidiAction {
        self.router
            .route(message, &mut self.voices, &mut self.store, &mut self.regs)
    }

    // ---------------------------------------------------------------------------
    // Tick
    // ---------------------------------------------------------------------------

    /// Reconcile the voice slots with the chip.
    pub fn tick(&mut self) -> TickReport {
        self.scheduler
            .tick(&mut self.voices, &self.store, &mut self.regs)
    }

    // ---------------------------------------------------------------------------
    // Panel
    // ---------------------------------------------------------------------------

    /// Decode one panel sample and apply the resulting gestures.
    /// Returns the number of gestures applied.
    pub fn handle_panel_sample(&mut self, sample: PanelSample) -> usize {
        let gestures = self.decoder.update(sample);
        for &gesture in &gestures {
            self.apply_gesture(gesture);
        }
        gestures.len()
    }

    /// Apply one gesture and redraw. Returns the field now shown.
    pub fn apply_gesture(&mut self, gesture: Gesture) -> FieldId {
        let field = self
            .navigator
            .apply(gesture, &mut self.store, &mut self.regs);
        self.redraw();
        field
    }

    /// Draw the field under the cursor.
    pub fn redraw(&mut self) {
        let field = self.navigator.cursor().field();
        describe(field, &self.store).show_on(&mut self.display);
    }

    // ---------------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------------

    /// Startup configuration.
    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// Current patch.
    pub fn store(&self) -> &PatchStore {
        &self.store
    }

    /// Voice slots.
    pub fn voices(&self) -> &VoiceAllocator {
        &self.voices
    }

    /// Panel cursor.
    pub fn cursor(&self) -> &Cursor {
        self.navigator.cursor()
    }

    /// The register sink.
    pub fn registers(&self) -> &R {
        &self.regs
    }

    /// The display sink.
    pub fn display(&self) -> &D {
        &self.display
    }
}

/// A [`Synth`] behind a critical-section mutex, shareable between
/// interrupt-driven tasks through a `&'static` reference.
///
/// ```
/// use megamega::{ChannelGroup, DisplaySink, RegisterSink, SharedSynth, Synth, SynthConfig};
///
/// struct Nop;
/// impl RegisterSink for Nop {
///     fn write(&mut self, _: ChannelGroup, _: u8, _: u8) {}
/// }
/// impl DisplaySink for Nop {
///     fn show(&mut self, _: &str, _: &str) {}
/// }
///
/// let shared = SharedSynth::new(Synth::new(SynthConfig::default(), Nop, Nop));
/// shared.start();
/// for byte in [0x90, 60, 100] {
///     shared.on_midi_byte(byte);
/// }
/// assert_eq!(shared.on_tick().keyed_on, 1);
/// ```
pub struct SharedSynth<R, D> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Synth<R, D>>>,
}

impl<R: RegisterSink, D: DisplaySink> SharedSynth<R, D> {
    /// Wrap `synth`.
    pub const fn new(synth: Synth<R, D>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(synth)),
        }
    }

    /// Run `f` with exclusive access inside one critical section.
    pub fn lock<U>(&self, f: impl FnOnce(&mut Synth<R, D>) -> U) -> U {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }

    /// See [`Synth::start()`].
    pub fn start(&self) {
        self.lock(Synth::start)
    }

    /// See [`Synth::show_banner()`].
    pub fn show_banner(&self) {
        self.lock(Synth::show_banner)
    }

    /// MIDI byte entry point.
    pub fn on_midi_byte(&self, byte: u8) -> Option<MidiAction> {
        self.lock(|synth| synth.handle_midi_byte(byte))
    }

    /// Tick entry point.
    pub fn on_tick(&self) -> TickReport {
        self.lock(Synth::tick)
    }

    /// Panel edge entry point.
    pub fn on_panel_sample(&self, sample: PanelSample) -> usize {
        self.lock(|synth| synth.handle_panel_sample(sample))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SustainPolarity;
    use crate::patch::Operator;
    use crate::registers::{addr, ChannelGroup, RegisterWrite};
    use crate::testing::{DisplayLog, RegisterLog};
    use crate::voice::NoteOnOutcome;

    type TestSynth = Synth<RegisterLog, DisplayLog>;

    fn synth() -> TestSynth {
        Synth::new(SynthConfig::default(), RegisterLog::new(), DisplayLog::new())
    }

    fn started() -> TestSynth {
        let mut s = synth();
        s.start();
        s.regs.clear();
        s
    }

    fn midi(s: &mut TestSynth, bytes: &[u8]) -> Option<MidiAction> {
        bytes.iter().filter_map(|&b| s.handle_midi_byte(b)).last()
    }

    fn shown(s: &TestSynth) -> (&str, &str) {
        s.display().lines().unwrap_or(("", ""))
    }

    fn press(button_a: bool, button_b: bool) -> PanelSample {
        PanelSample { button_a, button_b, ..PanelSample::IDLE }
    }

    // ── Startup ──────────────────────────────────────────────────────

    #[test]
    fn new_writes_nothing() {
        let s = synth();
        assert!(s.registers().writes().is_empty());
        assert_eq!(s.display().count(), 0);
    }

    #[test]
    fn banner_uses_config() {
        let mut s = synth();
        s.show_banner();
        assert_eq!(shown(&s), ("  megamega2612", " FM synthesizer"));
    }

    #[test]
    fn start_loads_initial_preset_and_draws_group_zero() {
        let mut s = synth();
        s.start();
        assert_eq!(s.registers().writes().len(), 181);
        assert_eq!(s.store().preset_name(), "one operator");
        assert_eq!(s.store().get(FieldId::Algorithm), 7);
        assert_eq!(shown(&s), ("preset patch:", "one operator"));
        assert_eq!(s.cursor().field(), FieldId::Preset);
    }

    #[test]
    fn start_honours_configured_preset() {
        let config = SynthConfig {
            initial_preset: 0,
            ..SynthConfig::default()
        };
        let mut s = Synth::new(config, RegisterLog::new(), DisplayLog::new());
        s.start();
        assert_eq!(s.store().preset(), 0);
    }

    // ── MIDI and tick ────────────────────────────────────────────────

    #[test]
    fn note_plays_on_next_tick() {
        let mut s = started();
        assert_eq!(
            midi(&mut s, &[0x90, 60, 100]),
            Some(MidiAction::NoteOn(NoteOnOutcome::Assigned(0)))
        );
        assert!(s.registers().writes().is_empty());

        let report = s.tick();
        assert_eq!(report.keyed_on, 1);
        let writes = s.registers().writes();
        assert_eq!(writes.len(), 7);
        assert_eq!(
            writes.last(),
            Some(&RegisterWrite::new(ChannelGroup::FirstThree, addr::KEY_ON_OFF, 0xF0))
        );

        s.regs.clear();
        assert!(s.tick().is_idle());
        assert!(s.registers().writes().is_empty());
    }

    #[test]
    fn note_off_keys_off_on_next_tick() {
        let mut s = started();
        midi(&mut s, &[0x90, 60, 100]);
        s.tick();
        assert_eq!(midi(&mut s, &[0x80, 60, 0]), Some(MidiAction::NoteOff(Some(0))));
        s.regs.clear();
        assert_eq!(s.tick().keyed_off, 1);
        assert_eq!(
            s.registers().writes(),
            &[RegisterWrite::new(ChannelGroup::FirstThree, addr::KEY_ON_OFF, 0)]
        );
        assert!(s.voices().slots()[0].is_free());
    }

    #[test]
    fn sustain_defers_key_off_until_release() {
        let mut s = started();
        midi(&mut s, &[0x90, 64, 90]);
        s.tick();
        midi(&mut s, &[0xB0, 64, 127]);
        midi(&mut s, &[0x80, 64, 0]);
        s.regs.clear();
        for _ in 0..3 {
            assert_eq!(s.tick().sustained, 1);
        }
        assert!(s.registers().writes().is_empty());

        midi(&mut s, &[0xB0, 64, 0]);
        assert_eq!(s.tick().keyed_off, 1);
        assert_eq!(s.registers().writes().len(), 1);
    }

    #[test]
    fn inverted_sustain_polarity() {
        let config = SynthConfig {
            sustain_polarity: SustainPolarity::Inverted,
            ..SynthConfig::default()
        };
        let mut s = Synth::new(config, RegisterLog::new(), DisplayLog::new());
        assert_eq!(midi(&mut s, &[0xB0, 64, 0]), Some(MidiAction::Sustain(true)));
        assert!(s.store().sustain());
    }

    #[test]
    fn pitch_bend_silences_everything() {
        let mut s = started();
        midi(&mut s, &[0x90, 60, 100, 0x90, 64, 100]);
        s.tick();
        s.regs.clear();
        assert_eq!(midi(&mut s, &[0xE0, 0, 64]), Some(MidiAction::Panic));
        assert_eq!(s.registers().writes().len(), 6);
        assert_eq!(s.voices().active_count(), 0);
    }

    #[test]
    fn low_velocity_is_floored() {
        let mut s = started();
        midi(&mut s, &[0x90, 60, 10]);
        assert_eq!(s.voices().slots()[0].velocity, 50);
    }

    // ── Panel ────────────────────────────────────────────────────────

    #[test]
    fn tap_b_shows_next_group() {
        let mut s = started();
        assert_eq!(s.handle_panel_sample(press(false, true)), 0);
        assert_eq!(s.handle_panel_sample(PanelSample::IDLE), 1);
        assert_eq!(shown(&s), ("algorithm 8:", "1~, 2~, 3~, 4~"));
        assert!(s.registers().writes().is_empty());
    }

    #[test]
    fn detent_edits_value_and_writes_registers() {
        let mut s = started();
        s.apply_gesture(Gesture::GroupForward);
        s.apply_gesture(Gesture::ParameterStep(1));
        // one clockwise detent: 11 -> 01
        let applied = s.handle_panel_sample(PanelSample { enc_a: false, ..PanelSample::IDLE });
        assert_eq!(applied, 1);
        assert_eq!(s.store().get(FieldId::Feedback), 1);
        assert_eq!(shown(&s), ("feedback:", "1"));
        assert_eq!(s.registers().writes().len(), 6);
    }

    #[test]
    fn operator_selection_changes_display() {
        let mut s = started();
        s.apply_gesture(Gesture::GroupForward);
        s.apply_gesture(Gesture::ParameterStep(4));
        s.apply_gesture(Gesture::OperatorStep(3));
        assert_eq!(s.cursor().field(), FieldId::TotalLevel(Operator::ALL[3]));
        assert_eq!(shown(&s), ("op 4 level:", "127"));
    }

    #[test]
    fn panel_edits_preset() {
        let mut s = started();
        s.apply_gesture(Gesture::ValueStep(1));
        assert_eq!(s.store().preset(), 16);
        assert_eq!(s.registers().writes().len(), 181);
        assert_eq!(shown(&s).0, "preset patch:");
    }

    // ── Shared ───────────────────────────────────────────────────────

    #[test]
    fn shared_entry_points_reach_the_same_state() {
        let shared = SharedSynth::new(synth());
        shared.start();
        shared.on_midi_byte(0x90);
        shared.on_midi_byte(60);
        assert_eq!(
            shared.on_midi_byte(100),
            Some(MidiAction::NoteOn(NoteOnOutcome::Assigned(0)))
        );
        assert_eq!(shared.on_tick().keyed_on, 1);
        assert_eq!(shared.on_panel_sample(press(true, false)), 0);
        assert_eq!(shared.on_panel_sample(PanelSample::IDLE), 1);
        shared.lock(|s| {
            assert_eq!(s.cursor().group().index(), 3);
            assert_eq!(s.voices().active_count(), 1);
        });
    }

    #[test]
    fn entry_points_under_contention_leave_no_voice_stuck() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::thread;

        const CHORDS: u8 = 200;
        const TAPS: usize = 300;

        let shared: &'static SharedSynth<RegisterLog, DisplayLog> =
            Box::leak(Box::new(SharedSynth::new(synth())));
        shared.start();
        shared.lock(|s| s.regs.clear());
        let midi_done: &'static AtomicBool = Box::leak(Box::new(AtomicBool::new(false)));

        // Three-note chords. Each note-off waits until the tick has keyed
        // the note on; a release before that would match no slot.
        let midi = thread::spawn(move || {
            for i in 0..CHORDS {
                let chord = [36 + i % 48, 37 + i % 48, 38 + i % 48];
                for note in chord {
                    for byte in [0x90, note, 100] {
                        shared.on_midi_byte(byte);
                    }
                }
                while !shared.lock(|s| {
                    chord
                        .iter()
                        .all(|&n| s.voices().slots().iter().any(|slot| slot.is_playing(n)))
                }) {
                    thread::yield_now();
                }
                for note in chord {
                    for byte in [0x80, note, 0] {
                        shared.on_midi_byte(byte);
                    }
                }
            }
            midi_done.store(true, Ordering::Release);
        });

        let ticker = thread::spawn(move || {
            let (mut on, mut off) = (0u32, 0u32);
            while !midi_done.load(Ordering::Acquire) {
                let report = shared.on_tick();
                on += u32::from(report.keyed_on);
                off += u32::from(report.keyed_off);
                thread::yield_now();
            }
            (on, off)
        });

        // Equal numbers of A (back) and B (forward) taps.
        let panel = thread::spawn(move || {
            let mut applied = 0;
            for i in 0..TAPS {
                applied += shared.on_panel_sample(press(i % 2 == 0, i % 2 == 1));
                applied += shared.on_panel_sample(PanelSample::IDLE);
            }
            applied
        });

        midi.join().unwrap();
        let (mut on, mut off) = ticker.join().unwrap();
        assert_eq!(panel.join().unwrap(), TAPS);

        for _ in 0..2 {
            let report = shared.on_tick();
            on += u32::from(report.keyed_on);
            off += u32::from(report.keyed_off);
        }

        assert_eq!(on, 3 * u32::from(CHORDS));
        assert_eq!(on, off);
        shared.lock(|s| {
            assert!(s.voices().slots().iter().all(|slot| slot.is_free()));
            assert_eq!(s.cursor().group().index(), 0);

            let keys: Vec<u8> = s
                .registers()
                .writes()
                .iter()
                .filter(|w| w.register == addr::KEY_ON_OFF)
                .map(|w| w.value)
                .collect();
            let key_ons = keys.iter().filter(|&&v| v & 0xF0 != 0).count();
            assert_eq!(key_ons, 3 * usize::from(CHORDS));
            assert_eq!(keys.len(), 2 * key_ons);
        });
    }
}
