//! Control core of the megamega2612 FM synthesizer.
//!
//! This crate turns MIDI bytes, a periodic hardware tick, and a rotary
//! encoder with two buttons into register writes for a YM2612 and two
//! lines of text for a 16×2 display. It owns no hardware: register and
//! display traffic leave through the [`RegisterSink`] and
//! [`DisplaySink`] traits.
//!
//! # Architecture
//!
//! ```text
//!  MIDI bytes ──► MidiFramer ──► MidiRouter ──┬──► VoiceAllocator ──┐
//!                                            │                     │ slots
//!  panel edges ─► PanelDecoder ─► Navigator ─┼──► PatchStore       ▼
//!                                            │        │      TickScheduler ◄── tick
//!                                            ▼        ▼            │
//!                                        RegisterEncoder ◄─────────┘
//!                                               │
//!                                               ▼
//!                                         RegisterSink
//! ```
//!
//! All mutable state lives in one [`Synth`] value. On hardware it is
//! wrapped in [`SharedSynth`], whose three entry points each run inside a
//! single critical section, so the MIDI, tick, and panel interrupts never
//! interleave their reads and writes of the channel slots.
//!
//! # Silent policies
//!
//! Nothing in this crate fails at runtime. Out-of-range parameter values
//! wrap, a note with no free channel is dropped, an unmatched note-off is
//! ignored, and unknown MIDI traffic is discarded. With the `defmt`
//! feature enabled each of these is traced.
//!
//! # Crate Features
//!
//! - **`defmt`**: structured logging and [`defmt::Format`] derives.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod error;
pub mod midi;
pub mod panel;
pub mod patch;
pub mod registers;
pub mod synth;
pub mod voice;

#[cfg(test)]
pub(crate) mod testing;

// ── Re-exports for convenience ───────────────────────────────────────────

pub use config::{SustainPolarity, SynthConfig};
pub use error::ParameterError;
pub use panel::{DisplaySink, Gesture, PanelSample, PanelText};
pub use patch::{FieldId, Operator, PatchStore};
pub use registers::{ChannelGroup, RegisterSink, RegisterWrite};
pub use synth::{SharedSynth, Synth};
pub use voice::{NoteOnOutcome, VoiceAllocator};
