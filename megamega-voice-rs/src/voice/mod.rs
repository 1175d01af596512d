//! Channel slots, note allocation and the tick reconciliation step.
//!
//! Note events never touch the key-on register directly. The
//! [`VoiceAllocator`] records intent in a slot's `requested_on` flag and
//! the [`TickScheduler`] turns the difference between `requested_on`
//! and `sounding` into register writes once per tick:
//!
//! ```text
//!            note_on                 tick (on burst)
//!   idle ───────────────► requested ─────────────────► sounding
//!    ▲                                                   │
//!    │      tick (key-off, sustain released)             │ note_off
//!    └────────────────────────────── releasing ◄─────────┘
//! ```
//!
//! The one exception is the retrigger path: a repeated note-on for a
//! note that is already sounding re-keys its slot immediately.

mod allocator;
mod scheduler;
mod slot;

pub use allocator::{NoteOnOutcome, VoiceAllocator};
pub use scheduler::{blended_level, TickReport, TickScheduler};
pub use slot::{ChannelSlot, Pitch, NOTE_FNUMS, SLOT_COUNT};
