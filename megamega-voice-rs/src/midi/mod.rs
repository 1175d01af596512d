//! MIDI reassembly and dispatch.
//!
//! ```text
//! UART byte ─► MidiFramer (RingBuffer<u8, 3>) ─► MidiMessage ─► MidiRouter
//!                                                                 │
//!                     VoiceAllocator ◄── note on/off ─────────────┤
//!                     PatchStore     ◄── sustain ─────────────────┤
//!                     RegisterSink   ◄── mod wheel / aftertouch ──┤
//!                                        pitch bend (panic) ──────┘
//! ```

mod framer;
mod message;
mod ring;
mod router;

pub use framer::MidiFramer;
pub use message::{controller, status, MidiMessage};
pub use ring::RingBuffer;
pub use router::{MidiAction, MidiRouter, OVERLAY_DIVISOR};
