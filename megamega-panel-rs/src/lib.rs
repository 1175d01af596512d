//! Two-line text panel for the megamega2612 on an SSD1306 (128×64) OLED.
//!
//! The synth core describes its user interface as two lines of at most
//! 16 characters ([`PanelText`]). This crate draws them:
//!
//! - [`PanelDriver`] wraps the [`ssd1306`] crate in async buffered
//!   graphics mode;
//! - [`render_lines`] draws a [`PanelText`] with `embedded-graphics`,
//!   using the geometry in [`PanelConfig`];
//! - with the `task` feature, [`SignalDisplay`] is a [`DisplaySink`]
//!   that hands each update to [`display_update_task`] through an
//!   Embassy `Signal`. Only the latest text is kept, so a burst of edits
//!   costs one redraw.
//!
//! # Quick Start
//!
//! ```ignore
//! use megamega_panel::{display_update_task, PanelConfig, PanelDriver, SignalDisplay, TextSignal};
//!
//! static TEXT: TextSignal = TextSignal::new();
//!
//! // Hand this to the synth as its display sink:
//! let display = SignalDisplay::new(&TEXT);
//!
//! // Thin task wrapper (Embassy tasks cannot be generic):
//! #[embassy_executor::task]
//! async fn oled_task(driver: PanelDriver<MyI2cType>, config: PanelConfig) {
//!     display_update_task(driver, &TEXT, config).await;
//! }
//! ```
//!
//! # Crate Features
//!
//! - **`defmt`**: structured logging via [`defmt`]. Enabled by the firmware; host tests build without it.
//! - **`task`**: [`SignalDisplay`] and [`display_update_task`].
//!
//! [`PanelText`]: megamega::PanelText
//! [`DisplaySink`]: megamega::DisplaySink

#![cfg_attr(not(test), no_std)]

#[cfg(feature = "task")]
pub mod display_task;
pub mod driver;
pub mod error;
pub mod layout;

// ── Re-exports for convenience ───────────────────────────────────────────

#[cfg(feature = "task")]
pub use display_task::{display_update_task, SignalDisplay, TextSignal};
pub use driver::PanelDriver;
pub use error::PanelError;
pub use layout::{render_lines, PanelConfig};
