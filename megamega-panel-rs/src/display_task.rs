//! Signal-backed display sink and the OLED refresh task.
//!
//! The synth writes text from interrupt-priority code, while an I2C
//! flush takes about 20 ms. [`SignalDisplay`] therefore only stores the
//! latest [`PanelText`] in an Embassy [`Signal`]; [`display_update_task`]
//! waits on it and does the slow work at thread priority.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embedded_hal_async::i2c::I2c;
use megamega::{DisplaySink, PanelText};

use crate::driver::PanelDriver;
use crate::layout::PanelConfig;

/// Latest text waiting to be drawn.
pub type TextSignal = Signal<CriticalSectionRawMutex, PanelText>;

// ── SignalDisplay ────────────────────────────────────────────────────────

/// [`DisplaySink`] that forwards every update to a [`TextSignal`].
///
/// A newer update replaces one that has not been drawn yet.
#[derive(Clone, Copy)]
pub struct SignalDisplay<'a> {
    signal: &'a TextSignal,
}

impl<'a> SignalDisplay<'a> {
    /// Sink feeding `signal`.
    pub fn new(signal: &'a TextSignal) -> Self {
        Self { signal }
    }
}

impl DisplaySink for SignalDisplay<'_> {
    fn show(&mut self, line1: &str, line2: &str) {
        self.signal.signal(PanelText::new(line1, line2));
    }
}

// ── Display update task ──────────────────────────────────────────────────

/// OLED refresh loop.
///
/// This is a regular `async fn`, **not** an Embassy `#[task]`; wrap it in
/// a concrete task since Embassy tasks cannot be generic:
///
/// ```ignore
/// #[embassy_executor::task]
/// async fn oled_task(driver: PanelDriver<MyConcreteI2cType>, config: PanelConfig) {
///     display_update_task(driver, &TEXT, config).await;
/// }
/// ```
///
/// # Control flow
///
/// 1. Initialise the display hardware.
/// 2. Loop:
///    - wait for the next text on `signal`;
///    - skip it if it matches what is on screen;
///    - render and flush;
///    - sleep one refresh period, so updates arriving meanwhile
///      collapse into the latest one.
///
/// # Errors
///
/// * Initialisation failure: logs the error and **returns** (task exits).
/// * Render / flush failure: logs the error and waits for the next text.
#[allow(clippy::needless_pass_by_value)] // config is small and consumed
pub async fn display_update_task<I2C>(
    mut driver: PanelDriver<I2C>,
    signal: &TextSignal,
    config: PanelConfig,
) where
    I2C: I2c,
{
    if let Err(_e) = driver.init().await {
        #[cfg(feature = "defmt")]
        defmt::error!("{}", _e);
        return;
    }

    #[cfg(feature = "defmt")]
    defmt::info!("OLED initialised");

    let period = embassy_time::Duration::from_millis(config.update_period_ms());
    let mut on_screen: Option<PanelText> = None;

    loop {
        let text = signal.wait().await;
        if on_screen.as_ref() == Some(&text) {
            continue;
        }

        match driver.show(&text, &config).await {
            Ok(()) => on_screen = Some(text),
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::error!("{}", _e);
            }
        }

        embassy_time::Timer::after(period).await;
    }
}
