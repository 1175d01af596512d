//! SSD1306 driver in async buffered graphics mode.
//!
//! [`PanelDriver`] owns the display: construction without bus traffic,
//! explicit async initialisation, then draw-and-flush of whole frames.

use display_interface_i2c::I2CInterface;
use embedded_hal_async::i2c::I2c;
use megamega::PanelText;
use ssd1306::{
    mode::BufferedGraphicsModeAsync, prelude::*, I2CDisplayInterface, Ssd1306Async,
};

use crate::error::PanelError;
use crate::layout::{render_lines, PanelConfig};

/// Concrete display type used by [`PanelDriver`].
pub type Display<I2C> = Ssd1306Async<
    I2CInterface<I2C>,
    DisplaySize128x64,
    BufferedGraphicsModeAsync<DisplaySize128x64>,
>;

/// Async driver for the 128×64 OLED over I2C.
///
/// # Lifecycle
///
/// 1. [`PanelDriver::new()`]: no I2C traffic.
/// 2. [`PanelDriver::init()`]: sends the SSD1306 initialisation sequence.
/// 3. [`PanelDriver::show()`]: renders two lines and flushes the frame.
///
/// ```no_run
/// use megamega::PanelText;
/// use megamega_panel::{PanelConfig, PanelDriver};
///
/// # async fn example(i2c: impl embedded_hal_async::i2c::I2c) {
/// let mut oled = PanelDriver::new(i2c, 0x3C);
/// oled.init().await.unwrap();
/// let text = PanelText::new("preset patch:", "one operator");
/// oled.show(&text, &PanelConfig::default()).await.unwrap();
/// # }
/// ```
pub struct PanelDriver<I2C> {
    display: Display<I2C>,
    initialized: bool,
}

impl<I2C> PanelDriver<I2C>
where
    I2C: I2c,
{
    /// Construct an uninitialised driver.
    ///
    /// # Arguments
    /// * `i2c`: I2C peripheral (owned for exclusive access).
    /// * `address`: 7-bit device address (usually `0x3C`).
    pub fn new(i2c: I2C, address: u8) -> Self {
        let interface = I2CDisplayInterface::new_custom_address(i2c, address);
        let display = Ssd1306Async::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();

        Self {
            display,
            initialized: false,
        }
    }

    /// Initialise the SSD1306 hardware. Call once before [`show()`](Self::show).
    ///
    /// # Errors
    ///
    /// [`PanelError::Init`] if the display does not respond.
    pub async fn init(&mut self) -> Result<(), PanelError> {
        self.display.init().await.map_err(PanelError::Init)?;
        self.initialized = true;
        Ok(())
    }

    /// Replace the screen contents with `text`.
    ///
    /// Clears the frame buffer, draws both lines and flushes (about
    /// 20 ms at 400 kHz).
    ///
    /// # Errors
    ///
    /// [`PanelError::NotInitialized`] before a successful
    /// [`init()`](Self::init); [`PanelError::Render`] or
    /// [`PanelError::Flush`] on a bus failure.
    pub async fn show(&mut self, text: &PanelText, config: &PanelConfig) -> Result<(), PanelError> {
        if !self.initialized {
            return Err(PanelError::NotInitialized);
        }
        self.display.clear_buffer();
        render_lines(&mut self.display, text, config).map_err(PanelError::Render)?;
        self.display.flush().await.map_err(PanelError::Flush)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use embedded_hal_async::i2c::{ErrorKind, ErrorType, NoAcknowledgeSource, Operation};

    /// I2C bus that acknowledges every transfer, or none.
    struct Bus {
        ack: bool,
    }

    impl Bus {
        fn new(ack: bool) -> Self {
            Self { ack }
        }
    }

    impl ErrorType for Bus {
        type Error = ErrorKind;
    }

    impl I2c for Bus {
        async fn transaction(
            &mut self,
            _address: u8,
            _operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if self.ack {
                Ok(())
            } else {
                Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address))
            }
        }
    }

    fn text() -> PanelText {
        PanelText::new("preset patch:", "one operator")
    }

    #[test]
    fn missing_display_fails_init() {
        let mut oled = PanelDriver::new(Bus::new(false), 0x3C);
        let err = block_on(oled.init()).unwrap_err();
        assert!(matches!(err, PanelError::Init(_)));
    }

    #[test]
    fn show_before_init_is_rejected() {
        let mut oled = PanelDriver::new(Bus::new(true), 0x3C);
        let err = block_on(oled.show(&text(), &PanelConfig::default())).unwrap_err();
        assert!(matches!(err, PanelError::NotInitialized));
    }

    #[test]
    fn show_after_init_flushes() {
        let mut oled = PanelDriver::new(Bus::new(true), 0x3C);
        block_on(oled.init()).unwrap();
        block_on(oled.show(&text(), &PanelConfig::default())).unwrap();
    }
}
