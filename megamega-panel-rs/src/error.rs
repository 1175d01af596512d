//! Error types for the OLED panel.

use display_interface::DisplayError;

/// Where a panel update failed.
///
/// `ssd1306` reports every bus problem as a [`DisplayError`]; the
/// variant records which step of the driver hit it.
#[derive(Debug)]
pub enum PanelError {
    /// The SSD1306 did not take its initialisation sequence. Usually the
    /// module is missing or sits at another address than configured.
    Init(DisplayError),
    /// Drawing the text into the frame buffer failed.
    Render(DisplayError),
    /// Sending the frame buffer over I2C failed. The next update
    /// redraws the whole frame.
    Flush(DisplayError),
    /// [`PanelDriver::show()`](crate::PanelDriver::show) was called
    /// before [`PanelDriver::init()`](crate::PanelDriver::init) succeeded.
    NotInitialized,
}

#[cfg(feature = "defmt")]
impl defmt::Format for PanelError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            PanelError::Init(e) => defmt::write!(f, "OLED init: {}", defmt::Debug2Format(e)),
            PanelError::Render(e) => defmt::write!(f, "OLED render: {}", defmt::Debug2Format(e)),
            PanelError::Flush(e) => defmt::write!(f, "OLED flush: {}", defmt::Debug2Format(e)),
            PanelError::NotInitialized => defmt::write!(f, "OLED not initialised"),
        }
    }
}
