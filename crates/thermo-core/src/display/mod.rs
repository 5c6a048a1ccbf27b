//! SSD1306 OLED output
//!
//! - [`interface`]: control-byte framing over I2C
//! - [`font`]: the 5x8 glyph table
//! - [`screens`]: what goes on each line of the startup, error and sensor screens
//! - [`ssd1306`]: controller setup, addressing and glyph streaming

mod cmd;
pub mod font;
pub mod interface;
pub mod screens;
pub mod ssd1306;

pub use interface::{DisplayInterface, I2cInterface};
pub use screens::{Screen, TextLine};
pub use ssd1306::*;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::ErrorKind;
use thiserror_no_std::Error;

use crate::sensors::SensorReading;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    #[error("SSD1306 not detected at 0x{address:02X}")]
    NotDetected { address: u8 },
    #[error("SSD1306 failed to {operation}: {kind:?}")]
    Transport {
        operation: &'static str,
        kind: ErrorKind,
    },
    #[error("screen line does not fit its buffer")]
    Format,
}

/// Output side of the monitor loop.
pub trait ReadingDisplay {
    fn initialize<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), DisplayError>;

    fn show_startup(&mut self) -> Result<(), DisplayError>;

    fn show_error(&mut self, message: &str) -> Result<(), DisplayError>;

    fn show_reading(&mut self, reading: &SensorReading) -> Result<(), DisplayError>;
}
