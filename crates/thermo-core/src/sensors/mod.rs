mod aht10;

pub use aht10::*;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::ErrorKind;
use thiserror_no_std::Error;

use crate::metrics::ComfortLevel;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    #[error("{sensor} not detected on the bus")]
    NotDetected { sensor: &'static str },
    #[error("{sensor} failed to {operation}: {kind:?}")]
    Transport {
        sensor: &'static str,
        operation: &'static str,
        kind: ErrorKind,
    },
    #[error("{sensor} timed out while trying to {operation}")]
    Timeout {
        sensor: &'static str,
        operation: &'static str,
    },
    #[error("{sensor} reported busy in its measurement frame")]
    StaleData { sensor: &'static str },
    #[error("{sensor} used before initialization")]
    NotReady { sensor: &'static str },
}

/// One temperature/humidity sample.
///
/// A reading with `valid == false` is the result of a failed read; its numeric
/// fields are NaN and must not be shown as data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    /// Degrees Celsius
    pub temperature: f32,
    /// Relative humidity in percent, within [0, 100]
    pub humidity: f32,
    pub valid: bool,
}

impl SensorReading {
    pub const fn new(temperature: f32, humidity: f32) -> Self {
        Self {
            temperature,
            humidity,
            valid: true,
        }
    }

    pub const fn invalid() -> Self {
        Self {
            temperature: f32::NAN,
            humidity: f32::NAN,
            valid: false,
        }
    }

    /// Comfort zone for this reading, `None` when the reading is invalid.
    pub fn comfort(&self) -> Option<ComfortLevel> {
        self.valid
            .then(|| ComfortLevel::assess(self.temperature, self.humidity))
    }
}

/// Blocking temperature/humidity sensor.
///
/// The monitor loop only talks to the sensor through this trait so it can be
/// driven by a fake in tests.
pub trait Sensor {
    /// Check that the device answers on the bus.
    fn detect(&mut self) -> bool;

    /// Run the full power-up handshake. Must succeed before any read.
    fn initialize<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), SensorError>;

    /// Take one measurement. Failures yield an invalid reading.
    fn read_measurement<D: DelayNs>(&mut self, delay: &mut D) -> SensorReading;
}
