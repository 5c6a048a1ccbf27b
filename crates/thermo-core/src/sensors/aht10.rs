//! AHT10 temperature and humidity sensor driver.
//!
//! ```text
//!   settle 100 ms
//!        │
//!        ▼
//!   status 0x71 ──► no answer ──► NotDetected
//!        │
//!        ▼
//!   soft reset 0xBA, wait 20 ms
//!        │
//!        ▼
//!   calibrate 0xE1 0x08 0x00, wait 300 ms
//!        │
//!        ▼
//!   status 0x71 (CALIBRATED bit only logged)
//!        │
//!        ▼
//!      Ready ──► trigger 0xAC 0x33 0x00, wait 80 ms
//!                     │
//!                     ▼
//!                poll status every 1 ms, at most 100 times
//!                     │
//!                     ▼
//!                read 6 bytes: status, 20 bit humidity, 20 bit temperature
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{Error as _, I2c};
use log::{debug, error, info, warn};

use super::{Sensor, SensorError, SensorReading};
use crate::config::{AHT10_ADDRESS, SENSOR_BUS};

const SENSOR_NAME: &str = "AHT10";

const BUS_SETTLE_MS: u32 = 100;
const SOFT_RESET_MS: u32 = 20;
const CALIBRATION_MS: u32 = 300;
const CONVERSION_MS: u32 = 80;
const READY_POLL_INTERVAL_MS: u32 = 1;

/// Number of status polls before a measurement is abandoned.
pub const MAX_READY_POLLS: u32 = 100;

/// 2^20, the full scale of both 20-bit channels.
const FULL_SCALE: f32 = 1_048_576.0;

/// Command bytes understood by the AHT10.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    /// Initialize and calibrate, takes the parameters `0x08 0x00`.
    Initialize = 0xE1,
    /// Start a conversion, takes the parameters `0x33 0x00`.
    TriggerMeasurement = 0xAC,
    SoftReset = 0xBA,
    ReadStatus = 0x71,
}

/// Status byte returned by the sensor, both on its own and as the first byte
/// of every measurement frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusByte(pub u8);

impl StatusByte {
    pub const BUSY: u8 = 0x80;
    pub const CALIBRATED: u8 = 0x08;

    pub const fn is_busy(self) -> bool {
        self.0 & Self::BUSY != 0
    }

    pub const fn is_calibrated(self) -> bool {
        self.0 & Self::CALIBRATED != 0
    }
}

/// Lifecycle of the driver. Measurements are only allowed in `Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorState {
    Uninitialized,
    Detecting,
    Resetting,
    Calibrating,
    Ready,
}

/// Decode a 6-byte measurement frame.
///
/// Returns `None` when the frame's status byte still has BUSY set, which means
/// the data bytes are stale.
pub fn decode_frame(frame: &[u8; 6]) -> Option<SensorReading> {
    if StatusByte(frame[0]).is_busy() {
        return None;
    }

    let humidity_raw =
        (u32::from(frame[1]) << 12) | (u32::from(frame[2]) << 4) | (u32::from(frame[3]) >> 4);
    let temperature_raw =
        ((u32::from(frame[3]) & 0x0F) << 16) | (u32::from(frame[4]) << 8) | u32::from(frame[5]);

    let humidity = (humidity_raw as f32 * 100.0 / FULL_SCALE).clamp(0.0, 100.0);
    let temperature = temperature_raw as f32 * 200.0 / FULL_SCALE - 50.0;

    Some(SensorReading::new(temperature, humidity))
}

pub struct Aht10<I> {
    i2c: I,
    state: SensorState,
}

impl<I: I2c> Aht10<I> {
    pub fn new(i2c: I) -> Self {
        Self {
            i2c,
            state: SensorState::Uninitialized,
        }
    }

    pub fn state(&self) -> SensorState {
        self.state
    }

    /// Give the bus back.
    pub fn release(self) -> I {
        self.i2c
    }

    /// Check whether the sensor answers a status query.
    ///
    /// Only logs; the driver state is left untouched.
    pub fn detect(&mut self) -> bool {
        debug!("Probing AHT10 at 0x{:02X}", AHT10_ADDRESS);
        match self.read_status() {
            Ok(status) => {
                info!(
                    "AHT10 found at 0x{:02X}, initial status 0x{:02X}",
                    AHT10_ADDRESS, status.0
                );
                true
            }
            Err(e) => {
                warn!("AHT10 not found: {}", e);
                warn!(
                    "Check wiring (SDA=GPIO{}, SCL=GPIO{}), the 3.3V supply and the I2C pull-ups",
                    SENSOR_BUS.sda_pin, SENSOR_BUS.scl_pin
                );
                false
            }
        }
    }

    /// Run the power-up handshake: detect, soft reset, calibrate.
    ///
    /// Any bus failure leaves the driver `Uninitialized`. The final calibration
    /// check only logs.
    pub fn initialize<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), SensorError> {
        info!("Initializing AHT10");
        self.state = SensorState::Uninitialized;
        delay.delay_ms(BUS_SETTLE_MS);

        match self.run_init_sequence(delay) {
            Ok(()) => {
                self.state = SensorState::Ready;
                info!("AHT10 initialized and ready");
                Ok(())
            }
            Err(e) => {
                self.state = SensorState::Uninitialized;
                error!("AHT10 initialization failed: {}", e);
                Err(e)
            }
        }
    }

    fn run_init_sequence<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), SensorError> {
        self.state = SensorState::Detecting;
        if !self.detect() {
            return Err(SensorError::NotDetected {
                sensor: SENSOR_NAME,
            });
        }

        self.state = SensorState::Resetting;
        debug!("Sending AHT10 soft reset");
        self.write(&[Command::SoftReset as u8], "soft reset")?;
        delay.delay_ms(SOFT_RESET_MS);

        self.state = SensorState::Calibrating;
        debug!("Sending AHT10 calibration command");
        self.write(&[Command::Initialize as u8, 0x08, 0x00], "calibrate")?;
        delay.delay_ms(CALIBRATION_MS);

        match self.read_status() {
            Ok(status) if status.is_calibrated() => info!("AHT10 calibrated"),
            Ok(status) => warn!(
                "AHT10 may not be calibrated correctly (status 0x{:02X})",
                status.0
            ),
            Err(e) => warn!("AHT10 calibration status unavailable: {}", e),
        }

        Ok(())
    }

    /// One status transaction: command byte, repeated start, one byte read.
    pub fn read_status(&mut self) -> Result<StatusByte, SensorError> {
        let mut status = [0u8; 1];
        self.i2c
            .write_read(AHT10_ADDRESS, &[Command::ReadStatus as u8], &mut status)
            .map_err(|e| SensorError::Transport {
                sensor: SENSOR_NAME,
                operation: "read status",
                kind: e.kind(),
            })?;
        Ok(StatusByte(status[0]))
    }

    pub fn trigger_measurement(&mut self) -> Result<(), SensorError> {
        self.ensure_ready()?;
        self.write(
            &[Command::TriggerMeasurement as u8, 0x33, 0x00],
            "trigger measurement",
        )
    }

    /// True when the sensor is initialized and its BUSY bit is clear.
    ///
    /// Bus errors count as "not ready" so the caller's poll loop keeps going.
    pub fn is_ready(&mut self) -> bool {
        if self.state != SensorState::Ready {
            return false;
        }
        matches!(self.read_status(), Ok(status) if !status.is_busy())
    }

    /// Trigger a conversion and read it back.
    pub fn measure<D: DelayNs>(&mut self, delay: &mut D) -> Result<SensorReading, SensorError> {
        self.trigger_measurement()?;
        delay.delay_ms(CONVERSION_MS);

        self.wait_until_ready(delay)?;

        let mut frame = [0u8; 6];
        self.i2c
            .read(AHT10_ADDRESS, &mut frame)
            .map_err(|e| SensorError::Transport {
                sensor: SENSOR_NAME,
                operation: "read measurement",
                kind: e.kind(),
            })?;

        decode_frame(&frame).ok_or(SensorError::StaleData {
            sensor: SENSOR_NAME,
        })
    }

    /// Like [`Aht10::measure`], but failures come back as an invalid reading.
    pub fn read_measurement<D: DelayNs>(&mut self, delay: &mut D) -> SensorReading {
        match self.measure(delay) {
            Ok(reading) => {
                debug!(
                    "AHT10 raw reading: {:.2}C {:.2}%",
                    reading.temperature, reading.humidity
                );
                reading
            }
            Err(e) => {
                error!("AHT10 read failed: {}", e);
                SensorReading::invalid()
            }
        }
    }

    fn wait_until_ready<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), SensorError> {
        for _ in 0..MAX_READY_POLLS {
            if self.is_ready() {
                return Ok(());
            }
            delay.delay_ms(READY_POLL_INTERVAL_MS);
        }

        Err(SensorError::Timeout {
            sensor: SENSOR_NAME,
            operation: "wait for measurement",
        })
    }

    fn ensure_ready(&self) -> Result<(), SensorError> {
        if self.state == SensorState::Ready {
            Ok(())
        } else {
            Err(SensorError::NotReady {
                sensor: SENSOR_NAME,
            })
        }
    }

    fn write(&mut self, bytes: &[u8], operation: &'static str) -> Result<(), SensorError> {
        self.i2c
            .write(AHT10_ADDRESS, bytes)
            .map_err(|e| SensorError::Transport {
                sensor: SENSOR_NAME,
                operation,
                kind: e.kind(),
            })
    }
}

impl<I: I2c> Sensor for Aht10<I> {
    fn detect(&mut self) -> bool {
        Aht10::detect(self)
    }

    fn initialize<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), SensorError> {
        Aht10::initialize(self, delay)
    }

    fn read_measurement<D: DelayNs>(&mut self, delay: &mut D) -> SensorReading {
        Aht10::read_measurement(self, delay)
    }
}
