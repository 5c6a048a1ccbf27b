//! Emulated AHT10 behind an `embedded-hal` I2C bus.
//!
//! The climate is synthetic: slow sinusoids over simulated time. A triggered
//! conversion reports BUSY for a few status polls before the frame is valid.

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use log::{debug, trace, warn};

use thermo_core::config::AHT10_ADDRESS;

use crate::clock::SimClock;

/// Status polls answered with BUSY after each trigger.
pub const BUSY_POLLS: u8 = 3;

const STATUS_BUSY: u8 = 0x80;
const STATUS_CALIBRATED: u8 = 0x08;
const FULL_SCALE: f64 = 1_048_576.0;

/// Temperature (C) and relative humidity (%) at `t` seconds.
pub fn climate(t: f64) -> (f64, f64) {
    let temperature = 23.0 + 4.0 * (t / 120.0).sin() + 0.5 * (t / 37.0).cos();
    let humidity = 55.0 + 15.0 * (t / 180.0).sin() + 2.0 * (t / 23.0).cos();
    (temperature, humidity)
}

/// The five data bytes of a measurement frame.
pub fn encode_measurement(temperature: f64, humidity: f64) -> [u8; 5] {
    let max = (1 << 20) - 1;
    let humidity_raw = ((humidity / 100.0 * FULL_SCALE) as u32).min(max);
    let temperature_raw = (((temperature + 50.0) / 200.0 * FULL_SCALE) as u32).min(max);

    [
        (humidity_raw >> 12) as u8,
        (humidity_raw >> 4) as u8,
        (((humidity_raw & 0x0F) << 4) | ((temperature_raw >> 16) & 0x0F)) as u8,
        (temperature_raw >> 8) as u8,
        temperature_raw as u8,
    ]
}

pub struct EmulatedAht10 {
    clock: SimClock,
    /// Simulated time at which the sensor starts answering.
    attached_at_ms: u64,
    calibrated: bool,
    busy_polls: u8,
    data: [u8; 5],
}

impl EmulatedAht10 {
    pub fn new(clock: SimClock, attached_at_ms: u64) -> Self {
        Self {
            clock,
            attached_at_ms,
            calibrated: false,
            busy_polls: 0,
            data: [0; 5],
        }
    }

    fn is_attached(&self) -> bool {
        self.clock.elapsed_ms() >= self.attached_at_ms
    }

    fn status(&self) -> u8 {
        let mut status = 0;
        if self.calibrated {
            status |= STATUS_CALIBRATED;
        }
        if self.busy_polls > 0 {
            status |= STATUS_BUSY;
        }
        status
    }

    fn command(&mut self, bytes: &[u8]) {
        match bytes {
            [0x71] => {}
            [0xBA] => {
                debug!("[aht10] soft reset");
                self.calibrated = false;
                self.busy_polls = 0;
            }
            [0xE1, 0x08, 0x00] => {
                debug!("[aht10] calibrated");
                self.calibrated = true;
            }
            [0xAC, 0x33, 0x00] => {
                let (temperature, humidity) = climate(self.clock.elapsed_secs());
                trace!("[aht10] converting {temperature:.2}C {humidity:.2}%");
                self.data = encode_measurement(temperature, humidity);
                self.busy_polls = BUSY_POLLS;
            }
            other => warn!("[aht10] ignoring unknown command {other:02X?}"),
        }
    }

    fn respond(&mut self, buffer: &mut [u8]) {
        let Some((first, rest)) = buffer.split_first_mut() else {
            return;
        };
        *first = self.status();

        if rest.is_empty() {
            self.busy_polls = self.busy_polls.saturating_sub(1);
            return;
        }
        for (dst, src) in rest.iter_mut().zip(self.data) {
            *dst = src;
        }
    }
}

impl ErrorType for EmulatedAht10 {
    type Error = ErrorKind;
}

impl I2c for EmulatedAht10 {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if address != AHT10_ADDRESS || !self.is_attached() {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }

        for operation in operations {
            match operation {
                Operation::Write(bytes) => self.command(bytes),
                Operation::Read(buffer) => self.respond(buffer),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SimDelay;
    use thermo_core::sensors::{Aht10, SensorState, decode_frame};

    #[test]
    fn test_encoding_decodes_back() {
        let data = encode_measurement(24.5, 61.0);
        let mut frame = [0u8; 6];
        frame[1..].copy_from_slice(&data);

        let reading = decode_frame(&frame).unwrap();
        assert!((reading.temperature - 24.5).abs() < 0.01);
        assert!((reading.humidity - 61.0).abs() < 0.01);
    }

    #[test]
    fn test_driver_reads_synthetic_climate() {
        let clock = SimClock::default();
        let mut delay = SimDelay::new(clock.clone(), false);
        let mut sensor = Aht10::new(EmulatedAht10::new(clock.clone(), 0));

        sensor.initialize(&mut delay).unwrap();
        assert_eq!(sensor.state(), SensorState::Ready);

        let triggered_at = clock.elapsed_secs();
        let reading = sensor.read_measurement(&mut delay);
        let (temperature, humidity) = climate(triggered_at);

        assert!(reading.valid);
        assert!((f64::from(reading.temperature) - temperature).abs() < 0.01);
        assert!((f64::from(reading.humidity) - humidity).abs() < 0.01);
    }

    #[test]
    fn test_busy_clears_after_polls() {
        let mut device = EmulatedAht10::new(SimClock::default(), 0);
        device.write(AHT10_ADDRESS, &[0xAC, 0x33, 0x00]).unwrap();

        let mut status = [0u8; 1];
        for _ in 0..BUSY_POLLS {
            device.write_read(AHT10_ADDRESS, &[0x71], &mut status).unwrap();
            assert_eq!(status[0] & STATUS_BUSY, STATUS_BUSY);
        }
        device.write_read(AHT10_ADDRESS, &[0x71], &mut status).unwrap();
        assert_eq!(status[0] & STATUS_BUSY, 0);
    }

    #[test]
    fn test_detached_sensor_does_not_ack() {
        let clock = SimClock::default();
        let mut sensor = Aht10::new(EmulatedAht10::new(clock.clone(), 5_000));

        assert!(!sensor.detect());
        clock.advance_ns(5_000_000_000);
        assert!(sensor.detect());
    }
}
