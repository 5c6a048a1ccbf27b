//! Byte transport to the SSD1306.
//!
//! Every I2C write to the controller starts with a control byte: `0x00` for a
//! command, `0x40` for display data.

use embedded_hal::i2c::{Error as _, I2c};

use super::DisplayError;
use super::cmd::{CONTROL_COMMAND, CONTROL_DATA};

/// Largest data payload sent in one bus write; one full page row.
pub const MAX_DATA_CHUNK: usize = 128;

pub trait DisplayInterface {
    /// Check that the controller acknowledges its address.
    fn probe(&mut self) -> Result<(), DisplayError>;

    /// Send one command byte (2 bytes on the bus).
    fn send_command(&mut self, command: u8) -> Result<(), DisplayError>;

    /// Stream display data (`len + 1` bytes on the bus per chunk).
    fn send_data(&mut self, data: &[u8]) -> Result<(), DisplayError>;
}

pub struct I2cInterface<I> {
    i2c: I,
    address: u8,
}

impl<I: I2c> I2cInterface<I> {
    pub const fn new(i2c: I, address: u8) -> Self {
        Self { i2c, address }
    }

    pub fn release(self) -> I {
        self.i2c
    }

    fn write(&mut self, bytes: &[u8], operation: &'static str) -> Result<(), DisplayError> {
        self.i2c
            .write(self.address, bytes)
            .map_err(|e| DisplayError::Transport {
                operation,
                kind: e.kind(),
            })
    }
}

impl<I: I2c> DisplayInterface for I2cInterface<I> {
    fn probe(&mut self) -> Result<(), DisplayError> {
        self.i2c
            .write(self.address, &[CONTROL_COMMAND])
            .map_err(|_| DisplayError::NotDetected {
                address: self.address,
            })
    }

    fn send_command(&mut self, command: u8) -> Result<(), DisplayError> {
        self.write(&[CONTROL_COMMAND, command], "send command")
    }

    fn send_data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        let mut buffer = [0u8; MAX_DATA_CHUNK + 1];
        buffer[0] = CONTROL_DATA;

        for chunk in data.chunks(MAX_DATA_CHUNK) {
            buffer[1..=chunk.len()].copy_from_slice(chunk);
            self.write(&buffer[..=chunk.len()], "send data")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    const ADDR: u8 = 0x3C;

    #[test]
    fn test_command_framing() {
        let expectations = [I2cTransaction::write(ADDR, vec![0x00, 0xAF])];
        let mut interface = I2cInterface::new(I2cMock::new(&expectations), ADDR);

        interface.send_command(0xAF).unwrap();

        interface.release().done();
    }

    #[test]
    fn test_data_framing() {
        let expectations = [I2cTransaction::write(ADDR, vec![0x40, 0x7E, 0x11, 0x11])];
        let mut interface = I2cInterface::new(I2cMock::new(&expectations), ADDR);

        interface.send_data(&[0x7E, 0x11, 0x11]).unwrap();

        interface.release().done();
    }

    #[test]
    fn test_long_data_is_chunked_with_prefix() {
        let data = [0xAA; MAX_DATA_CHUNK + 2];
        let mut first = vec![0x40];
        first.extend([0xAA; MAX_DATA_CHUNK]);
        let expectations = [
            I2cTransaction::write(ADDR, first),
            I2cTransaction::write(ADDR, vec![0x40, 0xAA, 0xAA]),
        ];
        let mut interface = I2cInterface::new(I2cMock::new(&expectations), ADDR);

        interface.send_data(&data).unwrap();

        interface.release().done();
    }

    #[test]
    fn test_probe_reports_missing_device() {
        let expectations = [I2cTransaction::write(ADDR, vec![0x00]).with_error(ErrorKind::Other)];
        let mut interface = I2cInterface::new(I2cMock::new(&expectations), ADDR);

        assert_eq!(
            interface.probe(),
            Err(DisplayError::NotDetected { address: ADDR })
        );

        interface.release().done();
    }
}
