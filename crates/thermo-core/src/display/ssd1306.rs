//! Driver for a 128x64 SSD1306 OLED on I2C
//!
//! There is no host-side framebuffer. Every draw sets a column and page window
//! with addressing commands and then streams exactly the bytes for that window
//! into GDDRAM, relying on horizontal addressing mode to advance the column.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::{debug, error, info};

use super::cmd::Cmd;
use super::font::{CHAR_ADVANCE, char_cell};
use super::interface::{DisplayInterface, I2cInterface};
use super::screens::{Screen, offline_summary};
use super::{DisplayError, ReadingDisplay};
use crate::config::SSD1306_ADDRESS;
use crate::sensors::SensorReading;

pub const DISPLAY_WIDTH: u8 = 128;
pub const DISPLAY_HEIGHT: u8 = 64;
/// Each page is 8 pixel rows, one data byte per column.
pub const DISPLAY_PAGES: u8 = DISPLAY_HEIGHT / 8;

const BUS_SETTLE_MS: u32 = 100;

/// Power-up sequence for a 128x64 panel with the internal charge pump.
/// Every byte, arguments included, goes out as its own command write.
pub const INIT_SEQUENCE: &[u8] = &[
    Cmd::DISPLAY_OFF,
    Cmd::SET_DISPLAY_CLOCK_DIV,
    0x80,
    Cmd::SET_MULTIPLEX,
    63,
    Cmd::SET_DISPLAY_OFFSET,
    0x00,
    Cmd::SET_START_LINE,
    Cmd::CHARGE_PUMP,
    0x14,
    Cmd::MEMORY_MODE,
    0x00,
    Cmd::SEG_REMAP | 0x01,
    Cmd::COM_SCAN_DEC,
    Cmd::SET_COM_PINS,
    0x12,
    Cmd::SET_CONTRAST,
    0xCF,
    Cmd::SET_PRECHARGE,
    0xF1,
    Cmd::SET_VCOM_DETECT,
    0x40,
    Cmd::DISPLAY_ALL_ON_RESUME,
    Cmd::NORMAL_DISPLAY,
    Cmd::DISPLAY_ON,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub const fn fill_byte(self) -> u8 {
        match self {
            Self::Black => 0x00,
            Self::White => 0xFF,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    Uninitialized,
    Initialized,
}

pub struct Ssd1306<DI> {
    interface: DI,
    state: DisplayState,
}

impl<I: I2c> Ssd1306<I2cInterface<I>> {
    /// Driver for a panel at the default address on `i2c`.
    pub fn new_i2c(i2c: I) -> Self {
        Self::new(I2cInterface::new(i2c, SSD1306_ADDRESS))
    }
}

impl<DI: DisplayInterface> Ssd1306<DI> {
    pub fn new(interface: DI) -> Self {
        Self {
            interface,
            state: DisplayState::Uninitialized,
        }
    }

    pub fn state(&self) -> DisplayState {
        self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.state == DisplayState::Initialized
    }

    pub fn release(self) -> DI {
        self.interface
    }

    /// Probe the controller and send the power-up sequence.
    ///
    /// The driver only counts as initialized once the whole sequence went out.
    pub fn initialize<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), DisplayError> {
        info!("Initializing SSD1306 128x64 at 0x{:02X}", SSD1306_ADDRESS);
        self.state = DisplayState::Uninitialized;
        delay.delay_ms(BUS_SETTLE_MS);

        self.interface.probe().inspect_err(|e| error!("{}", e))?;
        debug!("SSD1306 detected, configuring");

        for &command in INIT_SEQUENCE {
            self.interface.send_command(command)?;
        }

        self.state = DisplayState::Initialized;
        info!("SSD1306 initialized");
        Ok(())
    }

    pub fn send_command(&mut self, command: u8) -> Result<(), DisplayError> {
        self.interface.send_command(command)
    }

    pub fn send_data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        self.interface.send_data(data)
    }

    /// Restrict the following data bytes to a column and page window.
    fn set_window(&mut self, columns: (u8, u8), pages: (u8, u8)) -> Result<(), DisplayError> {
        self.send_command(Cmd::COLUMN_ADDR)?;
        self.send_command(columns.0)?;
        self.send_command(columns.1)?;

        self.send_command(Cmd::PAGE_ADDR)?;
        self.send_command(pages.0)?;
        self.send_command(pages.1)
    }

    /// Fill the whole panel, one page row per data write.
    pub fn clear(&mut self, color: Color) -> Result<(), DisplayError> {
        if !self.is_initialized() {
            return Ok(());
        }

        self.set_window((0, DISPLAY_WIDTH - 1), (0, DISPLAY_PAGES - 1))?;

        let row = [color.fill_byte(); DISPLAY_WIDTH as usize];
        for _ in 0..DISPLAY_PAGES {
            self.send_data(&row)?;
        }
        Ok(())
    }

    /// Draw `text` on the page containing row `y`, starting at column `x`.
    ///
    /// Characters that would start past the right edge are dropped, and the
    /// last visible cell is clipped to the columns left in the window.
    pub fn draw_text_bitmap(
        &mut self,
        x: u8,
        y: u8,
        text: &str,
        invert: bool,
    ) -> Result<(), DisplayError> {
        if !self.is_initialized() {
            return Ok(());
        }
        if x >= DISPLAY_WIDTH || y >= DISPLAY_HEIGHT {
            debug!("Text at ({}, {}) is off screen", x, y);
            return Ok(());
        }

        let page = y / 8;
        debug!(
            "Bitmap text ({}, {}): '{}'{}",
            x,
            y,
            text,
            if invert { " (inverted)" } else { "" }
        );

        self.set_window((x, DISPLAY_WIDTH - 1), (page, page))?;

        let width = usize::from(DISPLAY_WIDTH);
        for (i, c) in text.chars().enumerate() {
            let column = usize::from(x) + i * CHAR_ADVANCE;
            if column >= width {
                break;
            }
            let cell = char_cell(c, invert);
            let visible = (width - column).min(CHAR_ADVANCE);
            self.send_data(&cell[..visible])?;
        }
        Ok(())
    }

    /// Clear to black and draw every line of `screen`.
    pub fn render(&mut self, screen: &Screen) -> Result<(), DisplayError> {
        if !self.is_initialized() {
            return Ok(());
        }

        self.clear(Color::Black)?;
        for line in screen.lines() {
            self.draw_text_bitmap(0, line.y, &line.text, line.invert)?;
        }
        Ok(())
    }

    /// Show a reading, or the error screen if it is invalid.
    ///
    /// Without an initialized panel the values only go to the log.
    pub fn render_sensor_reading(&mut self, reading: &SensorReading) -> Result<(), DisplayError> {
        if !self.is_initialized() {
            info!("[display offline] {}", offline_summary(reading)?);
            return Ok(());
        }

        self.render(&Screen::sensor(reading)?)
    }

    pub fn render_startup_screen(&mut self) -> Result<(), DisplayError> {
        self.render(&Screen::startup()?)
    }

    pub fn render_error_screen(&mut self, message: &str) -> Result<(), DisplayError> {
        self.render(&Screen::error(message)?)
    }
}

impl<DI: DisplayInterface> ReadingDisplay for Ssd1306<DI> {
    fn initialize<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), DisplayError> {
        Ssd1306::initialize(self, delay)
    }

    fn show_startup(&mut self) -> Result<(), DisplayError> {
        self.render_startup_screen()
    }

    fn show_error(&mut self, message: &str) -> Result<(), DisplayError> {
        self.render_error_screen(message)
    }

    fn show_reading(&mut self, reading: &SensorReading) -> Result<(), DisplayError> {
        self.render_sensor_reading(reading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::font::glyph;
    use crate::display::screens::SENSOR_READ_ERROR;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    const ADDR: u8 = 0x3C;

    fn cmd(command: u8) -> I2cTransaction {
        I2cTransaction::write(ADDR, vec![0x00, command])
    }

    fn data(bytes: &[u8]) -> I2cTransaction {
        let mut frame = vec![0x40];
        frame.extend_from_slice(bytes);
        I2cTransaction::write(ADDR, frame)
    }

    fn window(columns: (u8, u8), pages: (u8, u8)) -> Vec<I2cTransaction> {
        vec![
            cmd(0x21),
            cmd(columns.0),
            cmd(columns.1),
            cmd(0x22),
            cmd(pages.0),
            cmd(pages.1),
        ]
    }

    fn init_expectations() -> Vec<I2cTransaction> {
        let mut expectations = vec![I2cTransaction::write(ADDR, vec![0x00])];
        expectations.extend(INIT_SEQUENCE.iter().map(|&c| cmd(c)));
        expectations
    }

    /// Records interface traffic instead of checking it against a script.
    #[derive(Default)]
    struct RecordingInterface {
        commands: Vec<u8>,
        data: Vec<Vec<u8>>,
    }

    impl DisplayInterface for RecordingInterface {
        fn probe(&mut self) -> Result<(), DisplayError> {
            Ok(())
        }

        fn send_command(&mut self, command: u8) -> Result<(), DisplayError> {
            self.commands.push(command);
            Ok(())
        }

        fn send_data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
            self.data.push(data.to_vec());
            Ok(())
        }
    }

    fn recording_display() -> Ssd1306<RecordingInterface> {
        let mut display = Ssd1306::new(RecordingInterface::default());
        display.initialize(&mut NoopDelay::new()).unwrap();
        display
    }

    #[test]
    fn test_init_sequence_bytes() {
        assert_eq!(
            INIT_SEQUENCE,
            &[
                0xAE, 0xD5, 0x80, 0xA8, 0x3F, 0xD3, 0x00, 0x40, 0x8D, 0x14, 0x20, 0x00, 0xA1,
                0xC8, 0xDA, 0x12, 0x81, 0xCF, 0xD9, 0xF1, 0xDB, 0x40, 0xA4, 0xA6, 0xAF,
            ]
        );
    }

    #[test]
    fn test_initialize() {
        let expectations = init_expectations();
        let mut display = Ssd1306::new_i2c(I2cMock::new(&expectations));

        display.initialize(&mut NoopDelay::new()).unwrap();

        assert!(display.is_initialized());
        display.release().release().done();
    }

    #[test]
    fn test_initialize_without_panel() {
        let expectations = [I2cTransaction::write(ADDR, vec![0x00]).with_error(ErrorKind::Other)];
        let mut display = Ssd1306::new_i2c(I2cMock::new(&expectations));

        assert_eq!(
            display.initialize(&mut NoopDelay::new()),
            Err(DisplayError::NotDetected { address: ADDR })
        );
        assert_eq!(display.state(), DisplayState::Uninitialized);
        display.release().release().done();
    }

    #[test]
    fn test_failed_sequence_leaves_display_uninitialized() {
        let expectations = [
            I2cTransaction::write(ADDR, vec![0x00]),
            cmd(0xAE),
            cmd(0xD5).with_error(ErrorKind::Other),
        ];
        let mut display = Ssd1306::new_i2c(I2cMock::new(&expectations));

        assert!(display.initialize(&mut NoopDelay::new()).is_err());
        assert!(!display.is_initialized());
        display.release().release().done();
    }

    #[test]
    fn test_clear_streams_every_page() {
        let mut expectations = init_expectations();
        expectations.extend(window((0, 127), (0, 7)));
        expectations.extend((0..8).map(|_| data(&[0xFF; 128])));
        let mut display = Ssd1306::new_i2c(I2cMock::new(&expectations));
        display.initialize(&mut NoopDelay::new()).unwrap();

        display.clear(Color::White).unwrap();

        display.release().release().done();
    }

    #[test]
    fn test_draw_text_addresses_single_page() {
        let mut expectations = init_expectations();
        expectations.extend(window((6, 127), (2, 2)));
        expectations.push(data(&[0x00, 0x42, 0x7F, 0x40, 0x00, 0x00]));
        expectations.push(data(&[0x00; 6]));
        let mut display = Ssd1306::new_i2c(I2cMock::new(&expectations));
        display.initialize(&mut NoopDelay::new()).unwrap();

        // '?' has no glyph and falls back to space
        display.draw_text_bitmap(6, 20, "1?", false).unwrap();

        display.release().release().done();
    }

    #[test]
    fn test_draw_text_inverted() {
        let mut display = recording_display();

        display.draw_text_bitmap(0, 0, "A", true).unwrap();

        assert_eq!(display.release().data, vec![vec![0x81, 0xEE, 0xEE, 0xEE, 0x81, 0xFF]]);
    }

    #[test]
    fn test_draw_text_drops_characters_past_edge() {
        let mut expectations = init_expectations();
        expectations.extend(window((124, 127), (0, 0)));
        expectations.push(data(&glyph('A')[..4]));
        let mut display = Ssd1306::new_i2c(I2cMock::new(&expectations));
        display.initialize(&mut NoopDelay::new()).unwrap();

        display.draw_text_bitmap(124, 0, "ABCDE", false).unwrap();

        display.release().release().done();
    }

    #[test]
    fn test_draw_text_fills_a_line() {
        let mut display = recording_display();

        display
            .draw_text_bitmap(0, 0, "ABCDEFGHIJKLMNOPQRSTUVWXYZ", false)
            .unwrap();

        let cells = display.release().data;
        // 21 full cells, then the 22nd clipped to the 2 remaining columns
        assert_eq!(cells.len(), 22);
        assert!(cells[..21].iter().all(|cell| cell.len() == 6));
        assert_eq!(cells[21].len(), 2);
    }

    #[test]
    fn test_draw_text_out_of_bounds_is_ignored() {
        let mut display = recording_display();
        let commands_after_init = INIT_SEQUENCE.len();

        display.draw_text_bitmap(128, 0, "A", false).unwrap();
        display.draw_text_bitmap(0, 64, "A", false).unwrap();

        let interface = display.release();
        assert_eq!(interface.commands.len(), commands_after_init);
        assert!(interface.data.is_empty());
    }

    #[test]
    fn test_uninitialized_display_draws_nothing() {
        let mut display = Ssd1306::new_i2c(I2cMock::new(&[]));

        display.clear(Color::Black).unwrap();
        display.draw_text_bitmap(0, 0, "AHT10", false).unwrap();
        display
            .render_sensor_reading(&SensorReading::new(22.0, 50.0))
            .unwrap();
        display
            .render_sensor_reading(&SensorReading::invalid())
            .unwrap();
        display.render_error_screen("NO SENSOR").unwrap();

        display.release().release().done();
    }

    #[test]
    fn test_invalid_reading_renders_error_screen() {
        let mut from_reading = recording_display();
        let mut reading = SensorReading::invalid();
        reading.temperature = 24.0;
        reading.humidity = 45.0;
        from_reading.render_sensor_reading(&reading).unwrap();

        let mut from_error = recording_display();
        from_error.render_error_screen(SENSOR_READ_ERROR).unwrap();

        let from_reading = from_reading.release();
        let from_error = from_error.release();
        assert_eq!(from_reading.commands, from_error.commands);
        assert_eq!(from_reading.data, from_error.data);
    }

    #[test]
    fn test_error_screen_truncates_message() {
        let mut display = recording_display();

        display.render_error_screen("AHT10 SENSOR NOT FOUND").unwrap();

        let interface = display.release();
        // clear, "ERROR!", 21 message cells, "CHECK CONNECTION"
        assert_eq!(interface.data.len(), 8 + 6 + 21 + 16);
        // inverted title cells end in a lit spacer column
        assert_eq!(interface.data[8][5], 0xFF);
    }

    #[test]
    fn test_sensor_screen_draws_four_lines() {
        let mut display = recording_display();

        display
            .render_sensor_reading(&SensorReading::new(25.3, 50.0))
            .unwrap();

        let interface = display.release();
        // "AHT10", "23.0C", "50.0%", "IDEAL"
        assert_eq!(interface.data.len(), 8 + 5 + 5 + 5 + 5);

        let pages: Vec<u8> = interface
            .commands
            .windows(3)
            .filter(|w| w[0] == 0x22)
            .map(|w| w[1])
            .collect();
        assert_eq!(pages, vec![0, 0, 2, 4, 6]);
    }
}
