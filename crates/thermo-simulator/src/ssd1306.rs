//! Emulated SSD1306 controller with its GDDRAM.
//!
//! Commands are parsed one byte at a time, arguments included, the way the
//! controller sees them. Data bytes land at the current column and page and
//! advance in horizontal addressing mode inside the active window.

use std::cell::RefCell;
use std::fmt::Write as _;
use std::rc::Rc;

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use log::{trace, warn};

use thermo_core::config::SSD1306_ADDRESS;
use thermo_core::display::{DISPLAY_HEIGHT, DISPLAY_PAGES, DISPLAY_WIDTH};

const WIDTH: usize = DISPLAY_WIDTH as usize;
const PAGES: usize = DISPLAY_PAGES as usize;

pub type Gddram = [[u8; WIDTH]; PAGES];

#[derive(Debug)]
pub struct PanelState {
    pub gddram: Gddram,
    pub display_on: bool,
    pub inverted: bool,
    columns: (u8, u8),
    pages: (u8, u8),
    column: u8,
    page: u8,
    pending: Option<(u8, Vec<u8>)>,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            gddram: [[0; WIDTH]; PAGES],
            display_on: false,
            inverted: false,
            columns: (0, DISPLAY_WIDTH - 1),
            pages: (0, DISPLAY_PAGES - 1),
            column: 0,
            page: 0,
            pending: None,
        }
    }
}

/// Argument bytes following a command opcode.
fn argument_count(opcode: u8) -> usize {
    match opcode {
        0x21 | 0x22 => 2,
        0x20 | 0x81 | 0x8D | 0xA8 | 0xD3 | 0xD5 | 0xD9 | 0xDA | 0xDB => 1,
        _ => 0,
    }
}

impl PanelState {
    fn command_byte(&mut self, byte: u8) {
        match self.pending.take() {
            Some((opcode, mut args)) => {
                args.push(byte);
                if args.len() < argument_count(opcode) {
                    self.pending = Some((opcode, args));
                } else {
                    self.apply(opcode, &args);
                }
            }
            None if argument_count(byte) > 0 => self.pending = Some((byte, Vec::new())),
            None => self.apply(byte, &[]),
        }
    }

    fn apply(&mut self, opcode: u8, args: &[u8]) {
        trace!("[ssd1306] command 0x{opcode:02X} {args:02X?}");
        match (opcode, args) {
            (0x21, [start, end]) => {
                self.columns = (start & 0x7F, end & 0x7F);
                self.column = self.columns.0;
            }
            (0x22, [start, end]) => {
                self.pages = (start & 0x07, end & 0x07);
                self.page = self.pages.0;
            }
            (0x20, [mode]) if *mode != 0x00 => {
                warn!("[ssd1306] addressing mode {mode} not emulated, staying horizontal");
            }
            (0xAE, _) => self.display_on = false,
            (0xAF, _) => self.display_on = true,
            (0xA6, _) => self.inverted = false,
            (0xA7, _) => self.inverted = true,
            _ => {}
        }
    }

    fn data_byte(&mut self, byte: u8) {
        self.gddram[usize::from(self.page)][usize::from(self.column)] = byte;

        if self.column < self.columns.1 {
            self.column += 1;
            return;
        }
        self.column = self.columns.0;
        self.page = if self.page < self.pages.1 {
            self.page + 1
        } else {
            self.pages.0
        };
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        let lit = self.gddram[y / 8][x] & (1 << (y % 8)) != 0;
        lit != self.inverted
    }

    /// The panel as text, two characters per lit pixel, inside a frame.
    pub fn render_ascii(&self) -> String {
        let mut out = String::new();
        let border = "-".repeat(WIDTH);
        let _ = writeln!(out, "+{border}+");
        for y in (0..usize::from(DISPLAY_HEIGHT)).step_by(2) {
            out.push('|');
            for x in 0..WIDTH {
                let top = self.display_on && self.pixel(x, y);
                let bottom = self.display_on && self.pixel(x, y + 1);
                out.push(match (top, bottom) {
                    (true, true) => '█',
                    (true, false) => '▀',
                    (false, true) => '▄',
                    (false, false) => ' ',
                });
            }
            out.push_str("|\n");
        }
        let _ = writeln!(out, "+{border}+");
        out
    }
}

/// Shared view of the panel, kept by whoever prints it.
pub type Panel = Rc<RefCell<PanelState>>;

pub struct EmulatedSsd1306 {
    panel: Panel,
    attached: bool,
}

impl EmulatedSsd1306 {
    pub fn new(panel: Panel, attached: bool) -> Self {
        Self { panel, attached }
    }
}

impl ErrorType for EmulatedSsd1306 {
    type Error = ErrorKind;
}

impl I2c for EmulatedSsd1306 {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if address != SSD1306_ADDRESS || !self.attached {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }

        let mut panel = self.panel.borrow_mut();
        for operation in operations {
            let Operation::Write(bytes) = operation else {
                return Err(ErrorKind::Other);
            };
            match bytes.split_first() {
                Some((0x00, commands)) => commands.iter().for_each(|&b| panel.command_byte(b)),
                Some((0x40, data)) => data.iter().for_each(|&b| panel.data_byte(b)),
                Some((control, _)) => {
                    warn!("[ssd1306] unsupported control byte 0x{control:02X}");
                    return Err(ErrorKind::Other);
                }
                None => {}
            }
        }
        Ok(())
    }
}
