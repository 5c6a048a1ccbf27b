//! Screen layouts for the 128x64 panel.
//!
//! A [`Screen`] is the list of text lines to draw after clearing the panel.
//! Building it is pure, so layouts can be checked without a bus.

use core::fmt::Write;

use super::DisplayError;
use crate::metrics::DisplayStatus;
use crate::sensors::SensorReading;

/// Characters that fit on one line: 21 x 6 px = 126 px.
pub const MAX_LINE_CHARS: usize = 21;

/// Correction applied to the sensor temperature before it is shown.
/// The AHT10 reads warmer than reference weather stations next to the board.
pub const TEMPERATURE_DISPLAY_OFFSET_C: f32 = -2.3;

pub const ALERT_LOW_TEMP: &str = "!C";
pub const ALERT_HIGH_TEMP: &str = "!Q";
pub const ALERT_HIGH_HUMIDITY: &str = "!H";

pub const SENSOR_READ_ERROR: &str = "SENSOR READ ERROR";
pub const CHECK_CONNECTION: &str = "CHECK CONNECTION";

const LOW_TEMP_ALERT_BELOW_C: f32 = 20.0;
const HIGH_TEMP_ALERT_ABOVE_C: f32 = 40.0;
const HIGH_HUMIDITY_ALERT_ABOVE: f32 = 70.0;

/// Room for a full line of 4-byte UTF-8 characters.
const LINE_CAPACITY: usize = MAX_LINE_CHARS * 4;

pub type LineText = heapless::String<LINE_CAPACITY>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    /// Top pixel row; the line lands on page `y / 8`
    pub y: u8,
    pub text: LineText,
    pub invert: bool,
}

impl TextLine {
    fn new(y: u8, text: &str, invert: bool) -> Result<Self, DisplayError> {
        let mut line = LineText::new();
        line.push_str(text).map_err(|_| DisplayError::Format)?;
        Ok(Self {
            y,
            text: line,
            invert,
        })
    }

    fn formatted(y: u8, args: core::fmt::Arguments<'_>) -> Result<Self, DisplayError> {
        let mut line = LineText::new();
        line.write_fmt(args).map_err(|_| DisplayError::Format)?;
        Ok(Self {
            y,
            text: line,
            invert: false,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    lines: heapless::Vec<TextLine, 4>,
}

impl Screen {
    fn from_lines<const N: usize>(lines: [TextLine; N]) -> Result<Self, DisplayError> {
        let mut screen = heapless::Vec::new();
        for line in lines {
            screen.push(line).map_err(|_| DisplayError::Format)?;
        }
        Ok(Self { lines: screen })
    }

    pub fn lines(&self) -> &[TextLine] {
        &self.lines
    }

    pub fn startup() -> Result<Self, DisplayError> {
        Self::from_lines([
            TextLine::new(0, "SENSOR AHT10", false)?,
            TextLine::new(16, "STARTING...", false)?,
            TextLine::new(48, "PLEASE WAIT", false)?,
        ])
    }

    /// Inverted title, the message cut to one line, and a wiring hint.
    pub fn error(message: &str) -> Result<Self, DisplayError> {
        Self::from_lines([
            TextLine::new(0, "ERROR!", true)?,
            TextLine::new(24, truncate_chars(message, MAX_LINE_CHARS), false)?,
            TextLine::new(48, CHECK_CONNECTION, false)?,
        ])
    }

    /// Title, temperature, humidity and status lines for a reading.
    ///
    /// Invalid readings produce the error screen.
    pub fn sensor(reading: &SensorReading) -> Result<Self, DisplayError> {
        if !reading.valid {
            return Self::error(SENSOR_READ_ERROR);
        }

        let temperature = reading.temperature + TEMPERATURE_DISPLAY_OFFSET_C;
        let humidity = reading.humidity;

        let temperature_line = match temperature_alert(temperature) {
            Some(alert) => TextLine::formatted(16, format_args!("{temperature:.1}C  {alert}"))?,
            None => TextLine::formatted(16, format_args!("{temperature:.1}C"))?,
        };

        let humidity_line = match humidity_alert(humidity) {
            Some(alert) => TextLine::formatted(32, format_args!("{humidity:.1}%  {alert}"))?,
            None => TextLine::formatted(32, format_args!("{humidity:.1}%"))?,
        };

        let status = DisplayStatus::assess(temperature, humidity);

        Self::from_lines([
            TextLine::new(0, "AHT10", false)?,
            temperature_line,
            humidity_line,
            TextLine::new(48, status.label(), false)?,
        ])
    }
}

/// Marker for a compensated temperature outside the alert band.
/// Both bounds are exclusive.
pub fn temperature_alert(temperature: f32) -> Option<&'static str> {
    if temperature < LOW_TEMP_ALERT_BELOW_C {
        Some(ALERT_LOW_TEMP)
    } else if temperature > HIGH_TEMP_ALERT_ABOVE_C {
        Some(ALERT_HIGH_TEMP)
    } else {
        None
    }
}

pub fn humidity_alert(humidity: f32) -> Option<&'static str> {
    (humidity > HIGH_HUMIDITY_ALERT_ABOVE).then_some(ALERT_HIGH_HUMIDITY)
}

/// One-line log summary used when no panel is available.
///
/// Invalid readings never show their numeric fields.
pub fn offline_summary(reading: &SensorReading) -> Result<LineText, DisplayError> {
    let mut line = LineText::new();
    if reading.valid {
        write!(
            line,
            "Temp: {:.1}C | Humidity: {:.1}%",
            reading.temperature, reading.humidity
        )
        .map_err(|_| DisplayError::Format)?;
    } else {
        line.push_str(SENSOR_READ_ERROR)
            .map_err(|_| DisplayError::Format)?;
    }
    Ok(line)
}

/// The first `max` characters of `text`.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
