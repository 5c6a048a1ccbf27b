//! Hardware-independent core library for thermo-rs
//!
//! This crate contains all platform-agnostic logic for the climate monitor:
//! the AHT10 temperature/humidity driver, the SSD1306 OLED driver with its
//! bitmap font and screen layouts, comfort classification, and the polling
//! loop that ties them together.
//!
//! It is `#![no_std]` so it compiles on embedded targets and on desktop hosts
//! (for the simulator and tests). Both drivers are written against the
//! blocking `embedded-hal` 1.0 I2C and delay traits.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod display;
pub mod metrics;
pub mod monitor;
pub mod sensors;

pub use display::{DisplayError, ReadingDisplay, Ssd1306};
pub use metrics::{ComfortLevel, DisplayStatus};
pub use monitor::Monitor;
pub use sensors::{Aht10, Sensor, SensorError, SensorReading};
