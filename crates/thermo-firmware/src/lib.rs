//! ESP32-S3 firmware-specific modules for thermo-rs
//!
//! Everything that touches esp-hal peripherals lives here so `thermo-core`
//! stays buildable on the host.

#![no_std]

pub mod hardware;
