//! Static board and timing configuration.
//!
//! Pins and bus speeds are fixed at build time; nothing here is read at runtime.

/// Pin and frequency assignment for one I2C bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusConfig {
    /// Peripheral index (0 for I2C0, 1 for I2C1)
    pub port: u8,
    pub sda_pin: u8,
    pub scl_pin: u8,
    pub frequency_khz: u32,
}

/// Bus wired to the AHT10.
pub const SENSOR_BUS: BusConfig = BusConfig {
    port: 0,
    sda_pin: 0,
    scl_pin: 1,
    frequency_khz: 400,
};

/// Bus wired to the SSD1306.
pub const DISPLAY_BUS: BusConfig = BusConfig {
    port: 1,
    sda_pin: 14,
    scl_pin: 15,
    frequency_khz: 400,
};

/// 7-bit address of the AHT10.
pub const AHT10_ADDRESS: u8 = 0x38;

/// 7-bit address of the SSD1306.
pub const SSD1306_ADDRESS: u8 = 0x3C;

/// Settle time after power-up before either device is touched.
pub const BOOT_SETTLE_MS: u32 = 1000;

/// Delay between two sensor reads.
pub const READ_INTERVAL_MS: u32 = 2000;

/// The display is refreshed once every this many reads.
pub const DISPLAY_REFRESH_EVERY: u32 = 5;

/// Delay between two attempts to find a missing sensor.
pub const SENSOR_RETRY_MS: u32 = 5000;
