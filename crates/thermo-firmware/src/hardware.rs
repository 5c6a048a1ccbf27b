//! I2C bus setup for the sensor and the display
//!
//! The AHT10 and the SSD1306 sit on separate controllers. Pin numbers and
//! clock rates come from `thermo_core::config`; the peripheral types below
//! must match them.

use esp_hal::Blocking;
use esp_hal::i2c::master::{Config as I2cConfig, ConfigError, I2c};
use esp_hal::peripherals::{GPIO0, GPIO1, GPIO14, GPIO15, I2C0, I2C1};
use esp_hal::time::Rate;
use log::info;
use thermo_core::config::{BusConfig, DISPLAY_BUS, SENSOR_BUS};

pub type BlockingI2c = I2c<'static, Blocking>;

fn bus_config(bus: &BusConfig) -> I2cConfig {
    I2cConfig::default().with_frequency(Rate::from_khz(bus.frequency_khz))
}

/// I2C0 on GPIO0 (SDA) / GPIO1 (SCL) for the AHT10.
pub fn create_sensor_bus(
    i2c0: I2C0<'static>,
    sda: GPIO0<'static>,
    scl: GPIO1<'static>,
) -> Result<BlockingI2c, ConfigError> {
    info!(
        "Sensor bus: I2C{} SDA=GPIO{} SCL=GPIO{} at {} kHz",
        SENSOR_BUS.port, SENSOR_BUS.sda_pin, SENSOR_BUS.scl_pin, SENSOR_BUS.frequency_khz
    );
    Ok(I2c::new(i2c0, bus_config(&SENSOR_BUS))?
        .with_sda(sda)
        .with_scl(scl))
}

/// I2C1 on GPIO14 (SDA) / GPIO15 (SCL) for the SSD1306.
pub fn create_display_bus(
    i2c1: I2C1<'static>,
    sda: GPIO14<'static>,
    scl: GPIO15<'static>,
) -> Result<BlockingI2c, ConfigError> {
    info!(
        "Display bus: I2C{} SDA=GPIO{} SCL=GPIO{} at {} kHz",
        DISPLAY_BUS.port, DISPLAY_BUS.sda_pin, DISPLAY_BUS.scl_pin, DISPLAY_BUS.frequency_khz
    );
    Ok(I2c::new(i2c1, bus_config(&DISPLAY_BUS))?
        .with_sda(sda)
        .with_scl(scl))
}
