//! Polling loop tying the sensor to the display
//!
//! Brings both devices up, keeps retrying a missing sensor, then reads on a
//! fixed interval, logging every reading and refreshing the display every few
//! reads to limit flicker.

use embedded_hal::delay::DelayNs;
use log::{error, info, warn};

use crate::config::{BOOT_SETTLE_MS, DISPLAY_REFRESH_EVERY, READ_INTERVAL_MS, SENSOR_RETRY_MS};
use crate::display::ReadingDisplay;
use crate::sensors::{Sensor, SensorReading};

/// Shown when the sensor does not come up at boot.
pub const SENSOR_NOT_FOUND: &str = "AHT10 SENSOR NOT FOUND";

pub struct Monitor<S, P, D> {
    sensor: S,
    display: P,
    delay: D,
    display_ready: bool,
    reads: u32,
}

impl<S, P, D> Monitor<S, P, D>
where
    S: Sensor,
    P: ReadingDisplay,
    D: DelayNs,
{
    pub fn new(sensor: S, display: P, delay: D) -> Self {
        Self {
            sensor,
            display,
            delay,
            display_ready: false,
            reads: 0,
        }
    }

    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    pub fn display(&self) -> &P {
        &self.display
    }

    pub fn display_ready(&self) -> bool {
        self.display_ready
    }

    /// Number of completed read cycles.
    pub fn reads(&self) -> u32 {
        self.reads
    }

    /// Bring up the display and the sensor.
    ///
    /// A missing display only costs the screen output. A missing sensor blocks
    /// here, retrying every [`SENSOR_RETRY_MS`] until it answers and initializes.
    pub fn start(&mut self) {
        self.delay.delay_ms(BOOT_SETTLE_MS);

        info!("--- Initializing display ---");
        self.display_ready = match self.display.initialize(&mut self.delay) {
            Ok(()) => true,
            Err(e) => {
                warn!("Continuing without display: {}", e);
                false
            }
        };
        if self.display_ready
            && let Err(e) = self.display.show_startup()
        {
            error!("Startup screen failed: {}", e);
        }

        info!("--- Initializing AHT10 ---");
        if let Err(e) = self.sensor.initialize(&mut self.delay) {
            error!("Sensor initialization failed: {}", e);
            error!("Check the connections; retrying");
            if self.display_ready
                && let Err(e) = self.display.show_error(SENSOR_NOT_FOUND)
            {
                error!("Error screen failed: {}", e);
            }
            self.wait_for_sensor();
        }

        info!("System ready, starting readings");
        info!("Format: Temp | Humidity | Comfort");
    }

    fn wait_for_sensor(&mut self) {
        loop {
            info!("Trying to detect the sensor again in {} s", SENSOR_RETRY_MS / 1000);
            self.delay.delay_ms(SENSOR_RETRY_MS);

            if !self.sensor.detect() {
                continue;
            }

            info!("Sensor detected, reinitializing");
            if self.sensor.initialize(&mut self.delay).is_ok() {
                info!("Sensor reconnected");
                return;
            }
        }
    }

    /// One read cycle: measure, log, maybe refresh the display, then sleep.
    pub fn tick(&mut self) -> SensorReading {
        let reading = self.sensor.read_measurement(&mut self.delay);

        match reading.comfort() {
            Some(comfort) => info!(
                "{:.1}°C | {:.1}% | {}",
                reading.temperature, reading.humidity, comfort
            ),
            None => error!("Sensor read failed"),
        }

        if self.display_ready
            && self.reads % DISPLAY_REFRESH_EVERY == 0
            && let Err(e) = self.display.show_reading(&reading)
        {
            error!("Display update failed: {}", e);
        }

        self.reads = self.reads.wrapping_add(1);
        self.delay.delay_ms(READ_INTERVAL_MS);

        reading
    }

    pub fn run(mut self) -> ! {
        self.start();
        loop {
            self.tick();
        }
    }
}
