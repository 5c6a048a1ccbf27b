#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]

use esp_hal::clock::CpuClock;
use esp_hal::delay::Delay;
use log::{LevelFilter, error, info};
use thermo_core::{Aht10, Monitor, Ssd1306};
use thermo_firmware::hardware;

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    rtt_target::rprintln!("PANIC: {}", info);
    loop {}
}

// This creates a default app-descriptor required by the esp-idf bootloader.
// For more information see: <https://docs.espressif.com/projects/esp-idf/en/stable/esp32/api-reference/system/app_image_format.html#application-description>
esp_bootloader_esp_idf::esp_app_desc!();

/// Park the core after a fatal setup error, repeating the reason.
fn halt(delay: &Delay, reason: &str) -> ! {
    loop {
        error!("{}", reason);
        delay.delay_millis(5000);
    }
}

#[esp_hal::main]
fn main() -> ! {
    rtt_target::rtt_init_log!(LevelFilter::Info);

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);
    let delay = Delay::new();

    info!("========================================");
    info!("  AHT10 + SSD1306 climate monitor");
    info!("========================================");

    let sensor_bus = match hardware::create_sensor_bus(
        peripherals.I2C0,
        peripherals.GPIO0,
        peripherals.GPIO1,
    ) {
        Ok(bus) => bus,
        Err(e) => {
            error!("Sensor bus config rejected: {:?}", e);
            halt(&delay, "Cannot continue without the sensor bus")
        }
    };

    let display_bus = match hardware::create_display_bus(
        peripherals.I2C1,
        peripherals.GPIO14,
        peripherals.GPIO15,
    ) {
        Ok(bus) => bus,
        Err(e) => {
            error!("Display bus config rejected: {:?}", e);
            halt(&delay, "Cannot continue without the display bus")
        }
    };

    Monitor::new(Aht10::new(sensor_bus), Ssd1306::new_i2c(display_bus), delay).run()
}
