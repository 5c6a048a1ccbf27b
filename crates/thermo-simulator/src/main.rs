//! Host simulator for the thermo-rs climate monitor.
//!
//! Runs the real `thermo-core` drivers and monitor loop against an emulated
//! AHT10 and SSD1306 on simulated I2C buses. Logs go to stderr; every display
//! refresh prints the panel contents to stdout.

mod aht10;
mod clock;
mod ssd1306;

use clap::Parser;
use log::info;

use thermo_core::config::{DISPLAY_REFRESH_EVERY, SENSOR_RETRY_MS};
use thermo_core::{Aht10, Monitor, Ssd1306};

use aht10::EmulatedAht10;
use clock::{SimClock, SimDelay};
use ssd1306::{EmulatedSsd1306, Panel};

/// Simulated time at which a sensor missing at boot gets plugged in.
const SENSOR_HOTPLUG_MS: u64 = 2 * SENSOR_RETRY_MS as u64;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Read cycles to run after start-up
    #[arg(long, default_value_t = 10)]
    cycles: u32,

    /// Boot without the AHT10; it is plugged in after two retry periods
    #[arg(long)]
    no_sensor: bool,

    /// Run without the SSD1306
    #[arg(long)]
    no_display: bool,

    /// Sleep for real on every delay instead of only advancing simulated time
    #[arg(long)]
    realtime: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    info!("=== thermo-rs simulator ===");
    info!(
        "AHT10 {} | SSD1306 {} | {} cycles",
        if args.no_sensor { "hot-plugged" } else { "present" },
        if args.no_display { "absent" } else { "present" },
        args.cycles
    );

    let clock = SimClock::default();
    let panel = Panel::default();

    let sensor_attached_at = if args.no_sensor { SENSOR_HOTPLUG_MS } else { 0 };
    let sensor = Aht10::new(EmulatedAht10::new(clock.clone(), sensor_attached_at));
    let display = Ssd1306::new_i2c(EmulatedSsd1306::new(panel.clone(), !args.no_display));
    let mut monitor = Monitor::new(sensor, display, SimDelay::new(clock.clone(), args.realtime));

    monitor.start();
    if monitor.display_ready() {
        print!("{}", panel.borrow().render_ascii());
    }

    for _ in 0..args.cycles {
        let refresh = monitor.reads() % DISPLAY_REFRESH_EVERY == 0;
        monitor.tick();

        if refresh && monitor.display_ready() {
            println!("t = {:.1} s", clock.elapsed_secs());
            print!("{}", panel.borrow().render_ascii());
        }
    }

    info!(
        "Finished {} reads in {:.1} s of simulated time",
        monitor.reads(),
        clock.elapsed_secs()
    );
}
