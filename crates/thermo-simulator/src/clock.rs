//! Simulated time shared by the delay provider and the emulated devices.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use embedded_hal::delay::DelayNs;

/// Nanoseconds since the simulated power-up. Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct SimClock(Rc<Cell<u64>>);

impl SimClock {
    pub fn advance_ns(&self, ns: u64) {
        self.0.set(self.0.get().saturating_add(ns));
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.0.get() / 1_000_000
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.0.get() as f64 / 1e9
    }
}

/// Delay that advances the simulated clock, optionally sleeping for real too.
pub struct SimDelay {
    clock: SimClock,
    realtime: bool,
}

impl SimDelay {
    pub fn new(clock: SimClock, realtime: bool) -> Self {
        Self { clock, realtime }
    }
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.clock.advance_ns(u64::from(ns));
        if self.realtime {
            std::thread::sleep(Duration::from_nanos(u64::from(ns)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_advances_shared_clock() {
        let clock = SimClock::default();
        let mut delay = SimDelay::new(clock.clone(), false);

        delay.delay_ms(2000);
        delay.delay_us(500);

        assert_eq!(clock.elapsed_ms(), 2000);
        assert!((clock.elapsed_secs() - 2.0005).abs() < 1e-9);
    }
}
