//! One shot animation
//!
//! Sets a group of LEDs to one intensity after a delay, then completes.

use embassy_time::{Duration, Instant};

use super::{Animate, NextStep};
use crate::led::LedSet;
use crate::registry::LedRegistry;

#[derive(Debug, Clone)]
pub struct OneShot {
    leds: LedSet,
    delay: Duration,
    intensity: u8,
    fire_time: Instant,
    has_run: bool,
}

impl OneShot {
    /// Create a one shot that fires `delay` after the animator starts
    pub fn new(delay: Duration, intensity: u8, leds: impl Into<LedSet>) -> Self {
        Self {
            leds: leds.into(),
            delay,
            intensity,
            fire_time: Instant::from_ticks(0),
            has_run: false,
        }
    }

    pub const fn has_run(&self) -> bool {
        self.has_run
    }
}

impl Animate for OneShot {
    fn initialize(&mut self, now: Instant) {
        self.fire_time = now + self.delay;
        self.has_run = false;
    }

    fn next_step(&self, now: Instant) -> NextStep {
        if self.has_run {
            NextStep::Complete
        } else {
            NextStep::until(self.fire_time, now)
        }
    }

    fn execute_next_step(&mut self, now: Instant, leds: &LedRegistry) {
        if self.has_run || now < self.fire_time {
            return;
        }

        leds.set_all(self.leds, self.intensity);
        self.has_run = true;
    }

    fn managed_leds(&self) -> LedSet {
        self.leds
    }
}
