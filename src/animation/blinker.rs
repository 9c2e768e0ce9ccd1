//! Ramped blink animation
//!
//! Ramps a group of LEDs between a low and a high intensity in a fixed number
//! of steps. Every fired step writes `initial + frame * delta` to all target
//! LEDs, starting with frame 0.
//!
//! Without `reverse` one repetition is the ramp `0..=steps`. With `reverse`
//! the ramp continues back down `steps-1..=0` before the repetition counts as
//! complete. Between repetitions the animation pauses for `repetition_delay`.
//!
//! `delta` is `(high - low) / steps` truncated, so the last frame may fall
//! short of the bound by the division remainder.

use embassy_time::{Duration, Instant};

use super::{Animate, NextStep};
use crate::error::AnimationError;
use crate::led::LedSet;
use crate::registry::LedRegistry;

/// Blinker parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlinkerConfig {
    /// Delay before the first step
    pub delay: Duration,
    /// Pause between two repetitions
    pub repetition_delay: Duration,
    /// Time to ramp from one bound to the other
    pub ramp_duration: Duration,
    /// Low intensity bound
    pub low: u8,
    /// High intensity bound
    pub high: u8,
    /// Number of steps from one bound to the other
    pub steps: u16,
    /// Ramp upward (`true`) or downward (`false`)
    pub low_to_high: bool,
    /// Ramp back to the starting bound before completing a repetition
    pub reverse: bool,
    /// Number of repetitions before the animation completes
    pub repetitions: u32,
}

impl BlinkerConfig {
    pub const DEFAULT: Self = Self {
        delay: Duration::from_millis(0),
        repetition_delay: Duration::from_millis(0),
        ramp_duration: Duration::from_millis(1000),
        low: 0,
        high: 255,
        steps: 1,
        low_to_high: true,
        reverse: false,
        repetitions: 1,
    };
}

impl Default for BlinkerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone)]
pub struct Blinker {
    config: BlinkerConfig,
    leds: LedSet,
    step_interval: Duration,
    initial_intensity: i32,
    delta: i32,

    frame: u16,
    descending: bool,
    count: u32,
    next_step_time: Instant,
}

impl Blinker {
    pub fn new(config: BlinkerConfig, leds: impl Into<LedSet>) -> Result<Self, AnimationError> {
        if config.steps == 0 {
            return Err(AnimationError::ZeroSteps);
        }
        if config.low > config.high {
            return Err(AnimationError::InvertedRange);
        }

        let delta = (i32::from(config.high) - i32::from(config.low)) / i32::from(config.steps);
        let (initial_intensity, delta) = if config.low_to_high {
            (i32::from(config.low), delta)
        } else {
            (i32::from(config.high), -delta)
        };

        Ok(Self {
            step_interval: config.ramp_duration / u32::from(config.steps),
            leds: leds.into(),
            config,
            initial_intensity,
            delta,
            frame: 0,
            descending: false,
            count: 0,
            next_step_time: Instant::from_ticks(0),
        })
    }

    /// Simple on/off blink
    ///
    /// Each low-high-low cycle takes `blink_interval`, half of it at each
    /// intensity.
    pub fn simple(
        delay: Duration,
        blink_interval: Duration,
        low: u8,
        high: u8,
        repetitions: u32,
        leds: impl Into<LedSet>,
    ) -> Result<Self, AnimationError> {
        let half = blink_interval / 2;
        Self::new(
            BlinkerConfig {
                delay,
                repetition_delay: half,
                ramp_duration: half,
                low,
                high,
                steps: 1,
                low_to_high: true,
                reverse: false,
                repetitions,
            },
            leds,
        )
    }

    pub const fn config(&self) -> &BlinkerConfig {
        &self.config
    }

    /// Completed repetitions
    pub const fn repetition(&self) -> u32 {
        self.count
    }

    const fn is_complete(&self) -> bool {
        self.count >= self.config.repetitions
    }

    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    fn current_intensity(&self) -> u8 {
        (self.initial_intensity + i32::from(self.frame) * self.delta).clamp(0, 255) as u8
    }

    /// Move to the next frame, returns `false` when the repetition is over
    fn advance_frame(&mut self) -> bool {
        let steps = self.config.steps;
        if self.descending {
            if self.frame == 0 {
                return false;
            }
            self.frame -= 1;
        } else if self.frame < steps {
            self.frame += 1;
        } else if self.config.reverse {
            self.descending = true;
            self.frame -= 1;
        } else {
            return false;
        }
        true
    }
}

impl Animate for Blinker {
    fn initialize(&mut self, now: Instant) {
        self.next_step_time = now + self.config.delay;
        self.frame = 0;
        self.descending = false;
        self.count = 0;
    }

    fn next_step(&self, now: Instant) -> NextStep {
        if self.is_complete() {
            NextStep::Complete
        } else {
            NextStep::until(self.next_step_time, now)
        }
    }

    fn execute_next_step(&mut self, now: Instant, leds: &LedRegistry) {
        if self.is_complete() || now < self.next_step_time {
            return;
        }

        leds.set_all(self.leds, self.current_intensity());

        if self.advance_frame() {
            self.next_step_time += self.step_interval;
        } else {
            self.frame = 0;
            self.descending = false;
            self.count += 1;
            self.next_step_time += self.config.repetition_delay;
        }
    }

    fn managed_leds(&self) -> LedSet {
        self.leds
    }
}
