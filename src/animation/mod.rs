//! Animation system with compile-time known animation variants
//!
//! All animations are stored in an enum to keep the scheduler free of heap
//! allocations. Each variant implements the [`Animate`] contract; the
//! [`Animation`] wrapper adds the enable/disable bookkeeping shared by all
//! of them.

mod blinker;
mod one_shot;
mod sequence;

use embassy_time::{Duration, Instant};

pub use blinker::{Blinker, BlinkerConfig};
pub use one_shot::OneShot;
pub use sequence::{MAX_SEQUENCE_STEPS, Sequence};

use crate::led::LedSet;
use crate::registry::LedRegistry;

/// Repetition count that never completes in practice
pub const FOREVER: u32 = u32::MAX;

/// Time until the next change of an animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    /// Next change is due after the given delay (zero when overdue)
    In(Duration),
    /// The animation has no further changes
    Complete,
}

impl NextStep {
    /// Delay until `at`, saturating to zero when `at` already passed
    pub(crate) fn until(at: Instant, now: Instant) -> Self {
        Self::In(at.saturating_duration_since(now))
    }

    pub const fn is_complete(self) -> bool {
        matches!(self, Self::Complete)
    }

    pub const fn delay(self) -> Option<Duration> {
        match self {
            Self::In(delay) => Some(delay),
            Self::Complete => None,
        }
    }
}

/// Time driven LED state machine
pub trait Animate {
    /// Reset counters relative to `now`
    ///
    /// Must be called once before the first `next_step`/`execute_next_step`.
    fn initialize(&mut self, now: Instant);

    /// How long until the next change, without side effects
    fn next_step(&self, now: Instant) -> NextStep;

    /// Apply one state transition if it is due at `now`
    ///
    /// Does nothing before the scheduled time, so repeated calls at the same
    /// `now` after the transition fired are no-ops.
    fn execute_next_step(&mut self, now: Instant, leds: &LedRegistry);

    /// LEDs this animation writes to
    fn managed_leds(&self) -> LedSet;
}

/// Animation variants
#[derive(Debug, Clone)]
pub enum AnimationKind {
    /// Set LEDs once after a delay
    OneShot(OneShot),
    /// Ramp LEDs between two intensities
    Blinker(Blinker),
    /// Timed list of LED changes
    Sequence(Sequence),
}

/// Animation slot with enable state
#[derive(Debug, Clone)]
pub struct Animation {
    kind: AnimationKind,
    enabled: bool,
}

impl Animation {
    pub const fn new(kind: AnimationKind) -> Self {
        Self {
            kind,
            enabled: true,
        }
    }

    pub const fn kind(&self) -> &AnimationKind {
        &self.kind
    }

    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the animation
    ///
    /// Disabling turns the managed LEDs off right away. Enabling only lets
    /// future steps through and leaves the current intensities as they are.
    pub fn set_enabled(&mut self, enabled: bool, leds: &LedRegistry) {
        self.enabled = enabled;
        if !enabled {
            for led in self.managed_leds().iter() {
                leds.store(led, 0);
            }
        }
    }

    pub fn initialize(&mut self, now: Instant) {
        match &mut self.kind {
            AnimationKind::OneShot(animation) => animation.initialize(now),
            AnimationKind::Blinker(animation) => animation.initialize(now),
            AnimationKind::Sequence(animation) => animation.initialize(now),
        }
    }

    pub fn next_step(&self, now: Instant) -> NextStep {
        match &self.kind {
            AnimationKind::OneShot(animation) => animation.next_step(now),
            AnimationKind::Blinker(animation) => animation.next_step(now),
            AnimationKind::Sequence(animation) => animation.next_step(now),
        }
    }

    pub fn execute_next_step(&mut self, now: Instant, leds: &LedRegistry) {
        match &mut self.kind {
            AnimationKind::OneShot(animation) => animation.execute_next_step(now, leds),
            AnimationKind::Blinker(animation) => animation.execute_next_step(now, leds),
            AnimationKind::Sequence(animation) => animation.execute_next_step(now, leds),
        }
    }

    pub fn managed_leds(&self) -> LedSet {
        match &self.kind {
            AnimationKind::OneShot(animation) => animation.managed_leds(),
            AnimationKind::Blinker(animation) => animation.managed_leds(),
            AnimationKind::Sequence(animation) => animation.managed_leds(),
        }
    }
}

impl From<OneShot> for Animation {
    fn from(animation: OneShot) -> Self {
        Self::new(AnimationKind::OneShot(animation))
    }
}

impl From<Blinker> for Animation {
    fn from(animation: Blinker) -> Self {
        Self::new(AnimationKind::Blinker(animation))
    }
}

impl From<Sequence> for Animation {
    fn from(animation: Sequence) -> Self {
        Self::new(AnimationKind::Sequence(animation))
    }
}
