//! Animation scheduling core
//!
//! Drives a set of animations from a single clock without threads or
//! platform timers. The caller passes the current time, and is responsible
//! for waiting until the returned [`Wake`] before ticking again.
//!
//! # Usage
//!
//! ```ignore
//! let mut scheduler = AnimationScheduler::new();
//! scheduler.add(blinker.into())?;
//!
//! let mut wake = scheduler.start(Instant::now());
//! while let Wake::After(delay) = wake {
//!     sleep(delay);
//!     wake = scheduler.tick(Instant::now(), &LEDS, &mut sink)?;
//! }
//! ```

use embassy_time::{Duration, Instant};
use heapless::Vec;

use crate::DeviceSink;
use crate::animation::{Animation, NextStep};
use crate::led::{FIRST_LED_ADDRESS, LED_COUNT, Led, LedSet};
use crate::registry::{LedRegistry, Snapshot};

/// Maximum number of animations per scheduler
pub const MAX_ANIMATIONS: usize = 32;

/// Handle of an animation registered with a scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationId(usize);

impl AnimationId {
    pub const fn index(self) -> usize {
        self.0
    }
}

/// When the scheduler needs to run next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    /// Tick again after the given delay (zero means right away)
    After(Duration),
    /// Every animation completed
    Complete,
}

/// Result of stepping all animations once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Merged intensities of all LEDs in address order
    pub snapshot: Snapshot,
    /// Values of disabled animations' LEDs, pushed ahead of the snapshot
    pub early: [Option<u8>; LED_COUNT],
}

impl Frame {
    /// LEDs that must be pushed ahead of the full snapshot
    pub fn early_leds(&self) -> LedSet {
        Led::ALL
            .into_iter()
            .filter(|led| self.early[led.index()].is_some())
            .collect()
    }

    /// Write the frame to a device in a single commit
    pub fn commit<S: DeviceSink>(&self, sink: &mut S) -> Result<(), S::Error> {
        for led in Led::ALL {
            if let Some(value) = self.early[led.index()] {
                sink.write(led.address(), &[value])?;
            }
        }
        sink.write(FIRST_LED_ADDRESS, &self.snapshot)?;
        sink.commit()
    }
}

/// Single clock scheduler for a set of animations
///
/// Registration order is priority order: when animations share LEDs, the one
/// registered later wins.
#[derive(Debug, Default)]
pub struct AnimationScheduler {
    animations: Vec<Animation, MAX_ANIMATIONS>,
}

impl AnimationScheduler {
    pub const fn new() -> Self {
        Self {
            animations: Vec::new(),
        }
    }

    /// Register an animation
    ///
    /// Returns the animation back if the scheduler is full.
    pub fn add(&mut self, animation: Animation) -> Result<AnimationId, Animation> {
        let id = AnimationId(self.animations.len());
        self.animations.push(animation)?;
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    pub fn get(&self, id: AnimationId) -> Option<&Animation> {
        self.animations.get(id.0)
    }

    pub fn get_mut(&mut self, id: AnimationId) -> Option<&mut Animation> {
        self.animations.get_mut(id.0)
    }

    /// Enable or disable an animation
    ///
    /// Returns `false` if no animation is registered under `id`.
    pub fn set_enabled(&mut self, id: AnimationId, enabled: bool, leds: &LedRegistry) -> bool {
        let Some(animation) = self.animations.get_mut(id.0) else {
            return false;
        };
        animation.set_enabled(enabled, leds);
        true
    }

    /// Initialize every animation and compute the first wake
    pub fn start(&mut self, now: Instant) -> Wake {
        for animation in &mut self.animations {
            animation.initialize(now);
        }
        self.next_wake(now)
    }

    /// Earliest next change over all animations
    pub fn next_wake(&self, now: Instant) -> Wake {
        self.animations
            .iter()
            .filter_map(|animation| match animation.next_step(now) {
                NextStep::In(delay) => Some(delay),
                NextStep::Complete => None,
            })
            .min()
            .map_or(Wake::Complete, Wake::After)
    }

    /// Step every animation in registration order
    ///
    /// A disabled animation still advances its timing, but its managed LEDs
    /// are restored to their pre-step values and scheduled for an early push.
    pub fn step(&mut self, now: Instant, leds: &LedRegistry) -> Frame {
        let mut early = [None; LED_COUNT];

        for animation in &mut self.animations {
            let before = leds.snapshot();
            animation.execute_next_step(now, leds);

            if !animation.is_enabled() {
                let managed = animation.managed_leds();
                leds.restore(managed, &before);
                for led in managed.iter() {
                    early[led.index()] = Some(before[led.index()]);
                }
            }
        }

        Frame {
            snapshot: leds.snapshot(),
            early,
        }
    }

    /// Step all animations, commit the result and compute the next wake
    ///
    /// A device error aborts the tick before the next wake is computed.
    pub fn tick<S: DeviceSink>(
        &mut self,
        now: Instant,
        leds: &LedRegistry,
        sink: &mut S,
    ) -> Result<Wake, S::Error> {
        let frame = self.step(now, leds);
        frame.commit(sink)?;
        Ok(self.next_wake(now))
    }
}
