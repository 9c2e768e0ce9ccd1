//! Timed sequence of LED changes
//!
//! Each step sets a group of LEDs to an intensity at a cumulative offset from
//! the start of the sequence. Steps sharing the same offset are applied
//! together in a single transition.

use embassy_time::{Duration, Instant};
use heapless::Vec;

use super::{Animate, NextStep};
use crate::error::AnimationError;
use crate::led::LedSet;
use crate::registry::LedRegistry;

/// Maximum number of steps in a sequence
pub const MAX_SEQUENCE_STEPS: usize = 64;

#[derive(Debug, Clone, Copy)]
struct SequenceStep {
    /// Offset from the start of the sequence
    offset: Duration,
    leds: LedSet,
    intensity: u8,
}

#[derive(Debug, Clone)]
pub struct Sequence {
    steps: Vec<SequenceStep, MAX_SEQUENCE_STEPS>,
    /// Offset of the last added step
    total: Duration,
    repetitions: u32,

    start_time: Instant,
    next_step_time: Instant,
    index: usize,
    count: u32,
}

impl Sequence {
    /// Create an empty sequence that runs `repetitions` times
    ///
    /// Zero repetitions runs the sequence once.
    pub const fn new(repetitions: u32) -> Self {
        Self {
            steps: Vec::new(),
            total: Duration::from_millis(0),
            repetitions,
            start_time: Instant::from_ticks(0),
            next_step_time: Instant::from_ticks(0),
            index: 0,
            count: 0,
        }
    }

    /// Append a step `gap` after the previous one
    ///
    /// A zero gap makes the step fire together with the previous step.
    pub fn add_step(
        &mut self,
        gap: Duration,
        leds: impl Into<LedSet>,
        intensity: u8,
    ) -> Result<(), AnimationError> {
        let offset = self.total + gap;
        self.steps
            .push(SequenceStep {
                offset,
                leds: leds.into(),
                intensity,
            })
            .map_err(|_| AnimationError::SequenceFull)?;
        self.total = offset;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Completed runs through the whole sequence
    pub const fn repetition(&self) -> u32 {
        self.count
    }

    fn first_offset(&self) -> Duration {
        self.steps
            .first()
            .map_or(Duration::from_millis(0), |step| step.offset)
    }
}

impl Animate for Sequence {
    fn initialize(&mut self, now: Instant) {
        self.start_time = now;
        self.next_step_time = now + self.first_offset();
        self.index = 0;
        self.count = 0;
    }

    fn next_step(&self, now: Instant) -> NextStep {
        if self.index >= self.steps.len() {
            NextStep::Complete
        } else {
            NextStep::until(self.next_step_time, now)
        }
    }

    fn execute_next_step(&mut self, now: Instant, leds: &LedRegistry) {
        let Some(current) = self.steps.get(self.index) else {
            return;
        };
        if now < self.next_step_time {
            return;
        }

        let offset = current.offset;
        while let Some(step) = self.steps.get(self.index) {
            if step.offset != offset {
                break;
            }
            leds.set_all(step.leds, step.intensity);
            self.index += 1;
        }

        if let Some(next) = self.steps.get(self.index) {
            self.next_step_time = self.start_time + next.offset;
            return;
        }

        self.count += 1;
        if self.count < self.repetitions {
            self.start_time = now;
            self.index = 0;
            self.next_step_time = now + self.first_offset();
        }
    }

    fn managed_leds(&self) -> LedSet {
        self.steps
            .iter()
            .fold(LedSet::new(), |managed, step| managed.union(step.leds))
    }
}
