pub mod animation;
pub mod animator;
pub mod board;
pub mod error;
pub mod gamma;
pub mod led;
pub mod registry;
pub mod scheduler;

pub use animation::{
    Animate, Animation, AnimationKind, Blinker, BlinkerConfig, FOREVER, NextStep, OneShot,
    Sequence,
};
pub use animator::{Animator, Termination};
pub use board::{BoardConfig, BoardError, PiGlow};
pub use error::{AnimationError, AnimatorError, IntensityError};
pub use gamma::{GAMMA_LUT, gamma};
pub use led::{Arm, Color, FIRST_LED_ADDRESS, LED_COUNT, Led, LedSet};
pub use registry::{LedRegistry, Snapshot};
pub use scheduler::{AnimationId, AnimationScheduler, Frame, Wake};

pub use embassy_time::{Duration, Instant};

/// Abstract LED device trait
///
/// Implement this trait to drive a different transport or a simulator.
/// The animator is generic over this trait.
pub trait DeviceSink {
    type Error: core::fmt::Debug;

    /// Write raw intensities to consecutive registers starting at `start_address`
    fn write(&mut self, start_address: u8, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Latch previously written values so they become visible
    fn commit(&mut self) -> Result<(), Self::Error>;

    /// Write all stored intensities and commit them
    fn update(&mut self, leds: &LedRegistry) -> Result<(), Self::Error> {
        self.write(FIRST_LED_ADDRESS, &leds.snapshot())?;
        self.commit()
    }

    /// Turn every LED off, in the registry and on the device
    fn all_off(&mut self, leds: &LedRegistry) -> Result<(), Self::Error> {
        leds.all_off();
        self.update(leds)
    }
}
