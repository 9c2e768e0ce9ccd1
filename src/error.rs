use core::fmt;

/// Intensity outside of the `0..=255` range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntensityError(pub i32);

impl fmt::Display for IntensityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "intensity {} is outside of 0..=255", self.0)
    }
}

impl core::error::Error for IntensityError {}

/// Invalid animation parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationError {
    /// Blinker ramp configured with zero steps
    ZeroSteps,
    /// Low intensity of a ramp is above the high intensity
    InvertedRange,
    /// Sequence has no room for another step
    SequenceFull,
}

impl fmt::Display for AnimationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroSteps => f.write_str("ramp needs at least one step"),
            Self::InvertedRange => f.write_str("low intensity is above high intensity"),
            Self::SequenceFull => f.write_str("sequence step capacity exhausted"),
        }
    }
}

impl core::error::Error for AnimationError {}

/// Animator failures
///
/// `E` is the error type of the device sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnimatorError<E> {
    /// The animator is already running
    AlreadyStarted,
    /// No room for another animation
    TooManyAnimations,
    /// No animation registered under the given id
    UnknownAnimation,
    /// Device commit failed, the animator stopped
    Device(E),
}

impl<E: fmt::Debug> fmt::Display for AnimatorError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyStarted => f.write_str("animator already started"),
            Self::TooManyAnimations => f.write_str("animation capacity exhausted"),
            Self::UnknownAnimation => f.write_str("unknown animation"),
            Self::Device(err) => write!(f, "device commit failed: {:?}", err),
        }
    }
}

impl<E: fmt::Debug> core::error::Error for AnimatorError<E> {}
