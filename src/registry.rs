//! LED intensity registry
//!
//! Holds the current intensity of every LED of the board and the gamma
//! correction toggle. The registry is shared between the caller and the
//! animator thread, so the store lives behind a critical section.
//!
//! ```ignore
//! static LEDS: LedRegistry = LedRegistry::new();
//!
//! LEDS.set_gamma_mode(true);
//! LEDS.set_intensity(Led::find(Arm::Top, Color::Red), 200)?;
//! ```

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, Ordering};

use critical_section::Mutex;

use crate::error::IntensityError;
use crate::gamma::gamma;
use crate::led::{LED_COUNT, Led, LedSet};

/// Intensities of the board LEDs indexed by `address - 1`
pub type Snapshot = [u8; LED_COUNT];

/// Intensity store for the 18 board LEDs
pub struct LedRegistry {
    intensities: Mutex<RefCell<Snapshot>>,
    gamma: AtomicBool,
}

impl LedRegistry {
    /// Create a registry with every LED off and gamma correction disabled
    pub const fn new() -> Self {
        Self {
            intensities: Mutex::new(RefCell::new([0; LED_COUNT])),
            gamma: AtomicBool::new(false),
        }
    }

    /// Enable or disable gamma correction
    ///
    /// Affects subsequent sets only, stored values are left untouched.
    pub fn set_gamma_mode(&self, enabled: bool) {
        self.gamma.store(enabled, Ordering::Relaxed);
    }

    pub fn gamma_mode(&self) -> bool {
        self.gamma.load(Ordering::Relaxed)
    }

    /// Set the intensity of an LED
    ///
    /// Values outside of `0..=255` are rejected and the stored value is kept.
    pub fn set_intensity(&self, led: Led, value: i32) -> Result<(), IntensityError> {
        let value = u8::try_from(value).map_err(|_| IntensityError(value))?;
        self.set(led, value);
        Ok(())
    }

    /// Set the intensity of an LED from an in-range value
    pub fn set(&self, led: Led, value: u8) {
        let value = if self.gamma_mode() { gamma(value) } else { value };
        self.store(led, value);
    }

    /// Set every LED of a set to the same intensity
    pub fn set_all(&self, leds: LedSet, value: u8) {
        let value = if self.gamma_mode() { gamma(value) } else { value };
        critical_section::with(|cs| {
            let mut intensities = self.intensities.borrow(cs).borrow_mut();
            for led in leds.iter() {
                intensities[led.index()] = value;
            }
        });
    }

    /// Stored intensity of an LED
    pub fn intensity(&self, led: Led) -> u8 {
        critical_section::with(|cs| self.intensities.borrow(cs).borrow()[led.index()])
    }

    /// Copy of all stored intensities in address order
    pub fn snapshot(&self) -> Snapshot {
        critical_section::with(|cs| *self.intensities.borrow(cs).borrow())
    }

    /// Turn every LED off in the store
    pub fn all_off(&self) {
        critical_section::with(|cs| {
            *self.intensities.borrow(cs).borrow_mut() = [0; LED_COUNT];
        });
    }

    /// Store a raw value, bypassing gamma correction
    pub(crate) fn store(&self, led: Led, value: u8) {
        critical_section::with(|cs| {
            self.intensities.borrow(cs).borrow_mut()[led.index()] = value;
        });
    }

    /// Overwrite the stored values of `leds` with the ones from `snapshot`
    pub(crate) fn restore(&self, leds: LedSet, snapshot: &Snapshot) {
        critical_section::with(|cs| {
            let mut intensities = self.intensities.borrow(cs).borrow_mut();
            for led in leds.iter() {
                intensities[led.index()] = snapshot[led.index()];
            }
        });
    }
}

impl Default for LedRegistry {
    fn default() -> Self {
        Self::new()
    }
}
