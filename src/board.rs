//! PiGlow board driver
//!
//! Talks to the SN3218 LED controller of the board over any
//! [`embedded_hal::i2c::I2c`] bus. Written PWM values only become visible
//! after a write to the update register, which [`DeviceSink::commit`] does.

use core::fmt;

use embedded_hal::i2c::I2c;

use crate::DeviceSink;
use crate::led::{FIRST_LED_ADDRESS, LED_COUNT, Led};
use crate::registry::LedRegistry;

/// Default I2C address of the SN3218
pub const DEFAULT_I2C_ADDRESS: u8 = 0x54;

const ENABLE_OUTPUT_REGISTER: u8 = 0x00;
const ENABLE_OUTPUT: u8 = 0x01;
const ENABLE_TOP_ARM_REGISTER: u8 = 0x13;
const ENABLE_LEFT_ARM_REGISTER: u8 = 0x14;
const ENABLE_RIGHT_ARM_REGISTER: u8 = 0x15;
const UPDATE_REGISTER: u8 = 0x16;
const ENABLE_ALL: u8 = 0xFF;

/// Board configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardConfig {
    /// I2C address of the LED controller
    pub address: u8,
}

impl BoardConfig {
    pub const DEFAULT: Self = Self {
        address: DEFAULT_I2C_ADDRESS,
    };
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Board errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError<E> {
    /// Bus transfer failed
    I2c(E),
    /// Write would run past the last PWM register
    OutOfRange,
}

impl<E: fmt::Debug> fmt::Display for BoardError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I2c(err) => write!(f, "i2c transfer failed: {:?}", err),
            Self::OutOfRange => f.write_str("write past the last led register"),
        }
    }
}

impl<E: fmt::Debug> core::error::Error for BoardError<E> {}

/// PiGlow board on an I2C bus
pub struct PiGlow<I2C> {
    i2c: I2C,
    config: BoardConfig,
}

impl<I2C: I2c> PiGlow<I2C> {
    pub const fn new(i2c: I2C, config: BoardConfig) -> Self {
        Self { i2c, config }
    }

    /// Enable the controller output and all three arms
    ///
    /// Must run once before the board shows anything.
    pub fn enable(&mut self) -> Result<(), BoardError<I2C::Error>> {
        self.write_register(ENABLE_OUTPUT_REGISTER, ENABLE_OUTPUT)?;
        self.write_register(ENABLE_TOP_ARM_REGISTER, ENABLE_ALL)?;
        self.write_register(ENABLE_LEFT_ARM_REGISTER, ENABLE_ALL)?;
        self.write_register(ENABLE_RIGHT_ARM_REGISTER, ENABLE_ALL)
    }

    /// Set a single LED and make it visible right away
    pub fn set_led_intensity(
        &mut self,
        led: Led,
        value: u8,
        leds: &LedRegistry,
    ) -> Result<(), BoardError<I2C::Error>> {
        leds.set(led, value);
        self.write(led.address(), &[leds.intensity(led)])?;
        self.commit()
    }

    /// Release the underlying bus
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), BoardError<I2C::Error>> {
        self.i2c
            .write(self.config.address, &[register, value])
            .map_err(BoardError::I2c)
    }
}

impl<I2C: I2c> DeviceSink for PiGlow<I2C> {
    type Error = BoardError<I2C::Error>;

    fn write(&mut self, start_address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        let first = usize::from(FIRST_LED_ADDRESS);
        let start = usize::from(start_address);
        if start < first || start + bytes.len() > first + LED_COUNT {
            return Err(BoardError::OutOfRange);
        }

        let mut buffer = [0u8; LED_COUNT + 1];
        buffer[0] = start_address;
        buffer[1..=bytes.len()].copy_from_slice(bytes);
        self.i2c
            .write(self.config.address, &buffer[..=bytes.len()])
            .map_err(BoardError::I2c)
    }

    fn commit(&mut self) -> Result<(), Self::Error> {
        self.write_register(UPDATE_REGISTER, ENABLE_ALL)
    }
}
