//! LED identities of the PiGlow board
//!
//! The board carries 18 LEDs on three arms. Every arm has one LED of each
//! of the six colors, so an `(arm, color)` pair always names exactly one LED.
//! The identity table is fixed at compile time; lookups are total.

use core::fmt;

/// Number of LEDs on the board
pub const LED_COUNT: usize = 18;

/// Board address of the first LED register
pub const FIRST_LED_ADDRESS: u8 = 1;

/// Arms of the board, named by the position of their red LED
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Arm {
    Top = 0,
    Left = 1,
    Right = 2,
}

impl Arm {
    pub const ALL: [Arm; 3] = [Arm::Top, Arm::Left, Arm::Right];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// LED colors, ordered from the center of the board outward
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Blue = 1,
    Green = 2,
    Yellow = 3,
    Orange = 4,
    Red = 5,
}

impl Color {
    pub const ALL: [Color; 6] = [
        Color::White,
        Color::Blue,
        Color::Green,
        Color::Yellow,
        Color::Orange,
        Color::Red,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Orange => "orange",
            Self::Red => "red",
        }
    }
}

/// Board addresses indexed by `[arm][color]`
const ADDRESSES: [[u8; 6]; 3] = [
    // Top
    [10, 5, 6, 9, 8, 7],
    // Left
    [13, 15, 4, 3, 2, 1],
    // Right
    [11, 12, 14, 16, 17, 18],
];

/// A single LED on the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Led {
    arm: Arm,
    color: Color,
}

impl Led {
    /// All LEDs in ascending address order
    pub const ALL: [Led; LED_COUNT] = [
        Led::find(Arm::Left, Color::Red),
        Led::find(Arm::Left, Color::Orange),
        Led::find(Arm::Left, Color::Yellow),
        Led::find(Arm::Left, Color::Green),
        Led::find(Arm::Top, Color::Blue),
        Led::find(Arm::Top, Color::Green),
        Led::find(Arm::Top, Color::Red),
        Led::find(Arm::Top, Color::Orange),
        Led::find(Arm::Top, Color::Yellow),
        Led::find(Arm::Top, Color::White),
        Led::find(Arm::Right, Color::White),
        Led::find(Arm::Right, Color::Blue),
        Led::find(Arm::Left, Color::White),
        Led::find(Arm::Right, Color::Green),
        Led::find(Arm::Left, Color::Blue),
        Led::find(Arm::Right, Color::Yellow),
        Led::find(Arm::Right, Color::Orange),
        Led::find(Arm::Right, Color::Red),
    ];

    /// Get the LED of a color on an arm
    pub const fn find(arm: Arm, color: Color) -> Self {
        Self { arm, color }
    }

    /// Get the LED at a board address (1-based)
    pub const fn from_address(address: u8) -> Option<Self> {
        if address < FIRST_LED_ADDRESS || address as usize > LED_COUNT {
            return None;
        }
        Some(Self::ALL[(address - FIRST_LED_ADDRESS) as usize])
    }

    /// LEDs of an arm, ordered by color
    pub const fn by_arm(arm: Arm) -> [Led; 6] {
        let mut leds = [Led::find(arm, Color::White); 6];
        let mut i = 0;
        while i < 6 {
            leds[i] = Led::find(arm, Color::ALL[i]);
            i += 1;
        }
        leds
    }

    /// LEDs of a color, ordered by arm
    pub const fn by_color(color: Color) -> [Led; 3] {
        [
            Led::find(Arm::Top, color),
            Led::find(Arm::Left, color),
            Led::find(Arm::Right, color),
        ]
    }

    pub const fn arm(self) -> Arm {
        self.arm
    }

    pub const fn color(self) -> Color {
        self.color
    }

    /// Board address of the LED (1-based)
    pub const fn address(self) -> u8 {
        ADDRESSES[self.arm as usize][self.color as usize]
    }

    /// Zero-based index of the LED in address order
    pub const fn index(self) -> usize {
        (self.address() - FIRST_LED_ADDRESS) as usize
    }
}

impl fmt::Display for Led {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.arm.as_str(), self.color.as_str())
    }
}

/// Set of LEDs
///
/// Iteration always yields LEDs in ascending address order.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LedSet {
    bits: u32,
}

impl LedSet {
    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    /// Set containing every LED of the board
    pub const fn all() -> Self {
        Self {
            bits: (1 << LED_COUNT) - 1,
        }
    }

    pub const fn len(self) -> usize {
        self.bits.count_ones() as usize
    }

    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    pub const fn contains(self, led: Led) -> bool {
        self.bits & (1 << led.index()) != 0
    }

    /// Add an LED, returns `false` if it was already present
    pub fn insert(&mut self, led: Led) -> bool {
        let present = self.contains(led);
        self.bits |= 1 << led.index();
        !present
    }

    #[must_use]
    pub const fn union(self, other: LedSet) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    pub fn iter(self) -> impl Iterator<Item = Led> {
        Led::ALL
            .into_iter()
            .filter(move |led| self.contains(*led))
    }
}

impl From<Led> for LedSet {
    fn from(led: Led) -> Self {
        let mut set = Self::new();
        set.insert(led);
        set
    }
}

impl<const N: usize> From<[Led; N]> for LedSet {
    fn from(leds: [Led; N]) -> Self {
        leds.into_iter().collect()
    }
}

impl From<&[Led]> for LedSet {
    fn from(leds: &[Led]) -> Self {
        leds.iter().copied().collect()
    }
}

impl FromIterator<Led> for LedSet {
    fn from_iter<I: IntoIterator<Item = Led>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl Extend<Led> for LedSet {
    fn extend<I: IntoIterator<Item = Led>>(&mut self, iter: I) {
        for led in iter {
            self.insert(led);
        }
    }
}

impl fmt::Debug for LedSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
