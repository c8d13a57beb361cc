//! Level → indicator mapping and the per-seat indicator pins.

use crate::hal::{DigitalOutputs, PinId, PinLevel};
use crate::level::{HeatLevel, LevelTable};

/// Color channel of a seat's status LED.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum IndicatorColor {
    Red,
    Green,
    Blue,
}

/// Set of indicator lines that are lit.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub struct IndicatorPattern(u8);

impl IndicatorPattern {
    const RED_BIT: u8 = 0b001;
    const GREEN_BIT: u8 = 0b010;
    const BLUE_BIT: u8 = 0b100;

    pub const NONE: IndicatorPattern = IndicatorPattern(0);
    pub const RED: IndicatorPattern = IndicatorPattern(Self::RED_BIT);
    pub const GREEN: IndicatorPattern = IndicatorPattern(Self::GREEN_BIT);
    pub const BLUE: IndicatorPattern = IndicatorPattern(Self::BLUE_BIT);
    pub const CYAN: IndicatorPattern = IndicatorPattern(Self::GREEN_BIT | Self::BLUE_BIT);

    const fn bit(color: IndicatorColor) -> u8 {
        match color {
            IndicatorColor::Red => Self::RED_BIT,
            IndicatorColor::Green => Self::GREEN_BIT,
            IndicatorColor::Blue => Self::BLUE_BIT,
        }
    }

    /// Returns a copy with `color` lit as well.
    #[must_use]
    pub const fn with(self, color: IndicatorColor) -> Self {
        Self(self.0 | Self::bit(color))
    }

    #[must_use]
    pub const fn is_lit(self, color: IndicatorColor) -> bool {
        self.0 & Self::bit(color) != 0
    }

    #[must_use]
    pub const fn is_dark(self) -> bool {
        self.0 == 0
    }
}

/// Pattern shown for `level`; a pure lookup into the level table.
#[must_use]
pub const fn render(table: &LevelTable, level: HeatLevel) -> IndicatorPattern {
    table.definition(level).indicator
}

/// GPIO lines of one seat's indicator. Boards may leave channels unwired.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct IndicatorPins {
    pub red: Option<PinId>,
    pub green: Option<PinId>,
    pub blue: Option<PinId>,
}

impl IndicatorPins {
    /// Fully wired RGB indicator.
    #[must_use]
    pub const fn rgb(red: PinId, green: PinId, blue: PinId) -> Self {
        Self {
            red: Some(red),
            green: Some(green),
            blue: Some(blue),
        }
    }

    /// Wired lines paired with their color.
    pub fn wired(&self) -> impl Iterator<Item = (IndicatorColor, PinId)> {
        [
            (IndicatorColor::Red, self.red),
            (IndicatorColor::Green, self.green),
            (IndicatorColor::Blue, self.blue),
        ]
        .into_iter()
        .filter_map(|(color, pin)| pin.map(|pin| (color, pin)))
    }

    /// Drives every wired line to match `pattern`.
    pub fn drive<O: DigitalOutputs>(&self, outputs: &mut O, pattern: IndicatorPattern) {
        for (color, pin) in self.wired() {
            outputs.set_digital_output(pin, PinLevel::from_on(pattern.is_lit(color)));
        }
    }
}
