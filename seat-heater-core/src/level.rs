//! Heating levels and the static definitions attached to them.
//!
//! The selectable levels form a fixed four-step cycle. Each non-Off level
//! carries a hysteresis band and an indicator pattern; Off has neither and
//! forces the heater and indicator off.

use core::fmt;

use crate::indicator::IndicatorPattern;

/// Heating level selected for a seat.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
pub enum HeatLevel {
    #[default]
    Off,
    Low,
    Medium,
    High,
}

/// Levels in cycle order, starting from the power-on level.
pub const ALL_LEVELS: [HeatLevel; 4] = [
    HeatLevel::Off,
    HeatLevel::Low,
    HeatLevel::Medium,
    HeatLevel::High,
];

impl HeatLevel {
    /// Next level in the cycle `Off → Low → Medium → High → Off`.
    #[must_use]
    pub const fn advance(self) -> Self {
        match self {
            HeatLevel::Off => HeatLevel::Low,
            HeatLevel::Low => HeatLevel::Medium,
            HeatLevel::Medium => HeatLevel::High,
            HeatLevel::High => HeatLevel::Off,
        }
    }

    #[must_use]
    pub const fn is_off(self) -> bool {
        matches!(self, HeatLevel::Off)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            HeatLevel::Off => "off",
            HeatLevel::Low => "low",
            HeatLevel::Medium => "medium",
            HeatLevel::High => "high",
        }
    }

    /// Deterministic index used by telemetry codes.
    #[must_use]
    pub const fn as_index(self) -> u16 {
        match self {
            HeatLevel::Off => 0,
            HeatLevel::Low => 1,
            HeatLevel::Medium => 2,
            HeatLevel::High => 3,
        }
    }

    #[must_use]
    pub const fn from_index(index: u16) -> Option<Self> {
        match index {
            0 => Some(HeatLevel::Off),
            1 => Some(HeatLevel::Low),
            2 => Some(HeatLevel::Medium),
            3 => Some(HeatLevel::High),
            _ => None,
        }
    }
}

impl fmt::Display for HeatLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Target temperature and hysteresis half-width for a heating level.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HysteresisBand {
    pub target_c: f32,
    pub tolerance_c: f32,
}

impl HysteresisBand {
    #[must_use]
    pub const fn new(target_c: f32, tolerance_c: f32) -> Self {
        Self {
            target_c,
            tolerance_c,
        }
    }

    /// Below this temperature the heater switches on.
    #[must_use]
    pub fn lower_c(&self) -> f32 {
        self.target_c - self.tolerance_c
    }

    /// Above this temperature the heater switches off.
    #[must_use]
    pub fn upper_c(&self) -> f32 {
        self.target_c + self.tolerance_c
    }

    /// Returns `true` for finite, non-negative target and tolerance.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.target_c.is_finite()
            && self.tolerance_c.is_finite()
            && self.target_c >= 0.0
            && self.tolerance_c >= 0.0
    }
}

/// Everything the control loop needs to know about one level.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LevelDefinition {
    pub level: HeatLevel,
    /// `None` only for [`HeatLevel::Off`].
    pub band: Option<HysteresisBand>,
    pub indicator: IndicatorPattern,
}

impl LevelDefinition {
    /// The fixed definition for Off: no target, indicator dark.
    pub const OFF: LevelDefinition = LevelDefinition {
        level: HeatLevel::Off,
        band: None,
        indicator: IndicatorPattern::NONE,
    };
}

/// Tunable settings for one heating (non-Off) level.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LevelSetting {
    pub band: HysteresisBand,
    pub indicator: IndicatorPattern,
}

impl LevelSetting {
    #[must_use]
    pub const fn new(target_c: f32, tolerance_c: f32, indicator: IndicatorPattern) -> Self {
        Self {
            band: HysteresisBand::new(target_c, tolerance_c),
            indicator,
        }
    }
}

/// Read-only table shared by both seats.
///
/// Off is not configurable; its definition is always [`LevelDefinition::OFF`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LevelTable {
    pub low: LevelSetting,
    pub medium: LevelSetting,
    pub high: LevelSetting,
}

/// Tolerance used by the default table.
pub const DEFAULT_TOLERANCE_C: f32 = 2.0;

/// Targets and patterns of the reference board.
pub const DEFAULT_LEVEL_TABLE: LevelTable = LevelTable {
    low: LevelSetting::new(25.0, DEFAULT_TOLERANCE_C, IndicatorPattern::GREEN),
    medium: LevelSetting::new(30.0, DEFAULT_TOLERANCE_C, IndicatorPattern::BLUE),
    high: LevelSetting::new(35.0, DEFAULT_TOLERANCE_C, IndicatorPattern::CYAN),
};

impl LevelTable {
    /// Looks up the definition for `level`.
    #[must_use]
    pub const fn definition(&self, level: HeatLevel) -> LevelDefinition {
        let setting = match level {
            HeatLevel::Off => return LevelDefinition::OFF,
            HeatLevel::Low => self.low,
            HeatLevel::Medium => self.medium,
            HeatLevel::High => self.high,
        };
        LevelDefinition {
            level,
            band: Some(setting.band),
            indicator: setting.indicator,
        }
    }

    /// Iterates over the heating levels paired with their settings.
    pub fn settings(&self) -> impl Iterator<Item = (HeatLevel, &LevelSetting)> {
        [
            (HeatLevel::Low, &self.low),
            (HeatLevel::Medium, &self.medium),
            (HeatLevel::High, &self.high),
        ]
        .into_iter()
    }
}

impl Default for LevelTable {
    fn default() -> Self {
        DEFAULT_LEVEL_TABLE
    }
}
