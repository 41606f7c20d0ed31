//! Unit conversion — linear metric/imperial conversion with integer rounding.
//!
//! All picker values are whole numbers. Conversions multiply or divide by a
//! fixed factor and round half away from zero, so a forward conversion
//! followed by the backward one drifts by at most one unit.

use serde::{Deserialize, Serialize};

/// Centimeters per inch.
pub const CM_PER_INCH: f64 = 2.54;

/// Pounds per kilogram.
pub const LB_PER_KG: f64 = 2.205;

/// Inclusive integer bounds for a picker in one unit system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: i32,
    pub max: i32,
}

impl ValueRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Whether `min <= max`.
    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }

    pub fn contains(&self, value: i32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Number of representable values. Zero for an inverted range.
    pub fn len(&self) -> usize {
        if self.is_valid() {
            (i64::from(self.max) - i64::from(self.min) + 1) as usize
        } else {
            0
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bound `value` to this range.
    pub fn clamp(&self, value: i32) -> i32 {
        clamp(value, *self)
    }
}

impl std::fmt::Display for ValueRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// Which way a factor is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Multiply,
    Divide,
}

impl Direction {
    pub fn inverse(self) -> Self {
        match self {
            Self::Multiply => Self::Divide,
            Self::Divide => Self::Multiply,
        }
    }
}

/// A linear conversion between a step's primary and secondary unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    pub factor: f64,
    /// How `factor` is applied going from the primary to the secondary unit.
    pub to_secondary: Direction,
}

impl Conversion {
    /// Centimeters to inches.
    pub const fn cm_to_inches() -> Self {
        Self {
            factor: CM_PER_INCH,
            to_secondary: Direction::Divide,
        }
    }

    /// Kilograms to pounds.
    pub const fn kg_to_pounds() -> Self {
        Self {
            factor: LB_PER_KG,
            to_secondary: Direction::Multiply,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.factor.is_finite() && self.factor > 0.0
    }

    pub fn to_secondary(&self, value: i32) -> i32 {
        convert(value, self.factor, self.to_secondary)
    }

    pub fn to_primary(&self, value: i32) -> i32 {
        convert(value, self.factor, self.to_secondary.inverse())
    }
}

/// Apply `factor` to `value` and round half away from zero.
///
/// Results outside `i32` saturate at the type bounds.
pub fn convert(value: i32, factor: f64, direction: Direction) -> i32 {
    let raw = match direction {
        Direction::Multiply => f64::from(value) * factor,
        Direction::Divide => f64::from(value) / factor,
    };
    // f64::round rounds half away from zero; `as` saturates.
    raw.round() as i32
}

/// Bound `value` to `[range.min, range.max]`.
pub fn clamp(value: i32, range: ValueRange) -> i32 {
    if value < range.min {
        range.min
    } else if value > range.max {
        range.max
    } else {
        value
    }
}

/// Render a total inch count as `feet'inches"`, e.g. `65 -> 5'5"`.
pub fn format_feet_inches(total_inches: i32) -> String {
    let feet = total_inches.div_euclid(12);
    let inches = total_inches.rem_euclid(12);
    format!("{feet}'{inches}\"")
}
