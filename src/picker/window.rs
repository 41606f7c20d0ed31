//! Virtualization window and per-row emphasis for the wheel.

use std::ops::Range;

use serde::Serialize;

/// Visual prominence of a row, by distance from the centered row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Emphasis {
    Full,
    Strong,
    Moderate,
    Faint,
}

impl Emphasis {
    pub fn from_distance(distance: usize) -> Self {
        match distance {
            0 => Self::Full,
            1 => Self::Strong,
            2 => Self::Moderate,
            _ => Self::Faint,
        }
    }

    pub fn opacity(self) -> f32 {
        match self {
            Self::Full => 1.0,
            Self::Strong => 0.6,
            Self::Moderate => 0.35,
            Self::Faint => 0.15,
        }
    }

    pub fn scale(self) -> f32 {
        match self {
            Self::Full => 1.0,
            Self::Strong => 0.85,
            Self::Moderate => 0.75,
            Self::Faint => 0.7,
        }
    }
}

/// One realized row of the wheel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickerItem {
    /// Absolute index into `[min, max]`. Stable across re-windowing, so hosts
    /// can key their views on it.
    pub key: usize,
    pub value: i32,
    pub label: String,
    pub emphasis: Emphasis,
}

/// Absolute indices to realize around `center` in a list of `len` rows.
pub fn visible_window(
    center: usize,
    len: usize,
    viewport_items: usize,
    overscan: usize,
) -> Range<usize> {
    if len == 0 {
        return 0..0;
    }
    let reach = viewport_items / 2 + overscan;
    let center = center.min(len - 1);
    let start = center.saturating_sub(reach);
    let end = center.saturating_add(reach).saturating_add(1).min(len);
    start..end
}
