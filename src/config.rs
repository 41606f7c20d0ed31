//! Configuration types.

use std::time::Duration;

/// Wizard and picker tunables.
#[derive(Debug, Clone)]
pub struct WizardConfig {
    /// Height of one picker row in pixels. Constant across the list so that
    /// offset and index map affinely.
    pub item_extent: f32,
    /// Rows visible in the picker viewport.
    pub viewport_items: usize,
    /// Extra rows realized above and below the viewport.
    pub overscan: usize,
    /// Delay before the first re-center after mount, so the host layout pass
    /// has settled.
    pub recenter_delay: Duration,
    /// Release velocity (px/s) at or below which a drag settles immediately
    /// instead of entering momentum.
    pub velocity_epsilon: f32,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            item_extent: 48.0,
            viewport_items: 5,
            overscan: 3,
            recenter_delay: Duration::from_millis(50),
            velocity_epsilon: 0.5,
        }
    }
}
