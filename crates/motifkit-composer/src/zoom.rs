//! View zoom state.
//!
//! Pure view concern: the zoom level scales the rendered canvas in the
//! host UI and is excluded from history snapshots.

use motifkit_core::constants::{MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};

/// Clamped zoom level with fixed steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomControl {
    level: f64,
}

impl Default for ZoomControl {
    fn default() -> Self {
        Self::new()
    }
}

impl ZoomControl {
    /// Creates a control at 100%.
    pub fn new() -> Self {
        Self { level: 1.0 }
    }

    /// Current zoom level (1.0 = 100%).
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Steps the zoom in, clamped to the maximum.
    pub fn zoom_in(&mut self) {
        self.level = (self.level + ZOOM_STEP).min(MAX_ZOOM);
    }

    /// Steps the zoom out, clamped to the minimum.
    pub fn zoom_out(&mut self) {
        self.level = (self.level - ZOOM_STEP).max(MIN_ZOOM);
    }

    /// Whether zooming in would change the level (drives button state).
    pub fn can_zoom_in(&self) -> bool {
        self.level < MAX_ZOOM
    }

    /// Whether zooming out would change the level.
    pub fn can_zoom_out(&self) -> bool {
        self.level > MIN_ZOOM
    }
}
