//! Fixed engine constants.
//!
//! All logical sizes are in CSS-style pixels on the composition canvas.

/// Screen resolution assumed when converting physical sizes to pixels.
pub const SCREEN_DPI: f64 = 96.0;

/// Millimeters per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Longest displayed dimension for items without a declared physical size.
pub const DEFAULT_MAX_DIMENSION: f64 = 100.0;

/// Pixel offset between successive images of one multi-image placement.
pub const PLACEMENT_OFFSET: f64 = 30.0;

/// Pixel offset applied to a duplicated object relative to its original.
pub const DUPLICATE_OFFSET: f64 = 20.0;

/// Maximum number of history snapshots retained; oldest evicted first.
pub const HISTORY_CAPACITY: usize = 50;

/// Logical canvas width.
pub const CANVAS_WIDTH: f64 = 1400.0;

/// Logical canvas height.
pub const CANVAS_HEIGHT: f64 = 1000.0;

/// Width of the logical region a background image is scaled into.
pub const BACKGROUND_WIDTH: f64 = 800.0;

/// Height of the logical region a background image is scaled into.
pub const BACKGROUND_HEIGHT: f64 = 600.0;

/// Supersampling multiplier for PNG export.
pub const EXPORT_MULTIPLIER: u32 = 2;

/// Minimum view zoom (50%).
pub const MIN_ZOOM: f64 = 0.5;

/// Maximum view zoom (200%).
pub const MAX_ZOOM: f64 = 2.0;

/// Zoom step per zoom-in/zoom-out request (10%).
pub const ZOOM_STEP: f64 = 0.1;

/// Converts a physical size in millimeters to logical pixels.
pub fn mm_to_px(mm: f64) -> f64 {
    mm / MM_PER_INCH * SCREEN_DPI
}
