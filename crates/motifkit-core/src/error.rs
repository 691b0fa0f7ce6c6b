//! Error handling for MotifKit.
//!
//! Provides the composer error taxonomy:
//! - Placement errors (missing/unloadable item images)
//! - Background errors (missing source, decode failure)
//! - Export errors (PNG encode)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Composer error type
///
/// Represents failures of the composition engine's fallible operations.
/// History and purchase-list operations do not fail under normal
/// conditions; out-of-range undo/redo requests are no-ops, not errors.
#[derive(Error, Debug)]
pub enum ComposerError {
    /// The item carries no resolvable image source
    #[error("item '{item}' has no resolvable image source")]
    MissingImage {
        /// Display name of the offending item.
        item: String,
    },

    /// A single image asset could not be fetched or decoded
    #[error("failed to load image '{asset}': {reason}")]
    ImageLoad {
        /// The image source that failed.
        asset: String,
        /// Description of the fetch/decode failure.
        reason: String,
    },

    /// Every image of a multi-image placement failed to load
    #[error("all {attempted} image(s) of item '{item}' failed to load")]
    AllImagesFailed {
        /// Display name of the offending item.
        item: String,
        /// Number of image sources attempted.
        attempted: usize,
    },

    /// The background descriptor carries no resolvable image source
    #[error("background '{background}' has no resolvable image source")]
    MissingBackgroundSource {
        /// Display name of the offending background.
        background: String,
    },

    /// Serialization of session or snapshot state failed
    #[error("state serialization failed: {0}")]
    State(#[from] serde_json::Error),

    /// Image export failed
    #[error("image export failed: {reason}")]
    Export {
        /// Description of the encode failure.
        reason: String,
    },
}

/// Convenience result alias for composer operations.
pub type Result<T> = std::result::Result<T, ComposerError>;
