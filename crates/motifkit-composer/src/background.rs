//! Background state construction.
//!
//! A background image is scaled into the fixed 800x600 logical region
//! and centered behind all placed items. Backgrounds are captured as
//! part of surface snapshots, never versioned on their own.

use motifkit_core::constants::{BACKGROUND_HEIGHT, BACKGROUND_WIDTH};
use motifkit_core::types::{BackgroundDescriptor, CustomBackground};
use motifkit_core::{ComposerError, Result};

use crate::surface::BackgroundState;

/// Resolves the image source of a descriptor.
///
/// Fails with `MissingBackgroundSource` when the descriptor has no
/// non-empty source.
pub fn resolve_source(descriptor: &BackgroundDescriptor) -> Result<String> {
    match descriptor.src.as_deref() {
        Some(src) if !src.is_empty() => Ok(src.to_string()),
        _ => Err(ComposerError::MissingBackgroundSource {
            background: descriptor.name.clone(),
        }),
    }
}

/// Cache key under which a custom upload's pixels are stored.
pub fn custom_source_key(custom: &CustomBackground) -> String {
    format!("custom:{}", custom.name)
}

fn region_scale(natural_width: u32, natural_height: u32) -> (f64, f64) {
    (
        BACKGROUND_WIDTH / natural_width as f64,
        BACKGROUND_HEIGHT / natural_height as f64,
    )
}

/// Background state for a remote descriptor whose image decoded to the
/// given natural size.
pub fn remote_state(
    descriptor: &BackgroundDescriptor,
    source_key: String,
    natural_width: u32,
    natural_height: u32,
) -> BackgroundState {
    let (scale_x, scale_y) = region_scale(natural_width, natural_height);
    BackgroundState {
        name: descriptor.name.clone(),
        descriptor: Some(descriptor.clone()),
        source_key,
        natural_width,
        natural_height,
        scale_x,
        scale_y,
    }
}

/// Background state for a locally-uploaded image.
pub fn custom_state(
    custom: &CustomBackground,
    source_key: String,
    natural_width: u32,
    natural_height: u32,
) -> BackgroundState {
    let (scale_x, scale_y) = region_scale(natural_width, natural_height);
    BackgroundState {
        name: custom.name.clone(),
        descriptor: None,
        source_key,
        natural_width,
        natural_height,
        scale_x,
        scale_y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_without_source_is_an_error() {
        let mut descriptor = BackgroundDescriptor::new("Beach", "/beach.png");
        assert_eq!(resolve_source(&descriptor).unwrap(), "/beach.png");

        descriptor.src = None;
        assert!(matches!(
            resolve_source(&descriptor),
            Err(ComposerError::MissingBackgroundSource { .. })
        ));

        descriptor.src = Some(String::new());
        assert!(resolve_source(&descriptor).is_err());
    }

    #[test]
    fn background_scales_into_fixed_region() {
        let descriptor = BackgroundDescriptor::new("Beach", "/beach.png");
        let state = remote_state(&descriptor, "/beach.png".into(), 1600, 1200);
        assert_eq!(state.scale_x, 0.5);
        assert_eq!(state.scale_y, 0.5);
        assert_eq!(state.natural_width, 1600);
    }
}
