//! Placement geometry for item images.
//!
//! Pure helpers: given a logical item and the natural size of one of
//! its images, compute where the image lands on the canvas and at what
//! scale. The async load-and-add loop lives in the composer; keeping
//! the math here keeps it independently testable.

use motifkit_core::constants::{
    mm_to_px, CANVAS_HEIGHT, CANVAS_WIDTH, DEFAULT_MAX_DIMENSION, PLACEMENT_OFFSET,
};
use motifkit_core::types::ItemData;
use motifkit_core::{ComposerError, Result};

use crate::object::Transform;

/// Resolvable image sources of an item, in declared order.
///
/// Fails with `MissingImage` when the item has no non-empty source.
pub fn image_sources(item: &ItemData) -> Result<Vec<String>> {
    let sources: Vec<String> = item
        .images
        .iter()
        .map(|s| s.url.clone())
        .filter(|u| !u.is_empty())
        .collect();
    if sources.is_empty() {
        return Err(ComposerError::MissingImage {
            item: item.name.clone(),
        });
    }
    Ok(sources)
}

/// Uniform scale for one image of an item.
///
/// Items with a declared physical size display at real-world size:
/// the longer dimension is scaled to `size_in_mm` at 96 DPI. Others
/// are capped so the longer dimension does not exceed 100 px.
pub fn scale_for(item: &ItemData, natural_width: u32, natural_height: u32) -> f64 {
    let w = natural_width as f64;
    let h = natural_height as f64;
    match item.size_in_mm {
        Some(mm) if mm > 0.0 => {
            let target = mm_to_px(mm);
            target / w.max(h)
        }
        _ => (DEFAULT_MAX_DIMENSION / w).min(DEFAULT_MAX_DIMENSION / h),
    }
}

/// Transform for the `index`-th image of one placement: canvas center,
/// offset by a fixed delta per image so copies don't fully overlap.
pub fn transform_for(item: &ItemData, index: usize, natural_width: u32, natural_height: u32) -> Transform {
    let scale = scale_for(item, natural_width, natural_height);
    let offset = index as f64 * PLACEMENT_OFFSET;
    Transform::at(
        CANVAS_WIDTH / 2.0 + offset,
        CANVAS_HEIGHT / 2.0 + offset,
        scale,
    )
}
