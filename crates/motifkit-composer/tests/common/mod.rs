//! Shared fixtures for composer integration tests.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use image::{DynamicImage, Rgba, RgbaImage};
use motifkit_composer::{Composer, ImageFetcher};
use motifkit_core::types::{ImageSource, ItemData};
use motifkit_core::{ComposerError, Result};

/// In-memory fetcher serving a solid-color image per source. Sources
/// under `/broken/` fail, which lets tests exercise partial and total
/// load failures without touching the filesystem.
pub struct StubFetcher {
    pub width: u32,
    pub height: u32,
}

impl Default for StubFetcher {
    fn default() -> Self {
        Self {
            width: 200,
            height: 200,
        }
    }
}

#[async_trait]
impl ImageFetcher for StubFetcher {
    async fn fetch(&self, source: &str) -> Result<DynamicImage> {
        if source.starts_with("/broken/") {
            return Err(ComposerError::ImageLoad {
                asset: source.to_string(),
                reason: "stub failure".to_string(),
            });
        }
        // Derive a color from the source so rendered tests can tell
        // objects apart.
        let tint = source.bytes().fold(0u8, |acc, b| acc.wrapping_add(b));
        Ok(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            self.width,
            self.height,
            Rgba([tint, 64, 128, 255]),
        )))
    }
}

pub fn composer() -> Composer {
    init_tracing();
    Composer::new(Arc::new(StubFetcher::default()))
}

/// Installs a test subscriber once so `RUST_LOG` works when debugging
/// a failing test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn item(name: &str) -> ItemData {
    ItemData::new(name, format!("/assets/{name}.png"))
}

pub fn sized_item(name: &str, mm: f64) -> ItemData {
    let mut data = item(name);
    data.size_in_mm = Some(mm);
    data
}

pub fn variant_item(id: &str, name: &str, size: &str) -> ItemData {
    let mut data = item(name);
    data.id = Some(id.to_string());
    data.selected_size = Some(size.to_string());
    data
}

pub fn multi_image_item(name: &str, count: usize) -> ItemData {
    let mut data = item(name);
    data.images = (0..count)
        .map(|i| ImageSource::new(format!("/assets/{name}-{i}.png")))
        .collect();
    data
}
