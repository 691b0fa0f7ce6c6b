//! Image fetching and the decoded-pixel cache.
//!
//! The engine never talks to the network itself: the application shell
//! injects an [`ImageFetcher`] and the composer caches decoded pixels
//! by source key. The cache outlives history snapshots, so restoring
//! an older state never re-fetches assets that were already loaded in
//! this session.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use image::DynamicImage;
use motifkit_core::{ComposerError, Result};

/// Capability to fetch and decode an image asset by source key.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Fetches and decodes the asset at `source`.
    async fn fetch(&self, source: &str) -> Result<DynamicImage>;
}

/// Filesystem-backed fetcher: resolves sources relative to a root
/// directory. Suitable for bundled assets and tests; remote stores
/// provide their own implementation.
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    /// Creates a fetcher rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ImageFetcher for FsFetcher {
    async fn fetch(&self, source: &str) -> Result<DynamicImage> {
        let path = self.root.join(source.trim_start_matches('/'));
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| ComposerError::ImageLoad {
                asset: source.to_string(),
                reason: e.to_string(),
            })?;
        image::load_from_memory(&bytes).map_err(|e| ComposerError::ImageLoad {
            asset: source.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Session-scoped cache of decoded pixels, keyed by source.
#[derive(Default, Clone)]
pub struct PixelCache {
    images: HashMap<String, Arc<DynamicImage>>,
}

impl PixelCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up decoded pixels for a source key.
    pub fn get(&self, source: &str) -> Option<Arc<DynamicImage>> {
        self.images.get(source).cloned()
    }

    /// Inserts decoded pixels under a source key.
    pub fn insert(&mut self, source: impl Into<String>, image: DynamicImage) -> Arc<DynamicImage> {
        let arc = Arc::new(image);
        self.images.insert(source.into(), arc.clone());
        arc
    }

    /// Returns cached pixels, fetching and caching on a miss.
    pub async fn load(
        &mut self,
        fetcher: &dyn ImageFetcher,
        source: &str,
    ) -> Result<Arc<DynamicImage>> {
        if let Some(img) = self.get(source) {
            return Ok(img);
        }
        let img = fetcher.fetch(source).await?;
        Ok(self.insert(source, img))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    struct CountingFetcher(std::sync::atomic::AtomicUsize);

    #[async_trait]
    impl ImageFetcher for CountingFetcher {
        async fn fetch(&self, source: &str) -> Result<DynamicImage> {
            if source == "/broken.png" {
                return Err(ComposerError::ImageLoad {
                    asset: source.to_string(),
                    reason: "decode failure".to_string(),
                });
            }
            self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(DynamicImage::ImageRgba8(RgbaImage::new(4, 4)))
        }
    }

    #[tokio::test]
    async fn cache_fetches_each_source_once() {
        let fetcher = CountingFetcher(std::sync::atomic::AtomicUsize::new(0));
        let mut cache = PixelCache::new();

        cache.load(&fetcher, "/a.png").await.unwrap();
        cache.load(&fetcher, "/a.png").await.unwrap();
        cache.load(&fetcher, "/b.png").await.unwrap();
        assert_eq!(fetcher.0.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn fs_fetcher_reads_relative_to_root() {
        use image::GenericImageView;

        let dir = tempfile::tempdir().unwrap();
        DynamicImage::ImageRgba8(RgbaImage::new(2, 3))
            .save(dir.path().join("dot.png"))
            .unwrap();

        let fetcher = FsFetcher::new(dir.path());
        let img = fetcher.fetch("/dot.png").await.unwrap();
        assert_eq!(img.dimensions(), (2, 3));

        let err = fetcher.fetch("/missing.png").await.unwrap_err();
        assert!(matches!(err, ComposerError::ImageLoad { .. }));
    }

    #[tokio::test]
    async fn fetch_errors_propagate_and_stay_uncached() {
        let fetcher = CountingFetcher(std::sync::atomic::AtomicUsize::new(0));
        let mut cache = PixelCache::new();

        let err = cache.load(&fetcher, "/broken.png").await.unwrap_err();
        assert!(matches!(err, ComposerError::ImageLoad { .. }));
        assert!(cache.get("/broken.png").is_none());
    }
}
