//! Loader trait seams for the out-of-scope remote collaborators.
//!
//! The catalog, background and category loaders live outside the
//! engine (they talk to a remote document store). The engine only
//! depends on these interfaces; concrete implementations are injected
//! by the application shell.

use async_trait::async_trait;

use crate::types::{BackgroundDescriptor, CategoryDescriptor, ItemData};

/// Serves the ordered item catalog.
#[async_trait]
pub trait CatalogLoader: Send + Sync {
    /// Returns all catalog items in display order.
    async fn load_items(&self) -> anyhow::Result<Vec<ItemData>>;
}

/// Serves the managed background images.
#[async_trait]
pub trait BackgroundLoader: Send + Sync {
    /// Returns all background descriptors in display order.
    async fn load_backgrounds(&self) -> anyhow::Result<Vec<BackgroundDescriptor>>;
}

/// Serves the background categories.
#[async_trait]
pub trait CategoryLoader: Send + Sync {
    /// Returns category descriptors sorted by their `order` field.
    async fn load_categories(&self) -> anyhow::Result<Vec<CategoryDescriptor>>;
}
