//! Catalog item value types.

use serde::{Deserialize, Serialize};

/// Aggregation key identifying purchasable-unit identity across
/// placements. Two placed objects share a key iff they represent the
/// same purchasable unit (same item, same size variant).
pub type ItemKey = String;

/// One image asset belonging to a catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSource {
    /// Location of the asset (remote URL or asset path).
    pub url: String,
}

impl ImageSource {
    /// Creates an image source from a URL or asset path.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// A catalog entry representing one purchasable decorative element.
///
/// Owned by the catalog collaborator; the engine only reads it and
/// attaches a copy to each placed object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemData {
    /// Catalog identifier. Falls back to `name` for key derivation.
    #[serde(default)]
    pub id: Option<String>,
    /// Display name.
    pub name: String,
    /// Image assets; items may carry several (e.g. left/right pieces).
    #[serde(default)]
    pub images: Vec<ImageSource>,
    /// Physical size in millimeters of the longer dimension, when the
    /// item should display at real-world scale.
    #[serde(default)]
    pub size_in_mm: Option<f64>,
    /// Selected size/variant, part of the purchase identity.
    #[serde(default)]
    pub selected_size: Option<String>,
    /// Storefront product code, passed through to cart submission.
    #[serde(default)]
    pub product_code: Option<String>,
    /// Free-form display metadata shown in the purchase summary.
    #[serde(default)]
    pub display_info: Option<String>,
    /// Thumbnail asset for list rendering.
    #[serde(default)]
    pub thumbnail: Option<String>,
}

impl ItemData {
    /// Creates a minimal item with a name and one image source.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            images: vec![ImageSource::new(url)],
            size_in_mm: None,
            selected_size: None,
            product_code: None,
            display_info: None,
            thumbnail: None,
        }
    }

    /// Derives the purchase aggregation key: `"{id-or-name}_{size}"`.
    ///
    /// Deterministic and pure; the size component is empty when no
    /// variant is selected.
    pub fn key(&self) -> ItemKey {
        let id = self.id.as_deref().unwrap_or(&self.name);
        let size = self.selected_size.as_deref().unwrap_or("");
        format!("{}_{}", id, size)
    }
}
