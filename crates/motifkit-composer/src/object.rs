//! Placed objects and the scene-object capability contract.

use motifkit_core::types::{ItemData, ItemKey};
use serde::{Deserialize, Serialize};

/// Identifier of an object on the surface, unique within one session.
pub type ObjectId = u64;

/// Position and scaling of an object on the canvas.
///
/// `left`/`top` locate the object's *center* (center-origin placement,
/// so scaling keeps an object anchored in place).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub left: f64,
    pub top: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    /// Rotation in degrees, clockwise.
    #[serde(default)]
    pub angle: f64,
    /// Mirrored around the vertical axis.
    #[serde(default)]
    pub flip_x: bool,
}

impl Transform {
    /// Creates a transform at the given center with a uniform scale.
    pub fn at(left: f64, top: f64, scale: f64) -> Self {
        Self {
            left,
            top,
            scale_x: scale,
            scale_y: scale,
            angle: 0.0,
            flip_x: false,
        }
    }
}

/// Visual payload of a placed object.
///
/// Only images exist today; the enum keeps the wire format open for
/// other node kinds without breaking serialized states.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    Image {
        /// Asset location, also the pixel-cache key.
        source: String,
        natural_width: u32,
        natural_height: u32,
    },
}

/// Common transform/lifecycle contract shared by all surface objects.
///
/// Replaces property-bag access on heterogeneous visual objects with an
/// explicit capability trait.
pub trait SceneObject {
    /// The object's transform.
    fn transform(&self) -> &Transform;

    /// Mutable access to the object's transform.
    fn transform_mut(&mut self) -> &mut Transform;

    /// Natural (unscaled) pixel size of the visual payload.
    fn natural_size(&self) -> (u32, u32);

    /// The logical item this object represents, if any.
    fn item_data(&self) -> Option<&ItemData>;

    /// Displayed size after scaling.
    fn displayed_size(&self) -> (f64, f64) {
        let (w, h) = self.natural_size();
        let t = self.transform();
        (w as f64 * t.scale_x, h as f64 * t.scale_y)
    }

    /// Moves the object by a delta.
    fn translate(&mut self, dx: f64, dy: f64) {
        let t = self.transform_mut();
        t.left += dx;
        t.top += dy;
    }
}

/// One visual instance of a logical item on the surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedObject {
    pub id: ObjectId,
    pub name: String,
    pub kind: NodeKind,
    pub transform: Transform,
    /// Attached copy of the originating logical item. Always an owned
    /// value: duplicating an object clones it structurally, so edits
    /// on one copy never leak into another.
    #[serde(default)]
    pub item_data: Option<ItemData>,
}

impl PlacedObject {
    /// Creates an image object at the given transform.
    pub fn image(
        id: ObjectId,
        source: impl Into<String>,
        natural_width: u32,
        natural_height: u32,
        transform: Transform,
        item_data: Option<ItemData>,
    ) -> Self {
        let name = item_data
            .as_ref()
            .map(|d| d.name.clone())
            .unwrap_or_else(|| "Image".to_string());
        Self {
            id,
            name,
            kind: NodeKind::Image {
                source: source.into(),
                natural_width,
                natural_height,
            },
            transform,
            item_data,
        }
    }

    /// The pixel-cache key of the object's image asset.
    pub fn source(&self) -> &str {
        match &self.kind {
            NodeKind::Image { source, .. } => source,
        }
    }

    /// Purchase key of the attached item, if the object represents one.
    pub fn item_key(&self) -> Option<ItemKey> {
        self.item_data.as_ref().map(ItemData::key)
    }

    /// Structural clone under a new id, offset from the original.
    ///
    /// The attached item metadata is deep-copied, never shared.
    pub fn duplicate_as(&self, id: ObjectId, offset: f64) -> Self {
        let mut copy = self.clone();
        copy.id = id;
        copy.transform.left += offset;
        copy.transform.top += offset;
        copy
    }
}

impl SceneObject for PlacedObject {
    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    fn natural_size(&self) -> (u32, u32) {
        match self.kind {
            NodeKind::Image {
                natural_width,
                natural_height,
                ..
            } => (natural_width, natural_height),
        }
    }

    fn item_data(&self) -> Option<&ItemData> {
        self.item_data.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PlacedObject {
        PlacedObject::image(
            1,
            "/assets/star.png",
            200,
            100,
            Transform::at(700.0, 500.0, 0.5),
            Some(ItemData::new("Star", "/assets/star.png")),
        )
    }

    #[test]
    fn displayed_size_applies_scale() {
        let obj = sample();
        assert_eq!(obj.displayed_size(), (100.0, 50.0));
    }

    #[test]
    fn duplicate_offsets_and_detaches_metadata() {
        let original = sample();
        let mut copy = original.duplicate_as(2, 20.0);

        assert_eq!(copy.transform.left, original.transform.left + 20.0);
        assert_eq!(copy.transform.top, original.transform.top + 20.0);

        copy.item_data.as_mut().unwrap().name = "Edited".to_string();
        assert_eq!(original.item_data.as_ref().unwrap().name, "Star");
    }
}
