//! Background descriptor value types.

use serde::{Deserialize, Serialize};

/// A managed background image, as served by the background loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundDescriptor {
    /// Document identifier in the backing store.
    #[serde(default)]
    pub id: Option<String>,
    /// Display name.
    pub name: String,
    /// Image asset location.
    #[serde(default)]
    pub src: Option<String>,
    /// Category the background is filed under.
    #[serde(default)]
    pub category: Option<String>,
}

impl BackgroundDescriptor {
    /// Creates a descriptor with a name and source.
    pub fn new(name: impl Into<String>, src: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            src: Some(src.into()),
            category: None,
        }
    }
}

/// A locally-provided background: raw image bytes uploaded by the user
/// rather than fetched from a remote source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomBackground {
    /// Display name (typically the uploaded file name).
    pub name: String,
    /// Encoded image bytes (PNG/JPEG/...).
    pub bytes: Vec<u8>,
}

impl CustomBackground {
    /// Creates a custom background from uploaded bytes.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}
