//! Category descriptor value type.

use serde::{Deserialize, Serialize};

/// A background category, used by the management surface to group
/// backgrounds and order the picker tabs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDescriptor {
    /// Stable category name (document key).
    pub name: String,
    /// Human-readable label.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Sort order in the picker; lower first.
    #[serde(default)]
    pub order: i32,
}
