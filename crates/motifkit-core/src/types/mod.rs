//! Shared value types for the composition engine and its collaborators.

mod background;
mod category;
mod item;

pub use background::{BackgroundDescriptor, CustomBackground};
pub use category::CategoryDescriptor;
pub use item::{ImageSource, ItemData, ItemKey};
