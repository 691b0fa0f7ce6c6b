//! # MotifKit Core
//!
//! Core types, constants and error taxonomy for MotifKit.
//! Provides the fundamental value types shared between the composition
//! engine and its collaborators: catalog items, background and category
//! descriptors, loader trait seams, and the composer error taxonomy.

pub mod constants;
pub mod error;
pub mod loaders;
pub mod types;

pub use error::{ComposerError, Result};
pub use loaders::{BackgroundLoader, CatalogLoader, CategoryLoader};
pub use types::{
    BackgroundDescriptor, CategoryDescriptor, CustomBackground, ImageSource, ItemData, ItemKey,
};
