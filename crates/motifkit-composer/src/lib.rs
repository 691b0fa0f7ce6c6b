//! # MotifKit Composer
//!
//! The canvas composition engine: users place decorative item images
//! on a background canvas, arrange, resize and duplicate them, and the
//! engine keeps a purchase list (quantities per purchasable unit) in
//! sync with canvas contents under a bounded undo/redo history.
//!
//! ## Core Components
//!
//! - **Surface**: retained object store with draw order, selection and
//!   background state; emits lifecycle events on every mutation
//! - **Placement**: loads item images through an injected fetcher and
//!   places them centered with per-image offsets and physical-size or
//!   capped scaling
//! - **Purchase List**: insertion-ordered aggregate of quantities per
//!   item key, reconciled against surface contents on removal
//! - **History**: bounded linear snapshot stack with branch-discard
//!   semantics and an explicit replay guard
//! - **Layers**: stacking-order, flip, duplicate and delete operations
//!   on the active selection
//! - **Export**: 2x supersampled PNG rendering of the composition
//!
//! ## Architecture
//!
//! ```text
//! Composer (composition root, dependency-injected)
//!   ├── Surface (objects, draw order, selection, background)
//!   ├── PurchaseList (key -> {item, quantity})
//!   ├── History (snapshot stack + cursor + replay guard)
//!   ├── PixelCache + ImageFetcher (decoded image assets)
//!   └── ZoomControl (view-only, excluded from history)
//! ```
//!
//! Every surface mutation flows back through the composer, which
//! drains the surface event queue: removals reconcile the purchase
//! list, and mutations capture a history checkpoint unless a snapshot
//! restore is in progress.

pub mod background;
pub mod composer;
pub mod export;
pub mod fetcher;
pub mod history;
pub mod layers;
pub mod object;
pub mod placement;
pub mod purchase_list;
pub mod surface;
pub mod zoom;

pub use composer::Composer;
pub use fetcher::{FsFetcher, ImageFetcher, PixelCache};
pub use history::{History, HistoryState, Snapshot};
pub use object::{NodeKind, ObjectId, PlacedObject, SceneObject, Transform};
pub use purchase_list::{PurchaseEntry, PurchaseList};
pub use surface::{BackgroundState, Surface, SurfaceEvent, SurfaceState};
pub use zoom::ZoomControl;
