//! The composition root.
//!
//! `Composer` owns the surface, the purchase list, the history stack,
//! the pixel cache and the injected image fetcher, and wires them
//! together: every surface mutation flows through `process_events`,
//! which reconciles the purchase list on removals and captures history
//! checkpoints unless a restore is replaying or a batch operation has
//! suspended side effects.
//!
//! All collaborators are passed in at construction; there is no global
//! state.

use std::sync::Arc;

use image::GenericImageView;
use motifkit_core::types::{BackgroundDescriptor, CustomBackground, ItemData, ItemKey};
use motifkit_core::{ComposerError, Result};
use tracing::{debug, warn};

use crate::background;
use crate::export;
use crate::fetcher::{ImageFetcher, PixelCache};
use crate::history::{History, Snapshot};
use crate::layers;
use crate::object::{ObjectId, PlacedObject, SceneObject};
use crate::placement;
use crate::purchase_list::{PurchaseEntry, PurchaseList};
use crate::surface::{Surface, SurfaceEvent};
use crate::zoom::ZoomControl;

type Subscriber = Box<dyn Fn(&SurfaceEvent)>;

/// The canvas composition engine.
pub struct Composer {
    surface: Surface,
    purchase_list: PurchaseList,
    history: History,
    zoom: ZoomControl,
    cache: PixelCache,
    fetcher: Arc<dyn ImageFetcher>,
    subscribers: Vec<Subscriber>,
    /// Suspends reconciliation/checkpoints during batched mutations so
    /// a multi-object delete is one undo step.
    batching: bool,
}

impl Composer {
    /// Creates a composer around the injected image fetcher. The empty
    /// composition is recorded as snapshot 0, so undo/redo bounds are
    /// well-defined from the start.
    pub fn new(fetcher: Arc<dyn ImageFetcher>) -> Self {
        let surface = Surface::new();
        let initial = Snapshot {
            surface: surface.to_state(),
            purchase_list: Vec::new(),
        };
        Self {
            surface,
            purchase_list: PurchaseList::new(),
            history: History::new(initial),
            zoom: ZoomControl::new(),
            cache: PixelCache::new(),
            fetcher,
            subscribers: Vec::new(),
            batching: false,
        }
    }

    /// Registers a listener for surface lifecycle events (UI re-render
    /// collaborators).
    pub fn subscribe(&mut self, listener: impl Fn(&SurfaceEvent) + 'static) {
        self.subscribers.push(Box::new(listener));
    }

    // --- accessors -----------------------------------------------------

    /// The drawable surface (read-only; mutations go through composer
    /// operations so events and history stay consistent).
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// The purchase list, in insertion order.
    pub fn purchase_list(&self) -> &PurchaseList {
        &self.purchase_list
    }

    /// The history stack (cursor, bounds).
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Whether the composition holds anything a user could lose:
    /// placed items or a background. Drives the caller's confirmation
    /// prompt before destructive operations.
    pub fn has_content(&self) -> bool {
        self.surface.iter().any(|o| o.item_data.is_some()) || self.surface.background().is_some()
    }

    // --- item placement ------------------------------------------------

    /// Places a logical item on the canvas: one object per image
    /// source, loaded sequentially, centered with a fixed offset per
    /// image. Partial failures are logged and skipped; the operation
    /// fails only when no image loads at all. The last added object
    /// becomes the active selection, and the first success inserts a
    /// quantity-1 purchase entry unless the key is already listed.
    pub async fn add_item(&mut self, item: &ItemData) -> Result<Vec<ObjectId>> {
        let sources = placement::image_sources(item)?;
        let attempted = sources.len();
        let mut added = Vec::new();

        for (index, source) in sources.iter().enumerate() {
            match self.cache.load(self.fetcher.as_ref(), source).await {
                Ok(pixels) => {
                    if added.is_empty() {
                        self.purchase_list.insert_first(item);
                    }
                    let (width, height) = pixels.dimensions();
                    let transform = placement::transform_for(item, index, width, height);
                    let id = self.surface.generate_id();
                    self.surface.add(PlacedObject::image(
                        id,
                        source.clone(),
                        width,
                        height,
                        transform,
                        Some(item.clone()),
                    ));
                    self.process_events();
                    added.push(id);
                }
                Err(error) => {
                    warn!(%source, index, %error, "item image failed to load, skipping");
                }
            }
        }

        if added.is_empty() {
            return Err(ComposerError::AllImagesFailed {
                item: item.name.clone(),
                attempted,
            });
        }

        self.surface.set_active_object(added[added.len() - 1]);
        self.process_events();
        debug!(item = %item.name, placed = added.len(), attempted, "item placed");
        Ok(added)
    }

    // --- background ----------------------------------------------------

    /// Sets the background from a managed descriptor, replacing any
    /// prior background. Captured by the next snapshot; not separately
    /// undoable.
    pub async fn set_background(&mut self, descriptor: &BackgroundDescriptor) -> Result<()> {
        let source = background::resolve_source(descriptor)?;
        let pixels = self.cache.load(self.fetcher.as_ref(), &source).await?;
        let (width, height) = pixels.dimensions();
        let state = background::remote_state(descriptor, source, width, height);
        self.surface.set_background(Some(state));
        self.process_events();
        Ok(())
    }

    /// Sets the background from locally-uploaded image bytes.
    pub async fn set_custom_background(&mut self, custom: &CustomBackground) -> Result<()> {
        if custom.bytes.is_empty() {
            return Err(ComposerError::MissingBackgroundSource {
                background: custom.name.clone(),
            });
        }
        let decoded =
            image::load_from_memory(&custom.bytes).map_err(|e| ComposerError::ImageLoad {
                asset: custom.name.clone(),
                reason: e.to_string(),
            })?;
        let key = background::custom_source_key(custom);
        let (width, height) = decoded.dimensions();
        self.cache.insert(key.clone(), decoded);
        let state = background::custom_state(custom, key, width, height);
        self.surface.set_background(Some(state));
        self.process_events();
        Ok(())
    }

    // --- selection & layers --------------------------------------------

    /// Makes an object the active selection.
    pub fn select(&mut self, id: ObjectId) {
        self.surface.set_active_object(id);
        self.process_events();
    }

    /// Replaces the active selection with the given objects (marquee
    /// or shift-click multi-select). Ids not on the surface are
    /// dropped.
    pub fn set_selection(&mut self, ids: Vec<ObjectId>) {
        self.surface.set_active(ids);
        self.process_events();
    }

    /// Selects the first object representing the given item key
    /// (clicking a purchase-list row). Returns whether one was found.
    pub fn select_first_for_key(&mut self, key: &ItemKey) -> bool {
        match self.surface.first_id_for_key(key) {
            Some(id) => {
                self.select(id);
                true
            }
            None => false,
        }
    }

    /// Clears the active selection.
    pub fn discard_selection(&mut self) {
        self.surface.discard_active();
        self.process_events();
    }

    /// Moves the active object to the top of the draw order.
    pub fn bring_to_front(&mut self) -> bool {
        let changed = layers::bring_to_front(&mut self.surface);
        self.process_events();
        changed
    }

    /// Moves the active object to the bottom of the draw order.
    pub fn send_to_back(&mut self) -> bool {
        let changed = layers::send_to_back(&mut self.surface);
        self.process_events();
        changed
    }

    /// Moves the active object one step towards the top.
    pub fn bring_forward(&mut self) -> bool {
        let changed = layers::bring_forward(&mut self.surface);
        self.process_events();
        changed
    }

    /// Moves the active object one step towards the bottom.
    pub fn send_backwards(&mut self) -> bool {
        let changed = layers::send_backwards(&mut self.surface);
        self.process_events();
        changed
    }

    /// Mirrors the active object horizontally.
    pub fn flip_horizontal(&mut self) -> bool {
        let changed = layers::flip_horizontal(&mut self.surface);
        self.process_events();
        changed
    }

    /// Moves every selected object by a delta (the end of a drag).
    /// One checkpoint regardless of selection size; no-op without a
    /// selection.
    pub fn translate_selected(&mut self, dx: f64, dy: f64) -> bool {
        self.modify_selected(|obj| obj.translate(dx, dy))
    }

    /// Scales every selected object uniformly about its center (the
    /// end of a resize drag). Non-positive factors are rejected.
    pub fn scale_selected(&mut self, factor: f64) -> bool {
        if factor <= 0.0 {
            return false;
        }
        self.modify_selected(|obj| {
            let t = obj.transform_mut();
            t.scale_x *= factor;
            t.scale_y *= factor;
        })
    }

    /// Rotates every selected object by a delta in degrees.
    pub fn rotate_selected(&mut self, degrees: f64) -> bool {
        self.modify_selected(|obj| {
            let t = obj.transform_mut();
            t.angle = (t.angle + degrees).rem_euclid(360.0);
        })
    }

    fn modify_selected(&mut self, mutate: impl Fn(&mut PlacedObject)) -> bool {
        let ids: Vec<ObjectId> = self.surface.active_ids().to_vec();
        if ids.is_empty() {
            return false;
        }
        self.batching = true;
        for id in &ids {
            if let Some(obj) = self.surface.get_mut(*id) {
                mutate(obj);
                self.surface.mark_modified(*id);
            }
        }
        self.process_events();
        self.batching = false;
        self.checkpoint();
        true
    }

    /// Duplicates the active object; the clone carries an independent
    /// copy of the item metadata and becomes the new selection.
    pub fn duplicate(&mut self) -> Option<ObjectId> {
        let id = layers::duplicate(&mut self.surface);
        self.process_events();
        id
    }

    /// Deletes the active selection. A single object goes through the
    /// ordinary removal chain; a multi-object selection is batched
    /// into one reconciliation and one checkpoint so it undoes as one
    /// step.
    pub fn delete_selected(&mut self) {
        let ids: Vec<ObjectId> = self.surface.active_ids().to_vec();
        match ids.as_slice() {
            [] => {}
            [only] => {
                self.surface.remove(*only);
                self.process_events();
            }
            many => {
                self.batching = true;
                for id in many {
                    self.surface.remove(*id);
                }
                self.process_events();
                self.batching = false;
                self.purchase_list.reconcile(&self.surface);
                self.checkpoint();
            }
        }
    }

    // --- purchase list -------------------------------------------------

    /// Sets the requested quantity for a key (clamped to at least 1).
    /// Quantity edits are not history checkpoints.
    pub fn set_quantity(&mut self, key: &ItemKey, quantity: u32) {
        self.purchase_list.set_quantity(key, quantity);
    }

    /// Increments the requested quantity for a key.
    pub fn increment_quantity(&mut self, key: &ItemKey) {
        self.purchase_list.increment(key);
    }

    /// Decrements the requested quantity for a key, never below 1.
    pub fn decrement_quantity(&mut self, key: &ItemKey) {
        self.purchase_list.decrement(key);
    }

    /// Removes every placed object matching the key, then the purchase
    /// entry itself, as one logical operation and one checkpoint.
    /// Object removal always precedes entry removal.
    pub fn remove_all_for_key(&mut self, key: &ItemKey) {
        let ids = self.surface.ids_for_key(key);
        if ids.is_empty() && !self.purchase_list.contains_key(key) {
            return;
        }
        self.batching = true;
        for id in ids {
            self.surface.remove(id);
        }
        self.process_events();
        self.batching = false;
        self.purchase_list.remove(key);
        self.purchase_list.reconcile(&self.surface);
        self.checkpoint();
    }

    // --- history -------------------------------------------------------

    /// Steps back one snapshot. Silent no-op at the lower bound.
    pub fn undo(&mut self) {
        let Some(snapshot) = self.history.step_back().cloned() else {
            return;
        };
        self.restore(snapshot);
    }

    /// Steps forward one snapshot. Silent no-op at the upper bound.
    pub fn redo(&mut self) {
        let Some(snapshot) = self.history.step_forward().cloned() else {
            return;
        };
        self.restore(snapshot);
    }

    /// Whether undo would change state (drives button enablement).
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether redo would change state.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Resets surface, background and purchase list together, and
    /// records one new checkpoint. No-op when the composition is
    /// already empty. Destructive: callers are expected to confirm via
    /// [`Composer::has_content`] first.
    pub fn clear(&mut self) {
        if self.surface.is_empty()
            && self.surface.background().is_none()
            && self.purchase_list.is_empty()
        {
            return;
        }
        self.surface.clear();
        self.purchase_list.clear();
        self.process_events();
    }

    // --- zoom ----------------------------------------------------------

    /// Current view zoom level.
    pub fn zoom_level(&self) -> f64 {
        self.zoom.level()
    }

    /// Steps the view zoom in.
    pub fn zoom_in(&mut self) {
        self.zoom.zoom_in();
    }

    /// Steps the view zoom out.
    pub fn zoom_out(&mut self) {
        self.zoom.zoom_out();
    }

    /// Whether zooming in would change the level.
    pub fn can_zoom_in(&self) -> bool {
        self.zoom.can_zoom_in()
    }

    /// Whether zooming out would change the level.
    pub fn can_zoom_out(&self) -> bool {
        self.zoom.can_zoom_out()
    }

    // --- export & session ----------------------------------------------

    /// Renders the composition to PNG bytes at the 2x export
    /// multiplier.
    pub fn export_image(&self) -> Result<Vec<u8>> {
        export::export_png(&self.surface, &self.cache)
    }

    /// Serializes the current composition (surface + purchase list)
    /// as the session state layout.
    pub fn save_session(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.snapshot())?)
    }

    /// Restores a serialized session state and records it as a new
    /// checkpoint. States written before purchase-list tracking
    /// restore with an empty list.
    pub fn load_session(&mut self, json: &str) -> Result<()> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        self.restore(snapshot.clone());
        self.history.save_checkpoint(snapshot);
        Ok(())
    }

    // --- internals -----------------------------------------------------

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            surface: self.surface.to_state(),
            purchase_list: self.purchase_list.to_pairs(),
        }
    }

    fn checkpoint(&mut self) {
        let snapshot = self.snapshot();
        self.history.save_checkpoint(snapshot);
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.history.begin_replay();
        self.surface.set_state(snapshot.surface);
        self.purchase_list = PurchaseList::from_pairs(snapshot.purchase_list);
        self.history.end_replay();
        self.notify(&SurfaceEvent::StateRestored);
    }

    fn notify(&self, event: &SurfaceEvent) {
        for listener in &self.subscribers {
            listener(event);
        }
    }

    /// Drains the surface event queue: forwards every event to the
    /// subscribers, then applies side effects (reconciliation on
    /// removal, a checkpoint per mutation) unless a restore is
    /// replaying or a batch has suspended them.
    fn process_events(&mut self) {
        let events = self.surface.take_events();
        for event in events {
            self.notify(&event);
            if self.batching || self.history.is_replaying() {
                continue;
            }
            match event {
                SurfaceEvent::ObjectRemoved { .. } => {
                    self.purchase_list.reconcile(&self.surface);
                    self.checkpoint();
                }
                SurfaceEvent::ObjectAdded { .. }
                | SurfaceEvent::ObjectModified { .. }
                | SurfaceEvent::Cleared => {
                    self.checkpoint();
                }
                SurfaceEvent::SelectionChanged { .. }
                | SurfaceEvent::BackgroundChanged
                | SurfaceEvent::StateRestored => {}
            }
        }
    }

    /// Entries for rendering an external purchase summary panel:
    /// `(key, item, quantity)` in insertion order.
    pub fn purchase_summary(&self) -> Vec<(ItemKey, &PurchaseEntry)> {
        self.purchase_list
            .iter()
            .map(|(k, e)| (k.clone(), e))
            .collect()
    }
}
