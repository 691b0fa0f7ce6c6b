//! The drawable surface: retained object store with draw order,
//! selection state, background slot and a lifecycle event queue.
//!
//! Every mutation records a [`SurfaceEvent`]; the composer drains the
//! queue synchronously after each operation and drives purchase-list
//! reconciliation and history checkpoints from it. Restoring a
//! serialized state rebuilds the store silently (no events), which is
//! what keeps snapshot restores from re-entering the history stack.

use motifkit_core::types::{BackgroundDescriptor, ItemKey};
use serde::{Deserialize, Serialize};

use crate::object::{ObjectId, PlacedObject};

/// Lifecycle event emitted by surface mutations.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    ObjectAdded { id: ObjectId },
    ObjectRemoved { id: ObjectId },
    ObjectModified { id: ObjectId },
    SelectionChanged { active: Vec<ObjectId> },
    BackgroundChanged,
    Cleared,
    /// Emitted by the composer after a snapshot or session restore;
    /// the surface itself never records it.
    StateRestored,
}

/// Current background of the composition.
///
/// Carries everything needed to re-render and re-serialize the
/// background; not separately versioned from the rest of the surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundState {
    /// Display name (descriptor name or uploaded file name).
    pub name: String,
    /// The originating descriptor; `None` for local uploads.
    #[serde(default)]
    pub descriptor: Option<BackgroundDescriptor>,
    /// Pixel-cache key of the background asset.
    pub source_key: String,
    pub natural_width: u32,
    pub natural_height: u32,
    pub scale_x: f64,
    pub scale_y: f64,
}

/// Serialized surface contents: objects in draw order plus background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceState {
    pub objects: Vec<PlacedObject>,
    #[serde(default)]
    pub background: Option<BackgroundState>,
    pub next_id: ObjectId,
}

/// Retained-mode object store backing the composition canvas.
#[derive(Debug, Clone, Default)]
pub struct Surface {
    objects: Vec<PlacedObject>,
    next_id: ObjectId,
    active: Vec<ObjectId>,
    background: Option<BackgroundState>,
    pending_events: Vec<SurfaceEvent>,
}

impl Surface {
    /// Creates an empty surface.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            next_id: 1,
            active: Vec::new(),
            background: None,
            pending_events: Vec::new(),
        }
    }

    /// Generates a new unique object id.
    pub fn generate_id(&mut self) -> ObjectId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Number of objects on the surface.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the surface holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Objects in draw order (back to front).
    pub fn iter(&self) -> impl Iterator<Item = &PlacedObject> {
        self.objects.iter()
    }

    /// Gets an object by id.
    pub fn get(&self, id: ObjectId) -> Option<&PlacedObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Gets an object mutably by id. Call [`Surface::mark_modified`]
    /// afterwards so the mutation reaches the event queue.
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut PlacedObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id == id)
    }

    /// Adds an object on top of the draw order.
    pub fn add(&mut self, obj: PlacedObject) -> ObjectId {
        let id = obj.id;
        self.objects.push(obj);
        self.pending_events.push(SurfaceEvent::ObjectAdded { id });
        id
    }

    /// Removes an object, dropping it from the active selection.
    pub fn remove(&mut self, id: ObjectId) -> Option<PlacedObject> {
        let idx = self.index_of(id)?;
        let obj = self.objects.remove(idx);
        if self.active.contains(&id) {
            self.active.retain(|a| *a != id);
            self.pending_events.push(SurfaceEvent::SelectionChanged {
                active: self.active.clone(),
            });
        }
        self.pending_events.push(SurfaceEvent::ObjectRemoved { id });
        Some(obj)
    }

    /// Records a modification event for an object mutated in place.
    pub fn mark_modified(&mut self, id: ObjectId) {
        self.pending_events
            .push(SurfaceEvent::ObjectModified { id });
    }

    /// Ids of every object whose attached item matches the key.
    pub fn ids_for_key(&self, key: &ItemKey) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|o| o.item_key().as_ref() == Some(key))
            .map(|o| o.id)
            .collect()
    }

    /// First object (in draw order) whose attached item matches.
    pub fn first_id_for_key(&self, key: &ItemKey) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|o| o.item_key().as_ref() == Some(key))
            .map(|o| o.id)
    }

    /// Whether any object with the given key is on the surface.
    pub fn contains_key(&self, key: &ItemKey) -> bool {
        self.objects
            .iter()
            .any(|o| o.item_key().as_ref() == Some(key))
    }

    // --- selection -----------------------------------------------------

    /// Replaces the active selection.
    pub fn set_active(&mut self, ids: Vec<ObjectId>) {
        let ids: Vec<ObjectId> = ids
            .into_iter()
            .filter(|id| self.index_of(*id).is_some())
            .collect();
        if ids != self.active {
            self.active = ids;
            self.pending_events.push(SurfaceEvent::SelectionChanged {
                active: self.active.clone(),
            });
        }
    }

    /// Makes a single object the active selection.
    pub fn set_active_object(&mut self, id: ObjectId) {
        self.set_active(vec![id]);
    }

    /// Clears the active selection.
    pub fn discard_active(&mut self) {
        self.set_active(Vec::new());
    }

    /// Currently active object ids.
    pub fn active_ids(&self) -> &[ObjectId] {
        &self.active
    }

    /// The primary active object (last selected), if any.
    pub fn primary_active(&self) -> Option<ObjectId> {
        self.active.last().copied()
    }

    // --- draw order ----------------------------------------------------

    /// Moves an object to the top of the draw order.
    pub fn bring_to_front(&mut self, id: ObjectId) -> bool {
        match self.index_of(id) {
            Some(idx) if idx + 1 < self.objects.len() => {
                let obj = self.objects.remove(idx);
                self.objects.push(obj);
                true
            }
            _ => false,
        }
    }

    /// Moves an object to the bottom of the draw order.
    pub fn send_to_back(&mut self, id: ObjectId) -> bool {
        match self.index_of(id) {
            Some(idx) if idx > 0 => {
                let obj = self.objects.remove(idx);
                self.objects.insert(0, obj);
                true
            }
            _ => false,
        }
    }

    /// Moves an object one step towards the top.
    pub fn bring_forward(&mut self, id: ObjectId) -> bool {
        match self.index_of(id) {
            Some(idx) if idx + 1 < self.objects.len() => {
                self.objects.swap(idx, idx + 1);
                true
            }
            _ => false,
        }
    }

    /// Moves an object one step towards the bottom.
    pub fn send_backwards(&mut self, id: ObjectId) -> bool {
        match self.index_of(id) {
            Some(idx) if idx > 0 => {
                self.objects.swap(idx, idx - 1);
                true
            }
            _ => false,
        }
    }

    // --- background ----------------------------------------------------

    /// Current background, if any.
    pub fn background(&self) -> Option<&BackgroundState> {
        self.background.as_ref()
    }

    /// Replaces the background.
    pub fn set_background(&mut self, state: Option<BackgroundState>) {
        self.background = state;
        self.pending_events.push(SurfaceEvent::BackgroundChanged);
    }

    // --- lifecycle -----------------------------------------------------

    /// Removes all objects, the background and the selection.
    ///
    /// Records a single `Cleared` event rather than one removal per
    /// object, so a full clear is one reconciliation and one
    /// checkpoint downstream.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.active.clear();
        self.background = None;
        self.pending_events.push(SurfaceEvent::Cleared);
    }

    /// Drains the pending event queue.
    pub fn take_events(&mut self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // --- serialization -------------------------------------------------

    /// Captures the serializable surface state (objects in draw order,
    /// background, id counter). Selection is viewer state and is not
    /// captured.
    pub fn to_state(&self) -> SurfaceState {
        SurfaceState {
            objects: self.objects.clone(),
            background: self.background.clone(),
            next_id: self.next_id,
        }
    }

    /// Restores a serialized state, silently: no lifecycle events are
    /// recorded and the selection is dropped.
    pub fn set_state(&mut self, state: SurfaceState) {
        self.next_id = state
            .next_id
            .max(state.objects.iter().map(|o| o.id + 1).max().unwrap_or(1));
        self.objects = state.objects;
        self.background = state.background;
        self.active.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Transform;
    use motifkit_core::types::ItemData;

    fn obj(surface: &mut Surface, name: &str) -> ObjectId {
        let id = surface.generate_id();
        surface.add(PlacedObject::image(
            id,
            format!("/{name}.png"),
            10,
            10,
            Transform::at(0.0, 0.0, 1.0),
            Some(ItemData::new(name, format!("/{name}.png"))),
        ))
    }

    #[test]
    fn add_remove_emit_events() {
        let mut s = Surface::new();
        let id = obj(&mut s, "a");
        s.remove(id);
        let events = s.take_events();
        assert_eq!(
            events,
            vec![
                SurfaceEvent::ObjectAdded { id },
                SurfaceEvent::ObjectRemoved { id },
            ]
        );
        assert!(s.is_empty());
    }

    #[test]
    fn removing_active_object_clears_it_from_selection() {
        let mut s = Surface::new();
        let a = obj(&mut s, "a");
        let b = obj(&mut s, "b");
        s.set_active(vec![a, b]);
        s.remove(b);
        assert_eq!(s.active_ids(), &[a]);
    }

    #[test]
    fn draw_order_operations() {
        let mut s = Surface::new();
        let a = obj(&mut s, "a");
        let b = obj(&mut s, "b");
        let c = obj(&mut s, "c");

        assert!(s.bring_to_front(a));
        let order: Vec<ObjectId> = s.iter().map(|o| o.id).collect();
        assert_eq!(order, vec![b, c, a]);

        assert!(s.send_to_back(a));
        let order: Vec<ObjectId> = s.iter().map(|o| o.id).collect();
        assert_eq!(order, vec![a, b, c]);

        assert!(s.bring_forward(a));
        assert!(s.send_backwards(c));
        let order: Vec<ObjectId> = s.iter().map(|o| o.id).collect();
        assert_eq!(order, vec![b, c, a]);

        // Already at the boundary: no-ops
        assert!(!s.bring_to_front(a));
        assert!(!s.send_to_back(b));
    }

    #[test]
    fn state_round_trip_preserves_draw_order_and_ids() {
        let mut s = Surface::new();
        let a = obj(&mut s, "a");
        let b = obj(&mut s, "b");
        s.bring_to_front(a);
        s.set_active_object(b);

        let state = s.to_state();
        let json = serde_json::to_string(&state).unwrap();
        let parsed: SurfaceState = serde_json::from_str(&json).unwrap();

        let mut restored = Surface::new();
        restored.set_state(parsed);
        let order: Vec<ObjectId> = restored.iter().map(|o| o.id).collect();
        assert_eq!(order, vec![b, a]);
        assert!(restored.active_ids().is_empty());
        // Fresh ids never collide with restored ones
        let next = restored.generate_id();
        assert!(next > a && next > b);
    }
}
