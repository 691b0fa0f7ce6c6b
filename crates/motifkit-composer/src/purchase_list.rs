//! The purchase list: quantities per purchasable unit, derived from
//! canvas contents.
//!
//! One entry per item key, regardless of how many visual copies exist
//! on the surface. Quantity is user-adjustable and independent of the
//! object count. Entries whose key no longer matches any placed object
//! are removed by [`PurchaseList::reconcile`].

use motifkit_core::types::{ItemData, ItemKey};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::surface::Surface;

/// One purchase-list entry: item snapshot plus requested quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseEntry {
    pub item: ItemData,
    pub quantity: u32,
}

/// Insertion-ordered mapping from item key to purchase entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PurchaseList {
    entries: Vec<(ItemKey, PurchaseEntry)>,
}

impl PurchaseList {
    /// Creates an empty purchase list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether an entry exists for the key.
    pub fn contains_key(&self, key: &ItemKey) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Gets an entry by key.
    pub fn get(&self, key: &ItemKey) -> Option<&PurchaseEntry> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, e)| e)
    }

    fn get_mut(&mut self, key: &ItemKey) -> Option<&mut PurchaseEntry> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, e)| e)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&ItemKey, &PurchaseEntry)> {
        self.entries.iter().map(|(k, e)| (k, e))
    }

    /// Inserts a quantity-1 entry for the item's key if absent.
    ///
    /// Repeated placement of an already-listed item must not reset its
    /// quantity, so an existing entry is left untouched.
    ///
    /// Returns `true` when a new entry was created.
    pub fn insert_first(&mut self, item: &ItemData) -> bool {
        let key = item.key();
        if self.contains_key(&key) {
            return false;
        }
        self.entries.push((
            key,
            PurchaseEntry {
                item: item.clone(),
                quantity: 1,
            },
        ));
        true
    }

    /// Sets the quantity for a key, clamping anything below 1 up to 1.
    pub fn set_quantity(&mut self, key: &ItemKey, quantity: u32) {
        if let Some(entry) = self.get_mut(key) {
            entry.quantity = quantity.max(1);
        }
    }

    /// Increments the quantity for a key.
    pub fn increment(&mut self, key: &ItemKey) {
        if let Some(entry) = self.get_mut(key) {
            entry.quantity = entry.quantity.saturating_add(1);
        }
    }

    /// Decrements the quantity for a key, never below 1.
    pub fn decrement(&mut self, key: &ItemKey) {
        if let Some(entry) = self.get_mut(key) {
            entry.quantity = entry.quantity.saturating_sub(1).max(1);
        }
    }

    /// Removes the entry for a key.
    pub fn remove(&mut self, key: &ItemKey) -> Option<PurchaseEntry> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    /// Removes every entry whose key has no matching object on the
    /// surface. Idempotent: a second call with the same surface state
    /// removes nothing.
    pub fn reconcile(&mut self, surface: &Surface) {
        let before = self.entries.len();
        self.entries.retain(|(key, _)| surface.contains_key(key));
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!(removed, "purchase list reconciled against surface");
        }
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Snapshot as ordered key/entry pairs (the serialized layout).
    pub fn to_pairs(&self) -> Vec<(ItemKey, PurchaseEntry)> {
        self.entries.clone()
    }

    /// Rebuilds the list from ordered key/entry pairs.
    pub fn from_pairs(pairs: Vec<(ItemKey, PurchaseEntry)>) -> Self {
        Self { entries: pairs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{PlacedObject, Transform};

    fn item(name: &str) -> ItemData {
        ItemData::new(name, format!("/{name}.png"))
    }

    fn place(surface: &mut Surface, data: &ItemData) {
        let id = surface.generate_id();
        surface.add(PlacedObject::image(
            id,
            data.images[0].url.clone(),
            10,
            10,
            Transform::at(0.0, 0.0, 1.0),
            Some(data.clone()),
        ));
    }

    #[test]
    fn insert_first_does_not_reset_quantity() {
        let mut list = PurchaseList::new();
        let a = item("a");
        assert!(list.insert_first(&a));
        list.set_quantity(&a.key(), 5);
        assert!(!list.insert_first(&a));
        assert_eq!(list.get(&a.key()).unwrap().quantity, 5);
    }

    #[test]
    fn quantity_clamps_below_one() {
        let mut list = PurchaseList::new();
        let a = item("a");
        list.insert_first(&a);
        list.set_quantity(&a.key(), 0);
        assert_eq!(list.get(&a.key()).unwrap().quantity, 1);
        list.decrement(&a.key());
        assert_eq!(list.get(&a.key()).unwrap().quantity, 1);
        list.increment(&a.key());
        assert_eq!(list.get(&a.key()).unwrap().quantity, 2);
    }

    #[test]
    fn reconcile_is_idempotent() {
        let mut surface = Surface::new();
        let a = item("a");
        let b = item("b");
        place(&mut surface, &a);

        let mut list = PurchaseList::new();
        list.insert_first(&a);
        list.insert_first(&b);

        list.reconcile(&surface);
        assert_eq!(list.len(), 1);
        assert!(list.contains_key(&a.key()));

        let snapshot = list.clone();
        list.reconcile(&surface);
        assert_eq!(list, snapshot);
    }

    #[test]
    fn preserves_insertion_order() {
        let mut list = PurchaseList::new();
        for name in ["c", "a", "b"] {
            list.insert_first(&item(name));
        }
        let keys: Vec<&ItemKey> = list.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["c_", "a_", "b_"]);
    }
}
