//! Stacking-order, flip and duplicate operations on the active
//! selection.
//!
//! Every operation targets the primary active object and is a silent
//! no-op when nothing is selected; acting on an empty selection is an
//! ordinary UI state, not an error.

use motifkit_core::constants::DUPLICATE_OFFSET;

use crate::object::ObjectId;
use crate::surface::Surface;

/// Moves the active object to the top of the draw order.
pub fn bring_to_front(surface: &mut Surface) -> bool {
    match surface.primary_active() {
        Some(id) => surface.bring_to_front(id),
        None => false,
    }
}

/// Moves the active object to the bottom of the draw order.
pub fn send_to_back(surface: &mut Surface) -> bool {
    match surface.primary_active() {
        Some(id) => surface.send_to_back(id),
        None => false,
    }
}

/// Moves the active object one step towards the top.
pub fn bring_forward(surface: &mut Surface) -> bool {
    match surface.primary_active() {
        Some(id) => surface.bring_forward(id),
        None => false,
    }
}

/// Moves the active object one step towards the bottom.
pub fn send_backwards(surface: &mut Surface) -> bool {
    match surface.primary_active() {
        Some(id) => surface.send_backwards(id),
        None => false,
    }
}

/// Mirrors the active object around its vertical axis.
pub fn flip_horizontal(surface: &mut Surface) -> bool {
    let Some(id) = surface.primary_active() else {
        return false;
    };
    if let Some(obj) = surface.get_mut(id) {
        obj.transform.flip_x = !obj.transform.flip_x;
        surface.mark_modified(id);
        true
    } else {
        false
    }
}

/// Clones the active object, offset by a fixed delta, and makes the
/// clone the new active selection.
///
/// The clone's attached item metadata is a structural copy; later
/// edits on either object never affect the other.
pub fn duplicate(surface: &mut Surface) -> Option<ObjectId> {
    let id = surface.primary_active()?;
    let template = surface.get(id)?.clone();
    let new_id = surface.generate_id();
    surface.add(template.duplicate_as(new_id, DUPLICATE_OFFSET));
    surface.set_active_object(new_id);
    Some(new_id)
}
