//! Drag-and-drop reordering.
//!
//! # Design
//! A drag happens in the displayed list, which may be a filtered subset of
//! the canonical list. Renumbering only the displayed items would hand
//! hidden items colliding `order` values, so the move is replayed on the
//! full list instead: the dragged todo is taken out and put back next to the
//! displayed todo it was dropped on. Hidden todos keep their relative
//! sequence, and every todo gets `order = index` in one batch.

use uuid::Uuid;

use crate::types::{sort_canonical, OrderUpdate, Todo};

/// Move the element at `source` so that it ends up at `destination`.
/// Out-of-range indices leave the slice untouched.
pub fn move_item<T>(items: &mut Vec<T>, source: usize, destination: usize) {
    if source >= items.len() || destination >= items.len() || source == destination {
        return;
    }
    let item = items.remove(source);
    items.insert(destination, item);
}

/// Compute the order batch for dragging `visible[source]` to `destination`.
///
/// `full` is the canonical list and `visible` the ids of the displayed list,
/// in display order. Returns `None` when the drag is a no-op or refers to
/// todos the canonical list does not contain.
///
/// The dragged todo lands directly before or after the drop target, never
/// past hidden todos that surround it. Dragging to the top of a filtered
/// view whose first canonical todo is hidden therefore yields an order
/// above zero: the hidden head stays first.
pub fn plan_reorder(full: &[Todo], visible: &[Uuid], source: usize, destination: usize) -> Option<Vec<OrderUpdate>> {
    if source == destination || source >= visible.len() || destination >= visible.len() {
        return None;
    }
    let moved = visible[source];
    let anchor = visible[destination];

    let mut todos = full.to_vec();
    sort_canonical(&mut todos);
    let mut sequence: Vec<Uuid> = todos.iter().map(|t| t.id).collect();

    let from = sequence.iter().position(|id| *id == moved)?;
    sequence.remove(from);
    let at = sequence.iter().position(|id| *id == anchor)?;
    let insert_at = if destination < source { at } else { at + 1 };
    sequence.insert(insert_at, moved);

    Some(
        sequence
            .into_iter()
            .enumerate()
            .map(|(index, id)| OrderUpdate {
                id,
                order: index as i64,
            })
            .collect(),
    )
}
