//! Leptos DragDrop Utilities
//!
//! Mouse-event drag-and-drop for reordering a flat, id-keyed list.
//! Uses movement threshold to distinguish click from drag.

use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// Where a dragged row will land
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropTarget {
    /// In front of the row with this id
    Before(String),
    /// After the last row
    End,
}

/// DnD state signals
#[derive(Clone, Copy)]
pub struct DndSignals {
    pub dragging_id_read: ReadSignal<Option<String>>,
    pub dragging_id_write: WriteSignal<Option<String>>,
    pub drop_target_read: ReadSignal<Option<DropTarget>>,
    pub drop_target_write: WriteSignal<Option<DropTarget>>,
    /// Row under the mouse button that has not moved far enough yet
    pub pending_id_read: ReadSignal<Option<String>>,
    pub pending_id_write: WriteSignal<Option<String>>,
    /// Start position for movement detection
    pub start_read: ReadSignal<(i32, i32)>,
    pub start_write: WriteSignal<(i32, i32)>,
}

/// Movement threshold in pixels to start dragging
const DRAG_THRESHOLD_PX: i32 = 5;

pub fn create_dnd_signals() -> DndSignals {
    let (dragging_id_read, dragging_id_write) = signal(None::<String>);
    let (drop_target_read, drop_target_write) = signal(None::<DropTarget>);
    let (pending_id_read, pending_id_write) = signal(None::<String>);
    let (start_read, start_write) = signal((0i32, 0i32));
    DndSignals {
        dragging_id_read,
        dragging_id_write,
        drop_target_read,
        drop_target_write,
        pending_id_read,
        pending_id_write,
        start_read,
        start_write,
    }
}

/// Index the dragged row ends up at when dropped in front of `slot`.
///
/// `slot` counts gaps before removal: 0 is above the first row, `len` is
/// below the last. Dropping below yourself shifts by one since the row
/// leaves its old place first.
pub fn slot_destination(from: usize, slot: usize) -> usize {
    if slot > from {
        slot - 1
    } else {
        slot
    }
}

/// End drag operation
pub fn end_drag(dnd: &DndSignals) {
    dnd.dragging_id_write.set(None);
    dnd.drop_target_write.set(None);
    dnd.pending_id_write.set(None);
}

/// Mousedown handler for a draggable row: records a pending drag
pub fn make_on_mousedown(dnd: DndSignals, row_id: String) -> impl Fn(web_sys::MouseEvent) + Clone + 'static {
    move |ev: web_sys::MouseEvent| {
        if ev.button() != 0 {
            return;
        }
        // Typing and clicking inside a row must not start a drag
        if let Some(target) = ev.target() {
            if target.dyn_ref::<web_sys::HtmlInputElement>().is_some() { return; }
            if target.dyn_ref::<web_sys::HtmlButtonElement>().is_some() { return; }
        }
        dnd.pending_id_write.set(Some(row_id.clone()));
        dnd.start_write.set((ev.client_x(), ev.client_y()));
    }
}

/// Document mousemove: promotes a pending drag once moved past the threshold
pub fn bind_global_mousemove(dnd: DndSignals) {
    use wasm_bindgen::closure::Closure;

    let on_mousemove = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |ev: web_sys::MouseEvent| {
        // Listeners outlive the owning component; disposed signals read as idle.
        let pending = dnd.pending_id_read.try_get_untracked().flatten();
        if pending.is_none() || dnd.dragging_id_read.try_get_untracked().flatten().is_some() {
            return;
        }
        let Some((start_x, start_y)) = dnd.start_read.try_get_untracked() else {
            return;
        };
        let dx = (ev.client_x() - start_x).abs();
        let dy = (ev.client_y() - start_y).abs();
        if dx > DRAG_THRESHOLD_PX || dy > DRAG_THRESHOLD_PX {
            dnd.dragging_id_write.set(pending);
        }
    });

    if let Some(doc) = web_sys::window().and_then(|win| win.document()) {
        let _ = doc.add_event_listener_with_callback("mousemove", on_mousemove.as_ref().unchecked_ref());
    }
    on_mousemove.forget();
}

/// Mouseenter handler for a row: dropping here inserts in front of it
pub fn make_on_row_mouseenter(dnd: DndSignals, row_id: String) -> impl Fn(web_sys::MouseEvent) + Clone + 'static {
    move |_ev: web_sys::MouseEvent| {
        match dnd.dragging_id_read.get_untracked() {
            Some(dragging) if dragging != row_id => {
                dnd.drop_target_write.set(Some(DropTarget::Before(row_id.clone())));
            }
            _ => {}
        }
    }
}

/// Mouseenter handler for the zone below the last row
pub fn make_on_end_mouseenter(dnd: DndSignals) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging_id_read.get_untracked().is_some() {
            dnd.drop_target_write.set(Some(DropTarget::End));
        }
    }
}

pub fn make_on_mouseleave(dnd: DndSignals) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging_id_read.get_untracked().is_some() {
            dnd.drop_target_write.set(None);
        }
    }
}

/// Bind global mouseup handler for drop detection
pub fn bind_global_mouseup<F>(dnd: DndSignals, on_drop: F)
where
    F: Fn(String, DropTarget) + 'static,
{
    use wasm_bindgen::closure::Closure;

    let on_mouseup = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_ev: web_sys::MouseEvent| {
        let dragging_id = dnd.dragging_id_read.try_get_untracked().flatten();
        let drop_target = dnd.drop_target_read.try_get_untracked().flatten();
        end_drag(&dnd);
        // No drag in progress: the click event fires on the element as usual
        if let (Some(dragged), Some(target)) = (dragging_id, drop_target) {
            on_drop(dragged, target);
        }
    });

    if let Some(doc) = web_sys::window().and_then(|win| win.document()) {
        let _ = doc.add_event_listener_with_callback("mouseup", on_mouseup.as_ref().unchecked_ref());
    }
    on_mouseup.forget();

    bind_global_mousemove(dnd);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_destination() {
        // Moving up: slot index is the destination
        assert_eq!(slot_destination(3, 0), 0);
        assert_eq!(slot_destination(3, 3), 3);
        // Moving down: the row leaves a gap above the slot
        assert_eq!(slot_destination(0, 2), 1);
        assert_eq!(slot_destination(0, 4), 3);
    }
}
