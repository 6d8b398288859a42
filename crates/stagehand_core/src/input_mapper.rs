//! Translates pointer events on scene objects into selection changes

use crate::events::{Gesture, PointerEvent};
use crate::hover::HoverState;
use crate::selection::SelectionState;

/// Maps pointer and context-menu events onto [`SelectionState`] mutations
///
/// Per-object handlers take the object's name; the scene-wide miss handler
/// must be called after every per-object handler for the same gesture.
#[derive(Clone, Debug)]
pub struct InputEventMapper {
    selection: SelectionState,
}

impl InputEventMapper {
    pub fn new(selection: SelectionState) -> Self {
        Self { selection }
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Primary click on `name`: selects it and stops the event
    pub fn on_click(&self, event: &mut PointerEvent, name: &str) {
        event.stop_propagation();
        self.selection.select(name);
    }

    /// Context-menu click on `name`: cycles the mode if `name` is selected,
    /// otherwise does nothing and lets the event continue
    pub fn on_context_menu(&self, event: &mut PointerEvent, name: &str) {
        if self.selection.snapshot().is_selected(name) {
            event.stop_propagation();
            self.selection.cycle_mode();
        }
    }

    /// A gesture that hit no object; only a primary click deselects
    pub fn on_pointer_missed(&self, gesture: Gesture) {
        if gesture == Gesture::Click {
            self.selection.deselect();
        }
    }

    /// Pointer entered an object's bounds
    pub fn on_pointer_over(&self, event: &mut PointerEvent, hover: &mut HoverState) {
        event.stop_propagation();
        hover.enter();
    }

    /// Pointer left an object's bounds
    pub fn on_pointer_out(&self, hover: &mut HoverState) {
        hover.leave();
    }
}
