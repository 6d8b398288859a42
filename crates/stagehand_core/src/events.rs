//! Pointer events delivered to scene objects

/// The kind of pointer gesture that produced an event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Gesture {
    /// Primary button pressed and released without moving past the drag threshold
    Click,
    /// A button released after dragging past the threshold
    DragRelease,
    /// Secondary button click
    ContextMenu,
    /// Pointer motion (hover tracking)
    Move,
}

/// A pointer event travelling through the objects under the cursor,
/// front to back, until one of them stops it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointerEvent {
    gesture: Gesture,
    propagation_stopped: bool,
}

impl PointerEvent {
    pub fn new(gesture: Gesture) -> Self {
        Self {
            gesture,
            propagation_stopped: false,
        }
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    /// Prevent objects further back from receiving this event
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}
