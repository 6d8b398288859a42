//! Pointer gesture classification
//!
//! A press and its release become one gesture. Travel is measured as the
//! furthest the cursor got from the press position, so wiggling back to the
//! start still counts as a drag.
//!
//! | button    | travel < threshold | travel >= threshold |
//! |-----------|--------------------|---------------------|
//! | left      | `Click`            | `DragRelease`       |
//! | right     | `ContextMenu`      | `DragRelease`       |

use stagehand_core::Gesture;
use winit::event::{ElementState, MouseButton};

/// Mouse buttons that produce gestures
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

impl PointerButton {
    pub fn from_winit(button: MouseButton) -> Option<Self> {
        match button {
            MouseButton::Left => Some(Self::Primary),
            MouseButton::Right => Some(Self::Secondary),
            _ => None,
        }
    }
}

/// Result of feeding a button event to the tracker
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerInput {
    /// A button went down at the cursor position
    Pressed { button: PointerButton, x: f64, y: f64 },
    /// The button came back up, completing a gesture
    Released { button: PointerButton, gesture: Gesture },
}

#[derive(Clone, Copy, Debug)]
struct Press {
    button: PointerButton,
    start: (f64, f64),
    travel: f64,
}

/// Tracks the cursor and the button being held
#[derive(Clone, Debug)]
pub struct GestureTracker {
    position: (f64, f64),
    press: Option<Press>,
    drag_threshold: f64,
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self::new(4.0)
    }
}

impl GestureTracker {
    /// Create a tracker; presses that travel `drag_threshold` pixels or more are drags
    pub fn new(drag_threshold: f64) -> Self {
        Self {
            position: (0.0, 0.0),
            press: None,
            drag_threshold,
        }
    }

    pub fn position(&self) -> (f64, f64) {
        self.position
    }

    /// Button currently held, if any
    pub fn held_button(&self) -> Option<PointerButton> {
        self.press.map(|p| p.button)
    }

    /// Whether the held button has moved far enough to be a drag
    pub fn is_dragging(&self) -> bool {
        self.press.is_some_and(|p| p.travel >= self.drag_threshold)
    }

    /// Record a cursor move and return the delta since the last position
    pub fn cursor_moved(&mut self, x: f64, y: f64) -> (f64, f64) {
        let delta = (x - self.position.0, y - self.position.1);
        self.position = (x, y);
        if let Some(press) = self.press.as_mut() {
            let (dx, dy) = (x - press.start.0, y - press.start.1);
            press.travel = press.travel.max((dx * dx + dy * dy).sqrt());
        }
        delta
    }

    /// Record a button event
    ///
    /// Buttons other than left and right are ignored, as is a second button
    /// pressed while one is already held.
    pub fn button(&mut self, button: MouseButton, state: ElementState) -> Option<PointerInput> {
        let button = PointerButton::from_winit(button)?;

        match state {
            ElementState::Pressed => {
                if self.press.is_some() {
                    return None;
                }
                self.press = Some(Press {
                    button,
                    start: self.position,
                    travel: 0.0,
                });
                Some(PointerInput::Pressed {
                    button,
                    x: self.position.0,
                    y: self.position.1,
                })
            }
            ElementState::Released => {
                let press = self.press.filter(|p| p.button == button)?;
                self.press = None;

                let dragged = press.travel >= self.drag_threshold;
                let gesture = match (button, dragged) {
                    (_, true) => Gesture::DragRelease,
                    (PointerButton::Primary, false) => Gesture::Click,
                    (PointerButton::Secondary, false) => Gesture::ContextMenu,
                };
                log::trace!("{:?} released after {:.1}px: {:?}", button, press.travel, gesture);
                Some(PointerInput::Released { button, gesture })
            }
        }
    }

    /// Forget the held button (e.g. when the cursor leaves the window)
    pub fn cancel(&mut self) {
        self.press = None;
    }
}
