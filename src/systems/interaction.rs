//! Pointer interaction system
//!
//! Turns window pointer events into scene interactions:
//! - Button release: the gesture is picked against the scene and dispatched
//!   to the object views (select, cycle mode, deselect on miss)
//! - Left drag starting on the selected object: the gizmo manipulates it
//! - Any other drag: the camera orbits
//! - Cursor motion with no button held: hover
//! - Wheel: zoom

use winit::event::{ElementState, MouseButton, MouseScrollDelta};
use stagehand_core::{pick, DispatchOutcome, DragInput, Gesture, Hit, PointerDispatcher};
use stagehand_input::{GestureTracker, OrbitController, PointerButton, PointerInput};
use crate::scene::ComposedScene;

/// Pixels per wheel line for touchpads that report pixel deltas
const PIXELS_PER_LINE: f64 = 40.0;

/// Routes pointer events to the scene, the gizmo and the orbit controls
pub struct InteractionSystem {
    tracker: GestureTracker,
    dispatcher: PointerDispatcher,
    viewport: (f32, f32),
    gizmo_drag: bool,
}

impl InteractionSystem {
    pub fn new(click_drag_threshold: f64, width: u32, height: u32) -> Self {
        Self {
            tracker: GestureTracker::new(click_drag_threshold),
            dispatcher: PointerDispatcher::new(),
            viewport: (width as f32, height as f32),
            gizmo_drag: false,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = (width as f32, height as f32);
    }

    /// Whether the gizmo currently owns the drag
    pub fn is_gizmo_dragging(&self) -> bool {
        self.gizmo_drag
    }

    /// Objects under the given pixel, nearest first
    pub fn pick_at(&self, scene: &ComposedScene, x: f64, y: f64) -> Vec<Hit> {
        let (width, height) = self.viewport;
        let ray = scene.camera.screen_ray(x as f32, y as f32, width, height);
        pick(&scene.world, &ray)
    }

    pub fn cursor_moved(&mut self, x: f64, y: f64, scene: &mut ComposedScene, controller: &mut OrbitController) {
        let (dx, dy) = self.tracker.cursor_moved(x, y);

        if self.tracker.held_button().is_none() {
            let hits = self.pick_at(scene, x, y);
            self.dispatcher.dispatch(Gesture::Move, &hits, &mut scene.views, &scene.mapper);
            return;
        }

        if !self.tracker.is_dragging() {
            return;
        }

        if self.gizmo_drag {
            let drag = DragInput {
                dx: dx as f32,
                dy: dy as f32,
                right: scene.camera.right(),
                up: scene.camera.up(),
                units_per_pixel: scene.camera.units_per_pixel(self.viewport.1),
            };
            scene.apply_gizmo_drag(drag);
        } else {
            controller.process_mouse_motion(dx, dy);
        }
    }

    /// Handle a button event; returns the dispatch outcome when a gesture completed
    pub fn mouse_button(
        &mut self,
        button: MouseButton,
        state: ElementState,
        scene: &mut ComposedScene,
        controller: &mut OrbitController,
    ) -> Option<DispatchOutcome> {
        match self.tracker.button(button, state)? {
            PointerInput::Pressed { button, x, y } => {
                if button == PointerButton::Primary && self.begin_gizmo_drag(scene, x, y) {
                    controller.set_enabled(false);
                } else {
                    controller.set_dragging(true);
                }
                None
            }
            PointerInput::Released { gesture, .. } => {
                self.end_drag(scene, controller);
                let (x, y) = self.tracker.position();
                let hits = self.pick_at(scene, x, y);
                let outcome = self.dispatcher.dispatch(gesture, &hits, &mut scene.views, &scene.mapper);
                log::debug!("{:?}: {:?}", gesture, outcome);
                Some(outcome)
            }
        }
    }

    pub fn mouse_wheel(&mut self, delta: MouseScrollDelta, controller: &mut OrbitController) {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(position) => (position.y / PIXELS_PER_LINE) as f32,
        };
        controller.process_scroll(lines);
    }

    /// The cursor left the window: drop the press and every hover
    pub fn cursor_left(&mut self, scene: &mut ComposedScene, controller: &mut OrbitController) {
        self.tracker.cancel();
        self.end_drag(scene, controller);
        self.dispatcher.pointer_left(&mut scene.views, &scene.mapper);
    }

    fn begin_gizmo_drag(&mut self, scene: &ComposedScene, x: f64, y: f64) -> bool {
        let Some(selected) = scene.selection.selected() else {
            return false;
        };
        let hits = self.pick_at(scene, x, y);
        let on_selected = hits.first().is_some_and(|hit| hit.name == selected);
        self.gizmo_drag = on_selected && scene.gizmo.widget_mut().begin_drag(&selected);
        self.gizmo_drag
    }

    fn end_drag(&mut self, scene: &ComposedScene, controller: &mut OrbitController) {
        if self.gizmo_drag {
            scene.gizmo.widget_mut().end_drag();
            self.gizmo_drag = false;
            controller.set_enabled(true);
        }
        controller.set_dragging(false);
    }
}
