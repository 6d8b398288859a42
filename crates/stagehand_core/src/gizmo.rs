//! Transform gizmo binding
//!
//! [`TransformGizmoBinding`] keeps a [`GizmoWidget`] attached to whatever is
//! selected, in the selected mode. It is a two-state machine driven entirely by
//! selection notifications:
//!
//! - `Unbound` while nothing is selected
//! - `Bound { object, mode }` while something is, with `mode` always equal to
//!   the selection's current transform mode

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;
use stagehand_math::{Quat, Vec3};
use crate::selection::{SelectionSnapshot, SelectionState, Subscription, TransformMode};
use crate::World;

/// Scale never shrinks below this
pub const MIN_SCALE: f32 = 0.05;

/// A widget that draws manipulation handles on one object
pub trait GizmoWidget {
    /// Show handles on `object` in `mode`
    fn attach(&mut self, object: &str, mode: TransformMode);
    /// Switch the handles of the attached object to `mode`
    fn set_mode(&mut self, mode: TransformMode);
    /// Remove the handles
    fn detach(&mut self);
}

/// Binding state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum GizmoState {
    #[default]
    Unbound,
    Bound { object: String, mode: TransformMode },
}

struct Binding<W> {
    state: GizmoState,
    widget: W,
}

impl<W: GizmoWidget> Binding<W> {
    fn sync(&mut self, snapshot: &SelectionSnapshot) {
        let target = snapshot.selected.clone().map(|object| (object, snapshot.mode()));

        let next = match (&self.state, target) {
            (GizmoState::Unbound, None) => return,
            (GizmoState::Unbound, Some((object, mode))) => {
                self.widget.attach(&object, mode);
                GizmoState::Bound { object, mode }
            }
            (GizmoState::Bound { .. }, None) => {
                self.widget.detach();
                GizmoState::Unbound
            }
            (GizmoState::Bound { object: current, mode: current_mode }, Some((object, mode))) => {
                if *current != object {
                    self.widget.detach();
                    self.widget.attach(&object, mode);
                } else if *current_mode != mode {
                    self.widget.set_mode(mode);
                }
                GizmoState::Bound { object, mode }
            }
        };

        log::debug!("Gizmo {:?}", next);
        self.state = next;
    }
}

/// Keeps a gizmo widget in step with the selection
///
/// Dropping the binding unsubscribes it. The widget is left as it was.
pub struct TransformGizmoBinding<W> {
    binding: Rc<RefCell<Binding<W>>>,
    /// Latest snapshot that arrived while the widget was borrowed
    pending: Rc<RefCell<Option<SelectionSnapshot>>>,
    _subscription: Subscription,
}

/// Apply the queued snapshot, if the widget is free
///
/// Syncing can change the selection again, which queues a newer snapshot, so
/// this runs until the queue is empty or the widget is busy.
fn flush<W: GizmoWidget>(binding: &RefCell<Binding<W>>, pending: &RefCell<Option<SelectionSnapshot>>) {
    loop {
        let Ok(mut binding) = binding.try_borrow_mut() else {
            return;
        };
        let Some(snapshot) = pending.borrow_mut().take() else {
            return;
        };
        binding.sync(&snapshot);
    }
}

impl<W: GizmoWidget + 'static> TransformGizmoBinding<W> {
    /// Bind `widget` to `selection`, syncing immediately
    pub fn new(widget: W, selection: &SelectionState) -> Self {
        let binding = Rc::new(RefCell::new(Binding {
            state: GizmoState::Unbound,
            widget,
        }));
        binding.borrow_mut().sync(&selection.snapshot());
        let pending = Rc::new(RefCell::new(None));

        let subscription = {
            let binding = Rc::clone(&binding);
            let pending = Rc::clone(&pending);
            selection.subscribe(move |snapshot: &SelectionSnapshot| {
                *pending.borrow_mut() = Some(snapshot.clone());
                if binding.try_borrow_mut().is_err() {
                    log::debug!("Selection changed while the gizmo widget was busy; update queued");
                }
                flush(&binding, &pending);
            })
        };

        Self {
            binding,
            pending,
            _subscription: subscription,
        }
    }

    pub fn state(&self) -> GizmoState {
        self.catch_up();
        self.binding.borrow().state.clone()
    }

    pub fn is_bound(&self) -> bool {
        self.catch_up();
        self.binding.borrow().state != GizmoState::Unbound
    }

    pub fn widget(&self) -> Ref<'_, W> {
        self.catch_up();
        Ref::map(self.binding.borrow(), |b| &b.widget)
    }

    pub fn widget_mut(&self) -> RefMut<'_, W> {
        self.catch_up();
        RefMut::map(self.binding.borrow_mut(), |b| &mut b.widget)
    }

    fn catch_up(&self) {
        flush(&self.binding, &self.pending);
    }
}

/// Pointer drag in pixels, with screen-space directions of the camera
#[derive(Clone, Copy, Debug)]
pub struct DragInput {
    pub dx: f32,
    pub dy: f32,
    /// World-space direction of screen right
    pub right: Vec3,
    /// World-space direction of screen up
    pub up: Vec3,
    /// World units covered by one pixel at the object's depth
    pub units_per_pixel: f32,
}

/// Drag sensitivities for rotate and scale
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GizmoSensitivity {
    /// Radians per pixel of horizontal drag
    pub rotate: f32,
    /// Scale change per pixel of vertical drag
    pub scale: f32,
}

impl Default for GizmoSensitivity {
    fn default() -> Self {
        Self {
            rotate: 0.01,
            scale: 0.005,
        }
    }
}

/// The built-in gizmo: applies pointer drags to the bound entity
#[derive(Debug, Default)]
pub struct TransformGizmo {
    target: Option<String>,
    mode: Option<TransformMode>,
    dragging: bool,
    sensitivity: GizmoSensitivity,
}

impl TransformGizmo {
    pub fn new(sensitivity: GizmoSensitivity) -> Self {
        Self {
            sensitivity,
            ..Self::default()
        }
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn mode(&self) -> Option<TransformMode> {
        self.mode
    }

    /// Whether a drag is in progress; orbit controls stay off meanwhile
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Start a drag if the gizmo is attached to `object`
    pub fn begin_drag(&mut self, object: &str) -> bool {
        self.dragging = self.target.as_deref() == Some(object);
        self.dragging
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// Apply one drag step to the attached entity
    ///
    /// Returns false when no drag is active or the entity is gone.
    pub fn apply_drag(&self, world: &mut World, drag: DragInput) -> bool {
        if !self.dragging {
            return false;
        }
        let (Some(name), Some(mode)) = (self.target.as_deref(), self.mode) else {
            return false;
        };
        let Some((key, entity)) = world.get_by_name(name) else {
            log::warn!("Gizmo target '{}' is not in the world", name);
            return false;
        };

        let mut transform = entity.transform;
        match mode {
            TransformMode::Translate => {
                let offset = (drag.right * drag.dx - drag.up * drag.dy) * drag.units_per_pixel;
                transform.translate(offset);
            }
            TransformMode::Rotate => {
                transform.rotate(Quat::from_axis_angle(Vec3::Y, drag.dx * self.sensitivity.rotate));
            }
            TransformMode::Scale => {
                transform.scale_by(1.0 - drag.dy * self.sensitivity.scale, MIN_SCALE);
            }
        }
        world.set_transform(key, transform)
    }
}

impl GizmoWidget for TransformGizmo {
    fn attach(&mut self, object: &str, mode: TransformMode) {
        self.target = Some(object.to_string());
        self.mode = Some(mode);
        self.dragging = false;
    }

    fn set_mode(&mut self, mode: TransformMode) {
        self.mode = Some(mode);
    }

    fn detach(&mut self) {
        self.target = None;
        self.mode = None;
        self.dragging = false;
    }
}
