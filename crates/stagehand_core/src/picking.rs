//! Pointer picking and event dispatch
//!
//! [`pick`] casts a ray against every interactive entity and returns the hits
//! nearest-first. [`PointerDispatcher`] delivers one gesture to those hits:
//! per-object handlers run front to back until one stops propagation, and the
//! scene-wide miss handler runs last, only when nothing was hit.

use std::cmp::Ordering;
use stagehand_math::Ray;
use crate::events::{Gesture, PointerEvent};
use crate::input_mapper::InputEventMapper;
use crate::view::ViewSet;
use crate::{EntityKey, World};

/// Tag marking entities that receive pointer events
pub const INTERACTIVE_TAG: &str = "interactive";

/// One object under the pointer
#[derive(Clone, Debug, PartialEq)]
pub struct Hit {
    pub name: String,
    pub entity: EntityKey,
    /// Distance along the ray to the object's bounds
    pub distance: f32,
}

/// Interactive entities hit by `ray`, nearest first
pub fn pick(world: &World, ray: &Ray) -> Vec<Hit> {
    let mut hits: Vec<Hit> = world
        .tagged(INTERACTIVE_TAG)
        .filter_map(|(key, entity)| {
            let name = entity.name.as_ref()?;
            let distance = ray.intersect_aabb(&entity.world_bounds())?;
            Some(Hit {
                name: name.clone(),
                entity: key,
                distance,
            })
        })
        .collect();
    hits.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(Ordering::Equal));
    hits
}

/// What a dispatched gesture did
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Delivered to these objects, in order
    Handled(Vec<String>),
    /// Nothing was hit; the miss handler ran
    Missed,
}

/// Routes gestures to object views and tracks which object is hovered
#[derive(Debug, Default)]
pub struct PointerDispatcher {
    hovered: Option<String>,
}

impl PointerDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the object currently under the pointer
    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    /// Deliver one gesture to the objects in `hits` (nearest first)
    pub fn dispatch(
        &mut self,
        gesture: Gesture,
        hits: &[Hit],
        views: &mut ViewSet,
        mapper: &InputEventMapper,
    ) -> DispatchOutcome {
        if gesture == Gesture::Move {
            return self.dispatch_hover(hits, views, mapper);
        }

        let mut event = PointerEvent::new(gesture);
        let mut delivered = Vec::new();
        for hit in hits {
            let Some(view) = views.get(&hit.name) else {
                continue;
            };
            match gesture {
                Gesture::Click => view.handle_click(mapper, &mut event),
                Gesture::ContextMenu => view.handle_context_menu(mapper, &mut event),
                Gesture::DragRelease | Gesture::Move => {}
            }
            delivered.push(hit.name.clone());
            if event.is_propagation_stopped() {
                break;
            }
        }

        if hits.is_empty() {
            mapper.on_pointer_missed(gesture);
            DispatchOutcome::Missed
        } else {
            DispatchOutcome::Handled(delivered)
        }
    }

    /// The pointer left the canvas; every hovered object gets a pointer-out
    pub fn pointer_left(&mut self, views: &mut ViewSet, mapper: &InputEventMapper) {
        if let Some(previous) = self.hovered.take() {
            if let Some(view) = views.get_mut(&previous) {
                view.handle_pointer_out(mapper);
            }
        }
    }

    fn dispatch_hover(
        &mut self,
        hits: &[Hit],
        views: &mut ViewSet,
        mapper: &InputEventMapper,
    ) -> DispatchOutcome {
        let front = hits.iter().find(|h| views.get(&h.name).is_some()).map(|h| h.name.clone());
        if front == self.hovered {
            return match front {
                Some(name) => DispatchOutcome::Handled(vec![name]),
                None => DispatchOutcome::Missed,
            };
        }

        self.pointer_left(views, mapper);

        match front {
            Some(name) => {
                if let Some(view) = views.get_mut(&name) {
                    let mut event = PointerEvent::new(Gesture::Move);
                    view.handle_pointer_over(mapper, &mut event);
                }
                log::trace!("Hovering '{}'", name);
                self.hovered = Some(name.clone());
                DispatchOutcome::Handled(vec![name])
            }
            None => DispatchOutcome::Missed,
        }
    }
}
