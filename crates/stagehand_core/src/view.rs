//! Per-object views
//!
//! A [`SceneObjectView`] is the interactive face of one named entity. It
//! tracks whether its object is the selected one (through a selection
//! subscription held for the view's lifetime), owns the object's hover state,
//! forwards pointer events to the [`InputEventMapper`] with its own name, and
//! controls whether the object's physics body is simulated.

use std::cell::Cell;
use std::rc::Rc;
use serde::{Serialize, Deserialize};
use stagehand_physics::{BodyKey, PhysicsWorld};
use crate::events::PointerEvent;
use crate::hover::{CursorStyle, HoverState};
use crate::input_mapper::InputEventMapper;
use crate::selection::{SelectionState, Subscription};
use crate::{EntityKey, Material, World};

/// What disabling physics does to an object's body
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhysicsActivationPolicy {
    /// Enabling wakes the body; disabling leaves it awake
    #[default]
    WakeOnly,
    /// Enabling wakes the body; disabling puts it back to sleep
    Symmetric,
}

/// Display colours for selected and unselected objects
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub highlight: Material,
    pub default: Material,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            highlight: Material::from_rgb(1.0, 96.0 / 255.0, 128.0 / 255.0),
            default: Material::from_rgb(213.0 / 255.0, 222.0 / 255.0, 162.0 / 255.0),
        }
    }
}

impl Palette {
    /// Build a palette from two hex colour strings
    pub fn from_hex(highlight: &str, default: &str) -> Option<Self> {
        Some(Self {
            highlight: Material::from_hex(highlight)?,
            default: Material::from_hex(default)?,
        })
    }

    pub fn material(&self, appearance: Appearance) -> Material {
        match appearance {
            Appearance::Highlighted => self.highlight,
            Appearance::Default => self.default,
        }
    }
}

/// How a view is drawn
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Appearance {
    Default,
    /// The object is the current selection
    Highlighted,
}

/// The interactive view of one named scene object
pub struct SceneObjectView {
    name: String,
    entity: EntityKey,
    body: Option<BodyKey>,
    hover: HoverState,
    highlighted: Rc<Cell<bool>>,
    physics_enabled: bool,
    _subscription: Subscription,
}

impl SceneObjectView {
    /// Mount a view for `name`, subscribing to `selection`
    ///
    /// The subscription is released when the view is dropped.
    pub fn mount(
        name: impl Into<String>,
        entity: EntityKey,
        body: Option<BodyKey>,
        selection: &SelectionState,
    ) -> Self {
        let name = name.into();
        let highlighted = Rc::new(Cell::new(selection.snapshot().is_selected(&name)));

        let subscription = {
            let highlighted = Rc::clone(&highlighted);
            let name = name.clone();
            selection.subscribe(move |snapshot| highlighted.set(snapshot.is_selected(&name)))
        };

        Self {
            name,
            entity,
            body,
            hover: HoverState::new(),
            highlighted,
            physics_enabled: false,
            _subscription: subscription,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entity(&self) -> EntityKey {
        self.entity
    }

    pub fn body(&self) -> Option<BodyKey> {
        self.body
    }

    pub fn hover(&self) -> &HoverState {
        &self.hover
    }

    pub fn is_hovered(&self) -> bool {
        self.hover.is_hovered()
    }

    pub fn appearance(&self) -> Appearance {
        if self.highlighted.get() {
            Appearance::Highlighted
        } else {
            Appearance::Default
        }
    }

    /// Display colour under `palette`
    pub fn color(&self, palette: &Palette) -> [f32; 4] {
        palette.material(self.appearance()).base_color
    }

    /// Push the current appearance onto the entity's material
    pub fn apply_appearance(&self, world: &mut World, palette: &Palette) {
        if let Some(entity) = world.get_entity_mut(self.entity) {
            entity.set_material(palette.material(self.appearance()));
        }
    }

    pub fn handle_click(&self, mapper: &InputEventMapper, event: &mut PointerEvent) {
        mapper.on_click(event, &self.name);
    }

    pub fn handle_context_menu(&self, mapper: &InputEventMapper, event: &mut PointerEvent) {
        mapper.on_context_menu(event, &self.name);
    }

    pub fn handle_pointer_over(&mut self, mapper: &InputEventMapper, event: &mut PointerEvent) {
        mapper.on_pointer_over(event, &mut self.hover);
    }

    pub fn handle_pointer_out(&mut self, mapper: &InputEventMapper) {
        mapper.on_pointer_out(&mut self.hover);
    }

    pub fn is_physics_enabled(&self) -> bool {
        self.physics_enabled
    }

    /// Enable or disable simulation of this object's body
    ///
    /// Enabling always wakes the body. What disabling does depends on `policy`.
    pub fn set_physics_enabled(
        &mut self,
        enabled: bool,
        policy: PhysicsActivationPolicy,
        physics: &mut PhysicsWorld,
    ) {
        if enabled == self.physics_enabled {
            return;
        }
        self.physics_enabled = enabled;

        let Some(body) = self.body else {
            log::warn!("'{}' has no physics body to toggle", self.name);
            return;
        };

        if enabled {
            physics.wake_up(body);
            log::info!("Physics enabled for '{}'", self.name);
        } else {
            match policy {
                PhysicsActivationPolicy::Symmetric => {
                    physics.sleep(body);
                    log::info!("Physics disabled for '{}'", self.name);
                }
                PhysicsActivationPolicy::WakeOnly => {
                    log::debug!("Physics disabled for '{}'; body stays awake", self.name);
                }
            }
        }
    }
}

/// The views of every interactive object, in placement order
#[derive(Default)]
pub struct ViewSet {
    views: Vec<SceneObjectView>,
}

impl ViewSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, view: SceneObjectView) {
        self.views.push(view);
    }

    pub fn get(&self, name: &str) -> Option<&SceneObjectView> {
        self.views.iter().find(|v| v.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut SceneObjectView> {
        self.views.iter_mut().find(|v| v.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneObjectView> {
        self.views.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SceneObjectView> {
        self.views.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Pointer cursor while any object is hovered
    pub fn cursor(&self) -> CursorStyle {
        CursorStyle::from_hover(self.views.iter().map(|v| &v.hover))
    }

    /// Whether every view has physics enabled
    pub fn all_physics_enabled(&self) -> bool {
        !self.views.is_empty() && self.views.iter().all(|v| v.physics_enabled)
    }

    pub fn set_physics_enabled(
        &mut self,
        enabled: bool,
        policy: PhysicsActivationPolicy,
        physics: &mut PhysicsWorld,
    ) {
        for view in &mut self.views {
            view.set_physics_enabled(enabled, policy, physics);
        }
    }

    pub fn apply_appearance(&self, world: &mut World, palette: &Palette) {
        for view in &self.views {
            view.apply_appearance(world, palette);
        }
    }
}
