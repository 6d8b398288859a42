//! SceneBuilder - Declarative scene construction
//!
//! Provides a fluent API for building the desk scene: a ground plane, placed
//! model objects with physics bodies, their views, and the lights.
//! [`compose_scene`] drives the builder from a [`SceneTemplate`] and the app config.

use std::path::Path;
use stagehand_core::{
    Aabb, Appearance, DragInput, Entity, GizmoSensitivity, GroundTemplate, InputEventMapper, LightTemplate, Material,
    ModelAsset, ModelObject, ObjectPlacement, OrbitCamera, Palette, PhysicsActivationPolicy,
    PhysicsConfig, PhysicsMaterial, RigidBody, SceneError, SceneObjectView, SceneTemplate,
    SelectionState, StaticCollider, TransformGizmo, TransformGizmoBinding, Vec3, ViewSet, World,
    INTERACTIVE_TAG,
};
use crate::config::{AppConfig, SceneConfig};

/// Name of the ground entity
pub const GROUND_NAME: &str = "ground";

/// Builder for constructing the scene world and its object views
///
/// # Example
/// ```ignore
/// let selection = SelectionState::new();
/// let (world, views, lights) = SceneBuilder::new(&selection)
///     .with_physics(PhysicsConfig::default())
///     .add_ground(GroundTemplate::default(), Material::WHITE)
///     .add_object(&placement, &model_object, Material::WHITE)
///     .build();
/// ```
pub struct SceneBuilder {
    world: World,
    views: ViewSet,
    selection: SelectionState,
    lights: Vec<LightTemplate>,
}

impl SceneBuilder {
    /// Create a builder whose views observe `selection`
    pub fn new(selection: &SelectionState) -> Self {
        Self {
            world: World::new(),
            views: ViewSet::new(),
            selection: selection.clone(),
            lights: Vec::new(),
        }
    }

    /// Enable physics with the given config
    pub fn with_physics(mut self, config: PhysicsConfig) -> Self {
        self.world = self.world.with_physics(config);
        self
    }

    /// Add the ground plane
    ///
    /// This adds both a physics floor collider and a thin visual entity. The
    /// ground is not interactive, so pointer events pass through it.
    pub fn add_ground(mut self, ground: GroundTemplate, material: Material) -> Self {
        if let Some(physics) = self.world.physics_mut() {
            physics.add_static_collider(StaticCollider::floor(ground.y, PhysicsMaterial::GROUND));
        }

        let half = ground.size / 2.0;
        let bounds = Aabb::new(Vec3::new(-half, ground.y - 0.001, -half), Vec3::new(half, ground.y, half));
        self.world.add_entity(
            Entity::new(bounds)
                .with_name(GROUND_NAME)
                .with_tag("static")
                .with_material(material),
        );

        self
    }

    /// Place one model object
    ///
    /// With physics enabled and `placement.physics` set, the object gets a
    /// dynamic body that may sleep and starts asleep, so it holds its pose
    /// until its view switches physics on.
    pub fn add_object(mut self, placement: &ObjectPlacement, object: &ModelObject, material: Material) -> Self {
        let transform = placement.transform();

        let body_key = match self.world.physics_mut() {
            Some(physics) if placement.physics => {
                let body = RigidBody::new_box(transform.position, object.bounds)
                    .with_rotation(transform.rotation)
                    .with_scale(transform.scale)
                    .with_mass(placement.mass)
                    .with_material(placement.material.unwrap_or(PhysicsMaterial::STANDARD))
                    .with_allow_sleep(true)
                    .asleep();
                Some(physics.add_body(body))
            }
            _ => None,
        };

        let mut entity = Entity::new(object.bounds)
            .with_name(placement.name.as_str())
            .with_tag(INTERACTIVE_TAG)
            .with_transform(transform)
            .with_material(material);

        if let Some(key) = body_key {
            entity = entity.with_physics_body(key);
        }

        let entity_key = self.world.add_entity(entity);
        self.views
            .insert(SceneObjectView::mount(placement.name.as_str(), entity_key, body_key, &self.selection));

        self
    }

    /// Add a point light
    pub fn add_light(mut self, light: LightTemplate) -> Self {
        self.lights.push(light);
        self
    }

    /// Build the scene and return the world, the object views and the lights
    pub fn build(self) -> (World, ViewSet, Vec<LightTemplate>) {
        (self.world, self.views, self.lights)
    }
}

/// Everything the app needs to run a composed scene
pub struct ComposedScene {
    pub name: String,
    pub world: World,
    pub views: ViewSet,
    pub lights: Vec<LightTemplate>,
    pub camera: OrbitCamera,
    pub gizmo: TransformGizmoBinding<TransformGizmo>,
    pub selection: SelectionState,
    pub mapper: InputEventMapper,
    pub palette: Palette,
    pub activation_policy: PhysicsActivationPolicy,
}

impl ComposedScene {
    /// Turn physics on or off for every placed object
    pub fn set_physics_enabled(&mut self, enabled: bool) {
        let policy = self.activation_policy;
        if let Some(physics) = self.world.physics_mut() {
            self.views.set_physics_enabled(enabled, policy, physics);
        }
    }

    /// Flip physics for every placed object; returns the new setting
    pub fn toggle_physics(&mut self) -> bool {
        let enabled = !self.views.all_physics_enabled();
        self.set_physics_enabled(enabled);
        enabled
    }

    /// Move the gizmo's target by a pointer drag
    ///
    /// The teleported body is woken when its object has physics on, so a
    /// settled object lifted off the desk falls again.
    pub fn apply_gizmo_drag(&mut self, drag: DragInput) -> bool {
        let gizmo = self.gizmo.widget();
        if !gizmo.apply_drag(&mut self.world, drag) {
            return false;
        }
        let Some(view) = gizmo.target().and_then(|name| self.views.get(name)) else {
            return true;
        };
        if let (true, Some(body), Some(physics)) = (view.is_physics_enabled(), view.body(), self.world.physics_mut()) {
            physics.wake_up(body);
        }
        true
    }
}

/// Read the scene template named in config, or the built-in desk scene if
/// that file does not exist
pub fn load_template(config: &SceneConfig) -> Result<SceneTemplate, SceneError> {
    if Path::new(&config.path).exists() {
        log::info!("Loading scene from {}", config.path);
        SceneTemplate::load(&config.path)
    } else {
        log::info!("No scene file at {}; using the built-in desk scene", config.path);
        Ok(SceneTemplate::demo(config.fallback_model.as_str()))
    }
}

/// Compose the scene tree
///
/// Fails with [`SceneError::MissingObject`] before building anything if a
/// placement names an object `model` does not contain.
pub fn compose_scene(
    config: &AppConfig,
    template: &SceneTemplate,
    model: &ModelAsset,
    selection: &SelectionState,
) -> Result<ComposedScene, SceneError> {
    template.validate(model)?;

    let palette = config.appearance.palette();
    let ground_material = Material::from_hex(&config.appearance.ground_color).unwrap_or(Material::WHITE);

    let mut builder = SceneBuilder::new(selection)
        .with_physics(config.physics.to_physics_config())
        .add_ground(template.ground, ground_material);

    for placement in &template.objects {
        let object = model.require(&placement.name)?;
        builder = builder.add_object(placement, object, palette.material(Appearance::Default));
    }

    for light in &template.lights {
        builder = builder.add_light(*light);
    }

    let (world, views, lights) = builder.build();

    let camera_config = &config.camera;
    let camera = OrbitCamera::new(
        Vec3::from_array(camera_config.position),
        Vec3::from_array(camera_config.target),
        camera_config.fov,
        camera_config.orbit_limits(),
    )
    .with_clip_planes(camera_config.near, camera_config.far);

    let sensitivity: GizmoSensitivity = config.input.gizmo_sensitivity();
    let gizmo = TransformGizmoBinding::new(TransformGizmo::new(sensitivity), selection);

    let mut scene = ComposedScene {
        name: template.name.clone(),
        world,
        views,
        lights,
        camera,
        gizmo,
        selection: selection.clone(),
        mapper: InputEventMapper::new(selection.clone()),
        palette,
        activation_policy: config.physics.activation_policy,
    };

    scene.views.apply_appearance(&mut scene.world, &scene.palette);

    if config.physics.enabled_at_start {
        scene.set_physics_enabled(true);
    }

    if config.debug.show_colliders {
        for view in scene.views.iter() {
            if let Some(entity) = scene.world.get_entity(view.entity()) {
                let bounds = entity.world_bounds();
                log::info!("Collider '{}': {:?} .. {:?}", view.name(), bounds.min, bounds.max);
            }
        }
    }

    log::info!(
        "Composed scene '{}': {} objects, {} lights",
        scene.name,
        scene.views.len(),
        scene.lights.len()
    );

    Ok(scene)
}
