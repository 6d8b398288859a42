//! Rigid body types

use crate::material::PhysicsMaterial;
use crate::shapes::Plane;
use stagehand_math::{Aabb, Quat, Vec3};
use slotmap::new_key_type;

new_key_type! {
    /// Key to a rigid body in the physics world
    ///
    /// Generational: once a body is removed, its old key returns `None` even
    /// if the slot is reused.
    pub struct BodyKey;
}

/// How a body participates in the simulation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BodyType {
    /// Moved by gravity and contacts
    #[default]
    Dynamic,
    /// Never moves; other bodies collide against it
    Static,
}

/// Simulation state of a body
///
/// Sleeping bodies are skipped during integration until woken.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SleepState {
    #[default]
    Awake,
    /// Slow enough to be a sleep candidate; still simulated
    Sleepy,
    Sleeping,
}

/// A box-shaped rigid body
#[derive(Clone, Debug)]
pub struct RigidBody {
    /// World position of the body origin
    pub position: Vec3,
    /// World rotation
    pub rotation: Quat,
    /// Uniform scale applied to the local bounds
    pub scale: f32,
    /// Velocity (units per second)
    pub velocity: Vec3,
    /// Mass (used to split contact corrections between bodies)
    pub mass: f32,
    /// Surface material
    pub material: PhysicsMaterial,
    /// Whether this body is affected by gravity
    pub affected_by_gravity: bool,
    /// Whether the world may put this body to sleep when it comes to rest
    pub allow_sleep: bool,
    body_type: BodyType,
    sleep_state: SleepState,
    /// Seconds spent under the sleep speed limit
    idle_time: f32,
    /// Collision box in body-local space
    local_bounds: Aabb,
    /// Cached world-space collision box
    collider: Aabb,
}

impl RigidBody {
    /// Create a dynamic body whose collision box is `local_bounds` placed at `position`
    pub fn new_box(position: Vec3, local_bounds: Aabb) -> Self {
        let mut body = Self {
            position,
            rotation: Quat::IDENTITY,
            scale: 1.0,
            velocity: Vec3::ZERO,
            mass: 1.0,
            material: PhysicsMaterial::default(),
            affected_by_gravity: true,
            allow_sleep: false,
            body_type: BodyType::Dynamic,
            sleep_state: SleepState::Awake,
            idle_time: 0.0,
            local_bounds,
            collider: local_bounds,
        };
        body.refresh_collider();
        body
    }

    /// Create a dynamic body with a box of the given half-extents centered on `position`
    pub fn new_cuboid(position: Vec3, half_extents: Vec3) -> Self {
        Self::new_box(position, Aabb::from_center_half_extents(Vec3::ZERO, half_extents))
    }

    /// Set the body type; static bodies ignore gravity
    pub fn with_body_type(mut self, body_type: BodyType) -> Self {
        self.body_type = body_type;
        if body_type == BodyType::Static {
            self.affected_by_gravity = false;
        }
        self
    }

    /// Set the mass of this body
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    /// Set the rotation of this body
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self.refresh_collider();
        self
    }

    /// Set the uniform scale of this body
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self.refresh_collider();
        self
    }

    /// Set the velocity of this body
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Set the surface material
    pub fn with_material(mut self, material: PhysicsMaterial) -> Self {
        self.material = material;
        self
    }

    /// Set whether this body is affected by gravity
    pub fn with_gravity(mut self, affected: bool) -> Self {
        self.affected_by_gravity = affected;
        self
    }

    /// Allow the world to put this body to sleep when it comes to rest
    pub fn with_allow_sleep(mut self, allow: bool) -> Self {
        self.allow_sleep = allow;
        self
    }

    /// Create the body already sleeping
    pub fn asleep(mut self) -> Self {
        self.sleep();
        self
    }

    /// Get the body type
    pub fn body_type(&self) -> BodyType {
        self.body_type
    }

    /// Check if this body is static
    pub fn is_static(&self) -> bool {
        self.body_type == BodyType::Static
    }

    /// Current sleep state
    pub fn sleep_state(&self) -> SleepState {
        self.sleep_state
    }

    /// Whether the body is excluded from integration
    pub fn is_sleeping(&self) -> bool {
        self.sleep_state == SleepState::Sleeping
    }

    /// Put the body to sleep, discarding its velocity
    pub fn sleep(&mut self) {
        self.sleep_state = SleepState::Sleeping;
        self.velocity = Vec3::ZERO;
        self.idle_time = 0.0;
    }

    /// Wake the body so it is simulated again
    pub fn wake_up(&mut self) {
        self.sleep_state = SleepState::Awake;
        self.idle_time = 0.0;
    }

    /// World-space collision box
    pub fn collider(&self) -> &Aabb {
        &self.collider
    }

    /// Collision box in body-local space
    pub fn local_bounds(&self) -> &Aabb {
        &self.local_bounds
    }

    /// Teleport the body, clearing its velocity
    pub fn set_transform(&mut self, position: Vec3, rotation: Quat, scale: f32) {
        self.position = position;
        self.rotation = rotation;
        self.scale = scale;
        self.velocity = Vec3::ZERO;
        self.refresh_collider();
    }

    /// Apply a positional correction (e.g., from collision resolution)
    pub fn apply_correction(&mut self, correction: Vec3) {
        self.position += correction;
        self.collider = self.collider.translated(correction);
    }

    /// Advance the sleep timer; returns true when the body just fell asleep
    pub(crate) fn update_sleep(&mut self, dt: f32, speed_limit: f32, time_limit: f32) -> bool {
        if !self.allow_sleep || self.is_static() || self.is_sleeping() {
            return false;
        }

        if self.velocity.length() < speed_limit {
            self.sleep_state = SleepState::Sleepy;
            self.idle_time += dt;
            if self.idle_time >= time_limit {
                self.sleep();
                return true;
            }
        } else {
            self.sleep_state = SleepState::Awake;
            self.idle_time = 0.0;
        }
        false
    }

    fn refresh_collider(&mut self) {
        self.collider = self.local_bounds.transformed(self.position, self.rotation, self.scale);
    }
}

/// A non-moving collider such as the ground plane
#[derive(Clone, Copy, Debug)]
pub struct StaticCollider {
    /// Collision plane
    pub plane: Plane,
    /// Surface material
    pub material: PhysicsMaterial,
}

impl StaticCollider {
    /// Create a static plane collider
    pub fn plane(normal: Vec3, distance: f32, material: PhysicsMaterial) -> Self {
        Self {
            plane: Plane::new(normal, distance),
            material,
        }
    }

    /// Create a horizontal ground plane at height `y`
    pub fn floor(y: f32, material: PhysicsMaterial) -> Self {
        Self {
            plane: Plane::floor(y),
            material,
        }
    }
}
