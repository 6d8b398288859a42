//! Physics world and simulation

use crate::body::{BodyKey, RigidBody, StaticCollider};
use crate::collision::{aabb_vs_aabb, aabb_vs_plane, Contact};
use stagehand_math::{Quat, Vec3};
use slotmap::SlotMap;

/// Configuration for the physics simulation
#[derive(Clone, Debug)]
pub struct PhysicsConfig {
    /// Gravity acceleration (applied to Y-axis, negative = down)
    pub gravity: f32,
    /// Fixed simulation step in seconds used by [`PhysicsWorld::update`]
    pub fixed_timestep: f32,
    /// Bodies slower than this (units/s) become sleep candidates
    pub sleep_speed_limit: f32,
    /// Seconds a candidate must stay slow before it sleeps
    pub sleep_time_limit: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: -9.81,
            fixed_timestep: 1.0 / 60.0,
            sleep_speed_limit: 0.1,
            sleep_time_limit: 1.0,
        }
    }
}

impl PhysicsConfig {
    /// Create a new physics config with the given gravity
    pub fn new(gravity: f32) -> Self {
        Self {
            gravity,
            ..Self::default()
        }
    }
}

/// The physics world containing all rigid bodies
pub struct PhysicsWorld {
    /// All rigid bodies in the world (using generational keys)
    bodies: SlotMap<BodyKey, RigidBody>,
    /// Static colliders (ground, walls)
    static_colliders: Vec<StaticCollider>,
    /// Unsimulated time carried over between `update` calls
    accumulator: f32,
    /// Physics configuration
    pub config: PhysicsConfig,
}

impl PhysicsWorld {
    /// Create a new physics world with default configuration
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create a new physics world with custom configuration
    pub fn with_config(config: PhysicsConfig) -> Self {
        Self {
            bodies: SlotMap::with_key(),
            static_colliders: Vec::new(),
            accumulator: 0.0,
            config,
        }
    }

    /// Add a static collider to the world
    pub fn add_static_collider(&mut self, collider: StaticCollider) {
        self.static_colliders.push(collider);
    }

    /// Get immutable access to static colliders
    pub fn static_colliders(&self) -> &[StaticCollider] {
        &self.static_colliders
    }

    /// Add a body to the world and return its key
    pub fn add_body(&mut self, body: RigidBody) -> BodyKey {
        self.bodies.insert(body)
    }

    /// Remove a body from the world and return it
    pub fn remove_body(&mut self, key: BodyKey) -> Option<RigidBody> {
        self.bodies.remove(key)
    }

    /// Get an immutable reference to a body by key
    pub fn get_body(&self, key: BodyKey) -> Option<&RigidBody> {
        self.bodies.get(key)
    }

    /// Get a mutable reference to a body by key
    pub fn get_body_mut(&mut self, key: BodyKey) -> Option<&mut RigidBody> {
        self.bodies.get_mut(key)
    }

    /// Get the number of bodies in the world
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Iterate over all body keys
    pub fn body_keys(&self) -> impl Iterator<Item = BodyKey> + '_ {
        self.bodies.keys()
    }

    /// Number of bodies currently being simulated
    pub fn awake_body_count(&self) -> usize {
        self.bodies.values().filter(|b| !b.is_static() && !b.is_sleeping()).count()
    }

    /// Put a body to sleep
    ///
    /// Returns false if the key is stale.
    pub fn sleep(&mut self, key: BodyKey) -> bool {
        match self.bodies.get_mut(key) {
            Some(body) => {
                if !body.is_sleeping() {
                    log::debug!("Body {:?} put to sleep", key);
                }
                body.sleep();
                true
            }
            None => false,
        }
    }

    /// Wake a sleeping body
    ///
    /// Returns false if the key is stale.
    pub fn wake_up(&mut self, key: BodyKey) -> bool {
        match self.bodies.get_mut(key) {
            Some(body) => {
                if body.is_sleeping() {
                    log::debug!("Body {:?} woken up", key);
                }
                body.wake_up();
                true
            }
            None => false,
        }
    }

    /// Whether a body is sleeping (`None` for a stale key)
    pub fn is_sleeping(&self, key: BodyKey) -> Option<bool> {
        self.bodies.get(key).map(|b| b.is_sleeping())
    }

    /// Teleport a body (e.g. after a gizmo drag), clearing its velocity
    pub fn set_body_transform(&mut self, key: BodyKey, position: Vec3, rotation: Quat, scale: f32) -> bool {
        match self.bodies.get_mut(key) {
            Some(body) => {
                body.set_transform(position, rotation, scale);
                true
            }
            None => false,
        }
    }

    /// Advance the simulation by `dt` seconds of wall time using fixed steps
    ///
    /// Returns the number of fixed steps taken.
    pub fn update(&mut self, dt: f32) -> u32 {
        let step = self.config.fixed_timestep;
        if step <= 0.0 {
            self.step(dt);
            return 1;
        }

        self.accumulator += dt;
        let mut steps = 0;
        while self.accumulator >= step {
            self.step(step);
            self.accumulator -= step;
            steps += 1;
        }
        steps
    }

    /// Step the physics simulation forward by dt seconds
    ///
    /// This performs:
    /// 1. Gravity application and velocity integration for awake dynamic bodies
    /// 2. Static collider collision detection and resolution
    /// 3. Body-body collision detection and resolution
    /// 4. Sleep bookkeeping for bodies that allow sleeping
    pub fn step(&mut self, dt: f32) {
        for (_key, body) in &mut self.bodies {
            if body.is_static() || body.is_sleeping() {
                continue;
            }

            if body.affected_by_gravity {
                body.velocity.y += self.config.gravity * dt;
            }

            let displacement = body.velocity * dt;
            body.apply_correction(displacement);
        }

        self.resolve_static_collisions();
        self.resolve_body_collisions();

        let (speed_limit, time_limit) = (self.config.sleep_speed_limit, self.config.sleep_time_limit);
        for (key, body) in &mut self.bodies {
            if body.update_sleep(dt, speed_limit, time_limit) {
                log::debug!("Body {:?} came to rest and fell asleep", key);
            }
        }
    }

    /// Resolve collisions between bodies and static colliders
    fn resolve_static_collisions(&mut self) {
        for (_key, body) in &mut self.bodies {
            if body.is_static() || body.is_sleeping() {
                continue;
            }

            for static_col in &self.static_colliders {
                let Some(contact) = aabb_vs_plane(body.collider(), &static_col.plane) else {
                    continue;
                };
                if !contact.is_colliding() {
                    continue;
                }

                body.apply_correction(contact.normal * contact.penetration);

                let combined = body.material.combine(&static_col.material);
                let velocity_along_normal = body.velocity.dot(contact.normal);
                if velocity_along_normal < 0.0 {
                    let normal_velocity = contact.normal * velocity_along_normal;
                    body.velocity = body.velocity - normal_velocity * (1.0 + combined.restitution);

                    let tangent_velocity = body.velocity - contact.normal * body.velocity.dot(contact.normal);
                    if tangent_velocity.length() > 0.0001 {
                        let friction_factor = 1.0 - combined.friction;
                        body.velocity = contact.normal * body.velocity.dot(contact.normal)
                            + tangent_velocity * friction_factor;
                    }
                }
            }
        }
    }

    /// Resolve collisions between bodies
    fn resolve_body_collisions(&mut self) {
        let keys: Vec<BodyKey> = self.bodies.keys().collect();

        for i in 0..keys.len() {
            for j in (i + 1)..keys.len() {
                let (key_a, key_b) = (keys[i], keys[j]);

                let (collider_a, collider_b, inert_a, inert_b) = {
                    let a = &self.bodies[key_a];
                    let b = &self.bodies[key_b];
                    (
                        *a.collider(),
                        *b.collider(),
                        a.is_static() || a.is_sleeping(),
                        b.is_static() || b.is_sleeping(),
                    )
                };

                // Nothing to do unless at least one side is being simulated
                if inert_a && inert_b {
                    continue;
                }

                // aabb_vs_aabb gives a normal from B toward A; flip it to A toward B
                let Some(mut contact) = aabb_vs_aabb(&collider_a, &collider_b) else {
                    continue;
                };
                contact.normal = -contact.normal;
                if !contact.is_colliding() {
                    continue;
                }

                let (wake_a, wake_b) = (
                    self.should_wake_on_contact(key_a, key_b),
                    self.should_wake_on_contact(key_b, key_a),
                );
                if wake_a {
                    log::debug!("Body {:?} woken by contact", key_a);
                    self.bodies[key_a].wake_up();
                }
                if wake_b {
                    log::debug!("Body {:?} woken by contact", key_b);
                    self.bodies[key_b].wake_up();
                }

                let immovable_a = self.bodies[key_a].is_static() || self.bodies[key_a].is_sleeping();
                let immovable_b = self.bodies[key_b].is_static() || self.bodies[key_b].is_sleeping();
                self.resolve_body_pair_collision(key_a, key_b, &contact, immovable_a, immovable_b);
            }
        }
    }

    /// A sleeping dynamic body is woken when an awake body hits it hard enough
    fn should_wake_on_contact(&self, sleeper: BodyKey, other: BodyKey) -> bool {
        let sleeper = &self.bodies[sleeper];
        let other = &self.bodies[other];
        sleeper.is_sleeping()
            && !sleeper.is_static()
            && !other.is_sleeping()
            && !other.is_static()
            && other.velocity.length() > self.config.sleep_speed_limit
    }

    /// Resolve collision between two specific bodies
    fn resolve_body_pair_collision(
        &mut self,
        key_a: BodyKey,
        key_b: BodyKey,
        contact: &Contact,
        immovable_a: bool,
        immovable_b: bool,
    ) {
        if immovable_a && immovable_b {
            return;
        }

        let (correction_a, correction_b) = if immovable_a {
            (Vec3::ZERO, contact.normal * contact.penetration)
        } else if immovable_b {
            (-contact.normal * contact.penetration, Vec3::ZERO)
        } else {
            // Split based on mass, evenly when neither body has any
            let mass_a = self.bodies[key_a].mass.max(0.0);
            let mass_b = self.bodies[key_b].mass.max(0.0);
            let total_mass = mass_a + mass_b;
            let share_a = if total_mass > 0.0 { mass_b / total_mass } else { 0.5 };

            (
                -contact.normal * contact.penetration * share_a,
                contact.normal * contact.penetration * (1.0 - share_a),
            )
        };

        if !immovable_a {
            self.bodies[key_a].apply_correction(correction_a);
        }
        if !immovable_b {
            self.bodies[key_b].apply_correction(correction_b);
        }

        let combined = self.bodies[key_a].material.combine(&self.bodies[key_b].material);

        if !immovable_a {
            Self::reflect_velocity(&mut self.bodies[key_a], -contact.normal, combined.restitution, combined.friction);
        }
        if !immovable_b {
            Self::reflect_velocity(&mut self.bodies[key_b], contact.normal, combined.restitution, combined.friction);
        }
    }

    /// Remove the velocity component heading into a contact, then apply friction
    ///
    /// `normal` points away from the other body.
    fn reflect_velocity(body: &mut RigidBody, normal: Vec3, restitution: f32, friction: f32) {
        let vel_along_normal = body.velocity.dot(normal);
        if vel_along_normal >= 0.0 {
            return;
        }

        body.velocity = body.velocity - normal * vel_along_normal * (1.0 + restitution);

        let tangent_velocity = body.velocity - normal * body.velocity.dot(normal);
        if tangent_velocity.length() > 0.0001 {
            body.velocity = normal * body.velocity.dot(normal) + tangent_velocity * (1.0 - friction);
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::BodyType;
    use crate::material::PhysicsMaterial;

    fn world_with_floor(gravity: f32, floor_y: f32) -> PhysicsWorld {
        let mut world = PhysicsWorld::with_config(PhysicsConfig::new(gravity));
        world.add_static_collider(StaticCollider::floor(floor_y, PhysicsMaterial::GROUND));
        world
    }

    fn unit_box(position: Vec3) -> RigidBody {
        RigidBody::new_cuboid(position, Vec3::splat(0.5))
    }

    #[test]
    fn test_physics_config_default() {
        let config = PhysicsConfig::default();
        assert_eq!(config.gravity, -9.81);
        assert!(config.fixed_timestep > 0.0);
    }

    #[test]
    fn test_stale_key_returns_none() {
        let mut world = PhysicsWorld::new();
        let key = world.add_body(unit_box(Vec3::ZERO));
        assert!(world.remove_body(key).is_some());

        assert!(world.get_body(key).is_none());
        assert!(!world.wake_up(key));
        assert!(!world.sleep(key));
        assert_eq!(world.is_sleeping(key), None);

        let new_key = world.add_body(unit_box(Vec3::ZERO));
        assert!(world.get_body(key).is_none());
        assert!(world.get_body(new_key).is_some());
    }

    #[test]
    fn test_gravity_application() {
        let mut world = PhysicsWorld::with_config(PhysicsConfig::new(-20.0));
        let key = world.add_body(unit_box(Vec3::new(0.0, 10.0, 0.0)));

        world.step(0.1);

        let body = world.get_body(key).unwrap();
        assert!((body.velocity.y - (-2.0)).abs() < 0.0001);
    }

    #[test]
    fn test_sleeping_body_does_not_fall() {
        let mut world = world_with_floor(-9.81, -20.0);
        let key = world.add_body(unit_box(Vec3::new(0.0, 30.0, 0.0)).asleep());

        for _ in 0..60 {
            world.step(1.0 / 60.0);
        }

        let body = world.get_body(key).unwrap();
        assert_eq!(body.position.y, 30.0);
        assert!(body.is_sleeping());
    }

    #[test]
    fn test_woken_body_falls_and_rests_on_ground() {
        let mut world = world_with_floor(-9.81, -20.0);
        let key = world.add_body(unit_box(Vec3::new(0.0, 0.0, 0.0)).asleep());

        assert!(world.wake_up(key));
        for _ in 0..600 {
            world.step(1.0 / 60.0);
        }

        let body = world.get_body(key).unwrap();
        // Bottom face sits on the ground plane
        assert!((body.collider().min.y - (-20.0)).abs() < 0.05);
    }

    #[test]
    fn test_waking_one_body_leaves_others_asleep() {
        let mut world = world_with_floor(-9.81, -20.0);
        let a = world.add_body(unit_box(Vec3::new(-10.0, 5.0, 0.0)).asleep());
        let b = world.add_body(unit_box(Vec3::new(10.0, 5.0, 0.0)).asleep());

        world.wake_up(a);

        assert_eq!(world.is_sleeping(a), Some(false));
        assert_eq!(world.is_sleeping(b), Some(true));
        assert_eq!(world.awake_body_count(), 1);
    }

    #[test]
    fn test_allow_sleep_body_sleeps_after_coming_to_rest() {
        let mut world = world_with_floor(-9.81, 0.0);
        let key = world.add_body(unit_box(Vec3::new(0.0, 0.5, 0.0)).with_allow_sleep(true));

        for _ in 0..180 {
            world.step(1.0 / 60.0);
        }

        assert_eq!(world.is_sleeping(key), Some(true));
    }

    #[test]
    fn test_body_without_allow_sleep_stays_awake() {
        let mut world = world_with_floor(-9.81, 0.0);
        let key = world.add_body(unit_box(Vec3::new(0.0, 0.5, 0.0)));

        for _ in 0..180 {
            world.step(1.0 / 60.0);
        }

        assert_eq!(world.is_sleeping(key), Some(false));
    }

    #[test]
    fn test_update_uses_fixed_steps() {
        let mut world = PhysicsWorld::with_config(PhysicsConfig {
            fixed_timestep: 0.01,
            ..PhysicsConfig::default()
        });
        world.add_body(unit_box(Vec3::ZERO));

        assert_eq!(world.update(0.035), 3);
        // 0.005 carried over, plus 0.006 is enough for one more step
        assert_eq!(world.update(0.006), 1);
    }

    #[test]
    fn test_static_body_does_not_move() {
        let mut world = PhysicsWorld::new();
        let key = world.add_body(unit_box(Vec3::ZERO).with_body_type(BodyType::Static));

        world.step(1.0);

        let body = world.get_body(key).unwrap();
        assert_eq!(body.position, Vec3::ZERO);
        assert_eq!(body.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_falling_body_lands_on_static_body() {
        let mut world = PhysicsWorld::with_config(PhysicsConfig::new(-9.81));
        let table = world.add_body(
            RigidBody::new_cuboid(Vec3::ZERO, Vec3::new(2.0, 0.5, 2.0))
                .with_body_type(BodyType::Static),
        );
        let notebook = world.add_body(unit_box(Vec3::new(0.0, 3.0, 0.0)));

        for _ in 0..300 {
            world.step(1.0 / 60.0);
        }

        let table_top = world.get_body(table).unwrap().collider().max.y;
        let notebook_bottom = world.get_body(notebook).unwrap().collider().min.y;
        assert!(notebook_bottom >= table_top - 0.05);
    }

    #[test]
    fn test_massless_bodies_split_overlap_evenly() {
        let mut world = PhysicsWorld::with_config(PhysicsConfig::new(0.0));
        let a = world.add_body(unit_box(Vec3::new(-0.25, 0.0, 0.0)).with_mass(0.0));
        let b = world.add_body(unit_box(Vec3::new(0.25, 0.0, 0.0)).with_mass(0.0));

        world.step(1.0 / 60.0);

        let a = world.get_body(a).unwrap().position;
        let b = world.get_body(b).unwrap().position;
        assert!(a.x.is_finite() && b.x.is_finite());
        assert!((a.x + b.x).abs() < 1e-5);
        assert!(b.x - a.x >= 1.0 - 1e-4);
    }

    #[test]
    fn test_set_body_transform() {
        let mut world = PhysicsWorld::new();
        let key = world.add_body(unit_box(Vec3::ZERO).with_velocity(Vec3::X));

        assert!(world.set_body_transform(key, Vec3::new(1.0, 2.0, 3.0), Quat::IDENTITY, 1.0));

        let body = world.get_body(key).unwrap();
        assert_eq!(body.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(body.velocity, Vec3::ZERO);
    }
}
