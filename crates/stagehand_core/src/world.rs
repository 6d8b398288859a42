//! World - the container for scene entities and their physics
//!
//! Entities are stored behind generational [`EntityKey`]s and can also be
//! looked up by name, which is how selection refers to them.

use std::collections::HashMap;
use slotmap::{new_key_type, SlotMap};
use stagehand_physics::{PhysicsConfig, PhysicsWorld};
use crate::{DirtyFlags, Entity, Transform};

new_key_type! {
    /// Key to an entity in the world
    pub struct EntityKey;
}

/// The scene world
pub struct World {
    entities: SlotMap<EntityKey, Entity>,
    name_index: HashMap<String, EntityKey>,
    physics: Option<PhysicsWorld>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Create an empty world without physics
    pub fn new() -> Self {
        Self {
            entities: SlotMap::with_key(),
            name_index: HashMap::new(),
            physics: None,
        }
    }

    /// Enable physics with the given configuration
    pub fn with_physics(mut self, config: PhysicsConfig) -> Self {
        self.physics = Some(PhysicsWorld::with_config(config));
        self
    }

    pub fn physics(&self) -> Option<&PhysicsWorld> {
        self.physics.as_ref()
    }

    pub fn physics_mut(&mut self) -> Option<&mut PhysicsWorld> {
        self.physics.as_mut()
    }

    /// Add an entity and return its key
    ///
    /// A later entity with the same name shadows the earlier one in
    /// [`World::get_by_name`].
    pub fn add_entity(&mut self, entity: Entity) -> EntityKey {
        let name = entity.name.clone();
        let key = self.entities.insert(entity);
        if let Some(name) = name {
            if self.name_index.insert(name.clone(), key).is_some() {
                log::warn!("Entity name '{}' is already in use; lookups now return the newer entity", name);
            }
        }
        key
    }

    /// Remove an entity, along with its physics body
    pub fn remove_entity(&mut self, key: EntityKey) -> Option<Entity> {
        let entity = self.entities.remove(key)?;
        if let Some(name) = &entity.name {
            if self.name_index.get(name) == Some(&key) {
                self.name_index.remove(name);
            }
        }
        if let (Some(body), Some(physics)) = (entity.physics_body, self.physics.as_mut()) {
            physics.remove_body(body);
        }
        Some(entity)
    }

    pub fn get_entity(&self, key: EntityKey) -> Option<&Entity> {
        self.entities.get(key)
    }

    pub fn get_entity_mut(&mut self, key: EntityKey) -> Option<&mut Entity> {
        self.entities.get_mut(key)
    }

    /// Look up an entity by name
    pub fn get_by_name(&self, name: &str) -> Option<(EntityKey, &Entity)> {
        let key = *self.name_index.get(name)?;
        self.entities.get(key).map(|e| (key, e))
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityKey, &Entity)> {
        self.entities.iter()
    }

    /// Iterate over entities carrying the given tag
    pub fn tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = (EntityKey, &'a Entity)> + 'a {
        self.entities.iter().filter(move |(_, e)| e.has_tag(tag))
    }

    /// Set an entity's transform, teleporting its physics body to match
    pub fn set_transform(&mut self, key: EntityKey, transform: Transform) -> bool {
        let Some(entity) = self.entities.get_mut(key) else {
            return false;
        };
        entity.set_transform(transform);
        if let (Some(body), Some(physics)) = (entity.physics_body, self.physics.as_mut()) {
            physics.set_body_transform(body, transform.position, transform.rotation, transform.scale);
        }
        true
    }

    /// Step physics and copy moving bodies back onto their entities
    pub fn update(&mut self, dt: f32) {
        let Some(physics) = self.physics.as_mut() else {
            return;
        };
        if physics.update(dt) == 0 {
            return;
        }

        for entity in self.entities.values_mut() {
            let Some(body) = entity.physics_body.and_then(|k| physics.get_body(k)) else {
                continue;
            };
            if body.is_static() || body.is_sleeping() {
                continue;
            }
            if entity.transform.position != body.position || entity.transform.rotation != body.rotation {
                entity.transform.position = body.position;
                entity.transform.rotation = body.rotation;
                entity.mark_dirty(DirtyFlags::TRANSFORM);
            }
        }
    }

    pub fn has_dirty_entities(&self) -> bool {
        self.entities.values().any(|e| e.is_dirty())
    }

    pub fn clear_all_dirty(&mut self) {
        for entity in self.entities.values_mut() {
            entity.clear_dirty();
        }
    }
}
