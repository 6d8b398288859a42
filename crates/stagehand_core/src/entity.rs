//! Entity and Material types
//!
//! An Entity is one object in the scene: a named box of model geometry with a
//! transform, a material, and optionally a physics body.

use std::collections::HashSet;
use bitflags::bitflags;
use stagehand_math::Aabb;
use stagehand_physics::BodyKey;
use serde::{Serialize, Deserialize};
use crate::Transform;

bitflags! {
    /// Flags marking which parts of an entity changed since the last present
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct DirtyFlags: u8 {
        const NONE = 0;
        /// Position, rotation or scale changed
        const TRANSFORM = 1 << 0;
        /// Material (display colour) changed
        const MATERIAL = 1 << 1;
        const ALL = Self::TRANSFORM.bits() | Self::MATERIAL.bits();
    }
}

/// A flat-colour material
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Base color as RGBA (each component 0.0-1.0)
    pub base_color: [f32; 4],
}

impl Default for Material {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Material {
    pub const WHITE: Self = Self { base_color: [1.0, 1.0, 1.0, 1.0] };
    pub const BLACK: Self = Self { base_color: [0.0, 0.0, 0.0, 1.0] };

    /// Create a new material with the given RGBA color
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            base_color: [r, g, b, a],
        }
    }

    /// Create a new opaque material with the given RGB color
    pub fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Parse a `#rrggbb` or `#rgb` colour string
    ///
    /// Returns `None` for anything else.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().strip_prefix('#')?;
        if !digits.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f32 / 255.0);

        match digits.len() {
            6 => Some(Self::from_rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            3 => {
                let mut rgb = [0.0; 3];
                for (i, c) in digits.chars().enumerate() {
                    let doubled: String = [c, c].iter().collect();
                    rgb[i] = channel(&doubled)?;
                }
                Some(Self::from_rgb(rgb[0], rgb[1], rgb[2]))
            }
            _ => None,
        }
    }
}

/// An object in the scene
pub struct Entity {
    /// Optional name for this entity (for lookup)
    pub name: Option<String>,
    /// Tags for categorization (e.g., "interactive", "ground")
    pub tags: HashSet<String>,
    /// The entity's transform in world space
    pub transform: Transform,
    /// Geometry bounds in entity-local space
    pub local_bounds: Aabb,
    /// The entity's material
    pub material: Material,
    /// Optional physics body key (links to PhysicsWorld)
    pub physics_body: Option<BodyKey>,
    dirty: DirtyFlags,
}

impl Entity {
    /// Create a new entity from local geometry bounds
    pub fn new(local_bounds: Aabb) -> Self {
        Self {
            name: None,
            tags: HashSet::new(),
            transform: Transform::identity(),
            local_bounds,
            material: Material::default(),
            physics_body: None,
            dirty: DirtyFlags::ALL,
        }
    }

    /// Set the name of this entity (for lookup)
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add a tag to this entity
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Attach a physics body to this entity
    pub fn with_physics_body(mut self, key: BodyKey) -> Self {
        self.physics_body = Some(key);
        self
    }

    /// Check if this entity has a specific tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// World-space bounding box of the entity's geometry
    pub fn world_bounds(&self) -> Aabb {
        self.local_bounds.transformed(
            self.transform.position,
            self.transform.rotation,
            self.transform.scale,
        )
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    #[inline]
    pub fn dirty_flags(&self) -> DirtyFlags {
        self.dirty
    }

    #[inline]
    pub fn mark_dirty(&mut self, flags: DirtyFlags) {
        self.dirty |= flags;
    }

    #[inline]
    pub fn clear_dirty(&mut self) {
        self.dirty = DirtyFlags::NONE;
    }

    /// Set the transform and mark it as dirty
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
        self.mark_dirty(DirtyFlags::TRANSFORM);
    }

    /// Set the material, marking it dirty only when the colour actually changes
    pub fn set_material(&mut self, material: Material) {
        if self.material != material {
            self.material = material;
            self.mark_dirty(DirtyFlags::MATERIAL);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagehand_math::Vec3;

    fn unit_box() -> Aabb {
        Aabb::from_center_half_extents(Vec3::ZERO, Vec3::ONE)
    }

    #[test]
    fn test_from_hex_long_form() {
        let m = Material::from_hex("#ff0080").unwrap();
        assert_eq!(m.base_color[0], 1.0);
        assert_eq!(m.base_color[1], 0.0);
        assert!((m.base_color[2] - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(m.base_color[3], 1.0);
    }

    #[test]
    fn test_from_hex_short_form() {
        assert_eq!(Material::from_hex("#fff"), Some(Material::WHITE));
        assert_eq!(Material::from_hex("#000"), Some(Material::BLACK));
    }

    #[test]
    fn test_from_hex_rejects_garbage() {
        assert_eq!(Material::from_hex("ff0080"), None);
        assert_eq!(Material::from_hex("#ff00"), None);
        assert_eq!(Material::from_hex("#gg0000"), None);
        assert_eq!(Material::from_hex("#ééé"), None);
    }

    #[test]
    fn test_new_entity_is_dirty() {
        let entity = Entity::new(unit_box());
        assert!(entity.is_dirty());
        assert_eq!(entity.dirty_flags(), DirtyFlags::ALL);
    }

    #[test]
    fn test_set_material_only_dirties_on_change() {
        let mut entity = Entity::new(unit_box()).with_material(Material::WHITE);
        entity.clear_dirty();

        entity.set_material(Material::WHITE);
        assert!(!entity.is_dirty());

        entity.set_material(Material::BLACK);
        assert_eq!(entity.dirty_flags(), DirtyFlags::MATERIAL);
    }

    #[test]
    fn test_world_bounds_follow_transform() {
        let entity = Entity::new(unit_box())
            .with_transform(Transform::from_parts([0.0, 5.0, 0.0], [0.0; 3], 2.0));
        let bounds = entity.world_bounds();
        assert_eq!(bounds.center(), Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(bounds.half_extents(), Vec3::splat(2.0));
    }

    #[test]
    fn test_tags() {
        let entity = Entity::new(unit_box()).with_name("Table").with_tag("interactive");
        assert_eq!(entity.name.as_deref(), Some("Table"));
        assert!(entity.has_tag("interactive"));
        assert!(!entity.has_tag("ground"));
    }
}
