//! Surface properties used during contact resolution

use serde::{Serialize, Deserialize};

/// Friction and bounciness of a body or static collider
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhysicsMaterial {
    /// Friction coefficient (0.0 = frictionless, 1.0 = grippy)
    pub friction: f32,
    /// Restitution/bounciness (0.0 = no bounce, 1.0 = perfect bounce)
    pub restitution: f32,
}

impl Default for PhysicsMaterial {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl PhysicsMaterial {
    /// General-purpose contact material: some friction, no bounce
    pub const STANDARD: Self = Self {
        friction: 0.3,
        restitution: 0.0,
    };

    /// Wooden furniture
    pub const WOOD: Self = Self {
        friction: 0.5,
        restitution: 0.2,
    };

    /// Paper and card (notebooks, boxes)
    pub const PAPER: Self = Self {
        friction: 0.6,
        restitution: 0.05,
    };

    /// Ground surface: high friction, no bounce
    pub const GROUND: Self = Self {
        friction: 0.8,
        restitution: 0.0,
    };

    /// Create a new material; values are clamped to `[0.0, 1.0]`
    pub fn new(friction: f32, restitution: f32) -> Self {
        Self {
            friction: friction.clamp(0.0, 1.0),
            restitution: restitution.clamp(0.0, 1.0),
        }
    }

    /// Combine two materials for one contact
    ///
    /// Geometric mean for friction, maximum for restitution.
    pub fn combine(&self, other: &Self) -> Self {
        Self {
            friction: (self.friction * other.friction).sqrt(),
            restitution: self.restitution.max(other.restitution),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_standard() {
        assert_eq!(PhysicsMaterial::default(), PhysicsMaterial::STANDARD);
    }

    #[test]
    fn test_new_clamps_values() {
        let material = PhysicsMaterial::new(1.5, -0.5);
        assert_eq!(material.friction, 1.0);
        assert_eq!(material.restitution, 0.0);
    }

    #[test]
    fn test_combine() {
        let combined = PhysicsMaterial::WOOD.combine(&PhysicsMaterial::GROUND);
        let expected_friction = (0.5_f32 * 0.8_f32).sqrt();
        assert!((combined.friction - expected_friction).abs() < 0.0001);
        assert_eq!(combined.restitution, 0.2);
    }

    #[test]
    fn test_material_from_ron() {
        let material: PhysicsMaterial = ron::from_str("(friction: 0.4, restitution: 0.1)").unwrap();
        assert_eq!(material, PhysicsMaterial::new(0.4, 0.1));
    }
}
