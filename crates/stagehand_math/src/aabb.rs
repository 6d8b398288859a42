//! Axis-aligned bounding boxes

use serde::{Serialize, Deserialize};
use crate::{Quat, Vec3};

/// A 3D axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a position with given half-extents
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the half-extents (half the size in each dimension)
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Get the full size in each dimension
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Check if a point is inside or on the AABB
    pub fn contains(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Translate the AABB by a delta
    pub fn translated(&self, delta: Vec3) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// World-space bounds of this local box after scale, rotation, then translation
    ///
    /// The result encloses all eight transformed corners, so it grows under
    /// rotation rather than rotating with the object.
    pub fn transformed(&self, position: Vec3, rotation: Quat, scale: f32) -> Self {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            let world = rotation.rotate(corner * scale) + position;
            min = min.min_components(world);
            max = max.max_components(world);
        }
        Self { min, max }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_center_and_extents() {
        let aabb = Aabb::new(Vec3::new(-1.0, 0.0, 2.0), Vec3::new(3.0, 4.0, 4.0));
        assert_eq!(aabb.center(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(aabb.half_extents(), Vec3::new(2.0, 2.0, 1.0));
        assert_eq!(aabb.size(), Vec3::new(4.0, 4.0, 2.0));
    }

    #[test]
    fn test_contains() {
        let aabb = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::ONE);
        assert!(aabb.contains(Vec3::new(1.0, -1.0, 0.5)));
        assert!(!aabb.contains(Vec3::new(1.1, 0.0, 0.0)));
    }

    #[test]
    fn test_transformed_scales_and_translates() {
        let local = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::new(2.0, 1.0, 1.0));
        let world = local.transformed(Vec3::new(0.0, 10.0, 0.0), Quat::IDENTITY, 0.5);
        assert_eq!(world.min, Vec3::new(-1.0, 9.5, -0.5));
        assert_eq!(world.max, Vec3::new(1.0, 10.5, 0.5));
    }

    #[test]
    fn test_transformed_rotation_swaps_extents() {
        let local = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::new(2.0, 1.0, 1.0));
        let world = local.transformed(Vec3::ZERO, Quat::from_axis_angle(Vec3::Z, FRAC_PI_2), 1.0);
        let half = world.half_extents();
        assert!((half.x - 1.0).abs() < 1e-5);
        assert!((half.y - 2.0).abs() < 1e-5);
    }
}
