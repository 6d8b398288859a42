//! Rays for pointer picking

use crate::{Aabb, Vec3};

/// A half-line starting at `origin` heading along unit `direction`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray; the direction is normalized
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalized(),
        }
    }

    /// Point at distance `t` along the ray
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Slab test against an AABB
    ///
    /// Returns the distance to the entry point, or `Some(0.0)` when the origin
    /// is already inside the box. Boxes entirely behind the origin are misses.
    pub fn intersect_aabb(&self, aabb: &Aabb) -> Option<f32> {
        let mut t_min = 0.0f32;
        let mut t_max = f32::INFINITY;

        let origin = self.origin.to_array();
        let dir = self.direction.to_array();
        let min = aabb.min.to_array();
        let max = aabb.max.to_array();

        for axis in 0..3 {
            if dir[axis].abs() < 1e-8 {
                // Parallel to this slab: must already be between the planes
                if origin[axis] < min[axis] || origin[axis] > max[axis] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / dir[axis];
            let mut t0 = (min[axis] - origin[axis]) * inv;
            let mut t1 = (max[axis] - origin[axis]) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_max < t_min {
                return None;
            }
        }

        Some(t_min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box_at(center: Vec3) -> Aabb {
        Aabb::from_center_half_extents(center, Vec3::ONE)
    }

    #[test]
    fn test_hit_in_front() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), -Vec3::Z);
        let t = ray.intersect_aabb(&unit_box_at(Vec3::ZERO)).unwrap();
        assert!((t - 9.0).abs() < 1e-5);
        assert!((ray.at(t).z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_miss_to_the_side() {
        let ray = Ray::new(Vec3::new(5.0, 0.0, 10.0), -Vec3::Z);
        assert!(ray.intersect_aabb(&unit_box_at(Vec3::ZERO)).is_none());
    }

    #[test]
    fn test_box_behind_origin_is_miss() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::Z);
        assert!(ray.intersect_aabb(&unit_box_at(Vec3::ZERO)).is_none());
    }

    #[test]
    fn test_origin_inside_box() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert_eq!(ray.intersect_aabb(&unit_box_at(Vec3::ZERO)), Some(0.0));
    }

    #[test]
    fn test_direction_is_normalized() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -5.0));
        assert_eq!(ray.direction, -Vec3::Z);
    }
}
