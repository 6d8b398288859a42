//! Collision shapes
//!
//! Bodies collide as axis-aligned boxes (see [`stagehand_math::Aabb`]); the
//! only extra primitive is the infinite plane used for the ground.

use stagehand_math::Vec3;

/// An infinite plane defined by normal and distance from origin
///
/// The plane equation is: normal · point = distance
/// Points with normal · point > distance are "above" the plane (positive side)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    /// Unit normal vector pointing to the positive side
    pub normal: Vec3,
    /// Signed distance from origin along the normal
    pub distance: f32,
}

impl Plane {
    /// Create a new plane from a normal and distance
    ///
    /// The normal will be normalized automatically.
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self {
            normal: normal.normalized(),
            distance,
        }
    }

    /// Create a plane from a point on the plane and a normal
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let n = normal.normalized();
        Self {
            normal: n,
            distance: n.dot(point),
        }
    }

    /// Create a horizontal ground plane at the given Y height
    pub fn floor(y: f32) -> Self {
        Self::from_point_normal(Vec3::new(0.0, y, 0.0), Vec3::Y)
    }

    /// Calculate the signed distance from a point to the plane
    ///
    /// Positive = above plane (on normal side)
    /// Negative = below plane (opposite side)
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) - self.distance
    }

    /// Check if a point is on the positive side of the plane
    pub fn is_above(&self, point: Vec3) -> bool {
        self.signed_distance(point) > 0.0
    }
}
