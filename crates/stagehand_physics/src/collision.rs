//! Collision detection between boxes and planes

use crate::shapes::Plane;
use stagehand_math::{Aabb, Vec3};

/// Contact information from a collision
#[derive(Clone, Copy, Debug)]
pub struct Contact {
    /// Point of contact (on the surface of the first shape)
    pub point: Vec3,
    /// Normal pointing from the second shape toward the first
    pub normal: Vec3,
    /// Penetration depth (positive means overlapping)
    pub penetration: f32,
}

impl Contact {
    /// Create a new contact
    pub fn new(point: Vec3, normal: Vec3, penetration: f32) -> Self {
        Self {
            point,
            normal,
            penetration,
        }
    }

    /// Check if this represents an actual collision (positive penetration)
    pub fn is_colliding(&self) -> bool {
        self.penetration > 0.0
    }
}

/// Test AABB vs plane collision
///
/// Returns a contact if any part of the AABB is below the plane. The normal is
/// the plane normal (pointing from the plane toward the box).
pub fn aabb_vs_plane(aabb: &Aabb, plane: &Plane) -> Option<Contact> {
    // The corner deepest along -normal
    let closest_vertex = aabb.center() - aabb.half_extents().component_mul(plane.normal.sign());
    let signed_dist = plane.signed_distance(closest_vertex);

    if signed_dist < 0.0 {
        Some(Contact::new(closest_vertex, plane.normal, -signed_dist))
    } else {
        None
    }
}

/// Test AABB vs AABB collision
///
/// Returns a contact along the axis of least overlap. The normal points from
/// `b` toward `a`.
pub fn aabb_vs_aabb(a: &Aabb, b: &Aabb) -> Option<Contact> {
    if a.max.x < b.min.x || a.min.x > b.max.x {
        return None;
    }
    if a.max.y < b.min.y || a.min.y > b.max.y {
        return None;
    }
    if a.max.z < b.min.z || a.min.z > b.max.z {
        return None;
    }

    let overlap_x = (a.max.x.min(b.max.x) - a.min.x.max(b.min.x)).max(0.0);
    let overlap_y = (a.max.y.min(b.max.y) - a.min.y.max(b.min.y)).max(0.0);
    let overlap_z = (a.max.z.min(b.max.z) - a.min.z.max(b.min.z)).max(0.0);

    let (ca, cb) = (a.center(), b.center());

    let mut min_overlap = overlap_x;
    let mut normal = if ca.x < cb.x { -Vec3::X } else { Vec3::X };

    if overlap_y < min_overlap {
        min_overlap = overlap_y;
        normal = if ca.y < cb.y { -Vec3::Y } else { Vec3::Y };
    }
    if overlap_z < min_overlap {
        min_overlap = overlap_z;
        normal = if ca.z < cb.z { -Vec3::Z } else { Vec3::Z };
    }

    let point = (a.min.max_components(b.min) + a.max.min_components(b.max)) * 0.5;
    Some(Contact::new(point, normal, min_overlap))
}
