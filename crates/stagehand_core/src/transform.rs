//! Object transforms (position, rotation, uniform scale)

use stagehand_math::{Quat, Vec3};
use serde::{Serialize, Deserialize};

/// Position, rotation and uniform scale of an object in the scene
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// World position
    pub position: Vec3,
    /// World rotation
    pub rotation: Quat,
    /// Uniform scale factor
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Identity transform (origin, no rotation, scale 1)
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: 1.0,
        }
    }

    /// Create a transform with just a position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// Create a transform from position, XYZ Euler rotation and scale arrays,
    /// the form scene files use
    pub fn from_parts(position: [f32; 3], euler: [f32; 3], scale: f32) -> Self {
        Self {
            position: Vec3::from_array(position),
            rotation: Quat::from_euler_array(euler),
            scale,
        }
    }

    /// Transform a point from local space to world space
    ///
    /// Applies scale, then rotation, then translation.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.rotation.rotate(p * self.scale) + self.position
    }

    /// Translate the transform by an offset
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }

    /// Rotate the transform by a rotation applied in world space
    pub fn rotate(&mut self, rotation: Quat) {
        self.rotation = rotation.compose(&self.rotation).normalize();
    }

    /// Multiply the scale, never going below `min_scale`
    pub fn scale_by(&mut self, factor: f32, min_scale: f32) {
        self.scale = (self.scale * factor).max(min_scale);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_transform_point_order() {
        let t = Transform {
            position: Vec3::new(0.0, 10.0, 0.0),
            rotation: Quat::from_axis_angle(Vec3::Y, FRAC_PI_2),
            scale: 2.0,
        };
        let p = t.transform_point(Vec3::X);
        // scale to (2,0,0), rotate to (0,0,-2), then translate
        assert!((p - Vec3::new(0.0, 10.0, -2.0)).length() < 1e-5);
    }

    #[test]
    fn test_from_parts() {
        let t = Transform::from_parts([0.0, 30.0, 0.0], [0.0, 0.0, 0.0], 0.5);
        assert_eq!(t.position, Vec3::new(0.0, 30.0, 0.0));
        assert_eq!(t.rotation, Quat::from_euler(0.0, 0.0, 0.0));
        assert_eq!(t.scale, 0.5);
    }

    #[test]
    fn test_scale_by_respects_minimum() {
        let mut t = Transform::identity();
        t.scale_by(0.5, 0.1);
        assert_eq!(t.scale, 0.5);
        t.scale_by(0.01, 0.1);
        assert_eq!(t.scale, 0.1);
    }

    #[test]
    fn test_rotate_accumulates() {
        let mut t = Transform::identity();
        t.rotate(Quat::from_axis_angle(Vec3::Y, FRAC_PI_2));
        t.rotate(Quat::from_axis_angle(Vec3::Y, FRAC_PI_2));
        let p = t.transform_point(Vec3::X);
        assert!((p - (-Vec3::X)).length() < 1e-5);
    }
}
