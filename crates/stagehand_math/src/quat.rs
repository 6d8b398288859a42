//! Unit quaternion rotations
//!
//! Euler angles follow the XYZ intrinsic order used by the scene files, so a
//! rotation of `[PI / 2, 0, 0]` tips an object forward around the X axis.

use serde::{Serialize, Deserialize};
use crate::Vec3;

/// Unit quaternion `w + xi + yj + zk`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    /// Identity rotation
    pub const IDENTITY: Self = Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    /// Rotation of `angle` radians around `axis`
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let axis = axis.normalized();
        let (s, c) = (angle * 0.5).sin_cos();
        Self {
            x: axis.x * s,
            y: axis.y * s,
            z: axis.z * s,
            w: c,
        }
    }

    /// Rotation from XYZ Euler angles in radians
    pub fn from_euler(x: f32, y: f32, z: f32) -> Self {
        let qx = Self::from_axis_angle(Vec3::X, x);
        let qy = Self::from_axis_angle(Vec3::Y, y);
        let qz = Self::from_axis_angle(Vec3::Z, z);
        qx.compose(&qy).compose(&qz)
    }

    /// Rotation from an `[x, y, z]` Euler array
    pub fn from_euler_array(a: [f32; 3]) -> Self {
        Self::from_euler(a[0], a[1], a[2])
    }

    /// Compose rotations: the result applies `other` first, then `self`
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            w: self.w * other.w - self.x * other.x - self.y * other.y - self.z * other.z,
            x: self.w * other.x + self.x * other.w + self.y * other.z - self.z * other.y,
            y: self.w * other.y - self.x * other.z + self.y * other.w + self.z * other.x,
            z: self.w * other.z + self.x * other.y - self.y * other.x + self.z * other.w,
        }
    }

    /// Inverse of a unit quaternion
    pub fn conjugate(&self) -> Self {
        Self { x: -self.x, y: -self.y, z: -self.z, w: self.w }
    }

    /// Renormalize to unit length (guards against drift after many compositions)
    pub fn normalize(&self) -> Self {
        let len = (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt();
        if len > 0.0 {
            Self { x: self.x / len, y: self.y / len, z: self.z / len, w: self.w / len }
        } else {
            Self::IDENTITY
        }
    }

    /// Rotate a vector
    pub fn rotate(&self, v: Vec3) -> Vec3 {
        let u = Vec3::new(self.x, self.y, self.z);
        let t = u.cross(v) * 2.0;
        v + t * self.w + u.cross(t)
    }
}
