//! Orbit camera
//!
//! The camera circles a target point. Its position is stored in spherical
//! coordinates (distance, polar angle from +Y, azimuth around Y) so orbit
//! limits are simple clamps.

use std::f32::consts::PI;
use stagehand_math::{Ray, Vec3};

/// Smallest polar angle the camera may reach; keeps the view basis defined
const POLAR_EPSILON: f32 = 1e-3;

/// Limits on how far the camera may orbit and zoom
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitLimits {
    pub min_polar: f32,
    pub max_polar: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitLimits {
    fn default() -> Self {
        Self {
            min_polar: 0.0,
            max_polar: PI / 1.75,
            min_distance: 5.0,
            max_distance: 400.0,
        }
    }
}

/// A perspective camera orbiting a target
#[derive(Clone, Debug)]
pub struct OrbitCamera {
    pub target: Vec3,
    distance: f32,
    polar: f32,
    azimuth: f32,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    limits: OrbitLimits,
    home: (Vec3, f32, f32, f32),
}

impl OrbitCamera {
    /// Place the camera at `position` looking at `target`
    ///
    /// The starting position is clamped into `limits` and remembered for
    /// [`OrbitCamera::reset`].
    pub fn new(position: Vec3, target: Vec3, fov_degrees: f32, limits: OrbitLimits) -> Self {
        let offset = position - target;
        let distance = offset.length().max(f32::EPSILON);
        let polar = (offset.y / distance).clamp(-1.0, 1.0).acos();
        let azimuth = offset.x.atan2(offset.z);

        let mut camera = Self {
            target,
            distance,
            polar,
            azimuth,
            fov_degrees,
            near: 0.1,
            far: 1000.0,
            limits,
            home: (target, distance, polar, azimuth),
        };
        camera.clamp();
        camera.home = (camera.target, camera.distance, camera.polar, camera.azimuth);
        camera
    }

    pub fn with_clip_planes(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    pub fn position(&self) -> Vec3 {
        let (sin_p, cos_p) = self.polar.sin_cos();
        let (sin_a, cos_a) = self.azimuth.sin_cos();
        self.target + Vec3::new(sin_p * sin_a, cos_p, sin_p * cos_a) * self.distance
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Polar angle from +Y in radians
    pub fn polar(&self) -> f32 {
        self.polar
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    pub fn limits(&self) -> &OrbitLimits {
        &self.limits
    }

    /// Unit vector from the camera toward the target
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position()).normalized()
    }

    /// Screen-right direction in world space
    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalized()
    }

    /// Screen-up direction in world space
    pub fn up(&self) -> Vec3 {
        self.right().cross(self.forward())
    }

    /// Rotate around the target by the given angle deltas (radians)
    pub fn orbit(&mut self, delta_azimuth: f32, delta_polar: f32) {
        self.azimuth = (self.azimuth + delta_azimuth).rem_euclid(2.0 * PI);
        self.polar += delta_polar;
        self.clamp();
    }

    /// Scale the distance to the target (`factor < 1` moves closer)
    pub fn zoom(&mut self, factor: f32) {
        if factor > 0.0 {
            self.distance *= factor;
            self.clamp();
        }
    }

    /// Return to the starting position
    pub fn reset(&mut self) {
        let (target, distance, polar, azimuth) = self.home;
        self.target = target;
        self.distance = distance;
        self.polar = polar;
        self.azimuth = azimuth;
    }

    /// World-space length of one pixel at the target's depth
    pub fn units_per_pixel(&self, viewport_height: f32) -> f32 {
        let half_fov = self.fov_degrees.to_radians() * 0.5;
        2.0 * self.distance * half_fov.tan() / viewport_height.max(1.0)
    }

    /// Ray through a pixel, with `(0, 0)` at the top-left of the viewport
    pub fn screen_ray(&self, x: f32, y: f32, width: f32, height: f32) -> Ray {
        let width = width.max(1.0);
        let height = height.max(1.0);
        let ndc_x = 2.0 * x / width - 1.0;
        let ndc_y = 1.0 - 2.0 * y / height;
        let tan_half = (self.fov_degrees.to_radians() * 0.5).tan();
        let aspect = width / height;

        let direction = self.forward()
            + self.right() * (ndc_x * tan_half * aspect)
            + self.up() * (ndc_y * tan_half);
        Ray::new(self.position(), direction)
    }

    fn clamp(&mut self) {
        let min_polar = self.limits.min_polar.max(POLAR_EPSILON);
        let max_polar = self.limits.max_polar.min(PI - POLAR_EPSILON).max(min_polar);
        self.polar = self.polar.clamp(min_polar, max_polar);
        self.distance = self
            .distance
            .clamp(self.limits.min_distance, self.limits.max_distance.max(self.limits.min_distance));
    }
}
