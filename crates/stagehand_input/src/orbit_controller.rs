//! Orbit controls
//!
//! Controls:
//! - Left drag on empty space: orbit around the target
//! - Mouse wheel: zoom in/out
//! - R: reset to the starting view (handled by the app, see [`OrbitController::request_reset`])
//!
//! The controller accumulates input between frames and applies it to any
//! [`CameraControl`] in [`OrbitController::update`]. It can be disabled while
//! a gizmo drag is in progress so the two never fight over the same drag.

use stagehand_core::OrbitCamera;
use stagehand_math::Vec3;

/// Camera operations the orbit controller needs
pub trait CameraControl {
    fn orbit(&mut self, delta_azimuth: f32, delta_polar: f32);
    fn zoom(&mut self, factor: f32);
    fn reset(&mut self);
    fn position(&self) -> Vec3;
}

impl CameraControl for OrbitCamera {
    fn orbit(&mut self, delta_azimuth: f32, delta_polar: f32) {
        OrbitCamera::orbit(self, delta_azimuth, delta_polar);
    }

    fn zoom(&mut self, factor: f32) {
        OrbitCamera::zoom(self, factor);
    }

    fn reset(&mut self) {
        OrbitCamera::reset(self);
    }

    fn position(&self) -> Vec3 {
        OrbitCamera::position(self)
    }
}

/// Orbit camera controller
pub struct OrbitController {
    enabled: bool,
    dragging: bool,
    pending_dx: f32,
    pending_dy: f32,
    pending_scroll: f32,
    reset_requested: bool,

    smooth_dx: f32,
    smooth_dy: f32,

    /// Radians of orbit per pixel dragged
    pub rotate_sensitivity: f32,
    /// Fractional distance change per scroll line
    pub zoom_speed: f32,
    /// Exponential smoothing half-life in seconds
    pub damping_half_life: f32,
    pub damping_enabled: bool,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::new()
    }
}

impl OrbitController {
    pub fn new() -> Self {
        Self {
            enabled: true,
            dragging: false,
            pending_dx: 0.0,
            pending_dy: 0.0,
            pending_scroll: 0.0,
            reset_requested: false,

            smooth_dx: 0.0,
            smooth_dy: 0.0,

            rotate_sensitivity: 0.005,
            zoom_speed: 0.1,
            damping_half_life: 0.05,
            damping_enabled: false,
        }
    }

    /// Builder: set orbit sensitivity
    pub fn with_rotate_sensitivity(mut self, sensitivity: f32) -> Self {
        self.rotate_sensitivity = sensitivity;
        self
    }

    /// Builder: set zoom speed
    pub fn with_zoom_speed(mut self, speed: f32) -> Self {
        self.zoom_speed = speed;
        self
    }

    /// Builder: enable or disable damping
    pub fn with_damping(mut self, enabled: bool) -> Self {
        self.damping_enabled = enabled;
        self
    }

    /// Builder: set the damping half-life in seconds
    pub fn with_damping_half_life(mut self, half_life: f32) -> Self {
        self.damping_half_life = half_life.max(f32::EPSILON);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the controls; disabling drops any pending input
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            log::trace!("Orbit controls {}", if enabled { "enabled" } else { "disabled" });
        }
        self.enabled = enabled;
        if !enabled {
            self.dragging = false;
            self.clear_pending();
            self.smooth_dx = 0.0;
            self.smooth_dy = 0.0;
        }
    }

    /// Start or stop an orbit drag
    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging && self.enabled;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Process cursor motion in pixels; only counts while dragging
    pub fn process_mouse_motion(&mut self, delta_x: f64, delta_y: f64) {
        if self.enabled && self.dragging {
            self.pending_dx += delta_x as f32;
            self.pending_dy += delta_y as f32;
        }
    }

    /// Process wheel input in lines (positive = away from the user, zoom in)
    pub fn process_scroll(&mut self, lines: f32) {
        if self.enabled {
            self.pending_scroll += lines;
        }
    }

    /// Ask for the camera to return to its starting view on the next update
    pub fn request_reset(&mut self) {
        self.reset_requested = true;
    }

    /// Apply accumulated input to the camera
    pub fn update<C: CameraControl>(&mut self, camera: &mut C, dt: f32) -> Vec3 {
        if self.reset_requested {
            self.reset_requested = false;
            self.clear_pending();
            self.smooth_dx = 0.0;
            self.smooth_dy = 0.0;
            camera.reset();
            return camera.position();
        }

        let (dx, dy) = if self.damping_enabled && dt > 0.0 {
            let factor = 2.0f32.powf(-dt / self.damping_half_life);
            self.smooth_dx = self.smooth_dx * factor + self.pending_dx * (1.0 - factor);
            self.smooth_dy = self.smooth_dy * factor + self.pending_dy * (1.0 - factor);
            (self.smooth_dx, self.smooth_dy)
        } else {
            (self.pending_dx, self.pending_dy)
        };

        if dx != 0.0 || dy != 0.0 {
            // Dragging right spins the scene right; dragging down tilts the camera up
            camera.orbit(-dx * self.rotate_sensitivity, -dy * self.rotate_sensitivity);
        }

        if self.pending_scroll != 0.0 {
            let factor = (1.0 - self.zoom_speed).max(0.01).powf(self.pending_scroll);
            camera.zoom(factor);
        }

        self.clear_pending();
        camera.position()
    }

    fn clear_pending(&mut self) {
        self.pending_dx = 0.0;
        self.pending_dy = 0.0;
        self.pending_scroll = 0.0;
    }
}
