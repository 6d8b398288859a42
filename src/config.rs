//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`STAGE_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use stagehand_core::{GizmoSensitivity, OrbitLimits, Palette, PhysicsActivationPolicy};
use stagehand_input::OrbitController;
use std::f32::consts::PI;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub physics: PhysicsConfig,
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub appearance: AppearanceConfig,
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // STAGE_WINDOW__TITLE=Test -> window.title = "Test"
        figment = figment.merge(Env::prefixed("STAGE_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Stagehand".to_string(),
            width: 1280,
            height: 720,
            fullscreen: false,
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Starting position [x, y, z]
    pub position: [f32; 3],
    /// Point the camera orbits around
    pub target: [f32; 3],
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Orbit polar angle limits in radians, measured from straight up
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, -10.0, 80.0],
            target: [0.0, 0.0, 0.0],
            fov: 50.0,
            near: 0.1,
            far: 1000.0,
            min_polar_angle: 0.0,
            max_polar_angle: PI / 1.75,
            min_distance: 5.0,
            max_distance: 400.0,
        }
    }
}

impl CameraConfig {
    pub fn orbit_limits(&self) -> OrbitLimits {
        OrbitLimits {
            min_polar: self.min_polar_angle,
            max_polar: self.max_polar_angle,
            min_distance: self.min_distance,
            max_distance: self.max_distance,
        }
    }
}

/// Input configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Orbit radians per pixel dragged
    pub orbit_sensitivity: f32,
    /// Fractional zoom per wheel line
    pub zoom_speed: f32,
    /// Orbit damping half-life in seconds
    pub damping_half_life: f32,
    pub damping_enabled: bool,
    /// Pointer travel in pixels before a press counts as a drag
    pub click_drag_threshold: f64,
    /// Gizmo rotation in radians per pixel
    pub gizmo_rotate_sensitivity: f32,
    /// Gizmo scale change per pixel
    pub gizmo_scale_sensitivity: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            orbit_sensitivity: 0.005,
            zoom_speed: 0.1,
            damping_half_life: 0.05,
            damping_enabled: true,
            click_drag_threshold: 4.0,
            gizmo_rotate_sensitivity: 0.01,
            gizmo_scale_sensitivity: 0.005,
        }
    }
}

impl InputConfig {
    /// Orbit controls tuned from this section
    pub fn orbit_controller(&self) -> OrbitController {
        OrbitController::new()
            .with_rotate_sensitivity(self.orbit_sensitivity)
            .with_zoom_speed(self.zoom_speed)
            .with_damping(self.damping_enabled)
            .with_damping_half_life(self.damping_half_life)
    }

    pub fn gizmo_sensitivity(&self) -> GizmoSensitivity {
        GizmoSensitivity {
            rotate: self.gizmo_rotate_sensitivity,
            scale: self.gizmo_scale_sensitivity,
        }
    }
}

/// Physics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity (negative = downward)
    pub gravity: f32,
    /// Fixed simulation step in seconds
    pub fixed_timestep: f32,
    /// Bodies slower than this (units/s) may fall asleep
    pub sleep_speed_limit: f32,
    /// Seconds a body must stay slow before it sleeps
    pub sleep_time_limit: f32,
    /// Whether placed objects are simulated from the start
    pub enabled_at_start: bool,
    /// What turning physics off does to a body
    pub activation_policy: PhysicsActivationPolicy,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: -9.81,
            fixed_timestep: 1.0 / 60.0,
            sleep_speed_limit: 0.1,
            sleep_time_limit: 1.0,
            enabled_at_start: false,
            activation_policy: PhysicsActivationPolicy::WakeOnly,
        }
    }
}

impl PhysicsConfig {
    pub fn to_physics_config(&self) -> stagehand_core::PhysicsConfig {
        stagehand_core::PhysicsConfig {
            gravity: self.gravity,
            fixed_timestep: self.fixed_timestep,
            sleep_speed_limit: self.sleep_speed_limit,
            sleep_time_limit: self.sleep_time_limit,
        }
    }
}

/// Scene configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Scene file to load
    pub path: String,
    /// Model used when the scene file is missing
    pub fallback_model: String,
    /// Reload the model when its file changes
    pub hot_reload: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            path: "assets/scenes/demo.ron".to_string(),
            fallback_model: "assets/models/props.ron".to_string(),
            hot_reload: false,
        }
    }
}

/// Object colours
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    /// Colour of the selected object
    pub highlight_color: String,
    /// Colour of every other object
    pub default_color: String,
    pub ground_color: String,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            highlight_color: "#ff6080".to_string(),
            default_color: "#d5dea2".to_string(),
            ground_color: "#ffffff".to_string(),
        }
    }
}

impl AppearanceConfig {
    /// Palette from the configured colours, falling back to the defaults
    /// for any that do not parse
    pub fn palette(&self) -> Palette {
        Palette::from_hex(&self.highlight_color, &self.default_color).unwrap_or_else(|| {
            log::warn!(
                "Invalid appearance colours ({}, {}); using defaults",
                self.highlight_color,
                self.default_color
            );
            Palette::default()
        })
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
    /// Log collider bounds each time they change
    pub show_colliders: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            show_colliders: false,
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
