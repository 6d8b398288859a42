//! Scene files
//!
//! A [`SceneTemplate`] says which model to load, where its objects go, where
//! the ground is and what lights the scene. Templates are stored as RON.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::f32::consts::FRAC_PI_2;
use serde::{Serialize, Deserialize};
use stagehand_physics::PhysicsMaterial;
use crate::asset_error::AssetError;
use crate::model::ModelAsset;
use crate::Transform;

fn one() -> f32 {
    1.0
}

fn yes() -> bool {
    true
}

/// Where one model object is placed
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectPlacement {
    /// Object name in the model
    pub name: String,
    pub position: [f32; 3],
    /// XYZ Euler angles in radians
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default = "one")]
    pub scale: f32,
    #[serde(default = "one")]
    pub mass: f32,
    /// Whether the object gets a physics body
    #[serde(default = "yes")]
    pub physics: bool,
    #[serde(default)]
    pub material: Option<PhysicsMaterial>,
}

impl ObjectPlacement {
    pub fn new(name: impl Into<String>, position: [f32; 3]) -> Self {
        Self {
            name: name.into(),
            position,
            rotation: [0.0; 3],
            scale: 1.0,
            mass: 1.0,
            physics: true,
            material: None,
        }
    }

    pub fn with_rotation(mut self, rotation: [f32; 3]) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_material(mut self, material: PhysicsMaterial) -> Self {
        self.material = Some(material);
        self
    }

    pub fn transform(&self) -> Transform {
        Transform::from_parts(self.position, self.rotation, self.scale)
    }
}

/// The ground plane
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroundTemplate {
    /// Height of the plane
    pub y: f32,
    /// Side length of the visible square
    pub size: f32,
}

impl Default for GroundTemplate {
    fn default() -> Self {
        Self { y: -20.0, size: 100.0 }
    }
}

/// A point light
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LightTemplate {
    pub position: [f32; 3],
    pub intensity: f32,
}

impl Default for LightTemplate {
    fn default() -> Self {
        Self {
            position: [100.0, 100.0, 100.0],
            intensity: 0.8,
        }
    }
}

/// A serializable scene description
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneTemplate {
    pub name: String,
    /// Path of the model asset the objects come from
    pub model: String,
    #[serde(default)]
    pub ground: GroundTemplate,
    pub objects: Vec<ObjectPlacement>,
    #[serde(default = "default_lights")]
    pub lights: Vec<LightTemplate>,
}

fn default_lights() -> Vec<LightTemplate> {
    vec![LightTemplate::default()]
}

impl SceneTemplate {
    /// The desk scene: a notebook held above a table
    pub fn demo(model: impl Into<String>) -> Self {
        Self {
            name: "Desk".to_string(),
            model: model.into(),
            ground: GroundTemplate::default(),
            objects: vec![
                ObjectPlacement::new("Notebook", [0.0, 30.0, 0.0])
                    .with_rotation([FRAC_PI_2, 0.0, 0.0])
                    .with_scale(0.5)
                    .with_material(PhysicsMaterial::PAPER),
                ObjectPlacement::new("Table", [0.0, -18.0, 0.0])
                    .with_rotation([FRAC_PI_2, 0.0, FRAC_PI_2])
                    .with_material(PhysicsMaterial::WOOD),
            ],
            lights: default_lights(),
        }
    }

    /// Load a scene from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SceneError> {
        let contents = fs::read_to_string(path)?;
        Ok(ron::from_str(&contents)?)
    }

    /// Save a scene to a RON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SceneError> {
        let pretty = ron::ser::PrettyConfig::new().struct_names(true);
        let contents = ron::ser::to_string_pretty(self, pretty)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Check that every placed object exists in `model`
    ///
    /// Stops at the first missing name.
    pub fn validate(&self, model: &ModelAsset) -> Result<(), SceneError> {
        for placement in &self.objects {
            if model.get(&placement.name).is_none() {
                return Err(SceneError::MissingObject(placement.name.clone()));
            }
            if placement.mass.is_nan() || placement.mass <= 0.0 {
                return Err(SceneError::InvalidMass(placement.name.clone()));
            }
        }
        Ok(())
    }
}

/// Error loading, saving or composing a scene
#[derive(Debug)]
pub enum SceneError {
    Io(io::Error),
    /// The scene file is not valid RON for a [`SceneTemplate`]
    Parse(ron::error::SpannedError),
    Serialize(ron::Error),
    Asset(AssetError),
    /// A placement names an object the model does not have
    MissingObject(String),
    /// A placement has zero, negative or NaN mass
    InvalidMass(String),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::Io(e) => write!(f, "IO error: {}", e),
            SceneError::Parse(e) => write!(f, "Parse error: {}", e),
            SceneError::Serialize(e) => write!(f, "Serialization error: {}", e),
            SceneError::Asset(e) => write!(f, "{}", e),
            SceneError::MissingObject(name) => write!(f, "Object '{}' is not in the model", name),
            SceneError::InvalidMass(name) => write!(f, "Object '{}' needs a positive mass", name),
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneError::Io(e) => Some(e),
            SceneError::Parse(e) => Some(e),
            SceneError::Serialize(e) => Some(e),
            SceneError::Asset(e) => Some(e),
            SceneError::MissingObject(_) | SceneError::InvalidMass(_) => None,
        }
    }
}

impl From<io::Error> for SceneError {
    fn from(e: io::Error) -> Self {
        SceneError::Io(e)
    }
}

impl From<ron::error::SpannedError> for SceneError {
    fn from(e: ron::error::SpannedError) -> Self {
        SceneError::Parse(e)
    }
}

impl From<ron::Error> for SceneError {
    fn from(e: ron::Error) -> Self {
        SceneError::Serialize(e)
    }
}

impl From<AssetError> for SceneError {
    fn from(e: AssetError) -> Self {
        SceneError::Asset(e)
    }
}
