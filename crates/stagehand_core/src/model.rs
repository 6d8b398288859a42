//! Model assets: named objects with geometry bounds and a base colour
//!
//! Two formats load into a [`ModelAsset`]:
//!
//! - glTF (`.gltf` / `.glb`): every named node with a mesh becomes an object.
//!   Bounds come from the POSITION accessor min/max, so the vertex data itself
//!   is never decoded and compressed meshes load fine.
//! - RON manifests (`.ron`): a map of object name to [`ModelObject`].

use std::collections::BTreeMap;
use std::path::Path;
use serde::{Serialize, Deserialize};
use stagehand_math::{Aabb, Vec3};
use crate::asset_cache::Asset;
use crate::asset_error::AssetError;

/// One named object of a model
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelObject {
    /// Geometry bounds in object-local space
    pub bounds: Aabb,
    /// Base colour factor (RGBA)
    #[serde(default = "default_base_color")]
    pub base_color: [f32; 4],
    /// Name of the source material, if it had one
    #[serde(default)]
    pub material: Option<String>,
}

fn default_base_color() -> [f32; 4] {
    [1.0, 1.0, 1.0, 1.0]
}

/// A loaded model: a lookup from object name to geometry and material
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelAsset {
    pub objects: BTreeMap<String, ModelObject>,
}

impl ModelAsset {
    pub fn get(&self, name: &str) -> Option<&ModelObject> {
        self.objects.get(name)
    }

    /// Look up an object that must exist
    pub fn require(&self, name: &str) -> Result<&ModelObject, AssetError> {
        self.objects
            .get(name)
            .ok_or_else(|| AssetError::NotFound(format!("object '{}' in model", name)))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.objects.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Parse a RON manifest
    pub fn from_ron_str(source: &str) -> Result<Self, AssetError> {
        Ok(ron::from_str(source)?)
    }

    /// Read objects out of glTF or GLB bytes
    pub fn from_gltf_slice(bytes: &[u8]) -> Result<Self, AssetError> {
        // Validation rejects files requiring extensions the crate cannot decode
        // (e.g. Draco). Only names, accessor bounds and material factors are read.
        let gltf = gltf::Gltf::from_slice_without_validation(bytes)?;
        let mut objects = BTreeMap::new();

        for node in gltf.nodes() {
            let Some(mesh) = node.mesh() else {
                continue;
            };
            let Some(name) = node.name().or_else(|| mesh.name()) else {
                continue;
            };

            let mut bounds: Option<Aabb> = None;
            let mut base_color = default_base_color();
            let mut material = None;

            for (i, primitive) in mesh.primitives().enumerate() {
                if i == 0 {
                    let source = primitive.material();
                    base_color = source.pbr_metallic_roughness().base_color_factor();
                    material = source.name().map(str::to_string);
                }
                let Some(prim_bounds) = primitive_bounds(&primitive) else {
                    log::warn!("Primitive {} of '{}' has no position bounds; skipped", i, name);
                    continue;
                };
                bounds = Some(match bounds {
                    Some(b) => Aabb::new(b.min.min_components(prim_bounds.min), b.max.max_components(prim_bounds.max)),
                    None => prim_bounds,
                });
            }

            match bounds {
                Some(bounds) => {
                    objects.insert(name.to_string(), ModelObject { bounds, base_color, material });
                }
                None => log::warn!("Mesh node '{}' has no usable bounds; skipped", name),
            }
        }

        Ok(Self { objects })
    }
}

fn primitive_bounds(primitive: &gltf::Primitive<'_>) -> Option<Aabb> {
    let accessor = primitive.get(&gltf::Semantic::Positions)?;
    let min = vec3_from_json(&accessor.min()?)?;
    let max = vec3_from_json(&accessor.max()?)?;
    Some(Aabb::new(min, max))
}

fn vec3_from_json(value: &gltf::json::Value) -> Option<Vec3> {
    let values = value.as_array()?;
    if values.len() != 3 {
        return None;
    }
    let component = |i: usize| values[i].as_f64().map(|v| v as f32);
    Some(Vec3::new(component(0)?, component(1)?, component(2)?))
}

impl Asset for ModelAsset {
    fn load_from_file(path: &Path) -> Result<Self, AssetError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let model = match extension.as_deref() {
            Some("ron") => Self::from_ron_str(&std::fs::read_to_string(path)?)?,
            Some("glb") | Some("gltf") => Self::from_gltf_slice(&std::fs::read(path)?)?,
            _ => {
                return Err(AssetError::Parse(format!(
                    "unsupported model format: {}",
                    path.display()
                )))
            }
        };

        log::debug!("Model {} has objects: {:?}", path.display(), model.names().collect::<Vec<_>>());
        Ok(model)
    }
}
