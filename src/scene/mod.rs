//! Scene construction
//!
//! Builds the world, object views, camera and gizmo from a scene template.

mod scene_builder;

pub use scene_builder::{compose_scene, load_template, ComposedScene, SceneBuilder, GROUND_NAME};
