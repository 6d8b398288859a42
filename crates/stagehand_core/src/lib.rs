//! Core types for Stagehand
//!
//! This crate holds everything about the interactive scene that does not
//! depend on a window or renderer:
//!
//! - [`SelectionState`] - The shared `(selected, mode_index)` record with
//!   subscribe/notify
//! - [`InputEventMapper`] - Pointer event rules that mutate the selection
//! - [`SceneObjectView`] - Per-object highlight, hover and physics toggle
//! - [`TransformGizmoBinding`] - Keeps a [`GizmoWidget`] on the selection
//! - [`PointerDispatcher`] / [`pick`] - Ray picking and event ordering
//! - [`World`] / [`Entity`] - Scene objects and their physics bodies
//! - [`OrbitCamera`] - Camera orbiting a target, with screen rays
//! - [`AssetCache`] / [`ModelAsset`] - Cached model loading (glTF or RON)
//! - [`SceneTemplate`] - Loadable/saveable object placements

mod transform;
mod entity;
mod world;
pub mod selection;
pub mod events;
pub mod hover;
pub mod input_mapper;
pub mod view;
pub mod gizmo;
pub mod picking;
pub mod camera;
pub mod asset_error;
pub mod asset_cache;
pub mod model;
pub mod scene;

pub use transform::Transform;
pub use entity::{DirtyFlags, Entity, Material};
pub use world::{EntityKey, World};
pub use selection::{ObserverKey, SelectionSnapshot, SelectionState, Subscription, TransformMode};
pub use events::{Gesture, PointerEvent};
pub use hover::{CursorStyle, HoverState};
pub use input_mapper::InputEventMapper;
pub use view::{Appearance, Palette, PhysicsActivationPolicy, SceneObjectView, ViewSet};
pub use gizmo::{DragInput, GizmoSensitivity, GizmoState, GizmoWidget, TransformGizmo, TransformGizmoBinding};
pub use picking::{pick, DispatchOutcome, Hit, PointerDispatcher, INTERACTIVE_TAG};
pub use camera::{OrbitCamera, OrbitLimits};
pub use asset_error::AssetError;
pub use asset_cache::{Asset, AssetCache, AssetHandle, AssetId};
pub use model::{ModelAsset, ModelObject};
pub use scene::{GroundTemplate, LightTemplate, ObjectPlacement, SceneError, SceneTemplate};

// Re-export commonly used types for convenience
pub use stagehand_math::{Aabb, Quat, Ray, Vec3};
pub use stagehand_physics::{BodyKey, PhysicsConfig, PhysicsMaterial, PhysicsWorld, RigidBody, StaticCollider};
