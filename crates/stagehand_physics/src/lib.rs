//! Physics simulation for Stagehand
//!
//! This crate provides the physics provider the scene is wired to:
//! - Box-shaped rigid bodies with gravity
//! - Static ground/wall planes
//! - Body sleeping and waking (`sleep()` / `wake_up()`), plus automatic sleep
//!   for bodies that come to rest

pub mod body;
pub mod collision;
pub mod material;
pub mod shapes;
pub mod world;

// Re-export commonly used types
pub use body::{BodyKey, BodyType, RigidBody, SleepState, StaticCollider};
pub use collision::{aabb_vs_aabb, aabb_vs_plane, Contact};
pub use material::PhysicsMaterial;
pub use shapes::Plane;
pub use world::{PhysicsConfig, PhysicsWorld};
