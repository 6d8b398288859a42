//! 3D Mathematics Library
//!
//! This crate provides the small set of math types the Stagehand scene needs.
//!
//! ## Core Types
//!
//! - [`Vec3`] - 3D vector with x, y, z components
//! - [`Quat`] - Unit quaternion rotation
//! - [`Ray`] - Half-line used for pointer picking
//! - [`Aabb`] - Axis-aligned bounding box

mod vec3;
mod quat;
pub mod ray;
pub mod aabb;

pub use vec3::Vec3;
pub use quat::Quat;
pub use ray::Ray;
pub use aabb::Aabb;
