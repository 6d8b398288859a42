//! Stagehand: an interactive desk scene
//!
//! Click an object to select it, right-click it to cycle the gizmo between
//! translate, rotate and scale, drag it to manipulate it, and press `P` to let
//! physics drop everything onto the ground.

pub mod config;
pub mod input;
pub mod scene;
pub mod systems;
