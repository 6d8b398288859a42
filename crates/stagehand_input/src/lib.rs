//! Input handling for Stagehand
//!
//! - [`GestureTracker`] turns winit mouse presses and releases into
//!   click / drag-release / context-menu gestures
//! - [`OrbitController`] turns drags and wheel scrolls into orbit camera motion

mod orbit_controller;
mod pointer;

pub use orbit_controller::{CameraControl, OrbitController};
pub use pointer::{GestureTracker, PointerButton, PointerInput};
