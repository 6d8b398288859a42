//! Input handling module
//!
//! Maps key presses to app actions. Pointer gestures are handled by the
//! interaction system.

mod input_mapper;

pub use input_mapper::{InputMapper, InputAction};
