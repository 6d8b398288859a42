//! Keyboard input mapping to semantic actions
//!
//! Pointer buttons are NOT mapped here - they go through the gesture tracker
//! and the pointer dispatcher so they reach the object views.

use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Actions triggered by keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Clear the selection (Escape while something is selected)
    Deselect,
    /// Exit application (Escape with nothing selected)
    Exit,
    /// Reset camera to its starting view (R key)
    ResetCamera,
    /// Turn physics on or off for every placed object (P key)
    TogglePhysics,
    /// Toggle fullscreen mode (F key)
    ToggleFullscreen,
}

/// Maps raw key events to actions
pub struct InputMapper;

impl InputMapper {
    /// Map keyboard input to an action
    ///
    /// Returns `None` for releases and unmapped keys.
    pub fn map_keyboard(key: KeyCode, state: ElementState, has_selection: bool) -> Option<InputAction> {
        // Only handle key presses, not releases
        if state != ElementState::Pressed {
            return None;
        }

        match key {
            KeyCode::Escape => {
                if has_selection {
                    Some(InputAction::Deselect)
                } else {
                    Some(InputAction::Exit)
                }
            }
            KeyCode::KeyR => Some(InputAction::ResetCamera),
            KeyCode::KeyP => Some(InputAction::TogglePhysics),
            KeyCode::KeyF => Some(InputAction::ToggleFullscreen),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_with_selection_deselects() {
        let action = InputMapper::map_keyboard(KeyCode::Escape, ElementState::Pressed, true);
        assert_eq!(action, Some(InputAction::Deselect));
    }

    #[test]
    fn test_escape_without_selection_exits() {
        let action = InputMapper::map_keyboard(KeyCode::Escape, ElementState::Pressed, false);
        assert_eq!(action, Some(InputAction::Exit));
    }

    #[test]
    fn test_unmapped_keys() {
        for key in [KeyCode::KeyW, KeyCode::KeyA, KeyCode::Space] {
            let action = InputMapper::map_keyboard(key, ElementState::Pressed, true);
            assert_eq!(action, None, "Key {:?} should not be mapped", key);
        }
    }

    #[test]
    fn test_key_release_ignored() {
        let action = InputMapper::map_keyboard(KeyCode::KeyP, ElementState::Released, false);
        assert_eq!(action, None);
    }

    #[test]
    fn test_special_keys() {
        assert_eq!(
            InputMapper::map_keyboard(KeyCode::KeyR, ElementState::Pressed, false),
            Some(InputAction::ResetCamera)
        );
        assert_eq!(
            InputMapper::map_keyboard(KeyCode::KeyP, ElementState::Pressed, true),
            Some(InputAction::TogglePhysics)
        );
        assert_eq!(
            InputMapper::map_keyboard(KeyCode::KeyF, ElementState::Pressed, true),
            Some(InputAction::ToggleFullscreen)
        );
    }
}
