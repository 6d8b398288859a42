//! Per-object hover tracking and the cursor it implies

/// Whether the pointer is currently over one object
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HoverState {
    hovered: bool,
}

impl HoverState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&mut self) {
        self.hovered = true;
    }

    pub fn leave(&mut self) {
        self.hovered = false;
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Cursor this object asks for
    pub fn cursor(&self) -> CursorStyle {
        if self.hovered {
            CursorStyle::Pointer
        } else {
            CursorStyle::Default
        }
    }
}

/// Cursor shape shown over the canvas
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CursorStyle {
    #[default]
    Default,
    /// Hand cursor, shown over interactive objects
    Pointer,
}

impl CursorStyle {
    /// Combine per-object hover states: a pointer if any object is hovered
    pub fn from_hover<'a>(states: impl IntoIterator<Item = &'a HoverState>) -> Self {
        if states.into_iter().any(HoverState::is_hovered) {
            Self::Pointer
        } else {
            Self::Default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_and_leave() {
        let mut hover = HoverState::new();
        assert_eq!(hover.cursor(), CursorStyle::Default);
        hover.enter();
        assert!(hover.is_hovered());
        assert_eq!(hover.cursor(), CursorStyle::Pointer);
        hover.leave();
        assert!(!hover.is_hovered());
    }

    #[test]
    fn test_cursor_from_several_objects() {
        let mut table = HoverState::new();
        let notebook = HoverState::new();
        assert_eq!(CursorStyle::from_hover([&table, &notebook]), CursorStyle::Default);
        table.enter();
        assert_eq!(CursorStyle::from_hover([&table, &notebook]), CursorStyle::Pointer);
    }
}
