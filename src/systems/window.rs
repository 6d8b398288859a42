//! Window management system
//!
//! Handles window creation, the cursor icon, fullscreen toggle, and title updates.
//! The title shows the selection, the transform mode and whether physics is on.

use std::sync::Arc;
use winit::{
    event_loop::ActiveEventLoop,
    window::{CursorIcon, Fullscreen, Window},
};
use stagehand_core::{CursorStyle, SelectionSnapshot};
use crate::config::WindowConfig;

/// Manages the application window and cursor icon
pub struct WindowSystem {
    window: Arc<Window>,
    cursor: CursorStyle,
    base_title: String,
}

impl WindowSystem {
    /// Create window from config
    pub fn create(event_loop: &ActiveEventLoop, config: &WindowConfig) -> Result<Self, WindowError> {
        let mut attrs = Window::default_attributes()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));

        if config.fullscreen {
            attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|e| WindowError::CreationFailed(e.to_string()))?,
        );

        Ok(Self {
            window,
            cursor: CursorStyle::Default,
            base_title: config.title.clone(),
        })
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /// Inner size in physical pixels
    pub fn size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    /// Show the pointer icon while an object is hovered
    pub fn set_cursor(&mut self, style: CursorStyle) {
        if style != self.cursor {
            self.cursor = style;
            self.window.set_cursor(cursor_icon(style));
        }
    }

    /// Toggle fullscreen mode
    pub fn toggle_fullscreen(&self) {
        let new_fullscreen = if self.window.fullscreen().is_some() {
            None
        } else {
            Some(Fullscreen::Borderless(None))
        };
        self.window.set_fullscreen(new_fullscreen);
    }

    /// Update window title with selection/physics state
    pub fn update_title(&self, selection: &SelectionSnapshot, physics_enabled: bool) {
        self.window.set_title(&format_title(&self.base_title, selection, physics_enabled));
    }

    /// Request a redraw
    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}

fn cursor_icon(style: CursorStyle) -> CursorIcon {
    match style {
        CursorStyle::Default => CursorIcon::Default,
        CursorStyle::Pointer => CursorIcon::Pointer,
    }
}

/// Window title for the given state
pub fn format_title(base: &str, selection: &SelectionSnapshot, physics_enabled: bool) -> String {
    let physics = if physics_enabled { "on" } else { "off" };
    match &selection.selected {
        Some(name) => format!(
            "{} - {} [{}] - physics {} [Esc to deselect]",
            base,
            name,
            selection.mode(),
            physics
        ),
        None => format!("{} - physics {} [Click an object to select]", base, physics),
    }
}

#[derive(Debug)]
pub enum WindowError {
    CreationFailed(String),
}

impl std::fmt::Display for WindowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowError::CreationFailed(msg) => write!(f, "Window creation failed: {}", msg),
        }
    }
}

impl std::error::Error for WindowError {}
