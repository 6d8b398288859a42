//! Stagehand - interactive desk scene
//!
//! Select, cycle and manipulate objects on a desk, and let physics drop them.

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::WindowId,
};

use stagehand::config::AppConfig;
use stagehand::input::{InputAction, InputMapper};
use stagehand::scene::{compose_scene, load_template, ComposedScene};
use stagehand::systems::{InteractionSystem, SimulationSystem, WindowSystem};
use stagehand_core::{AssetCache, AssetHandle, ModelAsset, SceneError, SceneTemplate, SelectionState};
use stagehand_input::OrbitController;

/// Main application state
struct App {
    /// Application configuration
    config: AppConfig,
    window: Option<WindowSystem>,
    assets: AssetCache,
    model: AssetHandle,
    template: SceneTemplate,
    scene: ComposedScene,
    controller: OrbitController,
    interaction: InteractionSystem,
    simulation: SimulationSystem,
}

impl App {
    /// Load the scene and model and compose the scene tree
    fn new(config: AppConfig) -> Result<Self, SceneError> {
        let template = load_template(&config.scene)?;

        let mut assets = AssetCache::new();
        assets.set_watch_for_changes(config.scene.hot_reload);
        let model = assets.load::<ModelAsset>(&template.model)?;
        let model_data = assets
            .get::<ModelAsset>(&model)
            .ok_or_else(|| SceneError::Asset(stagehand_core::AssetError::NotFound(template.model.clone())))?;
        log::info!("Loaded model '{}' with {} objects", template.model, model_data.len());

        let selection = SelectionState::new();
        let scene = compose_scene(&config, &template, &model_data, &selection)?;

        let controller = config.input.orbit_controller();

        let interaction = InteractionSystem::new(
            config.input.click_drag_threshold,
            config.window.width,
            config.window.height,
        );

        Ok(Self {
            config,
            window: None,
            assets,
            model,
            template,
            scene,
            controller,
            interaction,
            simulation: SimulationSystem::new(),
        })
    }

    /// Recompose the scene if the model file changed on disk
    fn reload_model(&mut self) {
        let reloaded = self.assets.check_hot_reload::<ModelAsset>();
        if !reloaded.contains(&self.model) {
            return;
        }
        let Some(model) = self.assets.get::<ModelAsset>(&self.model) else {
            return;
        };

        match compose_scene(&self.config, &self.template, &model, &self.scene.selection) {
            Ok(scene) => {
                self.interaction.cursor_left(&mut self.scene, &mut self.controller);
                if let Some(selected) = scene.selection.selected() {
                    if scene.views.get(&selected).is_none() {
                        scene.selection.deselect();
                    }
                }
                self.scene = scene;
                log::info!("Scene recomposed after model change");
            }
            Err(e) => log::warn!("Keeping previous scene; model reload failed: {}", e),
        }
    }

    fn handle_action(&mut self, action: InputAction, event_loop: &ActiveEventLoop) {
        match action {
            InputAction::Deselect => self.scene.selection.deselect(),
            InputAction::Exit => event_loop.exit(),
            InputAction::ResetCamera => self.controller.request_reset(),
            InputAction::TogglePhysics => {
                let enabled = self.scene.toggle_physics();
                log::info!("Physics {}", if enabled { "enabled" } else { "disabled" });
            }
            InputAction::ToggleFullscreen => {
                if let Some(window) = &self.window {
                    window.toggle_fullscreen();
                }
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        match WindowSystem::create(event_loop, &self.config.window) {
            Ok(window) => {
                let (width, height) = window.size();
                self.interaction.resize(width, height);
                window.update_title(&self.scene.selection.snapshot(), self.scene.views.all_physics_enabled());
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                self.interaction.resize(size.width, size.height);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    let has_selection = self.scene.selection.selected().is_some();
                    if let Some(action) = InputMapper::map_keyboard(key, event.state, has_selection) {
                        self.handle_action(action, event_loop);
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.interaction
                    .cursor_moved(position.x, position.y, &mut self.scene, &mut self.controller);
            }
            WindowEvent::CursorLeft { .. } => {
                self.interaction.cursor_left(&mut self.scene, &mut self.controller);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.interaction
                    .mouse_button(button, state, &mut self.scene, &mut self.controller);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.interaction.mouse_wheel(delta, &mut self.controller);
            }
            WindowEvent::RedrawRequested => {
                self.reload_model();

                let result = self.simulation.update(&mut self.scene, &mut self.controller);
                if result.scene_dirty {
                    log::trace!("Scene changed ({:.3}s frame)", result.dt);
                }

                if let Some(window) = self.window.as_mut() {
                    window.set_cursor(self.scene.views.cursor());
                    window.update_title(&self.scene.selection.snapshot(), self.scene.views.all_physics_enabled());
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

fn main() {
    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.debug.log_level.as_str()))
        .init();

    if let Some(e) = config_error {
        log::warn!("Failed to load config: {}. Using defaults.", e);
    }

    let mut app = match App::new(config) {
        Ok(app) => app,
        Err(e) => {
            log::error!("Failed to load scene: {}", e);
            std::process::exit(1);
        }
    };

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {}", e);
        std::process::exit(1);
    }
}
