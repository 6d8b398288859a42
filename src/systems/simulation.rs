//! Scene simulation system
//!
//! Manages the per-frame update:
//! - Delta time calculation
//! - Orbit camera input
//! - Physics stepping and entity sync
//! - Selection highlight

use std::time::Instant;
use stagehand_input::OrbitController;
use crate::scene::ComposedScene;

/// Longest frame the simulation will step in one go
pub const MAX_FRAME_TIME: f32 = 0.25;

/// Result of a simulation update
pub struct SimulationResult {
    /// Whether any entity moved or changed colour this frame
    pub scene_dirty: bool,
    /// Seconds simulated
    pub dt: f32,
}

/// Manages the scene simulation loop
pub struct SimulationSystem {
    last_frame: Instant,
}

impl SimulationSystem {
    /// Create a new simulation system
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
        }
    }

    /// Run one frame using wall-clock time since the previous frame
    pub fn update(&mut self, scene: &mut ComposedScene, controller: &mut OrbitController) -> SimulationResult {
        let now = Instant::now();
        let raw_dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        Self::step(scene, controller, raw_dt)
    }

    /// Run one frame of `dt` seconds
    pub fn step(scene: &mut ComposedScene, controller: &mut OrbitController, dt: f32) -> SimulationResult {
        // Cap dt to prevent spiral of death on first frame or after window focus
        // The physics accumulator further subdivides into fixed timesteps
        let dt = dt.clamp(0.0, MAX_FRAME_TIME);

        controller.update(&mut scene.camera, dt);

        scene.world.update(dt);
        scene.views.apply_appearance(&mut scene.world, &scene.palette);

        let scene_dirty = scene.world.has_dirty_entities();
        scene.world.clear_all_dirty();

        SimulationResult { scene_dirty, dt }
    }
}

impl Default for SimulationSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::scene::compose_scene;
    use stagehand_core::{Aabb, ModelAsset, ModelObject, SceneTemplate, SelectionState, Vec3};

    fn scene() -> ComposedScene {
        let mut model = ModelAsset::default();
        for name in ["Notebook", "Table"] {
            model.objects.insert(
                name.to_string(),
                ModelObject {
                    bounds: Aabb::from_center_half_extents(Vec3::ZERO, Vec3::new(4.0, 4.0, 1.0)),
                    base_color: [1.0; 4],
                    material: None,
                },
            );
        }
        compose_scene(
            &AppConfig::default(),
            &SceneTemplate::demo("props.ron"),
            &model,
            &SelectionState::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_delta_time_capped() {
        let mut scene = scene();
        let mut controller = OrbitController::new();
        let result = SimulationSystem::step(&mut scene, &mut controller, 3.0);
        assert_eq!(result.dt, MAX_FRAME_TIME);
    }

    #[test]
    fn test_quiet_frame_is_clean() {
        let mut scene = scene();
        let mut controller = OrbitController::new();
        SimulationSystem::step(&mut scene, &mut controller, 1.0 / 60.0);
        let result = SimulationSystem::step(&mut scene, &mut controller, 1.0 / 60.0);
        assert!(!result.scene_dirty);
    }

    #[test]
    fn test_selection_highlight_marks_dirty() {
        let mut scene = scene();
        let mut controller = OrbitController::new();
        SimulationSystem::step(&mut scene, &mut controller, 1.0 / 60.0);

        scene.selection.select("Table");
        let result = SimulationSystem::step(&mut scene, &mut controller, 1.0 / 60.0);
        assert!(result.scene_dirty);

        let (_, table) = scene.world.get_by_name("Table").unwrap();
        assert_eq!(table.material, scene.palette.highlight);
    }

    #[test]
    fn test_falling_object_marks_dirty() {
        let mut scene = scene();
        let mut controller = OrbitController::new();
        scene.set_physics_enabled(true);
        let result = SimulationSystem::step(&mut scene, &mut controller, 0.1);
        assert!(result.scene_dirty);

        let (_, notebook) = scene.world.get_by_name("Notebook").unwrap();
        assert!(notebook.transform.position.y < 30.0);
    }

    #[test]
    fn test_default_construction() {
        let sim = SimulationSystem::default();
        assert!(sim.last_frame.elapsed().as_millis() < 100);
    }
}
