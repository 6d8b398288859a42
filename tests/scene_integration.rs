//! Integration tests for the shipped scene and model
//!
//! Loads `assets/` the way the binary does, composes the scene and runs the
//! simulation system over it.

use stagehand::config::{AppConfig, SceneConfig};
use stagehand::scene::{compose_scene, load_template, ComposedScene, GROUND_NAME};
use stagehand::systems::SimulationSystem;
use stagehand_core::{AssetCache, DragInput, ModelAsset, SceneTemplate, SelectionState, TransformMode, Vec3};
use stagehand_input::OrbitController;

fn shipped_scene(config: &AppConfig) -> ComposedScene {
    let template = load_template(&config.scene).unwrap();
    let mut assets = AssetCache::new();
    let handle = assets.load::<ModelAsset>(&template.model).unwrap();
    let model = assets.get::<ModelAsset>(&handle).unwrap();
    compose_scene(config, &template, &model, &SelectionState::new()).unwrap()
}

// ==================== Assets ====================

#[test]
fn test_shipped_scene_matches_built_in_desk() {
    let template = load_template(&SceneConfig::default()).unwrap();
    assert_eq!(template, SceneTemplate::demo("assets/models/props.ron"));
}

#[test]
fn test_shipped_model_has_every_placed_object() {
    let template = load_template(&SceneConfig::default()).unwrap();
    let mut assets = AssetCache::new();
    let handle = assets.load::<ModelAsset>(&template.model).unwrap();
    let model = assets.get::<ModelAsset>(&handle).unwrap();

    assert!(template.validate(&model).is_ok());
    assert!(model.get("Zeppelin").is_some());
}

#[test]
fn test_model_loads_once() {
    let mut assets = AssetCache::new();
    let first = assets.load::<ModelAsset>("assets/models/props.ron").unwrap();
    let second = assets.load::<ModelAsset>("assets/models/props.ron").unwrap();
    assert_eq!(first, second);
    assert_eq!(assets.asset_count(), 1);
}

#[test]
fn test_missing_model_file_fails() {
    let mut assets = AssetCache::new();
    assert!(assets.load::<ModelAsset>("assets/models/missing.ron").is_err());
}

// ==================== Composition ====================

#[test]
fn test_compose_shipped_scene() {
    let scene = shipped_scene(&AppConfig::default());

    assert_eq!(scene.name, "Desk");
    assert_eq!(scene.world.entity_count(), 3);
    assert!(scene.world.get_by_name(GROUND_NAME).is_some());
    assert!(scene.views.get("Notebook").is_some());
    assert!(scene.views.get("Table").is_some());
    assert_eq!(scene.world.physics().unwrap().awake_body_count(), 0);
}

#[test]
fn test_selection_drives_gizmo_in_composed_scene() {
    let scene = shipped_scene(&AppConfig::default());
    scene.selection.select("Notebook");
    scene.selection.cycle_mode();
    scene.selection.cycle_mode();

    let widget = scene.gizmo.widget();
    assert_eq!(widget.target(), Some("Notebook"));
    assert_eq!(widget.mode(), Some(TransformMode::Scale));
}

// ==================== Simulation ====================

#[test]
fn test_scene_holds_still_until_physics_is_enabled() {
    let mut scene = shipped_scene(&AppConfig::default());
    let mut controller = OrbitController::new();

    for _ in 0..60 {
        SimulationSystem::step(&mut scene, &mut controller, 1.0 / 60.0);
    }
    let (_, notebook) = scene.world.get_by_name("Notebook").unwrap();
    assert_eq!(notebook.transform.position.y, 30.0);
}

#[test]
fn test_notebook_drops_onto_table() {
    let mut scene = shipped_scene(&AppConfig::default());
    let mut controller = OrbitController::new();
    assert!(scene.toggle_physics());

    for _ in 0..(60 * 10) {
        SimulationSystem::step(&mut scene, &mut controller, 1.0 / 60.0);
    }

    let (_, notebook) = scene.world.get_by_name("Notebook").unwrap();
    let (_, table) = scene.world.get_by_name("Table").unwrap();
    assert!(notebook.transform.position.y < 30.0);
    assert!(notebook.transform.position.y > table.transform.position.y);
    assert!(table.world_bounds().min.y >= -20.0 - 0.1);
}

#[test]
fn test_settled_object_falls_after_gizmo_lift() {
    let mut scene = shipped_scene(&AppConfig::default());
    let mut controller = OrbitController::new();
    assert!(scene.toggle_physics());

    for _ in 0..(60 * 20) {
        SimulationSystem::step(&mut scene, &mut controller, 1.0 / 60.0);
    }
    let notebook_body = scene.views.get("Notebook").unwrap().body().unwrap();
    let (_, notebook) = scene.world.get_by_name("Notebook").unwrap();
    let rest_y = notebook.transform.position.y;

    scene.selection.select("Notebook");
    assert!(scene.gizmo.widget_mut().begin_drag("Notebook"));
    let lift = DragInput {
        dx: 0.0,
        dy: -30.0,
        right: Vec3::X,
        up: Vec3::Y,
        units_per_pixel: 1.0,
    };
    assert!(scene.apply_gizmo_drag(lift));
    scene.gizmo.widget_mut().end_drag();

    let (_, notebook) = scene.world.get_by_name("Notebook").unwrap();
    assert!((notebook.transform.position.y - (rest_y + 30.0)).abs() < 1e-3);
    assert_eq!(scene.world.physics().unwrap().is_sleeping(notebook_body), Some(false));

    for _ in 0..(60 * 10) {
        SimulationSystem::step(&mut scene, &mut controller, 1.0 / 60.0);
    }
    let (_, notebook) = scene.world.get_by_name("Notebook").unwrap();
    assert!((notebook.transform.position.y - rest_y).abs() < 0.5);
}

#[test]
fn test_gizmo_lift_without_physics_stays_put() {
    let mut scene = shipped_scene(&AppConfig::default());
    let mut controller = OrbitController::new();

    scene.selection.select("Notebook");
    assert!(scene.gizmo.widget_mut().begin_drag("Notebook"));
    let lift = DragInput {
        dx: 0.0,
        dy: -10.0,
        right: Vec3::X,
        up: Vec3::Y,
        units_per_pixel: 1.0,
    };
    assert!(scene.apply_gizmo_drag(lift));

    for _ in 0..60 {
        SimulationSystem::step(&mut scene, &mut controller, 1.0 / 60.0);
    }
    let (_, notebook) = scene.world.get_by_name("Notebook").unwrap();
    assert!((notebook.transform.position.y - 40.0).abs() < 1e-3);
}
