//! Integration tests for the interaction pipeline
//!
//! These tests drive the scene the way the app does:
//! 1. A camera ray is picked against the world
//! 2. The dispatcher delivers the gesture to object views
//! 3. Views feed the input mapper, which mutates the selection
//! 4. The gizmo binding and view highlights follow the selection
//! 5. Toggling physics wakes bodies that were created asleep

use stagehand_core::{
    pick, Aabb, Appearance, CursorStyle, DragInput, Entity, GizmoSensitivity, GizmoState,
    Gesture, InputEventMapper, OrbitCamera, OrbitLimits, Palette, PhysicsActivationPolicy,
    PhysicsConfig, PhysicsMaterial, PointerDispatcher, Ray, RigidBody, SceneObjectView,
    SelectionState, StaticCollider, Transform, TransformGizmo, TransformGizmoBinding,
    TransformMode, Vec3, ViewSet, World, INTERACTIVE_TAG,
};

struct Desk {
    world: World,
    views: ViewSet,
    selection: SelectionState,
    mapper: InputEventMapper,
    dispatcher: PointerDispatcher,
    gizmo: TransformGizmoBinding<TransformGizmo>,
    camera: OrbitCamera,
}

impl Desk {
    fn new() -> Self {
        let selection = SelectionState::new();
        let mut world = World::new().with_physics(PhysicsConfig::default());
        world
            .physics_mut()
            .unwrap()
            .add_static_collider(StaticCollider::floor(-20.0, PhysicsMaterial::GROUND));

        let mut views = ViewSet::new();
        for (name, position, half) in [
            ("Notebook", Vec3::new(0.0, 30.0, 0.0), Vec3::new(4.0, 0.5, 6.0)),
            ("Table", Vec3::new(0.0, -18.0, 0.0), Vec3::new(10.0, 1.0, 6.0)),
        ] {
            let bounds = Aabb::from_center_half_extents(Vec3::ZERO, half);
            let body = world.physics_mut().unwrap().add_body(
                RigidBody::new_box(position, bounds)
                    .with_allow_sleep(true)
                    .asleep(),
            );
            let entity = world.add_entity(
                Entity::new(bounds)
                    .with_name(name)
                    .with_tag(INTERACTIVE_TAG)
                    .with_transform(Transform::from_position(position))
                    .with_physics_body(body),
            );
            views.insert(SceneObjectView::mount(name, entity, Some(body), &selection));
        }

        Self {
            world,
            views,
            mapper: InputEventMapper::new(selection.clone()),
            gizmo: TransformGizmoBinding::new(TransformGizmo::new(GizmoSensitivity::default()), &selection),
            dispatcher: PointerDispatcher::new(),
            camera: OrbitCamera::new(Vec3::new(0.0, -10.0, 80.0), Vec3::ZERO, 50.0, OrbitLimits::default()),
            selection,
        }
    }

    fn ray_to(&self, name: &str) -> Ray {
        let (_, entity) = self.world.get_by_name(name).unwrap();
        let origin = self.camera.position();
        Ray::new(origin, entity.world_bounds().center() - origin)
    }

    fn ray_to_sky(&self) -> Ray {
        Ray::new(self.camera.position(), Vec3::Y)
    }

    fn gesture(&mut self, gesture: Gesture, ray: Ray) {
        let hits = pick(&self.world, &ray);
        self.dispatcher.dispatch(gesture, &hits, &mut self.views, &self.mapper);
    }

    fn click(&mut self, name: &str) {
        let ray = self.ray_to(name);
        self.gesture(Gesture::Click, ray);
    }

    fn right_click(&mut self, name: &str) {
        let ray = self.ray_to(name);
        self.gesture(Gesture::ContextMenu, ray);
    }

    fn click_empty_space(&mut self) {
        let ray = self.ray_to_sky();
        self.gesture(Gesture::Click, ray);
    }

    fn state(&self) -> (Option<String>, usize) {
        let snap = self.selection.snapshot();
        (snap.selected, snap.mode_index)
    }
}

// ==================== Selection Scenarios ====================

/// Click Table, right-click Table, click empty space
#[test]
fn test_select_cycle_and_miss() {
    let mut desk = Desk::new();
    assert_eq!(desk.state(), (None, 0));

    desk.click("Table");
    assert_eq!(desk.state(), (Some("Table".to_string()), 0));

    desk.right_click("Table");
    assert_eq!(desk.state(), (Some("Table".to_string()), 1));

    desk.click_empty_space();
    assert_eq!(desk.state(), (None, 1));
}

/// Two hits in a row: the last click wins and no miss sneaks in between
#[test]
fn test_last_click_wins() {
    let mut desk = Desk::new();
    desk.click("Notebook");
    desk.click("Table");
    assert_eq!(desk.state().0.as_deref(), Some("Table"));
}

#[test]
fn test_right_click_on_unselected_object_is_ignored() {
    let mut desk = Desk::new();
    desk.click("Table");
    desk.right_click("Notebook");
    assert_eq!(desk.state(), (Some("Table".to_string()), 0));
}

#[test]
fn test_three_right_clicks_return_to_start_mode() {
    let mut desk = Desk::new();
    desk.click("Notebook");
    for _ in 0..3 {
        desk.right_click("Notebook");
    }
    assert_eq!(desk.state(), (Some("Notebook".to_string()), 0));
}

#[test]
fn test_drag_release_over_nothing_keeps_selection() {
    let mut desk = Desk::new();
    desk.click("Table");
    let ray = desk.ray_to_sky();
    desk.gesture(Gesture::DragRelease, ray);
    assert_eq!(desk.state().0.as_deref(), Some("Table"));
}

// ==================== Views and Gizmo ====================

#[test]
fn test_highlight_and_gizmo_follow_selection() {
    let mut desk = Desk::new();
    let palette = Palette::default();

    desk.click("Notebook");
    desk.right_click("Notebook");
    desk.views.apply_appearance(&mut desk.world, &palette);

    assert_eq!(desk.views.get("Notebook").unwrap().appearance(), Appearance::Highlighted);
    assert_eq!(desk.views.get("Table").unwrap().appearance(), Appearance::Default);
    let (_, notebook) = desk.world.get_by_name("Notebook").unwrap();
    assert_eq!(notebook.material, palette.highlight);
    assert_eq!(
        desk.gizmo.state(),
        GizmoState::Bound {
            object: "Notebook".to_string(),
            mode: TransformMode::Rotate,
        }
    );

    desk.click_empty_space();
    assert_eq!(desk.gizmo.state(), GizmoState::Unbound);
    assert_eq!(desk.gizmo.widget().target(), None);
}

#[test]
fn test_gizmo_drag_moves_selected_object_and_body() {
    let mut desk = Desk::new();
    desk.click("Table");
    assert!(desk.gizmo.widget_mut().begin_drag("Table"));

    let drag = DragInput {
        dx: 20.0,
        dy: 0.0,
        right: desk.camera.right(),
        up: desk.camera.up(),
        units_per_pixel: 0.25,
    };
    assert!(desk.gizmo.widget().apply_drag(&mut desk.world, drag));
    desk.gizmo.widget_mut().end_drag();

    let (_, table) = desk.world.get_by_name("Table").unwrap();
    assert!((table.transform.position.x - 5.0).abs() < 1e-4);
    let body = table.physics_body.unwrap();
    let body = desk.world.physics().unwrap().get_body(body).unwrap();
    assert!((body.position.x - 5.0).abs() < 1e-4);
}

#[test]
fn test_hover_is_independent_per_object() {
    let mut desk = Desk::new();

    let ray = desk.ray_to("Notebook");
    desk.gesture(Gesture::Move, ray);
    assert!(desk.views.get("Notebook").unwrap().is_hovered());
    assert!(!desk.views.get("Table").unwrap().is_hovered());
    assert_eq!(desk.views.cursor(), CursorStyle::Pointer);

    let ray = desk.ray_to("Table");
    desk.gesture(Gesture::Move, ray);
    assert!(!desk.views.get("Notebook").unwrap().is_hovered());
    assert!(desk.views.get("Table").unwrap().is_hovered());

    let ray = desk.ray_to_sky();
    desk.gesture(Gesture::Move, ray);
    assert_eq!(desk.views.cursor(), CursorStyle::Default);
}

// ==================== Physics Activation ====================

/// Bodies start asleep and stay put until physics is enabled
#[test]
fn test_objects_stay_put_while_asleep() {
    let mut desk = Desk::new();
    for _ in 0..60 {
        desk.world.update(1.0 / 60.0);
    }
    let (_, notebook) = desk.world.get_by_name("Notebook").unwrap();
    assert_eq!(notebook.transform.position.y, 30.0);
}

/// Enabling one object wakes only its body
#[test]
fn test_enabling_physics_wakes_only_that_object() {
    let mut desk = Desk::new();
    let physics = desk.world.physics_mut().unwrap();
    desk.views
        .get_mut("Notebook")
        .unwrap()
        .set_physics_enabled(true, PhysicsActivationPolicy::WakeOnly, physics);

    let notebook_body = desk.views.get("Notebook").unwrap().body().unwrap();
    let table_body = desk.views.get("Table").unwrap().body().unwrap();
    let physics = desk.world.physics().unwrap();
    assert_eq!(physics.is_sleeping(notebook_body), Some(false));
    assert_eq!(physics.is_sleeping(table_body), Some(true));

    for _ in 0..60 {
        desk.world.update(1.0 / 60.0);
    }
    let (_, notebook) = desk.world.get_by_name("Notebook").unwrap();
    assert!(notebook.transform.position.y < 30.0);
    let (_, table) = desk.world.get_by_name("Table").unwrap();
    assert_eq!(table.transform.position.y, -18.0);
}

/// With physics on everywhere, everything settles above the ground plane
#[test]
fn test_objects_come_to_rest_above_ground() {
    let mut desk = Desk::new();
    let physics = desk.world.physics_mut().unwrap();
    desk.views.set_physics_enabled(true, PhysicsActivationPolicy::WakeOnly, physics);

    for _ in 0..(60 * 10) {
        desk.world.update(1.0 / 60.0);
    }

    for name in ["Notebook", "Table"] {
        let (_, entity) = desk.world.get_by_name(name).unwrap();
        assert!(entity.world_bounds().min.y >= -20.0 - 0.1, "{} sank through the ground", name);
    }
    let (_, notebook) = desk.world.get_by_name("Notebook").unwrap();
    let (_, table) = desk.world.get_by_name("Table").unwrap();
    assert!(notebook.transform.position.y > table.transform.position.y);
}
