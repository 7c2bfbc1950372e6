//! Engine lifecycle tests
//!
//! Tests for:
//! - Construction defaults (camera, lights, background, controls)
//! - Construction failures (no surface, invalid settings)
//! - Resize and aspect handling, including zero-sized and HiDPI containers
//! - Tick ordering and rendering through the surface
//! - Dispose semantics and Drop

use std::any::Any;
use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use glam::{Vec3, Vec4};
use myth_viz::settings::color_from_hex;
use myth_viz::{
    Container, Engine, EngineSettings, HeadlessContainer, LightKind, LoopState, ManualScheduler,
    Mesh, MeshMaterial, SceneNode, Transform, Visualization, VizError, create_box,
};

// ============================================================================
// Helpers
// ============================================================================

const EPSILON: f32 = 1e-5;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
}

fn make_engine(width: u32, height: u32) -> (Engine, HeadlessContainer, ManualScheduler) {
    let container = HeadlessContainer::new(width, height);
    let scheduler = ManualScheduler::new();
    let engine = Engine::new(
        Box::new(container.clone()),
        Box::new(scheduler.clone()),
        EngineSettings::default(),
    )
    .expect("headless engine");
    (engine, container, scheduler)
}

fn cube() -> Mesh {
    Mesh::new(Arc::new(create_box(1.0, 1.0, 1.0)), MeshMaterial::default())
}

/// Node that records how often it is attached and detached.
#[derive(Default)]
struct Marker {
    transform: Transform,
    attached: Rc<Cell<i32>>,
}

impl Marker {
    fn new(attached: &Rc<Cell<i32>>) -> Self {
        Self {
            transform: Transform::new(),
            attached: Rc::clone(attached),
        }
    }
}

impl SceneNode for Marker {
    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    fn on_attach(&mut self) {
        self.attached.set(self.attached.get() + 1);
    }

    fn on_detach(&mut self) {
        self.attached.set(self.attached.get() - 1);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

struct BareContainer;

impl Container for BareContainer {
    fn content_size(&self) -> (u32, u32) {
        (640, 480)
    }
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn new_engine_uses_default_camera() {
    let (engine, _, _) = make_engine(800, 600);
    let camera = engine.camera();

    assert!(approx_eq(camera.fov_degrees(), 75.0));
    assert!(approx_eq(camera.near, 0.1));
    assert!(approx_eq(camera.far, 1000.0));
    assert!(approx_eq(camera.aspect, 800.0 / 600.0));
    assert!(vec3_approx(camera.position(), Vec3::new(0.0, 0.0, 5.0)));
}

#[test]
fn new_engine_camera_looks_at_origin() {
    let (engine, _, _) = make_engine(800, 600);
    let view = *engine.camera().view_matrix();

    // The origin sits 5 units in front of the camera (-Z in view space)
    let origin_in_view = view.transform_point3(Vec3::ZERO);
    assert!(vec3_approx(origin_in_view, Vec3::new(0.0, 0.0, -5.0)));
}

#[test]
fn new_engine_adds_default_lights() {
    let (engine, _, _) = make_engine(800, 600);
    let lights = engine.scene().lights();

    assert_eq!(lights.len(), 2);

    let ambient = lights
        .iter()
        .find(|l| l.kind == LightKind::Ambient)
        .expect("ambient light");
    assert!(vec3_approx(ambient.color, Vec3::ONE));
    assert!(approx_eq(ambient.intensity, 0.5));

    let directional = lights
        .iter()
        .find(|l| l.kind == LightKind::Directional)
        .expect("directional light");
    assert!(approx_eq(directional.intensity, 0.8));
    assert!(vec3_approx(directional.position, Vec3::ONE));
}

#[test]
fn new_engine_sets_background() {
    let (engine, _, _) = make_engine(800, 600);
    let expected = color_from_hex(0xf0f0f0).extend(1.0);
    assert_eq!(engine.scene().background, Some(expected));
    assert!(approx_eq(expected.x, 240.0 / 255.0));
}

#[test]
fn new_engine_configures_controls() {
    let (engine, _, _) = make_engine(800, 600);
    let controls = engine.controls();

    assert!(controls.enabled);
    assert!(controls.enable_damping);
    assert!(approx_eq(controls.damping_factor, 0.05));
    assert!(approx_eq(controls.min_distance, 1.0));
    assert!(approx_eq(controls.max_distance, 50.0));
    assert!(vec3_approx(controls.center, Vec3::ZERO));
    assert!(approx_eq(controls.radius, 5.0));
}

#[test]
fn new_engine_requests_first_frame() {
    let (engine, _, scheduler) = make_engine(800, 600);

    assert_eq!(scheduler.requested_count(), 1);
    assert_eq!(engine.pending_frame(), scheduler.pending());
    assert!(matches!(engine.loop_state(), LoopState::Running { pending: Some(_) }));
}

#[test]
fn new_engine_creates_surface_at_content_size() {
    let (engine, container, _) = make_engine(800, 600);
    let stats = container.stats();

    assert_eq!((stats.width, stats.height), (800, 600));
    assert_eq!(engine.size(), (800, 600));
    assert_eq!(stats.frames_rendered, 0);
}

#[test]
fn new_engine_scales_surface_by_device_pixel_ratio() {
    let container = HeadlessContainer::new(400, 300).with_scale_factor(2.0);
    let engine = Engine::new(
        Box::new(container.clone()),
        Box::new(ManualScheduler::new()),
        EngineSettings::default(),
    )
    .unwrap();

    assert_eq!(engine.size(), (800, 600));
    assert!(approx_eq(engine.camera().aspect, 400.0 / 300.0));
}

#[test]
fn container_without_surface_fails_initialization() {
    let scheduler = ManualScheduler::new();
    let result = Engine::new(
        Box::new(BareContainer),
        Box::new(scheduler.clone()),
        EngineSettings::default(),
    );

    assert!(matches!(result, Err(VizError::Initialization(_))));
    assert_eq!(scheduler.requested_count(), 0, "no frame before init");
}

#[test]
fn invalid_settings_are_rejected() {
    let result = Engine::new(
        Box::new(HeadlessContainer::new(100, 100)),
        Box::new(ManualScheduler::new()),
        EngineSettings::default().with_clip_planes(10.0, 1.0),
    );
    assert!(matches!(result, Err(VizError::InvalidSettings(_))));
}

#[test]
fn non_finite_settings_fail_construction() {
    let cases = [
        EngineSettings::default().with_max_frame_delta(f32::NAN),
        EngineSettings::default().with_max_frame_delta(f32::INFINITY),
        EngineSettings::default().with_clip_planes(f32::NAN, 1000.0),
        EngineSettings::default().with_camera_distance(f32::NAN),
    ];
    for settings in cases {
        let scheduler = ManualScheduler::new();
        let result = Engine::new(
            Box::new(HeadlessContainer::new(400, 400)),
            Box::new(scheduler.clone()),
            settings,
        );
        assert!(matches!(result, Err(VizError::InvalidSettings(_))));
        assert_eq!(scheduler.requested_count(), 0);
    }
}

// ============================================================================
// Resize
// ============================================================================

#[test]
fn resize_sets_aspect_from_container() {
    let (mut engine, container, _) = make_engine(400, 400);

    container.set_size(800, 400);
    engine.resize().unwrap();

    assert!(approx_eq(engine.camera().aspect, 2.0));
    assert_eq!(engine.size(), (800, 400));
    assert_eq!(container.stats().resize_count, 1);
}

#[test]
fn resize_rebuilds_projection() {
    let (mut engine, container, _) = make_engine(400, 400);
    let before = *engine.camera().projection_matrix();

    container.set_size(800, 400);
    engine.resize().unwrap();

    let after = *engine.camera().projection_matrix();
    assert!(approx_eq(after.x_axis.x * 2.0, before.x_axis.x));
    assert!(approx_eq(after.y_axis.y, before.y_axis.y));
}

#[test]
fn zero_sized_resize_keeps_aspect() {
    let (mut engine, container, _) = make_engine(800, 400);

    container.set_size(0, 0);
    engine.resize().unwrap();

    let aspect = engine.camera().aspect;
    assert!(aspect.is_finite());
    assert!(approx_eq(aspect, 2.0));
    assert_eq!(engine.size(), (0, 0), "size still forwarded to surface");

    container.set_size(300, 0);
    engine.resize().unwrap();
    assert!(approx_eq(engine.camera().aspect, 2.0));
}

#[test]
fn resize_updates_input_screen_size() {
    let (mut engine, container, _) = make_engine(800, 600);
    container.set_size(1024, 512);
    engine.resize().unwrap();
    assert_eq!(engine.input().screen_size, glam::Vec2::new(1024.0, 512.0));
}

// ============================================================================
// Tick
// ============================================================================

#[test]
fn tick_invokes_update_once_with_delta() {
    let (mut engine, _, _) = make_engine(400, 400);
    let calls = Rc::new(Cell::new(0));
    let last_dt = Rc::new(Cell::new(-1.0_f32));

    let (c, d) = (Rc::clone(&calls), Rc::clone(&last_dt));
    engine
        .add_visualization(Visualization::new("cube", cube()).with_update(move |_, dt| {
            c.set(c.get() + 1);
            d.set(dt);
        }))
        .unwrap();

    engine.tick(0.016).unwrap();

    assert_eq!(calls.get(), 1);
    assert!(approx_eq(last_dt.get(), 0.016));
}

#[test]
fn tick_renders_visible_meshes() {
    let (mut engine, container, _) = make_engine(400, 400);
    engine.add_visualization(Visualization::new("a", cube())).unwrap();

    let mut hidden = cube();
    hidden.visible = false;
    engine.add_visualization(Visualization::new("b", hidden)).unwrap();

    let attached = Rc::new(Cell::new(0));
    engine
        .add_visualization(Visualization::new("marker", Marker::new(&attached)))
        .unwrap();

    engine.tick(0.016).unwrap();

    let stats = container.stats();
    assert_eq!(stats.frames_rendered, 1);
    assert_eq!(stats.objects_drawn_last_frame, 1);
    assert_eq!(stats.nodes_last_frame, 2);
    assert_eq!(stats.last_clear_color, engine.scene().background);
}

#[test]
fn tick_updates_world_matrices_after_callbacks() {
    let (mut engine, _, _) = make_engine(400, 400);
    engine
        .add_visualization(Visualization::new("mover", cube()).with_update(|node, dt| {
            node.transform_mut().position.x += dt * 10.0;
        }))
        .unwrap();

    engine.tick(0.5).unwrap();

    let node = engine.visualization_node("mover").unwrap();
    let world = node.transform().world_matrix_as_mat4();
    assert!(approx_eq(world.w_axis.x, 5.0));
}

#[test]
fn tick_advances_time_and_frame_count() {
    let (mut engine, _, _) = make_engine(400, 400);
    engine.tick(0.25).unwrap();
    engine.tick(0.25).unwrap();

    assert!(approx_eq(engine.time(), 0.5));
    assert_eq!(engine.frame_count(), 2);
}

#[test]
fn update_visualization_mutates_node() {
    let (mut engine, _, _) = make_engine(400, 400);
    engine.add_visualization(Visualization::new("cube", cube())).unwrap();

    let found = engine
        .update_visualization("cube", |node| node.transform_mut().position = Vec3::X)
        .unwrap();
    assert!(found);
    let node = engine.visualization_node("cube").unwrap();
    assert!(vec3_approx(node.transform().position, Vec3::X));

    assert!(!engine.update_visualization("missing", |_| {}).unwrap());
}

#[test]
fn update_visualization_as_downcasts() {
    let (mut engine, _, _) = make_engine(400, 400);
    engine.add_visualization(Visualization::new("cube", cube())).unwrap();

    let red = Vec4::new(1.0, 0.0, 0.0, 1.0);
    assert!(
        engine
            .update_visualization_as::<Mesh, _>("cube", |mesh| mesh.material.color = red)
            .unwrap()
    );
    let mesh = engine
        .visualization_node("cube")
        .and_then(|node| node.downcast_ref::<Mesh>())
        .unwrap();
    assert_eq!(mesh.material.color, red);

    // Wrong type and absent id both report false
    assert!(
        !engine
            .update_visualization_as::<Marker, _>("cube", |_| {})
            .unwrap()
    );
    assert!(
        !engine
            .update_visualization_as::<Mesh, _>("missing", |_| {})
            .unwrap()
    );
}

// ============================================================================
// Dispose
// ============================================================================

#[test]
fn dispose_releases_everything() {
    let (mut engine, container, scheduler) = make_engine(400, 400);
    let attached = Rc::new(Cell::new(0));
    engine
        .add_visualization(Visualization::new("a", Marker::new(&attached)))
        .unwrap();
    engine
        .add_visualization(Visualization::new("b", Marker::new(&attached)))
        .unwrap();
    assert_eq!(attached.get(), 2);

    engine.dispose();

    assert!(engine.is_disposed());
    assert_eq!(attached.get(), 0, "every node detached");
    assert!(engine.scene().is_empty());
    assert_eq!(engine.visualization_count(), 0);
    assert_eq!(engine.loop_state(), LoopState::Stopped);
    assert_eq!(scheduler.cancelled_count(), 1);
    assert_eq!(scheduler.pending_count(), 0);
    assert!(!engine.controls().enabled);
    assert!(container.stats().released);
    assert!(engine.resize_observer().is_none());
}

#[test]
fn double_dispose_is_silent() {
    let (mut engine, _, scheduler) = make_engine(400, 400);
    engine.dispose();
    engine.dispose();

    assert!(engine.is_disposed());
    assert_eq!(scheduler.cancelled_count(), 1);
}

#[test]
fn calls_after_dispose_return_disposed() {
    let (mut engine, _, _) = make_engine(400, 400);
    engine.dispose();

    assert!(matches!(
        engine.add_visualization(Visualization::new("a", cube())),
        Err(VizError::Disposed)
    ));
    assert!(matches!(engine.remove_visualization("a"), Err(VizError::Disposed)));
    assert!(matches!(
        engine.update_visualization("a", |_| {}),
        Err(VizError::Disposed)
    ));
    assert!(matches!(engine.resize(), Err(VizError::Disposed)));
    assert!(matches!(engine.tick(0.016), Err(VizError::Disposed)));
}

#[test]
fn no_render_after_dispose() {
    let (mut engine, container, scheduler) = make_engine(400, 400);
    let request = scheduler.take_pending().unwrap();

    engine.dispose();
    let result = engine.frame(request, std::time::Instant::now());

    assert!(matches!(result, Err(VizError::Disposed)));
    assert_eq!(container.stats().frames_rendered, 0);
    assert_eq!(scheduler.requested_count(), 1, "nothing rescheduled");
}

#[test]
fn drop_disposes_engine() {
    let (mut engine, container, scheduler) = make_engine(400, 400);
    let attached = Rc::new(Cell::new(0));
    engine
        .add_visualization(Visualization::new("marker", Marker::new(&attached)))
        .unwrap();

    drop(engine);

    assert_eq!(attached.get(), 0);
    assert!(container.stats().released);
    assert_eq!(scheduler.pending_count(), 0);
}
