//! Transform and Camera tests
//!
//! Tests for:
//! - Transform TRS operations and dirty checking
//! - Euler angle round-trip conversions
//! - look_at orientation
//! - Scene world matrix propagation
//! - Perspective projection and aspect updates
//! - View matrix refresh from the camera transform

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use glam::{Mat4, Quat, Vec3, Vec4};
use myth_viz::{Camera, Group, Scene, Transform};

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-5;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
}

fn project(camera: &Camera, point: Vec3) -> Vec3 {
    let clip = *camera.view_projection_matrix() * point.extend(1.0);
    clip.truncate() / clip.w
}

// ============================================================================
// Transform Unit Tests
// ============================================================================

#[test]
fn transform_default_is_identity() {
    let t = Transform::new();
    assert_eq!(t.position, Vec3::ZERO);
    assert_eq!(t.rotation, Quat::IDENTITY);
    assert_eq!(t.scale, Vec3::ONE);
}

#[test]
fn transform_update_local_matrix_dirty_check() {
    let mut t = Transform::new();

    // First call always rebuilds
    assert!(t.update_local_matrix());
    assert!(!t.update_local_matrix());

    t.position = Vec3::new(1.0, 2.0, 3.0);
    assert!(t.update_local_matrix());
    assert!(!t.update_local_matrix());

    t.rotation = Quat::from_rotation_y(FRAC_PI_2);
    assert!(t.update_local_matrix());
    assert!(!t.update_local_matrix());

    t.scale = Vec3::splat(2.0);
    assert!(t.update_local_matrix());
    assert!(!t.update_local_matrix());
}

#[test]
fn transform_local_matrix_reflects_trs() {
    let mut t = Transform::from_position(Vec3::new(10.0, 20.0, 30.0));
    t.scale = Vec3::splat(2.0);
    t.update_local_matrix();

    let mat = Mat4::from(*t.local_matrix());
    assert!(vec3_approx(mat.w_axis.truncate(), Vec3::new(10.0, 20.0, 30.0)));
    assert!(approx_eq(mat.x_axis.length(), 2.0));
}

#[test]
fn transform_euler_roundtrip() {
    let mut t = Transform::new();
    let (x, y, z) = (0.3, 0.7, 1.2);
    t.set_rotation_euler(x, y, z);

    let euler = t.rotation_euler();
    assert!(approx_eq(euler.x, x));
    assert!(approx_eq(euler.y, y));
    assert!(approx_eq(euler.z, z));
}

#[test]
fn transform_incremental_rotation_accumulates() {
    let mut t = Transform::new();
    t.rotate_y(FRAC_PI_4);
    t.rotate_y(FRAC_PI_4);

    let expected = Quat::from_rotation_y(FRAC_PI_2);
    assert!(t.rotation.angle_between(expected) < 1e-4);
    assert!(approx_eq(t.rotation.length(), 1.0));
}

#[test]
fn transform_look_at_basic() {
    let mut t = Transform::new();
    t.look_at(Vec3::new(0.0, 0.0, -10.0), Vec3::Y);

    t.update_local_matrix();
    let mat = Mat4::from(*t.local_matrix());
    let forward = -mat.z_axis.truncate().normalize();
    assert!(vec3_approx(forward, Vec3::new(0.0, 0.0, -1.0)));
}

#[test]
fn transform_look_at_from_offset() {
    let mut t = Transform::from_position(Vec3::new(3.0, 0.0, 0.0));
    t.look_at(Vec3::ZERO, Vec3::Y);

    let forward = t.rotation * Vec3::NEG_Z;
    assert!(vec3_approx(forward, Vec3::new(-1.0, 0.0, 0.0)));
}

#[test]
fn transform_look_at_collinear_up_noop() {
    let mut t = Transform::new();
    let original_rotation = t.rotation;
    t.look_at(Vec3::new(0.0, 10.0, 0.0), Vec3::Y);
    assert_eq!(t.rotation, original_rotation);
}

#[test]
fn transform_mark_dirty_forces_update() {
    let mut t = Transform::new();
    t.update_local_matrix();
    assert!(!t.update_local_matrix());

    t.mark_dirty();
    assert!(t.update_local_matrix());
}

// ============================================================================
// Scene propagation
// ============================================================================

#[test]
fn scene_update_copies_local_into_world() {
    let mut scene = Scene::new();
    let mut group = Group::new();
    group.transform.position = Vec3::new(1.0, 2.0, 3.0);
    let key = scene.attach(Box::new(group));

    scene.update_transforms();

    let world = scene.get(key).unwrap().transform().world_matrix_as_mat4();
    assert!(vec3_approx(world.w_axis.truncate(), Vec3::new(1.0, 2.0, 3.0)));
}

#[test]
fn scene_update_tracks_later_changes() {
    let mut scene = Scene::new();
    let key = scene.attach(Box::new(Group::new()));
    scene.update_transforms();

    scene.get_mut(key).unwrap().transform_mut().position.x = 5.0;
    scene.update_transforms();

    let world = scene.get(key).unwrap().transform().world_matrix_as_mat4();
    assert!(approx_eq(world.w_axis.x, 5.0));
}

// ============================================================================
// Camera
// ============================================================================

#[test]
fn camera_stores_fov_in_radians() {
    let camera = Camera::new_perspective(75.0, 1.0, 0.1, 1000.0);
    assert!(approx_eq(camera.fov, 75.0_f32.to_radians()));
    assert!(approx_eq(camera.fov_degrees(), 75.0));
}

#[test]
fn perspective_matches_glam() {
    let camera = Camera::new_perspective(60.0, 1.5, 0.1, 100.0);
    let expected = Mat4::perspective_rh(60.0_f32.to_radians(), 1.5, 0.1, 100.0);
    assert!(camera.projection_matrix().abs_diff_eq(expected, 1e-6));
}

#[test]
fn near_and_far_map_to_depth_range() {
    let camera = Camera::new_perspective(60.0, 1.0, 0.1, 100.0);
    let proj = *camera.projection_matrix();

    let near = proj * Vec4::new(0.0, 0.0, -0.1, 1.0);
    let far = proj * Vec4::new(0.0, 0.0, -100.0, 1.0);
    assert!((near.z / near.w).abs() < 1e-4);
    assert!((far.z / far.w - 1.0).abs() < 1e-4);
}

#[test]
fn set_aspect_rebuilds_projection() {
    let mut camera = Camera::new_perspective(60.0, 1.0, 0.1, 100.0);
    let square = *camera.projection_matrix();

    camera.set_aspect(2.0);

    assert!(approx_eq(camera.aspect, 2.0));
    let wide = *camera.projection_matrix();
    // Horizontal scale halves when the view gets twice as wide
    assert!(approx_eq(wide.x_axis.x, square.x_axis.x / 2.0));
    assert!(approx_eq(wide.y_axis.y, square.y_axis.y));
}

#[test]
fn view_projection_centers_look_target() {
    let mut camera = Camera::new_perspective(75.0, 1.0, 0.1, 1000.0);
    camera.transform.position = Vec3::new(0.0, 0.0, 5.0);
    camera.transform.look_at(Vec3::ZERO, Vec3::Y);
    camera.update_view_projection();

    let ndc = project(&camera, Vec3::ZERO);
    assert!(approx_eq(ndc.x, 0.0));
    assert!(approx_eq(ndc.y, 0.0));
    assert!(ndc.z > 0.0 && ndc.z < 1.0);
}

#[test]
fn view_matrix_follows_transform_changes() {
    let mut camera = Camera::new_perspective(75.0, 1.0, 0.1, 1000.0);
    camera.transform.position = Vec3::new(0.0, 0.0, 5.0);
    camera.update_view_projection();

    camera.transform.position = Vec3::new(2.0, 0.0, 5.0);
    camera.update_view_projection();

    let eye = camera.view_matrix().inverse().w_axis.truncate();
    assert!(vec3_approx(eye, Vec3::new(2.0, 0.0, 5.0)));
    assert_eq!(camera.position(), Vec3::new(2.0, 0.0, 5.0));
}
