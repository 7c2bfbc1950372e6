//! Scene container tests
//!
//! Tests for:
//! - Node attach/detach and key validity
//! - Attachment order iteration
//! - Light bookkeeping (ambient sum, main directional)
//! - Downcasting through dyn SceneNode

use std::sync::Arc;

use glam::Vec3;
use myth_viz::{
    Group, Light, LightKind, Mesh, MeshMaterial, Scene, SceneNode, create_box, create_sphere,
    SphereOptions,
};

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

fn named_mesh(name: &'static str) -> Mesh {
    Mesh::new(Arc::new(create_box(1.0, 1.0, 1.0)), MeshMaterial::default()).with_name(name)
}

// ============================================================================
// Attachment
// ============================================================================

#[test]
fn new_scene_is_empty() {
    let scene = Scene::new();
    assert!(scene.is_empty());
    assert!(scene.lights().is_empty());
    assert!(scene.background.is_none());
}

#[test]
fn scenes_get_unique_ids() {
    assert_ne!(Scene::new().id, Scene::new().id);
}

#[test]
fn attach_and_detach() {
    let mut scene = Scene::new();
    let key = scene.attach(Box::new(Group::new()));
    assert!(scene.contains(key));
    assert_eq!(scene.len(), 1);

    let node = scene.detach(key).expect("attached");
    assert!(node.is::<Group>());
    assert!(!scene.contains(key));
    assert!(scene.detach(key).is_none(), "stale key");
    assert!(scene.is_empty());
}

#[test]
fn keys_survive_other_detaches() {
    let mut scene = Scene::new();
    let a = scene.attach(Box::new(named_mesh("a")));
    let b = scene.attach(Box::new(named_mesh("b")));
    let c = scene.attach(Box::new(named_mesh("c")));

    scene.detach(b);

    let name = |key| {
        scene
            .get(key)
            .and_then(|node| node.downcast_ref::<Mesh>())
            .map(|mesh| mesh.name.to_string())
    };
    assert_eq!(name(a).as_deref(), Some("a"));
    assert_eq!(name(c).as_deref(), Some("c"));
    assert_eq!(name(b), None);
}

#[test]
fn iteration_follows_attachment_order() {
    let mut scene = Scene::new();
    for name in ["first", "second", "third"] {
        scene.attach(Box::new(named_mesh(name)));
    }
    let first = scene.iter().next().map(|(key, _)| key).unwrap();
    scene.detach(first);
    scene.attach(Box::new(named_mesh("fourth")));

    let names: Vec<String> = scene
        .iter()
        .filter_map(|(_, node)| node.as_mesh())
        .map(|mesh| mesh.name.to_string())
        .collect();
    assert_eq!(names, ["second", "third", "fourth"]);
}

#[test]
fn only_meshes_are_drawable() {
    let mut scene = Scene::new();
    let group = scene.attach(Box::new(Group::new()));
    let mesh = scene.attach(Box::new(Mesh::new(
        Arc::new(create_sphere(SphereOptions::default())),
        MeshMaterial::default(),
    )));

    assert!(scene.get(group).unwrap().as_mesh().is_none());
    assert!(scene.get(mesh).unwrap().as_mesh().is_some());
}

#[test]
fn downcast_mut_through_scene() {
    let mut scene = Scene::new();
    let key = scene.attach(Box::new(named_mesh("m")));

    let mesh = scene
        .get_mut(key)
        .and_then(|node| node.downcast_mut::<Mesh>())
        .unwrap();
    mesh.visible = false;

    let node: &dyn SceneNode = scene.get(key).unwrap();
    assert!(!node.visible());
    assert!(node.downcast_ref::<Group>().is_none());
}

// ============================================================================
// Lights
// ============================================================================

#[test]
fn ambient_radiance_sums_ambient_lights() {
    let mut scene = Scene::new();
    scene.add_light(Light::new_ambient(Vec3::ONE, 0.25));
    scene.add_light(Light::new_ambient(Vec3::new(1.0, 0.0, 0.0), 0.5));
    scene.add_light(Light::new_directional(Vec3::ONE, 10.0, Vec3::Y));

    assert!(vec3_approx(scene.ambient_radiance(), Vec3::new(0.75, 0.25, 0.25)));
}

#[test]
fn main_directional_light_is_first_directional() {
    let mut scene = Scene::new();
    assert!(scene.main_directional_light().is_none());

    scene.add_light(Light::new_ambient(Vec3::ONE, 0.5));
    scene.add_light(Light::new_directional(Vec3::ONE, 0.8, Vec3::X));
    scene.add_light(Light::new_directional(Vec3::ONE, 0.1, Vec3::Y));

    let main = scene.main_directional_light().unwrap();
    assert_eq!(main.kind, LightKind::Directional);
    assert!(approx_eq(main.intensity, 0.8));
}

#[test]
fn directional_light_points_towards_its_position() {
    let light = Light::new_directional(Vec3::ONE, 1.0, Vec3::new(2.0, 2.0, 2.0));
    let expected = Vec3::ONE.normalize();
    assert!(vec3_approx(light.direction(), expected));
}

#[test]
fn degenerate_light_directions_are_zero() {
    assert_eq!(Light::new_ambient(Vec3::ONE, 1.0).direction(), Vec3::ZERO);
    assert_eq!(
        Light::new_directional(Vec3::ONE, 1.0, Vec3::ZERO).direction(),
        Vec3::ZERO
    );
}

#[test]
fn radiance_scales_color() {
    let light = Light::new_ambient(Vec3::new(0.5, 1.0, 0.0), 2.0);
    assert!(vec3_approx(light.radiance(), Vec3::new(1.0, 2.0, 0.0)));
}
