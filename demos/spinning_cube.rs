//! Spinning Cube Example
//!
//! A single cube rotating about its X and Y axes, lit by the engine's default
//! ambient and directional lights.
//!
//! Controls:
//! - Left drag: Orbit camera
//! - Right drag: Pan
//! - Scroll: Zoom

use std::sync::Arc;

use myth_viz::app::winit::App;
use myth_viz::{Mesh, MeshMaterial, Visualization, create_box};

fn main() -> anyhow::Result<()> {
    App::new()
        .with_title("Spinning Cube")
        .with_setup(|engine| {
            let material = MeshMaterial::from_hex(0x00a5e0)
                .with_metalness(0.1)
                .with_roughness(0.5);
            let cube = Mesh::new(Arc::new(create_box(1.0, 1.0, 1.0)), material).with_name("Cube");

            engine.add_visualization(Visualization::new("cube", cube).with_update(|node, dt| {
                let transform = node.transform_mut();
                transform.rotate_x(dt * 0.5);
                transform.rotate_y(dt * 0.8);
            }))?;

            Ok(())
        })
        .run()?;
    Ok(())
}
