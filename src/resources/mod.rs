//! Drawable content: geometry, materials, meshes and primitive builders.

pub mod geometry;
pub mod material;
pub mod mesh;
pub mod primitives;

pub use geometry::{BoundingSphere, Geometry};
pub use material::MeshMaterial;
pub use mesh::Mesh;
