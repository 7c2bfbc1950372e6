use glam::Vec3;

use crate::resources::geometry::Geometry;

/// Face normal plus the tangent axes spanning the face, with `u × v = normal`
/// so that the corner order below winds counter-clockwise from outside.
const FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    (Vec3::Y, Vec3::X, Vec3::NEG_Z),
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    (Vec3::X, Vec3::NEG_Z, Vec3::Y),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
];

const CORNERS: [(f32, f32); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

/// Axis-aligned box centered on the origin, 4 vertices per face.
#[must_use]
pub fn create_box(width: f32, height: f32, depth: f32) -> Geometry {
    let half = Vec3::new(width, height, depth) * 0.5;

    let mut positions = Vec::with_capacity(FACES.len() * CORNERS.len());
    let mut normals = Vec::with_capacity(positions.capacity());
    let mut indices = Vec::with_capacity(FACES.len() * 6);

    for (normal, u, v) in FACES {
        let base = positions.len() as u16;
        for (s, t) in CORNERS {
            positions.push(((normal + u * s + v * t) * half).to_array());
            normals.push(normal.to_array());
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    Geometry::new(positions, normals, indices)
}
