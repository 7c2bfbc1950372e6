use std::f32::consts::PI;

use crate::resources::geometry::Geometry;

#[derive(Debug, Clone, Copy)]
pub struct SphereOptions {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl Default for SphereOptions {
    fn default() -> Self {
        Self {
            radius: 1.0,
            width_segments: 32,
            height_segments: 16,
        }
    }
}

/// UV sphere centered on the origin.
///
/// Segment counts are clamped so the vertex count fits 16-bit indices.
#[must_use]
pub fn create_sphere(options: SphereOptions) -> Geometry {
    let radius = options.radius;
    let width_segments = options.width_segments.clamp(3, 128);
    let height_segments = options.height_segments.clamp(2, 128);

    let ring = width_segments + 1;
    let mut positions = Vec::with_capacity((ring * (height_segments + 1)) as usize);
    let mut normals = Vec::with_capacity(positions.capacity());

    for y in 0..=height_segments {
        // Polar angle, 0 at the south pole
        let theta = y as f32 / height_segments as f32 * PI;
        let py = -radius * theta.cos();
        let ring_radius = radius * theta.sin();

        for x in 0..=width_segments {
            let phi = x as f32 / width_segments as f32 * 2.0 * PI;
            let px = -ring_radius * phi.cos();
            let pz = ring_radius * phi.sin();

            positions.push([px, py, pz]);
            normals.push([px / radius, py / radius, pz / radius]);
        }
    }

    let mut indices = Vec::with_capacity((width_segments * height_segments * 6) as usize);
    for y in 0..height_segments {
        for x in 0..width_segments {
            let v0 = (y * ring + x) as u16;
            let v1 = v0 + 1;
            let v2 = ((y + 1) * ring + x) as u16;
            let v3 = v2 + 1;

            // The pole rows collapse to a point; skip their degenerate halves.
            if y != 0 {
                indices.extend_from_slice(&[v0, v1, v2]);
            }
            if y != height_segments - 1 {
                indices.extend_from_slice(&[v1, v3, v2]);
            }
        }
    }

    Geometry::new(positions, normals, indices)
}
