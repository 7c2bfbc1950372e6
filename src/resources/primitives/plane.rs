use crate::resources::geometry::Geometry;

#[derive(Debug, Clone, Copy)]
pub struct PlaneOptions {
    pub width: f32,
    pub height: f32,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl Default for PlaneOptions {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            width_segments: 1,
            height_segments: 1,
        }
    }
}

/// Plane in the XY plane facing +Z.
#[must_use]
pub fn create_plane(options: PlaneOptions) -> Geometry {
    let width_half = options.width / 2.0;
    let height_half = options.height / 2.0;

    let grid_x = options.width_segments.clamp(1, 254);
    let grid_y = options.height_segments.clamp(1, 254);
    let grid_x1 = grid_x + 1;

    let segment_width = options.width / grid_x as f32;
    let segment_height = options.height / grid_y as f32;

    let mut positions = Vec::new();
    for iy in 0..=grid_y {
        let y = iy as f32 * segment_height - height_half;
        for ix in 0..=grid_x {
            let x = ix as f32 * segment_width - width_half;
            positions.push([x, -y, 0.0]);
        }
    }
    let normals = vec![[0.0, 0.0, 1.0]; positions.len()];

    let mut indices = Vec::new();
    for iy in 0..grid_y {
        for ix in 0..grid_x {
            let a = (ix + grid_x1 * iy) as u16;
            let b = (ix + grid_x1 * (iy + 1)) as u16;
            let c = (ix + 1 + grid_x1 * (iy + 1)) as u16;
            let d = (ix + 1 + grid_x1 * iy) as u16;

            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    Geometry::new(positions, normals, indices)
}
