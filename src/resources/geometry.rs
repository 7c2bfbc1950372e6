use glam::Vec3;
use uuid::Uuid;

/// Bounding sphere in local space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

/// Indexed triangle geometry with per-vertex normals.
///
/// Geometries are immutable once built and shared between meshes through
/// `Arc`. The `uuid` identifies the vertex data, so GPU surfaces upload each
/// geometry once no matter how many meshes reference it.
#[derive(Debug, Clone)]
pub struct Geometry {
    pub uuid: Uuid,
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    indices: Vec<u16>,
    bounding_sphere: BoundingSphere,
}

impl Geometry {
    /// Builds a geometry from planar vertex data.
    ///
    /// `normals` must have one entry per position; missing normals are
    /// filled with +Y. Indices referencing missing vertices are dropped
    /// together with their triangle.
    #[must_use]
    pub fn new(positions: Vec<[f32; 3]>, mut normals: Vec<[f32; 3]>, indices: Vec<u16>) -> Self {
        if normals.len() != positions.len() {
            log::warn!(
                "Geometry has {} normals for {} positions, padding with +Y",
                normals.len(),
                positions.len()
            );
            normals.resize(positions.len(), [0.0, 1.0, 0.0]);
        }

        let vertex_count = positions.len();
        let indices: Vec<u16> = indices
            .chunks_exact(3)
            .filter(|tri| tri.iter().all(|&i| usize::from(i) < vertex_count))
            .flatten()
            .copied()
            .collect();

        let mut geo = Self {
            uuid: Uuid::new_v4(),
            positions,
            normals,
            indices,
            bounding_sphere: BoundingSphere::default(),
        };
        geo.compute_bounding_volume();
        geo
    }

    #[must_use]
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    #[must_use]
    pub fn normals(&self) -> &[[f32; 3]] {
        &self.normals
    }

    #[must_use]
    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[must_use]
    pub fn bounding_sphere(&self) -> BoundingSphere {
        self.bounding_sphere
    }

    fn compute_bounding_volume(&mut self) {
        if self.positions.is_empty() {
            self.bounding_sphere = BoundingSphere::default();
            return;
        }

        let (min, max) = self.positions.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(min, max), p| {
                let p = Vec3::from_array(*p);
                (min.min(p), max.max(p))
            },
        );
        let center = (min + max) * 0.5;
        let radius = self
            .positions
            .iter()
            .map(|p| Vec3::from_array(*p).distance(center))
            .fold(0.0_f32, f32::max);

        self.bounding_sphere = BoundingSphere { center, radius };
    }
}
