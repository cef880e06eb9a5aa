//! CPU-side triangle geometry, prior to GPU upload.

use glam::Vec3;

use crate::gpu::GpuContext;
use crate::mesh::{Mesh, Vertex3d};

/// Indexed triangle list kept in memory so it can be inspected or reshaped
/// before it becomes a [`Mesh`].
#[derive(Clone, Debug, Default)]
pub struct RawGeometry {
    pub vertices: Vec<Vertex3d>,
    /// Triangle indices, three per face, counter-clockwise when seen from outside.
    pub indices: Vec<u32>,
}

impl RawGeometry {
    /// Appends a vertex with a zero normal and returns its index.
    pub fn push_position(&mut self, position: Vec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices
            .push(Vertex3d::new(position.to_array(), [0.0, 0.0, 0.0]));
        index
    }

    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounding box as `(min, max)`.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);

        for v in &self.vertices {
            let p = Vec3::from(v.position);
            min = min.min(p);
            max = max.max(p);
        }

        (min, max)
    }

    /// Recalculates vertex normals by averaging the area-weighted normals of
    /// every face that shares the vertex.
    pub fn recalculate_normals(&mut self) {
        for v in &mut self.vertices {
            v.normal = [0.0, 0.0, 0.0];
        }

        for tri in self.indices.chunks_exact(3) {
            let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];

            let p0 = Vec3::from(self.vertices[i0].position);
            let p1 = Vec3::from(self.vertices[i1].position);
            let p2 = Vec3::from(self.vertices[i2].position);
            let face_normal = (p1 - p0).cross(p2 - p0);

            for i in [i0, i1, i2] {
                let n = Vec3::from(self.vertices[i].normal) + face_normal;
                self.vertices[i].normal = n.into();
            }
        }

        for v in &mut self.vertices {
            v.normal = Vec3::from(v.normal).normalize_or_zero().into();
        }
    }

    /// Uploads this geometry to the GPU as a [`Mesh`].
    pub fn upload(&self, gpu: &GpuContext) -> Mesh {
        Mesh::new(gpu, &self.vertices, &self.indices)
    }
}
