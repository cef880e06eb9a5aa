//! Extrusion of a closed 2D outline into a bevelled solid.
//!
//! The outline is flattened into a counter-clockwise polygon, then swept along
//! +Z as a stack of rings. With bevels enabled the stack looks like this
//! (side view, outline offset grows to the right):
//!
//! ```text
//!  z = depth + thickness   back cap, offset 0
//!        ... bevel rings, offset rising along a quarter circle
//!  z = depth               offset = bevel size
//!        ... `steps` body rings
//!  z = 0                   offset = bevel size
//!        ... bevel rings
//!  z = -thickness          front cap, offset 0
//! ```
//!
//! Consecutive rings are joined by quads; both ends are closed by caps
//! triangulated with lyon's fill tessellator.

use std::f32::consts::FRAC_PI_2;

use glam::{Vec2, Vec3};
use lyon::path::Path;
use lyon::tessellation::{BuffersBuilder, FillOptions, FillTessellator, FillVertex, VertexBuffers};

use crate::error::{HeartError, Result};
use crate::geometry::RawGeometry;
use crate::shape::{flatten_contour, make_counter_clockwise, polygon_path};

/// Controls how the 2D outline becomes a solid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExtrudeSettings {
    /// Length of the straight body along +Z.
    pub depth: f32,
    pub bevel_enabled: bool,
    /// Rings per bevel. Zero behaves like a disabled bevel.
    pub bevel_segments: u32,
    /// Body subdivisions between z = 0 and z = depth.
    pub steps: u32,
    /// How far the bevel pushes the outline outwards.
    pub bevel_size: f32,
    /// How far each bevel reaches beyond the body along Z.
    pub bevel_thickness: f32,
    /// Maximum distance between a curve and its flattened polygon.
    pub curve_tolerance: f32,
}

impl Default for ExtrudeSettings {
    fn default() -> Self {
        Self {
            depth: 8.0,
            bevel_enabled: true,
            bevel_segments: 2,
            steps: 2,
            bevel_size: 1.0,
            bevel_thickness: 1.0,
            curve_tolerance: 0.05,
        }
    }
}

impl ExtrudeSettings {
    fn bevelled(&self) -> bool {
        self.bevel_enabled && self.bevel_segments > 0
    }

    /// Ring heights and outline offsets from front to back.
    ///
    /// The first and last rings always sit on the un-offset outline so the
    /// caps can be triangulated from it.
    pub fn ring_profile(&self) -> Vec<Ring> {
        let steps = self.steps.max(1);
        let body = |step: u32, offset: f32| Ring {
            z: self.depth * step as f32 / steps as f32,
            offset,
        };

        if !self.bevelled() {
            return (0..=steps).map(|step| body(step, 0.0)).collect();
        }

        let segments = self.bevel_segments;
        let bevel = |i: u32, base: f32, sign: f32| {
            let angle = i as f32 / segments as f32 * FRAC_PI_2;
            Ring {
                z: base + sign * self.bevel_thickness * angle.cos(),
                offset: self.bevel_size * angle.sin(),
            }
        };

        let mut rings = Vec::with_capacity((2 * segments + steps + 1) as usize);
        rings.extend((0..=segments).map(|i| bevel(i, 0.0, -1.0)));
        rings.extend((1..=steps).map(|step| body(step, self.bevel_size)));
        rings.extend((0..segments).rev().map(|i| bevel(i, self.depth, 1.0)));
        rings
    }
}

/// One cross-section of the extrusion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ring {
    pub z: f32,
    /// Outward offset of the outline at this ring.
    pub offset: f32,
}

/// Sweeps `outline` into a closed solid.
///
/// Only the first sub-path is used. Normals are smoothed along the side
/// walls and flat on the caps.
pub fn extrude(outline: &Path, settings: &ExtrudeSettings) -> Result<RawGeometry> {
    let mut contour = flatten_contour(outline, settings.curve_tolerance);
    if contour.len() < 3 {
        return Err(HeartError::DegenerateOutline(contour.len()));
    }
    make_counter_clockwise(&mut contour);

    let rings = settings.ring_profile();
    let miters = miter_vectors(&contour);
    let (cap_points, cap_indices) = triangulate(&contour, settings.curve_tolerance)?;

    let mut geometry = RawGeometry::default();

    let ring_len = contour.len() as u32;
    for ring in &rings {
        for (point, miter) in contour.iter().zip(&miters) {
            let p = *point + *miter * ring.offset;
            geometry.push_position(p.extend(ring.z));
        }
    }

    for layer in 0..rings.len() as u32 - 1 {
        let near = layer * ring_len;
        let far = near + ring_len;
        for i in 0..ring_len {
            let j = (i + 1) % ring_len;
            geometry.push_triangle(near + i, near + j, far + j);
            geometry.push_triangle(near + i, far + j, far + i);
        }
    }

    // Caps get their own vertices so the wall normals do not bleed into them.
    let front_z = rings[0].z;
    let back_z = rings[rings.len() - 1].z;

    let front = geometry.vertices.len() as u32;
    for p in &cap_points {
        geometry.push_position(p.extend(front_z));
    }
    for tri in cap_indices.chunks_exact(3) {
        geometry.push_triangle(front + tri[0], front + tri[2], front + tri[1]);
    }

    let back = geometry.vertices.len() as u32;
    for p in &cap_points {
        geometry.push_position(p.extend(back_z));
    }
    for tri in cap_indices.chunks_exact(3) {
        geometry.push_triangle(back + tri[0], back + tri[1], back + tri[2]);
    }

    geometry.recalculate_normals();

    tracing::debug!(
        contour = contour.len(),
        rings = rings.len(),
        vertices = geometry.vertices.len(),
        triangles = geometry.triangle_count(),
        "extruded outline"
    );

    Ok(geometry)
}

/// Per-vertex offset directions for a counter-clockwise polygon.
///
/// Each vector is scaled so that moving a vertex by `offset * miter` moves
/// both adjacent edges outwards by `offset`. Near-reversals fall back to the
/// bisector to keep the spike bounded.
fn miter_vectors(polygon: &[Vec2]) -> Vec<Vec2> {
    let n = polygon.len();
    (0..n)
        .map(|i| {
            let prev = polygon[(i + n - 1) % n];
            let here = polygon[i];
            let next = polygon[(i + 1) % n];

            let n1 = outward_normal(here - prev);
            let n2 = outward_normal(next - here);
            let denom = 1.0 + n1.dot(n2);
            if denom > 0.2 {
                (n1 + n2) / denom
            } else {
                (n1 + n2).normalize_or(n1)
            }
        })
        .collect()
}

fn outward_normal(edge: Vec2) -> Vec2 {
    Vec2::new(edge.y, -edge.x).normalize_or_zero()
}

/// Triangulates a simple polygon. Triangles come back counter-clockwise.
fn triangulate(polygon: &[Vec2], tolerance: f32) -> Result<(Vec<Vec2>, Vec<u32>)> {
    let path = polygon_path(polygon);
    let mut buffers: VertexBuffers<Vec2, u32> = VertexBuffers::new();
    let mut tessellator = FillTessellator::new();

    tessellator.tessellate_path(
        &path,
        &FillOptions::tolerance(tolerance),
        &mut BuffersBuilder::new(&mut buffers, |vertex: FillVertex| {
            let p = vertex.position();
            Vec2::new(p.x, p.y)
        }),
    )?;

    let VertexBuffers {
        vertices,
        mut indices,
    } = buffers;

    for tri in indices.chunks_exact_mut(3) {
        let [a, b, c] = [
            vertices[tri[0] as usize],
            vertices[tri[1] as usize],
            vertices[tri[2] as usize],
        ];
        if (b - a).perp_dot(c - a) < 0.0 {
            tri.swap(1, 2);
        }
    }

    Ok((vertices, indices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::heart_outline;

    fn square() -> Path {
        polygon_path(&[
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 2.0),
        ])
    }

    #[test]
    fn default_profile_has_seven_rings() {
        let rings = ExtrudeSettings::default().ring_profile();
        assert_eq!(rings.len(), 7);

        let first = rings[0];
        let last = rings[rings.len() - 1];
        assert!((first.z + 1.0).abs() < 1e-6 && first.offset.abs() < 1e-6);
        assert!((last.z - 9.0).abs() < 1e-6 && last.offset.abs() < 1e-6);
        assert!(rings.windows(2).all(|w| w[0].z < w[1].z));
    }

    #[test]
    fn flat_profile_without_bevel() {
        let settings = ExtrudeSettings {
            bevel_enabled: false,
            ..Default::default()
        };
        let rings = settings.ring_profile();
        assert_eq!(
            rings,
            vec![
                Ring { z: 0.0, offset: 0.0 },
                Ring { z: 4.0, offset: 0.0 },
                Ring { z: 8.0, offset: 0.0 },
            ]
        );
    }

    #[test]
    fn square_prism_without_bevel() {
        let settings = ExtrudeSettings {
            depth: 3.0,
            bevel_enabled: false,
            steps: 1,
            ..Default::default()
        };
        let geometry = extrude(&square(), &settings).unwrap();

        let (min, max) = geometry.bounds();
        assert_eq!(min, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(max, Vec3::new(2.0, 2.0, 3.0));
        // 4 wall quads plus two caps of two triangles each
        assert_eq!(geometry.triangle_count(), 4 * 2 + 2 * 2);
    }

    #[test]
    fn bevel_grows_the_outline() {
        let geometry = extrude(&square(), &ExtrudeSettings::default()).unwrap();
        let (min, max) = geometry.bounds();
        assert!((min - Vec3::new(-1.0, -1.0, -1.0)).length() < 1e-5);
        assert!((max - Vec3::new(3.0, 3.0, 9.0)).length() < 1e-5);
    }

    #[test]
    fn caps_face_away_from_the_body() {
        let geometry = extrude(&heart_outline(), &ExtrudeSettings::default()).unwrap();

        let front: Vec<_> = geometry
            .vertices
            .iter()
            .filter(|v| Vec3::from(v.normal).distance(Vec3::NEG_Z) < 1e-4)
            .collect();
        let back: Vec<_> = geometry
            .vertices
            .iter()
            .filter(|v| Vec3::from(v.normal).distance(Vec3::Z) < 1e-4)
            .collect();

        assert!(!front.is_empty() && !back.is_empty());
        assert!(front.iter().all(|v| (v.position[2] + 1.0).abs() < 1e-5));
        assert!(back.iter().all(|v| (v.position[2] - 9.0).abs() < 1e-5));
    }

    #[test]
    fn heart_solid_bounds() {
        let geometry = extrude(&heart_outline(), &ExtrudeSettings::default()).unwrap();
        let (min, max) = geometry.bounds();

        assert!((min.z + 1.0).abs() < 1e-5);
        assert!((max.z - 9.0).abs() < 1e-5);
        assert!(min.x < -6.5 && min.x > -7.5);
        assert!(max.x > 16.5 && max.x < 17.5);
        assert!(max.y > 19.0);
    }

    #[test]
    fn side_walls_join_every_ring() {
        let settings = ExtrudeSettings::default();
        let outline = heart_outline();
        let contour_len = flatten_contour(&outline, settings.curve_tolerance).len();
        let geometry = extrude(&outline, &settings).unwrap();

        let walls = 2 * contour_len * (settings.ring_profile().len() - 1);
        assert!(geometry.triangle_count() > walls);
        assert!(geometry.indices.iter().all(|&i| (i as usize) < geometry.vertices.len()));
    }

    #[test]
    fn empty_outline_is_rejected() {
        let empty = Path::builder().build();
        assert!(matches!(
            extrude(&empty, &ExtrudeSettings::default()),
            Err(HeartError::DegenerateOutline(0))
        ));
    }

    #[test]
    fn miters_keep_edges_at_unit_distance() {
        let square = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];
        let miters = miter_vectors(&square);
        assert!((miters[0] - Vec2::new(-1.0, -1.0)).length() < 1e-6);
        assert!((miters[2] - Vec2::new(1.0, 1.0)).length() < 1e-6);
    }
}
