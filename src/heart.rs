//! The heart mesh: outline, extrusion, material and placement.

use std::f32::consts::PI;

use glam::{Quat, Vec3};

use crate::error::Result;
use crate::extrude::{ExtrudeSettings, extrude};
use crate::mesh::Transform;
use crate::scene::{BasicMaterial, Color, MeshNode};
use crate::shape::heart_outline;

pub const HEART_COLOR: Color = Color::from_hex(0xff0000);

/// Uniform scale applied to the extruded heart.
pub const HEART_SCALE: f32 = PI * 3.0;

/// Builds the heart as a mesh node at the origin, unrotated, scaled by
/// [`HEART_SCALE`].
pub fn heart_mesh(settings: &ExtrudeSettings) -> Result<MeshNode> {
    let geometry = extrude(&heart_outline(), settings)?;

    let (min, max) = geometry.bounds();
    tracing::debug!(
        vertices = geometry.vertices.len(),
        triangles = geometry.triangle_count(),
        extent = ?((max - min) * HEART_SCALE),
        "built heart geometry"
    );

    Ok(MeshNode {
        geometry,
        material: BasicMaterial::new(HEART_COLOR),
        transform: Transform::new()
            .position(Vec3::ZERO)
            .rotation(Quat::IDENTITY)
            .uniform_scale(HEART_SCALE),
    })
}
