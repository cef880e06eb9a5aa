//! A minimal scene graph: a background color and a flat list of nodes.

use std::fmt;

use crate::geometry::RawGeometry;
use crate::mesh::Transform;

/// RGBA color with components in `[0, 1]`, stored in sRGB space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Opaque color from a `0xRRGGBB` literal.
    pub const fn from_hex(hex: u32) -> Self {
        Self::rgb(
            ((hex >> 16) & 0xff) as f32 / 255.0,
            ((hex >> 8) & 0xff) as f32 / 255.0,
            (hex & 0xff) as f32 / 255.0,
        )
    }

    /// Converts to linear light, for sRGB render targets.
    pub fn to_linear(self) -> Self {
        fn channel(c: f32) -> f32 {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        Self::rgba(channel(self.r), channel(self.g), channel(self.b), self.a)
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
}

/// Unlit single-color surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BasicMaterial {
    pub color: Color,
}

impl BasicMaterial {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

/// A mesh placed in the scene.
#[derive(Clone, Debug)]
pub struct MeshNode {
    pub geometry: RawGeometry,
    pub material: BasicMaterial,
    pub transform: Transform,
}

/// Entries of the scene graph.
#[derive(Clone, Debug)]
pub enum SceneNode {
    /// Marks that the camera belongs to this scene. The camera itself is
    /// passed alongside the scene when rendering.
    Camera,
    Mesh(MeshNode),
}

/// Handle to a node, stable for the lifetime of the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Root of the scene graph.
#[derive(Clone, Debug)]
pub struct Scene {
    pub background: Color,
    nodes: Vec<SceneNode>,
}

impl Scene {
    pub fn new(background: Color) -> Self {
        Self {
            background,
            nodes: Vec::new(),
        }
    }

    pub fn add(&mut self, node: SceneNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes().count()
    }

    pub fn has_camera(&self) -> bool {
        self.nodes.iter().any(|n| matches!(n, SceneNode::Camera))
    }

    /// Mesh nodes in insertion order.
    pub fn meshes(&self) -> impl Iterator<Item = (NodeId, &MeshNode)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, node)| match node {
                SceneNode::Mesh(mesh) => Some((NodeId(i), mesh)),
                SceneNode::Camera => None,
            })
    }

    pub fn mesh_mut(&mut self, id: NodeId) -> Option<&mut MeshNode> {
        match self.nodes.get_mut(id.0) {
            Some(SceneNode::Mesh(mesh)) => Some(mesh),
            _ => None,
        }
    }

    pub fn mesh(&self, id: NodeId) -> Option<&MeshNode> {
        match self.nodes.get(id.0) {
            Some(SceneNode::Mesh(mesh)) => Some(mesh),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_mesh() -> SceneNode {
        SceneNode::Mesh(MeshNode {
            geometry: RawGeometry::default(),
            material: BasicMaterial::new(Color::WHITE),
            transform: Transform::new(),
        })
    }

    #[test]
    fn hex_colors() {
        assert_eq!(Color::from_hex(0xff0000), Color::rgb(1.0, 0.0, 0.0));
        let grey = Color::from_hex(0xf0f0f0);
        assert_eq!(grey.r, 240.0 / 255.0);
        assert_eq!(grey.r, grey.b);
    }

    #[test]
    fn linear_conversion_keeps_extremes() {
        let white = Color::WHITE.to_linear();
        assert!((white.r - 1.0).abs() < 1e-5 && white.a == 1.0);
        assert_eq!(Color::BLACK.to_linear(), Color::BLACK);
        assert!(Color::from_hex(0xf0f0f0).to_linear().r < 240.0 / 255.0);
    }

    #[test]
    fn counts_only_mesh_nodes() {
        let mut scene = Scene::new(Color::BLACK);
        scene.add(SceneNode::Camera);
        let id = scene.add(empty_mesh());

        assert_eq!(scene.len(), 2);
        assert_eq!(scene.mesh_count(), 1);
        assert!(scene.has_camera());
        assert!(scene.mesh(id).is_some());
        assert!(scene.mesh(NodeId(0)).is_none());
    }

    #[test]
    fn mesh_mut_edits_in_place() {
        let mut scene = Scene::new(Color::BLACK);
        let id = scene.add(empty_mesh());
        scene.mesh_mut(id).unwrap().transform = Transform::new().uniform_scale(3.0);
        assert_eq!(scene.mesh(id).unwrap().transform.scale.x, 3.0);
    }
}
