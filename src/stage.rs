//! Scene setup: the background, the camera and the single heart.

use crate::camera::{PerspectiveCamera, aspect_ratio};
use crate::config::ViewportParams;
use crate::error::Result;
use crate::extrude::ExtrudeSettings;
use crate::heart::heart_mesh;
use crate::scene::{Color, MeshNode, NodeId, Scene, SceneNode};

pub const BACKGROUND: Color = Color::from_hex(0xf0f0f0);

/// The scene, its camera and the heart node.
///
/// Built in one step so the heart is inserted exactly once per scene; there
/// is no way to add a second heart through a `Stage`.
#[derive(Clone, Debug)]
pub struct Stage {
    scene: Scene,
    camera: PerspectiveCamera,
    heart: NodeId,
}

impl Stage {
    /// Sets up the scene for a canvas of the given pixel size.
    pub fn new(params: &ViewportParams, canvas_width: u32, canvas_height: u32) -> Result<Self> {
        let aspect = aspect_ratio(canvas_width, canvas_height)?;

        let mut scene = Scene::new(BACKGROUND);
        let camera = PerspectiveCamera::new(
            params.fov_degrees(),
            aspect,
            params.near_clipping_plane(),
            params.far_clipping_plane(),
        );
        scene.add(SceneNode::Camera);

        let heart = scene.add(SceneNode::Mesh(heart_mesh(&ExtrudeSettings::default())?));

        tracing::debug!(
            aspect,
            fov = params.fov_degrees(),
            size = params.heart_size(),
            "stage ready"
        );

        Ok(Self {
            scene,
            camera,
            heart,
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut PerspectiveCamera {
        &mut self.camera
    }

    pub fn heart_id(&self) -> NodeId {
        self.heart
    }

    pub fn heart(&self) -> &MeshNode {
        match self.scene.mesh(self.heart) {
            Some(mesh) => mesh,
            None => unreachable!("heart node is inserted by Stage::new"),
        }
    }

    pub fn heart_mut(&mut self) -> &mut MeshNode {
        match self.scene.mesh_mut(self.heart) {
            Some(mesh) => mesh,
            None => unreachable!("heart node is inserted by Stage::new"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CAMERA_POSITION;
    use crate::error::HeartError;

    #[test]
    fn stage_holds_exactly_one_mesh() {
        let stage = Stage::new(&ViewportParams::default(), 800, 600).unwrap();
        assert_eq!(stage.scene().mesh_count(), 1);
        assert!(stage.scene().has_camera());
        assert_eq!(stage.scene().background, BACKGROUND);
    }

    #[test]
    fn camera_uses_params_and_canvas() {
        let params = ViewportParams::new()
            .field_of_view(70.0)
            .clipping_planes(2.0, 500.0);
        let stage = Stage::new(&params, 1000, 500).unwrap();

        let camera = stage.camera();
        assert_eq!(camera.fov, 70.0);
        assert_eq!(camera.near, 2.0);
        assert_eq!(camera.far, 500.0);
        assert_eq!(camera.aspect, 2.0);
        assert_eq!(camera.position(), CAMERA_POSITION);
    }

    #[test]
    fn zero_height_canvas_is_refused() {
        assert!(matches!(
            Stage::new(&ViewportParams::default(), 800, 0),
            Err(HeartError::ZeroSizedCanvas { .. })
        ));
    }
}
