use glam::{Mat4, Vec3};

use crate::error::{HeartError, Result};

/// Where the camera sits. It never moves; dragging only turns it.
pub const CAMERA_POSITION: Vec3 = Vec3::new(50.0, 75.0, 500.0);

/// Latitude is clamped to this many degrees when it is turned into a look
/// direction, so the view never flips over the poles.
pub const MAX_LOOK_LATITUDE: f32 = 85.0;

/// Width over height of a canvas.
///
/// A canvas with no area has no meaningful aspect; callers must wait until
/// the surface has been laid out.
pub fn aspect_ratio(width: u32, height: u32) -> Result<f32> {
    if width == 0 || height == 0 {
        return Err(HeartError::ZeroSizedCanvas { width, height });
    }
    Ok(width as f32 / height as f32)
}

/// A perspective camera with a cached projection matrix.
///
/// Changing [`aspect`](Self::aspect) or the clipping planes does not touch the
/// projection until [`update_projection_matrix`](Self::update_projection_matrix)
/// is called, mirroring how scene-graph cameras usually behave.
#[derive(Clone, Debug)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    position: Vec3,
    forward: Vec3,
    up: Vec3,
    projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            fov: fov_degrees,
            aspect,
            near,
            far,
            position: CAMERA_POSITION,
            forward: Vec3::NEG_Z,
            up: Vec3::Y,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Unit vector the camera looks along.
    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Recompute the projection from the current fov, aspect and planes.
    pub fn update_projection_matrix(&mut self) {
        self.projection =
            Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far);
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }

    /// Point the camera from its fixed position using drag angles in degrees.
    ///
    /// Latitude tilts the view up (positive) or down, longitude turns it
    /// around the vertical axis. `(0, 0)` looks straight down -Z.
    pub fn orient(&mut self, latitude: f32, longitude: f32) {
        self.forward = look_direction(latitude, longitude);
    }
}

/// Unit look vector for a latitude/longitude pair in degrees.
pub fn look_direction(latitude: f32, longitude: f32) -> Vec3 {
    let latitude = latitude.clamp(-MAX_LOOK_LATITUDE, MAX_LOOK_LATITUDE);
    let phi = (90.0 - latitude).to_radians();
    let theta = longitude.to_radians();

    Vec3::new(
        phi.sin() * theta.sin(),
        phi.cos(),
        -phi.sin() * theta.cos(),
    )
    .normalize_or(Vec3::NEG_Z)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn aspect_ratio_is_width_over_height() {
        assert_eq!(aspect_ratio(800, 600).unwrap(), 800.0 / 600.0);
        assert_eq!(aspect_ratio(1920, 1080).unwrap(), 1920.0 / 1080.0);
        assert_eq!(aspect_ratio(300, 300).unwrap(), 1.0);
    }

    #[test]
    fn aspect_ratio_rejects_empty_canvas() {
        assert!(matches!(
            aspect_ratio(640, 0),
            Err(HeartError::ZeroSizedCanvas {
                width: 640,
                height: 0
            })
        ));
        assert!(aspect_ratio(0, 480).is_err());
    }

    #[test]
    fn camera_starts_at_fixed_point_looking_down_negative_z() {
        let camera = PerspectiveCamera::new(50.0, 1.5, 1.0, 1000.0);
        assert_eq!(camera.position(), CAMERA_POSITION);
        assert_eq!(camera.forward(), Vec3::NEG_Z);
    }

    #[test]
    fn projection_only_changes_after_update() {
        let mut camera = PerspectiveCamera::new(50.0, 1.0, 1.0, 1000.0);
        let before = camera.projection_matrix();

        camera.set_aspect(2.0);
        assert_eq!(camera.projection_matrix(), before);

        camera.update_projection_matrix();
        assert_ne!(camera.projection_matrix(), before);
    }

    #[test]
    fn orientation_follows_latitude_and_longitude() {
        assert!(close(look_direction(0.0, 0.0), Vec3::NEG_Z));
        assert!(close(look_direction(0.0, 90.0), Vec3::X));
        assert!(close(look_direction(0.0, -90.0), Vec3::NEG_X));

        let up = look_direction(45.0, 0.0);
        assert!(up.y > 0.0 && up.z < 0.0);
    }

    #[test]
    fn orientation_clamps_at_the_poles() {
        let clamped = look_direction(400.0, 0.0);
        assert!(close(clamped, look_direction(MAX_LOOK_LATITUDE, 0.0)));
        assert!(clamped.y < 1.0);
    }

    #[test]
    fn orient_updates_view_matrix() {
        let mut camera = PerspectiveCamera::new(50.0, 1.0, 1.0, 1000.0);
        let before = camera.view_matrix();
        camera.orient(-2.0, -5.0);
        assert_ne!(camera.view_matrix(), before);
        assert_eq!(camera.position(), CAMERA_POSITION);
    }
}
