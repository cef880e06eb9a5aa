//! Embedding configuration for the viewer and its window.
//!
//! [`ViewportParams`] carries the six numeric inputs of the heart component.
//! They are fixed once the viewer is constructed: the builder methods consume
//! the value, and [`HeartViewer`](crate::HeartViewer) keeps its own copy.
//!
//! ```
//! use heartview::ViewportParams;
//!
//! let params = ViewportParams::new()
//!     .field_of_view(60.0)
//!     .clipping_planes(0.5, 2000.0);
//! assert!(params.validate().is_ok());
//! ```

use crate::error::{HeartError, Result};

/// Scalar camera and animation inputs, supplied once before the first frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportParams {
    rotation_speed_x: f32,
    rotation_speed_y: f32,
    size: f32,
    field_of_view: f32,
    near_clipping_plane: f32,
    far_clipping_plane: f32,
}

impl Default for ViewportParams {
    fn default() -> Self {
        Self {
            rotation_speed_x: 0.005,
            rotation_speed_y: 0.01,
            size: 200.0,
            field_of_view: 50.0,
            near_clipping_plane: 1.0,
            far_clipping_plane: 1000.0,
        }
    }
}

impl ViewportParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Heart rotation around X and Y, in radians per frame.
    pub fn rotation_speed(mut self, x: f32, y: f32) -> Self {
        self.rotation_speed_x = x;
        self.rotation_speed_y = y;
        self
    }

    pub fn size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    /// Vertical field of view in degrees.
    pub fn field_of_view(mut self, degrees: f32) -> Self {
        self.field_of_view = degrees;
        self
    }

    pub fn clipping_planes(mut self, near: f32, far: f32) -> Self {
        self.near_clipping_plane = near;
        self.far_clipping_plane = far;
        self
    }

    pub fn rotation_speed_x(&self) -> f32 {
        self.rotation_speed_x
    }

    pub fn rotation_speed_y(&self) -> f32 {
        self.rotation_speed_y
    }

    pub fn heart_size(&self) -> f32 {
        self.size
    }

    pub fn fov_degrees(&self) -> f32 {
        self.field_of_view
    }

    pub fn near_clipping_plane(&self) -> f32 {
        self.near_clipping_plane
    }

    pub fn far_clipping_plane(&self) -> f32 {
        self.far_clipping_plane
    }

    /// Rejects values that would produce a degenerate projection.
    pub fn validate(&self) -> Result<()> {
        let all = [
            self.rotation_speed_x,
            self.rotation_speed_y,
            self.size,
            self.field_of_view,
            self.near_clipping_plane,
            self.far_clipping_plane,
        ];
        if all.iter().any(|v| !v.is_finite()) {
            return Err(invalid("all viewport parameters must be finite"));
        }
        if self.field_of_view <= 0.0 || self.field_of_view >= 180.0 {
            return Err(invalid(format!(
                "field of view must be in (0, 180) degrees, got {}",
                self.field_of_view
            )));
        }
        if self.near_clipping_plane <= 0.0 {
            return Err(invalid(format!(
                "near clipping plane must be positive, got {}",
                self.near_clipping_plane
            )));
        }
        if self.far_clipping_plane <= self.near_clipping_plane {
            return Err(invalid(format!(
                "far clipping plane ({}) must lie beyond the near plane ({})",
                self.far_clipping_plane, self.near_clipping_plane
            )));
        }
        if self.size <= 0.0 {
            return Err(invalid(format!("size must be positive, got {}", self.size)));
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> HeartError {
    HeartError::InvalidConfig(msg.into())
}

/// Configuration for the app window.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Heart".to_string(),
            width: 800,
            height: 600,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_component_inputs() {
        let params = ViewportParams::default();
        assert_eq!(params.rotation_speed_x(), 0.005);
        assert_eq!(params.rotation_speed_y(), 0.01);
        assert_eq!(params.heart_size(), 200.0);
        assert_eq!(params.fov_degrees(), 50.0);
        assert_eq!(params.near_clipping_plane(), 1.0);
        assert_eq!(params.far_clipping_plane(), 1000.0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn rejects_inverted_clipping_planes() {
        let params = ViewportParams::new().clipping_planes(10.0, 5.0);
        assert!(matches!(
            params.validate(),
            Err(HeartError::InvalidConfig(_))
        ));
    }

    #[test]
    fn rejects_non_finite_values() {
        let params = ViewportParams::new().rotation_speed(f32::NAN, 0.0);
        assert!(params.validate().is_err());
    }

    #[test]
    fn rejects_flat_field_of_view() {
        assert!(ViewportParams::new().field_of_view(0.0).validate().is_err());
        assert!(ViewportParams::new().field_of_view(180.0).validate().is_err());
    }

    #[test]
    fn app_config_builder() {
        let config = AppConfig::new().title("Valentine").size(1024, 768);
        assert_eq!(config.title, "Valentine");
        assert_eq!((config.width, config.height), (1024, 768));
    }
}
