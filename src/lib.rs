//! # Heartview
//!
//! **A rotating, extruded 3D heart you can look around with the mouse.**
//!
//! ## Quick Start
//!
//! ```no_run
//! use heartview::{AppConfig, ViewportParams};
//!
//! fn main() -> heartview::Result<()> {
//!     heartview::run(AppConfig::default(), ViewportParams::default())
//! }
//! ```
//!
//! ## How it fits together
//!
//! - [`shape`] traces the heart outline and [`extrude`] turns it into a
//!   bevelled solid.
//! - [`Stage`] owns the scene, its camera and the single heart node.
//! - [`HeartViewer`] drives the stage: pointer drags turn the camera, each
//!   frame advances the heart's rotation, and resizes keep the projection in
//!   step with the canvas.
//! - [`run`] hosts a viewer in a winit window with the wgpu [`MeshRenderer`].
//!
//! The viewer is generic over [`SceneRenderer`] and [`FrameScheduler`], so the
//! whole lifecycle can be exercised without a window or a GPU.

mod app;
mod camera;
mod config;
mod error;
pub mod extrude;
mod geometry;
mod gpu;
mod heart;
mod interaction;
mod mesh;
mod render_loop;
mod renderer;
pub mod scene;
pub mod shape;
mod stage;
mod viewer;

pub use app::{WindowScheduler, run};
pub use camera::{
    CAMERA_POSITION, MAX_LOOK_LATITUDE, PerspectiveCamera, aspect_ratio, look_direction,
};
pub use config::{AppConfig, ViewportParams};
pub use error::{HeartError, Result};
pub use extrude::{ExtrudeSettings, extrude};
pub use geometry::RawGeometry;
pub use gpu::GpuContext;
pub use heart::{HEART_COLOR, HEART_SCALE, heart_mesh};
pub use interaction::{DRAG_SENSITIVITY, PointerInteraction, Propagation};
pub use mesh::{Mesh, Transform, Vertex3d};
pub use render_loop::{FrameHandle, FrameScheduler, LoopState, RenderLoop};
pub use renderer::{MeshRenderer, SceneRenderer};
pub use scene::{BasicMaterial, Color, MeshNode, NodeId, Scene, SceneNode};
pub use stage::{BACKGROUND, Stage};
pub use viewer::HeartViewer;

// Re-export glam math types for convenience
pub use glam::{Mat4, Quat, Vec2, Vec3};
