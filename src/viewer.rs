//! The heart component: stage, pointer state, frame loop and renderer.
//!
//! # Lifecycle
//!
//! 1. [`HeartViewer::new`] builds the scene, the camera and the heart, then
//!    sizes the renderer to the canvas.
//! 2. [`HeartViewer::start`] requests the first frame.
//! 3. The platform calls [`HeartViewer::frame`] once per display refresh.
//!    Each call schedules the next frame, advances the heart's rotation,
//!    points the camera from the drag angles and draws.
//! 4. [`HeartViewer::dispose`] (or dropping the viewer) cancels the pending
//!    frame and releases the renderer. Frames delivered afterwards draw
//!    nothing.
//!
//! The viewer is generic over its [`SceneRenderer`] and [`FrameScheduler`],
//! so it can run against the wgpu renderer and a winit window, or against
//! test doubles.

use glam::{EulerRot, Quat, Vec2};
use winit::event::WindowEvent;

use crate::camera::aspect_ratio;
use crate::config::ViewportParams;
use crate::error::Result;
use crate::interaction::{PointerInteraction, Propagation};
use crate::render_loop::{FrameScheduler, LoopState, RenderLoop};
use crate::renderer::SceneRenderer;
use crate::stage::Stage;

pub struct HeartViewer<R: SceneRenderer, S: FrameScheduler> {
    params: ViewportParams,
    stage: Stage,
    pointer: PointerInteraction,
    render_loop: RenderLoop,
    /// Accumulated heart rotation around X and Y, in radians.
    spin: Vec2,
    renderer: Option<R>,
    scheduler: S,
}

impl<R: SceneRenderer, S: FrameScheduler> HeartViewer<R, S> {
    /// Sets up the scene for a canvas of `canvas_width` x `canvas_height`
    /// physical pixels and sizes `renderer` to match.
    pub fn new(
        params: ViewportParams,
        canvas_width: u32,
        canvas_height: u32,
        mut renderer: R,
        scheduler: S,
    ) -> Result<Self> {
        params.validate()?;
        let stage = Stage::new(&params, canvas_width, canvas_height)?;
        renderer.set_size(canvas_width, canvas_height);

        Ok(Self {
            params,
            stage,
            pointer: PointerInteraction::new(),
            render_loop: RenderLoop::new(),
            spin: Vec2::ZERO,
            renderer: Some(renderer),
            scheduler,
        })
    }

    pub fn params(&self) -> &ViewportParams {
        &self.params
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn pointer(&self) -> &PointerInteraction {
        &self.pointer
    }

    /// The renderer, or `None` once the viewer has been disposed.
    pub fn renderer(&self) -> Option<&R> {
        self.renderer.as_ref()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn loop_state(&self) -> LoopState {
        self.render_loop.state()
    }

    /// Requests the first frame. Only the first call has any effect.
    pub fn start(&mut self) -> bool {
        if self.renderer.is_none() {
            return false;
        }
        self.render_loop.start(&mut self.scheduler)
    }

    /// One iteration of the frame loop.
    ///
    /// Returns whether a frame was presented. Frames the renderer skips
    /// (a surface being reconfigured, say) still keep the loop going.
    pub fn frame(&mut self) -> Result<bool> {
        if !self.render_loop.begin_frame(&mut self.scheduler) {
            return Ok(false);
        }

        self.animate();
        self.stage
            .camera_mut()
            .orient(self.pointer.latitude(), self.pointer.longitude());

        match self.renderer.as_mut() {
            Some(renderer) => renderer.render(self.stage.scene(), self.stage.camera()),
            None => Ok(false),
        }
    }

    fn animate(&mut self) {
        self.spin += Vec2::new(
            self.params.rotation_speed_x(),
            self.params.rotation_speed_y(),
        );
        self.stage.heart_mut().transform.rotation =
            Quat::from_euler(EulerRot::XYZ, self.spin.x, self.spin.y, 0.0);
    }

    /// Follows a canvas resize: new aspect, new projection, new output size.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        let aspect = aspect_ratio(width, height)?;

        let camera = self.stage.camera_mut();
        camera.set_aspect(aspect);
        camera.update_projection_matrix();

        if let Some(renderer) = self.renderer.as_mut() {
            renderer.set_size(width, height);
        }

        tracing::debug!(width, height, aspect, "viewer resized");
        Ok(())
    }

    pub fn set_pixel_ratio(&mut self, ratio: f64) {
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.set_pixel_ratio(ratio);
        }
    }

    pub fn pointer_down(&mut self, position: Vec2) {
        self.pointer.pointer_down(position);
    }

    pub fn pointer_move(&mut self, position: Vec2) -> Propagation {
        self.pointer.pointer_move(position)
    }

    pub fn pointer_up(&mut self) {
        self.pointer.pointer_up();
    }

    /// Routes pointer events from the window to the drag handlers.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> Propagation {
        self.pointer.handle_event(event)
    }

    /// Stops the frame loop and releases the renderer. Idempotent.
    pub fn dispose(&mut self) {
        if self.render_loop.state() != LoopState::Stopped {
            self.render_loop.stop(&mut self.scheduler);
        }
        if self.renderer.take().is_some() {
            tracing::info!("viewer disposed, renderer released");
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.renderer.is_none()
    }
}

impl<R: SceneRenderer, S: FrameScheduler> Drop for HeartViewer<R, S> {
    fn drop(&mut self) {
        self.dispose();
    }
}
