use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::config::{AppConfig, ViewportParams};
use crate::error::{HeartError, Result};
use crate::gpu::GpuContext;
use crate::render_loop::{FrameHandle, FrameScheduler};
use crate::renderer::MeshRenderer;
use crate::viewer::HeartViewer;

/// Frame scheduling backed by winit redraw requests.
///
/// winit cannot retract a redraw request, so cancelling only forgets the
/// handle. The viewer's loop refuses to draw once stopped.
pub struct WindowScheduler {
    window: Arc<Window>,
    next: u64,
    pending: Option<FrameHandle>,
}

impl WindowScheduler {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            next: 0,
            pending: None,
        }
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }
}

impl FrameScheduler for WindowScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next += 1;
        let handle = FrameHandle::new(self.next);
        self.pending = Some(handle);
        self.window.request_redraw();
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
        tracing::trace!(frame = handle.id(), "frame request withdrawn");
    }
}

type WindowViewer = HeartViewer<MeshRenderer, WindowScheduler>;

/// Open a window showing the rotating heart and run until it is closed.
///
/// # Example
/// ```no_run
/// use heartview::{AppConfig, ViewportParams};
///
/// heartview::run(
///     AppConfig::new().title("Heart").size(1024, 768),
///     ViewportParams::new().rotation_speed(0.0, 0.01),
/// )
/// .unwrap();
/// ```
pub fn run(config: AppConfig, params: ViewportParams) -> Result<()> {
    params.validate()?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = HeartApp::Pending { config, params };
    event_loop.run_app(&mut app)?;

    match app {
        HeartApp::Finished(Some(err)) => Err(err),
        _ => Ok(()),
    }
}

enum HeartApp {
    Pending {
        config: AppConfig,
        params: ViewportParams,
    },
    Running {
        window: Arc<Window>,
        viewer: WindowViewer,
    },
    Finished(Option<HeartError>),
}

impl HeartApp {
    fn launch(
        event_loop: &ActiveEventLoop,
        config: &AppConfig,
        params: ViewportParams,
    ) -> Result<(Arc<Window>, WindowViewer)> {
        let window_attrs = WindowAttributes::default()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let size = window.inner_size();
        let (width, height) = (size.width.max(1), size.height.max(1));

        let gpu = GpuContext::new(window.clone())?;
        let renderer = MeshRenderer::new(gpu);
        let scheduler = WindowScheduler::new(window.clone());

        let mut viewer = HeartViewer::new(params, width, height, renderer, scheduler)?;
        viewer.set_pixel_ratio(window.scale_factor());
        viewer.start();

        tracing::info!(width, height, title = %config.title, "window opened");
        Ok((window, viewer))
    }

    fn finish(&mut self, event_loop: &ActiveEventLoop, error: Option<HeartError>) {
        if let Some(err) = &error {
            tracing::error!("shutting down: {err}");
        }
        // Dropping the viewer disposes it.
        *self = HeartApp::Finished(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for HeartApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let HeartApp::Pending { config, params } = self else {
            return;
        };

        match Self::launch(event_loop, config, *params) {
            Ok((window, viewer)) => *self = HeartApp::Running { window, viewer },
            Err(err) => self.finish(event_loop, Some(err)),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let HeartApp::Running { window, viewer } = self else {
            return;
        };

        viewer.handle_window_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                viewer.dispose();
                self.finish(event_loop, None);
            }
            WindowEvent::Resized(size) => match viewer.resize(size.width, size.height) {
                Ok(()) => window.request_redraw(),
                Err(HeartError::ZeroSizedCanvas { .. }) => {
                    tracing::debug!("window minimized, keeping previous projection");
                }
                Err(err) => self.finish(event_loop, Some(err)),
            },
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                viewer.set_pixel_ratio(scale_factor);
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = viewer.frame() {
                    self.finish(event_loop, Some(err));
                }
            }
            _ => {}
        }
    }
}

