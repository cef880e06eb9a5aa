use lyon::tessellation::TessellationError;

/// Errors surfaced by the viewer, the geometry builder and the GPU layer.
#[derive(Debug, thiserror::Error)]
pub enum HeartError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("canvas has no area ({width}x{height})")]
    ZeroSizedCanvas { width: u32, height: u32 },

    #[error("outline flattened to {0} points, need at least 3")]
    DegenerateOutline(usize),

    #[error("tessellation error: {0}")]
    Tessellation(String),

    #[error("surface error: {0}")]
    Surface(String),

    #[error("no suitable GPU adapter found")]
    AdapterNotFound,

    #[error("device error: {0}")]
    Device(String),

    #[error("window error: {0}")]
    Window(String),

    #[error("event loop error: {0}")]
    EventLoop(String),
}

pub type Result<T> = std::result::Result<T, HeartError>;

impl From<TessellationError> for HeartError {
    fn from(e: TessellationError) -> Self {
        HeartError::Tessellation(format!("{e:?}"))
    }
}

impl From<wgpu::SurfaceError> for HeartError {
    fn from(e: wgpu::SurfaceError) -> Self {
        HeartError::Surface(e.to_string())
    }
}

impl From<wgpu::CreateSurfaceError> for HeartError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        HeartError::Surface(e.to_string())
    }
}

impl From<wgpu::RequestDeviceError> for HeartError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        HeartError::Device(e.to_string())
    }
}

impl From<winit::error::OsError> for HeartError {
    fn from(e: winit::error::OsError) -> Self {
        HeartError::Window(e.to_string())
    }
}

impl From<winit::error::EventLoopError> for HeartError {
    fn from(e: winit::error::EventLoopError) -> Self {
        HeartError::EventLoop(e.to_string())
    }
}
