use clap::Parser;
use tracing_subscriber::EnvFilter;

use heartview::{AppConfig, ViewportParams};

/// A rotating 3D heart. Drag with any mouse button to look around.
#[derive(Parser, Debug)]
#[command(name = "heartview", version, about)]
struct Cli {
    /// Heart rotation per frame around the X axis, in radians.
    #[arg(long, default_value_t = 0.005, allow_negative_numbers = true)]
    rotation_speed_x: f32,

    /// Heart rotation per frame around the Y axis, in radians.
    #[arg(long, default_value_t = 0.01, allow_negative_numbers = true)]
    rotation_speed_y: f32,

    /// Nominal heart size.
    #[arg(long, default_value_t = 200.0)]
    size: f32,

    /// Vertical field of view in degrees.
    #[arg(long, default_value_t = 50.0)]
    fov: f32,

    /// Near clipping plane distance.
    #[arg(long, default_value_t = 1.0)]
    near: f32,

    /// Far clipping plane distance.
    #[arg(long, default_value_t = 1000.0)]
    far: f32,

    /// Window title.
    #[arg(long, default_value = "Heart")]
    title: String,

    /// Initial window width in logical pixels.
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Initial window height in logical pixels.
    #[arg(long, default_value_t = 600)]
    height: u32,
}

impl Cli {
    fn viewport_params(&self) -> ViewportParams {
        ViewportParams::new()
            .rotation_speed(self.rotation_speed_x, self.rotation_speed_y)
            .size(self.size)
            .field_of_view(self.fov)
            .clipping_planes(self.near, self.far)
    }

    fn app_config(&self) -> AppConfig {
        AppConfig::new()
            .title(self.title.clone())
            .size(self.width, self.height)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("heartview=info")),
        )
        .init();

    let cli = Cli::parse();
    tracing::debug!(?cli, "starting");

    if let Err(err) = heartview::run(cli.app_config(), cli.viewport_params()) {
        tracing::error!("heartview failed: {err}");
        std::process::exit(1);
    }
}
