//! Bean Game Client
//!
//! Window, renderer, screens, input, networking, and VR glue. The
//! platform-free rules live in `bean-core`; this crate wires them to
//! winit, wgpu, gilrs, UDP, and (optionally) OpenXR.

pub mod app;
pub mod config;
pub mod gamepad;
pub mod hud;
pub mod input;
pub mod net;
pub mod renderer;
pub mod scene;
pub mod title;
pub mod vr;

use std::path::PathBuf;

use winit::event_loop::EventLoop;

use app::App;
use config::ClientConfig;
use vr::{VrOptions, VrSession};

/// Everything `main` hands over.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Path to a TOML config file.
    pub config_path: Option<PathBuf>,

    /// Server address overriding the config default.
    pub server_addr: Option<String>,

    /// VR mode selection.
    pub vr: VrOptions,
}

/// Run the game.
pub fn run(options: RunOptions) -> anyhow::Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("bean_client=debug".parse()?)
                .add_directive("bean_core=debug".parse()?),
        )
        .init();

    if options.vr.enabled && !VrSession::available() {
        anyhow::bail!("VR requested, but this binary was built without the 'vr' feature");
    }

    let mut config = ClientConfig::load_or_default(options.config_path.as_deref());
    if let Some(server_addr) = options.server_addr {
        config.server_addr = server_addr;
    }

    tracing::info!("starting Bean Game");

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, options.vr);

    event_loop.run_app(&mut app)?;

    Ok(())
}
