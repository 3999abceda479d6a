//! Bean Game - Main Entry Point
//!
//! One binary for every build variant: flat desktop by default, the VR
//! modes behind runtime flags (and the `vr` cargo feature).

use clap::Parser;

use bean_client::vr::VrOptions;
use bean_client::RunOptions;

#[derive(Parser, Debug)]
#[command(name = "bean-game", about = "Multiplayer capsule sandbox")]
struct Cli {
    /// Server address (overrides the config default; editable on the
    /// title screen either way)
    server: Option<String>,

    /// Path to a TOML config file
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Render to a VR headset
    #[arg(long)]
    vr: bool,

    /// VR with depth layer submission (implies --vr)
    #[arg(long)]
    vr_depth: bool,

    /// VR with one double-wide swapchain (implies --vr)
    #[arg(long)]
    vr_doublewide: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let vr = VrOptions {
        enabled: cli.vr || cli.vr_depth || cli.vr_doublewide,
        submit_depth: cli.vr_depth,
        doublewide: cli.vr_doublewide,
    };

    bean_client::run(RunOptions {
        config_path: cli.config,
        server_addr: cli.server,
        vr,
    })
}
