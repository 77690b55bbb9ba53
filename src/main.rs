use std::path::PathBuf;

use anyhow::Context;

use piazza::PiazzaConfig;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("piazza=info"))
        .init();

    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = PiazzaConfig::discover(path.as_deref()).context("failed to load configuration")?;
    log::info!(
        "opening {}x{} window, {:?} detail",
        config.window.width,
        config.window.height,
        config.scene.detail
    );

    piazza::run(config)
}
