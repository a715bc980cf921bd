//! Entry point for the mesh viewer.
//! Logging + CLI flags, then hand over to the platform loop.

use anyhow::Result;

mod cli;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = cli::parse_args(std::env::args().skip(1));
    log::info!(
        "Starting mesh viewer. Backend: {:?}, show_fps={}, window_size={}x{}, models={}",
        config.backends,
        config.show_fps,
        config.width,
        config.height,
        config.models.len()
    );
    for model in &config.models {
        log::debug!("  model {} at {:?}", model.path.display(), model.position);
    }

    platform::run(config)?;

    log::info!("Graceful shutdown. Bye!");
    Ok(())
}
