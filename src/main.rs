#![cfg_attr(all(target_os = "windows", not(debug_assertions)), windows_subsystem = "windows")]

use overlay_timer::config::Config;
use overlay_timer::logging;

fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    logging::init(config.debug_logging, config.log_file.clone());
    for warning in &config.warnings {
        tracing::warn!(%warning, "configuration");
    }
    tracing::info!(hotkey = %config.hotkey, "starting overlay timer");

    run(config)
}

#[cfg(target_os = "windows")]
fn run(config: Config) -> anyhow::Result<()> {
    overlay_timer::platform::windows::run(config)
}

#[cfg(not(target_os = "windows"))]
fn run(_config: Config) -> anyhow::Result<()> {
    tracing::error!("overlay timer only runs on Windows");
    anyhow::bail!("unsupported platform: {}", std::env::consts::OS)
}
