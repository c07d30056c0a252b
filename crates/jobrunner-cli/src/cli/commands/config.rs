//! `jobrunner config` – show where settings come from.

use anyhow::Result;
use jobrunner_core::{config, logging};

pub fn run_config() -> Result<()> {
    let path = config::config_path()?;
    let cfg = config::load_or_init()?;
    println!("config file: {}", path.display());
    if let Ok(log) = logging::log_file_path() {
        println!("log file:    {}", log.display());
    }
    println!("max_concurrent_inputs = {}", cfg.max_concurrent_inputs());
    Ok(())
}
