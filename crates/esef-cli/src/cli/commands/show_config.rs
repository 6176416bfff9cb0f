//! `esef config` – show where settings come from and what they resolve to.

use anyhow::Result;
use esef_core::config::{self, EsefConfig};
use esef_core::logging;

pub fn run_show_config(cfg: &EsefConfig) -> Result<()> {
    println!("config file: {}", config::config_path()?.display());
    if let Ok(log) = logging::log_file_path() {
        println!("log file:    {}", log.display());
    }
    println!();
    print!("{}", cfg.to_toml_string()?);
    Ok(())
}
