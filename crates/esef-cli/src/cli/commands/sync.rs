//! `esef sync` – mirror every package into the archive.

use anyhow::Result;
use esef_core::config::EsefConfig;
use esef_core::sync;

pub fn run_sync(cfg: &EsefConfig) -> Result<()> {
    tracing::info!(
        base_url = %cfg.base_url,
        archive = %cfg.archive_root.display(),
        "starting sync"
    );
    let summary = sync::run_sync(cfg)?;
    println!("Done: {} items, {summary}", summary.total());
    Ok(())
}
