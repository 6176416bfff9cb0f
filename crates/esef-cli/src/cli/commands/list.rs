//! `esef list` – print the index grouped by LEI.

use anyhow::{Context, Result};
use esef_core::config::EsefConfig;
use esef_core::downloader;
use esef_core::index;
use esef_core::sync::report_skipped;

pub fn run_list(cfg: &EsefConfig) -> Result<()> {
    let listing = index::fetch_index(cfg).context("fetch filing index")?;
    report_skipped(&listing);

    if listing.identifiers.is_empty() {
        println!("No filings in index.");
        return Ok(());
    }
    println!("{:<20} {:<8} {}", "LEI", "COUNTRY", "URL");
    for (lei, filings) in listing.identifiers.iter() {
        for f in filings {
            println!(
                "{:<20} {:<8} {}",
                lei,
                f.country,
                downloader::package_url(&cfg.base_url, f)
            );
        }
    }
    println!(
        "{} filings from {} entities ({} entries skipped)",
        listing.identifiers.filing_count(),
        listing.identifiers.len(),
        listing.skipped.len()
    );
    Ok(())
}
