//! Full run: fetch the index, flatten it, download every package in order.
//!
//! Strictly sequential. The first fatal error stops the run; re-running picks
//! up where it stopped since present files are skipped.

use crate::config::EsefConfig;
use crate::downloader::{self, DownloadOutcome};
use crate::index::{self, Filing, IndexListing, SkippedEntry};
use anyhow::{Context, Result};
use std::fmt;
use std::time::Instant;

/// A `Parsing i/n` line is printed before every this many items.
pub const PROGRESS_EVERY: usize = 10;

/// Per-run counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncSummary {
    pub downloaded: usize,
    pub already_present: usize,
    pub not_found: usize,
    /// Filings skipped for an unusable file name.
    pub invalid_name: usize,
    /// Bytes written by this run.
    pub bytes: u64,
}

impl SyncSummary {
    pub fn record(&mut self, outcome: DownloadOutcome) {
        match outcome {
            DownloadOutcome::Downloaded { bytes } => {
                self.downloaded += 1;
                self.bytes += bytes;
            }
            DownloadOutcome::AlreadyPresent => self.already_present += 1,
            DownloadOutcome::NotFound => self.not_found += 1,
            DownloadOutcome::InvalidName => self.invalid_name += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.downloaded + self.already_present + self.not_found + self.invalid_name
    }
}

impl fmt::Display for SyncSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} downloaded ({} bytes), {} already present, {} not found",
            self.downloaded, self.bytes, self.already_present, self.not_found
        )?;
        if self.invalid_name > 0 {
            write!(f, ", {} with unusable file names", self.invalid_name)?;
        }
        Ok(())
    }
}

/// `Parsing idx/total` for every [`PROGRESS_EVERY`]th item, starting at 0.
pub fn progress_line(idx: usize, total: usize) -> Option<String> {
    (idx % PROGRESS_EVERY == 0).then(|| format!("Parsing {idx}/{total}"))
}

/// `<n> items found`, printed once before the download loop.
pub fn found_line(total: usize) -> String {
    format!("{total} items found")
}

/// `KeyError: '<key>' for entry <id>, it will be ignored`.
pub fn skipped_line(skipped: &SkippedEntry) -> String {
    format!(
        "KeyError: '{}' for entry {}, it will be ignored",
        skipped.missing, skipped.entry_id
    )
}

/// Prints one `KeyError` line per skipped index entry.
pub fn report_skipped(listing: &IndexListing) {
    for skipped in &listing.skipped {
        println!("{}", skipped_line(skipped));
    }
}

/// Downloads `filings` one after another.
pub fn download_all(cfg: &EsefConfig, filings: &[Filing]) -> Result<SyncSummary> {
    let total = filings.len();
    println!("{}", found_line(total));

    let mut summary = SyncSummary::default();
    for (idx, filing) in filings.iter().enumerate() {
        if let Some(line) = progress_line(idx, total) {
            println!("{line}");
        }
        let outcome = downloader::download_package(cfg, filing)?;
        summary.record(outcome);
    }
    Ok(summary)
}

/// Fetches the index and mirrors every referenced package into `cfg.archive_root`.
pub fn run_sync(cfg: &EsefConfig) -> Result<SyncSummary> {
    let started = Instant::now();
    let listing = index::fetch_index(cfg).context("fetch filing index")?;
    report_skipped(&listing);

    let filings = listing.identifiers.flatten();
    let summary = download_all(cfg, &filings)?;

    tracing::info!(
        downloaded = summary.downloaded,
        already_present = summary.already_present,
        not_found = summary.not_found,
        bytes = summary.bytes,
        elapsed = ?started.elapsed(),
        "sync finished"
    );
    Ok(summary)
}
