//! Package downloader: one filing → one file under the archive root.
//!
//! The local layout mirrors the remote one: a package at
//! `{base}/US/1234/report.zip` lands at `{archive_root}/US/1234/report.zip`.
//! A file that already exists is never fetched again, whatever its size;
//! a partial file from an interrupted run therefore counts as present.

use crate::config::EsefConfig;
use crate::http::{self, HttpOptions};
use crate::index::Filing;
use crate::url_model::{encode_path, encode_segment};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// What [`download_package`] did with one filing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Fetched and written; `bytes` is the body length.
    Downloaded { bytes: u64 },
    /// Target file existed; no request was made.
    AlreadyPresent,
    /// Server answered 404; nothing was written.
    NotFound,
    /// File name is empty, `.` or `..`; no request was made.
    InvalidName,
}

/// `Downloading <url>`, printed before every package.
pub fn downloading_line(url: &str) -> String {
    format!("Downloading {url}")
}

/// `Skipping download of <url>`, printed when the server answers 404.
pub fn skipping_line(url: &str) -> String {
    format!("Skipping download of {url}")
}

/// Printed for a filing whose file name cannot be stored under the archive.
pub fn invalid_name_line(url: &str, file_name: &str) -> String {
    format!("Skipping download of {url}: unusable file name {file_name:?}")
}

/// True for a single normal path component (not empty, `.`, `..` or containing a separator).
fn is_plain_segment(segment: &str) -> bool {
    matches!(
        Path::new(segment).components().next(),
        Some(Component::Normal(_))
    ) && !segment.contains('/')
        && !segment.contains(std::path::MAIN_SEPARATOR)
}

/// Download URL of a filing: base URL, encoded path, encoded file name.
pub fn package_url(base_url: &str, filing: &Filing) -> String {
    let base = base_url.trim_end_matches('/');
    let path = filing.path.trim_start_matches('/');
    let name = encode_segment(&filing.file_name);
    if path.is_empty() {
        format!("{base}/{name}")
    } else {
        format!("{base}/{}/{name}", encode_path(path))
    }
}

/// Local directory for a filing: `archive_root` joined with the filing path minus its leading `/`.
///
/// Empty, `.` and `..` segments are dropped so a hostile index cannot escape the archive root.
pub fn target_dir(archive_root: &Path, filing: &Filing) -> PathBuf {
    let mut dir = archive_root.to_path_buf();
    for segment in filing.path.split('/') {
        if is_plain_segment(segment) {
            dir.push(segment);
        }
    }
    dir
}

/// Local file path for a filing.
pub fn target_path(archive_root: &Path, filing: &Filing) -> PathBuf {
    target_dir(archive_root, filing).join(&filing.file_name)
}

/// Downloads one filing into the archive unless it is already there.
///
/// A 404 or an unusable file name is reported and skipped; every other failure is returned.
pub fn download_package(cfg: &EsefConfig, filing: &Filing) -> Result<DownloadOutcome> {
    let url = package_url(&cfg.base_url, filing);
    let dir = target_dir(&cfg.archive_root, filing);

    fs::create_dir_all(&dir).with_context(|| format!("create directory {}", dir.display()))?;

    println!("{}", downloading_line(&url));

    if !is_plain_segment(&filing.file_name) {
        println!("{}", invalid_name_line(&url, &filing.file_name));
        tracing::warn!(%url, file_name = %filing.file_name, "unusable package file name, skipped");
        return Ok(DownloadOutcome::InvalidName);
    }

    let dest = dir.join(&filing.file_name);
    if dest.exists() {
        tracing::debug!(path = %dest.display(), "already downloaded");
        return Ok(DownloadOutcome::AlreadyPresent);
    }

    match http::get_to_file(&url, &dest, &HttpOptions::from_config(cfg)) {
        Ok(bytes) => {
            tracing::info!(%url, path = %dest.display(), bytes, "package downloaded");
            Ok(DownloadOutcome::Downloaded { bytes })
        }
        Err(e) if e.is_not_found() => {
            println!("{}", skipping_line(&url));
            tracing::warn!(%url, "package not found, skipped");
            Ok(DownloadOutcome::NotFound)
        }
        Err(e) => {
            tracing::error!(%url, "package download failed: {}", e);
            Err(anyhow::Error::new(e).context(format!("download {url}")))
        }
    }
}
