//! Filing index: one GET of the paginated listing, grouped by LEI.
//!
//! The index is requested as a single oversized page. Each usable entry
//! becomes a [`Filing`] filed under the legal-entity identifier taken from
//! its related-entity link; [`IdentifierMap::flatten`] turns the grouping
//! back into the download order.

mod error;
mod identifier_map;
mod parse;

pub use error::IndexError;
pub use identifier_map::IdentifierMap;
pub use parse::parse_index;

use crate::config::EsefConfig;
use crate::http::{self, HttpOptions};

/// One downloadable package referenced by the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filing {
    /// Country code as reported by the index.
    pub country: String,
    /// Package file name (decoded), e.g. `report.zip`.
    pub file_name: String,
    /// Decoded URL path of the containing directory, with its leading `/`.
    pub path: String,
}

/// An index entry dropped because a required key was absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub entry_id: String,
    /// The first key that could not be looked up.
    pub missing: String,
}

/// Parsed index: filings by LEI plus the entries that were skipped.
#[derive(Debug, Default, Clone)]
pub struct IndexListing {
    pub identifiers: IdentifierMap,
    pub skipped: Vec<SkippedEntry>,
    /// Number of entries in the response's `data` array.
    pub total_entries: usize,
}

/// `{base}api/filings?page[number]=0&page[size]={page_size}`.
pub fn index_url(base_url: &str, page_size: u64) -> String {
    format!(
        "{}/api/filings?page[number]=0&page[size]={}",
        base_url.trim_end_matches('/'),
        page_size
    )
}

/// Fetch and parse the whole filing index.
pub fn fetch_index(cfg: &EsefConfig) -> Result<IndexListing, IndexError> {
    let url = index_url(&cfg.base_url, cfg.page_size);
    tracing::info!(%url, "fetching filing index");
    let body = http::get_bytes(&url, &HttpOptions::from_config(cfg))?;
    let listing = parse_index(&body)?;
    tracing::info!(
        entries = listing.total_entries,
        identifiers = listing.identifiers.len(),
        filings = listing.identifiers.filing_count(),
        skipped = listing.skipped.len(),
        "filing index parsed"
    );
    Ok(listing)
}
