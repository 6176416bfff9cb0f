use crate::http::HttpError;
use thiserror::Error;

/// Failures that abort index retrieval. Per-entry lookup failures are not
/// errors; they end up in [`super::IndexListing::skipped`].
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("index request failed: {0}")]
    Http(#[from] HttpError),
    #[error("index response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("index response has no `data` array")]
    MissingData,
}
