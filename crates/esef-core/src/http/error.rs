//! Error type for blocking GET requests.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    /// libcurl failed (resolve, connect, timeout, aborted write).
    #[error("curl: {0}")]
    Curl(#[from] curl::Error),
    /// Final response status was outside 2xx.
    #[error("GET {url} returned HTTP {code}")]
    Status { url: String, code: u32 },
    /// Writing the response body to disk failed.
    #[error("write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl HttpError {
    pub fn status_code(&self) -> Option<u32> {
        match self {
            HttpError::Status { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}
