//! Blocking HTTP GET over libcurl's Easy interface.
//!
//! Two entry points: [`get_bytes`] buffers a whole response (the filing
//! index), [`get_to_file`] streams a package body to disk. Both follow
//! redirects and treat any final status outside 2xx as [`HttpError::Status`].

mod error;
mod status;

pub use error::HttpError;
use status::{is_success, parse_status_line};

use crate::config::EsefConfig;
use std::cell::Cell;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

const MAX_REDIRECTIONS: u32 = 10;

/// Per-request settings derived from [`EsefConfig`].
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl HttpOptions {
    pub fn from_config(cfg: &EsefConfig) -> Self {
        Self {
            user_agent: cfg.user_agent.clone(),
            connect_timeout: cfg.connect_timeout(),
            timeout: cfg.timeout(),
        }
    }
}

fn easy_for(url: &str, opts: &HttpOptions) -> Result<curl::easy::Easy, curl::Error> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.get(true)?;
    easy.follow_location(true)?;
    easy.max_redirections(MAX_REDIRECTIONS)?;
    easy.useragent(&opts.user_agent)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.timeout(opts.timeout)?;
    Ok(easy)
}

fn check_status(easy: &mut curl::easy::Easy, url: &str) -> Result<u32, HttpError> {
    let code = easy.response_code()?;
    if !is_success(code) {
        return Err(HttpError::Status {
            url: url.to_string(),
            code,
        });
    }
    Ok(code)
}

/// GETs `url` and returns the full response body.
pub fn get_bytes(url: &str, opts: &HttpOptions) -> Result<Vec<u8>, HttpError> {
    let mut body = Vec::new();
    let mut easy = easy_for(url, opts)?;
    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }
    check_status(&mut easy, url)?;
    tracing::debug!(url, bytes = body.len(), "GET complete");
    Ok(body)
}

/// GETs `url` and writes the body to `dest`, returning the number of bytes written.
///
/// `dest` is only created once the final response's status line is 2xx, so an
/// error status (404 included) never leaves a file behind. A transfer that
/// fails midway leaves whatever was written so far.
pub fn get_to_file(url: &str, dest: &Path, opts: &HttpOptions) -> Result<u64, HttpError> {
    let status: Cell<Option<u32>> = Cell::new(None);
    let mut out: Option<BufWriter<File>> = None;
    let mut written: u64 = 0;
    let mut io_error: Option<std::io::Error> = None;

    let mut easy = easy_for(url, opts)?;
    let performed = {
        let mut transfer = easy.transfer();
        transfer.header_function(|line| {
            if let Some(code) = parse_status_line(line) {
                status.set(Some(code));
            }
            true
        })?;
        transfer.write_function(|data| {
            if !status.get().is_some_and(is_success) {
                // Error page body; drain it without touching the disk.
                return Ok(data.len());
            }
            if out.is_none() {
                match File::create(dest) {
                    Ok(f) => out = Some(BufWriter::new(f)),
                    Err(e) => {
                        io_error = Some(e);
                        return Ok(0);
                    }
                }
            }
            if let Some(w) = out.as_mut() {
                if let Err(e) = w.write_all(data) {
                    io_error = Some(e);
                    return Ok(0); // abort transfer
                }
            }
            written += data.len() as u64;
            Ok(data.len())
        })?;
        transfer.perform()
    };

    let io_err = |source| HttpError::Io {
        path: dest.to_path_buf(),
        source,
    };
    if let Some(e) = io_error {
        return Err(io_err(e));
    }
    if let Some(mut w) = out.take() {
        w.flush().map_err(io_err)?;
    }
    performed?;
    check_status(&mut easy, url)?;

    // 2xx with an empty body still produces the file.
    if written == 0 && !dest.exists() {
        File::create(dest).map_err(io_err)?;
    }
    Ok(written)
}
