//! Percent-encoding and path splitting for index entries and package URLs.
//!
//! Index entries carry percent-encoded package paths and entity links; they
//! are decoded once on ingest and re-encoded per segment when a download URL
//! is built.

mod path;

pub use path::{last_segment, split_dir_and_name};

use std::borrow::Cow;

/// Percent-decodes `raw`. Invalid UTF-8 after decoding is replaced with U+FFFD.
pub fn decode_component(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => String::from_utf8_lossy(&urlencoding::decode_binary(raw.as_bytes())).into_owned(),
    }
}

/// Percent-encodes one path segment. Only ASCII alphanumerics and `-_.~` stay literal.
pub fn encode_segment(segment: &str) -> Cow<'_, str> {
    urlencoding::encode(segment)
}

/// Percent-encodes every segment of a `/`-separated path, keeping the separators.
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(encode_segment)
        .collect::<Vec<_>>()
        .join("/")
}
