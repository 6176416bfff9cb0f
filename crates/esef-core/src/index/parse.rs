//! Index JSON → [`IndexListing`].
//!
//! Entry shape:
//! `{"id", "attributes": {"package_url", "country"}, "relationships": {"entity": {"links": {"related"}}}}`

use super::{Filing, IndexError, IndexListing, SkippedEntry};
use crate::url_model::{decode_component, last_segment, split_dir_and_name};
use serde_json::Value;

/// Key that could not be looked up in an entry.
#[derive(Debug, PartialEq, Eq)]
struct MissingKey(&'static str);

/// Walks `keys` from `value`. Fails with the first key that is absent or whose parent is not an object.
fn lookup<'a>(value: &'a Value, keys: &[&'static str]) -> Result<&'a Value, MissingKey> {
    let mut current = value;
    for &key in keys {
        current = current.get(key).ok_or(MissingKey(key))?;
    }
    Ok(current)
}

fn lookup_str<'a>(value: &'a Value, keys: &[&'static str]) -> Result<&'a str, MissingKey> {
    let last = keys.last().copied().unwrap_or("");
    lookup(value, keys)?.as_str().ok_or(MissingKey(last))
}

/// `Ok(None)` for entries without a package (`package_url: null`).
fn parse_entry(entry: &Value) -> Result<Option<(String, Filing)>, MissingKey> {
    let package_url = match lookup(entry, &["attributes", "package_url"])? {
        Value::Null => return Ok(None),
        Value::String(s) => decode_component(s),
        _ => return Err(MissingKey("package_url")),
    };
    let related = lookup_str(entry, &["relationships", "entity", "links", "related"])?;
    let lei = last_segment(&decode_component(related)).to_string();
    let country = lookup_str(entry, &["attributes", "country"])?.to_string();

    let (dir, name) = split_dir_and_name(&package_url);
    let filing = Filing {
        country,
        file_name: name.to_string(),
        path: dir.to_string(),
    };
    Ok(Some((lei, filing)))
}

fn entry_id(entry: &Value) -> String {
    match entry.get("id") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => "<unknown>".to_string(),
        Some(other) => other.to_string(),
    }
}

/// Parses an index response body.
///
/// Entries without a package are dropped silently; entries missing a required
/// key are recorded in `skipped` and parsing continues. Only an undecodable
/// body or a missing top-level `data` array is an error.
pub fn parse_index(body: &[u8]) -> Result<IndexListing, IndexError> {
    let doc: Value = serde_json::from_slice(body)?;
    let entries = doc
        .get("data")
        .and_then(Value::as_array)
        .ok_or(IndexError::MissingData)?;

    let mut listing = IndexListing {
        total_entries: entries.len(),
        ..IndexListing::default()
    };
    for entry in entries {
        match parse_entry(entry) {
            Ok(Some((lei, filing))) => listing.identifiers.insert(lei, filing),
            Ok(None) => {}
            Err(MissingKey(key)) => {
                let entry_id = entry_id(entry);
                tracing::warn!(entry = %entry_id, key, "index entry missing key, ignored");
                listing.skipped.push(SkippedEntry {
                    entry_id,
                    missing: key.to_string(),
                });
            }
        }
    }
    Ok(listing)
}
